#![allow(dead_code)]
//! Document assembly, the public face of the layout engine.
//!
//! `FlashcardGenerator` collects entries and configuration through chaining setters,
//! then `generate` runs pagination and the cell renderer against a PDF surface
//! and writes the deck. Invalid grid settings are rejected at the setter; an empty
//! deck is a logged no-op.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::layout::cell::render_cell;
use crate::layout::geometry::{validate_card_height, validate_cards_per_row, LayoutConfig, Margins};
use crate::layout::pagination::{physical_page_count, plan_pages};
use crate::layout::pdf::PdfSurface;
use crate::layout::surface::Surface;
use crate::layout::LayoutError;
use crate::models::CardEntry;

pub const DEFAULT_FILENAME: &str = "flashcards.pdf";
const DOCUMENT_TITLE: &str = "Flashcards";

/// What a successful `generate` produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckSummary {
    pub path: PathBuf,
    pub cards: usize,
    pub physical_pages: usize,
}

/// Reusable deck builder. `clear` resets the entries for the next document.
#[derive(Debug, Clone)]
pub struct FlashcardGenerator {
    filename: PathBuf,
    config: LayoutConfig,
    entries: Vec<CardEntry>,
}

impl Default for FlashcardGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl FlashcardGenerator {
    pub fn new() -> Self {
        Self {
            filename: PathBuf::from(DEFAULT_FILENAME),
            config: LayoutConfig::default(),
            entries: Vec::new(),
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn entries(&self) -> &[CardEntry] {
        &self.entries
    }

    pub fn filename(&self) -> &Path {
        &self.filename
    }

    pub fn set_filename(&mut self, filename: impl Into<PathBuf>) -> &mut Self {
        self.filename = filename.into();
        self
    }

    pub fn set_page_size(&mut self, width: f32, height: f32) -> &mut Self {
        self.config.page_width = width;
        self.config.page_height = height;
        self
    }

    pub fn set_margins(&mut self, top: f32, right: f32, bottom: f32, left: f32) -> &mut Self {
        self.config.margins = Margins {
            top,
            right,
            bottom,
            left,
        };
        self
    }

    pub fn set_cards_per_row(&mut self, count: u32) -> Result<&mut Self, LayoutError> {
        validate_cards_per_row(count)?;
        self.config.cards_per_row = count;
        Ok(self)
    }

    pub fn set_card_height(&mut self, height: f32) -> Result<&mut Self, LayoutError> {
        validate_card_height(height)?;
        self.config.card_height = height;
        Ok(self)
    }

    pub fn add_entry(
        &mut self,
        front: impl Into<String>,
        back: impl Into<String>,
        extra: impl Into<String>,
        index: impl Into<String>,
    ) -> &mut Self {
        self.add(CardEntry::new(front, back).with_extra(extra).with_index(index))
    }

    pub fn add(&mut self, entry: CardEntry) -> &mut Self {
        debug!(
            front = %entry.front_text,
            index = %entry.index_label,
            "Adding flashcard entry"
        );
        self.entries.push(entry);
        self
    }

    pub fn clear(&mut self) -> &mut Self {
        self.entries.clear();
        self
    }

    /// Renders the deck and writes it to the configured filename.
    ///
    /// Returns `Ok(None)` without touching the filesystem when there are no entries.
    pub fn generate(&self) -> Result<Option<DeckSummary>, LayoutError> {
        if self.entries.is_empty() {
            warn!("No flashcard entries to generate; skipping PDF output");
            return Ok(None);
        }

        let mut surface = PdfSurface::new(DOCUMENT_TITLE, self.config.page_width, self.config.page_height)?;
        let physical_pages = render_deck(&self.entries, &self.config, &mut surface)?;
        debug_assert_eq!(surface.page_count(), physical_pages);
        surface.finish(&self.filename)?;

        info!(
            cards = self.entries.len(),
            pages = physical_pages,
            path = %self.filename.display(),
            "Generated flashcard deck"
        );
        info!("For correct printing: use double-sided printing, flip on short edge");

        Ok(Some(DeckSummary {
            path: self.filename.clone(),
            cards: self.entries.len(),
            physical_pages,
        }))
    }

    /// Replaces the entries, points output at `output_path` and generates.
    pub fn generate_pdf(
        &mut self,
        entries: impl IntoIterator<Item = CardEntry>,
        output_path: impl Into<PathBuf>,
    ) -> Result<Option<DeckSummary>, LayoutError> {
        self.clear();
        self.set_filename(output_path);
        for entry in entries {
            self.add(entry);
        }
        self.generate()
    }
}

/// Draws every page of the deck onto `surface`: for each group a front page, then
/// its mirrored back page. Returns the number of physical pages drawn.
pub fn render_deck<S: Surface + ?Sized>(
    entries: &[CardEntry],
    config: &LayoutConfig,
    surface: &mut S,
) -> Result<usize, LayoutError> {
    let geometry = config.geometry()?;
    let pages = plan_pages(entries, &geometry);
    debug!(
        columns = geometry.columns,
        rows = geometry.rows_per_page,
        card_width = geometry.card_width,
        "Card grid computed"
    );
    debug_assert_eq!(
        pages.len(),
        physical_page_count(entries.len(), geometry.cards_per_page)
    );

    for page in &pages {
        surface.begin_page(page.face)?;
        for cell in &page.cells {
            let rect = config.cell_rect(&geometry, cell.position);
            render_cell(surface, &entries[cell.entry_index], page.face, rect);
        }
        debug!(group = page.group, face = ?page.face, cards = page.cells.len(), "Page rendered");
    }
    Ok(pages.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::geometry::{CellPosition, Face};
    use crate::layout::surface::RecordingSurface;

    fn numbered_deck(n: usize) -> Vec<CardEntry> {
        (0..n)
            .map(|i| CardEntry::new(format!("Q{i}"), format!("A{i}")).with_index((i + 1).to_string()))
            .collect()
    }

    #[test]
    fn test_setters_chain() {
        let mut generator = FlashcardGenerator::new();
        generator
            .set_filename("deck.pdf")
            .set_page_size(210.0, 297.0)
            .set_margins(10.0, 10.0, 10.0, 10.0)
            .set_cards_per_row(3)
            .unwrap()
            .set_card_height(40.0)
            .unwrap()
            .add_entry("Q", "A", "", "1");

        assert_eq!(generator.filename(), Path::new("deck.pdf"));
        assert_eq!(generator.config().cards_per_row, 3);
        assert_eq!(generator.config().card_height, 40.0);
        assert_eq!(generator.entries().len(), 1);
    }

    #[test]
    fn test_zero_cards_per_row_rejected_at_setter() {
        let mut generator = FlashcardGenerator::new();
        let err = generator.set_cards_per_row(0).unwrap_err();
        assert!(matches!(err, LayoutError::Configuration(_)));
        assert_eq!(generator.config().cards_per_row, 2, "config must be unchanged");
    }

    #[test]
    fn test_non_positive_card_height_rejected_at_setter() {
        let mut generator = FlashcardGenerator::new();
        assert!(generator.set_card_height(0.0).is_err());
        assert!(generator.set_card_height(-1.0).is_err());
        assert_eq!(generator.config().card_height, 50.0);
    }

    #[test]
    fn test_empty_deck_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.pdf");
        let mut generator = FlashcardGenerator::new();
        generator.set_filename(&path);

        let result = generator.generate().unwrap();
        assert!(result.is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_generate_writes_pdf_with_expected_page_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pdf");
        let mut generator = FlashcardGenerator::new();

        let summary = generator
            .generate_pdf(numbered_deck(23), &path)
            .unwrap()
            .expect("deck written");

        assert_eq!(summary.cards, 23);
        assert_eq!(summary.physical_pages, 6);
        assert_eq!(summary.path, path);

        let written = printpdf::lopdf::Document::load(&path).unwrap();
        assert_eq!(written.get_pages().len(), 6);
    }

    #[test]
    fn test_generate_pdf_resets_previous_entries() {
        let dir = tempfile::tempdir().unwrap();
        let mut generator = FlashcardGenerator::new();
        generator.add_entry("old", "old", "", "");

        let summary = generator
            .generate_pdf(numbered_deck(3), dir.path().join("a.pdf"))
            .unwrap()
            .unwrap();
        assert_eq!(summary.cards, 3);
        assert_eq!(generator.entries().len(), 3);
        assert_eq!(generator.entries()[0].front_text, "Q0");
    }

    #[test]
    fn test_zero_capacity_page_fails_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never.pdf");
        let mut generator = FlashcardGenerator::new();
        generator.set_page_size(210.0, 40.0).set_filename(&path);
        generator.add_entry("Q", "A", "", "");

        let err = generator.generate().unwrap_err();
        assert!(matches!(err, LayoutError::Configuration(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_render_deck_alternates_faces() {
        let mut surface = RecordingSurface::default();
        let pages = render_deck(&numbered_deck(23), &LayoutConfig::default(), &mut surface).unwrap();
        assert_eq!(pages, 6);
        let faces: Vec<Face> = surface.pages.iter().map(|p| p.face).collect();
        assert_eq!(
            faces,
            vec![Face::Front, Face::Back, Face::Front, Face::Back, Face::Front, Face::Back]
        );
        assert_eq!(surface.pages[4].rects.len(), 3);
    }

    #[test]
    fn test_answer_printed_behind_question() {
        let config = LayoutConfig::default();
        let geometry = config.geometry().unwrap();
        let entries = numbered_deck(10);
        let mut surface = RecordingSurface::default();
        render_deck(&entries, &config, &mut surface).unwrap();

        // Entry 7: front at row 3 col 1, back at row 3 col 0.
        let front_rect = config.cell_rect(&geometry, CellPosition { row: 3, col: 1 });
        let back_rect = config.cell_rect(&geometry, CellPosition { row: 3, col: 0 });
        assert!(surface.pages[0].text_in(&front_rect).starts_with("Q7"));
        assert!(surface.pages[1].text_in(&back_rect).starts_with("A7"));
    }

    #[test]
    fn test_index_label_matches_on_both_sides() {
        let config = LayoutConfig::default();
        let geometry = config.geometry().unwrap();
        let mut surface = RecordingSurface::default();
        render_deck(&numbered_deck(4), &config, &mut surface).unwrap();

        let front = surface.pages[0].text_in(&config.cell_rect(&geometry, CellPosition { row: 1, col: 0 }));
        let back = surface.pages[1].text_in(&config.cell_rect(&geometry, CellPosition { row: 1, col: 1 }));
        assert_eq!(front, "Q2 3");
        assert_eq!(back, "A2 3");
    }
}

//! printpdf-backed `Surface`.
//!
//! Uses the base-14 Helvetica faces so no font files are embedded. The document
//! lives in memory until `finish` writes it; the output file is only created once
//! every page has rendered.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerIndex, PdfLayerReference, PdfPageIndex, Point, Rgb,
};
use tracing::debug;

use crate::layout::font_metrics::FontFace;
use crate::layout::geometry::{Face, Rect};
use crate::layout::surface::Surface;
use crate::layout::text_flow::PlacedFragment;
use crate::layout::LayoutError;

const LAYER_NAME: &str = "Cards";
const BORDER_THICKNESS_PT: f32 = 0.5;
const UNDERLINE_THICKNESS_PT: f32 = 0.6;
/// Underline offset below the baseline, in em.
const UNDERLINE_OFFSET_EM: f32 = 0.1;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
    bold_italic: IndirectFontRef,
}

impl Fonts {
    fn load(doc: &PdfDocumentReference) -> Result<Self, LayoutError> {
        let add = |font: BuiltinFont| {
            doc.add_builtin_font(font)
                .map_err(|e| LayoutError::Backend(e.to_string()))
        };
        Ok(Self {
            regular: add(BuiltinFont::Helvetica)?,
            bold: add(BuiltinFont::HelveticaBold)?,
            italic: add(BuiltinFont::HelveticaOblique)?,
            bold_italic: add(BuiltinFont::HelveticaBoldOblique)?,
        })
    }

    fn get(&self, face: FontFace) -> &IndirectFontRef {
        match face {
            FontFace::Regular => &self.regular,
            FontFace::Bold => &self.bold,
            FontFace::Italic => &self.italic,
            FontFace::BoldItalic => &self.bold_italic,
        }
    }
}

pub struct PdfSurface {
    doc: PdfDocumentReference,
    fonts: Fonts,
    width: f32,
    height: f32,
    /// Page created together with the document, handed out by the first `begin_page`.
    first_page: Option<(PdfPageIndex, PdfLayerIndex)>,
    layer: Option<PdfLayerReference>,
    pages: usize,
}

impl PdfSurface {
    pub fn new(title: &str, width: f32, height: f32) -> Result<Self, LayoutError> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(width), Mm(height), LAYER_NAME);
        let fonts = Fonts::load(&doc)?;
        Ok(Self {
            doc,
            fonts,
            width,
            height,
            first_page: Some((page, layer)),
            layer: None,
            pages: 0,
        })
    }

    pub fn page_count(&self) -> usize {
        self.pages
    }

    /// Serializes the document to `path`, flushing before returning.
    pub fn finish(self, path: &Path) -> Result<(), LayoutError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.doc
            .save(&mut writer)
            .map_err(|e| LayoutError::Backend(e.to_string()))?;
        writer.flush()?;
        Ok(())
    }

    fn draw_line(layer: &PdfLayerReference, x1: f32, y1: f32, x2: f32, y2: f32) {
        let points = vec![
            (Point::new(Mm(x1), Mm(y1)), false),
            (Point::new(Mm(x2), Mm(y2)), false),
        ];
        layer.add_line(Line {
            points,
            is_closed: false,
        });
    }
}

impl Surface for PdfSurface {
    fn begin_page(&mut self, face: Face) -> Result<(), LayoutError> {
        let (page, layer) = match self.first_page.take() {
            Some(first) => first,
            None => self.doc.add_page(Mm(self.width), Mm(self.height), LAYER_NAME),
        };
        self.layer = Some(self.doc.get_page(page).get_layer(layer));
        self.pages += 1;
        debug!(page = self.pages, ?face, "PDF page started");
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect, gray: f32) {
        let Some(layer) = &self.layer else {
            return;
        };
        layer.set_outline_color(Color::Rgb(Rgb::new(gray, gray, gray, None)));
        layer.set_outline_thickness(BORDER_THICKNESS_PT);

        let points = vec![
            (Point::new(Mm(rect.x), Mm(rect.y)), false),
            (Point::new(Mm(rect.x + rect.width), Mm(rect.y)), false),
            (Point::new(Mm(rect.x + rect.width), Mm(rect.top())), false),
            (Point::new(Mm(rect.x), Mm(rect.top())), false),
        ];
        layer.add_line(Line {
            points,
            is_closed: true,
        });
    }

    fn draw_fragment(&mut self, fragment: &PlacedFragment) {
        let Some(layer) = &self.layer else {
            return;
        };
        layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        layer.use_text(
            fragment.text.as_str(),
            fragment.font_size,
            Mm(fragment.x),
            Mm(fragment.baseline),
            self.fonts.get(fragment.face),
        );

        if let Some(length) = fragment.underline {
            let y = fragment.baseline - crate::layout::pt_to_mm(fragment.font_size) * UNDERLINE_OFFSET_EM;
            layer.set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
            layer.set_outline_thickness(UNDERLINE_THICKNESS_PT);
            Self::draw_line(layer, fragment.x, y, fragment.x + length, y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_begin_page_reuses_initial_page() {
        let mut surface = PdfSurface::new("t", 210.0, 297.0).unwrap();
        assert_eq!(surface.page_count(), 0);
        surface.begin_page(Face::Front).unwrap();
        surface.begin_page(Face::Back).unwrap();
        assert_eq!(surface.page_count(), 2);
    }

    #[test]
    fn test_finish_writes_pdf_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");

        let mut surface = PdfSurface::new("t", 210.0, 297.0).unwrap();
        surface.begin_page(Face::Front).unwrap();
        surface.stroke_rect(
            Rect {
                x: 10.0,
                y: 10.0,
                width: 50.0,
                height: 30.0,
            },
            0.8,
        );
        surface.draw_fragment(&PlacedFragment {
            x: 12.0,
            baseline: 20.0,
            width: 10.0,
            text: "Hi".to_string(),
            face: FontFace::Bold,
            font_size: 12.0,
            underline: Some(12.0),
        });
        surface.finish(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}

//! Card grid geometry.
//!
//! All lengths are millimetres in PDF orientation (origin at the bottom-left corner).
//! Rows are counted downward from the top margin; columns rightward from the left margin.

use serde::{Deserialize, Serialize};

use crate::layout::LayoutError;

/// A4 portrait, in millimetres.
pub const A4: (f32, f32) = (210.0, 297.0);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub fn uniform(mm: f32) -> Self {
        Self {
            top: mm,
            right: mm,
            bottom: mm,
            left: mm,
        }
    }
}

/// Page and grid configuration for one deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub page_width: f32,
    pub page_height: f32,
    pub margins: Margins,
    /// Card columns per row. Must be > 0.
    pub cards_per_row: u32,
    /// Fixed card height. Must be > 0.
    pub card_height: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: A4.0,
            page_height: A4.1,
            margins: Margins::uniform(10.0),
            cards_per_row: 2,
            card_height: 50.0,
        }
    }
}

/// Derived grid dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub card_width: f32,
    pub card_height: f32,
    pub columns: u32,
    pub rows_per_page: u32,
    pub cards_per_page: usize,
}

/// Which side of the physical sheet a page prints on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    Front,
    Back,
}

/// Grid address of a cell within a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPosition {
    pub row: u32,
    pub col: u32,
}

/// Axis-aligned rectangle, `(x, y)` is the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn inset(&self, by: f32) -> Rect {
        Rect {
            x: self.x + by,
            y: self.y + by,
            width: self.width - 2.0 * by,
            height: self.height - 2.0 * by,
        }
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }
}

pub(crate) fn validate_cards_per_row(count: u32) -> Result<(), LayoutError> {
    if count == 0 {
        return Err(LayoutError::Configuration(
            "cards per row must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_card_height(height: f32) -> Result<(), LayoutError> {
    if !height.is_finite() || height <= 0.0 {
        return Err(LayoutError::Configuration(format!(
            "card height must be greater than 0 (got {height})"
        )));
    }
    Ok(())
}

impl LayoutConfig {
    pub fn usable_width(&self) -> f32 {
        self.page_width - self.margins.left - self.margins.right
    }

    pub fn usable_height(&self) -> f32 {
        self.page_height - self.margins.top - self.margins.bottom
    }

    /// Computes card width and capacity. Fails instead of returning a zero-capacity grid,
    /// which would otherwise never consume any entries.
    pub fn geometry(&self) -> Result<Geometry, LayoutError> {
        validate_cards_per_row(self.cards_per_row)?;
        validate_card_height(self.card_height)?;

        let usable_width = self.usable_width();
        if !usable_width.is_finite() || usable_width <= 0.0 {
            return Err(LayoutError::Configuration(format!(
                "margins leave no usable width ({usable_width} mm)"
            )));
        }

        let usable_height = self.usable_height();
        let rows = if usable_height > 0.0 {
            (usable_height / self.card_height).floor()
        } else {
            0.0
        };
        // `as u32` saturates; a row count at the limit means the grid is unusable.
        if !rows.is_finite() || rows >= u32::MAX as f32 {
            return Err(LayoutError::Configuration(format!(
                "a {} mm card yields too many rows per page",
                self.card_height
            )));
        }
        let rows_per_page = rows as u32;
        let cards_per_page = (self.cards_per_row as usize)
            .checked_mul(rows_per_page as usize)
            .ok_or_else(|| {
                LayoutError::Configuration(format!(
                    "{} columns x {rows_per_page} rows overflows the page capacity",
                    self.cards_per_row
                ))
            })?;
        if cards_per_page == 0 {
            return Err(LayoutError::Configuration(format!(
                "a {} mm card does not fit in {usable_height} mm of usable page height",
                self.card_height
            )));
        }

        Ok(Geometry {
            card_width: usable_width / self.cards_per_row as f32,
            card_height: self.card_height,
            columns: self.cards_per_row,
            rows_per_page,
            cards_per_page,
        })
    }

    /// Outer rectangle of the cell at `pos`.
    pub fn cell_rect(&self, geometry: &Geometry, pos: CellPosition) -> Rect {
        let x = self.margins.left + pos.col as f32 * geometry.card_width;
        let y = self.page_height - self.margins.top - (pos.row + 1) as f32 * geometry.card_height;
        Rect {
            x,
            y,
            width: geometry.card_width,
            height: geometry.card_height,
        }
    }
}

/// Maps the within-group index `i` to a cell.
///
/// Fronts fill left-to-right, top-to-bottom. Backs keep the row and mirror the column,
/// so a sheet flipped on its short edge puts each answer behind its question.
pub fn place(i: usize, columns: u32, face: Face) -> CellPosition {
    let columns = columns as usize;
    let row = (i / columns) as u32;
    let front_col = (i % columns) as u32;
    let col = match face {
        Face::Front => front_col,
        Face::Back => columns as u32 - 1 - front_col,
    };
    CellPosition { row, col }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a4_config(cards_per_row: u32, card_height: f32) -> LayoutConfig {
        LayoutConfig {
            cards_per_row,
            card_height,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_a4_grid_holds_ten_cards() {
        let geometry = a4_config(2, 50.0).geometry().unwrap();
        assert_eq!(geometry.rows_per_page, 5);
        assert_eq!(geometry.cards_per_page, 10);
        assert!((geometry.card_width - 95.0).abs() < 1e-4);
    }

    #[test]
    fn test_cards_per_page_formula_across_configs() {
        for columns in 1..=4u32 {
            for height in [30.0_f32, 42.5, 50.0, 90.0, 277.0] {
                let config = a4_config(columns, height);
                let geometry = config.geometry().unwrap();
                let rows = ((297.0_f32 - 10.0 - 10.0) / height).floor() as usize;
                assert_eq!(geometry.cards_per_page, columns as usize * rows);
            }
        }
    }

    #[test]
    fn test_zero_columns_rejected() {
        let err = a4_config(0, 50.0).geometry().unwrap_err();
        assert!(matches!(err, LayoutError::Configuration(_)));
    }

    #[test]
    fn test_non_positive_card_height_rejected() {
        for height in [0.0_f32, -5.0, f32::NAN] {
            let err = a4_config(2, height).geometry().unwrap_err();
            assert!(matches!(err, LayoutError::Configuration(_)));
        }
    }

    #[test]
    fn test_card_taller_than_page_rejected() {
        let err = a4_config(2, 300.0).geometry().unwrap_err();
        assert!(
            matches!(err, LayoutError::Configuration(ref msg) if msg.contains("does not fit")),
            "got {err:?}"
        );
    }

    #[test]
    fn test_huge_grid_does_not_overflow() {
        let geometry = a4_config(70_000, 0.004).geometry().unwrap();
        assert_eq!(
            geometry.cards_per_page,
            70_000 * geometry.rows_per_page as usize
        );
    }

    #[test]
    fn test_microscopic_card_height_rejected() {
        let err = a4_config(2, 1e-30).geometry().unwrap_err();
        assert!(
            matches!(err, LayoutError::Configuration(ref msg) if msg.contains("too many rows")),
            "got {err:?}"
        );
    }

    #[test]
    fn test_margins_wider_than_page_rejected() {
        let config = LayoutConfig {
            margins: Margins {
                top: 10.0,
                right: 110.0,
                bottom: 10.0,
                left: 110.0,
            },
            ..Default::default()
        };
        assert!(config.geometry().is_err());
    }

    #[test]
    fn test_front_placement_fills_rows_first() {
        assert_eq!(place(0, 2, Face::Front), CellPosition { row: 0, col: 0 });
        assert_eq!(place(1, 2, Face::Front), CellPosition { row: 0, col: 1 });
        assert_eq!(place(7, 2, Face::Front), CellPosition { row: 3, col: 1 });
    }

    #[test]
    fn test_back_placement_mirrors_columns() {
        assert_eq!(place(7, 2, Face::Back), CellPosition { row: 3, col: 0 });
        assert_eq!(place(0, 3, Face::Back), CellPosition { row: 0, col: 2 });
        assert_eq!(place(4, 3, Face::Back), CellPosition { row: 1, col: 1 });
    }

    #[test]
    fn test_mirroring_law_holds_for_every_cell() {
        for columns in 1..=5u32 {
            for i in 0..(columns as usize * 6) {
                let front = place(i, columns, Face::Front);
                let back = place(i, columns, Face::Back);
                assert_eq!(front.row, back.row);
                assert_eq!(back.col, columns - 1 - front.col);
            }
        }
    }

    #[test]
    fn test_cell_rect_top_left_cell_touches_margins() {
        let config = a4_config(2, 50.0);
        let geometry = config.geometry().unwrap();
        let rect = config.cell_rect(&geometry, CellPosition { row: 0, col: 0 });
        assert!((rect.x - 10.0).abs() < 1e-4);
        assert!((rect.top() - 287.0).abs() < 1e-4);
    }

    #[test]
    fn test_cell_rect_moves_down_per_row() {
        let config = a4_config(2, 50.0);
        let geometry = config.geometry().unwrap();
        let rect = config.cell_rect(&geometry, CellPosition { row: 3, col: 1 });
        assert!((rect.x - 105.0).abs() < 1e-4);
        assert!((rect.y - (297.0 - 10.0 - 200.0)).abs() < 1e-4);
    }

    #[test]
    fn test_inset_shrinks_both_axes() {
        let rect = Rect {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 8.0,
        }
        .inset(1.0);
        assert_eq!(rect.width, 8.0);
        assert_eq!(rect.height, 6.0);
        assert_eq!(rect.top(), 7.0);
    }
}

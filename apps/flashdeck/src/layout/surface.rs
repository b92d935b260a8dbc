//! Drawing seam between the layout engine and a concrete backend.
//!
//! The engine only needs three primitives. `PdfSurface` implements them with
//! printpdf; tests use `RecordingSurface` to assert on placement.

use crate::layout::geometry::{Face, Rect};
use crate::layout::text_flow::PlacedFragment;
use crate::layout::LayoutError;

pub trait Surface {
    /// Starts a new physical page. Everything drawn afterwards lands on it.
    fn begin_page(&mut self, face: Face) -> Result<(), LayoutError>;

    /// Strokes a rectangle outline in the given gray level (0 = black, 1 = white).
    fn stroke_rect(&mut self, rect: Rect, gray: f32);

    fn draw_fragment(&mut self, fragment: &PlacedFragment);
}

/// In-memory surface that records every call.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub pages: Vec<RecordedPage>,
}

#[cfg(test)]
#[derive(Debug)]
pub struct RecordedPage {
    pub face: Face,
    pub rects: Vec<(Rect, f32)>,
    pub fragments: Vec<PlacedFragment>,
}

#[cfg(test)]
impl RecordedPage {
    /// Concatenated text of the fragments drawn inside `rect`.
    pub fn text_in(&self, rect: &Rect) -> String {
        self.fragments
            .iter()
            .filter(|f| f.x >= rect.x && f.x < rect.x + rect.width && f.baseline >= rect.y && f.baseline < rect.top())
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
impl Surface for RecordingSurface {
    fn begin_page(&mut self, face: Face) -> Result<(), LayoutError> {
        self.pages.push(RecordedPage {
            face,
            rects: Vec::new(),
            fragments: Vec::new(),
        });
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect, gray: f32) {
        if let Some(page) = self.pages.last_mut() {
            page.rects.push((rect, gray));
        }
    }

    fn draw_fragment(&mut self, fragment: &PlacedFragment) {
        if let Some(page) = self.pages.last_mut() {
            page.fragments.push(fragment.clone());
        }
    }
}

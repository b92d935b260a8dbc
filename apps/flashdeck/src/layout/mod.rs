// Flashcard layout engine.
// Implements: grid geometry, pagination into front/back page pairs, mirrored back
// addressing, markup translation, text flow into cells, and PDF assembly.
// Rendering is CPU-bound and synchronous; async callers go through spawn_blocking.

use thiserror::Error;

pub mod cell;
pub mod font_metrics;
pub mod generator;
pub mod geometry;
pub mod markup;
pub mod pagination;
pub mod pdf;
pub mod surface;
pub mod text_flow;

// Re-export the public API consumed by main and the pipeline.
pub use generator::{DeckSummary, FlashcardGenerator};

#[derive(Debug, Error)]
pub enum LayoutError {
    /// Rejected before any rendering starts.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The PDF backend failed. Never masked.
    #[error("PDF backend error: {0}")]
    Backend(String),

    #[error("I/O error writing deck: {0}")]
    Io(#[from] std::io::Error),
}

/// Millimetres per typographic point.
pub const MM_PER_PT: f32 = 25.4 / 72.0;

pub fn pt_to_mm(pt: f32) -> f32 {
    pt * MM_PER_PT
}

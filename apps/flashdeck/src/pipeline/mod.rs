// Card Content Pipeline
// Implements: source text extraction, LLM card generation with retries, response repair.
// All LLM calls go through llm_client; no direct Gemini calls here.

use std::path::PathBuf;

use thiserror::Error;

use crate::llm_client::LlmError;

pub mod cards;
pub mod extract;
pub mod prompts;

pub use cards::generate_flashcards;
pub use extract::{discover_inputs, extract_text};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to extract text from PDF {path}: {message}")]
    Pdf { path: PathBuf, message: String },

    #[error("No text could be extracted from {0}")]
    EmptyText(PathBuf),

    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Model response did not contain a flashcard array: {0}")]
    MalformedResponse(String),

    #[error("Card generation failed after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

//! Source text extraction for study material (.txt and .pdf).

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::pipeline::PipelineError;

/// Input extensions, in the order they are listed to the user.
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["txt", "pdf"];

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Reads the study text from `path`.
///
/// PDFs go through pdf-extract; every other file is read as UTF-8, replacing
/// invalid sequences rather than failing.
pub fn extract_text(path: &Path) -> Result<String, PipelineError> {
    let text = if is_pdf(path) {
        pdf_extract::extract_text(path).map_err(|e| PipelineError::Pdf {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    } else {
        let bytes = std::fs::read(path).map_err(|source| PipelineError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        String::from_utf8_lossy(&bytes).into_owned()
    };

    if text.trim().is_empty() {
        return Err(PipelineError::EmptyText(path.to_path_buf()));
    }

    info!(
        path = %path.display(),
        chars = text.chars().count(),
        "Extracted study text"
    );
    Ok(text)
}

/// Lists the `.txt` files, then the `.pdf` files, directly inside `dir`.
pub fn discover_inputs(dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    let mut found = Vec::new();

    for ext in SUPPORTED_EXTENSIONS {
        let pattern = format!("{escaped}/*.{ext}");
        let mut matches: Vec<PathBuf> = glob::glob(&pattern)?.filter_map(Result::ok).collect();
        matches.sort();
        found.extend(matches);
    }

    debug!(dir = %dir.display(), count = found.len(), "Scanned uploads directory");
    Ok(found)
}

/// First `max_chars` characters of `text`, with an ellipsis when cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

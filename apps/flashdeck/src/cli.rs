//! Command-line surface and the interactive console prompts.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use clap::Parser;

use crate::errors::AppError;

pub const MIN_CARDS: u32 = 1;
pub const MAX_CARDS: u32 = 75;

#[derive(Debug, Parser)]
#[command(name = "flashdeck")]
#[command(version, about = "Turn study notes into printable double-sided flashcards", long_about = None)]
pub struct Cli {
    /// Study material (.txt or .pdf). Omit to pick from the uploads directory.
    pub input: Option<PathBuf>,

    /// Directory scanned for study material when no input is given
    #[arg(long, default_value = "uploads")]
    pub uploads_dir: PathBuf,

    /// Directory the PDF deck is written to
    #[arg(long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Number of flashcards to generate (asked interactively when omitted)
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(MIN_CARDS as i64..=MAX_CARDS as i64))]
    pub cards: Option<u32>,

    /// Card columns per row
    #[arg(long, default_value_t = 2)]
    pub cards_per_row: u32,

    /// Card height in millimetres
    #[arg(long, default_value_t = 50.0)]
    pub card_height_mm: f32,
}

/// Prints `message` and reads one trimmed line.
pub fn prompt_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    message: &str,
) -> Result<String, AppError> {
    write!(output, "{message}")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Lists `files` numbered from 1 and returns the one the user picks.
pub fn choose_file<R: BufRead, W: Write>(
    files: &[PathBuf],
    input: &mut R,
    output: &mut W,
) -> Result<PathBuf, AppError> {
    writeln!(output, "\nAvailable files:")?;
    for (i, path) in files.iter().enumerate() {
        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        writeln!(output, "{}. {}", i + 1, name)?;
    }

    let answer = prompt_line(input, output, "\nEnter the number of the file to process: ")?;
    let choice: usize = answer
        .parse()
        .map_err(|_| AppError::Validation("Please enter a valid number.".to_string()))?;
    if choice == 0 || choice > files.len() {
        return Err(AppError::Validation("Invalid selection.".to_string()));
    }
    Ok(files[choice - 1].clone())
}

pub fn parse_card_count(answer: &str) -> Result<u32, AppError> {
    let count: u32 = answer
        .trim()
        .parse()
        .map_err(|_| AppError::Validation("Please enter a valid number.".to_string()))?;
    if !(MIN_CARDS..=MAX_CARDS).contains(&count) {
        return Err(AppError::Validation(format!(
            "Number of cards must be between {MIN_CARDS} and {MAX_CARDS}."
        )));
    }
    Ok(count)
}

/// `<output_dir>/<input stem>_flashcards.pdf`
pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "deck".to_string());
    output_dir.join(format!("{stem}_flashcards.pdf"))
}

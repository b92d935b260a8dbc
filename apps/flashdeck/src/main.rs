mod cli;
mod config;
mod errors;
mod layout;
mod llm_client;
mod models;
mod pipeline;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{choose_file, output_path_for, parse_card_count, prompt_line, Cli};
use crate::config::Config;
use crate::errors::AppError;
use crate::layout::{DeckSummary, FlashcardGenerator};
use crate::llm_client::LlmClient;
use crate::models::CardEntry;
use crate::pipeline::extract::preview;
use crate::pipeline::{discover_inputs, extract_text, generate_flashcards};

const PREVIEW_CHARS: usize = 200;
const PREVIEW_CARDS: usize = 3;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    info!("Starting flashdeck v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli, config).await {
        error!(code = e.code(), "{e}");
        return Err(e.into());
    }
    Ok(())
}

async fn run(cli: Cli, config: Config) -> Result<(), AppError> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    println!("\n===== Flashcard Generator =====");

    let api_key = match config.gemini_api_key {
        Some(key) => key,
        None => {
            let key = prompt_line(&mut input, &mut output, "\nEnter your Gemini API key: ")?;
            if key.is_empty() {
                return Err(AppError::Validation(
                    "API key is required to generate flashcards.".to_string(),
                ));
            }
            key
        }
    };

    let source = match cli.input {
        Some(path) => path,
        None => pick_upload(&cli.uploads_dir, &mut input, &mut output)?,
    };
    println!("\nSelected: {}", source.display());

    let num_cards = match cli.cards {
        Some(n) => n,
        None => parse_card_count(&prompt_line(
            &mut input,
            &mut output,
            "\nHow many flashcards do you want to generate? (1-75): ",
        )?)?,
    };

    let text = extract_text(&source)?;
    println!("\nText preview: {}", preview(&text, PREVIEW_CHARS));

    println!("\nGenerating {num_cards} flashcards...");
    let llm = LlmClient::new(api_key)?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);
    let cards = generate_flashcards(&llm, &text, num_cards).await?;
    if cards.is_empty() {
        return Err(AppError::Validation(
            "The model returned no usable flashcards.".to_string(),
        ));
    }
    println!("\nSuccessfully generated {} flashcards.", cards.len());

    std::fs::create_dir_all(&cli.output_dir)?;
    let output_path = output_path_for(&source, &cli.output_dir);

    let mut generator = FlashcardGenerator::new();
    generator
        .set_cards_per_row(cli.cards_per_row)?
        .set_card_height(cli.card_height_mm)?;

    let summary = render_deck(generator, cards.clone(), output_path).await?;
    if let Some(summary) = summary {
        let shown = summary.path.canonicalize().unwrap_or(summary.path.clone());
        println!(
            "\nFlashcards saved to: {} ({} cards, {} pages)",
            shown.display(),
            summary.cards,
            summary.physical_pages
        );
        println!("Print double-sided and flip on the short edge.");
        print_preview(&cards);
    }
    Ok(())
}

fn pick_upload<R: BufRead, W: Write>(
    uploads_dir: &Path,
    input: &mut R,
    output: &mut W,
) -> Result<PathBuf, AppError> {
    std::fs::create_dir_all(uploads_dir)?;
    println!("\nScanning uploads folder...");
    let files = discover_inputs(uploads_dir)?;
    if files.is_empty() {
        let shown = uploads_dir.canonicalize().unwrap_or(uploads_dir.to_path_buf());
        return Err(AppError::Validation(format!(
            "No .txt or .pdf files found. Please add files to: {}",
            shown.display()
        )));
    }
    choose_file(&files, input, output)
}

/// PDF rendering is CPU-bound; run it off the async executor.
async fn render_deck(
    mut generator: FlashcardGenerator,
    cards: Vec<CardEntry>,
    output_path: PathBuf,
) -> Result<Option<DeckSummary>, AppError> {
    let summary = tokio::task::spawn_blocking(move || generator.generate_pdf(cards, output_path))
        .await
        .context("spawn_blocking failed while rendering the deck")??;
    Ok(summary)
}

fn print_preview(cards: &[CardEntry]) {
    println!("\nHere's a preview of your flashcards:");
    for (i, card) in cards.iter().take(PREVIEW_CARDS).enumerate() {
        println!("\nCard {}:", i + 1);
        println!("Front: {}", card.front_text);
        println!("Back: {}", card.back_text);
    }
    if cards.len() > PREVIEW_CARDS {
        println!(
            "\n... and {} more cards in the PDF.",
            cards.len() - PREVIEW_CARDS
        );
    }
}

//! Flashcard generation: turns study text into validated card entries.
//!
//! Flow: truncate source → build prompt → LLM call (timeout + retry) →
//!       locate JSON array → drop cards missing either side → number them.

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use serde_json::Value;
use tracing::{info, warn};

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{strip_json_fences, TextGenerator};
use crate::models::CardEntry;
use crate::pipeline::prompts::{FLASHCARD_PROMPT_TEMPLATE, FLASHCARD_SYSTEM};
use crate::pipeline::PipelineError;

/// Longest study text sent to the model, in characters.
pub const MAX_SOURCE_CHARS: usize = 12_000;
const TRUNCATION_MARKER: &str = "... [content truncated for processing]";
pub const MAX_ATTEMPTS: u32 = 3;
/// Upper bound for a single generation call, on top of the HTTP client's own timeout.
pub const CALL_TIMEOUT: Duration = Duration::from_secs(45);

pub fn truncate_source(text: &str) -> String {
    match text.char_indices().nth(MAX_SOURCE_CHARS) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &text[..cut]),
        None => text.to_string(),
    }
}

pub fn build_prompt(text: &str, num_cards: u32) -> String {
    FLASHCARD_PROMPT_TEMPLATE
        .replace("{num_cards}", &num_cards.to_string())
        .replace("{study_text}", text)
}

fn system_prompt() -> String {
    format!("{FLASHCARD_SYSTEM} {JSON_ONLY_SYSTEM}")
}

/// Extracts cards from the model's reply.
///
/// The reply may wrap the array in prose or code fences; the first `[ { ... } ]`
/// span is decoded. Cards whose trimmed front or back is empty are dropped. The
/// index label is the card's 1-based position in the decoded array, so gaps show
/// which cards were discarded.
pub fn parse_cards(response: &str) -> Result<Vec<CardEntry>, PipelineError> {
    static ARRAY_RE: OnceLock<Regex> = OnceLock::new();
    let array_re = ARRAY_RE.get_or_init(|| Regex::new(r"(?s)\[\s*\{.*\}\s*\]").unwrap());

    let body = strip_json_fences(response);
    let Some(found) = array_re.find(body) else {
        return Err(PipelineError::MalformedResponse(
            "no JSON array of objects found".to_string(),
        ));
    };

    let raw: Vec<Value> = serde_json::from_str(found.as_str())
        .map_err(|e| PipelineError::MalformedResponse(e.to_string()))?;

    let field = |card: &Value, name: &str| {
        card.get(name)
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default()
            .to_string()
    };

    let cards: Vec<CardEntry> = raw
        .iter()
        .enumerate()
        .filter_map(|(i, card)| {
            let front = field(card, "front");
            let back = field(card, "back");
            if front.is_empty() || back.is_empty() {
                warn!(position = i + 1, "Dropping flashcard with an empty side");
                return None;
            }
            Some(CardEntry::new(front, back).with_index((i + 1).to_string()))
        })
        .collect();

    Ok(cards)
}

/// Asks the model for `num_cards` flashcards about `text`.
///
/// Up to `MAX_ATTEMPTS` calls. A call that exceeds `CALL_TIMEOUT` is retried at once;
/// any other generation error is retried after `2^(attempt + 1)` seconds. A reply
/// that cannot be parsed is not retried.
pub async fn generate_flashcards(
    generator: &dyn TextGenerator,
    text: &str,
    num_cards: u32,
) -> Result<Vec<CardEntry>, PipelineError> {
    let prompt = build_prompt(&truncate_source(text), num_cards);
    let system = system_prompt();
    let mut last_error = String::new();

    for attempt in 0..MAX_ATTEMPTS {
        info!("Attempt {} to generate flashcards", attempt + 1);

        let outcome = tokio::time::timeout(CALL_TIMEOUT, generator.generate_text(&prompt, &system)).await;
        let is_last = attempt + 1 == MAX_ATTEMPTS;

        match outcome {
            Ok(Ok(reply)) => {
                let cards = parse_cards(&reply)?;
                info!(requested = num_cards, received = cards.len(), "Flashcards generated");
                return Ok(cards);
            }
            Err(_elapsed) => {
                last_error = format!("call timed out after {}s", CALL_TIMEOUT.as_secs());
                warn!("Flashcard generation timed out");
                if !is_last {
                    warn!("Retrying ({}/{})...", attempt + 2, MAX_ATTEMPTS);
                }
            }
            Ok(Err(e)) => {
                last_error = e.to_string();
                warn!("Error generating flashcards: {e}");
                if !is_last {
                    let wait = Duration::from_secs(1 << (attempt + 1));
                    warn!("Waiting {} seconds before retry...", wait.as_secs());
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }

    Err(PipelineError::RetriesExhausted {
        attempts: MAX_ATTEMPTS,
        last_error,
    })
}

#![allow(dead_code)]
use serde::{Deserialize, Serialize};

/// One flashcard. Entries are read-only once handed to the layout engine;
/// their position in the deck decides where both faces land on the sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardEntry {
    pub front_text: String,
    pub back_text: String,
    /// Annotation printed in italics under the front text. Empty = none.
    #[serde(default)]
    pub extra_text: String,
    /// Small label printed on both faces, used to pair cards after cutting.
    #[serde(default)]
    pub index_label: String,
}

impl CardEntry {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front_text: front.into(),
            back_text: back.into(),
            ..Default::default()
        }
    }

    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra_text = extra.into();
        self
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index_label = index.into();
        self
    }

    /// Whitespace-only annotations and labels count as absent, so a stray space
    /// never reserves the label strip or adds a blank annotation line.
    pub fn has_extra(&self) -> bool {
        !self.extra_text.trim().is_empty()
    }

    pub fn has_index(&self) -> bool {
        !self.index_label.trim().is_empty()
    }
}

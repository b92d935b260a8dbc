//! Text flow: the block renderer used inside a card cell.
//!
//! Takes rich-text blocks, wraps them greedily inside a padded frame and returns
//! positioned fragments ready for a `Surface`. Lines that would cross the bottom of
//! the frame are dropped: overlong card text is clipped, never reflowed elsewhere.
//!
//! Coordinates are millimetres (PDF orientation); font sizes and leading are points.

use crate::layout::font_metrics::{get_metrics, FontFace};
use crate::layout::geometry::Rect;
use crate::layout::markup::{parse_rich_text, Inline};
use crate::layout::pt_to_mm;

// ────────────────────────────────────────────────────────────────────────────
// Styles
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// Paragraph style. Sizes in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    pub leading: f32,
    pub align: Align,
    pub bold: bool,
    pub italic: bool,
    pub space_after: f32,
}

impl TextStyle {
    /// Question text on the front.
    pub const TITLE: TextStyle = TextStyle {
        font_size: 14.0,
        leading: 17.0,
        align: Align::Center,
        bold: true,
        italic: false,
        space_after: 6.0,
    };

    /// Annotation under the question.
    pub const EXTRA: TextStyle = TextStyle {
        font_size: 9.0,
        leading: 11.0,
        align: Align::Left,
        bold: false,
        italic: true,
        space_after: 0.0,
    };

    /// Body text; also sizes the blank line between title and annotation.
    pub const NORMAL: TextStyle = TextStyle {
        font_size: 10.0,
        leading: 12.0,
        align: Align::Left,
        bold: false,
        italic: false,
        space_after: 0.0,
    };

    /// Answer text on the back.
    pub const BACK: TextStyle = TextStyle {
        font_size: 10.0,
        leading: 12.0,
        align: Align::Center,
        bold: false,
        italic: false,
        space_after: 0.0,
    };

    /// Index label strip.
    pub const INDEX: TextStyle = TextStyle {
        font_size: 8.0,
        leading: 9.6,
        align: Align::Center,
        bold: false,
        italic: false,
        space_after: 0.0,
    };
}

/// A paragraph of rich text (tags already translated from markdown).
#[derive(Debug, Clone)]
pub struct Block {
    pub rich_text: String,
    pub style: TextStyle,
}

impl Block {
    pub fn new(rich_text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            rich_text: rich_text.into(),
            style,
        }
    }
}

/// Region text may occupy. Paddings are millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowFrame {
    pub rect: Rect,
    pub pad_left: f32,
    pub pad_right: f32,
    pub pad_top: f32,
    pub pad_bottom: f32,
}

impl FlowFrame {
    pub fn new(rect: Rect, pad_x: f32, pad_y: f32) -> Self {
        Self {
            rect,
            pad_left: pad_x,
            pad_right: pad_x,
            pad_top: pad_y,
            pad_bottom: pad_y,
        }
    }

    fn inner_left(&self) -> f32 {
        self.rect.x + self.pad_left
    }

    fn inner_width(&self) -> f32 {
        (self.rect.width - self.pad_left - self.pad_right).max(0.0)
    }

    fn inner_top(&self) -> f32 {
        self.rect.top() - self.pad_top
    }

    fn inner_bottom(&self) -> f32 {
        self.rect.y + self.pad_bottom
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Output
// ────────────────────────────────────────────────────────────────────────────

/// A single-style run of text placed on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedFragment {
    pub x: f32,
    pub baseline: f32,
    /// Rendered width in millimetres.
    pub width: f32,
    pub text: String,
    pub face: FontFace,
    pub font_size: f32,
    /// Underline stroke length in millimetres, measured from `x`. Longer than
    /// `width` when the underline runs on through the following space.
    pub underline: Option<f32>,
}

// ────────────────────────────────────────────────────────────────────────────
// Word building
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
struct Piece {
    text: String,
    face: FontFace,
    underline: bool,
}

/// A word is the unit of wrapping; it may mix faces (e.g. `**bo**ld`).
#[derive(Debug, Clone, Default, PartialEq)]
struct Word {
    pieces: Vec<Piece>,
}

impl Word {
    fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    fn push_char(&mut self, c: char, face: FontFace, underline: bool) {
        match self.pieces.last_mut() {
            Some(last) if last.face == face && last.underline == underline => last.text.push(c),
            _ => self.pieces.push(Piece {
                text: c.to_string(),
                face,
                underline,
            }),
        }
    }

    fn width_mm(&self, font_size: f32) -> f32 {
        self.pieces
            .iter()
            .map(|p| get_metrics(p.face).measure_str(&p.text) * pt_to_mm(font_size))
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(Word),
    Break,
}

fn tokenize(rich_text: &str, style: &TextStyle) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = Word::default();

    for inline in parse_rich_text(rich_text) {
        match inline {
            Inline::LineBreak => {
                if !current.is_empty() {
                    tokens.push(Token::Word(std::mem::take(&mut current)));
                }
                tokens.push(Token::Break);
            }
            Inline::Text(span) => {
                let face = FontFace::from_flags(style.bold || span.bold, style.italic || span.italic);
                for c in span.text.chars() {
                    if c.is_whitespace() {
                        if !current.is_empty() {
                            tokens.push(Token::Word(std::mem::take(&mut current)));
                        }
                    } else {
                        current.push_char(c, face, span.underline);
                    }
                }
            }
        }
    }
    if !current.is_empty() {
        tokens.push(Token::Word(current));
    }
    tokens
}

/// Splits a word that is wider than a whole line into line-sized chunks.
fn hard_break(word: Word, max_width: f32, font_size: f32) -> Vec<Word> {
    let scale = pt_to_mm(font_size);
    let mut chunks = Vec::new();
    let mut current = Word::default();
    let mut width = 0.0_f32;

    for piece in word.pieces {
        let metrics = get_metrics(piece.face);
        for c in piece.text.chars() {
            let w = metrics.char_width(c) * scale;
            if !current.is_empty() && width + w > max_width {
                chunks.push(std::mem::take(&mut current));
                width = 0.0;
            }
            current.push_char(c, piece.face, piece.underline);
            width += w;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

// ────────────────────────────────────────────────────────────────────────────
// Wrapping
// ────────────────────────────────────────────────────────────────────────────

/// Greedy word-wrap. An empty line is kept for every explicit break.
fn wrap(tokens: Vec<Token>, style: &TextStyle, max_width: f32) -> Vec<Vec<Word>> {
    let space = get_metrics(FontFace::from_flags(style.bold, style.italic)).space_width
        * pt_to_mm(style.font_size);
    let mut lines: Vec<Vec<Word>> = Vec::new();
    let mut line: Vec<Word> = Vec::new();
    let mut line_width = 0.0_f32;

    for token in tokens {
        let word = match token {
            Token::Break => {
                lines.push(std::mem::take(&mut line));
                line_width = 0.0;
                continue;
            }
            Token::Word(word) => word,
        };

        let pieces = if word.width_mm(style.font_size) > max_width {
            hard_break(word, max_width, style.font_size)
        } else {
            vec![word]
        };

        for word in pieces {
            let word_w = word.width_mm(style.font_size);
            let space_w = if line.is_empty() { 0.0 } else { space };
            if !line.is_empty() && line_width + space_w + word_w > max_width {
                lines.push(std::mem::take(&mut line));
                line_width = word_w;
            } else {
                line_width += space_w + word_w;
            }
            line.push(word);
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn line_width(line: &[Word], style: &TextStyle, space: f32) -> f32 {
    let words: f32 = line.iter().map(|w| w.width_mm(style.font_size)).sum();
    words + space * line.len().saturating_sub(1) as f32
}

// ────────────────────────────────────────────────────────────────────────────
// Flow
// ────────────────────────────────────────────────────────────────────────────

/// Flows `blocks` top-down into `frame`.
///
/// Stops at the first line that does not fit; everything after it is clipped.
pub fn flow_blocks(blocks: &[Block], frame: &FlowFrame) -> Vec<PlacedFragment> {
    let mut placed = Vec::new();
    let left = frame.inner_left();
    let width = frame.inner_width();
    let bottom = frame.inner_bottom();
    let mut cursor = frame.inner_top();

    if width <= 0.0 {
        return placed;
    }

    for block in blocks {
        let style = &block.style;
        let leading = pt_to_mm(style.leading);
        let space = get_metrics(FontFace::from_flags(style.bold, style.italic)).space_width
            * pt_to_mm(style.font_size);
        let lines = wrap(tokenize(&block.rich_text, style), style, width);

        for line in lines {
            if cursor - leading < bottom - 1e-4 {
                return placed;
            }
            let ascent = get_metrics(FontFace::from_flags(style.bold, style.italic)).ascent;
            let baseline = cursor - pt_to_mm(style.font_size) * ascent;
            let offset = match style.align {
                Align::Left => 0.0,
                Align::Center => ((width - line_width(&line, style, space)) / 2.0).max(0.0),
            };

            let mut x = left + offset;
            for (i, word) in line.iter().enumerate() {
                if i > 0 {
                    let continues = word.pieces.first().is_some_and(|p| p.underline);
                    if let Some(prev) = placed.last_mut().filter(|_| continues) {
                        if let Some(len) = prev.underline.as_mut() {
                            *len += space;
                        }
                    }
                    x += space;
                }
                for piece in &word.pieces {
                    let piece_width =
                        get_metrics(piece.face).measure_str(&piece.text) * pt_to_mm(style.font_size);
                    placed.push(PlacedFragment {
                        x,
                        baseline,
                        width: piece_width,
                        text: piece.text.clone(),
                        face: piece.face,
                        font_size: style.font_size,
                        underline: piece.underline.then_some(piece_width),
                    });
                    x += piece_width;
                }
            }
            cursor -= leading;
        }
        cursor -= pt_to_mm(style.space_after);
    }
    placed
}

/// Draws a single centered line at the bottom of `frame`, cutting characters that
/// would overflow its width. Used for the index label.
pub fn single_line(rich_text: &str, style: &TextStyle, frame: &FlowFrame) -> Vec<PlacedFragment> {
    let width = frame.inner_width();
    let scale = pt_to_mm(style.font_size);
    let face = FontFace::from_flags(style.bold, style.italic);
    let metrics = get_metrics(face);

    let mut text = String::new();
    let mut text_width = 0.0_f32;
    for c in rich_text.trim().chars() {
        let w = metrics.char_width(c) * scale;
        if text_width + w > width {
            break;
        }
        text.push(c);
        text_width += w;
    }
    if text.is_empty() {
        return Vec::new();
    }

    let descent = 0.207 * scale;
    vec![PlacedFragment {
        x: frame.inner_left() + (width - text_width) / 2.0,
        baseline: frame.inner_bottom() + descent,
        width: text_width,
        text,
        face,
        font_size: style.font_size,
        underline: None,
    }]
}

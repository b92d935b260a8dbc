//! Single-face cell renderer.
//!
//! Draws one entry's front or back into one grid cell: a light-gray cutting guide,
//! the text flowed inside a padded frame, and the optional index label along the
//! bottom edge. The label strip is reserved before flowing so the two never overlap.

use crate::layout::geometry::{Face, Rect};
use crate::layout::markup::to_rich_text;
use crate::layout::surface::Surface;
use crate::layout::text_flow::{flow_blocks, single_line, Block, FlowFrame, TextStyle};
use crate::layout::pt_to_mm;
use crate::models::CardEntry;

/// Gray level of the cutting guide.
pub const BORDER_GRAY: f32 = 0.8;
/// Gap between the cutting guide and the text frame, mm.
pub const CONTENT_MARGIN: f32 = 3.0;
/// Horizontal / vertical frame padding, points.
const FRAME_PAD_X_PT: f32 = 5.0;
const FRAME_PAD_Y_PT: f32 = 6.0;
/// Height of the index label strip, mm.
pub const INDEX_STRIP_HEIGHT: f32 = 5.0;
const INDEX_PAD_BOTTOM_PT: f32 = 2.0;

fn front_blocks(entry: &CardEntry) -> Vec<Block> {
    let mut blocks = vec![Block::new(to_rich_text(&entry.front_text), TextStyle::TITLE)];
    if entry.has_extra() {
        blocks.push(Block::new("<br/>", TextStyle::NORMAL));
        blocks.push(Block::new(to_rich_text(&entry.extra_text), TextStyle::EXTRA));
    }
    blocks
}

fn back_blocks(entry: &CardEntry) -> Vec<Block> {
    vec![Block::new(to_rich_text(&entry.back_text), TextStyle::BACK)]
}

pub fn render_cell<S: Surface + ?Sized>(surface: &mut S, entry: &CardEntry, face: Face, cell: Rect) {
    surface.stroke_rect(cell, BORDER_GRAY);

    let content = cell.inset(CONTENT_MARGIN);
    if content.width <= 0.0 || content.height <= 0.0 {
        return;
    }

    let mut text_area = content;
    if entry.has_index() {
        text_area.y += INDEX_STRIP_HEIGHT;
        text_area.height = (text_area.height - INDEX_STRIP_HEIGHT).max(0.0);
    }

    let blocks = match face {
        Face::Front => front_blocks(entry),
        Face::Back => back_blocks(entry),
    };
    let frame = FlowFrame::new(text_area, pt_to_mm(FRAME_PAD_X_PT), pt_to_mm(FRAME_PAD_Y_PT));
    for fragment in flow_blocks(&blocks, &frame) {
        surface.draw_fragment(&fragment);
    }

    if entry.has_index() {
        let strip = FlowFrame {
            rect: Rect {
                height: INDEX_STRIP_HEIGHT.min(content.height),
                ..content
            },
            pad_left: 0.0,
            pad_right: 0.0,
            pad_top: 0.0,
            pad_bottom: pt_to_mm(INDEX_PAD_BOTTOM_PT),
        };
        // Labels are identifiers, not prose: no markup translation.
        for fragment in single_line(&entry.index_label, &TextStyle::INDEX, &strip) {
            surface.draw_fragment(&fragment);
        }
    }
}

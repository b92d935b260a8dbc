//! Pagination: splits the deck into page groups and plans each
//! front page / back page pair.
//!
//! Invariant: `N` entries at `P` cards per page produce exactly `ceil(N / P)` groups
//! and `2 * ceil(N / P)` physical pages. Only the last group may be short.

use crate::layout::geometry::{place, CellPosition, Face, Geometry};
use crate::models::CardEntry;

/// A batch of consecutive entries printed on one physical sheet.
#[derive(Debug, Clone, Copy)]
pub struct PageGroup<'a> {
    pub index: usize,
    /// Global index of `entries[0]` within the deck.
    pub first_entry: usize,
    pub entries: &'a [CardEntry],
}

/// Iterates the deck as page groups, in order. Never yields an empty group.
pub fn page_groups(
    entries: &[CardEntry],
    cards_per_page: usize,
) -> impl Iterator<Item = PageGroup<'_>> {
    debug_assert!(cards_per_page > 0, "geometry rejects zero-capacity pages");
    entries
        .chunks(cards_per_page.max(1))
        .enumerate()
        .map(move |(index, chunk)| PageGroup {
            index,
            first_entry: index * cards_per_page,
            entries: chunk,
        })
}

pub fn group_count(total_entries: usize, cards_per_page: usize) -> usize {
    if cards_per_page == 0 {
        return 0;
    }
    total_entries.div_ceil(cards_per_page)
}

pub fn physical_page_count(total_entries: usize, cards_per_page: usize) -> usize {
    2 * group_count(total_entries, cards_per_page)
}

/// One entry's face placed on a planned page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedCell {
    /// Index into the full deck.
    pub entry_index: usize,
    pub position: CellPosition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedPage {
    pub face: Face,
    pub group: usize,
    pub cells: Vec<PlannedCell>,
}

fn plan_face(group: &PageGroup<'_>, columns: u32, face: Face) -> PlannedPage {
    // Rows come from the position inside this group, not the running deck index.
    let cells = (0..group.entries.len())
        .map(|i| PlannedCell {
            entry_index: group.first_entry + i,
            position: place(i, columns, face),
        })
        .collect();

    PlannedPage {
        face,
        group: group.index,
        cells,
    }
}

/// Plans every physical page: front, back, front, back, ...
pub fn plan_pages(entries: &[CardEntry], geometry: &Geometry) -> Vec<PlannedPage> {
    let mut pages = Vec::with_capacity(physical_page_count(entries.len(), geometry.cards_per_page));
    for group in page_groups(entries, geometry.cards_per_page) {
        pages.push(plan_face(&group, geometry.columns, Face::Front));
        pages.push(plan_face(&group, geometry.columns, Face::Back));
    }
    pages
}

//! The rendered directory view: a listing plus the user's cursor and
//! selections over its lines.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use crate::listing::Listing;

/// A range of selected lines. `active` is where the cursor sits; `anchor` is
/// where the selection started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Selection {
    pub anchor: usize,
    pub active: usize,
}

impl Selection {
    /// Collapsed selection on a single line
    pub fn at(line: usize) -> Self {
        Self { anchor: line, active: line }
    }

    pub fn new(anchor: usize, active: usize) -> Self {
        Self { anchor, active }
    }

    pub fn lines(&self) -> RangeInclusive<usize> {
        self.anchor.min(self.active)..=self.anchor.max(self.active)
    }

    pub fn contains(&self, line: usize) -> bool {
        self.lines().contains(&line)
    }

    fn clamped(self, len: usize) -> Self {
        let last = len.saturating_sub(1);
        Self {
            anchor: self.anchor.min(last),
            active: self.active.min(last),
        }
    }
}

#[derive(Debug, Clone)]
pub struct View {
    listing: Listing,
    /// Never empty; the first entry is the primary selection
    selections: Vec<Selection>,
    pub scroll_offset: usize,
    /// Lines that fit on screen, set by the renderer
    pub visible_height: usize,
}

impl View {
    pub fn new(listing: Listing) -> Self {
        Self {
            listing,
            selections: vec![Selection::default()],
            scroll_offset: 0,
            visible_height: 0,
        }
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    /// Swap in a fresh render of the same directory, keeping the selections
    /// that still fit.
    pub fn replace_listing(&mut self, listing: Listing) {
        self.listing = listing;
        let selections = std::mem::take(&mut self.selections);
        self.set_selections(&selections);
    }

    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    /// Replace all selections, clamped to the listing. An empty slice resets
    /// to the first line.
    pub fn set_selections(&mut self, selections: &[Selection]) {
        let len = self.listing.len();
        let mut clamped: Vec<Selection> = Vec::with_capacity(selections.len());
        for sel in selections.iter().map(|s| s.clamped(len)) {
            if !clamped.contains(&sel) {
                clamped.push(sel);
            }
        }
        if clamped.is_empty() {
            clamped.push(Selection::default());
        }
        self.selections = clamped;
        self.adjust_scroll();
    }

    /// Line of the primary cursor
    pub fn cursor(&self) -> usize {
        self.selections[0].active
    }

    /// Collapse to a single cursor on `line`
    pub fn set_cursor(&mut self, line: usize) {
        self.set_selections(&[Selection::at(line)]);
    }

    /// Text of the line under the cursor
    pub fn current_line(&self) -> Option<&str> {
        self.listing.line(self.cursor())
    }

    /// Every line covered by any selection, ascending and without duplicates
    pub fn selected_lines(&self) -> Vec<usize> {
        let len = self.listing.len();
        self.selections
            .iter()
            .flat_map(Selection::lines)
            .filter(|&line| line < len)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Text of every selected line
    pub fn selected_texts(&self) -> Vec<String> {
        self.selected_lines()
            .into_iter()
            .filter_map(|i| self.listing.line(i).map(str::to_string))
            .collect()
    }

    pub fn is_selected(&self, line: usize) -> bool {
        self.selections.iter().any(|s| s.contains(line))
    }

    pub fn has_range(&self) -> bool {
        self.selections.len() > 1 || self.selections[0].anchor != self.selections[0].active
    }

    /// Ensure scroll offset keeps cursor visible
    fn adjust_scroll(&mut self) {
        let visible = self.visible_height;
        if visible == 0 {
            return;
        }
        let cursor = self.cursor();
        if cursor < self.scroll_offset {
            self.scroll_offset = cursor;
        } else if cursor >= self.scroll_offset + visible {
            self.scroll_offset = cursor - visible + 1;
        }
    }

    pub fn set_visible_height(&mut self, height: usize) {
        self.visible_height = height;
        self.adjust_scroll();
    }

    pub fn move_up(&mut self) {
        let cursor = self.cursor();
        self.set_cursor(cursor.saturating_sub(1));
    }

    pub fn move_down(&mut self) {
        let cursor = self.cursor();
        self.set_cursor(cursor + 1);
    }

    pub fn page_up(&mut self) {
        let page = self.visible_height.max(1);
        let cursor = self.cursor();
        self.set_cursor(cursor.saturating_sub(page));
    }

    pub fn page_down(&mut self) {
        let page = self.visible_height.max(1);
        let cursor = self.cursor();
        self.set_cursor(cursor + page);
    }

    pub fn move_home(&mut self) {
        self.set_cursor(0);
    }

    pub fn move_end(&mut self) {
        self.set_cursor(self.listing.len().saturating_sub(1));
    }

    /// Grow or shrink the primary selection upwards
    pub fn extend_up(&mut self) {
        let primary = self.selections[0];
        self.selections[0] = Selection::new(primary.anchor, primary.active.saturating_sub(1));
        self.adjust_scroll();
    }

    /// Grow or shrink the primary selection downwards
    pub fn extend_down(&mut self) {
        let primary = self.selections[0];
        let last = self.listing.len().saturating_sub(1);
        self.selections[0] = Selection::new(primary.anchor, (primary.active + 1).min(last));
        self.adjust_scroll();
    }

    /// Drop every selection except a collapsed primary cursor
    pub fn clear_selection(&mut self) {
        let cursor = self.cursor();
        self.set_cursor(cursor);
    }
}

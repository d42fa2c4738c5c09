use crate::search::{PAGE_SIZE, SearchResultItem};
use crate::widget::clean;

/// Transient suggestion rows for the current query.
#[derive(Debug, Clone, Default)]
pub struct AutocompleteList {
    rows: Vec<SearchResultItem>,
    cursor: Option<usize>,
}

impl AutocompleteList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one row per record, up to the page size.
    pub fn render(&mut self, items: Vec<SearchResultItem>) -> usize {
        let room = PAGE_SIZE.saturating_sub(self.rows.len());
        self.rows.extend(items.into_iter().take(room));
        self.cursor = if self.rows.is_empty() { None } else { Some(0) };
        self.rows.len()
    }

    pub fn clear(&mut self) {
        let len = self.rows.len();
        clean(&mut self.rows, 0..len);
        self.cursor = None;
    }

    pub fn rows(&self) -> &[SearchResultItem] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&SearchResultItem> {
        self.rows.get(index)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.rows.is_empty() {
            self.cursor = None;
            return;
        }
        let last = self.rows.len() as isize - 1;
        let cur = self.cursor.unwrap_or(0) as isize;
        self.cursor = Some((cur + delta).clamp(0, last) as usize);
    }
}

use crate::search::SearchResultItem;
use crate::widget::clean;

pub const DEFAULT_SAVED_CAPACITY: usize = 3;

/// A pinned repository, identified by `(name, owner)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedRepo {
    pub name: String,
    pub owner: String,
    pub star_count: u64,
}

impl SavedRepo {
    pub fn same_repo(&self, name: &str, owner: &str) -> bool {
        self.name == name && self.owner == owner
    }
}

impl From<&SearchResultItem> for SavedRepo {
    fn from(item: &SearchResultItem) -> Self {
        Self {
            name: item.name.clone(),
            owner: item.owner.clone(),
            star_count: item.star_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// Added after dropping the oldest entry.
    Evicted(SavedRepo),
    Duplicate,
}

/// Bounded, deduplicated list in insertion order. The oldest entry goes first
/// when a new one does not fit.
#[derive(Debug, Clone)]
pub struct SavedList {
    entries: Vec<SavedRepo>,
    capacity: usize,
    cursor: Option<usize>,
}

impl Default for SavedList {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_SAVED_CAPACITY)
    }
}

impl SavedList {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(1),
            cursor: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains(&self, name: &str, owner: &str) -> bool {
        self.entries.iter().any(|e| e.same_repo(name, owner))
    }

    pub fn add(&mut self, repo: SavedRepo) -> AddOutcome {
        if self.contains(&repo.name, &repo.owner) {
            return AddOutcome::Duplicate;
        }
        let evicted = if self.entries.len() >= self.capacity {
            clean(&mut self.entries, Some(0)).pop()
        } else {
            None
        };
        self.entries.push(repo);
        self.cursor = Some(self.entries.len() - 1);
        match evicted {
            Some(old) => AddOutcome::Evicted(old),
            None => AddOutcome::Added,
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<SavedRepo> {
        let removed = clean(&mut self.entries, Some(index)).pop()?;
        self.cursor = match self.entries.len() {
            0 => None,
            len => Some(self.cursor.unwrap_or(0).min(len - 1)),
        };
        Some(removed)
    }

    pub fn entries(&self) -> &[SavedRepo] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.entries.is_empty() {
            self.cursor = None;
            return;
        }
        let last = self.entries.len() as isize - 1;
        let cur = self.cursor.unwrap_or(0) as isize;
        self.cursor = Some((cur + delta).clamp(0, last) as usize);
    }
}

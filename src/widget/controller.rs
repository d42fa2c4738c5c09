use serde_json::Value;
use tokio::time::Instant;
use tracing::debug;

use crate::error::AppError;
use crate::search::validate_response;
use crate::widget::notice::{
    ALREADY_SAVED, DUPLICATE_NOTICE_DURATION, ERROR_NOTICE_DURATION, NoticeId, error_message,
};
use crate::widget::{
    AddOutcome, AutocompleteList, NoticeAnchor, NoticeBoard, NoticeStyle, SavedList, SavedRepo,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    QueryPending,
    Rendered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Autocomplete,
    Saved,
}

/// A search that passed the guards and is waiting on the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuery {
    pub text: String,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Rendered(usize),
    /// A newer input superseded this response; nothing was drawn.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    Added,
    Evicted(SavedRepo),
    Duplicate,
    /// No selection listener yet, or no row under the cursor.
    Inert,
}

/// All state of one search widget: field text, suggestion rows, saved panel,
/// notices and the pipeline bookkeeping.
#[derive(Debug)]
pub struct SearchWidget {
    input: String,
    previous_text: String,
    generation: u64,
    state: PipelineState,
    focus: Focus,
    autocomplete: AutocompleteList,
    saved: SavedList,
    notices: NoticeBoard,
    selection_attached: bool,
    removal_attached: bool,
}

impl SearchWidget {
    pub fn new(saved_capacity: usize) -> Self {
        Self {
            input: String::new(),
            previous_text: String::new(),
            generation: 0,
            state: PipelineState::Idle,
            focus: Focus::Input,
            autocomplete: AutocompleteList::new(),
            saved: SavedList::with_capacity(saved_capacity),
            notices: NoticeBoard::new(),
            selection_attached: false,
            removal_attached: false,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) -> &str {
        self.input = text.into();
        &self.input
    }

    pub fn push_char(&mut self, c: char) -> &str {
        self.input.push(c);
        &self.input
    }

    pub fn pop_char(&mut self) -> &str {
        self.input.pop();
        &self.input
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
    }

    pub fn autocomplete(&self) -> &AutocompleteList {
        &self.autocomplete
    }

    pub fn autocomplete_mut(&mut self) -> &mut AutocompleteList {
        &mut self.autocomplete
    }

    pub fn saved(&self) -> &SavedList {
        &self.saved
    }

    pub fn saved_mut(&mut self) -> &mut SavedList {
        &mut self.saved
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn selection_attached(&self) -> bool {
        self.selection_attached
    }

    #[cfg(test)]
    pub fn removal_attached(&self) -> bool {
        self.removal_attached
    }

    #[cfg(test)]
    pub fn previous_text(&self) -> &str {
        &self.previous_text
    }

    /// First half of a refresh, run after the debounce fires.
    ///
    /// Returns the query to send, or `None` when no search is needed.
    pub fn begin_refresh(&mut self, text: &str) -> Option<PendingQuery> {
        if text == self.previous_text {
            debug!(text=%text, "refresh skipped: same text as last processed");
            return None;
        }

        self.autocomplete.clear();
        self.notices.drop_row_notices();
        self.generation += 1;

        if text.chars().all(char::is_whitespace) {
            self.previous_text = text.to_string();
            self.state = PipelineState::Idle;
            if self.focus == Focus::Autocomplete {
                self.focus = Focus::Input;
            }
            debug!("refresh cleared: empty query");
            return None;
        }

        self.previous_text = text.to_string();
        self.state = PipelineState::QueryPending;
        debug!(text=%text, generation=self.generation, "refresh pending");
        Some(PendingQuery {
            text: text.to_string(),
            generation: self.generation,
        })
    }

    pub fn is_current(&self, pending: &PendingQuery) -> bool {
        pending.generation == self.generation
    }

    /// Second half of a refresh: validate and draw the response.
    pub fn finish_refresh(
        &mut self,
        pending: &PendingQuery,
        raw: &Value,
    ) -> Result<RefreshOutcome, AppError> {
        if !self.is_current(pending) {
            debug!(
                text=%pending.text,
                generation=pending.generation,
                current=self.generation,
                "discarding stale search response"
            );
            return Ok(RefreshOutcome::Stale);
        }

        let items = match validate_response(raw) {
            Ok(items) => items,
            Err(e) => {
                self.state = PipelineState::Idle;
                return Err(e);
            }
        };

        let rendered = self.autocomplete.render(items);
        self.state = PipelineState::Rendered;
        if !self.selection_attached {
            self.selection_attached = true;
            debug!("selection listener attached");
        }
        debug!(text=%pending.text, rows=rendered, "autocomplete rendered");
        Ok(RefreshOutcome::Rendered(rendered))
    }

    /// Marks a failed search. Returns false when the failure belongs to a
    /// superseded query and should be dropped.
    pub fn fail_refresh(&mut self, pending: &PendingQuery) -> bool {
        if !self.is_current(pending) {
            debug!(text=%pending.text, "discarding stale search failure");
            return false;
        }
        self.state = PipelineState::Idle;
        true
    }

    /// Pins the autocomplete row at `row` into the saved panel.
    pub fn add_selected(&mut self, row: usize, now: Instant) -> SelectOutcome {
        if !self.selection_attached {
            return SelectOutcome::Inert;
        }
        let Some(item) = self.autocomplete.get(row) else {
            return SelectOutcome::Inert;
        };
        let repo = SavedRepo::from(item);

        if self.saved.contains(&repo.name, &repo.owner) {
            self.notices.notify(
                ALREADY_SAVED,
                NoticeAnchor::AutocompleteRow(row),
                DUPLICATE_NOTICE_DURATION,
                &[NoticeStyle::Info],
                now,
            );
            debug!(name=%repo.name, owner=%repo.owner, "already saved");
            return SelectOutcome::Duplicate;
        }

        if self.saved.is_empty() && !self.removal_attached {
            self.removal_attached = true;
            debug!("removal listener attached");
        }

        debug!(name=%repo.name, owner=%repo.owner, "saving repository");
        match self.saved.add(repo) {
            AddOutcome::Added => SelectOutcome::Added,
            AddOutcome::Evicted(old) => {
                debug!(name=%old.name, owner=%old.owner, "evicted oldest saved repository");
                SelectOutcome::Evicted(old)
            }
            AddOutcome::Duplicate => SelectOutcome::Duplicate,
        }
    }

    /// Saves the row under the autocomplete cursor.
    pub fn add_highlighted(&mut self, now: Instant) -> SelectOutcome {
        match self.autocomplete.cursor() {
            Some(row) => self.add_selected(row, now),
            None => SelectOutcome::Inert,
        }
    }

    pub fn remove_saved(&mut self, index: usize) -> Option<SavedRepo> {
        if !self.removal_attached {
            return None;
        }
        let removed = self.saved.remove(index)?;
        debug!(name=%removed.name, owner=%removed.owner, "removed saved repository");
        if self.saved.is_empty() && self.focus == Focus::Saved {
            self.focus = Focus::Input;
        }
        Some(removed)
    }

    pub fn remove_highlighted(&mut self) -> Option<SavedRepo> {
        let index = self.saved.cursor()?;
        self.remove_saved(index)
    }

    /// Shows the notice for a pipeline failure under the search field.
    pub fn report_error(&mut self, err: &AppError, now: Instant) -> NoticeId {
        debug!(
            kind=?err.kind(),
            server=err.is_server(),
            validate=err.is_validate(),
            status=?err.status(),
            err=%err,
            "reporting pipeline error"
        );
        self.notices.notify(
            error_message(err),
            NoticeAnchor::Form,
            ERROR_NOTICE_DURATION,
            &[NoticeStyle::Form],
            now,
        )
    }

    pub fn sweep_notices(&mut self, now: Instant) -> usize {
        self.notices.sweep(now)
    }
}

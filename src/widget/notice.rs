use std::time::Duration;
use tokio::time::Instant;

use crate::error::AppError;
use crate::widget::clean;

pub const DUPLICATE_NOTICE_DURATION: Duration = Duration::from_millis(1500);
pub const ERROR_NOTICE_DURATION: Duration = Duration::from_millis(3000);

pub const ALREADY_SAVED: &str = "You have already saved this";
pub const CONTACT_SUPPORT: &str = "Something went wrong, please contact support";
pub const SERVICE_UNAVAILABLE: &str = "GitHub is resting, please try again later";
pub const NO_CONNECTION: &str = "No internet connection";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoticeId(u64);

/// Where a notice is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeAnchor {
    Form,
    AutocompleteRow(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeStyle {
    Form,
    Info,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: NoticeId,
    pub text: String,
    pub anchor: NoticeAnchor,
    pub styles: Vec<NoticeStyle>,
    pub expires_at: Instant,
}

impl Notice {
    pub fn has_style(&self, style: NoticeStyle) -> bool {
        self.styles.contains(&style)
    }
}

/// Live notices, each removing itself once its duration has passed.
#[derive(Debug, Default)]
pub struct NoticeBoard {
    next_id: u64,
    notices: Vec<Notice>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(
        &mut self,
        message: impl Into<String>,
        anchor: NoticeAnchor,
        duration: Duration,
        styles: &[NoticeStyle],
        now: Instant,
    ) -> NoticeId {
        let id = NoticeId(self.next_id);
        self.next_id += 1;
        self.notices.push(Notice {
            id,
            text: message.into(),
            anchor,
            styles: styles.to_vec(),
            expires_at: now + duration,
        });
        id
    }

    /// Drops expired notices; returns how many went away.
    pub fn sweep(&mut self, now: Instant) -> usize {
        let expired: Vec<usize> = self
            .notices
            .iter()
            .enumerate()
            .filter(|(_, n)| n.expires_at <= now)
            .map(|(i, _)| i)
            .collect();
        clean(&mut self.notices, expired).len()
    }

    /// Row notices point at autocomplete rows that are about to disappear.
    pub fn drop_row_notices(&mut self) {
        self.notices
            .retain(|n| !matches!(n.anchor, NoticeAnchor::AutocompleteRow(_)));
    }

    pub fn anchored(&self, anchor: NoticeAnchor) -> impl Iterator<Item = &Notice> {
        self.notices.iter().filter(move |n| n.anchor == anchor)
    }

    pub fn all(&self) -> &[Notice] {
        &self.notices
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}

/// User-facing text for a pipeline failure.
pub fn error_message(err: &AppError) -> &'static str {
    match err {
        AppError::Server { status, .. } => match status {
            500..=599 => SERVICE_UNAVAILABLE,
            // 4xx and anything unexpected.
            _ => CONTACT_SUPPORT,
        },
        AppError::Offline => NO_CONNECTION,
        AppError::Validate { .. } | AppError::DataMiss { .. } => CONTACT_SUPPORT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::error::JsonKind;

    #[test]
    fn error_messages_follow_taxonomy() {
        assert_eq!(error_message(&AppError::server(404)), CONTACT_SUPPORT);
        assert_eq!(error_message(&AppError::server(403)), CONTACT_SUPPORT);
        assert_eq!(error_message(&AppError::server(503)), SERVICE_UNAVAILABLE);
        assert_eq!(error_message(&AppError::server(500)), SERVICE_UNAVAILABLE);
        assert_eq!(error_message(&AppError::Offline), NO_CONNECTION);
        assert_eq!(
            error_message(&AppError::data_miss("items")),
            CONTACT_SUPPORT
        );
        assert_eq!(
            error_message(&AppError::validate("name", &json!(1), JsonKind::String)),
            CONTACT_SUPPORT
        );
    }

    #[test]
    fn notices_expire_after_their_duration() {
        let mut board = NoticeBoard::new();
        let t0 = Instant::now();
        board.notify(
            ALREADY_SAVED,
            NoticeAnchor::AutocompleteRow(2),
            DUPLICATE_NOTICE_DURATION,
            &[NoticeStyle::Info],
            t0,
        );
        board.notify(
            NO_CONNECTION,
            NoticeAnchor::Form,
            ERROR_NOTICE_DURATION,
            &[NoticeStyle::Form],
            t0,
        );

        assert_eq!(board.sweep(t0 + Duration::from_millis(1499)), 0);
        assert_eq!(board.sweep(t0 + Duration::from_millis(1500)), 1);
        assert_eq!(board.anchored(NoticeAnchor::Form).count(), 1);
        assert_eq!(board.sweep(t0 + Duration::from_millis(3000)), 1);
        assert!(board.is_empty());
    }

    #[test]
    fn ids_are_unique() {
        let mut board = NoticeBoard::new();
        let now = Instant::now();
        let a = board.notify("a", NoticeAnchor::Form, ERROR_NOTICE_DURATION, &[], now);
        let b = board.notify("b", NoticeAnchor::Form, ERROR_NOTICE_DURATION, &[], now);
        assert_ne!(a, b);
        assert!(board.all()[1].styles.is_empty());
    }
}

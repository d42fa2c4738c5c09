use unicode_width::UnicodeWidthChar;

use crate::search::SearchResultItem;
use crate::widget::{Focus, NoticeAnchor, NoticeStyle, PipelineState, SavedRepo, SearchWidget};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowPlan {
    pub label: String,
    pub selected: bool,
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticePlan {
    pub text: String,
    pub form_style: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPlan {
    pub header: String,
    pub input_line: String,
    pub focus: Focus,
    pub form_notices: Vec<NoticePlan>,
    pub autocomplete_rows: Vec<RowPlan>,
    pub saved_rows: Vec<RowPlan>,
    pub saved_title: String,
    pub footer: String,
}

pub fn truncate_display(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let mut width = 0usize;
    let mut out = String::new();
    for ch in s.chars() {
        let ch_w = ch.width().unwrap_or(0);
        if ch_w == 0 {
            out.push(ch);
            continue;
        }
        if width + ch_w > max {
            break;
        }
        out.push(ch);
        width += ch_w;
    }
    out
}

pub fn row_label(item: &SearchResultItem) -> String {
    format!("{} — {}  ★ {}", item.name, item.owner, item.star_count)
}

pub fn saved_label(repo: &SavedRepo) -> String {
    format!(
        "Name: {}  Owner: {}  Stars: {}  [x]",
        repo.name, repo.owner, repo.star_count
    )
}

fn footer_hint(focus: Focus) -> &'static str {
    match focus {
        Focus::Input => "type to search · ↓/Tab rows · Enter save · Esc quit",
        Focus::Autocomplete => "↑/↓ move · Enter save · Tab saved · Esc back",
        Focus::Saved => "↑/↓ move · Del/x remove · Tab/Esc back",
    }
}

/// Everything the view needs, computed from widget state for a given width.
pub fn build_render_plan(title: &str, widget: &SearchWidget, w: u16) -> RenderPlan {
    let w_usize = w as usize;
    let status_str = match widget.state() {
        PipelineState::Idle => "Idle",
        PipelineState::QueryPending => "Searching",
        PipelineState::Rendered => "Ready",
    };
    let header = truncate_display(&format!("{title} — [{status_str}]"), w_usize);

    // Borders take two columns.
    let inner = w_usize.saturating_sub(2);
    let input_line = truncate_display(&format!("> {}", widget.input()), inner);

    let form_notices = widget
        .notices()
        .anchored(NoticeAnchor::Form)
        .map(|n| NoticePlan {
            text: truncate_display(&n.text, w_usize),
            form_style: n.has_style(NoticeStyle::Form),
        })
        .collect();

    let cursor = match widget.focus() {
        Focus::Autocomplete => widget.autocomplete().cursor(),
        _ => None,
    };
    let autocomplete_rows = widget
        .autocomplete()
        .rows()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let notice = widget
                .notices()
                .anchored(NoticeAnchor::AutocompleteRow(i))
                .last()
                .map(|n| n.text.clone());
            let label = match &notice {
                Some(text) => format!("{}  ← {}", row_label(item), text),
                None => row_label(item),
            };
            RowPlan {
                label: truncate_display(&label, inner),
                selected: cursor == Some(i),
                notice,
            }
        })
        .collect();

    let saved_cursor = match widget.focus() {
        Focus::Saved => widget.saved().cursor(),
        _ => None,
    };
    let saved_rows = widget
        .saved()
        .entries()
        .iter()
        .enumerate()
        .map(|(i, repo)| RowPlan {
            label: truncate_display(&saved_label(repo), inner),
            selected: saved_cursor == Some(i),
            notice: None,
        })
        .collect();
    let saved_title = format!(
        "Saved ({}/{})",
        widget.saved().len(),
        widget.saved().capacity()
    );

    RenderPlan {
        header,
        input_line,
        focus: widget.focus(),
        form_notices,
        autocomplete_rows,
        saved_rows,
        saved_title,
        footer: truncate_display(footer_hint(widget.focus()), w_usize),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::time::Instant;

    fn rendered_widget() -> SearchWidget {
        let mut w = SearchWidget::new(3);
        w.set_input("react");
        let pending = w.begin_refresh("react").unwrap();
        let body = json!({"items": [
            {"name": "react", "owner": {"login": "facebook"}, "stargazers_count": 220000},
            {"name": "preact", "owner": {"login": "preactjs"}, "stargazers_count": 36000},
        ]});
        w.finish_refresh(&pending, &body).unwrap();
        w
    }

    #[test]
    fn truncate_respects_wide_chars() {
        assert_eq!(truncate_display("ab★cd", 3), "ab★");
        assert_eq!(truncate_display("日本語", 4), "日本");
        assert_eq!(truncate_display("abc", 0), "");
    }

    #[test]
    fn plan_lists_rows_and_marks_cursor_only_when_focused() {
        let mut w = rendered_widget();
        let plan = build_render_plan("repo-finder", &w, 80);
        assert_eq!(plan.header, "repo-finder — [Ready]");
        assert_eq!(plan.input_line, "> react");
        assert_eq!(plan.autocomplete_rows.len(), 2);
        assert!(plan.autocomplete_rows.iter().all(|r| !r.selected));
        assert_eq!(
            plan.autocomplete_rows[0].label,
            "react — facebook  ★ 220000"
        );

        w.set_focus(Focus::Autocomplete);
        w.autocomplete_mut().move_cursor(1);
        let plan = build_render_plan("repo-finder", &w, 80);
        assert!(plan.autocomplete_rows[1].selected);
    }

    #[test]
    fn plan_shows_duplicate_notice_next_to_row() {
        let mut w = rendered_widget();
        let now = Instant::now();
        w.add_selected(1, now);
        w.add_selected(1, now);

        let plan = build_render_plan("repo-finder", &w, 120);
        assert_eq!(
            plan.autocomplete_rows[1].notice.as_deref(),
            Some("You have already saved this")
        );
        assert!(plan.autocomplete_rows[1].label.ends_with("← You have already saved this"));
        assert_eq!(plan.saved_rows.len(), 1);
        assert_eq!(plan.saved_title, "Saved (1/3)");
        assert_eq!(
            plan.saved_rows[0].label,
            "Name: preact  Owner: preactjs  Stars: 36000  [x]"
        );
    }

    #[test]
    fn plan_collects_form_notices() {
        let mut w = SearchWidget::new(3);
        w.report_error(&crate::error::AppError::Offline, Instant::now());
        let plan = build_render_plan("repo-finder", &w, 80);
        assert_eq!(
            plan.form_notices,
            vec![NoticePlan {
                text: "No internet connection".into(),
                form_style: true,
            }]
        );
    }
}

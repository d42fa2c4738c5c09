use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::tui::state::{RenderPlan, RowPlan};
use crate::tui::theme::Theme;
use crate::widget::Focus;

pub fn render(f: &mut Frame, plan: &RenderPlan, theme: &Theme) {
    let size = f.area();
    let rows_height = (plan.autocomplete_rows.len().max(1) + 2) as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),                              // Header
            Constraint::Length(3),                              // Search field
            Constraint::Length(plan.form_notices.len() as u16), // Form notices
            Constraint::Length(rows_height),                    // Autocomplete
            Constraint::Min(3),                                 // Saved panel
            Constraint::Length(1),                              // Footer
        ])
        .split(size);

    f.render_widget(
        Paragraph::new(plan.header.as_str()).style(theme.header_style),
        chunks[0],
    );

    let input = Paragraph::new(plan.input_line.as_str())
        .style(theme.input_style)
        .block(panel("Search", plan.focus == Focus::Input, theme));
    f.render_widget(input, chunks[1]);

    let notices: Vec<Line> = plan
        .form_notices
        .iter()
        .map(|n| {
            let style = if n.form_style {
                theme.notice_form_style
            } else {
                theme.notice_info_style
            };
            Line::styled(n.text.as_str(), style)
        })
        .collect();
    f.render_widget(Paragraph::new(notices), chunks[2]);

    let rows = List::new(list_items(&plan.autocomplete_rows, theme.row_style, theme))
        .block(panel("Results", plan.focus == Focus::Autocomplete, theme));
    f.render_widget(rows, chunks[3]);

    let saved = List::new(list_items(&plan.saved_rows, theme.saved_style, theme)).block(panel(
        &plan.saved_title,
        plan.focus == Focus::Saved,
        theme,
    ));
    f.render_widget(saved, chunks[4]);

    f.render_widget(
        Paragraph::new(plan.footer.as_str()).style(theme.footer_style),
        chunks[5],
    );
}

fn panel<'a>(title: &'a str, focused: bool, theme: &Theme) -> Block<'a> {
    let block = Block::default().borders(Borders::ALL).title(title);
    if focused {
        block.border_style(theme.focused_border_style)
    } else {
        block
    }
}

fn list_items<'a>(rows: &'a [RowPlan], base: Style, theme: &Theme) -> Vec<ListItem<'a>> {
    rows.iter()
        .map(|row| {
            let style = if row.selected {
                theme.row_selected_style
            } else if row.notice.is_some() {
                theme.notice_info_style
            } else {
                base
            };
            ListItem::new(row.label.as_str()).style(style)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::state::build_render_plan;
    use crate::widget::SearchWidget;
    use ratatui::backend::TestBackend;
    use serde_json::json;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn draws_rows_saved_panel_and_errors() {
        let mut w = SearchWidget::new(3);
        w.set_input("tokio");
        let pending = w.begin_refresh("tokio").unwrap();
        let body = json!({"items": [
            {"name": "tokio", "owner": {"login": "tokio-rs"}, "stargazers_count": 27000},
        ]});
        w.finish_refresh(&pending, &body).unwrap();
        let now = tokio::time::Instant::now();
        w.add_selected(0, now);
        w.report_error(&crate::error::AppError::server(503), now);

        let plan = build_render_plan("repo-finder", &w, 70);
        let mut terminal = Terminal::new(TestBackend::new(70, 16)).unwrap();
        terminal.draw(|f| render(f, &plan, &Theme::dark())).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("> tokio"));
        assert!(text.contains("tokio — tokio-rs"));
        assert!(text.contains("Saved (1/3)"));
        assert!(text.contains("Name: tokio  Owner: tokio-rs  Stars: 27000"));
        assert!(text.contains("GitHub is resting, please try again later"));
    }
}

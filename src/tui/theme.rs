use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub header_style: Style,
    pub input_style: Style,
    pub focused_border_style: Style,
    pub row_style: Style,
    pub row_selected_style: Style,
    pub saved_style: Style,
    pub notice_form_style: Style,
    pub notice_info_style: Style,
    pub footer_style: Style,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            header_style: Style::default().fg(Color::Cyan),
            input_style: Style::default().fg(Color::White),
            focused_border_style: Style::default().fg(Color::Yellow),
            row_style: Style::default().fg(Color::Gray),
            row_selected_style: Style::default().bg(Color::DarkGray).fg(Color::White),
            saved_style: Style::default().fg(Color::Green),
            notice_form_style: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            notice_info_style: Style::default().fg(Color::LightYellow),
            footer_style: Style::default().fg(Color::DarkGray),
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            header_style: Style::default().fg(Color::Blue),
            input_style: Style::default().fg(Color::Black),
            focused_border_style: Style::default().fg(Color::Magenta),
            row_style: Style::default().fg(Color::DarkGray),
            row_selected_style: Style::default().bg(Color::Gray).fg(Color::Black),
            saved_style: Style::default().fg(Color::Green),
            notice_form_style: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            notice_info_style: Style::default().fg(Color::Magenta),
            footer_style: Style::default().fg(Color::Gray),
        }
    }

    /// Unknown names fall back to the dark theme.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_falls_back_to_dark() {
        assert_eq!(Theme::from_name("light").name, "light");
        assert_eq!(Theme::from_name("solarized").name, "dark");
    }
}

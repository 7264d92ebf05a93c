use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
};

/// A titled call-to-action with one button.
pub struct ActionCard<'a> {
    pub title: &'a str,
    pub description: String,
    pub icon: &'a str,
    pub button_text: &'a str,
    pub accent: Color,
    pub is_loading: bool,
    pub disabled: bool,
    pub focused: bool,
    pub spinner: &'a str,
    /// Key that triggers the button, shown next to it.
    pub hotkey: char,
}

impl ActionCard<'_> {
    pub fn is_disabled(&self) -> bool {
        self.disabled || self.is_loading
    }

    pub fn button_label(&self) -> String {
        if self.is_loading {
            format!("{} Processing...", self.spinner)
        } else {
            self.button_text.to_string()
        }
    }
}

impl Widget for ActionCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border = if self.focused {
            Style::default().fg(self.accent)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(Line::from(vec![
                Span::styled(format!(" {} ", self.icon), Style::default().fg(self.accent)),
                Span::styled(
                    format!("{} ", self.title),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]));
        let inner = block.inner(area);
        block.render(area, buf);

        let [desc_area, button_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(inner);

        Paragraph::new(self.description.as_str())
            .fg(Color::Gray)
            .wrap(Wrap { trim: true })
            .render(desc_area, buf);

        let button_style = if self.is_disabled() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
                .fg(Color::Black)
                .bg(self.accent)
                .add_modifier(Modifier::BOLD)
        };
        let label = format!(" [{}] {} ", self.hotkey, self.button_label());
        Paragraph::new(Span::styled(label, button_style))
            .alignment(Alignment::Center)
            .render(button_area, buf);
    }
}

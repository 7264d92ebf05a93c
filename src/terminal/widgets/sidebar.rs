use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

pub const SIDEBAR_WIDTH: u16 = 24;

/// Navigation column. Every entry leads to the dashboard.
pub struct Sidebar<'a> {
    pub user_name: Option<&'a str>,
}

impl Widget for Sidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::RIGHT)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);

        let [logo, nav, bottom] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .areas(inner);

        Paragraph::new(vec![
            Line::from(""),
            Line::from(vec![
                Span::styled(" ✉ ", Style::default().fg(Color::Magenta)),
                Span::styled("MailSync", Style::default().add_modifier(Modifier::BOLD)),
            ]),
        ])
        .render(logo, buf);

        let item = |icon: &'static str, label: &'static str, active: bool| {
            let style = if active {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(vec![Span::raw("  "), Span::styled(format!("{icon}  {label}"), style)])
        };
        Paragraph::new(vec![
            item("▤", "Dashboard", true),
            Line::from(""),
            item("⟳", "Sync", false),
            Line::from(""),
            item("⚙", "Settings", false),
        ])
        .render(nav, buf);

        let mut lines = vec![Line::from(vec![
            Span::styled("  [L] ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled("Logout", Style::default().fg(Color::Gray)),
        ])];
        if let Some(name) = self.user_name {
            lines.insert(
                0,
                Line::from(Span::styled(
                    format!("  {name}"),
                    Style::default().fg(Color::DarkGray),
                )),
            );
        }
        Paragraph::new(lines).render(bottom, buf);
    }
}

/// Splits the screen into the sidebar column and the main area.
pub fn layout(area: Rect) -> (Rect, Rect) {
    let [side, main] =
        Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Fill(1)]).areas(area);
    (side, main)
}

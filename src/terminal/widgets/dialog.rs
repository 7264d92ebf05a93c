use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::dashboard::{Notice, PendingDelete};
use crate::domain::stats::group_thousands;

/// A rectangle of the given size centred in `area`.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}

pub struct ConfirmDialog<'a> {
    pub pending: &'a PendingDelete,
}

impl Widget for ConfirmDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered(area, 60.min(area.width), 9.min(area.height));
        Clear.render(popup, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(Color::Red))
            .title(" Remove sender ");

        Paragraph::new(vec![
            Line::from(format!(
                "Delete all {} emails from:",
                group_thousands(self.pending.count)
            )),
            Line::from(""),
            Line::from(Span::styled(
                self.pending.sender.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("[y]", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                Span::raw(" delete    "),
                Span::styled("[n]", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" cancel"),
            ]),
        ])
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(popup, buf);
    }
}

pub struct NoticeBanner<'a> {
    pub notice: &'a Notice,
}

impl Widget for NoticeBanner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (title, message, color) = match self.notice {
            Notice::Info(m) => (" Done ", m.as_str(), Color::Green),
            Notice::Error(m) => (" Error ", m.as_str(), Color::Red),
        };
        let popup = centered(area, 64.min(area.width), 6.min(area.height));
        Clear.render(popup, buf);

        Paragraph::new(vec![
            Line::from(message),
            Line::from(""),
            Line::from(Span::styled(
                "press Esc or Enter to dismiss",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color))
                .title(title),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(popup, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_names_sender_and_count() {
        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        let pending = PendingDelete {
            sender: "news@x.com".into(),
            count: 1500,
        };
        ConfirmDialog { pending: &pending }.render(area, &mut buf);

        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Delete all 1,500 emails from:"));
        assert!(text.contains("news@x.com"));
    }

    #[test]
    fn centered_fits_inside() {
        let r = centered(Rect::new(0, 0, 100, 40), 60, 10);
        assert_eq!((r.x, r.y, r.width, r.height), (20, 15, 60, 10));
    }
}

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
};

use crate::dashboard::SyncOutcome;
use crate::domain::stats::{SyncStats, group_thousands};

pub struct SyncResults<'a> {
    pub is_loading: bool,
    pub outcome: Option<&'a SyncOutcome>,
    pub spinner: &'a str,
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Blue))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().add_modifier(Modifier::BOLD),
        ))
}

impl Widget for SyncResults<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.is_loading {
            let block = panel("Syncing your inbox...");
            let inner = block.inner(area);
            block.render(area, buf);
            Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(self.spinner, Style::default().fg(Color::Blue))),
                Line::from(""),
                Line::from(
                    "This may take a few moments depending on the size of your inbox"
                        .fg(Color::Gray),
                ),
            ])
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
            return;
        }

        match self.outcome {
            None => {}
            Some(SyncOutcome::Failure(message)) => {
                let block = panel("Sync Failed").border_style(Style::default().fg(Color::Red));
                let inner = block.inner(area);
                block.render(area, buf);
                Paragraph::new(message.as_str())
                    .fg(Color::Red)
                    .wrap(Wrap { trim: true })
                    .render(inner, buf);
            }
            Some(SyncOutcome::Success(stats)) => render_stats(stats, area, buf),
        }
    }
}

fn render_stats(stats: &SyncStats, area: Rect, buf: &mut Buffer) {
    let block = panel("Sync Results");
    let inner = block.inner(area);
    block.render(area, buf);

    let [metrics_area, summary_area] =
        Layout::vertical([Constraint::Length(4), Constraint::Fill(1)]).areas(inner);
    let [a, b, c] = Layout::horizontal([Constraint::Ratio(1, 3); 3]).areas(metrics_area);

    metric("✉ Emails Processed", group_thousands(stats.processed), Color::Blue).render(a, buf);
    metric("✔ New Emails Inserted", group_thousands(stats.inserted), Color::Green).render(b, buf);
    metric(
        "◷ Time Elapsed",
        format!("{:.2}s", stats.time_elapsed),
        Color::Magenta,
    )
    .render(c, buf);

    Paragraph::new(vec![
        Line::from(Span::styled(
            "Sync Summary",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(stats.summary(), Style::default().fg(Color::Gray))),
    ])
    .wrap(Wrap { trim: true })
    .render(summary_area, buf);
}

fn metric(label: &str, value: String, accent: Color) -> Paragraph<'_> {
    Paragraph::new(vec![
        Line::from(Span::styled(label, Style::default().fg(accent))),
        Line::from(Span::styled(
            value,
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ])
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)))
}

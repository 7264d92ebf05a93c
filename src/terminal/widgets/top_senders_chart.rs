use std::time::Duration;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
};

use crate::domain::stats::{RankedSender, group_thousands};

/// Delay before row `i` starts growing is `i * ROW_DELAY`.
pub const ROW_DELAY: Duration = Duration::from_millis(100);
/// Time a bar takes to grow from empty to its full length.
pub const GROW_TIME: Duration = Duration::from_millis(1000);

pub struct TopSendersChart<'a> {
    pub is_loading: bool,
    pub rows: &'a [RankedSender],
    pub selected: usize,
    /// Time since the rows arrived; `None` draws bars at full length.
    pub elapsed: Option<Duration>,
    pub spinner: &'a str,
}

/// Bar length at `elapsed` for a row whose final length is `share`.
pub fn animated_share(share: f64, row: usize, elapsed: Duration) -> f64 {
    let start = ROW_DELAY * row as u32;
    let Some(running) = elapsed.checked_sub(start) else {
        return 0.0;
    };
    let t = (running.as_secs_f64() / GROW_TIME.as_secs_f64()).min(1.0);
    // cubic ease-out
    share * (1.0 - (1.0 - t).powi(3))
}

/// Bar colour for row `i`: hue steps from blue towards purple.
fn bar_color(row: usize) -> Color {
    let hue = (210.0 + row as f64 * 15.0) % 360.0;
    let (r, g, b) = hsl_to_rgb(hue, 0.7, 0.5);
    Color::Rgb(r, g, b)
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_u8(r), to_u8(g), to_u8(b))
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Green))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().add_modifier(Modifier::BOLD),
        ))
}

impl Widget for TopSendersChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.is_loading {
            let block = panel("Loading top senders...");
            let inner = block.inner(area);
            block.render(area, buf);
            Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(self.spinner, Style::default().fg(Color::Green))),
                Line::from(""),
                Line::from("Analyzing your email patterns".fg(Color::Gray)),
            ])
            .alignment(Alignment::Center)
            .render(inner, buf);
            return;
        }

        if self.rows.is_empty() {
            let block = panel("No Data Available");
            let inner = block.inner(area);
            block.render(area, buf);
            Paragraph::new(
                "There's no sender data to display. Try syncing your inbox first.".fg(Color::Gray),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
            return;
        }

        let block = panel("Top Email Senders");
        let inner = block.inner(area);
        block.render(area, buf);

        // label line + bar line + spacer per row
        let bar_width = inner.width.saturating_sub(2) as f64;
        let mut lines = Vec::with_capacity(self.rows.len() * 3);

        for (i, row) in self.rows.iter().enumerate() {
            let selected = i == self.selected;
            let marker = if selected { "➜ " } else { "  " };
            let name_style = if selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            lines.push(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Yellow)),
                Span::styled(row.email.clone(), name_style),
                Span::raw("  "),
                Span::styled(
                    format!("{} emails", group_thousands(row.count)),
                    Style::default().fg(Color::Gray),
                ),
                Span::raw("  "),
                Span::styled(
                    if selected { "[x] Remove" } else { "" },
                    Style::default().fg(Color::Red),
                ),
            ]));

            let share = match self.elapsed {
                Some(elapsed) => animated_share(row.share, i, elapsed),
                None => row.share,
            };
            let filled = (bar_width * share).round() as usize;
            let empty = (bar_width as usize).saturating_sub(filled);
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled("█".repeat(filled), Style::default().fg(bar_color(i))),
                Span::styled("░".repeat(empty), Style::default().fg(Color::DarkGray)),
            ]));
            lines.push(Line::from(""));
        }

        // keep the highlighted row on screen
        let per_row = 3u16;
        let visible_rows = (inner.height / per_row).max(1);
        let scroll = (self.selected as u16 + 1).saturating_sub(visible_rows) * per_row;

        Paragraph::new(lines).scroll((scroll, 0)).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stats::{TopSender, rank_senders};

    #[test]
    fn bars_start_empty_and_stagger() {
        assert_eq!(animated_share(1.0, 0, Duration::ZERO), 0.0);
        assert_eq!(animated_share(1.0, 3, Duration::from_millis(250)), 0.0);
        assert!(animated_share(1.0, 0, Duration::from_millis(250)) > 0.0);
    }

    #[test]
    fn bars_settle_at_their_share() {
        let done = ROW_DELAY * 9 + GROW_TIME;
        assert_eq!(animated_share(0.4, 9, done), 0.4);
        assert_eq!(animated_share(1.0, 0, Duration::from_secs(10)), 1.0);
    }

    #[test]
    fn growth_is_monotonic() {
        let mut last = 0.0;
        for ms in (0..=1500).step_by(50) {
            let v = animated_share(0.8, 2, Duration::from_millis(ms));
            assert!(v >= last);
            last = v;
        }
    }

    #[test]
    fn hue_conversion_matches_reference_points() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), (255, 0, 0));
        assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), (0, 255, 0));
        assert_eq!(hsl_to_rgb(240.0, 1.0, 0.5), (0, 0, 255));
    }

    fn rendered(chart: TopSendersChart<'_>, height: u16) -> String {
        let area = Rect::new(0, 0, 60, height);
        let mut buf = Buffer::empty(area);
        chart.render(area, &mut buf);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn empty_list_shows_hint() {
        let text = rendered(
            TopSendersChart {
                is_loading: false,
                rows: &[],
                selected: 0,
                elapsed: None,
                spinner: "⠋",
            },
            8,
        );
        assert!(text.contains("No Data Available"));
    }

    #[test]
    fn renders_ranked_rows() {
        let rows = rank_senders(&[
            TopSender {
                email: "a@x.com".into(),
                count: 5,
            },
            TopSender {
                email: "b@x.com".into(),
                count: 9,
            },
        ]);
        let text = rendered(
            TopSendersChart {
                is_loading: false,
                rows: &rows,
                selected: 0,
                elapsed: None,
                spinner: "⠋",
            },
            12,
        );
        let b = text.find("b@x.com").unwrap();
        let a = text.find("a@x.com").unwrap();
        assert!(b < a);
        assert!(text.contains("9 emails"));
        assert!(text.contains("Remove"));
    }
}

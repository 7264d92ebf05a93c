use std::time::Instant;

use chrono::Local;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use crate::auth::oauth::RedirectStatus;
use crate::dashboard::View;
use crate::router::Route;
use crate::terminal::state::{App, AuthForm, Card};
use crate::terminal::widgets::{
    self, ActionCard, ConfirmDialog, NoticeBanner, Sidebar, SyncResults, TopSendersChart,
    dialog::centered, sidebar,
};

pub fn render(f: &mut Frame, app: &App) {
    match app.route {
        Route::Landing => render_landing(f),
        Route::Login | Route::Register => {
            let form = if app.route == Route::Login {
                &app.login_form
            } else {
                &app.register_form
            };
            render_form(f, form, widgets::spinner(app.tick));
        }
        Route::Redirect => render_redirect(f, app),
        Route::Dashboard => render_dashboard(f, app),
    }
}

fn key(k: &str) -> Span<'_> {
    Span::styled(k, Style::default().add_modifier(Modifier::BOLD))
}

fn render_landing(f: &mut Frame) {
    let [nav, hero, features, footer] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(9),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .areas(f.area());

    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("✉ ", Style::default().fg(Color::Indexed(99))),
            Span::styled("MailSync", Style::default().add_modifier(Modifier::BOLD)),
        ])),
        nav,
    );

    f.render_widget(
        Paragraph::new(vec![
            Line::from(vec![
                Span::styled("Take Control of Your ", Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(
                    "Email Analytics",
                    Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(
                "Understand your email patterns, identify top senders, and optimize your inbox with powerful analytics and insights."
                    .fg(Color::Gray),
            ),
            Line::from(""),
            Line::from(vec![key("[g]"), Span::raw(" Start Free Trial  →")]),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true }),
        hero,
    );

    let cols: [Rect; 3] = Layout::horizontal([Constraint::Ratio(1, 3); 3]).areas(features);
    let feature = |icon: &'static str, title: &'static str, text: &'static str| {
        Paragraph::new(vec![
            Line::from(Span::styled(icon, Style::default().fg(Color::Indexed(99)))),
            Line::from(Span::styled(title, Style::default().add_modifier(Modifier::BOLD))),
            Line::from(""),
            Line::from(text.fg(Color::Gray)),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
    };
    f.render_widget(
        feature(
            "✉",
            "Email Sync",
            "Seamlessly sync your inbox and get real-time analytics about your email usage.",
        ),
        cols[0],
    );
    f.render_widget(
        feature(
            "⚡",
            "Instant Analysis",
            "Get immediate insights about your email patterns and communication habits.",
        ),
        cols[1],
    );
    f.render_widget(
        feature(
            "⛨",
            "Secure & Private",
            "Your data is encrypted and protected. We prioritize your privacy and security.",
        ),
        cols[2],
    );

    f.render_widget(
        Paragraph::new(Line::from(vec![
            key("l"),
            Span::raw(" login  "),
            key("r"),
            Span::raw(" register  "),
            key("d"),
            Span::raw(" dashboard  "),
            key("q"),
            Span::raw(" quit"),
        ])),
        footer,
    );
}

fn render_form(f: &mut Frame, form: &AuthForm, spinner: &str) {
    let height = form.fields.len() as u16 * 3 + 6;
    let area = centered(f.area(), 50.min(f.area().width), height.min(f.area().height));

    let title = match form.action {
        crate::auth::AuthAction::Login => " Login ",
        crate::auth::AuthAction::Register => " Create your account ",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Magenta))
        .title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut constraints: Vec<Constraint> = form.fields.iter().map(|_| Constraint::Length(3)).collect();
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Length(1));
    let rows = Layout::vertical(constraints).split(inner);

    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focused;
        let shown = if field.secret {
            "•".repeat(field.value.chars().count())
        } else {
            field.value.clone()
        };
        let cursor = if focused && !form.submitting { "▏" } else { "" };
        let border = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        f.render_widget(
            Paragraph::new(format!("{shown}{cursor}")).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(field.label),
            ),
            rows[i],
        );
    }

    let status = if form.submitting {
        Line::from(Span::styled(
            format!("{spinner} Processing..."),
            Style::default().fg(Color::Magenta),
        ))
    } else if let Some(err) = &form.error {
        Line::from(Span::styled(err.as_str(), Style::default().fg(Color::Red)))
    } else {
        Line::from("")
    };
    f.render_widget(Paragraph::new(status), rows[form.fields.len()]);

    f.render_widget(
        Paragraph::new(Line::from(vec![
            key("Enter"),
            Span::raw(" submit  "),
            key("Tab"),
            Span::raw(" next  "),
            key("F2"),
            Span::raw(" switch form  "),
            key("Esc"),
            Span::raw(" back"),
        ])),
        rows[form.fields.len() + 1],
    );
}

fn render_redirect(f: &mut Frame, app: &App) {
    let area = centered(f.area(), 56.min(f.area().width), 9.min(f.area().height));
    let (icon, color, title, text) = match app.redirect.status {
        RedirectStatus::Loading => (
            widgets::spinner(app.tick),
            Color::Magenta,
            "Processing Authentication",
            "Please wait while we process your request...",
        ),
        RedirectStatus::Success => (
            "✔",
            Color::Green,
            "Authentication Successful",
            "You've successfully connected your Gmail account.",
        ),
        RedirectStatus::Error => (
            "✘",
            Color::Red,
            "Authentication Failed",
            "There was an error connecting your Gmail account.",
        ),
    };
    let mut lines = vec![
        Line::from(Span::styled(icon, Style::default().fg(color))),
        Line::from(""),
        Line::from(Span::styled(title, Style::default().add_modifier(Modifier::BOLD))),
        Line::from(text.fg(Color::Gray)),
    ];
    if app.redirect.status != RedirectStatus::Loading {
        lines.push(Line::from(""));
        lines.push(Line::from("Redirecting to dashboard...".fg(Color::Gray)));
    }
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded)),
        area,
    );
}

fn render_dashboard(f: &mut Frame, app: &App) {
    let (side, main) = sidebar::layout(f.area());
    f.render_widget(
        Sidebar {
            user_name: app.auth.user().map(|u| u.name.as_str()),
        },
        side,
    );

    let d = &app.dashboard;
    let spinner = widgets::spinner(app.tick);

    let [title, cards, switch, results, footer] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(7),
        Constraint::Length(if d.is_connected() { 1 } else { 0 }),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .horizontal_margin(2)
    .vertical_margin(1)
    .areas(main);

    f.render_widget(
        Paragraph::new(Span::styled(
            "Email Analytics Dashboard",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        title,
    );

    let [c0, c1, c2] = Layout::horizontal([Constraint::Ratio(1, 3); 3])
        .spacing(1)
        .areas(cards);

    let connected = d.is_connected();
    f.render_widget(
        ActionCard {
            title: "Connect Gmail",
            description: match d.profile_email() {
                Some(email) => format!("Connected: {email}"),
                None => "Link your Gmail account".to_string(),
            },
            icon: if connected { "✔" } else { "✉" },
            button_text: if connected { "Connected" } else { "Connect" },
            accent: Color::Magenta,
            is_loading: false,
            disabled: connected,
            focused: app.card == Card::Connect,
            spinner,
            hotkey: 'c',
        },
        c0,
    );
    f.render_widget(
        ActionCard {
            title: "Sync Inbox",
            description: match d.last_synced {
                Some(t) => format!(
                    "Last synced: {}",
                    t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
                ),
                None => "Synchronize emails for analysis".to_string(),
            },
            icon: "⟳",
            button_text: "Start Sync",
            accent: Color::Blue,
            is_loading: d.loading_sync,
            disabled: false,
            focused: app.card == Card::Sync,
            spinner,
            hotkey: 's',
        },
        c1,
    );
    f.render_widget(
        ActionCard {
            title: "Top Senders",
            description: "View who emails you most".to_string(),
            icon: "▥",
            button_text: "Show Chart",
            accent: Color::Green,
            is_loading: d.loading_senders,
            disabled: false,
            focused: app.card == Card::TopSenders,
            spinner,
            hotkey: 't',
        },
        c2,
    );

    if connected {
        f.render_widget(
            Paragraph::new(Line::from(vec![
                key("[w]"),
                Span::styled(" ⇄ Switch Gmail account", Style::default().fg(Color::Blue)),
            ])),
            switch,
        );
    }

    match d.view {
        View::None => f.render_widget(
            Paragraph::new("Start a sync or open the top senders chart.".fg(Color::DarkGray)),
            results,
        ),
        View::Sync => f.render_widget(
            SyncResults {
                is_loading: d.loading_sync,
                outcome: d.sync.as_ref(),
                spinner,
            },
            results,
        ),
        View::Senders => {
            let rows = d.ranked();
            f.render_widget(
                TopSendersChart {
                    is_loading: d.loading_senders,
                    rows: &rows,
                    selected: d.selected,
                    elapsed: d.senders_arrived.map(|t| Instant::now().duration_since(t)),
                    spinner,
                },
                results,
            );
        }
    }

    f.render_widget(
        Paragraph::new(Line::from(vec![
            key("←/→"),
            Span::raw(" card  "),
            key("Enter"),
            Span::raw(" run  "),
            key("j/k"),
            Span::raw(" sender  "),
            key("x"),
            Span::raw(" remove  "),
            key("L"),
            Span::raw(" logout  "),
            key("q"),
            Span::raw(" quit"),
        ])),
        footer,
    );

    if let Some(pending) = &d.confirm {
        f.render_widget(ConfirmDialog { pending }, main);
    } else if let Some(notice) = &d.notice {
        f.render_widget(NoticeBanner { notice }, main);
    }
}

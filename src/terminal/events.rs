use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::router::Route;
use crate::terminal::state::{App, Card};

pub fn handle_key(key: KeyEvent, app: &mut App) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit = true;
        return;
    }

    match app.route {
        Route::Landing => handle_landing_keys(key, app),
        Route::Login | Route::Register => handle_form_keys(key, app),
        Route::Redirect => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                app.navigate(Route::Landing);
            }
        }
        Route::Dashboard => handle_dashboard_keys(key, app),
    }
}

fn handle_landing_keys(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char('l') => app.navigate(Route::Login),
        KeyCode::Char('r') | KeyCode::Char('g') | KeyCode::Enter => app.navigate(Route::Register),
        KeyCode::Char('d') => app.navigate(Route::Dashboard),
        _ => {}
    }
}

fn handle_form_keys(key: KeyEvent, app: &mut App) {
    let route = app.route;
    match key.code {
        KeyCode::Esc => {
            app.navigate(Route::Landing);
            return;
        }
        KeyCode::Enter => {
            app.submit_form();
            return;
        }
        // switch between the two forms
        KeyCode::F(2) => {
            let other = if route == Route::Login {
                Route::Register
            } else {
                Route::Login
            };
            app.navigate(other);
            return;
        }
        _ => {}
    }

    let Some(form) = app.form_mut() else {
        return;
    };
    if form.submitting {
        return;
    }
    match key.code {
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Backspace => form.pop_char(),
        KeyCode::Char(c) => form.push_char(c),
        _ => {}
    }
}

fn handle_dashboard_keys(key: KeyEvent, app: &mut App) {
    // modal layers first: confirmation, then notices
    if app.dashboard.confirm.is_some() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_remove(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.dashboard.cancel_remove(),
            _ => {}
        }
        return;
    }
    if app.dashboard.notice.is_some() {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
            app.dashboard.dismiss_notice();
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit = true,
        KeyCode::Char('L') => app.logout(),

        KeyCode::Left | KeyCode::Char('h') => {
            let i = (app.card as usize + Card::ALL.len() - 1) % Card::ALL.len();
            app.card = Card::ALL[i];
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => {
            let i = (app.card as usize + 1) % Card::ALL.len();
            app.card = Card::ALL[i];
        }
        KeyCode::Enter => app.activate(app.card),

        KeyCode::Char('c') => app.activate(Card::Connect),
        KeyCode::Char('s') => app.activate(Card::Sync),
        KeyCode::Char('t') => app.activate(Card::TopSenders),
        KeyCode::Char('w') => app.switch_account(),

        KeyCode::Down | KeyCode::Char('j') => app.dashboard.move_selection(1),
        KeyCode::Up | KeyCode::Char('k') => app.dashboard.move_selection(-1),
        KeyCode::Char('x') | KeyCode::Delete => {
            app.dashboard.request_remove();
        }
        _ => {}
    }
}

pub mod events;
pub mod state;
pub mod ui;
pub mod widgets;

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;

use state::App;

const TICK: Duration = Duration::from_millis(50);

pub fn run_tui(app: &mut App) -> Result<()> {
    let terminal = ratatui::init();
    let result = run(terminal, app);

    ratatui::restore();

    result
}

fn run(mut terminal: DefaultTerminal, app: &mut App) -> Result<()> {
    while !app.quit {
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(TICK)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            events::handle_key(key, app);
        }

        for stamped in app.worker.drain() {
            app.receive(stamped);
        }
        app.on_tick(Instant::now());
    }
    Ok(())
}

// src/ui/tui.rs
//! Terminal setup, the event loop, and teardown.

use std::{
    io::{self, Stdout},
    time::{Duration, Instant},
};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, info};

use crate::app::App;

/// Longest wait for input when no display frame is pending, so media events
/// still reach the panel.
const IDLE_POLL: Duration = Duration::from_millis(100);

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Run the player until the user quits. The terminal is restored and the
/// player torn down on every exit path.
pub fn run(app: &mut App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
        disable_raw_mode().ok();
        return Err(e.into());
    }

    let result = Terminal::new(CrosstermBackend::new(stdout))
        .map_err(anyhow::Error::from)
        .and_then(|mut terminal| {
            let looped = event_loop(&mut terminal, app);
            terminal.show_cursor().ok();
            looped
        });

    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture).ok();
    disable_raw_mode().ok();
    app.teardown();
    info!("terminal restored");
    result
}

fn event_loop(terminal: &mut Term, app: &mut App) -> Result<()> {
    terminal.clear()?;

    loop {
        app.process_metadata();
        app.pump();
        app.tick(Instant::now());
        terminal.draw(|f| app.draw(f))?;

        let timeout = app
            .next_deadline()
            .map(|at| at.saturating_duration_since(Instant::now()))
            .map_or(IDLE_POLL, |wait| wait.min(IDLE_POLL));

        if event::poll(timeout)? {
            match event::read()? {
                CEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.on_key(key) {
                        debug!("quit requested");
                        return Ok(());
                    }
                }
                CEvent::Mouse(mouse) => app.on_mouse(mouse),
                _ => {}
            }
        }
    }
}

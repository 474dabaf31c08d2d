use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{poll, read, Event};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::app::{App, Exit};
use crate::handlers::keyboard::handle_key_event;
use crate::worker::Worker;

/// Run the dashboard until the user quits or picks something to launch.
pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    worker: &Worker,
) -> Result<Exit> {
    loop {
        // Fold in finished background jobs
        for result in worker.drain() {
            app.apply(result);
        }

        // Start whatever the last key or result queued
        for job in app.take_jobs() {
            worker.submit(job);
        }

        // Update toast manager (remove expired)
        app.toast_manager.update();

        if let Some(exit) = app.exit.take() {
            return Ok(exit);
        }

        terminal.draw(|f| crate::ui::draw(f, app))?;

        // Short timeout so job results show up promptly
        if poll(Duration::from_millis(50))? {
            match read()? {
                Event::Key(key) => handle_key_event(app, key),
                Event::Resize(_, _) => terminal.autoresize()?,
                _ => {}
            }
        }
    }
}

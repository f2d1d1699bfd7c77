use crossterm::event::{self, Event};
use std::time::Duration;
use tracing::{info, warn};
use weather_core::FetchClient;

use crate::app::App;
use crate::input::{InputAction, handle_key};
use crate::render::draw;
use crate::terminal_guard::setup_terminal;

/// Upper bound on how long a frame waits for input before redrawing.
const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Run the frame loop until the user quits. Blocks the calling thread.
pub fn run(mut app: App, mut fetch: FetchClient) -> anyhow::Result<()> {
    let (mut terminal, guard) = setup_terminal()?;
    info!("render loop started");

    loop {
        while let Some(outcome) = fetch.try_next() {
            app.on_outcome(outcome);
        }

        let view = app.refresh_view();
        terminal.draw(|frame| draw(frame, &app, &view))?;

        if app.should_quit() {
            break;
        }

        if !event::poll(FRAME_INTERVAL)? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if let InputAction::Search(query) = handle_key(&mut app, key) {
                if !fetch.submit(&query) {
                    warn!(query, "fetch worker is gone; search dropped");
                }
            }
        }
    }

    drop(guard);
    info!("render loop stopped");
    Ok(())
}

use std::time::Duration;

use anyhow::Result;
use ratatui::{
    crossterm::{
        self,
        event::{self, Event, KeyEventKind},
    },
    prelude::*,
};

use crate::app::App;
use crate::config::Config;

mod app;
mod commands;
mod config;
mod log_capture;
mod theme;
mod views;

fn main() -> Result<()> {
    let logs = log_capture::init_logger()?;
    let config = Config::load();
    let app = App::new(&config, logs)?;

    initialize_panic_handler();
    startup()?;
    let result = run(app);
    shutdown()?;

    result
}

fn run(mut app: App) -> Result<()> {
    let mut t = Terminal::new(CrosstermBackend::new(std::io::stderr()))?;
    let tick_rate = Duration::from_millis(100);

    while app.running {
        t.draw(|f| views::render(f, &app))?;

        if event::poll(tick_rate)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(&key);
        }

        app.process_messages();
    }

    Ok(())
}

pub fn initialize_panic_handler() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = shutdown();
        original_hook(panic_info);
    }));
}

fn startup() -> Result<()> {
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(std::io::stderr(), crossterm::terminal::EnterAlternateScreen)?;
    Ok(())
}

fn shutdown() -> Result<()> {
    crossterm::execute!(std::io::stderr(), crossterm::terminal::LeaveAlternateScreen)?;
    crossterm::terminal::disable_raw_mode()?;
    Ok(())
}

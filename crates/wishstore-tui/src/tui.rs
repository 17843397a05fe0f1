//! Terminal session: raw mode, alternate screen and the event reader live
//! and die together, and a panic puts the terminal back first.

use std::io::{Stdout, stdout};

use color_eyre::eyre::Result;
use crossterm::{
    ExecutableCommand, cursor,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend};

use crate::event::{Event, EventReader, FrameRates};

pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    events: EventReader,
}

impl Tui {
    /// Take over the terminal and start reading input.
    pub fn start(rates: FrameRates) -> Result<Self> {
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
        terminal::enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?.execute(cursor::Hide)?;
        terminal.clear()?;
        Ok(Self {
            terminal,
            events: EventReader::spawn(rates),
        })
    }

    pub async fn next_event(&mut self) -> Option<Event> {
        self.events.next().await
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        self.events.stop();
        restore();
    }
}

fn restore() {
    let _ = stdout().execute(cursor::Show);
    let _ = stdout().execute(LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

/// Install color-eyre's report hook and a panic hook that restores the
/// terminal before printing. Call before [`Tui::start`].
pub fn install_hooks() -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .display_env_section(false)
        .into_hooks();
    eyre_hook.install()?;

    let panic_hook = panic_hook.into_panic_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore();
        panic_hook(info);
    }));
    Ok(())
}

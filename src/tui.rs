use std::io::{self, Stdout, stdout};
use std::panic;

use crossterm::ExecutableCommand;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::error;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Switches to the alternate screen in raw mode.
///
/// A panic hook is installed first so a panic anywhere in the event loop
/// leaves the user's shell usable and ends up in the log file.
pub fn init() -> io::Result<Tui> {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        error!("panic: {}", info);
        let _ = restore();
        previous(info);
    }));

    stdout().execute(EnterAlternateScreen)?;
    enable_raw_mode()?;
    Terminal::new(CrosstermBackend::new(stdout()))
}

pub fn restore() -> io::Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

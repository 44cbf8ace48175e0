/*
[INPUT]:  Crossterm stdout, terminal raw mode, ratatui backends
[OUTPUT]: Screen that draws either to the real terminal or off-screen
[POS]:    TUI terminal lifecycle guard
[UPDATE]: When terminal setup or headless rendering changes
*/

use std::io;

use anyhow::Result;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, terminal};
use ratatui::Terminal;
use ratatui::backend::{CrosstermBackend, TestBackend};

pub(super) struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    pub(super) fn new() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        let mut stdout = io::stdout();
        let _ = stdout.execute(LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Live terminal, or an in-memory buffer for headless runs.
pub(super) enum Screen {
    Live(TerminalGuard),
    Headless(Terminal<TestBackend>),
}

impl Screen {
    pub(super) fn live() -> Result<Self> {
        Ok(Screen::Live(TerminalGuard::new()?))
    }

    pub(super) fn headless(width: u16, height: u16) -> Result<Self> {
        Ok(Screen::Headless(Terminal::new(TestBackend::new(width, height))?))
    }

    pub(super) fn is_live(&self) -> bool {
        matches!(self, Screen::Live(_))
    }

    pub(super) fn draw<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut ratatui::Frame),
    {
        match self {
            Screen::Live(guard) => {
                guard.terminal.draw(f)?;
            }
            Screen::Headless(terminal) => {
                terminal.draw(f)?;
            }
        }
        Ok(())
    }
}

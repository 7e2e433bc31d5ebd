//! Terminal driver
//!
//! Implements [`Driver`] on top of crossterm and ratatui. Raw mode and the
//! alternate screen are entered on construction and restored on stop or
//! drop, whichever comes first.

use std::io::{self, Stdout};

use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use msghub_app::{App, AppAction, Driver};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::{
    input::{InputState, KeyInput},
    ui,
};

/// Terminal driver errors.
#[derive(Debug, thiserror::Error)]
pub enum TerminalError {
    /// Terminal I/O failed.
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Terminal driver using crossterm for input and ratatui for rendering.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    input_state: InputState,
    restored: bool,
}

impl TerminalDriver {
    /// Take over the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode or the alternate screen can't be entered.
    pub fn new() -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        Ok(Self {
            terminal,
            event_stream: EventStream::new(),
            input_state: InputState::new(),
            restored: false,
        })
    }

    fn convert_key(key: KeyEvent) -> Option<KeyInput> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return matches!(key.code, KeyCode::Char('c' | 'd')).then_some(KeyInput::Interrupt);
        }
        match key.code {
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Delete => Some(KeyInput::Delete),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Up => Some(KeyInput::Up),
            KeyCode::Down => Some(KeyInput::Down),
            KeyCode::Home => Some(KeyInput::Home),
            KeyCode::End => Some(KeyInput::End),
            KeyCode::Tab => Some(KeyInput::Tab),
            KeyCode::BackTab => Some(KeyInput::BackTab),
            KeyCode::Esc => Some(KeyInput::Esc),
            _ => None,
        }
    }

    fn restore(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    async fn poll_event(&mut self, app: &mut App) -> Result<Vec<AppAction>, Self::Error> {
        loop {
            match self.event_stream.next().await {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if let Some(input) = Self::convert_key(key) {
                        return Ok(self.input_state.handle_key(input, app));
                    }
                },
                Some(Ok(Event::Resize(..))) => return Ok(vec![AppAction::Render]),
                Some(Ok(_)) => {},
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(app.exit()),
            }
        }
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        let input_state = &self.input_state;
        self.terminal.draw(|frame| ui::render(frame, app, input_state))?;
        Ok(())
    }

    fn stop(&mut self) {
        self.restore();
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.restore();
    }
}

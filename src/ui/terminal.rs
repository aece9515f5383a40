use {
    crate::presenter::{Presenter, PresenterError},
    crate::stream_core::Snapshot,
    async_trait::async_trait,
    crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    ratatui::{
        backend::{Backend, CrosstermBackend},
        Terminal,
    },
    std::{io::Stdout, time::Duration},
};

/// TUI presenter. Redraws the whole frame from each snapshot.
///
/// With a crossterm backend it owns the terminal (raw mode, alternate
/// screen) until dropped and watches for 'q'/Esc between frames.
pub struct TerminalPresenter<B: Backend> {
    terminal: Terminal<B>,
    interactive: bool,
    quit_requested: bool,
}

impl TerminalPresenter<CrosstermBackend<Stdout>> {
    pub fn stdout() -> Result<Self, PresenterError> {
        let backend = CrosstermBackend::new(std::io::stdout());
        let mut terminal = Terminal::new(backend)?;

        crossterm::terminal::enable_raw_mode()?;
        // Logs written to the same tty still paint over the frame; the binary
        // sends them to a file while this presenter is active.
        crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::EnterAlternateScreen,
            crossterm::cursor::Hide
        )?;
        terminal.clear()?;

        Ok(Self {
            terminal,
            interactive: true,
            quit_requested: false,
        })
    }
}

impl<B: Backend> TerminalPresenter<B> {
    /// Non-interactive presenter over any backend (used with `TestBackend`).
    pub fn with_backend(backend: B) -> Result<Self, PresenterError> {
        Ok(Self {
            terminal: Terminal::new(backend)?,
            interactive: false,
            quit_requested: false,
        })
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    fn poll_quit_key(&mut self) -> Result<(), PresenterError> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if is_quit_key(&key) {
                    log::info!("Quit requested from terminal");
                    self.quit_requested = true;
                }
            }
        }
        Ok(())
    }

    pub fn draw(&mut self, snapshot: &Snapshot) -> Result<(), PresenterError> {
        self.terminal.draw(|f| {
            let area = f.size();
            crate::ui::layout::render_layout(f, area, snapshot);
        })?;
        Ok(())
    }
}

/// 'q', Esc, or Ctrl+C. Raw mode delivers Ctrl+C as a key event rather than
/// SIGINT, so it has to be handled here.
pub fn is_quit_key(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

impl<B: Backend> Drop for TerminalPresenter<B> {
    fn drop(&mut self) {
        if !self.interactive {
            return;
        }
        // Restore terminal state
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::cursor::Show
        );
        let _ = crossterm::terminal::disable_raw_mode();
    }
}

#[async_trait]
impl<B: Backend + Send> Presenter for TerminalPresenter<B> {
    async fn render(&mut self, snapshot: &Snapshot) -> Result<(), PresenterError> {
        if self.interactive {
            self.poll_quit_key()?;
        }
        self.draw(snapshot)
    }

    fn name(&self) -> &'static str {
        "tui"
    }

    fn wants_shutdown(&self) -> bool {
        self.quit_requested
    }
}

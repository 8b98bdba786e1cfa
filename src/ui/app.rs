//! Main TUI application state and logic

use crate::interpreter::{Interpreter, RuntimeError};
use crate::ui::panes::{self, SourceScrollState};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Output,
    Variables,
}

impl FocusedPane {
    /// Move focus to the next pane (source -> output -> variables)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Variables,
            FocusedPane::Variables => FocusedPane::Source,
        }
    }

    /// Move focus to the previous pane
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Variables,
            FocusedPane::Output => FocusedPane::Source,
            FocusedPane::Variables => FocusedPane::Output,
        }
    }
}

/// The main application state
pub struct App<W: Write> {
    /// Interpreter holding the recorded history
    pub interpreter: Interpreter<W>,

    /// The source code being executed
    pub source_code: String,

    /// Runtime error that ended the recorded run, if any
    pub error_message: Option<String>,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub source_scroll: SourceScrollState,
    pub output_scroll: usize,
    pub variables_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl<W: Write> App<W> {
    /// Create a new app around an interpreter that has already run
    pub fn new(interpreter: Interpreter<W>, source_code: String, error_message: Option<String>) -> Self {
        let long_ago = Instant::now()
            .checked_sub(Duration::from_secs(1))
            .unwrap_or_else(Instant::now);

        App {
            interpreter,
            source_code,
            error_message,
            focused_pane: FocusedPane::Source,
            source_scroll: SourceScrollState::default(),
            output_scroll: 0,
            variables_scroll: 0,
            should_quit: false,
            status_message: String::from("Ready!"),
            is_playing: false,
            last_play_time: long_ago,
            last_space_press: long_ago,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= Duration::from_secs(1) {
                self.play_tick();
            }

            // Poll with a timeout so auto-play keeps ticking
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    fn play_tick(&mut self) {
        if self.interpreter.step_forward().is_ok() {
            self.status_message = "Playing...".to_string();
            self.output_scroll = usize::MAX;
        } else {
            self.is_playing = false;
            self.status_message = "Playback complete".to_string();
        }
        self.last_play_time = Instant::now();
    }

    fn at_end(&self) -> bool {
        self.interpreter.history_position() + 1 >= self.interpreter.total_snapshots()
    }

    /// Render the UI
    pub(crate) fn render(&mut self, frame: &mut Frame) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[0]);

        // Left column: Source (top) | Output (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        let show_error = self.error_message.is_some() && self.at_end();

        panes::render_source_pane(
            frame,
            left_rows[0],
            &self.source_code,
            self.interpreter.current_location().line,
            show_error,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        panes::render_output_pane(
            frame,
            left_rows[1],
            self.interpreter.transcript(),
            self.focused_pane == FocusedPane::Output,
            &mut self.output_scroll,
        );

        let last_output = self.interpreter.runtime().last_output_state();
        panes::render_variables_pane(
            frame,
            columns[1],
            self.interpreter.environment(),
            last_output.is_set().then(|| last_output.get()),
            self.focused_pane == FocusedPane::Variables,
            &mut self.variables_scroll,
        );

        panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            self.interpreter.history_position(),
            self.interpreter.total_snapshots(),
            self.interpreter.history_memory(),
            self.error_message.as_deref(),
            self.is_playing,
        );
    }

    /// Handle keyboard events
    pub(crate) fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).unwrap_or(1) as usize;
                let stepped = (0..n)
                    .take_while(|_| self.interpreter.step_forward().is_ok())
                    .count();
                self.status_message = format!("Stepped forward {} step(s)", stepped);
                self.output_scroll = usize::MAX;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => {
                self.is_playing = false;
                let result = self.interpreter.step_backward();
                self.report_step(result, "backward");
            }
            KeyCode::Right => {
                self.is_playing = false;
                let result = self.interpreter.step_forward();
                self.report_step(result, "forward");
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Source => {
                    // Scrolling up makes the current line move down visually
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_add(1));
                    }
                }
                FocusedPane::Output => {
                    self.output_scroll = self.output_scroll.saturating_sub(1);
                }
                FocusedPane::Variables => {
                    self.variables_scroll = self.variables_scroll.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Source => {
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_sub(1));
                    }
                }
                FocusedPane::Output => {
                    self.output_scroll = self.output_scroll.saturating_add(1);
                }
                FocusedPane::Variables => {
                    self.variables_scroll = self.variables_scroll.saturating_add(1);
                }
            },
            KeyCode::Char(' ') => {
                // Toggle auto-play (200ms debounce against key repeat)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    self.status_message = if self.is_playing {
                        self.last_play_time = Instant::now()
                            .checked_sub(Duration::from_secs(1))
                            .unwrap_or_else(Instant::now);
                        "Playing...".to_string()
                    } else {
                        "Paused".to_string()
                    };
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                self.status_message = match self.interpreter.jump_to_end() {
                    Ok(()) => "Jumped to end".to_string(),
                    Err(e) => e.to_string(),
                };
                self.output_scroll = usize::MAX;
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                self.status_message = match self.interpreter.rewind_to_start() {
                    Ok(()) => "Jumped to start".to_string(),
                    Err(e) => e.to_string(),
                };
                self.output_scroll = usize::MAX;
            }
            _ => {}
        }
    }

    fn report_step(&mut self, result: Result<(), RuntimeError>, direction: &str) {
        match result {
            Ok(()) => {
                self.status_message = format!("Stepped {}", direction);
                self.output_scroll = usize::MAX;
            }
            Err(RuntimeError::HistoryOperationFailed { message, .. }) => {
                self.status_message = format!("Cannot step {}: {}", direction, message);
            }
            Err(e) => {
                self.status_message = format!("Error: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{run_source, RunOptions};
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;

    fn app(source: &str) -> App<Vec<u8>> {
        let mut interpreter = run_source(
            source,
            Vec::new(),
            Box::new(io::empty()),
            RunOptions::default(),
        )
        .unwrap();
        interpreter.rewind_to_start().unwrap();
        App::new(interpreter, source.to_string(), None)
    }

    fn press(app: &mut App<Vec<u8>>, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_focus_cycles() {
        let mut pane = FocusedPane::Source;
        for _ in 0..3 {
            pane = pane.next();
        }
        assert_eq!(pane, FocusedPane::Source);
        assert_eq!(FocusedPane::Source.prev(), FocusedPane::Variables);
        assert_eq!(FocusedPane::Output.next().prev(), FocusedPane::Output);
    }

    #[test]
    fn test_keys_navigate_history() {
        let mut app = app("Print \"a\"\nPrint \"b\"\nPrint \"c\"\n");
        assert_eq!(app.interpreter.history_position(), 0);

        press(&mut app, KeyCode::Right);
        assert_eq!(app.interpreter.transcript().text(), "a");

        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.status_message, "Stepped forward 2 step(s)");

        press(&mut app, KeyCode::Right);
        assert!(app.status_message.starts_with("Cannot step forward"));

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.interpreter.history_position(), 0);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.interpreter.last_output(), "c");

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Output);

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_render_shows_panes() {
        let mut app = app("greeting = \"Hi\"\nPrint greeting\n");
        press(&mut app, KeyCode::Enter);

        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();

        let buffer = terminal.backend().buffer();
        let screen: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(screen.contains("Source Code"));
        assert!(screen.contains("Output (1 prints)"));
        assert!(screen.contains("Variables"));
        assert!(screen.contains("Print.output"));
        assert!(screen.contains("Step 3/3"));
        assert!(screen.contains("/ 256.0 MiB"));
    }
}

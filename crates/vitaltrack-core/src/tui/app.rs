//! Main TUI application state and logic

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::event::is_interrupt;
use crate::error::Error;
use crate::models::MetricKind;
use crate::tracker::TrackerService;

/// What the main area shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Metric cards and value entry
    #[default]
    Entry,
    /// Chart of one metric against its healthy range
    Metric(MetricKind),
    /// Every metric on one chart
    AllMetrics,
}

/// Kind of popup, used for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupKind {
    /// Reading outside its healthy range
    Alert,
    /// Rejected input
    Error,
    /// Informational message or transcript
    Info,
}

/// Modal message box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    /// Styling kind
    pub kind: PopupKind,
    /// Border title
    pub title: String,
    /// Message text, may span lines
    pub body: String,
}

impl Popup {
    fn new(kind: PopupKind, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Main TUI application state
pub struct App {
    /// Whether the app should quit
    pub should_quit: bool,
    /// Tracker holding this session's readings
    pub tracker: TrackerService,
    /// Metric the entry box and single chart apply to
    pub selected: MetricKind,
    /// Whether keystrokes go to the value input
    pub editing: bool,
    /// Pending raw value
    pub input: String,
    /// Current view
    pub view: View,
    /// Modal popup, dismissed with Enter or Esc
    pub popup: Option<Popup>,
    /// Show help overlay
    pub show_help: bool,
    /// Status message
    pub status_message: Option<(String, Instant)>,
    /// Tick rate
    pub tick_rate: Duration,
}

impl Default for App {
    fn default() -> Self {
        Self::new(TrackerService::new())
    }
}

impl App {
    /// Create a new TUI app around a tracker
    pub fn new(tracker: TrackerService) -> Self {
        Self {
            should_quit: false,
            tracker,
            selected: MetricKind::HeartRate,
            editing: false,
            input: String::new(),
            view: View::default(),
            popup: None,
            show_help: false,
            status_message: None,
            tick_rate: Duration::from_millis(250),
        }
    }

    /// Set tick rate
    pub fn with_tick_rate(mut self, ms: u64) -> Self {
        self.tick_rate = Duration::from_millis(ms);
        self
    }

    /// Handle key events
    pub fn handle_key(&mut self, key: KeyEvent) {
        if is_interrupt(key) {
            self.should_quit = true;
            return;
        }

        if self.popup.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.popup = None;
            }
            return;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                self.show_help = false;
            }
            return;
        }

        if self.editing {
            self.handle_input_key(key.code);
        } else {
            self.handle_command_key(key.code, key.modifiers);
        }
    }

    fn handle_input_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => self.submit(),
            KeyCode::Esc => {
                self.editing = false;
                self.input.clear();
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    fn handle_command_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        match (code, modifiers) {
            (KeyCode::Char('q'), KeyModifiers::NONE) => {
                self.should_quit = true;
            }
            (KeyCode::Char('?'), _) => {
                self.show_help = true;
            }
            (KeyCode::Esc, _) => {
                self.view = View::Entry;
            }
            (KeyCode::Up | KeyCode::Char('k'), _) => {
                self.select(self.selected.prev());
            }
            (KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab, _) => {
                self.select(self.selected.next());
            }
            (KeyCode::Char(c @ '1'..='4'), KeyModifiers::NONE) => {
                let index = c as usize - '1' as usize;
                self.select(MetricKind::ALL[index]);
            }
            (KeyCode::Enter | KeyCode::Char('e'), _) => {
                self.view = View::Entry;
                self.editing = true;
            }
            (KeyCode::Char('v'), _) => self.visualize_selected(),
            (KeyCode::Char('a'), _) => {
                self.view = View::AllMetrics;
            }
            (KeyCode::Char('t'), _) => self.show_transcript(),
            _ => {}
        }
    }

    /// Change the selected metric, following it in the single-metric chart
    fn select(&mut self, metric: MetricKind) {
        self.selected = metric;
        if let View::Metric(_) = self.view {
            if self.tracker.series_for(metric).is_empty() {
                self.view = View::Entry;
            } else {
                self.view = View::Metric(metric);
            }
        }
    }

    /// Record the pending input for the selected metric
    pub fn submit(&mut self) {
        let raw = std::mem::take(&mut self.input);
        self.editing = false;

        match self.tracker.record(self.selected, &raw) {
            Ok(outcome) => match outcome.alert {
                Some(alert) => {
                    self.popup = Some(Popup::new(PopupKind::Alert, "Health Alert", alert.message()));
                }
                None => {
                    self.set_status(format!(
                        "Recorded {} {}",
                        self.selected.title(),
                        outcome.reading.display_value()
                    ));
                }
            },
            Err(e @ Error::InvalidValue { .. }) => {
                self.popup = Some(Popup::new(
                    PopupKind::Error,
                    "Invalid Input",
                    format!("{e}\nPlease enter a numeric value."),
                ));
            }
            Err(e) => {
                self.popup = Some(Popup::new(PopupKind::Error, "Error", e.to_string()));
            }
        }
    }

    /// Show the chart for the selected metric, if it has data
    pub fn visualize_selected(&mut self) {
        if self.tracker.series_for(self.selected).is_empty() {
            self.popup = Some(Popup::new(PopupKind::Info, "Info", "No data to visualize."));
        } else {
            self.view = View::Metric(self.selected);
        }
    }

    /// Show the transcript popup
    pub fn show_transcript(&mut self) {
        let transcript = self.tracker.transcript();
        self.popup = Some(Popup::new(
            PopupKind::Info,
            "Transcript Ready to Send",
            transcript.to_string(),
        ));
    }

    /// Set a status message that expires after 3 seconds
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get current status message if not expired
    pub fn get_status(&self) -> Option<&str> {
        self.status_message.as_ref().and_then(|(msg, time)| {
            if time.elapsed() < Duration::from_secs(3) {
                Some(msg.as_str())
            } else {
                None
            }
        })
    }

    /// Run the TUI application
    pub async fn run(&mut self) -> crate::error::Result<()> {
        use crossterm::{
            execute,
            terminal::{enable_raw_mode, EnterAlternateScreen},
        };
        use ratatui::{backend::CrosstermBackend, Terminal};
        use std::io;

        // Setup terminal, undoing raw mode if the rest of the setup fails
        enable_raw_mode().map_err(|e| Error::tui(e.to_string()))?;
        let mut stdout = io::stdout();
        let setup = execute!(stdout, EnterAlternateScreen)
            .and_then(|()| Terminal::new(CrosstermBackend::new(stdout)));
        let mut terminal = match setup {
            Ok(terminal) => terminal,
            Err(e) => {
                restore_terminal(None::<&mut Terminal<CrosstermBackend<io::Stdout>>>).ok();
                return Err(Error::tui(e.to_string()));
            }
        };

        let mut events = super::EventHandler::new(self.tick_rate.as_millis() as u64);
        events.start();
        tracing::info!("Dashboard started");

        let result = self.event_loop(&mut terminal, &mut events).await;
        let restored = restore_terminal(Some(&mut terminal));

        tracing::info!(readings = self.tracker.reading_count(), "Dashboard stopped");
        result.and(restored)
    }

    async fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut ratatui::Terminal<B>,
        events: &mut super::EventHandler,
    ) -> crate::error::Result<()> {
        while !self.should_quit {
            terminal
                .draw(|frame| super::ui::draw(frame, self))
                .map_err(|e| Error::tui(e.to_string()))?;

            match events.next().await {
                Some(super::Event::Key(key)) => self.handle_key(key),
                Some(super::Event::Error(e)) => {
                    tracing::warn!(error = %e, "Terminal event error");
                    self.set_status(format!("Terminal error: {e}"));
                }
                // Redraw on the next iteration
                Some(super::Event::Tick | super::Event::Resize(_, _)) => {}
                None => break,
            }
        }
        Ok(())
    }
}

/// Leave raw mode and the alternate screen, attempting every step
fn restore_terminal<B>(terminal: Option<&mut ratatui::Terminal<B>>) -> crate::error::Result<()>
where
    B: ratatui::backend::Backend + std::io::Write,
{
    use crossterm::{
        execute,
        terminal::{disable_raw_mode, LeaveAlternateScreen},
    };

    let mut steps = vec![("disable raw mode", disable_raw_mode())];
    match terminal {
        Some(terminal) => {
            steps.push((
                "leave alternate screen",
                execute!(terminal.backend_mut(), LeaveAlternateScreen),
            ));
            steps.push(("show cursor", terminal.show_cursor()));
        }
        None => {
            let mut stdout = std::io::stdout();
            steps.push(("leave alternate screen", execute!(stdout, LeaveAlternateScreen)));
        }
    }
    collect_failures(steps)
}

/// Join every failed step into one terminal error
fn collect_failures(steps: Vec<(&str, std::io::Result<()>)>) -> crate::error::Result<()> {
    let failures: Vec<String> = steps
        .into_iter()
        .filter_map(|(step, result)| result.err().map(|e| format!("{step}: {e}")))
        .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        tracing::warn!(failures = failures.len(), "Terminal restore incomplete");
        Err(Error::tui(failures.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_value(app: &mut App, value: &str) {
        press(app, KeyCode::Char('e'));
        for c in value.chars() {
            press(app, KeyCode::Char(c));
        }
        press(app, KeyCode::Enter);
    }

    #[test]
    fn test_record_healthy_value_sets_status() {
        let mut app = App::default();
        type_value(&mut app, "72");

        assert!(app.popup.is_none());
        assert!(!app.editing);
        assert_eq!(app.get_status(), Some("Recorded Heart Rate 72.0"));
        assert_eq!(app.tracker.series_for(MetricKind::HeartRate).len(), 1);
    }

    #[test]
    fn test_out_of_range_value_shows_alert() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('2'));
        type_value(&mut app, "90");

        let popup = app.popup.clone().unwrap();
        assert_eq!(popup.kind, PopupKind::Alert);
        assert_eq!(popup.title, "Health Alert");
        assert!(popup.body.contains("Low blood oxygen levels (hypoxemia)"));

        press(&mut app, KeyCode::Esc);
        assert!(app.popup.is_none());
    }

    #[test]
    fn test_invalid_value_shows_error_and_stores_nothing() {
        let mut app = App::default();
        type_value(&mut app, "abc");

        assert_eq!(app.popup.as_ref().map(|p| p.kind), Some(PopupKind::Error));
        assert!(app.tracker.series_for(MetricKind::HeartRate).is_empty());
    }

    #[test]
    fn test_keys_while_editing_go_to_input() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Char('q'));
        press(&mut app, KeyCode::Char('v'));
        press(&mut app, KeyCode::Backspace);

        assert!(!app.should_quit);
        assert_eq!(app.input, "q");

        press(&mut app, KeyCode::Esc);
        assert!(!app.editing);
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_visualize_without_data() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('v'));

        assert_eq!(app.view, View::Entry);
        assert_eq!(app.popup.as_ref().map(|p| p.body.as_str()), Some("No data to visualize."));
    }

    #[test]
    fn test_visualize_with_data() {
        let mut app = App::default();
        type_value(&mut app, "70");
        press(&mut app, KeyCode::Char('v'));
        assert_eq!(app.view, View::Metric(MetricKind::HeartRate));

        // moving to a metric without data leaves the chart
        press(&mut app, KeyCode::Down);
        assert_eq!(app.view, View::Entry);

        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.view, View::AllMetrics);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.view, View::Entry);
    }

    #[test]
    fn test_transcript_popup() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('t'));

        let popup = app.popup.unwrap();
        assert_eq!(popup.title, "Transcript Ready to Send");
        assert!(popup.body.starts_with("Health and Suit Metrics Transcript\n"));
        assert!(popup.body.contains("Heart Rate: N/A"));
    }

    #[test]
    fn test_selection_wraps() {
        let mut app = App::default();
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected, MetricKind::Hydration);
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selected, MetricKind::HeartRate);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);

        let mut app = App::default();
        press(&mut app, KeyCode::Char('e'));
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_restore_reports_every_failed_step() {
        let broken = || Err(std::io::Error::new(std::io::ErrorKind::Other, "broken pipe"));
        let err = collect_failures(vec![
            ("disable raw mode", broken()),
            ("leave alternate screen", Ok(())),
            ("show cursor", broken()),
        ])
        .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("disable raw mode: broken pipe"));
        assert!(message.contains("show cursor: broken pipe"));
        assert!(!message.contains("leave alternate screen"));
    }

    #[test]
    fn test_restore_succeeds_when_all_steps_do() {
        assert!(collect_failures(vec![("disable raw mode", Ok(())), ("show cursor", Ok(()))]).is_ok());
    }
}

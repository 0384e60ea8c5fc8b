use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, warn};

use quotawatch_core::api::{CoreEvent, NotifyLevel, QuotaCore, QuotaCoreBuilder};
use quotawatch_core::config::Settings;

use super::components::{DetailPopup, IndicatorBar, StatusBar, TooltipPanel};
use super::{Layout, ViewState};
use crate::config::Config;

/// Input poll timeout per frame
const FRAME_TIMEOUT: Duration = Duration::from_millis(100);

/// Main application
pub struct App {
    core: Arc<QuotaCore>,
    config: Config,
    layout: Layout,
    view: ViewState,
}

impl App {
    /// Create a new application. `config` is kept to reload settings later.
    pub fn new(config: Config, settings: Settings) -> Self {
        Self::with_core(config, QuotaCoreBuilder::new(settings).build())
    }

    pub fn with_core(config: Config, core: QuotaCore) -> Self {
        Self {
            core: Arc::new(core),
            config,
            layout: Layout::new(),
            view: ViewState::new(),
        }
    }

    /// Run the application
    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        crossterm::terminal::enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let mut events = self.core.subscribe();
        self.core.start();

        // Main loop
        let result = self.main_loop(&mut terminal, &mut events).await;

        self.core.stop();

        // Restore terminal
        crossterm::terminal::disable_raw_mode()?;
        crossterm::execute!(
            terminal.backend_mut(),
            crossterm::terminal::LeaveAlternateScreen
        )?;
        terminal.show_cursor()?;

        result
    }

    async fn main_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        events: &mut broadcast::Receiver<CoreEvent>,
    ) -> Result<()> {
        while self.view.running {
            let now = Instant::now();
            self.drain_events(events, now);
            self.view.expire_notification(now);

            terminal.draw(|frame| self.draw(frame))?;

            if event::poll(FRAME_TIMEOUT)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }
            tokio::task::yield_now().await;
        }

        Ok(())
    }

    fn drain_events(&mut self, events: &mut broadcast::Receiver<CoreEvent>, now: Instant) {
        loop {
            match events.try_recv() {
                Ok(event) => self.view.apply_event(event, now),
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!("UI lagged behind core events, skipped {}", skipped);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let indicator = self.core.indicator();
        let last_poll = self.core.state().read().last_poll;
        let areas = self.layout.calculate(frame.area());

        IndicatorBar::render(
            frame,
            areas.indicator,
            &indicator,
            self.core.phase(),
            last_poll,
        );
        TooltipPanel::render(frame, areas.tooltip, &indicator.tooltip);
        StatusBar::render(frame, areas.status_bar, self.view.notification.as_ref());

        if self.view.show_details {
            let rows = self.core.details();
            DetailPopup::render(frame, self.layout.detail_area(frame.area()), rows.as_deref());
        }
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.view.quit();
            }
            KeyCode::Char('q') => {
                self.view.quit();
            }
            // Esc closes the popup first
            KeyCode::Esc => {
                if self.view.show_details {
                    self.view.show_details = false;
                } else {
                    self.view.quit();
                }
            }
            KeyCode::Char('d') | KeyCode::Enter => {
                self.view.toggle_details();
                // Nothing to show yet: fetch instead of an empty popup
                if self.view.show_details && self.core.details().is_none() {
                    self.refresh();
                }
            }
            KeyCode::Char('r') => {
                self.refresh();
            }
            KeyCode::Char('c') => {
                self.reload_config();
            }
            _ => {}
        }
    }

    /// Run a manual cycle without blocking the frame loop; the outcome
    /// arrives as core events
    fn refresh(&self) {
        let core = self.core.clone();
        tokio::spawn(async move {
            let _ = core.refresh().await;
        });
    }

    fn reload_config(&mut self) {
        match self.config.load_settings() {
            Ok(settings) => self.core.reconfigure(settings),
            Err(e) => {
                warn!("Config reload failed: {:#}", e);
                self.view.notify(
                    NotifyLevel::Error,
                    format!("Config reload failed: {:#}", e),
                    Instant::now(),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    /// Points at a closed local port so refreshes fail fast without discovery
    fn offline_settings() -> Settings {
        Settings {
            endpoint: Some("http://127.0.0.1:9/".to_string()),
            request_timeout_secs: 1,
            ..Settings::default()
        }
    }

    fn app() -> App {
        let config = Config::try_parse_from(["quotawatch"]).unwrap();
        App::new(config, offline_settings())
    }

    #[tokio::test]
    async fn test_details_without_cache_starts_refresh() {
        let mut app = app();

        app.handle_key(KeyCode::Char('d'), KeyModifiers::NONE);
        assert!(app.view.show_details);

        for _ in 0..300 {
            if app.core.executions() > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(app.core.executions(), 1);
    }

    #[tokio::test]
    async fn test_details_toggle_keys() {
        let mut app = app();
        app.handle_key(KeyCode::Char('d'), KeyModifiers::NONE);
        assert!(app.view.show_details);
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert!(!app.view.show_details);
    }

    #[tokio::test]
    async fn test_esc_closes_popup_before_quitting() {
        let mut app = app();
        app.handle_key(KeyCode::Char('d'), KeyModifiers::NONE);

        app.handle_key(KeyCode::Esc, KeyModifiers::NONE);
        assert!(!app.view.show_details);
        assert!(app.view.running);

        app.handle_key(KeyCode::Esc, KeyModifiers::NONE);
        assert!(!app.view.running);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = app();
        app.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(!app.view.running);
    }

    #[test]
    fn test_reload_failure_is_notified() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "poll_interval_secs = \"often\"\n").unwrap();

        let config =
            Config::try_parse_from(["quotawatch", "--config", path.to_str().unwrap()]).unwrap();
        let mut app = App::new(config, Settings::default());

        app.handle_key(KeyCode::Char('c'), KeyModifiers::NONE);

        let notification = app.view.notification.as_ref().unwrap();
        assert_eq!(notification.level, NotifyLevel::Error);
        assert!(notification.message.starts_with("Config reload failed"));
        assert!(!app.core.is_running());
    }

    #[tokio::test]
    async fn test_reload_restarts_polling() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "poll_interval_secs = 600\n").unwrap();

        let config =
            Config::try_parse_from(["quotawatch", "--config", path.to_str().unwrap()]).unwrap();
        let mut app = App::new(config, Settings::default());

        app.handle_key(KeyCode::Char('c'), KeyModifiers::NONE);

        assert_eq!(app.core.settings().poll_interval_secs, 600);
        assert!(app.core.is_running());
        app.core.stop();
    }
}

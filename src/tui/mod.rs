pub mod app;
pub mod chart;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::{App, LoadOutcome};
pub use chart::ChartError;
pub use theme::{resolve_theme, Theme, ThemeColors};

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};
use tokio::task::JoinHandle;

use crate::fetch::{load_season, LoadOptions, ResultsSource};
use crate::session::LoadTicket;

const TICK_RATE_MS: u64 = 250;

/// Everything a background season load needs
#[derive(Clone)]
pub struct Loader {
    pub source: Arc<dyn ResultsSource>,
    pub options: LoadOptions,
    pub timeout: Duration,
}

impl Loader {
    fn spawn(&self, ticket: LoadTicket) -> JoinHandle<LoadOutcome> {
        let loader = self.clone();
        tokio::spawn(async move {
            let load = load_season(loader.source.as_ref(), ticket.season, &loader.options);
            match tokio::time::timeout(loader.timeout, load).await {
                Ok(Ok(rounds)) => LoadOutcome::Loaded(rounds),
                Ok(Err(e)) => LoadOutcome::Failed(e.to_string()),
                Err(_elapsed) => LoadOutcome::TimedOut,
            }
        })
    }
}

pub async fn run_tui(mut app: App, loader: Loader) -> anyhow::Result<()> {
    // Keep log output off the screen while the TUI is up
    crate::stderr_buffer::activate();

    // Sets up panic hooks that restore the terminal
    let mut terminal = ratatui::init();
    let mut events = EventHandler::new(TICK_RATE_MS);
    let mut pending: Option<(LoadTicket, JoinHandle<LoadOutcome>)> = None;

    let result = loop {
        if let Some(ticket) = app.take_pending_load() {
            // A newer request makes the in-flight one irrelevant
            if let Some((old, handle)) = pending.take() {
                tracing::debug!(season = old.season, "Aborting superseded season load");
                handle.abort();
            }
            pending = Some((ticket, loader.spawn(ticket)));
        }

        if let Err(e) = terminal.draw(|frame| ui::draw(frame, &mut app)) {
            break Err(e.into());
        }

        match events.next().await {
            Event::Key(key) => handle_key_event(&mut app, key),
            Event::Tick => app.on_tick(),
        }

        if pending.as_ref().is_some_and(|(_, handle)| handle.is_finished()) {
            if let Some((ticket, handle)) = pending.take() {
                let outcome = match handle.await {
                    Ok(outcome) => outcome,
                    Err(e) => LoadOutcome::Failed(format!("load task failed: {}", e)),
                };
                app.apply_load(ticket, outcome);
            }
        }

        if app.should_quit {
            break Ok(());
        }
    };

    if let Some((_, handle)) = pending {
        handle.abort();
    }
    ratatui::restore();

    // Replay buffered log lines now that the terminal is restored
    for msg in crate::stderr_buffer::drain() {
        eprintln!("{}", msg);
    }

    result
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.input_mode {
        app::InputMode::Normal => match key.code {
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.should_quit = true
            }

            // Views
            KeyCode::Tab => app.next_tab(),
            KeyCode::BackTab => app.previous_tab(),
            KeyCode::Char(c @ '1'..='4') => {
                let idx = c as usize - '1' as usize;
                app.select_tab(app::Tab::ALL[idx]);
            }

            // Rows
            KeyCode::Char('j') | KeyCode::Down => app.next_row(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_row(),

            // Seasons
            KeyCode::Char('h') | KeyCode::Char('[') | KeyCode::Left => app.previous_season(),
            KeyCode::Char('l') | KeyCode::Char(']') | KeyCode::Right => app.next_season(),
            KeyCode::Char('R') => app.reload_season(),

            // Position selector
            KeyCode::Char('+') | KeyCode::Char('=') => app.next_position(),
            KeyCode::Char('-') => app.previous_position(),

            // Editors
            KeyCode::Char('r') => app.start_edit(app::EditTarget::Race),
            KeyCode::Char('s') => app.start_edit(app::EditTarget::Sprint),
            KeyCode::Char('p') => app.start_edit(app::EditTarget::PoleBonus),
            KeyCode::Char('f') => app.start_edit(app::EditTarget::FastestLapBonus),
            KeyCode::Char('x') => app.reset_scoring(),
            KeyCode::Char('w') => app.save_scoring(),

            // Chart focus (Progression)
            KeyCode::Char('a') => app.pin_selected_driver(app::FocusSlot::First),
            KeyCode::Char('b') => app.pin_selected_driver(app::FocusSlot::Second),
            KeyCode::Char('c') => app.clear_focus(),

            KeyCode::Enter | KeyCode::Char('o') => app.open_selected_round(),

            KeyCode::Char('?') => app.show_help(),
            _ => {}
        },
        app::InputMode::Editing(_) => match key.code {
            KeyCode::Enter => app.confirm_edit(),
            KeyCode::Esc => app.cancel_edit(),
            KeyCode::Backspace => {
                app.input.pop();
            }
            // Free text; anything non-numeric is stored as 0 on confirm
            KeyCode::Char(c) if !c.is_control() && app.input.len() < 12 => app.input.push(c),
            _ => {}
        },
        app::InputMode::Help => app.dismiss_help(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ScoringConfig;
    use crate::session::SeasonSession;
    use crate::season::canonical_key;
    use crate::standings::ProgressionPolicy;
    use crate::testutil::{race_row, round_with};

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn app() -> App {
        let session = SeasonSession::new(ScoringConfig::official(), ProgressionPolicy::Ragged);
        App::new(session, 2023, None, ThemeColors::dark())
    }

    #[test]
    fn test_edit_flow_through_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.input_mode, app::InputMode::Editing(app::EditTarget::PoleBonus));
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.scoring().pole_bonus(), 3);
        assert_eq!(app.input_mode, app::InputMode::Normal);
    }

    #[test]
    fn test_editing_swallows_commands() {
        let mut app = app();
        press(&mut app, KeyCode::Char('r'));
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_number_keys_select_tabs() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.tab, app::Tab::Progression);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.tab, app::Tab::Results);
    }

    #[test]
    fn test_head_to_head_through_keys() {
        let mut app = app();
        let ticket = app.take_pending_load().unwrap();
        let rows = vec![
            race_row(1, "Alex Able", "Ferrari", false),
            race_row(2, "Ben Baker", "Williams", false),
            race_row(3, "Cal Cole", "Mercedes", false),
        ];
        app.apply_load(ticket, app::LoadOutcome::Loaded(vec![round_with(1, rows)]));

        // Pinning does nothing outside the Progression list
        press(&mut app, KeyCode::Char('a'));
        assert!(!app.chart_focus.is_active());

        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('b'));
        assert_eq!(app.chart_focus.first, Some(canonical_key("Ben Baker")));
        assert_eq!(app.chart_focus.second, Some(canonical_key("Cal Cole")));

        let snapshot = app.session.snapshot();
        let data =
            chart::build_chart_data(&snapshot.progression, app.session.rounds(), &app.chart_focus)
                .unwrap();
        let names: Vec<&str> = data.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Ben Baker", "Cal Cole"]);

        press(&mut app, KeyCode::Char('c'));
        assert!(!app.chart_focus.is_active());
        assert!(!app.should_quit);
    }

    #[test]
    fn test_help_closes_on_any_key() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.input_mode, app::InputMode::Help);
        press(&mut app, KeyCode::Char('z'));
        assert_eq!(app.input_mode, app::InputMode::Normal);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = app();
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }
}

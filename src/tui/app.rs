use std::path::PathBuf;
use std::time::Instant;

use ratatui::widgets::TableState;

use crate::scoring::Session;
use crate::season::{clamp_season, current_season, Round, FIRST_SEASON};
use crate::session::{LoadTicket, SeasonSession};
use crate::standings::DriverSeries;
use crate::tui::chart::{ranked_series, ChartFocus};
use crate::tui::theme::ThemeColors;

/// Seconds a flash message stays in the status bar
const FLASH_SECS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Drivers,
    Teams,
    Progression,
    Results,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Drivers, Tab::Teams, Tab::Progression, Tab::Results];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Drivers => "Drivers",
            Tab::Teams => "Teams",
            Tab::Progression => "Progression",
            Tab::Results => "Results",
        }
    }

    pub fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }
}

/// What the points editor writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Race,
    Sprint,
    PoleBonus,
    FastestLapBonus,
}

impl EditTarget {
    pub fn prompt(self, position: u32) -> String {
        match self {
            EditTarget::Race => format!("Race points for P{}", position),
            EditTarget::Sprint => format!("Sprint points for P{}", position),
            EditTarget::PoleBonus => "Pole position bonus".to_string(),
            EditTarget::FastestLapBonus => "Fastest lap bonus".to_string(),
        }
    }
}

/// Chart slot a driver is pinned to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusSlot {
    First,
    Second,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing(EditTarget),
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Info,
    Error,
}

/// How a background season load ended
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(Vec<Round>),
    Failed(String),
    TimedOut,
}

pub struct App {
    pub session: SeasonSession,
    pub tab: Tab,
    pub table_state: TableState,
    /// Position the race/sprint editors act on (1-based)
    pub selected_position: u32,
    pub input_mode: InputMode,
    pub input: String,
    pub chart_focus: ChartFocus,
    pub flash_message: Option<(String, FlashKind, Instant)>,
    /// Season the event loop should start loading
    pub pending_season: Option<u32>,
    pub is_loading: bool,
    pub load_error: Option<String>,
    pub spinner_frame: usize,
    pub should_quit: bool,
    pub config_path: Option<PathBuf>,
    pub theme: ThemeColors,
}

impl App {
    pub fn new(
        session: SeasonSession,
        season: u32,
        config_path: Option<PathBuf>,
        theme: ThemeColors,
    ) -> Self {
        Self {
            session,
            tab: Tab::Drivers,
            table_state: TableState::default(),
            selected_position: 1,
            input_mode: InputMode::Normal,
            input: String::new(),
            chart_focus: ChartFocus::default(),
            flash_message: None,
            pending_season: Some(clamp_season(season)),
            is_loading: false,
            load_error: None,
            spinner_frame: 0,
            should_quit: false,
            config_path,
            theme,
        }
    }

    /// Season shown in the title: the one in flight while loading, else the loaded one
    pub fn display_season(&self) -> Option<u32> {
        if self.is_loading {
            self.session.requested_season().or(self.session.season())
        } else {
            self.session.season().or(self.session.requested_season())
        }
    }

    // Tabs

    pub fn select_tab(&mut self, tab: Tab) {
        if self.tab != tab {
            self.tab = tab;
            self.reset_selection();
        }
    }

    pub fn next_tab(&mut self) {
        let next = Tab::ALL[(self.tab.index() + 1) % Tab::ALL.len()];
        self.select_tab(next);
    }

    pub fn previous_tab(&mut self) {
        let len = Tab::ALL.len();
        let prev = Tab::ALL[(self.tab.index() + len - 1) % len];
        self.select_tab(prev);
    }

    // Row selection

    /// Rows in the current tab's selectable list
    pub fn row_count(&self) -> usize {
        let standings = &self.session.snapshot().standings;
        match self.tab {
            Tab::Drivers => standings.driver_custom.len(),
            Tab::Teams => standings.team_custom.len(),
            Tab::Progression => self.session.snapshot().progression.series.len(),
            Tab::Results => self.session.rounds().len(),
        }
    }

    fn reset_selection(&mut self) {
        let selected = if self.row_count() == 0 { None } else { Some(0) };
        self.table_state.select(selected);
    }

    /// Keep the selection inside the list after data changed
    pub fn clamp_selection(&mut self) {
        let count = self.row_count();
        match self.table_state.selected() {
            _ if count == 0 => self.table_state.select(None),
            Some(i) if i >= count => self.table_state.select(Some(count - 1)),
            None => self.table_state.select(Some(0)),
            Some(_) => {}
        }
    }

    pub fn next_row(&mut self) {
        let count = self.row_count();
        if count == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < count => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        let count = self.row_count();
        if count == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => count - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    pub fn selected_round(&self) -> Option<&Round> {
        if self.tab != Tab::Results {
            return None;
        }
        self.table_state
            .selected()
            .and_then(|i| self.session.rounds().get(i))
    }

    /// Driver under the cursor in the Progression list
    pub fn selected_driver(&self) -> Option<&DriverSeries> {
        if self.tab != Tab::Progression {
            return None;
        }
        let ranked = ranked_series(&self.session.snapshot().progression);
        self.table_state
            .selected()
            .and_then(|i| ranked.get(i).copied())
    }

    // Chart focus

    pub fn pin_selected_driver(&mut self, slot: FocusSlot) {
        let Some(series) = self.selected_driver() else {
            return;
        };
        let (key, name) = (series.key.clone(), series.name.clone());
        let label = match slot {
            FocusSlot::First => {
                self.chart_focus.pin_first(key);
                "driver 1"
            }
            FocusSlot::Second => {
                self.chart_focus.pin_second(key);
                "driver 2"
            }
        };
        self.show_flash(format!("Pinned {} as {}", name, label));
    }

    pub fn clear_focus(&mut self) {
        if self.chart_focus.is_active() {
            self.chart_focus.clear();
            self.show_flash("Showing all drivers".to_string());
        }
    }

    // Position selector

    pub fn max_position(&self) -> u32 {
        u32::try_from(self.session.max_position()).unwrap_or(u32::MAX).max(1)
    }

    pub fn next_position(&mut self) {
        self.selected_position = if self.selected_position >= self.max_position() {
            1
        } else {
            self.selected_position + 1
        };
    }

    pub fn previous_position(&mut self) {
        self.selected_position = if self.selected_position <= 1 {
            self.max_position()
        } else {
            self.selected_position - 1
        };
    }

    // Points editor

    /// Value the editor for `target` currently shows
    pub fn current_value(&self, target: EditTarget) -> u32 {
        let scoring = self.session.scoring();
        let position = i64::from(self.selected_position);
        match target {
            EditTarget::Race => scoring.points_for(position, Session::Race),
            EditTarget::Sprint => scoring.points_for(position, Session::Sprint),
            EditTarget::PoleBonus => scoring.pole_bonus(),
            EditTarget::FastestLapBonus => scoring.fastest_lap_bonus(),
        }
    }

    pub fn start_edit(&mut self, target: EditTarget) {
        self.input = self.current_value(target).to_string();
        self.input_mode = InputMode::Editing(target);
    }

    /// Apply the editor text. Anything that is not a number stores 0.
    pub fn confirm_edit(&mut self) {
        let target = match self.input_mode {
            InputMode::Editing(target) => target,
            _ => return,
        };
        let position = self.selected_position;
        let input = std::mem::take(&mut self.input);
        let scoring = self.session.scoring_mut();

        let result = match target {
            EditTarget::Race => scoring.set_points_from_input(position, Session::Race, &input),
            EditTarget::Sprint => scoring.set_points_from_input(position, Session::Sprint, &input),
            EditTarget::PoleBonus => Ok(scoring.set_pole_bonus_from_input(&input)),
            EditTarget::FastestLapBonus => Ok(scoring.set_fastest_lap_bonus_from_input(&input)),
        };
        self.input_mode = InputMode::Normal;

        match result {
            Ok(_) => {
                let value = self.current_value(target);
                self.show_flash(format!("{}: {}", target.prompt(position), value));
            }
            Err(e) => self.show_error(format!("Edit rejected: {}", e)),
        }
    }

    pub fn cancel_edit(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input.clear();
    }

    pub fn reset_scoring(&mut self) {
        self.session.scoring_mut().reset_to_official();
        self.show_flash("Scoring reset to official".to_string());
    }

    pub fn save_scoring(&mut self) {
        match crate::config::save_scoring(self.config_path.clone(), self.session.scoring()) {
            Ok(path) => self.show_flash(format!("Saved scheme to {}", path.display())),
            Err(e) => self.show_error(format!("Failed to save scheme: {:#}", e)),
        }
    }

    // Seasons

    pub fn previous_season(&mut self) {
        if let Some(season) = self.display_season() {
            if season > FIRST_SEASON {
                self.request_season(season - 1);
            } else {
                self.show_flash(format!("{} is the first season", FIRST_SEASON));
            }
        }
    }

    pub fn next_season(&mut self) {
        if let Some(season) = self.display_season() {
            if season < current_season() {
                self.request_season(season + 1);
            } else {
                self.show_flash(format!("{} is the latest season", season));
            }
        }
    }

    pub fn reload_season(&mut self) {
        if let Some(season) = self.display_season() {
            self.request_season(season);
        }
    }

    fn request_season(&mut self, season: u32) {
        self.pending_season = Some(clamp_season(season));
    }

    /// Hand out the next season to load, registering it with the session.
    pub fn take_pending_load(&mut self) -> Option<LoadTicket> {
        let season = self.pending_season.take()?;
        self.is_loading = true;
        self.load_error = None;
        Some(self.session.begin_load(season))
    }

    /// Apply a finished load. Results for superseded tickets are dropped.
    pub fn apply_load(&mut self, ticket: LoadTicket, outcome: LoadOutcome) {
        if !self.session.is_current(&ticket) {
            tracing::debug!(season = ticket.season, "Ignoring superseded load");
            return;
        }
        self.is_loading = false;
        match outcome {
            LoadOutcome::Loaded(rounds) => {
                let count = rounds.len();
                self.session.finish_load(ticket, rounds);
                self.session.recompute();
                self.chart_focus.clear();
                self.selected_position = self.selected_position.min(self.max_position());
                self.reset_selection();
                if count == 0 {
                    self.show_flash(format!("No results yet for {}", ticket.season));
                } else {
                    self.show_flash(format!("Loaded {} ({} rounds)", ticket.season, count));
                }
            }
            LoadOutcome::Failed(message) => {
                tracing::warn!(season = ticket.season, error = %message, "Season load failed");
                self.load_error = Some(message.clone());
                self.show_error(format!("Failed to load {}: {}", ticket.season, message));
            }
            LoadOutcome::TimedOut => {
                self.load_error = Some("timed out".to_string());
                self.show_error(format!("Loading {} timed out", ticket.season));
            }
        }
    }

    // Browser

    pub fn open_selected_round(&mut self) {
        let Some(round) = self.selected_round() else {
            return;
        };
        let name = round.name.clone();
        match round.url.clone() {
            Some(url) => match crate::browser::open_url(&url) {
                Ok(()) => self.show_flash(format!("Opened: {}", name)),
                Err(e) => self.show_error(format!("Failed to open browser: {}", e)),
            },
            None => self.show_error(format!("No info page for {}", name)),
        }
    }

    // Flash and ticks

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, FlashKind::Info, Instant::now()));
    }

    pub fn show_error(&mut self, msg: String) {
        self.flash_message = Some((msg, FlashKind::Error, Instant::now()));
    }

    pub fn update_flash(&mut self) {
        if let Some((_, _, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= FLASH_SECS {
                self.flash_message = None;
            }
        }
    }

    /// Periodic housekeeping; edits are folded into the tables here.
    pub fn on_tick(&mut self) {
        self.update_flash();
        if self.is_loading {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
        if self.session.recompute_if_dirty() {
            self.clamp_selection();
        }
    }

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }
}

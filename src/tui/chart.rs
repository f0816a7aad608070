//! Progression data shaped for the ratatui chart widget.

use std::collections::HashMap;

use crate::season::{team_rgb, EntityKey, Round};
use crate::standings::{DriverSeries, Progression};

/// Lines drawn at once; more than this is unreadable in a terminal.
pub const MAX_CHART_SERIES: usize = 10;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChartError {
    #[error("no rounds loaded for this season")]
    NoRounds,
    #[error("no driver has a points series")]
    NoSeries,
}

/// Head-to-head selection: with either slot filled only pinned drivers are drawn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartFocus {
    pub first: Option<EntityKey>,
    pub second: Option<EntityKey>,
}

impl ChartFocus {
    pub fn is_active(&self) -> bool {
        self.first.is_some() || self.second.is_some()
    }

    /// Pin as driver 1. A driver cannot hold both slots.
    pub fn pin_first(&mut self, key: EntityKey) {
        if self.second.as_ref() == Some(&key) {
            self.second = None;
        }
        self.first = Some(key);
    }

    /// Pin as driver 2. A driver cannot hold both slots.
    pub fn pin_second(&mut self, key: EntityKey) {
        if self.first.as_ref() == Some(&key) {
            self.first = None;
        }
        self.second = Some(key);
    }

    pub fn clear(&mut self) {
        self.first = None;
        self.second = None;
    }

    pub fn line_style(&self, key: &EntityKey) -> Option<LineStyle> {
        if self.first.as_ref() == Some(key) {
            Some(LineStyle::Solid)
        } else if self.second.as_ref() == Some(key) {
            Some(LineStyle::Dashed)
        } else {
            None
        }
    }
}

/// Driver 2 is drawn with a sparser marker so the pair stays distinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    pub key: EntityKey,
    pub rgb: (u8, u8, u8),
    pub style: LineStyle,
    /// (round index, cumulative points)
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub series: Vec<ChartSeries>,
    pub x_max: f64,
    pub y_max: f64,
    /// Only the pinned drivers are shown
    pub focused: bool,
}

/// Team of each driver's first race result, for line colors. Sprint rows
/// don't count.
fn first_race_teams(rounds: &[Round]) -> HashMap<&EntityKey, &str> {
    let mut teams = HashMap::new();
    for row in rounds.iter().flat_map(|round| &round.results) {
        teams
            .entry(&row.driver.key)
            .or_insert(row.constructor.name.as_str());
    }
    teams
}

/// Drivers by final total, highest first. Ties keep first-seen order.
/// This is also the order of the selectable list next to the chart.
pub fn ranked_series(progression: &Progression) -> Vec<&DriverSeries> {
    let mut ranked: Vec<_> = progression.series.iter().collect();
    ranked.sort_by(|a, b| b.final_total().cmp(&a.final_total()));
    ranked
}

/// Lay driver series out on the round axis. Ragged series start at their own
/// offset.
///
/// Without focus the top drivers by final total are drawn. With focus only
/// the pinned drivers are, driver 1 first. Pins that match nobody in this
/// season fall back to the unfocused view.
pub fn build_chart_data(
    progression: &Progression,
    rounds: &[Round],
    focus: &ChartFocus,
) -> Result<ChartData, ChartError> {
    if progression.round_count() == 0 {
        return Err(ChartError::NoRounds);
    }
    if progression.series.is_empty() {
        return Err(ChartError::NoSeries);
    }

    let teams = first_race_teams(rounds);
    let to_chart = |s: &DriverSeries, style: LineStyle| ChartSeries {
        name: s.name.clone(),
        key: s.key.clone(),
        rgb: teams.get(&s.key).map(|team| team_rgb(team)).unwrap_or((136, 136, 136)),
        style,
        points: s
            .totals
            .iter()
            .enumerate()
            .map(|(i, total)| ((s.start + i) as f64, f64::from(*total)))
            .collect(),
    };

    let pinned: Vec<ChartSeries> = [focus.first.as_ref(), focus.second.as_ref()]
        .into_iter()
        .flatten()
        .filter_map(|key| progression.series_for(key))
        .filter_map(|s| focus.line_style(&s.key).map(|style| to_chart(s, style)))
        .collect();

    let focused = !pinned.is_empty();
    let series = if focused {
        pinned
    } else {
        ranked_series(progression)
            .into_iter()
            .take(MAX_CHART_SERIES)
            .map(|s| to_chart(s, LineStyle::Solid))
            .collect()
    };

    Ok(ChartData {
        labels: progression.labels.clone(),
        series,
        x_max: progression.round_count().saturating_sub(1).max(1) as f64,
        y_max: f64::from(progression.max_total().max(1)),
        focused,
    })
}

//! Cumulative points per driver, round by round, for charting.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::engine::earned_points;
use crate::scoring::{ScoringConfig, Session};
use crate::season::{EntityKey, Round};

/// How series for drivers who join mid-season are shaped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionPolicy {
    /// A driver first seen at round index `i` gets `rounds - i` entries.
    #[default]
    Ragged,
    /// Every series has one entry per round; rounds before the debut are 0.
    ZeroPadded,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverSeries {
    pub name: String,
    #[serde(skip)]
    pub key: EntityKey,
    /// Round index (0-based) of the driver's first appearance
    pub first_round: usize,
    /// Round index that `totals[0]` belongs to
    pub start: usize,
    pub totals: Vec<u32>,
}

impl DriverSeries {
    /// Cumulative total after the round at `round_index`, if the series covers it
    pub fn value_at(&self, round_index: usize) -> Option<u32> {
        round_index
            .checked_sub(self.start)
            .and_then(|i| self.totals.get(i).copied())
    }

    pub fn final_total(&self) -> u32 {
        self.totals.last().copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Progression {
    /// One display label per round, in round order
    pub labels: Vec<String>,
    /// Drivers in first-seen order
    pub series: Vec<DriverSeries>,
    pub policy: ProgressionPolicy,
}

impl Progression {
    pub fn round_count(&self) -> usize {
        self.labels.len()
    }

    pub fn series_for(&self, key: &EntityKey) -> Option<&DriverSeries> {
        self.series.iter().find(|s| &s.key == key)
    }

    /// Highest cumulative total across all drivers (chart y-axis bound)
    pub fn max_total(&self) -> u32 {
        self.series.iter().map(|s| s.final_total()).max().unwrap_or(0)
    }
}

/// Cumulative custom-scheme totals after each round.
///
/// Uses the same per-row formula as the standings (base, fastest lap, pole,
/// sprint). Only the custom scheme is tracked.
pub fn build_progression(
    rounds: &[Round],
    config: &ScoringConfig,
    policy: ProgressionPolicy,
) -> Progression {
    let mut series: Vec<DriverSeries> = Vec::new();
    let mut index: HashMap<EntityKey, usize> = HashMap::new();
    let mut running: Vec<u32> = Vec::new();

    for (i, round) in rounds.iter().enumerate() {
        let race_rows = round.results.iter().map(|row| (row, Session::Race));
        let sprint_rows = round.sprint_results().iter().map(|row| (row, Session::Sprint));

        for (row, session) in race_rows.chain(sprint_rows) {
            let slot = *index.entry(row.driver.key.clone()).or_insert_with(|| {
                let (start, totals) = match policy {
                    ProgressionPolicy::Ragged => (i, Vec::new()),
                    ProgressionPolicy::ZeroPadded => (0, vec![0; i]),
                };
                series.push(DriverSeries {
                    name: row.driver.name.clone(),
                    key: row.driver.key.clone(),
                    first_round: i,
                    start,
                    totals,
                });
                running.push(0);
                series.len() - 1
            });
            let earned = earned_points(row, round, config, session).total();
            running[slot] = running[slot].saturating_add(earned);
        }

        for (s, total) in series.iter_mut().zip(&running) {
            s.totals.push(*total);
        }
    }

    Progression {
        labels: rounds.iter().map(|r| r.name.clone()).collect(),
        series,
        policy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::season::canonical_key;
    use crate::testutil::{quali_row, race_row, round_with};
    use std::collections::BTreeMap;

    fn flat(points: &[(u32, u32)]) -> ScoringConfig {
        ScoringConfig::from_parts(
            points.iter().copied().collect::<BTreeMap<_, _>>(),
            BTreeMap::from([(1, 8)]),
            0,
            0,
        )
    }

    fn two_rounds() -> Vec<Round> {
        vec![
            round_with(1, vec![race_row(1, "A", "T1", false)]),
            round_with(
                2,
                vec![race_row(1, "C", "T2", false), race_row(2, "A", "T1", false)],
            ),
        ]
    }

    #[test]
    fn test_late_driver_ragged_series() {
        let cfg = flat(&[(1, 10), (2, 6)]);
        let progression = build_progression(&two_rounds(), &cfg, ProgressionPolicy::Ragged);

        let c = progression.series_for(&canonical_key("C")).unwrap();
        assert_eq!(c.totals, vec![10]);
        assert_eq!(c.first_round, 1);
        assert_eq!(c.value_at(0), None);
        assert_eq!(c.value_at(1), Some(10));

        let a = progression.series_for(&canonical_key("A")).unwrap();
        assert_eq!(a.totals, vec![10, 16]);
    }

    #[test]
    fn test_late_driver_zero_padded_series() {
        let cfg = flat(&[(1, 10), (2, 6)]);
        let progression = build_progression(&two_rounds(), &cfg, ProgressionPolicy::ZeroPadded);

        let c = progression.series_for(&canonical_key("C")).unwrap();
        assert_eq!(c.totals, vec![0, 10]);
        assert_eq!(c.first_round, 1);
        assert_eq!(c.value_at(0), Some(0));
        assert!(progression
            .series
            .iter()
            .all(|s| s.totals.len() == progression.round_count()));
    }

    #[test]
    fn test_labels_align_with_rounds() {
        let progression =
            build_progression(&two_rounds(), &ScoringConfig::official(), ProgressionPolicy::Ragged);
        assert_eq!(
            progression.labels,
            vec!["Round 1 Grand Prix", "Round 2 Grand Prix"]
        );
    }

    #[test]
    fn test_absent_driver_carries_total_forward() {
        let rounds = vec![
            round_with(1, vec![race_row(1, "A", "T1", false)]),
            round_with(2, vec![race_row(1, "B", "T2", false)]),
            round_with(3, vec![race_row(1, "A", "T1", false)]),
        ];
        let progression = build_progression(&rounds, &flat(&[(1, 5)]), ProgressionPolicy::Ragged);
        let a = progression.series_for(&canonical_key("A")).unwrap();
        assert_eq!(a.totals, vec![5, 5, 10]);
        let b = progression.series_for(&canonical_key("B")).unwrap();
        assert_eq!(b.totals, vec![5, 5]);
    }

    #[test]
    fn test_includes_bonuses_and_sprint() {
        let mut round = round_with(1, vec![race_row(1, "A", "T1", true)]);
        round.qualifying = Some(vec![quali_row(1, "A")]);
        round.sprint = Some(vec![race_row(1, "A", "T1", false), race_row(2, "S", "T9", false)]);
        let cfg = ScoringConfig::from_parts(
            BTreeMap::from([(1, 25)]),
            BTreeMap::from([(1, 8), (2, 7)]),
            1,
            1,
        );

        let progression = build_progression(&[round], &cfg, ProgressionPolicy::Ragged);
        assert_eq!(progression.series_for(&canonical_key("A")).unwrap().totals, vec![35]);
        // Sprint-only driver still gets a series
        assert_eq!(progression.series_for(&canonical_key("S")).unwrap().totals, vec![7]);
    }

    #[test]
    fn test_final_totals_match_custom_standings() {
        let mut rounds = two_rounds();
        rounds[1].qualifying = Some(vec![quali_row(1, "A")]);
        rounds[0].sprint = Some(vec![race_row(1, "C", "T2", false)]);
        let mut cfg = flat(&[(1, 10), (2, 6)]);
        cfg.set_pole_bonus(2);

        let progression = build_progression(&rounds, &cfg, ProgressionPolicy::Ragged);
        let standings = crate::standings::compute_standings(&rounds, &cfg);
        for s in &progression.series {
            assert_eq!(Some(s.final_total()), standings.driver_custom.points_of(&s.key));
        }
        assert_eq!(progression.max_total(), 18);
    }

    #[test]
    fn test_empty_season() {
        let progression = build_progression(&[], &ScoringConfig::official(), ProgressionPolicy::Ragged);
        assert_eq!(progression.round_count(), 0);
        assert!(progression.series.is_empty());
        assert_eq!(progression.max_total(), 0);
    }
}

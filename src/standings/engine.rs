use serde::Serialize;

use super::table::{StandingsTable, TableBuilder};
use crate::scoring::{ScoringConfig, Session};
use crate::season::{RaceResult, Round};

/// Points one result row earned, split by source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PointsBreakdown {
    pub base: u32,
    pub fastest_lap: u32,
    pub pole: u32,
}

impl PointsBreakdown {
    pub fn total(&self) -> u32 {
        self.base
            .saturating_add(self.fastest_lap)
            .saturating_add(self.pole)
    }
}

/// Points a single row earns under `config`.
///
/// Race rows collect the fastest-lap bonus when flagged, and the pole bonus
/// when the same driver qualified P1 for this round. Sprint rows only score
/// their position.
pub fn earned_points(
    result: &RaceResult,
    round: &Round,
    config: &ScoringConfig,
    session: Session,
) -> PointsBreakdown {
    let base = config.points_for_position(&result.position, session);
    if session == Session::Sprint {
        return PointsBreakdown {
            base,
            ..Default::default()
        };
    }

    let fastest_lap = if result.fastest_lap {
        config.fastest_lap_bonus()
    } else {
        0
    };
    let pole = if round.pole_sitter() == Some(&result.driver.key) {
        config.pole_bonus()
    } else {
        0
    };

    PointsBreakdown {
        base,
        fastest_lap,
        pole,
    }
}

/// Driver and constructor tables under the custom and the official scheme.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Standings {
    pub driver_custom: StandingsTable,
    pub driver_official: StandingsTable,
    pub team_custom: StandingsTable,
    pub team_official: StandingsTable,
}

#[derive(Default)]
struct Totals {
    driver_custom: TableBuilder,
    driver_official: TableBuilder,
    team_custom: TableBuilder,
    team_official: TableBuilder,
}

impl Totals {
    fn add_row(&mut self, row: &RaceResult, custom: u32, official: u32) {
        let driver = &row.driver;
        let team = &row.constructor;
        self.driver_custom.add(&driver.key, &driver.name, custom);
        self.driver_official.add(&driver.key, &driver.name, official);
        self.team_custom.add(&team.key, &team.name, custom);
        self.team_official.add(&team.key, &team.name, official);
    }

    fn finish(self) -> Standings {
        Standings {
            driver_custom: self.driver_custom.finish(),
            driver_official: self.driver_official.finish(),
            team_custom: self.team_custom.finish(),
            team_official: self.team_official.finish(),
        }
    }
}

/// Fold every round into the four standings tables.
///
/// The official tables use the fixed official mappings and never receive
/// bonuses. Anyone who appears in a result row is listed, even on 0 points.
pub fn compute_standings(rounds: &[Round], config: &ScoringConfig) -> Standings {
    let official = ScoringConfig::official();
    let mut totals = Totals::default();

    for round in rounds {
        for row in &round.results {
            let custom = earned_points(row, round, config, Session::Race).total();
            let official_pts = official.points_for_position(&row.position, Session::Race);
            totals.add_row(row, custom, official_pts);
        }

        for row in round.sprint_results() {
            let custom = config.points_for_position(&row.position, Session::Sprint);
            let official_pts = official.points_for_position(&row.position, Session::Sprint);
            totals.add_row(row, custom, official_pts);
        }
    }

    totals.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::season::canonical_key;
    use crate::testutil::{quali_row, race_row, round_with};
    use std::collections::BTreeMap;

    fn config(race: &[(u32, u32)], sprint: &[(u32, u32)], pole: u32, fl: u32) -> ScoringConfig {
        ScoringConfig::from_parts(
            race.iter().copied().collect::<BTreeMap<_, _>>(),
            sprint.iter().copied().collect::<BTreeMap<_, _>>(),
            pole,
            fl,
        )
    }

    fn points(table: &StandingsTable, name: &str) -> u32 {
        table.points_of(&canonical_key(name)).unwrap()
    }

    #[test]
    fn test_pole_and_fastest_lap_example() {
        let mut round = round_with(
            1,
            vec![race_row(1, "A", "T1", true), race_row(2, "B", "T2", false)],
        );
        round.qualifying = Some(vec![quali_row(1, "A")]);
        let cfg = config(&[(1, 25), (2, 18)], &[], 1, 1);

        let standings = compute_standings(&[round], &cfg);
        assert_eq!(points(&standings.driver_custom, "A"), 27);
        assert_eq!(points(&standings.driver_official, "A"), 25);
        assert_eq!(points(&standings.driver_custom, "B"), 18);
        assert_eq!(points(&standings.driver_official, "B"), 18);
        assert_eq!(points(&standings.team_custom, "T1"), 27);
        assert_eq!(points(&standings.team_official, "T2"), 18);
    }

    #[test]
    fn test_sprint_uses_sprint_mapping() {
        let mut round = round_with(1, vec![race_row(1, "A", "T1", false)]);
        round.sprint = Some(vec![race_row(1, "A", "T1", true)]);
        let cfg = config(&[(1, 25)], &[(1, 8)], 3, 3);

        let standings = compute_standings(&[round], &cfg);
        // 25 race + 8 sprint; sprint rows never collect the fastest-lap bonus
        assert_eq!(points(&standings.driver_custom, "A"), 33);
        assert_eq!(points(&standings.driver_official, "A"), 33);
    }

    #[test]
    fn test_official_ignores_custom_changes_and_bonuses() {
        let mut round = round_with(1, vec![race_row(1, "A", "T1", true)]);
        round.qualifying = Some(vec![quali_row(1, "A")]);
        round.sprint = Some(vec![race_row(2, "A", "T1", false)]);
        let cfg = config(&[(1, 100)], &[(2, 50)], 10, 10);

        let standings = compute_standings(&[round], &cfg);
        assert_eq!(points(&standings.driver_custom, "A"), 170);
        assert_eq!(points(&standings.driver_official, "A"), 25 + 7);
    }

    #[test]
    fn test_pole_matched_by_identity_key() {
        let mut round = round_with(1, vec![race_row(3, "Max Verstappen", "Red Bull", false)]);
        // Different spacing and case than the race row
        round.qualifying = Some(vec![quali_row(1, "max  VERSTAPPEN")]);
        let cfg = config(&[], &[], 4, 0);

        let standings = compute_standings(&[round], &cfg);
        assert_eq!(points(&standings.driver_custom, "Max Verstappen"), 4);
    }

    #[test]
    fn test_pole_requires_p1_in_same_round() {
        let mut r1 = round_with(1, vec![race_row(2, "A", "T1", false)]);
        r1.qualifying = Some(vec![quali_row(2, "A"), quali_row(1, "B")]);
        let mut r2 = round_with(2, vec![race_row(5, "B", "T2", false)]);
        r2.qualifying = Some(vec![]);
        let cfg = config(&[], &[], 1, 0);

        let standings = compute_standings(&[r1, r2], &cfg);
        assert_eq!(points(&standings.driver_custom, "A"), 0);
        // B took pole in round 1 but did not race there
        assert_eq!(points(&standings.driver_custom, "B"), 0);
    }

    #[test]
    fn test_unmapped_position_scores_only_bonus() {
        let round = round_with(
            1,
            vec![race_row(17, "A", "T1", true), race_row(0, "B", "T2", true)],
        );
        let cfg = config(&[(1, 25)], &[], 0, 2);

        let standings = compute_standings(&[round], &cfg);
        assert_eq!(points(&standings.driver_custom, "A"), 2);
        assert_eq!(points(&standings.driver_custom, "B"), 2);
        assert_eq!(points(&standings.driver_official, "B"), 0);
    }

    #[test]
    fn test_zero_point_entities_are_listed() {
        let round = round_with(1, vec![race_row(20, "Backmarker", "Minardi", false)]);
        let standings = compute_standings(&[round], &ScoringConfig::official());
        assert_eq!(standings.driver_custom.len(), 1);
        assert_eq!(standings.team_official.len(), 1);
        assert_eq!(points(&standings.driver_custom, "Backmarker"), 0);
    }

    #[test]
    fn test_sorted_descending_with_stable_ties() {
        let round = round_with(
            1,
            vec![
                race_row(3, "C", "T1", false),
                race_row(1, "A", "T2", false),
                race_row(2, "B", "T3", false),
            ],
        );
        let cfg = config(&[(1, 10), (2, 10), (3, 5)], &[], 0, 0);
        let standings = compute_standings(&[round], &cfg);
        let names: Vec<&str> = standings
            .driver_custom
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        // A and B tie on 10; A was seen first
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_idempotent() {
        let mut r1 = round_with(1, vec![race_row(1, "A", "T1", true), race_row(2, "B", "T1", false)]);
        r1.qualifying = Some(vec![quali_row(1, "B")]);
        let r2 = round_with(2, vec![race_row(1, "B", "T1", false), race_row(2, "A", "T1", true)]);
        let rounds = vec![r1, r2];
        let mut cfg = ScoringConfig::official();
        cfg.set_pole_bonus(1);
        cfg.set_fastest_lap_bonus(1);

        let snapshot_rounds = rounds.clone();
        let snapshot_cfg = cfg.clone();
        let first = compute_standings(&rounds, &cfg);
        let second = compute_standings(&rounds, &cfg);
        assert_eq!(first, second);
        assert_eq!(rounds, snapshot_rounds);
        assert_eq!(cfg, snapshot_cfg);
    }

    #[test]
    fn test_driver_and_team_sums_match() {
        let mut rounds = Vec::new();
        for n in 1..=6u32 {
            let rows: Vec<_> = (1..=12u32)
                .map(|pos| {
                    let driver = format!("D{}", (pos + n) % 12);
                    let team = format!("T{}", ((pos + n) % 12) / 2);
                    race_row(pos, &driver, &team, pos == n)
                })
                .collect();
            let mut round = round_with(n, rows);
            round.qualifying = Some(vec![quali_row(1, &format!("D{}", n % 12))]);
            rounds.push(round);
        }
        let mut cfg = ScoringConfig::official();
        cfg.set_pole_bonus(3);
        cfg.set_fastest_lap_bonus(2);

        let standings = compute_standings(&rounds, &cfg);
        assert_eq!(
            standings.driver_custom.total_points(),
            standings.team_custom.total_points()
        );
        assert_eq!(
            standings.driver_official.total_points(),
            standings.team_official.total_points()
        );
    }

    #[test]
    fn test_earned_points_breakdown() {
        let mut round = round_with(1, vec![race_row(1, "A", "T1", true)]);
        round.qualifying = Some(vec![quali_row(1, "A")]);
        let cfg = config(&[(1, 25)], &[(1, 8)], 2, 1);

        let race = earned_points(&round.results[0], &round, &cfg, Session::Race);
        assert_eq!(
            race,
            PointsBreakdown {
                base: 25,
                fastest_lap: 1,
                pole: 2
            }
        );
        assert_eq!(race.total(), 28);

        let sprint = earned_points(&round.results[0], &round, &cfg, Session::Sprint);
        assert_eq!(sprint.total(), 8);
    }

    #[test]
    fn test_no_rounds() {
        let standings = compute_standings(&[], &ScoringConfig::official());
        assert!(standings.driver_custom.is_empty());
        assert!(standings.team_official.is_empty());
    }
}

//! Season state shared by the CLI and the TUI.
//!
//! Holds the loaded rounds and the custom scheme, tracks which season load is
//! current, and rebuilds derived tables through an explicit [`SeasonSession::recompute`].

use serde::Serialize;
use tracing::debug;

use crate::scoring::ScoringConfig;
use crate::season::{max_result_len, Round};
use crate::standings::{
    build_progression, compute_standings, Progression, ProgressionPolicy, Standings,
};

/// Issued when a season load starts; only the newest ticket may deliver data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub season: u32,
    generation: u64,
}

/// Everything the rendering layer needs after a recompute.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub standings: Standings,
    pub progression: Progression,
    /// Scoring revision the snapshot was built from
    #[serde(skip)]
    pub revision: u64,
}

pub struct SeasonSession {
    season: Option<u32>,
    requested: Option<u32>,
    generation: u64,
    rounds: Vec<Round>,
    scoring: ScoringConfig,
    policy: ProgressionPolicy,
    snapshot: Snapshot,
    computed_revision: Option<u64>,
}

impl SeasonSession {
    pub fn new(scoring: ScoringConfig, policy: ProgressionPolicy) -> Self {
        Self {
            season: None,
            requested: None,
            generation: 0,
            rounds: Vec::new(),
            scoring,
            policy,
            snapshot: Snapshot::default(),
            computed_revision: None,
        }
    }

    /// Start loading `season`. Any ticket issued earlier becomes stale.
    pub fn begin_load(&mut self, season: u32) -> LoadTicket {
        self.generation += 1;
        self.requested = Some(season);
        LoadTicket {
            season,
            generation: self.generation,
        }
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Install rounds delivered for `ticket`. Returns false and drops the data
    /// when a newer load has been started since.
    pub fn finish_load(&mut self, ticket: LoadTicket, rounds: Vec<Round>) -> bool {
        if !self.is_current(&ticket) {
            debug!(
                season = ticket.season,
                current = ?self.requested,
                "Discarding superseded season load"
            );
            return false;
        }
        self.season = Some(ticket.season);
        self.rounds = rounds;
        self.computed_revision = None;
        true
    }

    /// Season whose rounds are currently held
    pub fn season(&self) -> Option<u32> {
        self.season
    }

    /// Season most recently asked for (may still be loading)
    pub fn requested_season(&self) -> Option<u32> {
        self.requested
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    /// Mutable access for editors. Mutations bump the scoring revision, which
    /// marks the session dirty.
    pub fn scoring_mut(&mut self) -> &mut ScoringConfig {
        &mut self.scoring
    }

    pub fn policy(&self) -> ProgressionPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: ProgressionPolicy) {
        if self.policy != policy {
            self.policy = policy;
            self.computed_revision = None;
        }
    }

    /// Upper bound of the position selector
    pub fn max_position(&self) -> usize {
        max_result_len(&self.rounds)
    }

    pub fn is_dirty(&self) -> bool {
        self.computed_revision != Some(self.scoring.revision())
    }

    /// Rebuild standings and progression from scratch.
    pub fn recompute(&mut self) -> &Snapshot {
        let revision = self.scoring.revision();
        self.snapshot = Snapshot {
            standings: compute_standings(&self.rounds, &self.scoring),
            progression: build_progression(&self.rounds, &self.scoring, self.policy),
            revision,
        };
        self.computed_revision = Some(revision);
        debug!(revision, rounds = self.rounds.len(), "Recomputed standings");
        &self.snapshot
    }

    /// Recompute only when something changed since the last snapshot.
    pub fn recompute_if_dirty(&mut self) -> bool {
        if self.is_dirty() {
            self.recompute();
            true
        } else {
            false
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Session;
    use crate::season::canonical_key;
    use crate::testutil::{race_row, round_with};

    fn session() -> SeasonSession {
        SeasonSession::new(ScoringConfig::official(), ProgressionPolicy::Ragged)
    }

    fn rounds_for(driver: &str) -> Vec<Round> {
        vec![round_with(1, vec![race_row(1, driver, "T1", false)])]
    }

    #[test]
    fn test_superseded_load_is_discarded() {
        let mut s = session();
        let old = s.begin_load(2022);
        let new = s.begin_load(2023);

        assert!(s.finish_load(new, rounds_for("New")));
        // The slower, older request finishes last and must not overwrite
        assert!(!s.finish_load(old, rounds_for("Old")));

        assert_eq!(s.season(), Some(2023));
        assert_eq!(s.rounds()[0].results[0].driver.name, "New");
    }

    #[test]
    fn test_stale_ticket_before_newer_completes() {
        let mut s = session();
        let old = s.begin_load(2020);
        let _pending = s.begin_load(2021);
        assert!(!s.is_current(&old));
        assert!(!s.finish_load(old, rounds_for("Old")));
        assert!(s.rounds().is_empty());
        assert_eq!(s.season(), None);
        assert_eq!(s.requested_season(), Some(2021));
    }

    #[test]
    fn test_recompute_after_edit() {
        let mut s = session();
        let ticket = s.begin_load(2024);
        s.finish_load(ticket, rounds_for("A"));
        assert!(s.is_dirty());

        s.recompute();
        let key = canonical_key("A");
        assert_eq!(s.snapshot().standings.driver_custom.points_of(&key), Some(25));
        assert!(!s.is_dirty());

        s.scoring_mut().set_points(1, Session::Race, 40).unwrap();
        assert!(s.is_dirty());
        assert!(s.recompute_if_dirty());
        assert!(!s.recompute_if_dirty());

        let standings = &s.snapshot().standings;
        assert_eq!(standings.driver_custom.points_of(&key), Some(40));
        assert_eq!(standings.driver_official.points_of(&key), Some(25));
    }

    #[test]
    fn test_new_rounds_mark_dirty() {
        let mut s = session();
        s.recompute();
        assert!(!s.is_dirty());
        let ticket = s.begin_load(2019);
        s.finish_load(ticket, rounds_for("B"));
        assert!(s.is_dirty());
    }

    #[test]
    fn test_policy_change_marks_dirty() {
        let mut s = session();
        s.recompute();
        s.set_policy(ProgressionPolicy::ZeroPadded);
        assert!(s.is_dirty());
        s.recompute();
        assert_eq!(s.snapshot().progression.policy, ProgressionPolicy::ZeroPadded);
    }

    #[test]
    fn test_max_position_default() {
        assert_eq!(session().max_position(), 20);
    }
}

use std::collections::HashMap;
use tracing::debug;

use super::types::{QualifyingResult, RacePage, Round, SprintResult};

/// Position selector bound used before any season is loaded.
const DEFAULT_MAX_POSITION: usize = 20;

/// Season rounds keyed by round number, assembled from paginated result pages.
#[derive(Debug, Clone, Default)]
pub struct ResultsRepository {
    rounds: HashMap<u32, Round>,
}

impl ResultsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a sequence of result pages.
    ///
    /// A race split across a page boundary shows up on both pages with the
    /// same round number; its result lists are concatenated in page order.
    pub fn merge_race_pages<I>(pages: I) -> Self
    where
        I: IntoIterator<Item = RacePage>,
    {
        let mut repo = Self::new();
        for page in pages {
            repo.merge_page(page);
        }
        repo
    }

    pub fn merge_page(&mut self, page: RacePage) {
        for entry in page.races {
            match self.rounds.get_mut(&entry.round) {
                Some(existing) => {
                    debug!(
                        round = entry.round,
                        rows = entry.results.len(),
                        "Appending results split across page boundary"
                    );
                    existing.results.extend(entry.results);
                }
                None => {
                    self.rounds.insert(entry.round, Round::from(entry));
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    pub fn round_numbers(&self) -> Vec<u32> {
        let mut numbers: Vec<u32> = self.rounds.keys().copied().collect();
        numbers.sort_unstable();
        numbers
    }

    pub fn get(&self, round: u32) -> Option<&Round> {
        self.rounds.get(&round)
    }

    /// Set qualifying rows for a round. Returns false if the round is unknown.
    pub fn attach_qualifying(&mut self, round: u32, results: Vec<QualifyingResult>) -> bool {
        match self.rounds.get_mut(&round) {
            Some(r) => {
                r.qualifying = Some(results);
                true
            }
            None => false,
        }
    }

    /// Set sprint rows for a round. Returns false if the round is unknown.
    pub fn attach_sprint(&mut self, round: u32, results: Vec<SprintResult>) -> bool {
        match self.rounds.get_mut(&round) {
            Some(r) => {
                r.sprint = Some(results);
                true
            }
            None => false,
        }
    }

    /// Rounds sorted by ascending round number
    pub fn ordered_rounds(&self) -> Vec<Round> {
        let mut rounds: Vec<Round> = self.rounds.values().cloned().collect();
        rounds.sort_by_key(|r| r.number);
        rounds
    }

    pub fn into_ordered_rounds(self) -> Vec<Round> {
        let mut rounds: Vec<Round> = self.rounds.into_values().collect();
        rounds.sort_by_key(|r| r.number);
        rounds
    }
}

/// Longest race classification in the season; bounds the position selector.
pub fn max_result_len(rounds: &[Round]) -> usize {
    rounds
        .iter()
        .map(|r| r.results.len())
        .max()
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_MAX_POSITION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::season::types::{RaceEntry, RaceResult};
    use crate::testutil::race_row;
    use std::collections::BTreeSet;

    fn entry(round: u32, rows: Vec<RaceResult>) -> RaceEntry {
        RaceEntry {
            round,
            name: format!("Round {} Grand Prix", round),
            date: None,
            url: None,
            results: rows,
        }
    }

    /// A synthetic season: `rounds` races with `per_round` classified drivers each
    fn season_rows(rounds: u32, per_round: u32) -> Vec<(u32, RaceResult)> {
        let mut rows = Vec::new();
        for round in 1..=rounds {
            for pos in 1..=per_round {
                rows.push((
                    round,
                    race_row(pos, &format!("Driver{}", pos), &format!("Team{}", pos % 5), false),
                ));
            }
        }
        rows
    }

    /// Split flat (round, row) pairs into pages of `page_size` rows, the way
    /// the API paginates on result rows rather than races.
    fn paginate(rows: &[(u32, RaceResult)], page_size: usize) -> Vec<RacePage> {
        rows.chunks(page_size)
            .map(|chunk| {
                let mut races: Vec<RaceEntry> = Vec::new();
                for (round, row) in chunk {
                    match races.last_mut() {
                        Some(last) if last.round == *round => last.results.push(row.clone()),
                        _ => races.push(entry(*round, vec![row.clone()])),
                    }
                }
                RacePage { races }
            })
            .collect()
    }

    fn result_sets(repo: &ResultsRepository) -> Vec<(u32, BTreeSet<String>)> {
        repo.ordered_rounds()
            .into_iter()
            .map(|r| {
                let set = r
                    .results
                    .iter()
                    .map(|res| format!("{}|{:?}", res.driver.name, res.position))
                    .collect();
                (r.number, set)
            })
            .collect()
    }

    #[test]
    fn test_merge_is_page_boundary_invariant() {
        let rows = season_rows(24, 20);
        let one_page = ResultsRepository::merge_race_pages(paginate(&rows, 1000));
        let many_pages = ResultsRepository::merge_race_pages(paginate(&rows, 100));
        let odd_pages = ResultsRepository::merge_race_pages(paginate(&rows, 7));

        assert_eq!(one_page.len(), 24);
        assert_eq!(result_sets(&one_page), result_sets(&many_pages));
        assert_eq!(result_sets(&one_page), result_sets(&odd_pages));
    }

    #[test]
    fn test_split_round_concatenates_in_page_order() {
        let pages = vec![
            RacePage {
                races: vec![entry(5, vec![race_row(1, "A B", "T1", false)])],
            },
            RacePage {
                races: vec![
                    entry(5, vec![race_row(2, "C D", "T2", false)]),
                    entry(6, vec![race_row(1, "E F", "T3", false)]),
                ],
            },
        ];
        let repo = ResultsRepository::merge_race_pages(pages);
        assert_eq!(repo.len(), 2);
        let round5 = repo.get(5).unwrap();
        let names: Vec<&str> = round5.results.iter().map(|r| r.driver.name.as_str()).collect();
        assert_eq!(names, vec!["A B", "C D"]);
    }

    #[test]
    fn test_ordered_rounds_numeric_order() {
        let pages = vec![RacePage {
            races: vec![entry(10, vec![]), entry(2, vec![]), entry(1, vec![])],
        }];
        let repo = ResultsRepository::merge_race_pages(pages);
        let numbers: Vec<u32> = repo.ordered_rounds().iter().map(|r| r.number).collect();
        // Lexicographic order would put 10 before 2
        assert_eq!(numbers, vec![1, 2, 10]);
        assert_eq!(repo.round_numbers(), vec![1, 2, 10]);
    }

    #[test]
    fn test_empty_pages() {
        let repo = ResultsRepository::merge_race_pages(vec![RacePage::default()]);
        assert!(repo.is_empty());
        assert!(repo.ordered_rounds().is_empty());
    }

    #[test]
    fn test_attach_sub_sessions() {
        let mut repo = ResultsRepository::merge_race_pages(vec![RacePage {
            races: vec![entry(1, vec![race_row(1, "A B", "T1", false)])],
        }]);
        assert!(repo.attach_qualifying(1, vec![]));
        assert!(repo.attach_sprint(1, vec![race_row(1, "A B", "T1", false)]));
        assert!(!repo.attach_sprint(99, vec![]));

        let round = repo.get(1).unwrap();
        assert_eq!(round.qualifying.as_deref().map(|q| q.len()), Some(0));
        assert!(round.has_sprint());
    }

    #[test]
    fn test_max_result_len() {
        assert_eq!(max_result_len(&[]), 20);
        let rows = season_rows(2, 22);
        let repo = ResultsRepository::merge_race_pages(paginate(&rows, 100));
        assert_eq!(max_result_len(&repo.ordered_rounds()), 22);
    }
}

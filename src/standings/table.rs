use serde::Serialize;
use std::collections::HashMap;

use crate::season::EntityKey;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    pub name: String,
    #[serde(skip)]
    pub key: EntityKey,
    pub points: u32,
}

/// Entities ordered by points descending; ties keep discovery order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StandingsTable {
    entries: Vec<Standing>,
}

impl StandingsTable {
    pub fn entries(&self) -> &[Standing] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Standing> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn leader(&self) -> Option<&Standing> {
        self.entries.first()
    }

    pub fn points_of(&self, key: &EntityKey) -> Option<u32> {
        self.entries.iter().find(|s| &s.key == key).map(|s| s.points)
    }

    /// 1-based championship position
    pub fn position_of(&self, key: &EntityKey) -> Option<usize> {
        self.entries.iter().position(|s| &s.key == key).map(|i| i + 1)
    }

    pub fn total_points(&self) -> u64 {
        self.entries.iter().map(|s| u64::from(s.points)).sum()
    }
}

/// Accumulates totals keyed by entity, remembering first-seen order.
#[derive(Debug, Default)]
pub(crate) struct TableBuilder {
    entries: Vec<Standing>,
    index: HashMap<EntityKey, usize>,
}

impl TableBuilder {
    pub(crate) fn add(&mut self, key: &EntityKey, name: &str, points: u32) {
        match self.index.get(key) {
            Some(&i) => {
                let entry = &mut self.entries[i];
                entry.points = entry.points.saturating_add(points);
            }
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push(Standing {
                    name: name.to_string(),
                    key: key.clone(),
                    points,
                });
            }
        }
    }

    pub(crate) fn finish(self) -> StandingsTable {
        let mut entries = self.entries;
        // sort_by is stable: equal totals stay in discovery order
        entries.sort_by(|a, b| b.points.cmp(&a.points));
        StandingsTable { entries }
    }
}

use std::collections::{BTreeMap, BTreeSet};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::{
    rules::face::Face,
    simulation::table::{OutcomeTable, RollNumber},
    utils::write_grid,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grouping {
    /// Order-independent: each roll's faces are sorted before grouping.
    #[default]
    Combination,
    /// Order-sensitive: each roll's faces are grouped as rolled.
    Permutation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyEntry<F> {
    pub key: Vec<F>,
    pub occurrence: usize,
}

/// How often each combination (or permutation) of faces was rolled.
///
/// Entries are sorted ascending by key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyTable<F> {
    grouping: Grouping,
    index_names: Vec<String>,
    entries: Vec<FrequencyEntry<F>>,
}

impl<F> Default for FrequencyTable<F> {
    fn default() -> Self {
        Self {
            grouping: Grouping::default(),
            index_names: Vec::new(),
            entries: Vec::new(),
        }
    }
}

impl<F: Face> FrequencyTable<F> {
    pub const COLUMN_NAME: &'static str = "Occurrence";

    pub fn from_outcomes(outcomes: &OutcomeTable<F>, grouping: Grouping) -> Self {
        let mut counts: BTreeMap<Vec<F>, usize> = BTreeMap::new();
        for row in outcomes.rows() {
            let mut key = row.faces.clone();
            if grouping == Grouping::Combination {
                key.sort();
            }
            *counts.entry(key).or_default() += 1;
        }

        let index_names = (1..=outcomes.num_dice())
            .map(|i| match grouping {
                Grouping::Combination => format!("Face Value #{i}"),
                Grouping::Permutation => format!("Die #{i}"),
            })
            .collect();
        let entries = counts
            .into_iter()
            .map(|(key, occurrence)| FrequencyEntry { key, occurrence })
            .collect();

        Self {
            grouping,
            index_names,
            entries,
        }
    }

    pub fn grouping(&self) -> Grouping {
        self.grouping
    }

    pub fn index_names(&self) -> &[String] {
        &self.index_names
    }

    pub fn entries(&self) -> &[FrequencyEntry<F>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Occurrences of `key`, or 0 if it was never rolled.
    ///
    /// For combinations the key is matched regardless of order.
    pub fn get(&self, key: &[F]) -> usize {
        let mut key = key.to_vec();
        if self.grouping == Grouping::Combination {
            key.sort();
        }
        self.entries
            .binary_search_by(|entry| entry.key.as_slice().cmp(key.as_slice()))
            .map_or(0, |i| self.entries[i].occurrence)
    }

    /// Sum of all occurrences, i.e. the number of rolls counted.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|entry| entry.occurrence).sum()
    }

    pub fn pretty_print(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result {
        let header: Vec<String> = self
            .index_names
            .iter()
            .cloned()
            .chain(std::iter::once(Self::COLUMN_NAME.to_string()))
            .collect();
        let rows: Vec<Vec<String>> = self
            .entries
            .iter()
            .map(|entry| {
                entry
                    .key
                    .iter()
                    .map(ToString::to_string)
                    .chain(std::iter::once(entry.occurrence.to_string()))
                    .collect()
            })
            .collect();
        write_grid(f, &header, &rows)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceCountRow {
    pub roll: RollNumber,
    pub counts: Vec<usize>,
}

/// Per-roll tally of each face. Columns are every distinct face seen in the
/// outcomes, ascending; a face missing from a roll counts 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceCountTable<F> {
    faces: Vec<F>,
    rows: Vec<FaceCountRow>,
}

impl<F> Default for FaceCountTable<F> {
    fn default() -> Self {
        Self {
            faces: Vec::new(),
            rows: Vec::new(),
        }
    }
}

impl<F: Face> FaceCountTable<F> {
    pub const COLUMNS_NAME: &'static str = "Face of Die";

    pub fn from_outcomes(outcomes: &OutcomeTable<F>) -> Self {
        let faces: Vec<F> = outcomes
            .rows()
            .iter()
            .flat_map(|row| row.faces.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let column: FxHashMap<&F, usize> =
            faces.iter().enumerate().map(|(i, face)| (face, i)).collect();

        let rows = outcomes
            .rows()
            .iter()
            .map(|row| {
                let mut counts = vec![0; faces.len()];
                for face in &row.faces {
                    // every face was collected into `column` above
                    if let Some(&i) = column.get(face) {
                        counts[i] += 1;
                    }
                }
                FaceCountRow {
                    roll: row.roll,
                    counts,
                }
            })
            .collect();

        Self { faces, rows }
    }

    pub fn faces(&self) -> &[F] {
        &self.faces
    }

    pub fn rows(&self) -> &[FaceCountRow] {
        &self.rows
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.faces.len())
    }

    /// `None` if the roll or the face is not part of the table.
    pub fn get(&self, roll: RollNumber, face: &F) -> Option<usize> {
        let column = self.faces.binary_search(face).ok()?;
        self.rows
            .iter()
            .find(|row| row.roll == roll)
            .map(|row| row.counts[column])
    }

    pub fn pretty_print(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result {
        let header: Vec<String> = std::iter::once(OutcomeTable::<F>::INDEX_NAME.to_string())
            .chain(self.faces.iter().map(ToString::to_string))
            .collect();
        let rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                std::iter::once(row.roll.to_string())
                    .chain(row.counts.iter().map(ToString::to_string))
                    .collect()
            })
            .collect();
        write_grid(f, &header, &rows)
    }
}

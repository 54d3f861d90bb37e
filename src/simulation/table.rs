use std::str::FromStr;

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

use crate::{
    error::{MonteCarloError, Result},
    rules::face::Face,
    utils::write_grid,
};

/// 1-based position of a roll in a game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    From,
    Into,
    Serialize,
    Deserialize,
)]
pub struct RollNumber(pub u32);

/// 1-based position of a die in a game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    From,
    Into,
    Serialize,
    Deserialize,
)]
pub struct DieNumber(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRow<F> {
    pub roll: RollNumber,
    pub faces: Vec<F>,
}

/// Wide outcome table: one row per roll, one column per die.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeTable<F> {
    columns: Vec<DieNumber>,
    rows: Vec<OutcomeRow<F>>,
}

impl<F> Default for OutcomeTable<F> {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }
}

impl<F: Face> OutcomeTable<F> {
    pub const INDEX_NAME: &'static str = "Roll Number";
    pub const COLUMNS_NAME: &'static str = "Die Number";

    /// Assembles a table from per-die columns of equal length.
    pub(crate) fn from_columns(columns: Vec<Vec<F>>) -> Self {
        let num_rolls = columns.first().map_or(0, Vec::len);
        let mut rows: Vec<OutcomeRow<F>> = (0..num_rolls)
            .map(|i| OutcomeRow {
                roll: RollNumber(i as u32 + 1),
                faces: Vec::with_capacity(columns.len()),
            })
            .collect();
        for column in &columns {
            for (row, face) in rows.iter_mut().zip(column) {
                row.faces.push(face.clone());
            }
        }
        Self {
            columns: (1..=columns.len() as u32).map(DieNumber).collect(),
            rows,
        }
    }

    /// Keeps the rows matching `predicate`, preserving their roll numbers.
    pub fn filter_rows(&self, mut predicate: impl FnMut(&[F]) -> bool) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| predicate(row.faces.as_slice()))
                .cloned()
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn num_rolls(&self) -> usize {
        self.rows.len()
    }

    pub fn num_dice(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.num_rolls(), self.num_dice())
    }

    pub fn columns(&self) -> &[DieNumber] {
        &self.columns
    }

    pub fn rows(&self) -> &[OutcomeRow<F>] {
        &self.rows
    }

    pub fn roll_numbers(&self) -> impl Iterator<Item = RollNumber> + '_ {
        self.rows.iter().map(|row| row.roll)
    }

    pub fn row(&self, roll: RollNumber) -> Option<&[F]> {
        self.rows
            .iter()
            .find(|row| row.roll == roll)
            .map(|row| row.faces.as_slice())
    }

    pub fn column(&self, die: DieNumber) -> Option<Vec<&F>> {
        let position = self.columns.iter().position(|&d| d == die)?;
        Some(self.rows.iter().map(|row| &row.faces[position]).collect())
    }

    pub fn get(&self, roll: RollNumber, die: DieNumber) -> Option<&F> {
        let position = self.columns.iter().position(|&d| d == die)?;
        self.row(roll).map(|faces| &faces[position])
    }

    /// Long format: one row per `(roll, die)` pair, rolls outermost.
    pub fn to_narrow(&self) -> NarrowTable<F> {
        let rows = self
            .rows
            .iter()
            .flat_map(|row| {
                self.columns
                    .iter()
                    .zip(&row.faces)
                    .map(move |(&die, face)| NarrowRow {
                        roll: row.roll,
                        die,
                        face: face.clone(),
                    })
            })
            .collect();
        NarrowTable { rows }
    }

    pub fn pretty_print(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result {
        let header: Vec<String> = std::iter::once(Self::INDEX_NAME.to_string())
            .chain(self.columns.iter().map(|die| format!("Die {die}")))
            .collect();
        let rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                std::iter::once(row.roll.to_string())
                    .chain(row.faces.iter().map(ToString::to_string))
                    .collect()
            })
            .collect();
        write_grid(f, &header, &rows)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrowRow<F> {
    pub roll: RollNumber,
    pub die: DieNumber,
    pub face: F,
}

/// Narrow outcome table indexed by `(roll, die)` with a single face column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrowTable<F> {
    rows: Vec<NarrowRow<F>>,
}

impl<F: Face> NarrowTable<F> {
    pub const COLUMN_NAME: &'static str = "Face Rolled";

    pub fn rows(&self) -> &[NarrowRow<F>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// `(rows, columns)`; there is always exactly one value column.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), 1)
    }

    pub fn get(&self, roll: RollNumber, die: DieNumber) -> Option<&F> {
        self.rows
            .iter()
            .find(|row| row.roll == roll && row.die == die)
            .map(|row| &row.face)
    }

    pub fn pretty_print(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result {
        let header = vec![
            OutcomeTable::<F>::INDEX_NAME.to_string(),
            OutcomeTable::<F>::COLUMNS_NAME.to_string(),
            Self::COLUMN_NAME.to_string(),
        ];
        let rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| vec![row.roll.to_string(), row.die.to_string(), row.face.to_string()])
            .collect();
        write_grid(f, &header, &rows)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultForm {
    #[default]
    Wide,
    Narrow,
}

impl FromStr for ResultForm {
    type Err = MonteCarloError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "wide" => Ok(ResultForm::Wide),
            "narrow" => Ok(ResultForm::Narrow),
            other => Err(MonteCarloError::InvalidForm {
                form: other.to_string(),
            }),
        }
    }
}

/// Read-only view of a session's outcomes in the requested form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResultView<'a, F> {
    Wide(&'a OutcomeTable<F>),
    Narrow(NarrowTable<F>),
}

impl<F: Face> ResultView<'_, F> {
    pub fn shape(&self) -> (usize, usize) {
        match self {
            ResultView::Wide(table) => table.shape(),
            ResultView::Narrow(table) => table.shape(),
        }
    }

    pub fn pretty_print(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result {
        match self {
            ResultView::Wide(table) => table.pretty_print(f),
            ResultView::Narrow(table) => table.pretty_print(f),
        }
    }
}

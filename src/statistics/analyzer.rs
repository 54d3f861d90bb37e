use crate::{
    rules::face::Face,
    simulation::{session::RollSession, table::OutcomeTable},
    statistics::{
        pmf,
        tables::{FaceCountTable, FrequencyTable, Grouping},
    },
};

/// Descriptive statistics over a session's most recent outcome table.
///
/// Nothing is computed up front. Each method recomputes from the session's
/// current table and caches its result for the matching accessor.
#[derive(Debug, Clone)]
pub struct OutcomeAnalyzer<'s, 'a, F: Face> {
    session: &'s RollSession<'a, F>,
    jackpot_count: usize,
    jackpot_table: OutcomeTable<F>,
    combo_table: FrequencyTable<F>,
    face_count_table: FaceCountTable<F>,
}

impl<'s, 'a, F: Face> OutcomeAnalyzer<'s, 'a, F> {
    pub fn new(session: &'s RollSession<'a, F>) -> Self {
        Self {
            session,
            jackpot_count: 0,
            jackpot_table: OutcomeTable::default(),
            combo_table: FrequencyTable::default(),
            face_count_table: FaceCountTable::default(),
        }
    }

    pub fn session(&self) -> &'s RollSession<'a, F> {
        self.session
    }

    /// Name of the face type shared by the session's dice.
    pub fn face_type(&self) -> &'static str {
        std::any::type_name::<F>()
    }

    /// Counts rolls where every die shows the same face.
    pub fn jackpot(&mut self) -> usize {
        self.jackpot_table = self
            .session
            .result()
            .filter_rows(|faces| faces.windows(2).all(|pair| pair[0] == pair[1]));
        self.jackpot_count = self.jackpot_table.num_rolls();
        log::debug!(
            "{} jackpots in {} rolls",
            self.jackpot_count,
            self.session.result().num_rolls()
        );
        self.jackpot_count
    }

    /// Frequency of each combination of faces, or of each permutation when
    /// `use_permutation` is set.
    pub fn combo(&mut self, use_permutation: bool) -> &FrequencyTable<F> {
        let grouping = if use_permutation {
            Grouping::Permutation
        } else {
            Grouping::Combination
        };
        self.combo_table = FrequencyTable::from_outcomes(self.session.result(), grouping);
        log::debug!(
            "{} distinct {:?} keys",
            self.combo_table.len(),
            grouping
        );
        &self.combo_table
    }

    pub fn face_counts(&mut self) -> &FaceCountTable<F> {
        self.face_count_table = FaceCountTable::from_outcomes(self.session.result());
        &self.face_count_table
    }

    pub fn jackpot_count(&self) -> usize {
        self.jackpot_count
    }

    /// Jackpot rows from the last [`OutcomeAnalyzer::jackpot`] call.
    pub fn jackpot_table(&self) -> &OutcomeTable<F> {
        &self.jackpot_table
    }

    pub fn combo_table(&self) -> &FrequencyTable<F> {
        &self.combo_table
    }

    pub fn face_count_table(&self) -> &FaceCountTable<F> {
        &self.face_count_table
    }

    /// Observed share of jackpot rolls as of the last `jackpot` call.
    pub fn jackpot_rate(&self) -> f64 {
        let rolls = self.session.result().num_rolls();
        if rolls > 0 {
            self.jackpot_count as f64 / rolls as f64
        } else {
            0.0
        }
    }

    /// Jackpot probability implied by the dice's current weights.
    pub fn expected_jackpot_probability(&self) -> f64 {
        pmf::jackpot_probability(self.session.dice())
    }
}

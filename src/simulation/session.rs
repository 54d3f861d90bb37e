use crate::{
    error::{MonteCarloError, Result},
    rules::{die::WeightedDie, face::Face},
    simulation::table::{OutcomeTable, ResultForm, ResultView},
    statistics::roller::Roller,
};

/// A game: a fixed list of borrowed dice rolled together.
///
/// The dice stay owned by the caller. Each call to [`RollSession::play`]
/// replaces the stored outcome table.
#[derive(Debug, Clone)]
pub struct RollSession<'a, F: Face> {
    dice: Vec<&'a WeightedDie<F>>,
    result: OutcomeTable<F>,
}

impl<'a, F: Face> RollSession<'a, F> {
    pub fn new(dice: impl IntoIterator<Item = &'a WeightedDie<F>>) -> Result<Self> {
        let dice: Vec<_> = dice.into_iter().collect();
        if dice.is_empty() {
            return Err(MonteCarloError::NoDice);
        }
        Ok(Self {
            dice,
            result: OutcomeTable::default(),
        })
    }

    pub fn dice(&self) -> &[&'a WeightedDie<F>] {
        &self.dice
    }

    pub fn num_dice(&self) -> usize {
        self.dice.len()
    }

    /// Rolls every die `rolls` times and stores the outcomes, roll x die.
    ///
    /// The previous table is only replaced once every die has rolled.
    pub fn play(&mut self, rolls: usize, roller: &mut Roller) -> Result<()> {
        if rolls == 0 {
            return Err(MonteCarloError::ZeroRolls);
        }
        let columns = self
            .dice
            .iter()
            .map(|die| die.roll(rolls, roller))
            .collect::<Result<Vec<_>>>()?;
        self.result = OutcomeTable::from_columns(columns);
        log::debug!(
            "played {} rolls of {} dice",
            self.result.num_rolls(),
            self.result.num_dice()
        );
        Ok(())
    }

    pub fn has_played(&self) -> bool {
        !self.result.is_empty()
    }

    /// The wide outcome table of the most recent play; empty before the first.
    pub fn result(&self) -> &OutcomeTable<F> {
        &self.result
    }

    pub fn view(&self, form: ResultForm) -> ResultView<'_, F> {
        match form {
            ResultForm::Wide => ResultView::Wide(&self.result),
            ResultForm::Narrow => ResultView::Narrow(self.result.to_narrow()),
        }
    }

    /// Like [`RollSession::view`], with the form given as `"wide"` or `"narrow"`.
    pub fn show_result(&self, form: &str) -> Result<ResultView<'_, F>> {
        Ok(self.view(form.parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::table::{DieNumber, RollNumber};

    fn three_dice() -> Vec<WeightedDie<i64>> {
        (0..3).map(|_| WeightedDie::new([1, 2, 3]).unwrap()).collect()
    }

    #[test]
    fn test_new_requires_dice() {
        let none: Vec<WeightedDie<i64>> = vec![];
        assert_eq!(
            RollSession::new(&none).unwrap_err(),
            MonteCarloError::NoDice
        );
    }

    #[test]
    fn test_result_empty_before_play() {
        let dice = three_dice();
        let session = RollSession::new(&dice).unwrap();
        assert!(!session.has_played());
        assert_eq!(session.result().shape(), (0, 0));
    }

    #[test]
    fn test_play_shape_and_faces() {
        let dice = three_dice();
        let mut session = RollSession::new(&dice).unwrap();
        let mut rng = Roller::test_rng();
        session.play(100, &mut rng).unwrap();

        let wide = session.show_result("wide").unwrap();
        assert_eq!(wide.shape(), (100, 3));
        for row in session.result().rows() {
            for (die, face) in dice.iter().zip(&row.faces) {
                assert!(die.contains(face));
            }
        }
    }

    #[test]
    fn test_play_replaces_previous_result() {
        let dice = three_dice();
        let mut session = RollSession::new(&dice).unwrap();
        let mut rng = Roller::test_rng();
        session.play(100, &mut rng).unwrap();
        session.play(7, &mut rng).unwrap();
        assert_eq!(session.result().shape(), (7, 3));
        let rolls: Vec<u32> = session.result().roll_numbers().map(u32::from).collect();
        assert_eq!(rolls, (1..=7).collect::<Vec<_>>());
    }

    #[test]
    fn test_play_rejects_zero_rolls() {
        let dice = three_dice();
        let mut session = RollSession::new(&dice).unwrap();
        let mut rng = Roller::test_rng();
        session.play(5, &mut rng).unwrap();
        assert_eq!(
            session.play(0, &mut rng).unwrap_err(),
            MonteCarloError::ZeroRolls
        );
        assert_eq!(session.result().num_rolls(), 5);
    }

    #[test]
    fn test_failed_play_keeps_previous_result() {
        let mut dead = WeightedDie::new([1, 2]).unwrap();
        dead.change_weight(&1, 0).unwrap();
        dead.change_weight(&2, 0).unwrap();
        let live = WeightedDie::new([1, 2]).unwrap();
        let mut rng = Roller::test_rng();

        let mut session = RollSession::new([&live]).unwrap();
        session.play(3, &mut rng).unwrap();
        let before = session.result().clone();

        let mut session = RollSession {
            dice: vec![&live, &dead],
            result: before.clone(),
        };
        assert!(session.play(3, &mut rng).is_err());
        assert_eq!(session.result(), &before);
    }

    #[test]
    fn test_show_result_narrow() {
        let dice = three_dice();
        let mut session = RollSession::new(&dice).unwrap();
        let mut rng = Roller::test_rng();
        session.play(100, &mut rng).unwrap();

        let narrow = session.show_result("narrow").unwrap();
        assert_eq!(narrow.shape(), (300, 1));
        let ResultView::Narrow(narrow) = narrow else {
            panic!("expected narrow view");
        };
        assert_eq!(
            narrow.get(RollNumber(4), DieNumber(2)),
            session.result().get(RollNumber(4), DieNumber(2))
        );
    }

    #[test]
    fn test_show_result_wrong_form() {
        let dice = three_dice();
        let mut session = RollSession::new(&dice).unwrap();
        let mut rng = Roller::test_rng();
        session.play(100, &mut rng).unwrap();
        let err = session.show_result("foo").unwrap_err();
        assert!(matches!(err, MonteCarloError::InvalidForm { .. }));
        assert_eq!(session.result().num_rolls(), 100);
    }

    #[test]
    fn test_dice_may_differ() {
        let coin = WeightedDie::new(["H".to_string(), "T".to_string()]).unwrap();
        let mut letters = WeightedDie::new(["A", "B", "H"].map(String::from)).unwrap();
        letters.change_weight(&"H".to_string(), 3.0).unwrap();
        let mut session = RollSession::new([&coin, &letters]).unwrap();
        let mut rng = Roller::test_rng();
        session.play(20, &mut rng).unwrap();
        assert_eq!(session.num_dice(), 2);
        for row in session.result().rows() {
            assert!(coin.contains(&row.faces[0]));
            assert!(letters.contains(&row.faces[1]));
        }
    }
}

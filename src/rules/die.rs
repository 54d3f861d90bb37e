use rand::distr::weighted::WeightedIndex;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::{
    error::{MonteCarloError, Result},
    rules::face::{Face, Weight},
    statistics::roller::Roller,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceWeight<F> {
    pub face: F,
    pub weight: Weight,
}

/// A die with distinct faces, each carrying a relative weight.
///
/// The face set is fixed at construction. Only the weights change afterwards.
#[derive(Debug, Clone)]
pub struct WeightedDie<F: Face> {
    faces_and_weights: Vec<FaceWeight<F>>,
    index: FxHashMap<F, usize>,
}

impl<F: Face> WeightedDie<F> {
    /// Builds a die with every weight set to 1.0.
    pub fn new(faces: impl IntoIterator<Item = F>) -> Result<Self> {
        let mut faces_and_weights = Vec::new();
        let mut index = FxHashMap::default();
        for face in faces {
            if index.contains_key(&face) {
                return Err(MonteCarloError::DuplicateFace {
                    face: face.to_string(),
                });
            }
            index.insert(face.clone(), faces_and_weights.len());
            faces_and_weights.push(FaceWeight {
                face,
                weight: Weight::ONE,
            });
        }
        if faces_and_weights.is_empty() {
            return Err(MonteCarloError::NoFaces);
        }
        Ok(Self {
            faces_and_weights,
            index,
        })
    }

    /// Replaces the weight of a single face. On error nothing changes.
    pub fn change_weight<W>(&mut self, face: &F, new_weight: W) -> Result<()>
    where
        W: TryInto<Weight, Error = MonteCarloError>,
    {
        let new_weight = new_weight.try_into()?;
        let Some(&position) = self.index.get(face) else {
            return Err(MonteCarloError::UnknownFace {
                face: face.to_string(),
            });
        };
        if new_weight.value() == 0.0 {
            log::warn!("face {face} can no longer be rolled: weight set to 0");
        }
        self.faces_and_weights[position].weight = new_weight;
        Ok(())
    }

    fn distribution(&self) -> Result<WeightedIndex<f64>> {
        WeightedIndex::new(self.faces_and_weights.iter().map(|fw| fw.weight.value())).map_err(
            |e| MonteCarloError::UnsampleableWeights {
                reason: e.to_string(),
            },
        )
    }

    /// Draws `count` faces independently, with replacement.
    pub fn roll(&self, count: usize, roller: &mut Roller) -> Result<Vec<F>> {
        let distr = self.distribution()?;
        let rolls = (0..count)
            .map(|_| self.faces_and_weights[roller.pick(&distr)].face.clone())
            .collect();
        Ok(rolls)
    }

    pub fn roll_once(&self, roller: &mut Roller) -> Result<F> {
        let distr = self.distribution()?;
        Ok(self.faces_and_weights[roller.pick(&distr)].face.clone())
    }

    pub fn faces_and_weights(&self) -> &[FaceWeight<F>] {
        &self.faces_and_weights
    }

    pub fn faces(&self) -> impl Iterator<Item = &F> {
        self.faces_and_weights.iter().map(|fw| &fw.face)
    }

    pub fn contains(&self, face: &F) -> bool {
        self.index.contains_key(face)
    }

    pub fn weight(&self, face: &F) -> Option<Weight> {
        self.index
            .get(face)
            .map(|&position| self.faces_and_weights[position].weight)
    }

    pub fn total_weight(&self) -> f64 {
        self.faces_and_weights
            .iter()
            .map(|fw| fw.weight.value())
            .sum()
    }

    /// Probability of rolling `face`, or 0.0 if the die cannot roll it.
    pub fn probability(&self, face: &F) -> f64 {
        let total = self.total_weight();
        match self.weight(face) {
            Some(weight) if total > 0.0 => weight.value() / total,
            _ => 0.0,
        }
    }

    pub fn probabilities(&self) -> Vec<(F, f64)> {
        self.faces()
            .map(|face| (face.clone(), self.probability(face)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.faces_and_weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces_and_weights.is_empty()
    }

    pub fn pretty_print(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result {
        write!(f, "Die [")?;
        for (i, fw) in self.faces_and_weights.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", fw.face, fw.weight)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use statrs::assert_almost_eq;

    use super::*;

    fn d6() -> WeightedDie<i64> {
        WeightedDie::new(1..=6).unwrap()
    }

    #[test]
    fn test_new_defaults_weights_to_one() {
        let die = d6();
        assert_eq!(die.len(), 6);
        let faces: Vec<i64> = die.faces().copied().collect();
        assert_eq!(faces, vec![1, 2, 3, 4, 5, 6]);
        assert!(die.faces_and_weights().iter().all(|fw| fw.weight == Weight::ONE));
    }

    #[test]
    fn test_new_rejects_duplicates_and_empty() {
        assert_eq!(
            WeightedDie::new([1, 2, 2]).unwrap_err(),
            MonteCarloError::DuplicateFace {
                face: "2".to_string()
            }
        );
        assert_eq!(
            WeightedDie::<i64>::new([]).unwrap_err(),
            MonteCarloError::NoFaces
        );
    }

    #[test]
    fn test_change_weight() {
        let mut die = d6();
        die.change_weight(&3, 4.0).unwrap();
        assert_eq!(die.weight(&3).map(Weight::value), Some(4.0));
        for face in [1, 2, 4, 5, 6] {
            assert_eq!(die.weight(&face), Some(Weight::ONE));
        }

        die.change_weight(&5, "2.5").unwrap();
        assert_eq!(die.weight(&5).map(Weight::value), Some(2.5));

        let face: i64 = 2;
        die.change_weight(&face, face).unwrap();
        assert_eq!(die.weight(&2).map(Weight::value), Some(2.0));
    }

    #[test]
    fn test_change_weight_unknown_face_leaves_die_untouched() {
        let mut die = d6();
        die.change_weight(&1, 3.0).unwrap();
        let before = die.faces_and_weights().to_vec();

        let err = die.change_weight(&7, 4.0).unwrap_err();
        assert!(matches!(err, MonteCarloError::UnknownFace { .. }));
        assert!(err.is_invalid_argument());
        assert_eq!(die.faces_and_weights(), before.as_slice());
    }

    #[test]
    fn test_change_weight_not_a_float() {
        let mut die = d6();
        let before = die.faces_and_weights().to_vec();
        assert!(matches!(
            die.change_weight(&1, "Hi"),
            Err(MonteCarloError::InvalidWeight { .. })
        ));
        assert!(die.change_weight(&1, -2.0).is_err());
        assert_eq!(die.faces_and_weights(), before.as_slice());
    }

    #[test]
    fn test_roll_counts_and_faces() {
        let die = d6();
        let mut rng = Roller::test_rng();
        assert_eq!(die.roll(1, &mut rng).unwrap().len(), 1);
        let rolls = die.roll(500, &mut rng).unwrap();
        assert_eq!(rolls.len(), 500);
        assert!(rolls.iter().all(|face| die.contains(face)));
        assert!(die.roll(0, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn test_roll_uniform_converges() {
        let die = d6();
        let mut rng = Roller::test_rng();
        let n = 60_000;
        let rolls = die.roll(n, &mut rng).unwrap();
        for face in 1..=6 {
            let freq = rolls.iter().filter(|&&r| r == face).count() as f64 / n as f64;
            assert_almost_eq!(freq, 1.0 / 6.0, 0.02);
        }
    }

    #[test]
    fn test_roll_respects_weights() {
        let mut die = WeightedDie::new(["H".to_string(), "T".to_string()]).unwrap();
        die.change_weight(&"T".to_string(), 0).unwrap();
        let mut rng = Roller::test_rng();
        let rolls = die.roll(200, &mut rng).unwrap();
        assert!(rolls.iter().all(|face| face == "H"));

        die.change_weight(&"H".to_string(), 0).unwrap();
        assert!(matches!(
            die.roll(1, &mut rng),
            Err(MonteCarloError::UnsampleableWeights { .. })
        ));
    }

    #[test]
    fn test_probabilities() {
        let mut die = d6();
        die.change_weight(&6, 5.0).unwrap();
        assert_almost_eq!(die.total_weight(), 10.0, 1e-12);
        assert_almost_eq!(die.probability(&6), 0.5, 1e-12);
        assert_almost_eq!(die.probability(&1), 0.1, 1e-12);
        assert_eq!(die.probability(&9), 0.0);
        let total: f64 = die.probabilities().iter().map(|(_, p)| p).sum();
        assert_almost_eq!(total, 1.0, 1e-12);
    }

    #[test]
    fn test_pretty_print() {
        let mut die = WeightedDie::new([1, 2]).unwrap();
        die.change_weight(&2, 0.5).unwrap();
        let mut buf = String::new();
        die.pretty_print(&mut buf).unwrap();
        assert_eq!(buf, "Die [1=1, 2=0.5]");
    }
}

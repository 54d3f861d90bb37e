use crate::rules::{die::WeightedDie, face::Face};

/// Probability that a single roll of `dice` lands every die on the same face.
///
/// Only faces of the first die can form a jackpot; a die lacking a face
/// contributes probability 0 for it.
pub fn jackpot_probability<F: Face>(dice: &[&WeightedDie<F>]) -> f64 {
    let Some((first, rest)) = dice.split_first() else {
        return 0.0;
    };
    first
        .faces()
        .map(|face| {
            rest.iter()
                .map(|die| die.probability(face))
                .product::<f64>()
                * first.probability(face)
        })
        .sum()
}

/// Probability of rolling exactly `faces`, die by die, in that order.
pub fn permutation_probability<F: Face>(dice: &[&WeightedDie<F>], faces: &[F]) -> f64 {
    if dice.len() != faces.len() {
        return 0.0;
    }
    dice.iter()
        .zip(faces)
        .map(|(die, face)| die.probability(face))
        .product()
}

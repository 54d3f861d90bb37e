use std::{fmt, hash::Hash};

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

use crate::error::{MonteCarloError, Result};

/// Anything that can sit on the face of a die.
pub trait Face: Clone + Eq + Ord + Hash + fmt::Debug + fmt::Display {}

impl<T> Face for T where T: Clone + Eq + Ord + Hash + fmt::Debug + fmt::Display {}

/// A face whose type is only known at runtime.
///
/// Integers order numerically and text lexicographically; every integer
/// sorts before every piece of text.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Serialize, Deserialize,
)]
#[serde(untagged)]
pub enum FaceValue {
    Int(i64),
    Text(String),
}

impl FaceValue {
    pub fn is_int(&self) -> bool {
        matches!(self, FaceValue::Int(_))
    }
}

impl From<&str> for FaceValue {
    fn from(value: &str) -> Self {
        FaceValue::Text(value.to_string())
    }
}

/// A validated sampling weight: finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Weight(f64);

impl Weight {
    pub const ONE: Weight = Weight(1.0);

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Weight {
    fn default() -> Self {
        Weight::ONE
    }
}

impl From<Weight> for f64 {
    fn from(weight: Weight) -> Self {
        weight.0
    }
}

impl TryFrom<f64> for Weight {
    type Error = MonteCarloError;

    fn try_from(value: f64) -> Result<Self> {
        if value.is_finite() && value >= 0.0 {
            Ok(Weight(value))
        } else {
            Err(MonteCarloError::InvalidWeight {
                value: value.to_string(),
            })
        }
    }
}

impl TryFrom<f32> for Weight {
    type Error = MonteCarloError;

    fn try_from(value: f32) -> Result<Self> {
        Weight::try_from(value as f64)
    }
}

impl TryFrom<i32> for Weight {
    type Error = MonteCarloError;

    fn try_from(value: i32) -> Result<Self> {
        Weight::try_from(value as f64)
    }
}

impl TryFrom<u32> for Weight {
    type Error = MonteCarloError;

    fn try_from(value: u32) -> Result<Self> {
        Weight::try_from(value as f64)
    }
}

impl TryFrom<i64> for Weight {
    type Error = MonteCarloError;

    fn try_from(value: i64) -> Result<Self> {
        Weight::try_from(value as f64)
    }
}

impl TryFrom<u64> for Weight {
    type Error = MonteCarloError;

    fn try_from(value: u64) -> Result<Self> {
        Weight::try_from(value as f64)
    }
}

impl TryFrom<&str> for Weight {
    type Error = MonteCarloError;

    fn try_from(value: &str) -> Result<Self> {
        let parsed = value
            .trim()
            .parse::<f64>()
            .map_err(|_| MonteCarloError::InvalidWeight {
                value: value.to_string(),
            })?;
        Weight::try_from(parsed)
    }
}

impl TryFrom<String> for Weight {
    type Error = MonteCarloError;

    fn try_from(value: String) -> Result<Self> {
        Weight::try_from(value.as_str())
    }
}

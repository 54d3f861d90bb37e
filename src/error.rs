use thiserror::Error;

/// Every failure in this crate is an invalid argument passed by the caller.
/// Nothing is retried, and a failed call never leaves partial state behind.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MonteCarloError {
    #[error("face {face} does not exist on this die")]
    UnknownFace { face: String },

    #[error("face {face} appears more than once")]
    DuplicateFace { face: String },

    #[error("a die needs at least one face")]
    NoFaces,

    #[error("weight must be convertible to a non-negative float, got {value:?}")]
    InvalidWeight { value: String },

    #[error("form must be \"wide\" or \"narrow\", got {form:?}")]
    InvalidForm { form: String },

    #[error("a game needs at least one die")]
    NoDice,

    #[error("number of rolls must be positive")]
    ZeroRolls,

    #[error("die weights cannot be sampled: {reason}")]
    UnsampleableWeights { reason: String },
}

impl MonteCarloError {
    pub fn is_invalid_argument(&self) -> bool {
        match self {
            MonteCarloError::UnknownFace { .. }
            | MonteCarloError::DuplicateFace { .. }
            | MonteCarloError::NoFaces
            | MonteCarloError::InvalidWeight { .. }
            | MonteCarloError::InvalidForm { .. }
            | MonteCarloError::NoDice
            | MonteCarloError::ZeroRolls
            | MonteCarloError::UnsampleableWeights { .. } => true,
        }
    }
}

pub type Result<T> = std::result::Result<T, MonteCarloError>;

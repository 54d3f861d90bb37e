pub mod die_parser;
pub mod error;
pub mod rules;
pub mod simulation;
pub mod statistics;
pub mod utils;

pub mod prelude {
    pub use crate::{
        die_parser::parse_die,
        error::{MonteCarloError, Result},
        rules::{
            die::{FaceWeight, WeightedDie},
            face::{Face, FaceValue, Weight},
        },
        simulation::{
            session::RollSession,
            table::{
                DieNumber, NarrowRow, NarrowTable, OutcomeRow, OutcomeTable, ResultForm,
                ResultView, RollNumber,
            },
        },
        statistics::{
            analyzer::OutcomeAnalyzer,
            pmf::{jackpot_probability, permutation_probability},
            roller::Roller,
            tables::{FaceCountRow, FaceCountTable, FrequencyEntry, FrequencyTable, Grouping},
        },
    };
}

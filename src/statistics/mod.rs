pub mod analyzer;
pub mod pmf;
pub mod roller;
pub mod tables;

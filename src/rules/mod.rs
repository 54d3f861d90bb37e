pub mod die;
pub mod face;

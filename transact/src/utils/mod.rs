//! Numeric helpers.
pub mod math;
pub mod units;

pub use math::{Math, Rounding};
pub use units::{from_wei, to_wei};

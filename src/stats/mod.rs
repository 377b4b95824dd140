//! Stats module - rate derivation and rankings

mod calculator;

pub use calculator::{Ranking, RateCalculator, RateError, RATE_SCALE};

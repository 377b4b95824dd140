//! Rate Calculator Module
//! Incidence-rate derivation and top/bottom state rankings.

use crate::data::{state_keys, JoinedView};
use polars::prelude::*;
use thiserror::Error;

/// Incidence rates are expressed per this many people.
pub const RATE_SCALE: f64 = 10_000.0;

#[derive(Error, Debug)]
pub enum RateError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Unknown crime category '{0}'")]
    UnknownCategory(String),
}

/// One row of a ranking table.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    pub state: String,
    pub value: f64,
}

/// Derives per-capita rates and ranks states by category value.
pub struct RateCalculator;

impl RateCalculator {
    /// Recompute every category column as `(count / population) * 10_000`.
    ///
    /// States with zero or null population get a null rate rather than an
    /// infinity; they render as "no data" and never enter rankings.
    pub fn incidence_rates(
        view: &JoinedView,
        categories: &[String],
        population_column: &str,
    ) -> Result<DataFrame, RateError> {
        let population = col(population_column).cast(DataType::Float64);
        let exprs: Vec<Expr> = categories
            .iter()
            .map(|category| {
                when(col(population_column).gt(lit(0)))
                    .then(col(category.as_str()).cast(DataType::Float64) / population.clone()
                        * lit(RATE_SCALE))
                    .otherwise(lit(NULL))
                    .alias(category.as_str())
            })
            .collect();

        let df = view.table.clone().lazy().with_columns(exprs).collect()?;
        Ok(df)
    }

    /// (state, value) pairs for one category in row order; null values are
    /// carried through as `None`.
    pub fn column_values(
        df: &DataFrame,
        category: &str,
    ) -> Result<Vec<(String, Option<f64>)>, RateError> {
        if df.column(category).is_err() {
            return Err(RateError::UnknownCategory(category.to_string()));
        }
        let states = state_keys(df)?;
        let values = df.column(category)?.cast(&DataType::Float64)?;
        let values = values.f64()?;

        Ok(states
            .into_iter()
            .enumerate()
            .map(|(i, state)| (state, values.get(i)))
            .collect())
    }

    /// The `n` highest-valued states, descending; ties keep row order.
    pub fn top_n(df: &DataFrame, category: &str, n: usize) -> Result<Vec<Ranking>, RateError> {
        let mut rankings = Self::non_null_rankings(df, category)?;
        rankings.sort_by(|a, b| {
            b.value
                .partial_cmp(&a.value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        rankings.truncate(n);
        Ok(rankings)
    }

    /// The `n` lowest-valued states, ascending; ties keep row order.
    pub fn bottom_n(df: &DataFrame, category: &str, n: usize) -> Result<Vec<Ranking>, RateError> {
        let mut rankings = Self::non_null_rankings(df, category)?;
        rankings.sort_by(|a, b| {
            a.value
                .partial_cmp(&b.value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        rankings.truncate(n);
        Ok(rankings)
    }

    fn non_null_rankings(df: &DataFrame, category: &str) -> Result<Vec<Ranking>, RateError> {
        Ok(Self::column_values(df, category)?
            .into_iter()
            .filter_map(|(state, value)| value.map(|value| Ranking { state, value }))
            .collect())
    }
}

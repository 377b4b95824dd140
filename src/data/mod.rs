//! Data module - loading, name reconciliation, and the state join.

mod join;
mod loader;
mod reconcile;

pub use join::{state_keys, JoinError, JoinedView};
pub use loader::{category_columns, load_boundaries, load_crime_table, LoaderError, StateGeometry};
pub use reconcile::{canonical_name, rename_state_column, STATE_KEY};

use crate::config::AppConfig;
use anyhow::{Context, Result};
use tracing::info;

/// Everything the GUI needs, built once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct DataContext {
    pub view: JoinedView,
    /// Crime categories in spreadsheet column order.
    pub categories: Vec<String>,
    pub population_column: String,
}

/// Run the full load-reconcile-join pipeline. Any failure is fatal.
pub fn load_context(config: &AppConfig) -> Result<DataContext> {
    let input = &config.input;

    let crime = load_crime_table(
        &input.crime_csv,
        &input.state_column_csv,
        &input.population_column,
    )
    .with_context(|| format!("loading crime table {:?}", input.crime_csv))?;
    let categories = category_columns(&crime, &input.state_column_csv, &input.population_column);
    info!(
        rows = crime.height(),
        categories = categories.len(),
        "crime table loaded"
    );

    let boundaries = load_boundaries(&input.shapefile, &input.name_field_shape)
        .with_context(|| format!("loading boundaries {:?}", input.shapefile))?;
    info!(count = boundaries.len(), "state boundaries loaded");

    let crime = rename_state_column(crime, &input.state_column_csv)
        .context("renaming crime state column")?;
    let view = join::join_tables(crime, boundaries).context("joining crime and boundary tables")?;
    info!(states = view.table.height(), "tables joined");

    Ok(DataContext {
        view,
        categories,
        population_column: input.population_column.clone(),
    })
}

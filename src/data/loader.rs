//! Input loading: crime spreadsheet via Polars, state boundaries via shapefile.
//!
//! Both files are read once at startup. Any failure here is fatal and
//! propagates to the caller; there is no retry.

use geo::MultiPolygon;
use polars::prelude::*;
use shapefile::dbase::FieldValue;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Shapefile attribute holding the (discarded) state classification.
pub const TYPE_FIELD: &str = "Type";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load crime spreadsheet: {0}")]
    Csv(#[from] PolarsError),
    #[error("Failed to read shapefile: {0}")]
    Shapefile(#[from] shapefile::Error),
    #[error("Column '{column}' not found in {path:?}")]
    MissingColumn { column: String, path: PathBuf },
    #[error("Name field '{0}' missing or not a string in shapefile record")]
    MissingNameField(String),
    #[error("Geometry conversion failed for '{name}': {detail}")]
    Geometry { name: String, detail: String },
    #[error("No rows loaded from {0:?}")]
    EmptyTable(PathBuf),
}

/// One state boundary as read from the shapefile, before reconciliation.
#[derive(Debug, Clone)]
pub struct StateGeometry {
    pub name: String,
    pub geometry: MultiPolygon<f64>,
    /// Classification attribute ("State"/"Union Territory"); dropped at join.
    pub classification: Option<String>,
}

/// Load the per-state crime table. The frame must contain the state-name
/// column and the population column; everything else is a crime category.
pub fn load_crime_table(
    path: &Path,
    state_column: &str,
    population_column: &str,
) -> Result<DataFrame, LoaderError> {
    let path_str = path.to_string_lossy().to_string();
    let df = LazyCsvReader::new(&path_str)
        .with_infer_schema_length(Some(10000))
        .finish()?
        .collect()?;

    for required in [state_column, population_column] {
        if df.column(required).is_err() {
            return Err(LoaderError::MissingColumn {
                column: required.to_string(),
                path: path.to_path_buf(),
            });
        }
    }
    if df.height() == 0 {
        return Err(LoaderError::EmptyTable(path.to_path_buf()));
    }

    Ok(df)
}

/// Category columns of a crime table: every column that is neither the state
/// key nor the population column, in file order.
pub fn category_columns(df: &DataFrame, state_column: &str, population_column: &str) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .filter(|name| name != state_column && name != population_column)
        .collect()
}

/// Load state boundaries from a shapefile. Non-polygon shapes and records
/// with a null name are skipped; a record without the name field is an error.
pub fn load_boundaries(path: &Path, name_field: &str) -> Result<Vec<StateGeometry>, LoaderError> {
    let mut reader = shapefile::Reader::from_path(path)?;

    let mut boundaries = Vec::new();
    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result?;

        let name = match record.get(name_field) {
            Some(FieldValue::Character(Some(s))) => s.clone(),
            Some(FieldValue::Character(None)) => continue,
            _ => return Err(LoaderError::MissingNameField(name_field.to_string())),
        };

        let classification = match record.get(TYPE_FIELD) {
            Some(FieldValue::Character(s)) => s.clone(),
            _ => None,
        };

        let geometry = match shape {
            shapefile::Shape::Polygon(p) => convert_polygon(p, &name)?,
            shapefile::Shape::PolygonM(p) => convert_polygon(p, &name)?,
            shapefile::Shape::PolygonZ(p) => convert_polygon(p, &name)?,
            _ => continue,
        };

        boundaries.push(StateGeometry {
            name,
            geometry,
            classification,
        });
    }

    if boundaries.is_empty() {
        return Err(LoaderError::EmptyTable(path.to_path_buf()));
    }
    Ok(boundaries)
}

fn convert_polygon<P>(polygon: P, name: &str) -> Result<MultiPolygon<f64>, LoaderError>
where
    P: TryInto<MultiPolygon<f64>>,
    P::Error: std::fmt::Debug,
{
    polygon.try_into().map_err(|e| LoaderError::Geometry {
        name: name.to_string(),
        detail: format!("{:?}", e),
    })
}

//! Inner join of the crime table with the reconciled state boundaries.

use crate::data::loader::StateGeometry;
use crate::data::reconcile::{canonical_name, STATE_KEY};
use geo::MultiPolygon;
use polars::prelude::*;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum JoinError {
    #[error("Join failed: {0}")]
    Polars(#[from] PolarsError),
    #[error("Duplicate state key after join: '{0}'")]
    DuplicateState(String),
    #[error("No states matched between crime table and boundaries")]
    NoOverlap,
}

/// Crime table joined with geometry, keyed by the shared state name.
///
/// Invariant: `table` holds exactly one row per state, and `geometries`
/// contains a boundary for every key in `table`. The shapefile's
/// classification attribute does not survive the join.
#[derive(Debug, Clone)]
pub struct JoinedView {
    pub table: DataFrame,
    pub geometries: HashMap<String, MultiPolygon<f64>>,
}

/// Inner-join crime records (already keyed on [`STATE_KEY`]) with boundary
/// records. Boundary names are canonicalized here; states present in only
/// one source are logged and excluded.
pub fn join_tables(
    crime: DataFrame,
    boundaries: Vec<StateGeometry>,
) -> Result<JoinedView, JoinError> {
    let mut geometries: HashMap<String, MultiPolygon<f64>> = HashMap::new();
    let mut boundary_names: Vec<String> = Vec::with_capacity(boundaries.len());
    for boundary in boundaries {
        let name = canonical_name(&boundary.name).to_string();
        if geometries.insert(name.clone(), boundary.geometry).is_some() {
            return Err(JoinError::DuplicateState(name));
        }
        boundary_names.push(name);
    }

    let crime_keys: HashSet<String> = state_keys(&crime)?.into_iter().collect();
    let boundary_keys: HashSet<String> = boundary_names.iter().cloned().collect();

    for name in boundary_keys.difference(&crime_keys) {
        warn!(state = %name, "boundary has no crime record; excluded from output");
    }
    for name in crime_keys.difference(&boundary_keys) {
        warn!(state = %name, "crime record has no boundary; excluded from output");
    }

    let key_frame = DataFrame::new(vec![Column::new(STATE_KEY.into(), boundary_names)])?;
    let joined = key_frame
        .lazy()
        .join(
            crime.lazy(),
            [col(STATE_KEY)],
            [col(STATE_KEY)],
            JoinArgs::new(JoinType::Inner),
        )
        .collect()?;

    if joined.height() == 0 {
        return Err(JoinError::NoOverlap);
    }
    let distinct = joined.column(STATE_KEY)?.unique()?.len();
    if distinct != joined.height() {
        let keys = state_keys(&joined)?;
        let mut seen = HashSet::new();
        let dup = keys
            .into_iter()
            .find(|k| !seen.insert(k.clone()))
            .unwrap_or_default();
        return Err(JoinError::DuplicateState(dup));
    }

    // Keep only geometry that made it through the join.
    let joined_keys: HashSet<String> = state_keys(&joined)?.into_iter().collect();
    geometries.retain(|name, _| joined_keys.contains(name));

    Ok(JoinedView {
        table: joined,
        geometries,
    })
}

/// State keys of a frame in row order.
pub fn state_keys(df: &DataFrame) -> PolarsResult<Vec<String>> {
    let column = df.column(STATE_KEY)?;
    let mut keys = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let value = column.get(i)?;
        if !value.is_null() {
            keys.push(value.to_string().trim_matches('"').to_string());
        }
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    fn unit_square() -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 1.0),
        ]])
    }

    fn boundary(name: &str) -> StateGeometry {
        StateGeometry {
            name: name.to_string(),
            geometry: unit_square(),
            classification: Some("State".to_string()),
        }
    }

    fn crime_frame(states: &[&str]) -> DataFrame {
        let counts: Vec<i64> = (0..states.len() as i64).map(|i| (i + 1) * 10).collect();
        let pops: Vec<i64> = vec![1_000_000; states.len()];
        DataFrame::new(vec![
            Column::new(STATE_KEY.into(), states),
            Column::new("Murder".into(), counts),
            Column::new("Population".into(), pops),
        ])
        .unwrap()
    }

    #[test]
    fn join_excludes_states_missing_from_either_side() {
        let crime = crime_frame(&["Delhi", "Goa", "Kerala"]);
        let boundaries = vec![boundary("Delhi"), boundary("Goa"), boundary("Sikkim")];
        let view = join_tables(crime, boundaries).unwrap();

        let keys: HashSet<String> = state_keys(&view.table).unwrap().into_iter().collect();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains("Delhi") && keys.contains("Goa"));
        assert!(!keys.contains("Kerala") && !keys.contains("Sikkim"));
        assert!(!view.geometries.contains_key("Sikkim"));
    }

    #[test]
    fn misspelled_boundary_joins_through_reconciliation() {
        let crime = crime_frame(&["Telangana"]);
        let boundaries = vec![boundary("Telengana")];
        let view = join_tables(crime, boundaries).unwrap();

        assert_eq!(view.table.height(), 1);
        assert_eq!(state_keys(&view.table).unwrap(), vec!["Telangana"]);
        assert!(view.geometries.contains_key("Telangana"));
    }

    #[test]
    fn each_joined_state_appears_exactly_once() {
        let crime = crime_frame(&["Delhi", "Goa"]);
        let boundaries = vec![boundary("Delhi"), boundary("Goa")];
        let view = join_tables(crime, boundaries).unwrap();

        let keys = state_keys(&view.table).unwrap();
        let distinct: HashSet<&String> = keys.iter().collect();
        assert_eq!(distinct.len(), keys.len());
    }

    #[test]
    fn duplicate_boundary_is_rejected() {
        let crime = crime_frame(&["Delhi"]);
        let boundaries = vec![boundary("Delhi"), boundary("Delhi")];
        let err = join_tables(crime, boundaries).unwrap_err();
        assert!(matches!(err, JoinError::DuplicateState(s) if s == "Delhi"));
    }

    #[test]
    fn disjoint_inputs_are_an_error() {
        let crime = crime_frame(&["Delhi"]);
        let boundaries = vec![boundary("Goa")];
        assert!(matches!(
            join_tables(crime, boundaries),
            Err(JoinError::NoOverlap)
        ));
    }

    #[test]
    fn classification_never_reaches_the_joined_frame() {
        let crime = crime_frame(&["Delhi"]);
        let boundaries = vec![boundary("Delhi")];
        let view = join_tables(crime, boundaries).unwrap();
        assert!(view.table.column(crate::data::loader::TYPE_FIELD).is_err());
    }
}

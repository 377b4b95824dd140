//! State-name reconciliation between the boundary file and the crime table.
//!
//! The shapefile spells a handful of states differently from the crime
//! records. A fixed correction table maps those to the crime table's
//! spelling; both sources are then keyed on the shared `"state"` column.

use polars::prelude::*;

/// Shared join-key column name used by both tables after reconciliation.
pub const STATE_KEY: &str = "state";

/// Known spelling corrections, shapefile name -> crime-table name.
/// Exhaustive only for the known dataset; anything unmapped passes through
/// unchanged and is reported at join time if it fails to match.
const NAME_FIXES: [(&str, &str); 5] = [
    ("Andaman & Nicobar", "A&N Islands"),
    ("Jammu and Kashmir", "Jammu & Kashmir"),
    ("Telengana", "Telangana"),
    ("Tamilnadu", "Tamil Nadu"),
    ("Chhattishgarh", "Chhattisgarh"),
];

/// Map a geographic state name to its canonical (crime-table) spelling.
/// Already-canonical names pass through unchanged, so the mapping is
/// idempotent.
pub fn canonical_name(name: &str) -> &str {
    NAME_FIXES
        .iter()
        .find(|(from, _)| *from == name)
        .map(|(_, to)| *to)
        .unwrap_or(name)
}

/// Rename a table's state-name column to the shared join key.
pub fn rename_state_column(mut df: DataFrame, from: &str) -> PolarsResult<DataFrame> {
    if from != STATE_KEY {
        df.rename(from, STATE_KEY.into())?;
    }
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_corrections_map_to_canonical() {
        assert_eq!(canonical_name("Andaman & Nicobar"), "A&N Islands");
        assert_eq!(canonical_name("Jammu and Kashmir"), "Jammu & Kashmir");
        assert_eq!(canonical_name("Telengana"), "Telangana");
        assert_eq!(canonical_name("Tamilnadu"), "Tamil Nadu");
        assert_eq!(canonical_name("Chhattishgarh"), "Chhattisgarh");
    }

    #[test]
    fn canonical_names_are_fixed_points() {
        for (_, canonical) in NAME_FIXES {
            assert_eq!(canonical_name(canonical), canonical);
        }
        assert_eq!(canonical_name("Delhi"), "Delhi");
    }

    #[test]
    fn rename_produces_shared_key() {
        let df = DataFrame::new(vec![Column::new(
            "State/UT".into(),
            ["Delhi", "Goa"].as_ref(),
        )])
        .unwrap();
        let renamed = rename_state_column(df, "State/UT").unwrap();
        assert!(renamed.column(STATE_KEY).is_ok());
        assert!(renamed.column("State/UT").is_err());
    }

    #[test]
    fn rename_is_a_noop_on_shared_key() {
        let df = DataFrame::new(vec![Column::new(STATE_KEY.into(), ["Delhi"].as_ref())]).unwrap();
        let renamed = rename_state_column(df, STATE_KEY).unwrap();
        assert!(renamed.column(STATE_KEY).is_ok());
    }
}

use std::collections::{BTreeMap, BTreeSet};

use super::model::{CellValue, Record, Table};

/// Placeholder reported for missing or blank cells.
pub const NOT_AVAILABLE: &str = "N/A";

/// Comparison form of a pathogen name: trimmed and lowercased.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Lookup key for an identifying cell. Missing cells have no key and can
/// never be matched.
pub fn lookup_key(value: &CellValue) -> Option<String> {
    value.render().map(|s| normalize_name(&s))
}

/// Precompute one lookup key per row for `column`.
pub fn build_keys(table: &Table, column: &str) -> Vec<Option<String>> {
    table
        .records()
        .iter()
        .map(|r| lookup_key(r.get(column)))
        .collect()
}

/// Sorted, deduplicated string forms of `column`, skipping missing and
/// empty values.
pub fn distinct_values(table: &Table, column: &str) -> Vec<String> {
    table
        .records()
        .iter()
        .filter_map(|r| r.get(column).render())
        .filter(|s| !s.is_empty())
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

/// Index of the first row whose key equals `key` exactly.
pub fn first_match(keys: &[Option<String>], key: &str) -> Option<usize> {
    keys.iter().position(|k| k.as_deref() == Some(key))
}

/// Flatten a row into column → display string, covering every column of
/// the table. Missing and blank cells become [`NOT_AVAILABLE`].
pub fn detail_view(table: &Table, record: &Record) -> BTreeMap<String, String> {
    table
        .columns()
        .iter()
        .map(|col| {
            let cell = record.get(col);
            let value = if cell.is_blank() {
                NOT_AVAILABLE.to_string()
            } else {
                cell.to_string().trim().to_string()
            };
            (col.clone(), value)
        })
        .collect()
}

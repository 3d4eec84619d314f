use serde_json::Value;

use crate::error::{Error, Result};
use crate::table::types::{Row, Table, PATH_SEPARATOR};

/// Flatten a sequence of JSON records into a table, one row per record.
///
/// Nested *object* fields are walked recursively and emitted under
/// path-joined column names (`team.venue.city` → `team_venue_city`). List
/// values are deliberately not expanded here — they are preserved verbatim
/// under their flattened key, so the caller decides whether and when to pay
/// the expansion cost via [`decompose`](super::decompose).
///
/// An empty input yields an empty table: "no data", not an error. A record
/// that is not a JSON object fails with a payload error.
pub fn flatten(records: &[Value]) -> Result<Table> {
    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        rows.push(flatten_record(record)?);
    }
    Ok(Table::from_rows(rows).normalize_columns())
}

/// Flatten one record into one row.
pub(crate) fn flatten_record(record: &Value) -> Result<Row> {
    let obj = record.as_object().ok_or_else(|| {
        Error::Payload(format!("expected a JSON object record, got {}", type_name(record)))
    })?;

    let mut row = Row::new();
    for (key, value) in obj {
        flatten_into(key, value, &mut row);
    }
    Ok(row)
}

fn flatten_into(path: &str, value: &Value, row: &mut Row) {
    match value {
        Value::Object(nested) => {
            for (key, child) in nested {
                let child_path = format!("{}{}{}", path, PATH_SEPARATOR, key);
                flatten_into(&child_path, child, row);
            }
        }
        // Lists stay raw; scalars land as-is
        _ => {
            row.insert(path.to_string(), value.clone());
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_object_becomes_one_row() {
        let records = vec![json!({
            "fixture": {"id": 100, "venue": {"name": "Anfield", "city": "Liverpool"}},
            "goals": {"home": 2, "away": 1}
        })];

        let table = flatten(&records).unwrap();

        assert_eq!(table.len(), 1);
        let row = &table.rows()[0];
        // One column per leaf scalar
        assert_eq!(row.len(), 5);
        assert_eq!(row.get("fixture_id").unwrap(), 100);
        assert_eq!(row.get("fixture_venue_city").unwrap(), "Liverpool");
        assert_eq!(row.get("goals_away").unwrap(), 1);
    }

    #[test]
    fn test_flatten_is_idempotent() {
        let records = vec![json!({"a": {"b": 1}, "c": 2})];
        let once = flatten(&records).unwrap();

        // Re-flattening the flat row (as a depth-1 record) is a no-op
        let again = flatten(&[Value::Object(once.rows()[0].clone())]).unwrap();
        assert_eq!(once, again);
    }

    #[test]
    fn test_list_values_preserved_raw() {
        let records = vec![json!({
            "fixture": {"id": 100},
            "lineups": [{"formation": "4-3-3"}, {"formation": "4-4-2"}]
        })];

        let table = flatten(&records).unwrap();
        let row = &table.rows()[0];

        assert!(row.get("lineups").unwrap().is_array());
        assert_eq!(row.get("lineups").unwrap().as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_empty_input_is_no_data() {
        let table = flatten(&[]).unwrap();
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
    }

    #[test]
    fn test_non_object_record_is_payload_error() {
        let err = flatten(&[json!([1, 2, 3])]).unwrap_err();
        assert!(matches!(err, Error::Payload(_)));
    }
}

use serde_json::Value;

use crate::error::{Error, Result};
use crate::table::flatten::flatten_record;
use crate::table::types::{Row, Table, COLUMN_SEPARATOR, PATH_SEPARATOR};

/// Synthetic column name for list elements that are scalars rather than
/// objects (e.g. a list of plain ids).
pub const SCALAR_ELEMENT_COLUMN: &str = "value";

/// Expand a list-valued column into one output row per list element.
///
/// For each input row, the element at position k becomes one output row:
/// the `carry_columns` of the parent row verbatim, followed by the flattened
/// columns of the element. This is the single reusable primitive behind
/// every "explode a nested structure" dataset (lineups → startXI and
/// substitutes, coach → career history, player → transfer history).
///
/// Rules:
/// - `carry_columns` must be a subset of the table's columns, else a schema
///   error.
/// - A row whose `list_column` is absent or null contributes zero output
///   rows. Data loss by design: a fixture with no lineups simply has no
///   lineup rows.
/// - A present, non-list value is a schema error — never coerced.
/// - Scalar elements are wrapped under [`SCALAR_ELEMENT_COLUMN`].
/// - An element column colliding with a carried column is prefixed with the
///   list column's name (a coach's career entry carrying `team_id` next to
///   the coach's own `team_id` becomes `career_team_id`).
pub fn decompose<S: AsRef<str>>(
    table: &Table,
    carry_columns: &[S],
    list_column: &str,
) -> Result<Table> {
    if !table.is_empty() {
        let columns = table.columns();
        for carry in carry_columns {
            let carry = carry.as_ref();
            if !columns.iter().any(|c| c == carry) {
                return Err(Error::Schema(format!(
                    "carry column '{}' is not a column of the table",
                    carry
                )));
            }
        }
    }

    let mut rows = Vec::new();
    for row in table.rows() {
        let items = match row.get(list_column) {
            None | Some(Value::Null) => continue,
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(Error::Schema(format!(
                    "column '{}' holds a {} where a list was expected",
                    list_column,
                    json_type(other)
                )));
            }
        };

        for item in items {
            let mut out = Row::new();
            for carry in carry_columns {
                let carry = carry.as_ref();
                if let Some(value) = row.get(carry) {
                    out.insert(carry.to_string(), value.clone());
                }
            }

            let element = match item {
                Value::Object(_) => flatten_record(item)?,
                scalar => {
                    let mut wrapped = Row::new();
                    wrapped.insert(SCALAR_ELEMENT_COLUMN.to_string(), scalar.clone());
                    wrapped
                }
            };

            for (key, value) in element {
                let key = key.replace(PATH_SEPARATOR, &COLUMN_SEPARATOR.to_string());
                if out.contains_key(&key) {
                    out.insert(format!("{}{}{}", list_column, COLUMN_SEPARATOR, key), value);
                } else {
                    out.insert(key, value);
                }
            }
            rows.push(out);
        }
    }

    Ok(Table::from_rows(rows).normalize_columns())
}

fn json_type(value: &Value) -> &'static str {
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
    use crate::table::flatten;
    use serde_json::json;

    #[test]
    fn test_row_count_is_sum_of_list_lengths() {
        let table = flatten(&[
            json!({"id": 1, "items": [{"x": 10}, {"x": 20}]}),
            json!({"id": 2, "items": []}),
            json!({"id": 3, "items": [{"x": 30}, {"x": 40}, {"x": 50}]}),
        ])
        .unwrap();

        let out = decompose(&table, &["id"], "items").unwrap();
        assert_eq!(out.len(), 5);
    }

    #[test]
    fn test_empty_list_row_is_dropped() {
        let table = flatten(&[
            json!({"id": 1, "items": [{"x": 10}, {"x": 20}]}),
            json!({"id": 2, "items": []}),
        ])
        .unwrap();

        let out = decompose(&table, &["id"], "items").unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(out.rows()[0].get("id").unwrap(), 1);
        assert_eq!(out.rows()[0].get("x").unwrap(), 10);
        assert_eq!(out.rows()[1].get("x").unwrap(), 20);
        // id=2 contributed no rows
        assert!(out.rows().iter().all(|r| r.get("id").unwrap() != 2));
    }

    #[test]
    fn test_null_or_absent_list_contributes_nothing() {
        let table = flatten(&[
            json!({"id": 1, "items": null}),
            json!({"id": 2}),
            json!({"id": 3, "items": [{"x": 1}]}),
        ])
        .unwrap();

        let out = decompose(&table, &["id"], "items").unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out.rows()[0].get("id").unwrap(), 3);
    }

    #[test]
    fn test_unknown_carry_column_is_schema_error() {
        let table = flatten(&[json!({"id": 1, "items": [{"x": 1}]})]).unwrap();
        let err = decompose(&table, &["missing"], "items").unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }

    #[test]
    fn test_non_list_target_is_schema_error() {
        let table = flatten(&[json!({"id": 1, "items": "oops"})]).unwrap();
        let err = decompose(&table, &["id"], "items").unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }

    #[test]
    fn test_scalar_elements_wrap_under_value() {
        let table = flatten(&[json!({"id": 1, "tags": ["home", "derby"]})]).unwrap();
        let out = decompose(&table, &["id"], "tags").unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(out.rows()[0].get(SCALAR_ELEMENT_COLUMN).unwrap(), "home");
    }

    #[test]
    fn test_element_columns_flatten_and_collisions_get_prefixed() {
        let table = flatten(&[json!({
            "name": "Arteta",
            "team": {"id": 42, "name": "Arsenal"},
            "career": [
                {"team": {"id": 42, "name": "Arsenal"}, "start": "2019-12-20"},
                {"team": {"id": 50, "name": "Manchester City"}, "start": "2016-07-03"}
            ]
        })])
        .unwrap();

        let carry: Vec<String> = table
            .columns()
            .into_iter()
            .filter(|c| c != "career")
            .collect();
        let out = decompose(&table, &carry, "career").unwrap();

        assert_eq!(out.len(), 2);
        let row = &out.rows()[1];
        // Coach's own team columns carried verbatim
        assert_eq!(row.get("team_id").unwrap(), 42);
        // Career entry's team columns prefixed to avoid the collision
        assert_eq!(row.get("career_team_id").unwrap(), 50);
        assert_eq!(row.get("career_team_name").unwrap(), "Manchester City");
        assert_eq!(row.get("start").unwrap(), "2016-07-03");
    }

    #[test]
    fn test_empty_table_decomposes_to_empty() {
        let out = decompose(&Table::new(), &["id"], "items").unwrap();
        assert!(out.is_empty());
    }
}

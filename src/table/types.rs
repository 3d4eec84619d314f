use serde_json::{Map, Value};

/// One table row: an insertion-ordered mapping from column name to value.
///
/// Values are scalars, or raw JSON lists awaiting [`decompose`](super::decompose).
pub type Row = Map<String, Value>;

/// Path separator used while flattening nested object keys. Always
/// normalized to `_` before a table reaches a caller.
pub(crate) const PATH_SEPARATOR: char = '.';

/// Separator appearing in final column names.
pub(crate) const COLUMN_SEPARATOR: char = '_';

/// An ordered sequence of rows with column-union semantics.
///
/// Tables are transient: built per invocation, handed to the caller, never
/// persisted. A cell missing from a row reads as null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    pub fn new() -> Self {
        Table { rows: Vec::new() }
    }

    pub fn from_rows(rows: Vec<Row>) -> Self {
        Table { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Union of all rows' column names, in first-seen order.
    pub fn columns(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for row in &self.rows {
            for key in row.keys() {
                if !seen.iter().any(|s: &String| s == key) {
                    seen.push(key.clone());
                }
            }
        }
        seen
    }

    /// Append another table's rows. Columns reconcile by union; rows keep
    /// whatever columns they arrived with.
    pub fn append(&mut self, other: Table) {
        self.rows.extend(other.rows);
    }

    /// Concatenate any number of tables. Row count is the sum of inputs,
    /// column set the union.
    pub fn concat(tables: impl IntoIterator<Item = Table>) -> Table {
        let mut out = Table::new();
        for t in tables {
            out.append(t);
        }
        out
    }

    /// Insert provenance columns (season, league id, parent id) at the
    /// leading positions of every row, in the order given. A provenance key
    /// shadows an existing column of the same name.
    pub fn with_provenance(self, pairs: &[(&str, Value)]) -> Table {
        let rows = self
            .rows
            .into_iter()
            .map(|row| {
                let mut out = Row::new();
                for (key, value) in pairs {
                    out.insert((*key).to_string(), value.clone());
                }
                for (key, value) in row {
                    if !out.contains_key(&key) {
                        out.insert(key, value);
                    }
                }
                out
            })
            .collect();
        Table { rows }
    }

    /// Replace every `.` in column names with `_`. Applied before a table is
    /// returned to a caller; idempotent.
    pub fn normalize_columns(self) -> Table {
        let rows = self
            .rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|(key, value)| {
                        (key.replace(PATH_SEPARATOR, &COLUMN_SEPARATOR.to_string()), value)
                    })
                    .collect()
            })
            .collect();
        Table { rows }
    }

    /// Keep only the named columns, in the given order. Rows lacking one of
    /// the names simply omit it.
    pub fn select_columns(&self, names: &[&str]) -> Table {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut out = Row::new();
                for name in names {
                    if let Some(value) = row.get(*name) {
                        out.insert((*name).to_string(), value.clone());
                    }
                }
                out
            })
            .collect();
        Table { rows }
    }

    /// Drop the named columns from every row.
    pub fn drop_columns(&self, names: &[&str]) -> Table {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .filter(|(key, _)| !names.contains(&key.as_str()))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect()
            })
            .collect();
        Table { rows }
    }
}

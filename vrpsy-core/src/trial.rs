use std::fmt;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::error::TableError;

/// A single result cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Integer(i64),
    Boolean(bool),
    Text(String),
    /// Missing numeric data, written as `NA`.
    NotAvailable,
}

impl CellValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            CellValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Integer(v) => write!(f, "{v}"),
            CellValue::Boolean(b) => write!(f, "{b}"),
            CellValue::Text(s) => f.write_str(s),
            CellValue::NotAvailable => f.write_str("NA"),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Number(v) => serializer.serialize_f64(*v),
            CellValue::Integer(v) => serializer.serialize_i64(*v),
            CellValue::Boolean(b) => serializer.serialize_bool(*b),
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::NotAvailable => serializer.serialize_str("NA"),
        }
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Number(v)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Integer(v)
    }
}

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Boolean(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

impl From<Option<f64>> for CellValue {
    fn from(v: Option<f64>) -> Self {
        v.map_or(CellValue::NotAvailable, CellValue::Number)
    }
}

/// Ordered `(column, value)` pairs produced by one finished trial instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultRow {
    cells: Vec<(String, CellValue)>,
}

impl ResultRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: &str, value: impl Into<CellValue>) -> Self {
        self.push(column, value);
        self
    }

    pub fn push(&mut self, column: &str, value: impl Into<CellValue>) {
        self.cells.push((column.to_string(), value.into()));
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &CellValue> {
        self.cells.iter().map(|(_, value)| value)
    }
}

impl Serialize for ResultRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, value) in &self.cells {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Rows of one trial type, in execution order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsTable {
    name: String,
    columns: Vec<String>,
    rows: Vec<ResultRow>,
}

impl ResultsTable {
    pub fn new<I, S>(name: &str, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.to_string(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a row whose columns match the table header exactly.
    pub fn add_complete_row(&mut self, row: ResultRow) -> Result<(), TableError> {
        if row.len() != self.columns.len() {
            return Err(TableError::ColumnCount {
                table: self.name.clone(),
                expected: self.columns.len(),
                got: row.len(),
            });
        }
        for (index, (expected, got)) in self.columns.iter().zip(row.columns()).enumerate() {
            if expected != got {
                return Err(TableError::ColumnName {
                    table: self.name.clone(),
                    index,
                    expected: expected.clone(),
                    got: got.to_string(),
                });
            }
        }
        self.rows.push(row);
        Ok(())
    }

    /// Values of `column` across all rows, skipping rows without it.
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a CellValue> {
        self.rows.iter().filter_map(move |row| row.get(column))
    }

    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        out.push_str(
            &self
                .columns
                .iter()
                .map(|c| csv_field(c))
                .collect::<Vec<_>>()
                .join(","),
        );
        out.push('\n');
        for row in &self.rows {
            let line = row
                .values()
                .map(|v| csv_field(&v.to_string()))
                .collect::<Vec<_>>()
                .join(",");
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ResultsTable {
        ResultsTable::new("Appearance", ["TrialSucceeded", "ReactionTime"])
    }

    #[test]
    fn rejects_row_with_wrong_arity() {
        let mut t = table();
        let err = t
            .add_complete_row(ResultRow::new().with("TrialSucceeded", true))
            .unwrap_err();
        assert_eq!(
            err,
            TableError::ColumnCount {
                table: "Appearance".into(),
                expected: 2,
                got: 1
            }
        );
        assert!(t.is_empty());
    }

    #[test]
    fn rejects_row_with_reordered_columns() {
        let mut t = table();
        let row = ResultRow::new()
            .with("ReactionTime", 0.3)
            .with("TrialSucceeded", true);
        assert!(matches!(
            t.add_complete_row(row),
            Err(TableError::ColumnName { index: 0, .. })
        ));
    }

    #[test]
    fn csv_writes_na_for_missing_numbers() {
        let mut t = table();
        t.add_complete_row(
            ResultRow::new()
                .with("TrialSucceeded", false)
                .with("ReactionTime", None::<f64>),
        )
        .unwrap();
        t.add_complete_row(
            ResultRow::new()
                .with("TrialSucceeded", true)
                .with("ReactionTime", 0.25),
        )
        .unwrap();
        assert_eq!(
            t.to_csv(),
            "TrialSucceeded,ReactionTime\nfalse,NA\ntrue,0.25\n"
        );
    }

    #[test]
    fn csv_quotes_text_with_commas() {
        let mut t = ResultsTable::new("Notes", ["Note"]);
        t.add_complete_row(ResultRow::new().with("Note", "a, \"b\""))
            .unwrap();
        assert_eq!(t.to_csv(), "Note\n\"a, \"\"b\"\"\"\n");
    }

    #[test]
    fn row_serializes_as_ordered_object() {
        let row = ResultRow::new()
            .with("ClickCount", 3i64)
            .with("ReactionTime", None::<f64>);
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"ClickCount":3,"ReactionTime":"NA"}"#);
    }
}

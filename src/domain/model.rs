use crate::utils::error::{Result, ServeError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

/// Number of inputs the classifier was trained on.
pub const FEATURE_ARITY: usize = 4;

pub type FeatureVector = [f64; FEATURE_ARITY];

/// Non-empty batch of validated classifier inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureBatch {
    rows: Vec<FeatureVector>,
}

impl FeatureBatch {
    pub fn from_rows(rows: Vec<FeatureVector>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[FeatureVector] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Class emitted by a classifier: a class index or a class name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Index(i64),
    Name(String),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Index(index) => write!(f, "{}", index),
            Label::Name(name) => f.write_str(name),
        }
    }
}

/// Which of the two prediction services a process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Classifier,
    Regressor,
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceKind::Classifier => f.write_str("classifier"),
            ServiceKind::Regressor => f.write_str("regressor"),
        }
    }
}

/// Columns the regressor pipeline was trained against.
///
/// `categorical` and `numerical` partition `all_columns`, but their order is
/// independent of it; only `all_columns` order matters to the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnContract {
    all_columns: Vec<String>,
    categorical: Vec<String>,
    numerical: Vec<String>,
}

impl ColumnContract {
    pub fn new(
        all_columns: Vec<String>,
        categorical: Vec<String>,
        numerical: Vec<String>,
    ) -> Result<Self> {
        if all_columns.is_empty() {
            return Err(ServeError::ConfigValidationError {
                field: "all_columns".to_string(),
                message: "column contract has no columns".to_string(),
            });
        }

        let mut seen = HashSet::new();
        if let Some(dup) = all_columns.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(ServeError::ConfigValidationError {
                field: "all_columns".to_string(),
                message: format!("duplicate column '{}'", dup),
            });
        }

        let categorical_set: HashSet<&str> = categorical.iter().map(String::as_str).collect();
        if let Some(both) = numerical.iter().find(|c| categorical_set.contains(c.as_str())) {
            return Err(ServeError::ConfigValidationError {
                field: "numerical_cols".to_string(),
                message: format!("column '{}' is both categorical and numerical", both),
            });
        }

        let partition: HashSet<&str> = categorical
            .iter()
            .chain(numerical.iter())
            .map(String::as_str)
            .collect();
        if let Some(unassigned) = all_columns.iter().find(|c| !partition.contains(c.as_str())) {
            return Err(ServeError::ConfigValidationError {
                field: "all_columns".to_string(),
                message: format!("column '{}' is neither categorical nor numerical", unassigned),
            });
        }
        if let Some(stray) = partition.iter().find(|c| !seen.contains(*c)) {
            return Err(ServeError::ConfigValidationError {
                field: "all_columns".to_string(),
                message: format!("column '{}' is partitioned but not listed", stray),
            });
        }

        Ok(Self {
            all_columns,
            categorical,
            numerical,
        })
    }

    pub fn all_columns(&self) -> &[String] {
        &self.all_columns
    }

    pub fn categorical(&self) -> &[String] {
        &self.categorical
    }

    pub fn numerical(&self) -> &[String] {
        &self.numerical
    }

    pub fn len(&self) -> usize {
        self.all_columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all_columns.is_empty()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.all_columns.iter().any(|c| c == column)
    }

    pub fn is_categorical(&self, column: &str) -> bool {
        self.categorical.iter().any(|c| c == column)
    }
}

/// One house as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum HouseRecord {
    Named(Map<String, Value>),
    /// Values assumed to follow the contract's column order.
    Positional(Vec<Value>),
}

/// A batch of houses in a single representation.
#[derive(Debug, Clone, PartialEq)]
pub enum HouseBatch {
    Named(Vec<Map<String, Value>>),
    Positional(Vec<Vec<Value>>),
}

impl HouseBatch {
    /// Groups records into one representation, rejecting mixed batches with
    /// the index of the first record that disagrees with record 0.
    pub fn from_records(records: Vec<HouseRecord>) -> std::result::Result<Self, usize> {
        let mut records = records.into_iter().enumerate();
        match records.next() {
            None => Ok(HouseBatch::Named(Vec::new())),
            Some((_, HouseRecord::Named(first))) => {
                let mut named = vec![first];
                for (index, record) in records {
                    match record {
                        HouseRecord::Named(map) => named.push(map),
                        HouseRecord::Positional(_) => return Err(index),
                    }
                }
                Ok(HouseBatch::Named(named))
            }
            Some((_, HouseRecord::Positional(first))) => {
                let mut positional = vec![first];
                for (index, record) in records {
                    match record {
                        HouseRecord::Positional(values) => positional.push(values),
                        HouseRecord::Named(_) => return Err(index),
                    }
                }
                Ok(HouseBatch::Positional(positional))
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            HouseBatch::Named(records) => records.len(),
            HouseBatch::Positional(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single scalar cell of a tabular batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    Bool(bool),
    Missing,
}

impl Cell {
    /// Converts a JSON scalar; nested arrays and objects have no cell form.
    pub fn from_json(value: &Value) -> Option<Cell> {
        match value {
            Value::Null => Some(Cell::Missing),
            Value::Bool(b) => Some(Cell::Bool(*b)),
            Value::Number(n) => n.as_f64().map(Cell::Number),
            Value::String(s) => Some(Cell::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Numeric view of the cell; booleans count as 1 and 0.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Cell::Text(_) | Cell::Missing => None,
        }
    }
}

/// Column-named rows handed to the regressor.
#[derive(Debug, Clone, PartialEq)]
pub struct TabularBatch {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl TabularBatch {
    /// Every row must hold one cell per column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == columns.len()));
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let index = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(index))
    }

    /// Projects the batch onto `order`. Returns `None` if a column is absent.
    pub fn select(&self, order: &[String]) -> Option<TabularBatch> {
        let indices = order
            .iter()
            .map(|column| self.column_index(column))
            .collect::<Option<Vec<_>>>()?;

        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();

        Some(TabularBatch::new(order.to_vec(), rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_column_contract_accepts_unordered_partition() {
        let contract = ColumnContract::new(
            names(&["area", "mainroad", "bedrooms"]),
            names(&["mainroad"]),
            names(&["bedrooms", "area"]),
        )
        .unwrap();

        assert_eq!(contract.len(), 3);
        assert!(contract.contains("bedrooms"));
        assert!(contract.is_categorical("mainroad"));
        assert!(!contract.is_categorical("area"));
    }

    #[test]
    fn test_column_contract_rejects_broken_partitions() {
        assert!(ColumnContract::new(vec![], vec![], vec![]).is_err());
        assert!(
            ColumnContract::new(names(&["a", "a"]), names(&["a"]), vec![]).is_err(),
            "duplicates"
        );
        assert!(
            ColumnContract::new(names(&["a", "b"]), names(&["a"]), names(&["a", "b"])).is_err(),
            "overlap"
        );
        assert!(
            ColumnContract::new(names(&["a", "b"]), names(&["a"]), vec![]).is_err(),
            "unassigned"
        );
        assert!(
            ColumnContract::new(names(&["a"]), names(&["a"]), names(&["z"])).is_err(),
            "stray"
        );
    }

    #[test]
    fn test_house_batch_rejects_mixed_records() {
        let records = vec![
            HouseRecord::Named(Map::new()),
            HouseRecord::Named(Map::new()),
            HouseRecord::Positional(vec![json!(1)]),
        ];
        assert_eq!(HouseBatch::from_records(records), Err(2));

        let records = vec![
            HouseRecord::Positional(vec![json!(1)]),
            HouseRecord::Positional(vec![json!(2)]),
        ];
        assert!(matches!(
            HouseBatch::from_records(records),
            Ok(HouseBatch::Positional(rows)) if rows.len() == 2
        ));
    }

    #[test]
    fn test_cell_from_json() {
        assert_eq!(Cell::from_json(&json!(7000)), Some(Cell::Number(7000.0)));
        assert_eq!(Cell::from_json(&json!("yes")), Some(Cell::Text("yes".to_string())));
        assert_eq!(Cell::from_json(&json!(null)), Some(Cell::Missing));
        assert_eq!(Cell::from_json(&json!([1, 2])), None);
        assert_eq!(Cell::from_json(&json!({"a": 1})), None);
    }

    #[test]
    fn test_cell_numeric_view() {
        assert_eq!(Cell::Number(2.5).as_f64(), Some(2.5));
        assert_eq!(Cell::Bool(true).as_f64(), Some(1.0));
        assert_eq!(Cell::Bool(false).as_f64(), Some(0.0));
        assert_eq!(Cell::Text("3".into()).as_f64(), None);
        assert_eq!(Cell::Missing.as_f64(), None);
    }

    #[test]
    fn test_tabular_select_reorders_columns() {
        let batch = TabularBatch::new(
            names(&["c", "a", "b"]),
            vec![vec![Cell::Number(3.0), Cell::Number(1.0), Cell::Number(2.0)]],
        );

        let reordered = batch.select(&names(&["a", "b", "c"])).unwrap();
        assert_eq!(reordered.columns(), names(&["a", "b", "c"]).as_slice());
        assert_eq!(
            reordered.rows()[0],
            vec![Cell::Number(1.0), Cell::Number(2.0), Cell::Number(3.0)]
        );
        assert!(batch.select(&names(&["a", "z"])).is_none());
    }

    #[test]
    fn test_label_serializes_untagged() {
        assert_eq!(serde_json::to_value(Label::Index(2)).unwrap(), json!(2));
        assert_eq!(
            serde_json::to_value(Label::Name("setosa".to_string())).unwrap(),
            json!("setosa")
        );
    }
}

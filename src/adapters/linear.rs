use crate::adapters::artifacts::load_json_artifact;
use crate::domain::model::{Cell, ColumnContract, TabularBatch};
use crate::domain::ports::Regressor;
use crate::utils::error::{GatewayError, Result, ServeError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericalTerm {
    pub column: String,
    pub mean: f64,
    pub scale: f64,
    pub coefficient: f64,
}

impl NumericalTerm {
    fn contribution(&self, value: f64) -> f64 {
        // 標準差為 0 時沿用原值，與 StandardScaler 行為一致
        let scale = if self.scale == 0.0 { 1.0 } else { self.scale };
        self.coefficient * (value - self.mean) / scale
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalTerm {
    pub column: String,
    /// Weight of each known category; unknown categories contribute nothing.
    pub levels: HashMap<String, f64>,
}

impl CategoricalTerm {
    fn contribution(&self, cell: &Cell) -> f64 {
        let key = match cell {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
            Cell::Bool(b) => b.to_string(),
            Cell::Missing => return 0.0,
        };
        self.levels.get(&key).copied().unwrap_or(0.0)
    }
}

/// Linear price model over standardized numerical columns and one-hot
/// encoded categorical columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegressor {
    pub intercept: f64,
    #[serde(default)]
    pub numerical: Vec<NumericalTerm>,
    #[serde(default)]
    pub categorical: Vec<CategoricalTerm>,
}

impl LinearRegressor {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        load_json_artifact(path)
    }

    /// Every term must refer to a contract column of the matching kind.
    pub fn check_contract(&self, contract: &ColumnContract) -> Result<()> {
        for term in &self.numerical {
            if !contract.numerical().contains(&term.column) {
                return Err(ServeError::ConfigValidationError {
                    field: "numerical".to_string(),
                    message: format!("'{}' is not a numerical column of the contract", term.column),
                });
            }
        }
        for term in &self.categorical {
            if !contract.is_categorical(&term.column) {
                return Err(ServeError::ConfigValidationError {
                    field: "categorical".to_string(),
                    message: format!(
                        "'{}' is not a categorical column of the contract",
                        term.column
                    ),
                });
            }
        }
        Ok(())
    }
}

impl Regressor for LinearRegressor {
    fn predict(&self, rows: &TabularBatch) -> std::result::Result<Vec<f64>, GatewayError> {
        let numerical = self
            .numerical
            .iter()
            .map(|term| column_position(rows, &term.column).map(|i| (term, i)))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let categorical = self
            .categorical
            .iter()
            .map(|term| column_position(rows, &term.column).map(|i| (term, i)))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.rows()
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let mut value = self.intercept;
                for (term, i) in &numerical {
                    let x = row[*i].as_f64().ok_or_else(|| {
                        GatewayError::invocation(format!(
                            "could not convert column '{}' of row {} to float",
                            term.column, index
                        ))
                    })?;
                    value += term.contribution(x);
                }
                for (term, i) in &categorical {
                    value += term.contribution(&row[*i]);
                }
                Ok(value)
            })
            .collect()
    }

    fn model_type(&self) -> &str {
        "Linear Regressor"
    }
}

fn column_position(rows: &TabularBatch, column: &str) -> std::result::Result<usize, GatewayError> {
    rows.column_index(column).ok_or_else(|| {
        GatewayError::invocation(format!("column '{}' is not present in input", column))
    })
}

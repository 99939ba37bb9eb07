use crate::domain::model::ColumnContract;
use crate::utils::error::{Result, ServeError};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;

/// On-disk layout of the column contract written next to the regressor.
#[derive(Debug, Deserialize)]
struct ModelInfoFile {
    all_columns: Vec<String>,
    categorical_cols: Vec<String>,
    numerical_cols: Vec<String>,
}

pub fn load_column_contract<P: AsRef<Path>>(path: P) -> Result<ColumnContract> {
    let path = path.as_ref();
    let content = read_artifact(path)?;
    column_contract_from_str(&content)
        .map_err(|e| ServeError::artifact(path.display().to_string(), e.to_string()))
}

pub fn column_contract_from_str(content: &str) -> Result<ColumnContract> {
    let info: ModelInfoFile = serde_json::from_str(content)?;
    ColumnContract::new(info.all_columns, info.categorical_cols, info.numerical_cols)
}

/// Reads and deserializes a JSON model artifact.
pub fn load_json_artifact<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let path = path.as_ref();
    let content = read_artifact(path)?;
    serde_json::from_str(&content)
        .map_err(|e| ServeError::artifact(path.display().to_string(), e.to_string()))
}

fn read_artifact(path: &Path) -> Result<String> {
    tracing::debug!("Reading artifact: {}", path.display());
    std::fs::read_to_string(path)
        .map_err(|e| ServeError::artifact(path.display().to_string(), e.to_string()))
}

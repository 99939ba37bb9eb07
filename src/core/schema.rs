//! Normalization of regressor payloads against a [`ColumnContract`].
//!
//! Records arrive either as named-field objects or as positional value lists.
//! The whole batch is assembled into one table before its column set is
//! reconciled with the contract, so a column supplied by any record counts
//! as present (records lacking it get a missing cell).
//!
//! Positional records are taken to follow `all_columns` order. Only their
//! length is checked; a caller who sends values in a different order gets
//! predictions for the wrong inputs rather than an error.

use crate::core::payload::{extract_features, json_kind};
use crate::domain::model::{Cell, ColumnContract, HouseBatch, HouseRecord, TabularBatch};
use crate::utils::error::ValidationError;
use serde_json::{Map, Value};

pub fn normalize_schema(
    payload: &Value,
    contract: &ColumnContract,
) -> Result<TabularBatch, ValidationError> {
    let items = extract_features(payload, "a list of houses")?;
    let batch = parse_records(items)?;
    let table = assemble(&batch, contract)?;
    reconcile(table, contract)
}

/// Decides the representation of the batch from every record.
pub fn parse_records(items: &[Value]) -> Result<HouseBatch, ValidationError> {
    let records = items
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(HouseRecord::Named(map.clone())),
            Value::Array(values) => Ok(HouseRecord::Positional(values.clone())),
            other => Err(ValidationError::invalid_format(format!(
                "house at index {} must be a list or an object, got {}",
                index,
                json_kind(other)
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    HouseBatch::from_records(records).map_err(|index| {
        ValidationError::invalid_format(format!(
            "house at index {} does not use the same format as house 0",
            index
        ))
    })
}

/// Builds one table out of the whole batch.
pub fn assemble(batch: &HouseBatch, contract: &ColumnContract) -> Result<TabularBatch, ValidationError> {
    match batch {
        HouseBatch::Named(records) => assemble_named(records),
        HouseBatch::Positional(records) => assemble_positional(records, contract),
    }
}

fn assemble_named(records: &[Map<String, Value>]) -> Result<TabularBatch, ValidationError> {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            columns
                .iter()
                .map(|column| match record.get(column) {
                    Some(value) => to_cell(index, column, value),
                    None => Ok(Cell::Missing),
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TabularBatch::new(columns, rows))
}

fn assemble_positional(
    records: &[Vec<Value>],
    contract: &ColumnContract,
) -> Result<TabularBatch, ValidationError> {
    tracing::debug!(
        rows = records.len(),
        "positional houses assumed to follow contract column order"
    );

    let columns = contract.all_columns();
    let rows = records
        .iter()
        .enumerate()
        .map(|(index, values)| {
            if values.len() != columns.len() {
                return Err(ValidationError::invalid_format(format!(
                    "{} columns passed, house at index {} had {} values",
                    columns.len(),
                    index,
                    values.len()
                )));
            }
            columns
                .iter()
                .zip(values)
                .map(|(column, value)| to_cell(index, column, value))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TabularBatch::new(columns.to_vec(), rows))
}

fn to_cell(index: usize, column: &str, value: &Value) -> Result<Cell, ValidationError> {
    Cell::from_json(value).ok_or_else(|| {
        ValidationError::invalid_format(format!(
            "value of column '{}' in house at index {} is a {}, expected a scalar",
            column,
            index,
            json_kind(value)
        ))
    })
}

/// Checks the table's columns against the contract and reorders them to
/// contract order.
pub fn reconcile(table: TabularBatch, contract: &ColumnContract) -> Result<TabularBatch, ValidationError> {
    if let Some(missing) = contract
        .all_columns()
        .iter()
        .find(|column| table.column_index(column).is_none())
    {
        return Err(ValidationError::MissingColumn {
            column: missing.clone(),
        });
    }

    let extras: Vec<String> = table
        .columns()
        .iter()
        .filter(|column| !contract.contains(column))
        .cloned()
        .collect();
    if !extras.is_empty() {
        return Err(ValidationError::UnexpectedColumn { columns: extras });
    }

    table
        .select(contract.all_columns())
        .ok_or_else(|| ValidationError::invalid_format("columns could not be reordered"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn contract() -> ColumnContract {
        ColumnContract::new(
            vec!["area".into(), "bedrooms".into(), "furnishingstatus".into()],
            vec!["furnishingstatus".into()],
            vec!["bedrooms".into(), "area".into()],
        )
        .unwrap()
    }

    #[test]
    fn test_named_record_is_reordered() {
        let payload = json!({"features": [
            {"furnishingstatus": "furnished", "area": 7420, "bedrooms": 4}
        ]});

        let table = normalize_schema(&payload, &contract()).unwrap();
        assert_eq!(table.columns(), contract().all_columns());
        assert_eq!(
            table.rows()[0],
            vec![
                Cell::Number(7420.0),
                Cell::Number(4.0),
                Cell::Text("furnished".to_string())
            ]
        );
    }

    #[test]
    fn test_reorder_abc() {
        let contract = ColumnContract::new(
            vec!["a".into(), "b".into(), "c".into()],
            vec![],
            vec!["a".into(), "b".into(), "c".into()],
        )
        .unwrap();
        let payload = json!({"features": [{"c": 3, "a": 1, "b": 2}]});

        let table = normalize_schema(&payload, &contract).unwrap();
        assert_eq!(
            table.rows()[0],
            vec![Cell::Number(1.0), Cell::Number(2.0), Cell::Number(3.0)]
        );
    }

    #[test]
    fn test_positional_records() {
        let payload = json!({"features": [
            [7420, 4, "furnished"],
            [8960, 4, "semi-furnished"]
        ]});

        let table = normalize_schema(&payload, &contract()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.cell(1, "furnishingstatus"),
            Some(&Cell::Text("semi-furnished".to_string()))
        );
    }

    #[test]
    fn test_missing_column() {
        let payload = json!({"features": [{"area": 7420, "furnishingstatus": "furnished"}]});
        let err = normalize_schema(&payload, &contract()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingColumn {
                column: "bedrooms".to_string()
            }
        );
        assert_eq!(err.to_string(), "Missing column 'bedrooms' in input");
    }

    #[test]
    fn test_unexpected_columns_are_all_named() {
        let payload = json!({"features": [{
            "area": 7420, "pool": true, "bedrooms": 4,
            "furnishingstatus": "furnished", "garage": 2
        }]});

        let err = normalize_schema(&payload, &contract()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnexpectedColumn {
                columns: vec!["pool".to_string(), "garage".to_string()]
            }
        );
    }

    #[test]
    fn test_missing_reported_before_extras() {
        let payload = json!({"features": [{"area": 1, "bedrooms": 2, "pool": true}]});
        assert!(matches!(
            normalize_schema(&payload, &contract()),
            Err(ValidationError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_column_from_any_record_counts_as_present() {
        let payload = json!({"features": [
            {"area": 7420, "bedrooms": 4, "furnishingstatus": "furnished"},
            {"area": 8960, "furnishingstatus": "unfurnished"}
        ]});

        let table = normalize_schema(&payload, &contract()).unwrap();
        assert_eq!(table.cell(1, "bedrooms"), Some(&Cell::Missing));
    }

    #[test]
    fn test_ragged_positional_records() {
        let payload = json!({"features": [[7420, 4, "furnished"], [8960, 4]]});
        let err = normalize_schema(&payload, &contract()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input format: 3 columns passed, house at index 1 had 2 values"
        );
    }

    #[test]
    fn test_nested_cells_are_invalid() {
        let payload = json!({"features": [
            {"area": [7420], "bedrooms": 4, "furnishingstatus": "furnished"}
        ]});
        assert!(matches!(
            normalize_schema(&payload, &contract()),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_mixed_and_scalar_records_are_invalid() {
        let mixed = json!({"features": [
            {"area": 7420, "bedrooms": 4, "furnishingstatus": "furnished"},
            [8960, 4, "furnished"]
        ]});
        let err = normalize_schema(&mixed, &contract()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input format: house at index 1 does not use the same format as house 0"
        );

        let scalars = json!({"features": [7420, 4, "furnished"]});
        assert!(matches!(
            normalize_schema(&scalars, &contract()),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_envelope_errors() {
        assert_eq!(
            normalize_schema(&json!({"houses": []}), &contract()),
            Err(ValidationError::MissingKey)
        );
        assert_eq!(
            normalize_schema(&json!({"features": {"area": 1}}), &contract()),
            Err(ValidationError::WrongType {
                expected: "a list of houses"
            })
        );
        assert_eq!(
            normalize_schema(&json!({"features": []}), &contract()),
            Err(ValidationError::EmptyInput)
        );
    }
}

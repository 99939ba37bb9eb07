use crate::core::fixed_arity::normalize_fixed;
use crate::core::response::{ClassificationResponse, ModelInfoResponse, RegressionResponse};
use crate::core::schema::normalize_schema;
use crate::domain::model::ColumnContract;
use crate::domain::ports::{Classifier, Regressor};
use crate::utils::error::{GatewayError, PredictError};
use chrono::{DateTime, Utc};
use serde_json::Value;

const REGRESSION_TARGET: &str = "housing price";

/// Classifier endpoint logic: normalize, invoke the model, shape the reply.
pub struct ClassificationEngine<C: Classifier> {
    model: C,
}

impl<C: Classifier> ClassificationEngine<C> {
    pub fn new(model: C) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &C {
        &self.model
    }

    pub fn predict(&self, payload: &Value) -> Result<ClassificationResponse, PredictError> {
        let batch = normalize_fixed(payload)?;
        tracing::debug!(rows = batch.len(), "classifying feature batch");

        let labels = self.model.predict(&batch)?;
        ensure_row_count(batch.len(), labels.len())?;

        let probabilities = self.model.predict_proba(&batch)?;
        ensure_row_count(batch.len(), probabilities.len())?;

        let confidences = probabilities
            .iter()
            .enumerate()
            .map(|(row, p)| {
                if p.iter().any(|v| !v.is_finite()) {
                    return Err(GatewayError::NonFiniteOutput { row });
                }
                p.iter()
                    .copied()
                    .reduce(f64::max)
                    .ok_or(GatewayError::EmptyProbabilities { row })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ClassificationResponse::from_outputs(labels, confidences))
    }
}

/// Regressor endpoint logic against a fixed column contract.
pub struct RegressionEngine<R: Regressor> {
    model: R,
    contract: ColumnContract,
    loaded_at: DateTime<Utc>,
}

impl<R: Regressor> RegressionEngine<R> {
    pub fn new(model: R, contract: ColumnContract) -> Self {
        Self {
            model,
            contract,
            loaded_at: Utc::now(),
        }
    }

    pub fn model(&self) -> &R {
        &self.model
    }

    pub fn contract(&self) -> &ColumnContract {
        &self.contract
    }

    pub fn predict(&self, payload: &Value) -> Result<RegressionResponse, PredictError> {
        let table = normalize_schema(payload, &self.contract)?;
        tracing::debug!(rows = table.len(), "running regression on reconciled batch");

        let values = self.model.predict(&table)?;
        ensure_row_count(table.len(), values.len())?;
        ensure_finite(&values)?;

        Ok(RegressionResponse::from_outputs(values))
    }

    pub fn model_info(&self) -> ModelInfoResponse {
        ModelInfoResponse {
            model_type: self.model.model_type().to_string(),
            target: REGRESSION_TARGET.to_string(),
            features: self.contract.all_columns().to_vec(),
            categorical_features: self.contract.categorical().to_vec(),
            numerical_features: self.contract.numerical().to_vec(),
            loaded_at: self.loaded_at,
        }
    }
}

fn ensure_finite(values: &[f64]) -> Result<(), GatewayError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(row) => Err(GatewayError::NonFiniteOutput { row }),
        None => Ok(()),
    }
}

fn ensure_row_count(expected: usize, actual: usize) -> Result<(), GatewayError> {
    if expected != actual {
        return Err(GatewayError::RowCountMismatch { expected, actual });
    }
    Ok(())
}

use crate::domain::model::Label;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-row outputs split by batch cardinality: exactly one row is reported
/// in singular form, anything else in plural form.
#[derive(Debug, Clone, PartialEq)]
pub enum Cardinality<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> Cardinality<T> {
    pub fn from_values(mut values: Vec<T>) -> Self {
        if values.len() == 1 {
            Cardinality::One(values.remove(0))
        } else {
            Cardinality::Many(values)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassificationResponse {
    Single {
        prediction: Label,
        confidence: f64,
    },
    Batch {
        predictions: Vec<Label>,
        confidences: Vec<f64>,
    },
}

impl ClassificationResponse {
    pub fn from_outputs(labels: Vec<Label>, confidences: Vec<f64>) -> Self {
        let pairs: Vec<(Label, f64)> = labels.into_iter().zip(confidences).collect();
        match Cardinality::from_values(pairs) {
            Cardinality::One((prediction, confidence)) => ClassificationResponse::Single {
                prediction,
                confidence,
            },
            Cardinality::Many(pairs) => {
                let (predictions, confidences): (Vec<Label>, Vec<f64>) = pairs.into_iter().unzip();
                ClassificationResponse::Batch {
                    predictions,
                    confidences,
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegressionResponse {
    Single { prediction: f64 },
    Batch { predictions: Vec<f64> },
}

impl RegressionResponse {
    pub fn from_outputs(values: Vec<f64>) -> Self {
        match Cardinality::from_values(values) {
            Cardinality::One(prediction) => RegressionResponse::Single { prediction },
            Cardinality::Many(predictions) => RegressionResponse::Batch { predictions },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Summary of the regressor's column contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfoResponse {
    pub model_type: String,
    pub target: String,
    pub features: Vec<String>,
    pub categorical_features: Vec<String>,
    pub numerical_features: Vec<String>,
    pub loaded_at: DateTime<Utc>,
}

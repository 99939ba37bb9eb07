//! Normalization of classifier payloads: one flat feature vector or a batch
//! of vectors, each exactly [`FEATURE_ARITY`] numbers long.

use crate::core::payload::extract_features;
use crate::domain::model::{FeatureBatch, FeatureVector, FEATURE_ARITY};
use crate::utils::error::ValidationError;
use serde_json::Value;

/// Layout of a `features` array, decided from every element rather than
/// just the first one.
#[derive(Debug, PartialEq)]
pub enum FeatureShape<'a> {
    /// A flat vector; lifted into a batch of one.
    Single(&'a [Value]),
    Batch(Vec<&'a [Value]>),
}

impl<'a> FeatureShape<'a> {
    pub fn infer(items: &'a [Value]) -> Result<Self, ValidationError> {
        let first_is_vector = items.first().is_some_and(Value::is_array);

        if let Some(index) = items.iter().position(|v| v.is_array() != first_is_vector) {
            return Err(ValidationError::MixedShape { index });
        }

        if first_is_vector {
            let vectors = items
                .iter()
                .filter_map(|v| v.as_array().map(Vec::as_slice))
                .collect();
            Ok(FeatureShape::Batch(vectors))
        } else {
            Ok(FeatureShape::Single(items))
        }
    }

    pub fn into_vectors(self) -> Vec<&'a [Value]> {
        match self {
            FeatureShape::Single(values) => vec![values],
            FeatureShape::Batch(vectors) => vectors,
        }
    }
}

/// Validates a classifier payload into a feature batch.
///
/// Vectors are checked in order, arity before type; the first failing vector
/// decides the error.
pub fn normalize_fixed(payload: &Value) -> Result<FeatureBatch, ValidationError> {
    let items = extract_features(payload, "a list")?;

    let rows = FeatureShape::infer(items)?
        .into_vectors()
        .into_iter()
        .enumerate()
        .map(|(index, values)| to_feature_vector(index, values))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FeatureBatch::from_rows(rows))
}

fn to_feature_vector(index: usize, values: &[Value]) -> Result<FeatureVector, ValidationError> {
    if values.len() != FEATURE_ARITY {
        return Err(ValidationError::ArityError {
            index,
            expected: FEATURE_ARITY,
        });
    }

    let mut vector = [0.0; FEATURE_ARITY];
    for (slot, value) in vector.iter_mut().zip(values) {
        *slot = value.as_f64().ok_or(ValidationError::TypeError { index })?;
    }

    Ok(vector)
}

use crate::adapters::artifacts::load_json_artifact;
use crate::domain::model::{FeatureBatch, FeatureVector, Label};
use crate::domain::ports::Classifier;
use crate::utils::error::{GatewayError, Result, ServeError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassWeights {
    pub label: Label,
    pub coefficients: FeatureVector,
    pub intercept: f64,
}

/// Multinomial logistic classifier over four features.
///
/// Artifact format: `{"classes": [{"label": .., "coefficients": [..4], "intercept": ..}]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoftmaxClassifier {
    classes: Vec<ClassWeights>,
}

impl SoftmaxClassifier {
    pub fn new(classes: Vec<ClassWeights>) -> Result<Self> {
        if classes.is_empty() {
            return Err(ServeError::ConfigError {
                message: "classifier artifact defines no classes".to_string(),
            });
        }
        Ok(Self { classes })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let model: SoftmaxClassifier = load_json_artifact(path)?;
        Self::new(model.classes)
    }

    pub fn classes(&self) -> &[ClassWeights] {
        &self.classes
    }

    fn scores(&self, row: &FeatureVector) -> Vec<f64> {
        self.classes
            .iter()
            .map(|class| {
                class.intercept
                    + class
                        .coefficients
                        .iter()
                        .zip(row)
                        .map(|(w, x)| w * x)
                        .sum::<f64>()
            })
            .collect()
    }
}

impl Classifier for SoftmaxClassifier {
    fn predict(&self, rows: &FeatureBatch) -> std::result::Result<Vec<Label>, GatewayError> {
        rows.rows()
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let scores = self.scores(row);
                let best = argmax(&scores).ok_or_else(|| {
                    GatewayError::invocation(format!("no finite class score for row {}", index))
                })?;
                Ok(self.classes[best].label.clone())
            })
            .collect()
    }

    fn predict_proba(&self, rows: &FeatureBatch) -> std::result::Result<Vec<Vec<f64>>, GatewayError> {
        Ok(rows.rows().iter().map(|row| softmax(&self.scores(row))).collect())
    }
}

/// First index of the maximum; NaN scores never win.
fn argmax(scores: &[f64]) -> Option<usize> {
    scores
        .iter()
        .enumerate()
        .filter(|(_, s)| !s.is_nan())
        .fold(None, |best: Option<(usize, f64)>, (i, &s)| match best {
            Some((_, b)) if b >= s => best,
            _ => Some((i, s)),
        })
        .map(|(i, _)| i)
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    // 分數溢位為無限大時，機率平分給所有最大項
    if max.is_infinite() {
        let winners = scores.iter().filter(|&&s| s == max).count() as f64;
        return scores
            .iter()
            .map(|&s| if s == max { 1.0 / winners } else { 0.0 })
            .collect();
    }

    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

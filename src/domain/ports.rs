use crate::domain::model::{FeatureBatch, Label, ServiceKind, TabularBatch};
use crate::utils::error::GatewayError;

/// Trained classifier over fixed-arity feature vectors.
///
/// Implementations are shared across request handlers and may be called
/// concurrently; they must not rely on interior mutation for correctness.
pub trait Classifier: Send + Sync {
    fn predict(&self, rows: &FeatureBatch) -> Result<Vec<Label>, GatewayError>;

    /// One probability vector per row, one entry per class.
    fn predict_proba(&self, rows: &FeatureBatch) -> Result<Vec<Vec<f64>>, GatewayError>;
}

/// Trained regressor over rows laid out in contract column order.
pub trait Regressor: Send + Sync {
    fn predict(&self, rows: &TabularBatch) -> Result<Vec<f64>, GatewayError>;

    /// Human-readable model family reported by `/model_info`.
    fn model_type(&self) -> &str {
        "Regressor"
    }
}

pub trait ConfigProvider: Send + Sync {
    fn bind_address(&self) -> &str;
    fn service_kind(&self) -> ServiceKind;
    fn model_path(&self) -> &str;
    fn model_info_path(&self) -> Option<&str>;
    fn verbose(&self) -> bool;
    fn json_logs(&self) -> bool;
}

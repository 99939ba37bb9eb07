pub mod engine;
pub mod fixed_arity;
pub mod payload;
pub mod response;
pub mod schema;

pub use crate::domain::model::{ColumnContract, FeatureBatch, Label, TabularBatch};
pub use crate::domain::ports::{Classifier, ConfigProvider, Regressor};
pub use crate::utils::error::{PredictError, Result};

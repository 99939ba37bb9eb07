// Application wiring: artifacts → engines → routers.

use crate::adapters::artifacts::load_column_contract;
use crate::adapters::http::{classifier_router, regressor_router};
use crate::adapters::linear::LinearRegressor;
use crate::adapters::softmax::SoftmaxClassifier;
use crate::core::engine::{ClassificationEngine, RegressionEngine};
use crate::domain::model::ServiceKind;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, ServeError};
use axum::Router;
use std::sync::Arc;

pub fn load_classification_engine(model_path: &str) -> Result<ClassificationEngine<SoftmaxClassifier>> {
    let model = SoftmaxClassifier::from_file(model_path)?;
    tracing::info!(
        "📦 Loaded classifier from {} ({} classes)",
        model_path,
        model.classes().len()
    );
    Ok(ClassificationEngine::new(model))
}

pub fn load_regression_engine(
    model_path: &str,
    info_path: &str,
) -> Result<RegressionEngine<LinearRegressor>> {
    let contract = load_column_contract(info_path)?;
    let model = LinearRegressor::from_file(model_path)?;
    model.check_contract(&contract)?;
    tracing::info!(
        "📦 Loaded regressor from {} ({} columns: {} categorical, {} numerical)",
        model_path,
        contract.len(),
        contract.categorical().len(),
        contract.numerical().len()
    );
    Ok(RegressionEngine::new(model, contract))
}

/// Loads the configured model once and builds the router that owns it.
pub fn build_router<C: ConfigProvider + ?Sized>(config: &C) -> Result<Router> {
    match config.service_kind() {
        ServiceKind::Classifier => {
            let engine = load_classification_engine(config.model_path())?;
            Ok(classifier_router(Arc::new(engine)))
        }
        ServiceKind::Regressor => {
            let info_path = config
                .model_info_path()
                .ok_or_else(|| ServeError::MissingConfigError {
                    field: "model.info".to_string(),
                })?;
            let engine = load_regression_engine(config.model_path(), info_path)?;
            Ok(regressor_router(Arc::new(engine)))
        }
    }
}

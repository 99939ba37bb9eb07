//! HTTP surface of the prediction services.
//!
//! - `GET /` - banner
//! - `GET /health` - liveness check
//! - `POST /predict` - prediction, `400 {"error": ..}` on any failure
//! - `GET /model_info` - column contract summary (regressor only)

use crate::core::engine::{ClassificationEngine, RegressionEngine};
use crate::core::response::{ErrorResponse, HealthResponse, ModelInfoResponse};
use crate::domain::ports::{Classifier, Regressor};
use crate::utils::error::{PredictError, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

pub const CLASSIFIER_BANNER: &str = "ML Model is Running";
pub const REGRESSOR_BANNER: &str = "Housing Price Prediction Model API is Running";

pub fn classifier_router<C: Classifier + 'static>(engine: Arc<ClassificationEngine<C>>) -> Router {
    Router::new()
        .route("/", get(|| async { CLASSIFIER_BANNER }))
        .route("/health", get(health))
        .route("/predict", post(classify::<C>))
        .with_state(engine)
}

pub fn regressor_router<R: Regressor + 'static>(engine: Arc<RegressionEngine<R>>) -> Router {
    Router::new()
        .route("/", get(|| async { REGRESSOR_BANNER }))
        .route("/health", get(health))
        .route("/predict", post(regress::<R>))
        .route("/model_info", get(model_info::<R>))
        .with_state(engine)
}

/// Serves `router` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

async fn classify<C: Classifier + 'static>(
    State(engine): State<Arc<ClassificationEngine<C>>>,
    body: Bytes,
) -> Response {
    let payload = match parse_payload(&body) {
        Ok(payload) => payload,
        Err(response) => return response,
    };

    match engine.predict(&payload) {
        Ok(prediction) => Json(prediction).into_response(),
        Err(e) => reject(e),
    }
}

async fn regress<R: Regressor + 'static>(
    State(engine): State<Arc<RegressionEngine<R>>>,
    body: Bytes,
) -> Response {
    let payload = match parse_payload(&body) {
        Ok(payload) => payload,
        Err(response) => return response,
    };

    match engine.predict(&payload) {
        Ok(prediction) => Json(prediction).into_response(),
        Err(e) => reject(e),
    }
}

async fn model_info<R: Regressor + 'static>(
    State(engine): State<Arc<RegressionEngine<R>>>,
) -> Json<ModelInfoResponse> {
    Json(engine.model_info())
}

fn parse_payload(body: &[u8]) -> std::result::Result<Value, Response> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::warn!("Rejected request body: {}", e);
        error_response(format!("Request body is not valid JSON: {}", e))
    })
}

// 驗證錯誤與模型錯誤在傳輸層一律回 400，只在日誌層級區分
fn reject(err: PredictError) -> Response {
    match &err {
        PredictError::Validation(e) => tracing::warn!("Rejected prediction request: {}", e),
        PredictError::Gateway(e) => tracing::error!("Model invocation failed: {}", e),
    }
    error_response(err.to_string())
}

fn error_response(message: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message })).into_response()
}

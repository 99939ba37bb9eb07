use anyhow::Result;
use axum::Router;
use ml_serve::adapters::http::{classifier_router, serve};
use ml_serve::adapters::softmax::{ClassWeights, SoftmaxClassifier};
use ml_serve::domain::model::Label;
use ml_serve::ClassificationEngine;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

fn iris_model() -> SoftmaxClassifier {
    SoftmaxClassifier::new(vec![
        ClassWeights {
            label: Label::Index(0),
            coefficients: [0.0, 0.0, -3.0, 0.0],
            intercept: 6.0,
        },
        ClassWeights {
            label: Label::Index(1),
            coefficients: [0.0, 0.0, 0.0, 0.0],
            intercept: 0.0,
        },
        ClassWeights {
            label: Label::Index(2),
            coefficients: [0.0, 0.0, 1.0, 2.0],
            intercept: -8.0,
        },
    ])
    .unwrap()
}

async fn spawn_server(router: Router) -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(serve(listener, router, std::future::pending()));
    Ok(format!("http://{}", addr))
}

async fn spawn_classifier() -> Result<String> {
    let engine = Arc::new(ClassificationEngine::new(iris_model()));
    spawn_server(classifier_router(engine)).await
}

async fn post_predict(base: &str, body: Value) -> Result<(StatusCode, Value)> {
    let response = reqwest::Client::new()
        .post(format!("{}/predict", base))
        .json(&body)
        .send()
        .await?;
    let status = response.status();
    Ok((status, response.json().await?))
}

#[tokio::test]
async fn test_single_vector_returns_prediction_and_confidence() -> Result<()> {
    let base = spawn_classifier().await?;

    let (status, body) = post_predict(&base, json!({"features": [5.1, 3.5, 1.4, 0.2]})).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"], json!(0));
    let confidence = body["confidence"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&confidence));
    assert!(body.get("predictions").is_none());
    Ok(())
}

#[tokio::test]
async fn test_one_element_batch_uses_singular_shape() -> Result<()> {
    let base = spawn_classifier().await?;

    let (_, flat) = post_predict(&base, json!({"features": [6.7, 3.0, 5.8, 2.3]})).await?;
    let (_, nested) = post_predict(&base, json!({"features": [[6.7, 3.0, 5.8, 2.3]]})).await?;

    assert_eq!(flat, nested);
    assert_eq!(flat["prediction"], json!(2));
    Ok(())
}

#[tokio::test]
async fn test_batch_returns_parallel_lists() -> Result<()> {
    let base = spawn_classifier().await?;

    let (status, body) = post_predict(
        &base,
        json!({"features": [[5.1, 3.5, 1.4, 0.2], [5.9, 3.0, 4.2, 1.0], [6.7, 3.0, 5.8, 2.3]]}),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["predictions"], json!([0, 1, 2]));
    assert_eq!(body["confidences"].as_array().unwrap().len(), 3);
    assert!(body.get("prediction").is_none());
    Ok(())
}

#[tokio::test]
async fn test_arity_error_cites_index() -> Result<()> {
    let base = spawn_classifier().await?;

    let (status, body) =
        post_predict(&base, json!({"features": [[5.1, 3.5, 1.4, 0.2], [1, 2, 3]]})).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": "Feature vector at index 1 must contain exactly 4 values"})
    );
    Ok(())
}

#[tokio::test]
async fn test_validation_errors() -> Result<()> {
    let base = spawn_classifier().await?;

    let cases = [
        (json!({"data": [1, 2, 3, 4]}), "Missing 'features' key in request"),
        (json!({"features": "1,2,3,4"}), "Features must be a list"),
        (json!({"features": []}), "Empty features list"),
        (
            json!({"features": [1, 2, "three", 4]}),
            "All values in feature vector at index 0 must be numeric",
        ),
        (
            json!({"features": [[1, 2, 3, 4], 5]}),
            "Element at index 1 does not match the shape of element 0",
        ),
    ];

    for (payload, message) in cases {
        let (status, body) = post_predict(&base, payload).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!(message));
    }
    Ok(())
}

#[tokio::test]
async fn test_malformed_json_is_client_error() -> Result<()> {
    let base = spawn_classifier().await?;

    let response = reqwest::Client::new()
        .post(format!("{}/predict", base))
        .header("Content-Type", "application/json")
        .body("{\"features\": [1, 2,")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await?;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Request body is not valid JSON"));
    Ok(())
}

#[tokio::test]
async fn test_health_and_banner() -> Result<()> {
    let base = spawn_classifier().await?;
    let client = reqwest::Client::new();

    let health: Value = client
        .get(format!("{}/health", base))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(health, json!({"status": "ok"}));

    let banner = client.get(&base).send().await?.text().await?;
    assert_eq!(banner, "ML Model is Running");

    let info = client.get(format!("{}/model_info", base)).send().await?;
    assert_eq!(info.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_overflowing_scores_still_return_finite_confidence() -> Result<()> {
    let base = spawn_classifier().await?;

    let (status, body) =
        post_predict(&base, json!({"features": [1e308, 1e308, 1e308, 1e308]})).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"], json!(2));
    assert_eq!(body["confidence"], json!(1.0));
    Ok(())
}

use httpmock::prelude::*;
use churn_serve::core::classifier::ARTIFACT_FILE_NAME;
use churn_serve::domain::model::{FeatureMap, PredictRequest, Scalar};
use churn_serve::{
    LocalModelStore, ModelLoader, PredictionService, RunStore, ServeError, ServiceState,
    TrackingServerStore, UriModelStore,
};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const CHURN_MODEL: &str = r#"{
    "flavor": "logistic_regression",
    "intercept": 0.5,
    "threshold": 0.5,
    "features": [
        { "type": "numeric", "name": "tenure", "weight": -0.1 },
        { "type": "numeric", "name": "monthly_charges", "weight": 0.02, "mean": 50.0, "scale": 10.0 }
    ]
}"#;

fn tracking_loader(server: &MockServer) -> ModelLoader {
    let store = UriModelStore::new(
        LocalModelStore::new(),
        RunStore::Server(TrackingServerStore::new(server.base_url())),
    );
    ModelLoader::new(Arc::new(store))
}

fn write_run(root: &Path, experiment: &str, run_id: &str) {
    let model_dir = root.join(experiment).join(run_id).join("artifacts").join("model");
    std::fs::create_dir_all(&model_dir).unwrap();
    std::fs::write(model_dir.join(ARTIFACT_FILE_NAME), CHURN_MODEL).unwrap();
}

fn request(tenure: f64, monthly_charges: f64) -> PredictRequest {
    let mut features = FeatureMap::new();
    features.insert("tenure".to_string(), Scalar::Number(tenure));
    features.insert("monthly_charges".to_string(), Scalar::Number(monthly_charges));
    PredictRequest { features }
}

#[tokio::test]
async fn test_run_uri_loads_from_tracking_server() {
    let server = MockServer::start();
    let artifact_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/get-artifact")
            .query_param("path", "model/model.json")
            .query_param("run_uuid", "0123abcd");
        then.status(200)
            .header("Content-Type", "application/json")
            .body(CHURN_MODEL);
    });

    let uri = Some("runs:/0123abcd/model".to_string());
    let service = PredictionService::activate(uri, &tracking_loader(&server))
        .await
        .unwrap();

    artifact_mock.assert();
    assert_eq!(service.state(), ServiceState::Loaded);
    assert!(service.health().model_loaded);

    let churned = service.predict(&request(1.0, 70.5)).unwrap();
    assert_eq!(churned.churn_pred, 1);
    let stayed = service.predict(&request(48.0, 70.5)).unwrap();
    assert_eq!(stayed.churn_pred, 0);
}

#[tokio::test]
async fn test_missing_run_artifact_is_fatal() {
    let server = MockServer::start();
    let artifact_mock = server.mock(|when, then| {
        when.method(GET).path("/get-artifact");
        then.status(404)
            .json_body(serde_json::json!({"error_code": "RESOURCE_DOES_NOT_EXIST"}));
    });

    let uri = Some("runs:/does-not-exist/model".to_string());
    let err = PredictionService::activate(uri, &tracking_loader(&server))
        .await
        .err()
        .unwrap();

    artifact_mock.assert();
    assert!(matches!(err, ServeError::ModelNotFound { .. }));
}

#[tokio::test]
async fn test_tracking_server_error_is_fatal() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/get-artifact");
        then.status(503).body("maintenance");
    });

    let err = tracking_loader(&server)
        .load(Some("runs:/0123abcd/model"))
        .await
        .err()
        .unwrap();

    match err {
        ServeError::StoreResponseError { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "maintenance");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_unreachable_tracking_server_is_fatal() {
    // Nothing listens on port 9 on loopback.
    let store = UriModelStore::from_tracking_uri(Some("http://127.0.0.1:9")).unwrap();
    let loader = ModelLoader::new(Arc::new(store));

    let err = loader.load(Some("runs:/0123abcd/model")).await.err().unwrap();
    assert!(matches!(err, ServeError::StoreError(_)));
}

#[tokio::test]
async fn test_run_uri_resolves_in_file_tracking_store() {
    let dir = TempDir::new().unwrap();
    let mlruns = dir.path().join("mlruns");
    write_run(&mlruns, "0", "0123abcd");

    for tracking_uri in [
        mlruns.display().to_string(),
        format!("file://{}", mlruns.display()),
    ] {
        let store = UriModelStore::from_tracking_uri(Some(&tracking_uri)).unwrap();
        let loader = ModelLoader::new(Arc::new(store));
        let service = PredictionService::activate(Some("runs:/0123abcd/model".to_string()), &loader)
            .await
            .unwrap();

        assert_eq!(service.state(), ServiceState::Loaded);
        assert_eq!(service.predict(&request(1.0, 70.5)).unwrap().churn_pred, 1);
    }
}

#[tokio::test]
async fn test_missing_run_in_file_tracking_store_is_fatal() {
    let dir = TempDir::new().unwrap();
    write_run(dir.path(), "0", "someone-else");

    let store = UriModelStore::from_tracking_uri(dir.path().to_str()).unwrap();
    let err = ModelLoader::new(Arc::new(store))
        .load(Some("runs:/0123abcd/model"))
        .await
        .err()
        .unwrap();
    assert!(matches!(err, ServeError::ModelNotFound { .. }));
}

#[test]
fn test_unsupported_tracking_uri_is_rejected() {
    let err = UriModelStore::from_tracking_uri(Some("databricks://workspace")).unwrap_err();
    assert!(matches!(err, ServeError::InvalidConfigValueError { .. }));
}

#[tokio::test]
async fn test_unresolvable_uri_is_fatal() {
    let loader = ModelLoader::new(Arc::new(UriModelStore::default()));

    let err = PredictionService::activate(Some("not-a-scheme:/x".to_string()), &loader)
        .await
        .err()
        .unwrap();
    assert!(matches!(err, ServeError::InvalidModelUri { .. }));

    let err = PredictionService::activate(Some("/no/such/model/dir".to_string()), &loader)
        .await
        .err()
        .unwrap();
    assert!(matches!(err, ServeError::ModelNotFound { .. }));
}

#[tokio::test]
async fn test_absent_uri_degrades_gracefully() {
    let loader = ModelLoader::new(Arc::new(UriModelStore::default()));

    let service = PredictionService::activate(None, &loader).await.unwrap();
    assert_eq!(service.state(), ServiceState::Unloaded);
    tokio_test::assert_err!(service.predict(&request(5.0, 70.5)));

    // An empty value counts as unset but is still reported as configured.
    let service = PredictionService::activate(Some(String::new()), &loader)
        .await
        .unwrap();
    assert_eq!(service.state(), ServiceState::Unloaded);
    assert_eq!(service.health().model_uri.as_deref(), Some(""));
}

#[tokio::test]
async fn test_file_uri_loads_local_artifact() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(ARTIFACT_FILE_NAME), CHURN_MODEL).unwrap();
    let uri = format!("file://{}", dir.path().display());

    let loader = ModelLoader::new(Arc::new(UriModelStore::default()));
    let service = PredictionService::activate(Some(uri), &loader).await.unwrap();

    assert_eq!(service.state(), ServiceState::Loaded);
    let response = tokio_test::assert_ok!(service.predict(&request(1.0, 70.5)));
    assert_eq!(response.churn_pred, 1);
}

#[tokio::test]
async fn test_corrupt_artifact_is_fatal() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(ARTIFACT_FILE_NAME), "{ not json").unwrap();

    let loader = ModelLoader::new(Arc::new(UriModelStore::default()));
    let err = loader
        .load(Some(dir.path().to_str().unwrap()))
        .await
        .err()
        .unwrap();
    assert!(matches!(err, ServeError::InvalidArtifact { .. }));
}

//! End-to-end tests for the surveyor workflow over the mock transport.

use pretty_assertions::assert_eq;
use quantity_surveyor::extraction::{NormalizeOptions, PARSE_FAILED_NOTE};
use quantity_surveyor::fixtures::{file_body, generate_response_body, load_fixture};
use quantity_surveyor::mocks::{MockAuthManager, MockHttpTransport};
use quantity_surveyor::transport::HttpMethod;
use quantity_surveyor::{
    QuantitySurveyor, RequestError, ResourceError, ResponseError, RetryConfig, SurveyorConfig,
    SurveyorError,
};
use secrecy::SecretString;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const FILE_NAME: &str = "files/plan-7x2k";

fn test_config(retry: RetryConfig) -> SurveyorConfig {
    SurveyorConfig::builder()
        .api_key(SecretString::new("test-key".into()))
        .poll_interval(Duration::from_millis(1))
        .processing_timeout(Duration::from_secs(5))
        .retry_config(retry)
        .build()
        .unwrap()
}

fn surveyor(transport: Arc<MockHttpTransport>) -> QuantitySurveyor {
    QuantitySurveyor::builder(test_config(RetryConfig::no_retry()))
        .transport(transport)
        .auth_manager(Arc::new(MockAuthManager::new("test-key")))
        .build()
        .unwrap()
}

/// Writes a stand-in PDF and returns its directory guard and path.
fn drawing() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plan.pdf");
    std::fs::write(&path, b"%PDF-1.7 ground floor plan").unwrap();
    (dir, path)
}

/// Upload answered as PROCESSING, one poll answered ACTIVE.
fn enqueue_upload(transport: &MockHttpTransport) {
    transport.enqueue_json_response(200, &load_fixture("files/upload_processing.json"));
    transport.enqueue_json_response(200, &load_fixture("files/get_active.json"));
}

#[tokio::test]
async fn test_analyze_pdf_end_to_end() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    enqueue_upload(&transport);
    transport.enqueue_json_response(200, &load_fixture("content/generate_response.json"));
    transport.enqueue_json_response(200, "{}");
    let surveyor = surveyor(transport.clone());
    let (_dir, pdf) = drawing();

    // Act
    let extraction = surveyor.analyze_pdf(&pdf).await.unwrap();

    // Assert
    assert!(!extraction.parse_failed());
    assert_eq!(extraction.raw_text, None);
    assert_eq!(extraction.result.scale, "1:100");
    assert_eq!(extraction.result.boq.len(), 1);
    assert_eq!(extraction.result.bbs[0].mark, "F1-M1");
    assert_eq!(extraction.result.bbs[0].weight_kg, Some(15.96));
    assert_eq!(extraction.report.recomputed, 1);

    transport.verify_request_count(4);
    transport.verify_request(0, HttpMethod::Post, "/upload/v1beta/files");
    transport.verify_request(1, HttpMethod::Get, "/v1beta/files/plan-7x2k");
    transport.verify_request(2, HttpMethod::Post, "/v1beta/models/gemini-1.5-pro:generateContent");
    transport.verify_request(3, HttpMethod::Delete, "/v1beta/files/plan-7x2k");
}

#[tokio::test]
async fn test_generate_request_references_upload() {
    let transport = Arc::new(MockHttpTransport::new());
    enqueue_upload(&transport);
    transport.enqueue_json_response(200, &load_fixture("content/generate_response.json"));
    transport.enqueue_json_response(200, "{}");
    let surveyor = surveyor(transport.clone());
    let (_dir, pdf) = drawing();

    surveyor.analyze_pdf(&pdf).await.unwrap();

    let requests = transport.get_requests();
    let body: serde_json::Value = serde_json::from_slice(requests[2].body.as_ref().unwrap()).unwrap();
    let parts = &body["contents"][0]["parts"];
    assert_eq!(
        parts[0]["fileData"]["fileUri"],
        "https://generativelanguage.googleapis.com/v1beta/files/plan-7x2k"
    );
    assert!(parts[1]["text"].as_str().unwrap().ends_with("Output ONLY valid JSON."));

    let upload = String::from_utf8_lossy(requests[0].body.as_ref().unwrap()).to_string();
    assert!(upload.contains(r#""display_name":"plan.pdf""#));
}

#[tokio::test]
async fn test_active_upload_skips_polling() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json_response(200, &file_body(FILE_NAME, "ACTIVE"));
    transport.enqueue_json_response(200, &load_fixture("content/generate_response.json"));
    transport.enqueue_json_response(200, "{}");
    let surveyor = surveyor(transport.clone());
    let (_dir, pdf) = drawing();

    surveyor.analyze_pdf(&pdf).await.unwrap();

    transport.verify_request_count(3);
    transport.verify_request(1, HttpMethod::Post, ":generateContent");
}

#[tokio::test]
async fn test_keep_upload_skips_delete() {
    let transport = Arc::new(MockHttpTransport::new());
    enqueue_upload(&transport);
    transport.enqueue_json_response(200, &load_fixture("content/generate_response.json"));
    let surveyor = QuantitySurveyor::builder(test_config(RetryConfig::no_retry()))
        .transport(transport.clone())
        .auth_manager(Arc::new(MockAuthManager::new("test-key")))
        .keep_upload(true)
        .build()
        .unwrap();
    let (_dir, pdf) = drawing();

    surveyor.analyze_pdf(&pdf).await.unwrap();

    transport.verify_request_count(3);
    assert!(transport
        .get_requests()
        .iter()
        .all(|r| r.method != HttpMethod::Delete));
}

#[tokio::test]
async fn test_failed_delete_does_not_fail_analysis() {
    let transport = Arc::new(MockHttpTransport::new());
    enqueue_upload(&transport);
    transport.enqueue_json_response(200, &load_fixture("content/generate_response.json"));
    transport.enqueue_json_response(500, r#"{"error": {"code": 500, "message": "backend error"}}"#);
    let surveyor = surveyor(transport.clone());
    let (_dir, pdf) = drawing();

    let extraction = surveyor.analyze_pdf(&pdf).await.unwrap();

    assert_eq!(extraction.result.bbs.len(), 1);
    transport.verify_request_count(4);
}

#[tokio::test]
async fn test_upload_deleted_when_generation_fails() {
    let transport = Arc::new(MockHttpTransport::new());
    enqueue_upload(&transport);
    transport.enqueue_json_response(400, r#"{"error": {"code": 400, "message": "bad request"}}"#);
    transport.enqueue_json_response(200, "{}");
    let surveyor = surveyor(transport.clone());
    let (_dir, pdf) = drawing();

    let result = surveyor.analyze_pdf(&pdf).await;

    assert!(matches!(
        result,
        Err(SurveyorError::Request(RequestError::ValidationError { .. }))
    ));
    transport.verify_request_count(4);
    transport.verify_request(3, HttpMethod::Delete, "/v1beta/files/plan-7x2k");
}

#[tokio::test]
async fn test_unparseable_reply_returns_placeholder() {
    let transport = Arc::new(MockHttpTransport::new());
    enqueue_upload(&transport);
    let reply = load_fixture("responses/no_json.txt");
    transport.enqueue_json_response(200, &generate_response_body(&reply));
    transport.enqueue_json_response(200, "{}");
    let surveyor = surveyor(transport.clone());
    let (_dir, pdf) = drawing();

    let extraction = surveyor.analyze_pdf(&pdf).await.unwrap();

    assert!(extraction.parse_failed());
    assert_eq!(extraction.raw_text.as_deref(), Some(reply.as_str()));
    assert_eq!(extraction.result.scale, "Unknown");
    assert!(extraction.result.boq.is_empty());
    assert!(extraction.result.notes[0].starts_with(PARSE_FAILED_NOTE));
}

#[tokio::test]
async fn test_empty_reply_is_an_error() {
    let transport = Arc::new(MockHttpTransport::new());
    enqueue_upload(&transport);
    transport.enqueue_json_response(200, r#"{"candidates": [{"finishReason": "STOP", "index": 0}]}"#);
    transport.enqueue_json_response(200, "{}");
    let surveyor = surveyor(transport.clone());
    let (_dir, pdf) = drawing();

    let result = surveyor.analyze_pdf(&pdf).await;

    assert!(matches!(
        result,
        Err(SurveyorError::Response(ResponseError::EmptyResponse))
    ));
    transport.verify_request(3, HttpMethod::Delete, "/v1beta/files/plan-7x2k");
}

#[tokio::test]
async fn test_rate_limited_generation_is_retried() {
    let transport = Arc::new(MockHttpTransport::new());
    enqueue_upload(&transport);
    transport.enqueue_json_response_with_headers(
        429,
        r#"{"error": {"code": 429, "message": "Resource has been exhausted"}}"#,
        &[("Retry-After", "0")],
    );
    transport.enqueue_json_response(200, &load_fixture("content/generate_response.json"));
    transport.enqueue_json_response(200, "{}");

    let retry = RetryConfig {
        max_retries: 2,
        initial_delay: Duration::from_millis(1),
        ..Default::default()
    };
    let surveyor = QuantitySurveyor::builder(test_config(retry))
        .transport(transport.clone())
        .auth_manager(Arc::new(MockAuthManager::new("test-key")))
        .build()
        .unwrap();
    let (_dir, pdf) = drawing();

    let extraction = surveyor.analyze_pdf(&pdf).await.unwrap();

    assert_eq!(extraction.result.bbs[0].weight_kg, Some(15.96));
    transport.verify_request_count(5);
    transport.verify_request(3, HttpMethod::Post, ":generateContent");
}

#[tokio::test]
async fn test_processing_failure_surfaces() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json_response(200, &load_fixture("files/upload_processing.json"));
    transport.enqueue_json_response(200, &load_fixture("files/get_failed.json"));
    let surveyor = surveyor(transport.clone());
    let (_dir, pdf) = drawing();

    let result = surveyor.analyze_pdf(&pdf).await;

    assert!(matches!(
        result,
        Err(SurveyorError::Resource(ResourceError::FileProcessingFailed { .. }))
    ));
    transport.verify_request_count(2);
}

#[tokio::test]
async fn test_missing_drawing_is_unreadable() {
    let transport = Arc::new(MockHttpTransport::new());
    let surveyor = surveyor(transport.clone());
    let dir = tempfile::tempdir().unwrap();

    let result = surveyor.analyze_pdf(&dir.path().join("missing.pdf")).await;

    assert!(matches!(
        result,
        Err(SurveyorError::Resource(ResourceError::DrawingUnreadable { ref path, .. })) if path.ends_with("missing.pdf")
    ));
    transport.verify_request_count(0);
}

#[test]
fn test_analyze_text_uses_normalize_options() {
    let surveyor = QuantitySurveyor::builder(test_config(RetryConfig::no_retry()))
        .transport(Arc::new(MockHttpTransport::new()))
        .normalize_options(NormalizeOptions {
            check_lengths: true,
            ..Default::default()
        })
        .build()
        .unwrap();

    let text = r#"{"bbs": [{"mark": "B1", "dia_mm": 10, "count": 4, "length": 3.0, "total_length": 20.0}]}"#;
    let extraction = surveyor.analyze_text(text);

    assert_eq!(extraction.result.bbs[0].weight_kg, Some(12.59));
    assert_eq!(extraction.report.diagnostics.len(), 1);
    assert!(surveyor.normalize_options().check_lengths);
}

use dpaguard_client::{ClientError, ReviewClient, format_error};
use dpaguard_core::domain::job::JobStage;
use dpaguard_core::domain::review::{ReviewId, ReviewStatus};
use serde_json::json;
use wiremock::matchers::{body_json, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn review_body(id: &str, status: &str) -> serde_json::Value {
    json!({
        "review_id": id,
        "status": status,
        "created_at": "2025-01-10T12:00:00Z",
        "updated_at": "2025-01-10T12:00:00Z",
        "context_json": null,
        "doc": null
    })
}

#[tokio::test]
async fn get_job_decodes_status() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reviews/review-1/job"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "job123",
            "state": "STARTED",
            "ready": false,
            "successful": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ReviewClient::new(server.uri());
    let status = client.get_job(&ReviewId::from("review-1")).await?;

    assert_eq!(status.stage, JobStage::Started);
    assert_eq!(status.job_id.as_deref(), Some("job123"));
    assert!(!status.is_failed());
    Ok(())
}

#[tokio::test]
async fn get_job_error_carries_status_and_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reviews/missing/job"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Review not found"})),
        )
        .mount(&server)
        .await;

    let client = ReviewClient::new(server.uri());
    let err = client
        .get_job(&ReviewId::from("missing"))
        .await
        .expect_err("404 must fail");

    assert!(err.is_not_found());
    assert_eq!(
        format_error(&err),
        "HTTP 404 Not Found: Review not found (status 404)"
    );
}

#[tokio::test]
async fn start_review_returns_job_id() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/reviews/review-1/start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Processing started",
            "review_id": "review-1",
            "status": "PROCESSING",
            "job_id": "job123"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ReviewClient::new(server.uri());
    let started = client.start_review(&ReviewId::from("review-1")).await?;

    assert_eq!(started.status, ReviewStatus::Processing);
    assert_eq!(started.job_id.as_deref(), Some("job123"));
    Ok(())
}

#[tokio::test]
async fn create_review_sends_context() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/reviews"))
        .and(body_json(json!({"context_json": {"company_role": "controller"}})))
        .respond_with(ResponseTemplate::new(201).set_body_json(review_body("r-9", "CREATED")))
        .expect(1)
        .mount(&server)
        .await;

    let client = ReviewClient::new(server.uri());
    let review = client
        .create_review(Some(json!({"company_role": "controller"})))
        .await?;

    assert_eq!(review.review_id.as_str(), "r-9");
    assert_eq!(review.status, ReviewStatus::Created);
    Ok(())
}

#[tokio::test]
async fn upload_document_is_multipart() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/reviews/r-9/upload"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "review_id": "r-9",
            "status": "UPLOADED",
            "doc": {
                "filename": "dpa.pdf",
                "mime": "application/pdf",
                "size_bytes": 4,
                "sha256": null,
                "storage_key": "reviews/r-9/dpa.pdf"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ReviewClient::new(server.uri());
    let uploaded = client
        .upload_document(
            &ReviewId::from("r-9"),
            "dpa.pdf",
            "application/pdf",
            b"%PDF".to_vec(),
        )
        .await?;

    assert_eq!(uploaded.status, ReviewStatus::Uploaded);
    assert_eq!(
        uploaded.doc.and_then(|doc| doc.filename).as_deref(),
        Some("dpa.pdf")
    );
    Ok(())
}

#[tokio::test]
async fn malformed_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reviews/r-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = ReviewClient::new(server.uri());
    let err = client
        .get_review(&ReviewId::from("r-1"))
        .await
        .expect_err("body is not JSON");

    assert!(matches!(err, ClientError::ParseError(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn unreachable_server_is_request_failure() {
    // Port 9 (discard) is not expected to accept HTTP connections.
    let client = ReviewClient::new("http://127.0.0.1:9");
    let err = client
        .health_live()
        .await
        .expect_err("nothing is listening");

    assert!(matches!(err, ClientError::RequestFailed(_)));
    assert!(err.is_retryable());
}

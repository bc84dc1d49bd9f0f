use std::time::Duration;

use pretty_assertions::assert_eq;
use ragscope_engine::{
    ChatReply, ClientSettings, FailureKind, PipelineClient, ReqwestPipelineClient,
};
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ReqwestPipelineClient {
    let settings = ClientSettings::with_base_url(&server.uri()).expect("mock server url");
    ReqwestPipelineClient::new(settings).expect("client")
}

#[tokio::test]
async fn query_posts_json_and_parses_answer_with_steps() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "query": "hello" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "hi",
            "steps": ["Routing to Vector Store", "Grading docs: relevant"],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client_for(&server).query("hello").await.expect("query ok");
    assert_eq!(
        reply,
        ChatReply {
            answer: "hi".to_string(),
            steps: Some(vec![
                "Routing to Vector Store".to_string(),
                "Grading docs: relevant".to_string(),
            ]),
        }
    );
}

#[tokio::test]
async fn query_accepts_missing_steps() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "answer": "hi" })))
        .mount(&server)
        .await;

    let reply = client_for(&server).query("hello").await.expect("query ok");
    assert_eq!(reply.into_parts(), ("hi".to_string(), Vec::new()));
}

#[tokio::test]
async fn query_fails_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "detail": "boom" })))
        .mount(&server)
        .await;

    let err = client_for(&server).query("hello").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
}

#[tokio::test]
async fn query_treats_unexpected_shape_as_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "hi",
            "steps": "not a list",
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).query("hello").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::MalformedBody);
}

#[tokio::test]
async fn query_treats_non_json_body_as_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).query("hello").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::MalformedBody);
}

#[tokio::test]
async fn query_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({ "answer": "late" })),
        )
        .mount(&server)
        .await;

    let settings = ClientSettings {
        request_timeout: Duration::from_millis(50),
        ..ClientSettings::with_base_url(&server.uri()).unwrap()
    };
    let client = ReqwestPipelineClient::new(settings).unwrap();

    let err = client.query("hello").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn query_fails_when_server_unreachable() {
    // Bind then drop a listener so nothing answers on the port.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let settings = ClientSettings::with_base_url(&format!("http://127.0.0.1:{port}")).unwrap();
    let client = ReqwestPipelineClient::new(settings).unwrap();

    let err = client.query("hello").await.unwrap_err();
    assert!(matches!(err.kind, FailureKind::Network | FailureKind::Timeout));
}

#[tokio::test]
async fn upload_sends_multipart_file_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"report.pdf\""))
        .and(body_string_contains("%PDF-1.7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "PDF processed and vector store ready."
        })))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .upload("report.pdf", b"%PDF-1.7 fake".to_vec())
        .await
        .expect("upload ok");
}

#[tokio::test]
async fn upload_fails_on_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .upload("report.pdf", b"%PDF".to_vec())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
}

#[tokio::test]
async fn health_returns_status_line() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "Adaptive RAG Backend (Optimized) is running"
        })))
        .mount(&server)
        .await;

    let status = client_for(&server).health().await.expect("health ok");
    assert_eq!(status, "Adaptive RAG Backend (Optimized) is running");
}

#[tokio::test]
async fn base_url_path_prefix_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "answer": "hi" })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = ClientSettings::with_base_url(&format!("{}/api", server.uri())).unwrap();
    let client = ReqwestPipelineClient::new(settings).unwrap();
    client.query("hello").await.expect("query ok");
}

#[tokio::test]
async fn oversized_answer_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "x".repeat(64),
        })))
        .mount(&server)
        .await;

    let settings = ClientSettings {
        max_response_bytes: 16,
        ..ClientSettings::with_base_url(&server.uri()).unwrap()
    };
    let client = ReqwestPipelineClient::new(settings).unwrap();

    let err = client.query("hello").await.unwrap_err();
    assert!(matches!(err.kind, FailureKind::TooLarge { max_bytes: 16, .. }));
}

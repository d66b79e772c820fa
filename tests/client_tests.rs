use std::net::TcpListener;

use lolp::{Client, Config, Error, RequestOptions};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_default_headers_reach_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/projects"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(&server.uri()).unwrap();
    client.projects().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let agent = requests[0]
        .headers
        .get("user-agent")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(agent.starts_with(&format!("lolp/{} (+", env!("CARGO_PKG_VERSION"))));
    assert!(agent.contains(std::env::consts::OS));
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_query_params_and_extra_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/projects"))
        .and(query_param("kind", "rails"))
        .and(query_param("q", "a b"))
        .and(header("X-Request-Id", "42"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Request-Id", "42")
                .set_body_string("[]"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(&server.uri()).unwrap();
    let options = RequestOptions::new()
        .param("kind", "rails")
        .param("q", "a b")
        .header("X-Request-Id", "42");
    let response = client.http("GET", "/v1/projects", options).await.unwrap();

    assert_eq!(response.status.as_u16(), 200);
    assert_eq!(response.headers["x-request-id"], "42");
    assert_eq!(response.text(), "[]");
}

#[tokio::test]
async fn test_endpoint_with_path_prefix() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(&format!("{}/api/", server.uri())).unwrap();
    assert!(client.projects().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_client_from_config_sends_saved_token() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/pubkeys/laptop"))
        .and(header("Authorization", "Bearer from-config"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let config = Config {
        endpoint: server.uri(),
        token: Some("from-config".to_string()),
        ..Config::default()
    };
    let client = Client::from_config(&config).unwrap();
    client.delete_public_key("laptop").await.unwrap();
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let client = Client::new(&format!("http://127.0.0.1:{port}/")).unwrap();
    let err = client.projects().await.unwrap_err();

    assert!(matches!(err, Error::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn test_non_json_success_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = Client::new(&server.uri()).unwrap();
    let err = client.projects().await.unwrap_err();

    assert!(matches!(err, Error::Decode(_)));
}

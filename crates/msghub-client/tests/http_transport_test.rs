//! HTTP transport tests against a mock hub.
//!
//! Each test stands up a `wiremock` server that answers the same paths the
//! hub serves and checks that [`Client`] calls hit them with the expected
//! method and body.

use std::time::Duration;

use msghub_client::{
    Client, ClientError, Command, HttpConfig, HttpTransport, SyncEvent, TemplateAsset,
    TransportError,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string, header, method, path},
};

fn client_for(server: &MockServer) -> Client<HttpTransport> {
    let config = HttpConfig { base_url: server.uri(), timeout: Some(Duration::from_secs(5)) };
    Client::new(HttpTransport::new(&config).unwrap())
}

#[tokio::test]
async fn poll_with_empty_body_is_no_event() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("\n"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(matches!(client.poll().await, Ok(None)));
}

#[tokio::test]
async fn poll_decodes_event() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"Type":"new_msg","Room":"alpha","Username":"bob","Text":"hi","Error":""}"#,
        ))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let event = client.poll().await.unwrap();

    assert_eq!(event.as_ref().and_then(SyncEvent::room), Some("alpha"));
}

#[tokio::test]
async fn poll_with_garbage_is_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(matches!(client.poll().await, Err(ClientError::Protocol(_))));
}

#[tokio::test]
async fn send_posts_form_encoded_command() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/request/"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("Type=join&Room=lobby"))
        .respond_with(ResponseTemplate::new(200).set_body_string("\n"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.send(&Command::Join { room: "lobby".into() }).await.unwrap();
}

#[tokio::test]
async fn send_escapes_message_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/request/"))
        .and(body_string("Type=new_msg&Room=lobby&Text=hi+there%26"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.send(&Command::NewMsg { room: "lobby".into(), text: "hi there&".into() }).await.unwrap();
}

#[tokio::test]
async fn non_success_status_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/refresh/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client.poll().await;

    assert!(matches!(
        result,
        Err(ClientError::Transport(TransportError::Status { status: 503, .. }))
    ));
}

#[tokio::test]
async fn bootstrap_fetches_hit_their_paths() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/msg_me.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<b>name_placeholder</b>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fetch/name/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("alice"))
        .mount(&server)
        .await;

    let client = client_for(&server);

    assert_eq!(
        client.fetch_template(TemplateAsset::OwnMessage).await.unwrap(),
        "<b>name_placeholder</b>"
    );
    assert_eq!(client.fetch_username().await.unwrap(), "alice");
}

#[tokio::test]
async fn unreachable_hub_is_connection_error() {
    let config = HttpConfig { base_url: "http://127.0.0.1:9".into(), timeout: None };
    let client = Client::new(HttpTransport::new(&config).unwrap());

    assert!(matches!(
        client.exit().await,
        Err(ClientError::Transport(TransportError::Connection(_)))
    ));
}

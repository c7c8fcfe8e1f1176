//! End-to-end tests against the live mock server.
//!
//! # Design
//! Each test starts the mock server on a random port in a background thread
//! with its own runtime, then drives `RequestClient` over real HTTP with the
//! default ureq transport. Payload types are declared here rather than
//! imported from the server so that schema drift shows up as a failure.

use std::io::{Read, Write};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwrap_core::{
    auth_hook, connect, AuthScheme, ClientConfig, ClientError, HookSet, HttpRequest, LoadingIndicator,
    MemoryCredentialStore,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
struct HotSuggest {
    #[serde(rename = "tagText")]
    tag_text: String,
}

#[derive(Debug, Deserialize)]
struct House {
    id: u32,
}

#[derive(Debug, Deserialize)]
struct HousePage {
    page: u32,
    items: Vec<House>,
}

#[derive(Debug, Deserialize)]
struct Token {
    token: String,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Todo {
    id: String,
    title: String,
    completed: bool,
}

#[derive(Serialize)]
struct CreateTodo<'a> {
    title: &'a str,
}

#[derive(Serialize)]
struct UpdateTodo {
    completed: bool,
}

/// Start the mock server on a random port and return its address.
fn spawn_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

/// Answer the first connection with a fixed HTTP response, byte for byte.
fn spawn_canned(response: &'static [u8]) -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            head.extend_from_slice(&buf[..n]);
        }
        stream.write_all(response).unwrap();
    });

    addr
}

fn config(addr: SocketAddr) -> ClientConfig {
    ClientConfig::new(format!("http://{addr}"))
}

#[derive(Default)]
struct CountingIndicator {
    shown: AtomicUsize,
    closed: AtomicUsize,
}

impl LoadingIndicator for CountingIndicator {
    fn show(&self) {
        self.shown.fetch_add(1, Ordering::SeqCst);
    }
    fn close(&self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn hot_suggests_resolve_with_payload_only() {
    let client = connect(config(spawn_server())).unwrap();

    let suggests: Vec<HotSuggest> = client.get(HttpRequest::new("/home/hotSuggests")).await.unwrap();
    let tags: Vec<&str> = suggests.iter().map(|s| s.tag_text.as_str()).collect();
    assert_eq!(tags, vec!["seaside", "downtown", "pet friendly"]);
}

#[tokio::test]
async fn query_params_reach_the_server() {
    let client = connect(config(spawn_server())).unwrap();

    let page: HousePage = client
        .get(HttpRequest::new("/home/houselist").param("page", 3))
        .await
        .unwrap();
    assert_eq!(page.page, 3);
    assert_eq!(page.items.first().map(|h| h.id), Some(6));
}

#[tokio::test]
async fn login_flow_with_cached_token() {
    let store = Arc::new(MemoryCredentialStore::new());
    let hooks = HookSet {
        on_request: Some(auth_hook(store.clone(), "token", AuthScheme::Bearer)),
        ..HookSet::default()
    };
    let client = connect(config(spawn_server()).with_hooks(hooks)).unwrap();

    // Step 1: no token cached, the server reports an expired session.
    let err = client
        .get::<UserInfo>(HttpRequest::new("/user/info"))
        .await
        .unwrap_err();
    assert!(err.is_session_expired(), "unexpected error: {err}");
    assert_eq!(err.code(), Some(50014));

    // Step 2: log in and cache the token.
    let login = HttpRequest::new("/login")
        .json(&serde_json::json!({ "username": "coder", "password": "123456" }))
        .unwrap();
    let token: Token = client.post(login).await.unwrap();
    store.set("token", token.token);

    // Step 3: the hook now attaches the bearer header.
    let info: UserInfo = client.get(HttpRequest::new("/user/info")).await.unwrap();
    assert_eq!(info.name, "coder");
}

#[tokio::test]
async fn bad_credentials_reject_with_server_message() {
    let client = connect(config(spawn_server())).unwrap();

    let login = HttpRequest::new("/login")
        .json(&serde_json::json!({ "username": "coder", "password": "nope" }))
        .unwrap();
    let err = client.post::<Token>(login).await.unwrap_err();
    match err {
        ClientError::Api { code, message } => {
            assert_eq!(code, 60204);
            assert_eq!(message, "Account and password are incorrect.");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn todo_lifecycle_through_verb_helpers() {
    let client = connect(config(spawn_server())).unwrap();

    // Step 1: list — should be empty.
    let todos: Vec<Todo> = client.get(HttpRequest::new("/todos")).await.unwrap();
    assert!(todos.is_empty(), "expected empty list");

    // Step 2: create.
    let req = HttpRequest::new("/todos").json(&CreateTodo { title: "Integration test" }).unwrap();
    let created: Todo = client.post(req).await.unwrap();
    assert_eq!(created.title, "Integration test");
    assert!(!created.completed);
    let path = format!("/todos/{}", created.id);

    // Step 3: get.
    let fetched: Todo = client.get(HttpRequest::new(path.clone())).await.unwrap();
    assert_eq!(fetched, created);

    // Step 4: patch.
    let req = HttpRequest::new(path.clone()).json(&UpdateTodo { completed: true }).unwrap();
    let updated: Todo = client.patch(req).await.unwrap();
    assert_eq!(updated.title, "Integration test");
    assert!(updated.completed);

    // Step 5: delete; the envelope carries no data.
    let () = client.delete(HttpRequest::new(path.clone())).await.unwrap();

    // Step 6: get after delete — failure code.
    let err = client.get::<Todo>(HttpRequest::new(path)).await.unwrap_err();
    assert_eq!(err.code(), Some(40400));
}

#[tokio::test]
async fn non_2xx_status_rejects() {
    let client = connect(config(spawn_server())).unwrap();

    let err = client.get::<()>(HttpRequest::new("/status/503")).await.unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 503, ref body } if body == "status 503"));
}

#[tokio::test]
async fn slow_response_times_out() {
    let addr = spawn_server();
    let client = connect(config(addr).with_timeout(Duration::from_millis(200))).unwrap();

    let err = client
        .get::<String>(HttpRequest::new("/slow").param("ms", 2000))
        .await
        .unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got {err:?}");

    let done: String = client
        .get(HttpRequest::new("/slow").param("ms", 0))
        .await
        .unwrap();
    assert_eq!(done, "done");
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let client = connect(config(addr)).unwrap();

    let err = client.get::<()>(HttpRequest::new("/home/hotSuggests")).await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)), "unexpected error: {err:?}");
}

#[tokio::test]
async fn indicator_settles_once_per_request() {
    let indicator = Arc::new(CountingIndicator::default());
    let client = connect(config(spawn_server()))
        .unwrap()
        .with_indicator(indicator.clone());

    let _: Vec<HotSuggest> = client.get(HttpRequest::new("/home/hotSuggests")).await.unwrap();
    let _ = client.get::<()>(HttpRequest::new("/status/500")).await.unwrap_err();
    let _: String = client
        .get(HttpRequest::new("/slow").param("ms", 0).show_loading(false))
        .await
        .unwrap();

    assert_eq!(indicator.shown.load(Ordering::SeqCst), 2);
    assert_eq!(indicator.closed.load(Ordering::SeqCst), 2);
    assert!(!client.is_loading());
}

#[tokio::test]
async fn non_utf8_body_is_a_deserialization_error() {
    // "你好" in GBK.
    let addr = spawn_canned(
        b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 4\r\nConnection: close\r\n\r\n\xC4\xE3\xBA\xC3",
    );
    let client = connect(config(addr)).unwrap();

    let err = client.request_raw(HttpRequest::new("/gbk")).await.unwrap_err();
    assert!(matches!(err, ClientError::Deserialization(_)), "unexpected error: {err:?}");
}

#[tokio::test]
async fn no_content_response_resolves_with_unit() {
    let addr = spawn_canned(b"HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n");
    let client = connect(config(addr)).unwrap();

    let () = client.delete(HttpRequest::new("/todos/1")).await.unwrap();
}

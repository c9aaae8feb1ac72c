use super::*;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use std::{
    collections::HashMap,
    sync::Mutex,
    time::Duration,
};
use tokio::{net::TcpListener, sync::oneshot};

struct RecordingPage {
    form: FormPage,
    errors: Mutex<Vec<String>>,
}

impl RecordingPage {
    fn new(sentence: Option<&str>) -> Arc<Self> {
        let form = FormPage::with_elements([PARSE_RESULT_ID]);
        form.set_value(PARSE_RESULT_ID, "untouched");
        if let Some(sentence) = sentence {
            form.set_value(SENTENCE_INPUT_ID, sentence);
        }
        Arc::new(Self {
            form,
            errors: Mutex::new(Vec::new()),
        })
    }

    fn result(&self) -> String {
        self.form.text(PARSE_RESULT_ID).expect("result element")
    }

    fn errors(&self) -> Vec<String> {
        self.errors.lock().expect("errors").clone()
    }
}

impl Page for RecordingPage {
    fn input_value(&self, element_id: &str) -> Option<String> {
        self.form.input_value(element_id)
    }

    fn set_text_content(&self, element_id: &str, text: String) -> Result<(), ClientError> {
        self.form.set_text_content(element_id, text)
    }

    fn log_error(&self, message: &str) {
        self.errors.lock().expect("errors").push(message.to_string());
    }
}

#[derive(Debug, Clone)]
struct RecordedRequest {
    content_type: Option<String>,
    body: String,
}

#[derive(Clone)]
struct CannedServerState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    status: StatusCode,
    body: String,
}

async fn canned_reply(
    State(state): State<CannedServerState>,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    state.requests.lock().expect("requests").push(RecordedRequest {
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body.clone(),
    )
}

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

async fn spawn_canned_server(
    status: StatusCode,
    body: impl Into<String>,
) -> (String, Arc<Mutex<Vec<RecordedRequest>>>) {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = CannedServerState {
        requests: requests.clone(),
        status,
        body: body.into(),
    };
    let app = Router::new()
        .route(PARSE_ROUTE, post(canned_reply))
        .with_state(state);
    (serve(app).await, requests)
}

fn handler_for(server_url: &str, page: Arc<RecordingPage>) -> ParseHandler {
    ParseHandler::new(ParseClient::new(server_url).expect("client"), page)
}

#[tokio::test]
async fn handler_posts_sentence_once_and_renders_response() {
    let (server_url, requests) =
        spawn_canned_server(StatusCode::OK, r#"{"tree":"(S (NP hello) (VP world))"}"#).await;
    let page = RecordingPage::new(Some("hello world"));

    handler_for(&server_url, page.clone()).handle().await;

    let requests = requests.lock().expect("requests").clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].body, r#"{"sentence":"hello world"}"#);
    assert_eq!(
        requests[0].content_type.as_deref(),
        Some("application/json")
    );
    assert_eq!(page.result(), r#"{"tree":"(S (NP hello) (VP world))"}"#);
    assert!(page.errors().is_empty());
}

#[tokio::test]
async fn response_is_rendered_verbatim_without_reordering() {
    let (server_url, _requests) =
        spawn_canned_server(StatusCode::OK, "{ \"z\": 1,\n \"a\": [true, null] }").await;
    let page = RecordingPage::new(Some("[1]"));

    handler_for(&server_url, page.clone()).handle().await;

    assert_eq!(page.result(), r#"{"z":1,"a":[true,null]}"#);
}

#[tokio::test]
async fn non_json_body_leaves_result_and_logs_once() {
    let (server_url, requests) = spawn_canned_server(StatusCode::OK, "<html>oops</html>").await;
    let page = RecordingPage::new(Some("[1]"));

    handler_for(&server_url, page.clone()).handle().await;

    assert_eq!(requests.lock().expect("requests").len(), 1);
    assert_eq!(page.result(), "untouched");
    let errors = page.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("not JSON"), "{errors:?}");
}

#[tokio::test]
async fn error_status_leaves_result_and_logs_once() {
    let (server_url, _requests) =
        spawn_canned_server(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":"boom"}"#).await;
    let page = RecordingPage::new(Some("[1]"));

    handler_for(&server_url, page.clone()).handle().await;

    assert_eq!(page.result(), "untouched");
    let errors = page.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("500"), "{errors:?}");
}

#[tokio::test]
async fn network_failure_leaves_result_and_logs_once() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let page = RecordingPage::new(Some("[1]"));

    handler_for(&format!("http://{addr}"), page.clone())
        .handle()
        .await;

    assert_eq!(page.result(), "untouched");
    let errors = page.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Error: request to"), "{errors:?}");
}

#[tokio::test]
async fn missing_input_element_sends_nothing() {
    let (server_url, requests) = spawn_canned_server(StatusCode::OK, "[]").await;
    let page = RecordingPage::new(None);

    handler_for(&server_url, page.clone()).handle().await;

    assert!(requests.lock().expect("requests").is_empty());
    assert_eq!(page.result(), "untouched");
    assert_eq!(page.errors(), vec!["Error: element 'sentenceInput' not found"]);
}

#[test]
fn endpoint_replaces_origin_path() {
    let client = ParseClient::new("http://localhost:5000/app/").expect("client");
    assert_eq!(client.endpoint().as_str(), "http://localhost:5000/parse");

    let err = ParseClient::new("not a url").expect_err("should fail");
    assert!(matches!(err, ClientError::InvalidServerUrl(_)));
}

#[derive(Clone, Default)]
struct GatedServerState {
    gates: Arc<Mutex<HashMap<String, oneshot::Receiver<()>>>>,
}

async fn gated_echo(
    State(state): State<GatedServerState>,
    Json(req): Json<ParseRequest>,
) -> Json<Value> {
    let gate = state.gates.lock().expect("gates").remove(&req.sentence);
    if let Some(gate) = gate {
        let _ = gate.await;
    }
    Json(serde_json::json!({ "echo": req.sentence }))
}

async fn spawn_gated_server(gated: &[&str]) -> (String, Vec<oneshot::Sender<()>>) {
    let state = GatedServerState::default();
    let mut releases = Vec::new();
    for sentence in gated {
        let (release, gate) = oneshot::channel();
        state
            .gates
            .lock()
            .expect("gates")
            .insert(sentence.to_string(), gate);
        releases.push(release);
    }
    let app = Router::new()
        .route(PARSE_ROUTE, post(gated_echo))
        .with_state(state);
    (serve(app).await, releases)
}

#[tokio::test]
async fn trigger_returns_before_response_arrives() {
    let (server_url, mut releases) = spawn_gated_server(&["slow"]).await;
    let page = RecordingPage::new(Some("slow"));
    let handler = handler_for(&server_url, page.clone());

    let pending = handler.trigger();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(page.result(), "untouched");
    assert!(!pending.is_finished());

    releases.remove(0).send(()).expect("release");
    pending.await.expect("join");
    assert_eq!(page.result(), r#"{"echo":"slow"}"#);
}

#[tokio::test]
async fn overlapping_triggers_let_the_later_completion_win() {
    let (server_url, mut releases) = spawn_gated_server(&["first"]).await;
    let page = RecordingPage::new(Some("first"));
    let handler = handler_for(&server_url, page.clone());

    let first = handler.trigger();
    page.form.set_value(SENTENCE_INPUT_ID, "second");
    let second = handler.trigger();

    second.await.expect("join second");
    assert_eq!(page.result(), r#"{"echo":"second"}"#);

    releases.remove(0).send(()).expect("release");
    first.await.expect("join first");
    assert_eq!(page.result(), r#"{"echo":"first"}"#);
    assert!(page.errors().is_empty());
}

#[tokio::test]
async fn deepest_accepted_sentence_renders_in_full() {
    let depth = parser::MAX_NESTING;
    let sentence = format!("{}1{}", "%{a: ".repeat(depth), "}".repeat(depth));
    let items = parser::parse(&sentence).expect("within nesting limit");
    let body = serde_json::to_string(&items).expect("json");
    let (server_url, _requests) = spawn_canned_server(StatusCode::OK, body.clone()).await;
    let page = RecordingPage::new(Some(&sentence));

    handler_for(&server_url, page.clone()).handle().await;

    assert!(page.errors().is_empty(), "{:?}", page.errors());
    assert_eq!(page.result(), body);
}

#[tokio::test]
async fn numbers_are_rendered_with_their_original_text() {
    let body = r#"{"x":1.0,"y":1e2,"big":123456789012345678901234567890,"huge":1e400}"#;
    let (server_url, _requests) = spawn_canned_server(StatusCode::OK, body).await;
    let page = RecordingPage::new(Some("[1]"));

    handler_for(&server_url, page.clone()).handle().await;

    assert!(page.errors().is_empty(), "{:?}", page.errors());
    assert_eq!(page.result(), body);
}

#[tokio::test]
async fn trailing_garbage_after_json_is_a_decode_failure() {
    let (server_url, _requests) = spawn_canned_server(StatusCode::OK, "[1] [2]").await;
    let page = RecordingPage::new(Some("[1]"));

    handler_for(&server_url, page.clone()).handle().await;

    assert_eq!(page.result(), "untouched");
    let errors = page.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("not JSON"), "{errors:?}");
}

#[tokio::test]
async fn missing_result_element_logs_after_the_single_post() {
    let (server_url, requests) = spawn_canned_server(StatusCode::OK, "[]").await;
    let form = FormPage::default();
    form.set_value(SENTENCE_INPUT_ID, "[1]");
    let page = Arc::new(RecordingPage {
        form,
        errors: Mutex::new(Vec::new()),
    });

    handler_for(&server_url, page.clone()).handle().await;

    assert_eq!(requests.lock().expect("requests").len(), 1);
    assert_eq!(page.errors(), vec!["Error: element 'parseResult' not found"]);
    assert_eq!(page.form.text(PARSE_RESULT_ID), None);
}

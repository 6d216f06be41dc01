//! API Server
//!
//! Provides the Edithra HTTP surface. Every route parses its JSON body, calls
//! exactly one service component and wraps the result under a fixed key.
//!
//! # Endpoints
//!
//! - POST /ai/process - Echo an arbitrary JSON body
//! - POST /ai/memory/store, GET /ai/memory/recall - Experience store
//! - POST /ai/decision/analyze, POST /ai/decision/validate - Canned analysis
//! - POST /ai/execute/task, GET /ai/execute/task/:id - Task execution
//! - POST /ai/debug/error, POST /ai/debug/fix - Error log and auto-fix
//! - POST /ai/cloud/suggest, POST /ai/emotion, POST /ai/language - Keyword analyzers
//! - POST /ai/websearch - External search
//! - POST /ai/task/add, POST /ai/task/next, GET /ai/task/list - Priority queue
//! - POST /ai/optimize - Self-optimization counter
//! - POST /ai/learning/track, POST /ai/learning/improve - Outcome tracking
//! - GET /ai/status - Server status
//! - GET / - Dashboard page

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use edithra_engine::memory::DEFAULT_USER;
use edithra_engine::task_queue::DEFAULT_PRIORITY;
use edithra_engine::EdithraService;
use sdk::{EngineError, RequestBody};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

/// Command-line interface
pub mod cli;

/// HTTP error mapping
pub mod error;

pub use error::ApiError;

type ApiResult = Result<Json<Value>, ApiError>;

/// Query parameters for memory recall
#[derive(Debug, Deserialize)]
struct RecallQuery {
    user_id: Option<String>,
}

/// API server
pub struct ApiServer {
    addr: Option<SocketAddr>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    server_task: Option<JoinHandle<()>>,
}

impl ApiServer {
    /// Create a new ApiServer instance
    pub fn new() -> Self {
        Self {
            addr: None,
            shutdown_tx: None,
            server_task: None,
        }
    }

    /// Bind to `bind` (e.g. "0.0.0.0:5000" or "127.0.0.1:0") and start serving
    pub async fn start(
        &mut self,
        service: Arc<EdithraService>,
        bind: &str,
    ) -> Result<SocketAddr, EngineError> {
        if let Some(addr) = self.addr {
            return Err(EngineError::Network(format!(
                "API server already running on {}",
                addr
            )));
        }

        let listener = tokio::net::TcpListener::bind(bind)
            .await
            .map_err(|e| EngineError::Network(format!("Failed to bind to {}: {}", bind, e)))?;

        let addr = listener
            .local_addr()
            .map_err(|e| EngineError::Network(format!("Failed to get local address: {}", e)))?;

        tracing::info!("API server bound to {}", addr);

        let app = router(service);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let server_task = tokio::spawn(async move {
            tracing::info!("API server listening on http://{}", addr);

            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_rx.await.ok();
                    tracing::info!("API server shutting down gracefully");
                })
                .await
                .unwrap_or_else(|e| {
                    tracing::error!("API server error: {}", e);
                });
        });

        self.addr = Some(addr);
        self.shutdown_tx = Some(shutdown_tx);
        self.server_task = Some(server_task);
        Ok(addr)
    }

    /// Address the server is bound to, once started
    pub fn addr(&self) -> Option<SocketAddr> {
        self.addr
    }

    /// Signal graceful shutdown and wait for in-flight requests to finish
    pub async fn stop(&mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            shutdown_tx.send(()).ok();
        }
        if let Some(task) = self.server_task.take() {
            if let Err(e) = task.await {
                tracing::error!("API server task failed: {}", e);
            }
            tracing::info!("API server stopped");
        }
        self.addr = None;
    }
}

impl Default for ApiServer {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the router over a shared service
pub fn router(service: Arc<EdithraService>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/ai/process", post(process_handler))
        .route("/ai/memory/store", post(store_memory_handler))
        .route("/ai/memory/recall", get(recall_memory_handler))
        .route("/ai/decision/analyze", post(analyze_handler))
        .route("/ai/decision/validate", post(validate_handler))
        .route("/ai/execute/task", post(execute_task_handler))
        .route("/ai/execute/task/:id", get(execution_status_handler))
        .route("/ai/debug/error", post(log_error_handler))
        .route("/ai/debug/fix", post(auto_fix_handler))
        .route("/ai/cloud/suggest", post(suggest_api_handler))
        .route("/ai/emotion", post(emotion_handler))
        .route("/ai/language", post(language_handler))
        .route("/ai/websearch", post(websearch_handler))
        .route("/ai/task/add", post(add_task_handler))
        .route("/ai/task/next", post(next_task_handler))
        .route("/ai/task/list", get(list_tasks_handler))
        .route("/ai/optimize", post(optimize_handler))
        .route("/ai/learning/track", post(track_handler))
        .route("/ai/learning/improve", post(improve_handler))
        .route("/ai/status", get(status_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

fn parse_body(payload: Result<Json<Value>, JsonRejection>) -> Result<RequestBody, ApiError> {
    let Json(value) = payload?;
    Ok(RequestBody::from_value(value)?)
}

async fn process_handler(
    State(service): State<Arc<EdithraService>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult {
    let Json(body) = payload?;
    Ok(Json(json!({ "message": service.process(&body) })))
}

async fn store_memory_handler(
    State(service): State<Arc<EdithraService>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult {
    let body = parse_body(payload)?;
    let user_id = body
        .field_str_opt("user_id")?
        .unwrap_or_else(|| DEFAULT_USER.to_string());
    let memory = body.field_json("memory")?.clone();

    let result = service.memory().store(&user_id, memory).await;
    Ok(Json(json!({ "result": result })))
}

async fn recall_memory_handler(
    State(service): State<Arc<EdithraService>>,
    Query(query): Query<RecallQuery>,
) -> Json<Value> {
    let user_id = query.user_id.as_deref().unwrap_or(DEFAULT_USER);
    Json(json!({ "memory": service.memory().recall(user_id).await }))
}

async fn analyze_handler(
    State(service): State<Arc<EdithraService>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult {
    let problem = parse_body(payload)?.field_str("problem")?;
    Ok(Json(
        json!({ "result": service.analyzers().analyze_problem(&problem) }),
    ))
}

async fn validate_handler(
    State(service): State<Arc<EdithraService>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult {
    let solution = parse_body(payload)?.field_str("solution")?;
    Ok(Json(
        json!({ "result": service.analyzers().validate_solution(&solution) }),
    ))
}

async fn execute_task_handler(
    State(service): State<Arc<EdithraService>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult {
    let task = parse_body(payload)?.field_str("task")?;
    let handle = service.executor().execute(&task).await;
    Ok(Json(json!({
        "result": handle.acknowledgement(),
        "execution_id": handle.id(),
    })))
}

async fn execution_status_handler(
    State(service): State<Arc<EdithraService>>,
    Path(id): Path<String>,
) -> ApiResult {
    let record = service.executor().status(&id).await?;
    Ok(Json(json!(record)))
}

async fn log_error_handler(
    State(service): State<Arc<EdithraService>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult {
    let error = parse_body(payload)?.field_str("error")?;
    Ok(Json(
        json!({ "result": service.debugger().log_error(&error).await }),
    ))
}

async fn auto_fix_handler(
    State(service): State<Arc<EdithraService>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult {
    let task = parse_body(payload)?.field_str("task")?;
    Ok(Json(json!({ "result": service.debugger().auto_fix(&task) })))
}

async fn suggest_api_handler(
    State(service): State<Arc<EdithraService>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult {
    let project_type = parse_body(payload)?.field_str("project_type")?;
    Ok(Json(
        json!({ "result": service.analyzers().suggest_api(&project_type) }),
    ))
}

async fn emotion_handler(
    State(service): State<Arc<EdithraService>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult {
    let text = parse_body(payload)?.field_str("text")?;
    Ok(Json(
        json!({ "emotion_response": service.analyzers().detect_emotion(&text) }),
    ))
}

async fn language_handler(
    State(service): State<Arc<EdithraService>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult {
    let text = parse_body(payload)?.field_str("text")?;
    Ok(Json(
        json!({ "language": service.analyzers().detect_language(&text) }),
    ))
}

async fn websearch_handler(
    State(service): State<Arc<EdithraService>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult {
    let query = parse_body(payload)?.field_str("query")?;
    let info = service.web_search(&query).await?;
    Ok(Json(json!({ "info": info })))
}

async fn add_task_handler(
    State(service): State<Arc<EdithraService>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult {
    let body = parse_body(payload)?;
    let task = body.field_str("task")?;
    let priority = body.field_i64_opt("priority")?.unwrap_or(DEFAULT_PRIORITY);

    let status = service.tasks().add(task, priority).await;
    Ok(Json(json!({ "status": status })))
}

async fn next_task_handler(State(service): State<Arc<EdithraService>>) -> Json<Value> {
    Json(json!({ "task": service.tasks().pop_next().await }))
}

async fn list_tasks_handler(State(service): State<Arc<EdithraService>>) -> Json<Value> {
    Json(json!({ "tasks": service.tasks().pending().await }))
}

async fn optimize_handler(State(service): State<Arc<EdithraService>>) -> Json<Value> {
    Json(json!({ "result": service.optimizer().self_optimize() }))
}

async fn track_handler(
    State(service): State<Arc<EdithraService>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult {
    let body = parse_body(payload)?;
    let task = body.field_str("task")?;
    let success = body.field_bool("success")?;

    let result = service.learning().track_performance(&task, success).await;
    Ok(Json(json!({ "result": result })))
}

async fn improve_handler(
    State(service): State<Arc<EdithraService>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult {
    let task = parse_body(payload)?.field_str("task")?;
    Ok(Json(
        json!({ "result": service.learning().improve_decision(&task).await }),
    ))
}

/// Server status API endpoint
async fn status_handler(State(service): State<Arc<EdithraService>>) -> Json<Value> {
    let core = &service.config().core;
    Json(json!({
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
        "ai_mode": core.ai_mode,
        "execution_speed": core.execution_speed,
        "execution_mode": service.executor().mode(),
        "optimization_level": service.optimizer().level(),
    }))
}

/// Dashboard page
async fn index_handler() -> Response {
    let html = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Edithra AI Dashboard</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            max-width: 800px;
            margin: 50px auto;
            padding: 20px;
            background: #f5f5f5;
        }
        .container {
            background: white;
            padding: 30px;
            border-radius: 8px;
        }
        code {
            background: #e9ecef;
            padding: 2px 6px;
            border-radius: 3px;
        }
    </style>
</head>
<body>
    <div class="container">
        <h1>Welcome to Edithra AI</h1>
        <p>Control the AI, see logs, and adjust configurations in real-time.</p>
        <ul>
            <li><code>POST /ai/memory/store</code> and <code>GET /ai/memory/recall</code></li>
            <li><code>POST /ai/task/add</code> and <code>POST /ai/task/next</code></li>
            <li><code>POST /ai/execute/task</code></li>
            <li><code>POST /ai/emotion</code>, <code>POST /ai/cloud/suggest</code></li>
            <li><code>GET /ai/status</code></li>
        </ul>
    </div>
</body>
</html>"#;

    (StatusCode::OK, [("content-type", "text/html")], html).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use edithra_engine::config::Config;
    use edithra_engine::websearch::DisabledSearch;
    use tower::ServiceExt;

    fn app() -> Router {
        let service =
            EdithraService::with_search_provider(Config::default(), Box::new(DisabledSearch))
                .unwrap();
        router(Arc::new(service))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(text) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(text.to_string())
            }
            None => Body::empty(),
        };

        let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_store_then_recall() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/ai/memory/store",
            Some(r#"{"user_id":"u1","memory":"m1"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"result": "Memory Stored: m1"}));

        let (_, body) = send(&app, Method::GET, "/ai/memory/recall?user_id=u1", None).await;
        assert_eq!(body, json!({"memory": "m1"}));
    }

    #[tokio::test]
    async fn test_recall_without_user_uses_default_bucket() {
        let app = app();
        let (_, body) = send(&app, Method::GET, "/ai/memory/recall", None).await;
        assert_eq!(body, json!({"memory": "No Memory Available"}));

        send(&app, Method::POST, "/ai/memory/store", Some(r#"{"memory":"solo"}"#)).await;
        let (_, body) = send(&app, Method::GET, "/ai/memory/recall", None).await;
        assert_eq!(body, json!({"memory": "solo"}));
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let app = app();
        let (status, body) = send(&app, Method::POST, "/ai/emotion", Some("{}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation error: Missing field 'text'");
        assert!(body["hint"].is_string());
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let app = app();
        let (status, body) = send(&app, Method::POST, "/ai/task/add", Some("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Validation error: Invalid JSON body"));
    }

    #[tokio::test]
    async fn test_non_object_body_is_bad_request() {
        let app = app();
        let (status, _) = send(&app, Method::POST, "/ai/decision/analyze", Some("[1]")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_process_accepts_any_json() {
        let app = app();
        let (status, body) = send(&app, Method::POST, "/ai/process", Some("[1,2]")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Processing request: [1,2]"}));
    }

    #[tokio::test]
    async fn test_unknown_execution_is_not_found() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/ai/execute/task/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found: Execution 'nope'");
    }

    #[tokio::test]
    async fn test_task_priority_defaults_to_one() {
        let app = app();
        let (_, body) = send(&app, Method::POST, "/ai/task/add", Some(r#"{"task":"tidy"}"#)).await;
        assert_eq!(body, json!({"status": "Task Added: tidy with priority 1"}));
    }

    #[tokio::test]
    async fn test_wrong_priority_type_is_bad_request() {
        let app = app();
        let (status, _) = send(
            &app,
            Method::POST,
            "/ai/task/add",
            Some(r#"{"task":"tidy","priority":"high"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_status_reports_optimization_level() {
        let app = app();
        send(&app, Method::POST, "/ai/optimize", None).await;
        let (_, body) = send(&app, Method::GET, "/ai/status", None).await;

        assert_eq!(body["status"], "running");
        assert_eq!(body["ai_mode"], "consciousness_enabled");
        assert_eq!(body["execution_mode"], "tracked");
        assert_eq!(body["optimization_level"], 95);
    }
}

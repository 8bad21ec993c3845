//! HTTP transport: JSON-RPC on `/mcp` with session ids and optional SSE framing.

use std::{sync::Arc, time::Duration};

use airtable_mcp::GatewayError;
use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{
        header::{ACCEPT, CACHE_CONTROL, CONNECTION, CONTENT_TYPE},
        HeaderMap, HeaderName, HeaderValue, Method, StatusCode,
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, error, info};

use super::{
    session::SessionStore, tool_descriptor, McpServer, PROTOCOL_VERSION, SERVER_NAME,
    SERVER_VERSION,
};
use crate::config::HttpOptions;

pub const SESSION_HEADER: &str = "mcp-session-id";

const PARSE_ERROR: i64 = -32700;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;
const INTERNAL_ERROR: i64 = -32603;
const SERVER_ERROR: i64 = -32000;

const CORS_MAX_AGE: Duration = Duration::from_secs(86_400);

#[derive(Clone)]
pub struct HttpState {
    server: McpServer,
    sessions: Arc<SessionStore>,
    cors: Option<CorsLayer>,
}

impl HttpState {
    pub fn new(server: McpServer, sessions: Arc<SessionStore>) -> Self {
        Self {
            server,
            sessions,
            cors: None,
        }
    }

    /// Answer browsers from `allowed_origins`: `*` or a comma-separated list.
    #[must_use]
    pub fn with_cors(mut self, allowed_origins: &str) -> Self {
        self.cors = Some(cors_layer(allowed_origins));
        self
    }
}

fn cors_layer(allowed_origins: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(SESSION_HEADER)])
        .max_age(CORS_MAX_AGE);

    if allowed_origins.trim() == "*" {
        return cors.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .filter_map(|o| o.parse().ok())
        .collect();
    cors.allow_origin(origins)
}

#[derive(Debug, Deserialize)]
struct RpcRequest {
    method: String,
    #[serde(default)]
    id: Value,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Default, Deserialize)]
struct CallToolParams {
    name: Option<String>,
    #[serde(default)]
    arguments: Value,
}

#[derive(Debug, Default, Deserialize)]
struct ReadResourceParams {
    uri: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GetPromptParams {
    #[serde(default)]
    name: String,
}

pub fn build_router(state: HttpState) -> Router {
    let mut router = Router::new()
        .route("/", get(health))
        .route("/healthz", get(health))
        .route(
            "/mcp",
            get(describe).post(handle_rpc).delete(close_session),
        )
        .fallback(not_found)
        .layer(middleware::from_fn(options_no_content));
    if let Some(cors) = state.cors.clone() {
        // CorsLayer answers OPTIONS itself; keep the 204 status on its replies.
        router = router
            .layer(cors)
            .layer(middleware::from_fn(options_no_content_status));
    }
    router.layer(TraceLayer::new_for_http()).with_state(state)
}

pub async fn serve_http(
    server: McpServer,
    sessions: Arc<SessionStore>,
    options: HttpOptions,
) -> anyhow::Result<()> {
    let mut state = HttpState::new(server, sessions);
    if options.enable_cors {
        info!(origins = %options.allowed_origins, "CORS enabled");
        state = state.with_cors(&options.allowed_origins);
    }

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", options.port)).await?;
    info!(port = options.port, "HTTP server started with MCP endpoint at /mcp");
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

async fn options_no_content(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::NO_CONTENT.into_response();
    }
    next.run(request).await
}

async fn options_no_content_status(request: Request, next: Next) -> Response {
    let is_options = request.method() == Method::OPTIONS;
    let mut response = next.run(request).await;
    if is_options {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }
    response
}

async fn health() -> &'static str {
    "ok"
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}

async fn describe() -> Response {
    axum::Json(json!({
        "name": SERVER_NAME,
        "version": SERVER_VERSION,
        "protocol": "mcp",
        "capabilities": ["tools", "prompts", "resources"],
    }))
    .into_response()
}

async fn close_session(State(state): State<HttpState>, headers: HeaderMap) -> StatusCode {
    if let Some(id) = session_id(&headers) {
        if state.sessions.remove(id) {
            debug!(session_id = id, "Closed session");
        }
    }
    StatusCode::NO_CONTENT
}

fn session_id(headers: &HeaderMap) -> Option<&str> {
    headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok())
}

fn accepts(accept: &str) -> bool {
    accept.contains("application/json")
        || accept.contains("*/*")
        || accept.contains("text/event-stream")
}

fn wants_sse(accept: &str) -> bool {
    accept.contains("text/event-stream")
}

fn rpc_error(status: StatusCode, code: i64, message: impl Into<String>, id: Value) -> Response {
    (
        status,
        axum::Json(json!({
            "jsonrpc": "2.0",
            "error": {"code": code, "message": message.into()},
            "id": id,
        })),
    )
        .into_response()
}

/// Successful JSON-RPC reply, SSE-framed when the client accepts an event stream.
fn rpc_reply(accept: &str, id: Value, result: Value) -> Response {
    let body = json!({"jsonrpc": "2.0", "result": result, "id": id});
    if wants_sse(accept) {
        let mut response = Response::new(Body::from(format!("data: {body}\n\n")));
        let headers = response.headers_mut();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/event-stream"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        response
    } else {
        axum::Json(body).into_response()
    }
}

fn gateway_rpc_error(err: GatewayError, id: Value) -> Response {
    match err {
        GatewayError::Validation(msg) => rpc_error(StatusCode::BAD_REQUEST, INVALID_PARAMS, msg, id),
        other => {
            error!(error = %other, "Resource request failed");
            rpc_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR,
                other.to_string(),
                id,
            )
        }
    }
}

async fn handle_rpc(State(state): State<HttpState>, headers: HeaderMap, body: Bytes) -> Response {
    let accept = headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    if !accepts(&accept) {
        return rpc_error(
            StatusCode::NOT_ACCEPTABLE,
            SERVER_ERROR,
            "Not Acceptable: Client must accept application/json, text/event-stream, or */*",
            Value::Null,
        );
    }

    let request: RpcRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            error!(error = %e, "Error parsing MCP request");
            return rpc_error(
                StatusCode::BAD_REQUEST,
                PARSE_ERROR,
                "Parse error: Invalid JSON",
                Value::Null,
            );
        }
    };
    debug!(method = %request.method, id = %request.id, accept = %accept, "MCP request received");

    if request.method == "initialize" {
        let session = state.sessions.create();
        let result = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {"listChanged": true},
                "prompts": {"listChanged": true},
                "resources": {"listChanged": true},
            },
            "serverInfo": {"name": SERVER_NAME, "version": SERVER_VERSION},
        });
        let mut response = rpc_reply(&accept, request.id, result);
        if let Ok(value) = HeaderValue::from_str(&session) {
            response.headers_mut().insert(SESSION_HEADER, value);
        }
        return response;
    }

    let known = session_id(&headers).is_some_and(|id| state.sessions.touch(id));
    if !known {
        return rpc_error(
            StatusCode::BAD_REQUEST,
            SERVER_ERROR,
            "Bad Request: No valid session ID provided",
            request.id,
        );
    }

    let RpcRequest { method, id, params } = request;
    match method.as_str() {
        "notifications/initialized" => StatusCode::NO_CONTENT.into_response(),
        "tools/list" => {
            let tools: Vec<Value> = state.server.tools().iter().map(tool_descriptor).collect();
            rpc_reply(&accept, id, json!({ "tools": tools }))
        }
        "tools/call" => {
            let params: CallToolParams = serde_json::from_value(params).unwrap_or_default();
            let Some(name) = params.name else {
                return rpc_error(
                    StatusCode::BAD_REQUEST,
                    INVALID_PARAMS,
                    "Invalid params: missing tool name",
                    id,
                );
            };
            let result = state.server.call_tool(&name, params.arguments).await;
            match serde_json::to_value(&result) {
                Ok(result) => rpc_reply(&accept, id, result),
                Err(e) => rpc_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR,
                    e.to_string(),
                    id,
                ),
            }
        }
        "resources/list" => match state.server.list_resources().await {
            Ok(resources) => rpc_reply(&accept, id, json!({ "resources": resources })),
            Err(e) => gateway_rpc_error(e, id),
        },
        "resources/read" => {
            let params: ReadResourceParams = serde_json::from_value(params).unwrap_or_default();
            let uri = params.uri.unwrap_or_default();
            match state.server.read_resource(&uri).await {
                Ok(content) => rpc_reply(&accept, id, json!({ "contents": [content] })),
                Err(e) => gateway_rpc_error(e, id),
            }
        }
        "prompts/list" => rpc_reply(&accept, id, json!({ "prompts": [] })),
        "prompts/get" => {
            let params: GetPromptParams = serde_json::from_value(params).unwrap_or_default();
            rpc_error(
                StatusCode::NOT_FOUND,
                METHOD_NOT_FOUND,
                format!("Prompt not found: {}", params.name),
                id,
            )
        }
        other => rpc_error(
            StatusCode::BAD_REQUEST,
            METHOD_NOT_FOUND,
            format!("Method not found: {other}"),
            id,
        ),
    }
}

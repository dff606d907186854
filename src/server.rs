use crate::config::BridgeConfig;
use crate::logging::{LogLevel, SharedLogger};
use crate::models;
use crate::proxy;
use crate::translate::responses_types::{ResponsesErrorResponse, ResponsesRequest};

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: BridgeConfig,
    pub client: reqwest::Client,
    pub logger: SharedLogger,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/v1/responses", post(handle_responses))
        .route("/v1/models", get(handle_models))
        .route("/v1/logs", get(handle_logs))
        .route("/health", get(handle_health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle_responses(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let req: ResponsesRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            state
                .logger
                .error("server", format!("Failed to parse request: {e}"));
            let err = ResponsesErrorResponse::invalid_request(format!("Invalid request body: {e}"));
            return (StatusCode::BAD_REQUEST, Json(err)).into_response();
        }
    };

    let is_streaming = req.stream.unwrap_or(false);

    state.logger.info(
        "server",
        format!(
            "Request: model={} streaming={}",
            req.model.as_deref().unwrap_or("<default>"),
            is_streaming
        ),
    );

    if is_streaming {
        handle_streaming(&state, &req).await
    } else {
        handle_non_streaming(&state, &req).await
    }
}

async fn handle_non_streaming(state: &AppState, req: &ResponsesRequest) -> Response {
    match proxy::proxy_non_streaming(req, &state.config, &state.client, &state.logger).await {
        Ok(proxy::ProxyResult::Success(resp)) => Json(resp).into_response(),
        Ok(proxy::ProxyResult::Error(err, status_code)) => {
            let status = StatusCode::from_u16(status_code).unwrap_or(StatusCode::BAD_GATEWAY);
            (status, Json(err)).into_response()
        }
        Err(e) => {
            state.logger.error("server", format!("Proxy error: {e}"));
            let err = ResponsesErrorResponse::api_error(format!("Proxy error: {e}"));
            (StatusCode::BAD_GATEWAY, Json(err)).into_response()
        }
    }
}

async fn handle_streaming(state: &AppState, req: &ResponsesRequest) -> Response {
    let sse_stream =
        match proxy::proxy_streaming(req, &state.config, &state.client, &state.logger).await {
            Ok(s) => s,
            Err(e) => {
                state
                    .logger
                    .error("server", format!("Streaming setup error: {e}"));
                let err = ResponsesErrorResponse::api_error(format!("Streaming error: {e}"));
                return (StatusCode::BAD_GATEWAY, Json(err)).into_response();
            }
        };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .body(Body::from_stream(sse_stream))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

async fn handle_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn handle_models(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let upstream = match models::fetch_upstream_models(&state.config, &state.client).await {
        Ok(ids) => ids,
        Err(e) => {
            state
                .logger
                .warn("models", format!("Listing configured aliases only: {e}"));
            Vec::new()
        }
    };

    let data = models::merge_model_list(&state.config, &upstream);
    Json(serde_json::json!({ "object": "list", "data": data }))
}

#[derive(Debug, Deserialize)]
struct LogsQuery {
    limit: Option<usize>,
    level: Option<String>,
}

async fn handle_logs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LogsQuery>,
) -> Json<serde_json::Value> {
    let limit = query.limit.unwrap_or(100);
    let min_level = query
        .level
        .as_deref()
        .and_then(LogLevel::parse)
        .unwrap_or(LogLevel::Debug);

    let entries = state.logger.recent(limit, min_level);
    Json(serde_json::json!({ "count": entries.len(), "entries": entries }))
}

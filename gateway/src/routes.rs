use std::sync::Arc;

use anyhow::anyhow;
use axum::body::{to_bytes, Body};
use axum::extract::State;
use axum::middleware;
use axum::routing::{get, post};
use axum::{Json, Router};
use gomoku::RequestPayload;
use model::{Load, ModelConfigKey};
use serde_json::{json, Value};

use super::{access_log, require_bearer, BearerAuth, Gateway, GatewayError, InferenceResult, Search};

pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Builds the service. Every request passes the access log and then the bearer check before
/// it reaches a route, unknown paths included.
pub fn router<L, S>(gateway: Arc<Gateway<L, S>>) -> Router
where
    L: Load<MR = ModelConfigKey> + Send + Sync + 'static,
    L::M: Send + Sync + 'static,
    S: Search<Model = L::M> + Send + Sync + 'static,
{
    let auth = BearerAuth::new(gateway.options().api_token.clone());

    Router::new()
        .route("/health", get(health).fallback(not_found))
        .route("/schema", get(schema).fallback(not_found))
        .route("/infer", post(infer::<L, S>).fallback(not_found))
        .fallback(not_found)
        .with_state(gateway)
        .layer(middleware::from_fn_with_state(auth, require_bearer))
        .layer(middleware::from_fn(access_log))
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

async fn schema() -> Json<RequestPayload> {
    Json(RequestPayload::example())
}

async fn not_found() -> GatewayError {
    GatewayError::NotFound
}

async fn infer<L, S>(
    State(gateway): State<Arc<Gateway<L, S>>>,
    body: Body,
) -> Result<Json<InferenceResult>, GatewayError>
where
    L: Load<MR = ModelConfigKey> + Send + Sync + 'static,
    L::M: Send + Sync + 'static,
    S: Search<Model = L::M> + Send + Sync + 'static,
{
    let bytes = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|err| GatewayError::Body(err.to_string()))?;

    let payload = parse_payload(&bytes)?;

    let result = tokio::task::spawn_blocking(move || gateway.infer(&payload))
        .await
        .map_err(|err| GatewayError::Inference(anyhow!("Inference task failed: {}", err)))??;

    Ok(Json(result))
}

/// An empty body is read as `{}`.
pub fn parse_payload(bytes: &[u8]) -> Result<RequestPayload, GatewayError> {
    let bytes = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"{}".as_slice()
    } else {
        bytes
    };

    Ok(serde_json::from_slice(bytes)?)
}

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use gomoku::BoardError;
use log::error;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    #[error("invalid body: {0}")]
    Body(String),
    #[error("invalid json: {0}")]
    InvalidJson(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("model load failed: {0:#}")]
    ModelLoad(anyhow::Error),
    #[error("inference failed: {0:#}")]
    Inference(anyhow::Error),
    #[error("board is full")]
    BoardFull,
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Unauthorized => StatusCode::UNAUTHORIZED,
            GatewayError::NotFound => StatusCode::NOT_FOUND,
            GatewayError::Body(_) | GatewayError::InvalidJson(_) | GatewayError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::ModelLoad(_) | GatewayError::Inference(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            GatewayError::BoardFull => StatusCode::OK,
        }
    }

    pub fn body(&self) -> serde_json::Value {
        match self {
            GatewayError::Unauthorized => json!({"error": "unauthorized"}),
            GatewayError::NotFound => json!({"error": "not found"}),
            GatewayError::Body(detail) => json!({"error": "invalid body", "detail": detail}),
            GatewayError::InvalidJson(detail) => json!({"error": "invalid json", "detail": detail}),
            GatewayError::InvalidRequest(detail) => {
                json!({"error": "invalid request", "detail": detail})
            }
            GatewayError::ModelLoad(err) | GatewayError::Inference(err) => {
                json!({"error": "infer failed", "detail": format!("{:#}", err)})
            }
            GatewayError::BoardFull => json!({"error": "board is full"}),
        }
    }
}

impl From<BoardError> for GatewayError {
    fn from(err: BoardError) -> Self {
        GatewayError::InvalidRequest(err.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;

        match err.classify() {
            Category::Syntax | Category::Eof => GatewayError::InvalidJson(err.to_string()),
            Category::Data | Category::Io => GatewayError::InvalidRequest(err.to_string()),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!("{:?}", self);
        }

        let mut response = (status, Json(self.body())).into_response();

        if let GatewayError::Unauthorized = self {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }

        response
    }
}

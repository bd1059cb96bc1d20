use std::fmt::{self, Display, Formatter};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::anyhow;
use axum::body::{to_bytes, Body, HttpBody};
use axum::extract::{ConnectInfo, Request};
use axum::http::{header, HeaderMap, Method, StatusCode, Version};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use futures::TryStreamExt;
use log::info;

use super::GatewayError;

/// One line of the access log. The timestamp comes from the log formatter.
#[derive(Debug)]
pub struct AccessRecord {
    pub client: Option<SocketAddr>,
    pub method: Method,
    pub target: String,
    pub version: Version,
    pub status: StatusCode,
    pub bytes_in: u64,
    pub bytes_out: usize,
    pub elapsed: Duration,
}

impl Display for AccessRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.client {
            Some(client) => write!(f, "{}", client)?,
            None => write!(f, "-")?,
        }

        write!(
            f,
            " \"{} {} {:?}\" {} {} {} {:.1}ms",
            self.method,
            self.target,
            self.version,
            self.status.as_u16(),
            self.bytes_in,
            self.bytes_out,
            self.elapsed.as_secs_f64() * 1000.0
        )
    }
}

/// Logs exactly one line per request on the `access` target, whatever the outcome.
pub async fn access_log(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let method = request.method().clone();
    let target = request
        .uri()
        .path_and_query()
        .map(|p| p.to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let version = request.version();
    let declared =
        content_length(request.headers()).or_else(|| request.body().size_hint().exact());

    let read = Arc::new(AtomicU64::new(0));
    let request = count_body(request, read.clone());

    let response = next.run(request).await;
    let bytes_in = read.load(Ordering::Relaxed).max(declared.unwrap_or(0));
    let (parts, body) = response.into_parts();

    let (response, bytes_out) = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => {
            let bytes_out = bytes.len();
            (Response::from_parts(parts, Body::from(bytes)), bytes_out)
        }
        Err(err) => {
            let response =
                GatewayError::Inference(anyhow!("Failed to buffer response body: {}", err))
                    .into_response();
            (response, 0)
        }
    };

    info!(
        target: "access",
        "{}",
        AccessRecord {
            client,
            method,
            target,
            version,
            status: response.status(),
            bytes_in,
            bytes_out,
            elapsed: start.elapsed(),
        }
    );

    response
}

/// Routes the request body through a counter so chunked bodies are measured as they are read.
fn count_body(request: Request, read: Arc<AtomicU64>) -> Request {
    let (parts, body) = request.into_parts();
    let stream = body.into_data_stream().inspect_ok(move |chunk| {
        read.fetch_add(chunk.len() as u64, Ordering::Relaxed);
    });

    Request::from_parts(parts, Body::from_stream(stream))
}

fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

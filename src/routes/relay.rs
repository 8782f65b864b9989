use async_stream::stream;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::StreamExt;
use tokio_util::io::{ReaderStream, StreamReader};

use crate::AppState;

// Re-export reqwest header module to avoid version conflicts
mod reqwest_header {
    pub use reqwest::header::{CONTENT_TYPE, REFERER, USER_AGENT};
}

/// Chunk size for relaying upstream bodies.
const RELAY_CHUNK_SIZE: usize = 16 * 1024;

/// Guess content type from URL
fn guess_content_type(url: &str) -> &'static str {
    let lower = url.to_lowercase();
    if lower.contains(".m3u8") {
        "application/vnd.apple.mpegurl"
    } else if lower.contains(".mp4") {
        "video/mp4"
    } else {
        "video/MP2T"
    }
}

fn error_response(status: StatusCode, message: &str) -> (StatusCode, Json<serde_json::Value>) {
    (status, Json(serde_json::json!({ "error": message })))
}

/// GET /stream/:id
///
/// Relays a guarded channel's upstream stream to the client. The upstream
/// request imitates a browser (User-Agent plus a Referer pointing at the
/// stream itself) because these origins reject plain server-to-server
/// requests. The body is forwarded in fixed-size chunks without ever being
/// buffered whole; if the upstream drops mid-stream the client stream ends
/// early, with no retry.
pub async fn relay_stream(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Response, (StatusCode, Json<serde_json::Value>)> {
    let snapshot = state.registry.current();

    // Unknown id is a distinct not-found result, reported before any network
    // activity happens.
    let channel = snapshot
        .channel_by_id(id)
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, "channel not found"))?;

    let upstream_response = state
        .relay_client
        .get(&channel.original_url)
        .header(reqwest_header::USER_AGENT, &state.config.user_agent)
        .header(reqwest_header::REFERER, &channel.original_url)
        .send()
        .await
        .map_err(|e| {
            tracing::warn!("Relay upstream error for channel {}: {}", id, e);
            let status = if e.is_timeout() {
                StatusCode::GATEWAY_TIMEOUT
            } else {
                StatusCode::BAD_GATEWAY
            };
            error_response(status, "upstream connection failed")
        })?;

    let upstream_status = upstream_response.status();
    if !upstream_status.is_success() {
        tracing::warn!(
            "Relay upstream returned {} for channel {}",
            upstream_status,
            id
        );
        return Err(error_response(
            StatusCode::BAD_GATEWAY,
            "upstream refused the stream",
        ));
    }

    // Content type from upstream, falling back to a guess from the URL
    let content_type = upstream_response
        .headers()
        .get(reqwest_header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| guess_content_type(&channel.original_url).to_string());

    // Re-chunk the upstream body into fixed-size pieces and bound each read
    // with a deadline; a stalled upstream ends the relay instead of pinning
    // the connection forever.
    let read_timeout = Duration::from_millis(state.config.relay_read_timeout_ms);
    let upstream_bytes = upstream_response
        .bytes_stream()
        .map(|result| result.map_err(|e| io::Error::new(io::ErrorKind::Other, e)));
    let mut chunks =
        ReaderStream::with_capacity(StreamReader::new(upstream_bytes), RELAY_CHUNK_SIZE);

    let body_stream = stream! {
        loop {
            match tokio::time::timeout(read_timeout, chunks.next()).await {
                Ok(Some(Ok(chunk))) => yield Ok::<_, io::Error>(chunk),
                Ok(Some(Err(e))) => {
                    tracing::warn!("Relay stream interrupted for channel {}: {}", id, e);
                    yield Err(e);
                    break;
                }
                Ok(None) => break,
                Err(_) => {
                    tracing::warn!("Relay upstream read timed out for channel {}", id);
                    yield Err(io::Error::new(io::ErrorKind::TimedOut, "upstream read timed out"));
                    break;
                }
            }
        }
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CACHE_CONTROL, "no-store")
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .body(Body::from_stream(body_stream))
        .map_err(|e| {
            tracing::error!("Failed to build relay response: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        })
}

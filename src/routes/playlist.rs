use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use std::fmt::Write;
use std::sync::Arc;

use crate::services::publisher::render_playlist;
use crate::AppState;

/// GET /playlist.m3u - the unified playlist
pub async fn playlist(State(state): State<Arc<AppState>>) -> Response {
    let snapshot = state.registry.current();
    let body = render_playlist(&snapshot, &state.config.base_url);

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "audio/x-mpegurl")],
        body,
    )
        .into_response()
}

/// GET /epg.xml - placeholder program guide (empty XMLTV document)
pub async fn epg() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/xml")],
        "<?xml version=\"1.0\" encoding=\"UTF-8\" ?><tv></tv>",
    )
        .into_response()
}

/// GET /ui - minimal HTML channel listing
pub async fn ui(State(state): State<Arc<AppState>>) -> Html<String> {
    let snapshot = state.registry.current();

    let mut html = String::from("<h1>DaddyHub IPTV</h1><ul>");
    for ch in &snapshot.channels {
        let play_url = if ch.requires_relay {
            format!("{}/stream/{}", state.config.base_url, ch.id)
        } else {
            ch.original_url.clone()
        };
        let _ = write!(
            html,
            "<li><img src=\"{}\" width=\"30\"> {} - <a href=\"{}\">Play</a></li>",
            ch.logo, ch.display_name, play_url
        );
    }
    html.push_str("</ul>");

    Html(html)
}

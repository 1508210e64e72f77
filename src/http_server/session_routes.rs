//! Session WebSocket Route
//!
//! `GET /ws` upgrades a foreground session. The session's current domain is
//! the Host it connected through, unless the server pins one.
//!
//! Everything a session receives, broadcasts and replies alike, goes through
//! its hub channel, so it arrives in the order it was produced.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::{header::HOST, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use futures_util::{SinkExt, StreamExt};
use uuid::Uuid;

use super::config_routes::ErrorResponse;
use super::server::AppState;
use crate::failover::{FailoverError, InboundMessage, OutboundMessage};
use crate::observability::{log_event_with_fields, Event};

pub fn session_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(websocket_handler))
        .with_state(state)
}

/// Current domain for a session connecting with `headers`
pub fn current_domain(state: &AppState, headers: &HeaderMap) -> Option<String> {
    state.current_domain.clone().or_else(|| {
        headers
            .get(HOST)
            .and_then(|h| h.to_str().ok())
            .filter(|h| !h.is_empty())
            .map(str::to_string)
    })
}

async fn websocket_handler(
    ws: WebSocketUpgrade,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let Some(domain) = current_domain(&state, &headers) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Cannot determine current domain: no Host header".to_string(),
                code: "SWITCHER_MISSING_HOST".to_string(),
            }),
        )
            .into_response();
    };

    ws.on_upgrade(move |socket| handle_session(socket, state, domain))
}

async fn handle_session(socket: WebSocket, state: Arc<AppState>, current_domain: String) {
    let engine = state.engine.clone();
    let hub = engine.hub().clone();

    let session_id = Uuid::new_v4().to_string();
    let mut outbound = hub.connect(session_id.clone());
    engine.metrics().increment_sessions_opened();
    log_event_with_fields(
        Event::SessionConnected,
        &[("session", &session_id), ("domain", &current_domain)],
    );

    let (mut sender, mut receiver) = socket.split();

    // Writer: drains the hub channel until the session is disconnected
    let writer = tokio::spawn(async move {
        while let Some(message) = outbound.recv().await {
            let Ok(json) = message.to_json() else {
                continue;
            };
            if sender.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Text(text)) => match InboundMessage::parse(&text) {
                Ok(message) => {
                    let engine = engine.clone();
                    let session_id = session_id.clone();
                    let domain = current_domain.clone();
                    tokio::spawn(async move {
                        engine.handle(&session_id, &domain, message).await;
                    });
                }
                Err(e) => reject(&state, &session_id, &e),
            },
            Ok(Message::Binary(_)) => reject(
                &state,
                &session_id,
                &FailoverError::InvalidMessage("binary frames are not supported".into()),
            ),
            Ok(Message::Close(_)) | Err(_) => break,
            _ => {}
        }
    }

    hub.disconnect(&session_id);
    writer.abort();
    log_event_with_fields(Event::SessionClosed, &[("session", &session_id)]);
}

fn reject(state: &AppState, session_id: &str, err: &FailoverError) {
    log_event_with_fields(
        Event::SessionRejected,
        &[("session", session_id), ("code", err.code())],
    );
    let _ = state
        .engine
        .hub()
        .send_to(session_id, OutboundMessage::error(err));
}

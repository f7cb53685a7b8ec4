//! Axum HTTP + WebSocket server exposing the azner-core recognizer

mod config;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{
        rejection::JsonRejection,
        ws::{Message, WebSocket, WebSocketUpgrade},
        DefaultBodyLimit, State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::{get, post},
    Router,
};
use azner_core::{corpus::demo_texts, Entity, EntityType, Recognizer, RecognizerEvent};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

/// Shared application state
struct AppState {
    recognizer: Recognizer,
    config: ServerConfig,
}

#[derive(Deserialize)]
struct RecognizeRequest {
    text: String,
    /// Restricts the response to these types; resolution itself is unchanged.
    #[serde(default)]
    types: Option<Vec<EntityType>>,
}

/// WebSocket message received from the client
#[derive(Deserialize)]
struct WsRequest {
    text: String,
}

#[derive(Serialize)]
struct RecognizeResponse {
    entities: Vec<Entity>,
    total: usize,
    processing_us: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .with_context(|| format!("invalid log filter {:?}", config.log_filter))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let addr = config.addr;
    let state = Arc::new(AppState {
        recognizer: Recognizer::new(),
        config,
    });

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("azner server listening on http://{}", addr);
    axum::serve(listener, app(state)).await?;
    Ok(())
}

fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // JSON escaping can inflate text up to 6x (\uXXXX)
    let body_limit = state
        .config
        .max_text_bytes
        .saturating_mul(6)
        .saturating_add(4096);

    Router::new()
        .route("/", get(index_handler))
        .route("/recognize", post(recognize_handler))
        .route("/ws", get(ws_handler))
        .route("/demo-texts", get(demo_texts_handler))
        .route("/health", get(|| async { "ok" }))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .with_state(state)
}

fn error_response(status: StatusCode, message: &str) -> axum::response::Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// Main HTML page
async fn index_handler() -> impl IntoResponse {
    Html(include_str!("templates/index.html"))
}

/// One-shot recognition over HTTP POST
async fn recognize_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RecognizeRequest>, JsonRejection>,
) -> impl IntoResponse {
    // Body-limit, content-type and syntax errors keep the JSON error shape
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            warn!("recognize request rejected: {}", rejection.body_text());
            return error_response(rejection.status(), &rejection.body_text());
        }
    };
    if req.text.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "empty text");
    }
    if req.text.len() > state.config.max_text_bytes {
        return error_response(
            StatusCode::PAYLOAD_TOO_LARGE,
            &format!("text exceeds {} bytes", state.config.max_text_bytes),
        );
    }

    info!("recognize: {} bytes", req.text.len());
    let started = std::time::Instant::now();
    let mut entities = state.recognizer.recognize(&req.text);
    if let Some(types) = &req.types {
        entities.retain(|e| types.contains(&e.entity_type));
    }

    Json(RecognizeResponse {
        total: entities.len(),
        entities,
        processing_us: started.elapsed().as_micros() as u64,
    })
    .into_response()
}

/// Demonstration texts
async fn demo_texts_handler() -> impl IntoResponse {
    let texts: Vec<serde_json::Value> = demo_texts()
        .iter()
        .map(|(domain, text)| {
            serde_json::json!({
                "domain": domain,
                "text": text
            })
        })
        .collect();
    Json(texts)
}

/// HTTP → WebSocket upgrade
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

/// Receives text, runs the recognizer and replays its events one by one
async fn handle_websocket(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket connected");

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => {
                // JSON {text} or plain text
                let text = match serde_json::from_str::<WsRequest>(&text) {
                    Ok(req) => req.text,
                    Err(_) => text.to_string(),
                };
                if text.trim().is_empty() {
                    continue;
                }
                if text.len() > state.config.max_text_bytes {
                    warn!("WebSocket text rejected: {} bytes", text.len());
                    let error = serde_json::json!({ "type": "Error", "data": { "message": "text too large" } });
                    if socket.send(Message::Text(error.to_string().into())).await.is_err() {
                        break;
                    }
                    continue;
                }

                info!("recognize via WebSocket: {} bytes", text.len());

                let worker_state = Arc::clone(&state);
                let events: Vec<RecognizerEvent> =
                    match tokio::task::spawn_blocking(move || worker_state.recognizer.trace(&text)).await {
                        Ok(events) => events,
                        Err(e) => {
                            warn!("recognizer task failed: {}", e);
                            continue;
                        }
                    };

                if !replay_events(&mut socket, &events, &state).await {
                    break; // client went away
                }
            }
            Message::Close(_) => break,
            Message::Ping(payload) => {
                let _ = socket.send(Message::Pong(payload)).await;
            }
            _ => {}
        }
    }

    info!("WebSocket disconnected");
}

/// Sends each event as a text frame. False once the client is gone.
async fn replay_events(socket: &mut WebSocket, events: &[RecognizerEvent], state: &AppState) -> bool {
    for event in events {
        if let Ok(json) = serde_json::to_string(event) {
            if socket.send(Message::Text(json.into())).await.is_err() {
                return false;
            }
            if !state.config.event_delay.is_zero() {
                tokio::time::sleep(state.config.event_delay).await;
            }
        }
    }
    true
}

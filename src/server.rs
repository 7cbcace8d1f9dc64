//! HTTP transport for the dispatcher
//!
//! A thin axum layer around [`Dispatcher::handle_message`]: `GET /` serves
//! the embedded single-page chat UI and `POST /chat` exchanges JSON
//! messages. The dispatcher never throws to this layer, so the chat route
//! always answers 200 with a reply string.

use axum::extract::State;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::ServerConfig;
use crate::dispatch::Dispatcher;
use crate::error::{CogitoError, Result};

/// Embedded chat UI
const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Request body for `POST /chat`
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user's message; missing or blank yields a placeholder reply
    #[serde(default)]
    pub message: String,
}

/// Response body for `POST /chat`
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// The bot's reply text
    pub response: String,
}

/// Build the application router
pub fn router(dispatcher: Arc<Dispatcher>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/chat", post(chat))
        .with_state(dispatcher)
}

/// Serve the chat UI
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Handle a chat message from the client
///
/// Expects JSON like `{"message": "hello"}` and returns JSON
/// `{"response": "..."}`.
async fn chat(
    State(dispatcher): State<Arc<Dispatcher>>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let message = request.message.trim().to_string();
    if message.is_empty() {
        return Json(ChatResponse {
            response: "Please provide a message.".to_string(),
        });
    }

    // The dispatcher does synchronous SQLite IO; keep it off the async
    // worker threads.
    let response = tokio::task::spawn_blocking(move || dispatcher.handle_message(&message))
        .await
        .unwrap_or_else(|err| {
            tracing::error!(%err, "chat handler task failed");
            "Something went wrong handling that message.".to_string()
        });

    Json(ChatResponse { response })
}

/// Bind and run the HTTP server until the process is stopped
///
/// # Arguments
///
/// * `config` - Bind host and port
/// * `dispatcher` - The shared dispatch layer
///
/// # Errors
///
/// Returns [`CogitoError::Server`] if the address cannot be bound or the
/// server exits with an error.
pub async fn serve(config: &ServerConfig, dispatcher: Dispatcher) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| CogitoError::Server(format!("failed to bind {}: {}", addr, e)))?;

    tracing::info!("listening on http://{}", addr);

    axum::serve(listener, router(dispatcher.into()))
        .await
        .map_err(|e| CogitoError::Server(e.to_string()))?;

    Ok(())
}

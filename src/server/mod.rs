//! Web console and JSON API.
//!
//! Routes:
//! - `GET /` - embedded console page
//! - `POST /api/ask` - run the pipeline for a question
//! - `GET /api/schema` - rendered catalog snapshot

mod page;

use crate::pipeline::{Exchange, Pipeline};
use crate::types::{ChatError, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Shared state for the console API.
#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<Pipeline>,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
struct SchemaBody {
    schema: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

/// Build the console router.
pub fn build_router(pipeline: Arc<Pipeline>) -> Router {
    Router::new()
        .route("/", get(console_page))
        .route("/api/ask", post(ask))
        .route("/api/schema", get(schema))
        .with_state(AppState { pipeline })
}

/// Bind and serve the console until the process exits.
///
/// # Errors
///
/// Returns `ChatError::Io` if binding or serving fails.
pub async fn serve(pipeline: Arc<Pipeline>, host: &str, port: u16) -> Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(addr = %addr, "web console listening");

    axum::serve(listener, build_router(pipeline)).await?;
    Ok(())
}

async fn console_page() -> Html<&'static str> {
    Html(page::CONSOLE_HTML)
}

async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> std::result::Result<Json<Exchange>, ApiError> {
    let question = request.question.trim();
    if question.is_empty() {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "question must not be empty",
        ));
    }

    state
        .pipeline
        .ask(question)
        .await
        .map(Json)
        .map_err(|e| error_response(status_for(&e), &e.to_string()))
}

async fn schema(State(state): State<AppState>) -> std::result::Result<Json<SchemaBody>, ApiError> {
    state
        .pipeline
        .schema_text()
        .await
        .map(|schema| Json(SchemaBody { schema }))
        .map_err(|e| error_response(status_for(&e), &e.to_string()))
}

fn error_response(status: StatusCode, message: &str) -> ApiError {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
}

/// Map the error taxonomy onto HTTP statuses.
fn status_for(error: &ChatError) -> StatusCode {
    match error {
        ChatError::RejectedQuery(_) | ChatError::SqlExecution(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ChatError::Llm(_) | ChatError::Embedding(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&ChatError::RejectedQuery("DROP".to_string())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(&ChatError::Llm("down".to_string())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&ChatError::Connection("refused".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

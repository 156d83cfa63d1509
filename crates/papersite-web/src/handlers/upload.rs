use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tokio::sync::AcquireError;
use tokio::task::JoinError;

use papersite_ingest::{IngestError, PARSE_FAILURE_MESSAGE, StructuredDocument};

use crate::models::{ErrorResponse, NO_FILE_MESSAGE, UNEXPECTED_ERROR_MESSAGE};
use crate::state::AppState;
use crate::upload::{UploadedFile, read_file_field};

#[derive(Error, Debug)]
enum DecodeFailure {
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error("decoding exceeded {0:?}")]
    Timeout(Duration),
    #[error("decode task failed: {0}")]
    Join(#[from] JoinError),
    #[error("decode queue closed")]
    Closed(#[from] AcquireError),
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

/// `POST /api/upload`: validate, decode, and structure one uploaded paper.
pub async fn upload(State(state): State<Arc<AppState>>, multipart: Multipart) -> Response {
    let file = match read_file_field(multipart).await {
        Ok(Some(file)) => file,
        Ok(None) => return error_response(StatusCode::BAD_REQUEST, NO_FILE_MESSAGE),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read multipart upload");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED_ERROR_MESSAGE);
        }
    };

    tracing::info!(
        file_name = %file.filename,
        size = file.data.len(),
        content_type = ?file.content_type,
        "upload received"
    );

    match decode(&state, file).await {
        Ok(doc) => Json(doc).into_response(),
        Err(DecodeFailure::Ingest(e)) if e.is_client_error() => {
            error_response(StatusCode::BAD_REQUEST, e.user_message())
        }
        Err(e @ DecodeFailure::Closed(_)) => {
            tracing::warn!(error = %e, "upload aborted");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED_ERROR_MESSAGE)
        }
        Err(e) => {
            tracing::warn!(error = %e, "parse error");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, PARSE_FAILURE_MESSAGE)
        }
    }
}

/// Run the blocking decode on the blocking pool, holding a permit for as long
/// as the decoder runs (even past a timeout).
async fn decode(state: &AppState, file: UploadedFile) -> Result<StructuredDocument, DecodeFailure> {
    let permit = state.decode_permits.clone().acquire_owned().await?;
    let ingestor = state.ingestor.clone();

    let task = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        ingestor.parse_bytes(&file.data, &file.filename, file.content_type.as_deref())
    });

    match tokio::time::timeout(state.decode_timeout, task).await {
        Ok(joined) => Ok(joined??),
        Err(_) => Err(DecodeFailure::Timeout(state.decode_timeout)),
    }
}

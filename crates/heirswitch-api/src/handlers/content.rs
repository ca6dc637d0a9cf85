//! Content Handlers
//!
//! Raw blob upload and download. The service never inspects the bytes; the
//! owner encrypts before upload.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use heirswitch_types::DataPointer;
use std::sync::Arc;

use crate::dto::UploadResponse;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub async fn upload(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    let size = body.len();
    let cid = state.content.upload(body.to_vec()).await?;
    Ok((StatusCode::CREATED, Json(UploadResponse { cid, size })))
}

pub async fn fetch(
    State(state): State<Arc<AppState>>,
    Path(cid): Path<String>,
) -> ApiResult<impl IntoResponse> {
    if cid.trim().is_empty() {
        return Err(ApiError::InvalidParameter("cid".to_string()));
    }
    let blob = state.content.fetch(&DataPointer::new(cid)).await?;
    Ok(([(header::CONTENT_TYPE, "application/octet-stream")], blob))
}

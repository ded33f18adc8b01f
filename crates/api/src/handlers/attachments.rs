//! Handlers for the admin `/admin/attachments` resource.
//!
//! Uploads are written to [`LocalStorage`](crate::storage::LocalStorage)
//! first and recorded second; deletes remove the file first and the row
//! second, so a row never points at a file that was never written.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use matuto_core::article::normalize_ids;
use matuto_core::attach::{storage_path, validate_upload, AttachKind};
use matuto_core::error::CoreError;
use matuto_core::types::DbId;
use matuto_db::models::attach::{Attach, AttachQuery, BatchDeleteAttach, CreateAttach};
use matuto_db::repositories::AttachRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{AffectedResponse, DataResponse};
use crate::state::AppState;

/// GET /api/v1/admin/attachments
///
/// Paged list filtered by filename keyword and kind.
pub async fn list_attachments(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<AttachQuery>,
) -> AppResult<impl IntoResponse> {
    let pagination = params.page_request().validate()?;
    if let Some(kind) = params.kind.as_deref().filter(|k| !k.is_empty()) {
        AttachKind::try_from(kind)?;
    }

    let base_url = &state.config.storage.base_url;
    let page = AttachRepo::list_page(&state.pool, &params, pagination)
        .await?
        .map(|a| a.with_url(base_url));
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/admin/attachments/{id}
pub async fn get_attachment(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let attach = find_attach(&state, id).await?;
    Ok(Json(DataResponse {
        data: attach.with_url(&state.config.storage.base_url),
    }))
}

/// POST /api/v1/admin/attachments
///
/// Multipart upload with a required `file` field and an optional `remark`
/// field. The file lands under a per-day directory of the storage root.
pub async fn upload_attachment(
    auth: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut file: Option<(String, Option<String>, Vec<u8>)> = None;
    let mut remark: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let mime_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file = Some((filename, mime_type, data.to_vec()));
            }
            "remark" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                remark = Some(text.trim().to_string()).filter(|r| !r.is_empty());
            }
            _ => {}
        }
    }

    let (filename, mime_type, data) =
        file.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    validate_upload(&filename, data.len() as u64, state.config.storage.max_size_bytes)?;

    let kind = AttachKind::detect(mime_type.as_deref(), &filename);
    let path = storage_path(&filename, Utc::now());

    state
        .storage
        .save(&path, &data)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store '{path}': {e}")))?;

    let input = CreateAttach {
        uploaded_by: Some(auth.user_id),
        name: filename,
        path,
        mime_type,
        kind: kind.as_str().to_string(),
        size_bytes: data.len() as i64,
        remark,
    };

    let attach = match AttachRepo::create(&state.pool, &input).await {
        Ok(attach) => attach,
        Err(e) => {
            if let Err(cleanup) = state.storage.delete(&input.path).await {
                tracing::warn!(path = %input.path, error = %cleanup, "Failed to remove orphaned upload");
            }
            return Err(e.into());
        }
    };

    tracing::info!(
        attach_id = attach.id,
        kind = %kind,
        size_bytes = attach.size_bytes,
        user_id = auth.user_id,
        "Attachment uploaded",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: attach.with_url(&state.config.storage.base_url),
        }),
    ))
}

/// DELETE /api/v1/admin/attachments/{id}
///
/// Removes the stored file and then the row. A file that is already gone
/// does not block the delete.
pub async fn delete_attachment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let attach = find_attach(&state, id).await?;
    remove_attach(&state, &attach).await?;

    tracing::info!(attach_id = id, user_id = auth.user_id, "Attachment deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/attachments/batch-delete
///
/// Delete several attachments. Unknown ids are skipped; the response reports
/// how many were removed.
pub async fn batch_delete_attachments(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<BatchDeleteAttach>,
) -> AppResult<impl IntoResponse> {
    if input.ids.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "At least one attachment id is required".into(),
        )));
    }
    let ids = normalize_ids("ids", &input.ids)?;

    let mut affected = 0u64;
    for attach in AttachRepo::find_many(&state.pool, &ids).await? {
        if remove_attach(&state, &attach).await? {
            affected += 1;
        }
    }

    tracing::info!(
        requested = ids.len(),
        affected,
        user_id = auth.user_id,
        "Attachments deleted in batch",
    );

    Ok(Json(DataResponse {
        data: AffectedResponse { affected },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_attach(state: &AppState, id: DbId) -> AppResult<Attach> {
    AttachRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Attachment",
            id,
        }))
}

/// Delete the file behind `attach`, then its row.
async fn remove_attach(state: &AppState, attach: &Attach) -> AppResult<bool> {
    state
        .storage
        .delete(&attach.path)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to delete '{}': {e}", attach.path)))?;
    Ok(AttachRepo::delete(&state.pool, attach.id).await?)
}

//! Shared file handlers: upload, info, download, policy updates,
//! ownership transfer, delete.

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use bytes::Bytes;
use chrono::Utc;

use fileshare_core::error::AppError;
use fileshare_entity::shared_file::SharedFilePatch;
use fileshare_service::share::service::{UploadParams, relative_expiry};

use crate::dto::request::{DownloadQuery, OwnerQuery, UpdateFileRequest};
use crate::dto::response::{FileInfoResponse, MessageResponse, TransferResponse, UploadResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/files/upload
pub async fn upload_file(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let form = read_upload_form(multipart).await?;

    let (data, display_name) = form
        .file
        .ok_or_else(|| AppError::validation("Missing file field"))?;

    if data.len() as u64 > state.config.storage.max_upload_size_bytes {
        return Err(AppError::validation(format!(
            "File exceeds maximum upload size of {} bytes",
            state.config.storage.max_upload_size_bytes
        ))
        .into());
    }

    let file = state
        .share_service
        .upload(UploadParams {
            data,
            display_name,
            credential: form.password,
            expires_days: form.expires_days,
            expires_hours: form.expires_hours,
            download_limit: form.max_downloads,
            owner_id: form.owner_id,
        })
        .await?;

    Ok(Json(UploadResponse::from(file)))
}

/// GET /api/files/info/{token}
pub async fn get_file_info(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<FileInfoResponse>, ApiError> {
    let file = state.share_service.info(&token).await?;
    Ok(Json(FileInfoResponse::from_record(file, Utc::now())))
}

/// GET /api/files/download/{token}
pub async fn download_file(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, ApiError> {
    let download = state
        .share_service
        .download(&token, query.password.as_deref())
        .await?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_LENGTH, download.size)
        .header(
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}\"",
                ascii_fallback_name(&download.record.display_name)
            ),
        )
        .body(Body::from_stream(download.stream))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;

    Ok(response)
}

/// GET /api/files/user/{owner_id}
pub async fn list_user_files(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
) -> Result<Json<Vec<FileInfoResponse>>, ApiError> {
    let now = Utc::now();
    let files = state.share_service.list_by_owner(&owner_id).await?;
    Ok(Json(
        files
            .into_iter()
            .map(|file| FileInfoResponse::from_record(file, now))
            .collect(),
    ))
}

/// PATCH /api/files/{token}
pub async fn update_file(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Query(owner): Query<OwnerQuery>,
    Json(req): Json<UpdateFileRequest>,
) -> Result<Json<FileInfoResponse>, ApiError> {
    let expires_at = relative_expiry(req.expires_days, req.expires_hours, Utc::now());
    let patch = SharedFilePatch {
        credential: req.password,
        remove_credential: req.remove_password,
        expires_at,
        download_limit: req.max_downloads,
    };

    let file = state
        .share_service
        .update_policy(&token, patch, owner.owner_id.as_deref())
        .await?;

    Ok(Json(FileInfoResponse::from_record(file, Utc::now())))
}

/// POST /api/files/transfer/{old_owner_id}/{new_owner_id}
pub async fn transfer_files(
    State(state): State<AppState>,
    Path((old_owner_id, new_owner_id)): Path<(String, String)>,
) -> Result<Json<TransferResponse>, ApiError> {
    let count = state
        .share_service
        .transfer(&old_owner_id, &new_owner_id)
        .await?;

    Ok(Json(TransferResponse {
        message: format!("Transferred {count} files"),
        count,
    }))
}

/// DELETE /api/files/{token}
pub async fn delete_file(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.share_service.delete(&token).await?;
    Ok(Json(MessageResponse {
        message: "File deleted successfully".to_string(),
    }))
}

/// Parsed multipart upload form.
#[derive(Default)]
struct UploadForm {
    file: Option<(Bytes, String)>,
    password: Option<String>,
    expires_days: Option<i64>,
    expires_hours: Option<i64>,
    max_downloads: Option<i32>,
    owner_id: Option<String>,
}

/// Drain the multipart stream into the known upload fields. Unknown
/// fields are ignored.
async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "file" => {
                let display_name = field.file_name().unwrap_or("file").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Failed to read file field: {e}")))?;
                form.file = Some((data, display_name));
            }
            "password" => form.password = Some(read_text(field).await?),
            "expires_days" => form.expires_days = Some(parse_field(field, "expires_days").await?),
            "expires_hours" => {
                form.expires_hours = Some(parse_field(field, "expires_hours").await?)
            }
            "max_downloads" => {
                form.max_downloads = Some(parse_field(field, "max_downloads").await?)
            }
            "owner_id" => form.owner_id = Some(read_text(field).await?),
            _ => {}
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::validation(format!("Malformed form field: {e}")))
}

async fn parse_field<T: std::str::FromStr>(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<T, AppError> {
    read_text(field)
        .await?
        .trim()
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid value for {name}")))
}

/// ASCII-only filename for the `Content-Disposition` header. Non-ASCII
/// and quote-breaking characters are dropped; an emptied name falls
/// back to a fixed placeholder. The browser-facing service re-derives
/// the full dual-representation header from the info endpoint.
fn ascii_fallback_name(display_name: &str) -> String {
    let cleaned: String = display_name
        .chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control() && *c != '"' && *c != '\\')
        .collect();
    if cleaned.trim().is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_fallback_passthrough() {
        assert_eq!(ascii_fallback_name("report.pdf"), "report.pdf");
    }

    #[test]
    fn test_ascii_fallback_strips_non_ascii() {
        assert_eq!(ascii_fallback_name("отчёт-2024.pdf"), "-2024.pdf");
    }

    #[test]
    fn test_ascii_fallback_placeholder_when_emptied() {
        assert_eq!(ascii_fallback_name("отчёт"), "file");
        assert_eq!(ascii_fallback_name(""), "file");
    }

    #[test]
    fn test_ascii_fallback_drops_quote_breakers() {
        assert_eq!(ascii_fallback_name("a\"b\\c.txt"), "abc.txt");
    }
}

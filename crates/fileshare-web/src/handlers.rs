//! Browser-facing handlers.
//!
//! Everything here is transport plumbing: session identity in, upstream
//! call out, upstream outcome mapped through unchanged. The one piece
//! of real work is the download proxy, which re-derives the filename
//! header from the file's metadata.

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;
use bytes::Bytes;
use serde::Deserialize;
use serde_json::json;

use fileshare_core::error::AppError;

use crate::client::{FileInfo, FileUpdate, IssuedToken, UploadOptions, UploadedFile};
use crate::disposition;
use crate::error::WebError;
use crate::session;
use crate::state::WebState;

/// Download query string.
#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    /// Share password for protected files.
    pub password: Option<String>,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    /// Login name.
    pub username: String,
    /// Account password.
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// POST /upload: proxy a browser upload to the object store, tagged
/// with the session's owner identity.
pub async fn upload(
    State(state): State<WebState>,
    jar: CookieJar,
    multipart: Multipart,
) -> Result<(CookieJar, Json<UploadedFile>), WebError> {
    let (session, jar) = session::resolve(jar);
    let form = read_upload_form(multipart, state.config.web.max_upload_size_bytes).await?;

    let (data, filename) = form
        .file
        .ok_or_else(|| AppError::validation("Missing file field"))?;

    let uploaded = state
        .client
        .upload_file(
            data,
            &filename,
            UploadOptions {
                password: form.password,
                expires_days: form.expires_days,
                expires_hours: form.expires_hours,
                max_downloads: form.max_downloads,
                owner_id: Some(session.owner_id()),
            },
        )
        .await?;

    Ok((jar, Json(uploaded)))
}

/// GET /files: list the session's files.
pub async fn my_files(
    State(state): State<WebState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Vec<FileInfo>>), WebError> {
    let (session, jar) = session::resolve(jar);
    let files = state.client.get_user_files(&session.owner_id()).await?;
    Ok((jar, Json(files)))
}

/// GET /d/{token}: proxy a download, re-deriving the filename header.
///
/// The filename comes from the info endpoint rather than from parsing
/// the upstream header; the bytes stream through untouched. Policy
/// denials (403/404/410) surface with the upstream's own status.
pub async fn download(
    State(state): State<WebState>,
    Path(token): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, WebError> {
    let info = state.client.get_file_info(&token).await?;
    let fetched = state
        .client
        .download_file(&token, query.password.as_deref())
        .await?;

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(
            header::CONTENT_DISPOSITION,
            disposition::attachment_header(&info.filename),
        );
    if let Some(length) = fetched.content_length {
        builder = builder.header(header::CONTENT_LENGTH, length);
    }

    builder
        .body(Body::from_stream(fetched.stream))
        .map_err(|e| WebError(AppError::internal(format!("Response build failed: {e}"))))
}

/// PATCH /files/{token}: forward a policy update under the session's
/// identity. The object store enforces ownership.
pub async fn update_file(
    State(state): State<WebState>,
    jar: CookieJar,
    Path(token): Path<String>,
    Json(update): Json<FileUpdate>,
) -> Result<(CookieJar, Json<FileInfo>), WebError> {
    let (session, jar) = session::resolve(jar);
    let updated = state
        .client
        .update_file(&token, &update, Some(&session.owner_id()))
        .await?;
    Ok((jar, Json(updated)))
}

/// DELETE /files/{token}: delete one of the session's files.
pub async fn delete_file(
    State(state): State<WebState>,
    jar: CookieJar,
    Path(token): Path<String>,
) -> Result<(CookieJar, Json<serde_json::Value>), WebError> {
    let (session, jar) = session::resolve(jar);

    let info = state.client.get_file_info(&token).await?;
    if info.owner_id.as_deref() != Some(session.owner_id().as_str()) {
        return Err(WebError(AppError::forbidden(
            "You don't have permission to delete this file",
        )));
    }

    state.client.delete_file(&token).await?;
    Ok((jar, Json(json!({ "message": "File deleted" }))))
}

/// POST /auth/login: authenticate and claim the session's uploads.
pub async fn login(
    State(state): State<WebState>,
    jar: CookieJar,
    Json(form): Json<LoginForm>,
) -> Result<(CookieJar, Json<IssuedToken>), WebError> {
    let (session, jar) = session::resolve(jar);
    let issued = state
        .auth
        .login(&form.username, &form.password, &session.owner)
        .await?;
    let jar = session::authenticate(jar, &issued.user_id, &issued.access_token);
    Ok((jar, Json(issued)))
}

/// POST /auth/register: create an account and claim the session's
/// uploads.
pub async fn register(
    State(state): State<WebState>,
    jar: CookieJar,
    Json(form): Json<RegisterForm>,
) -> Result<(CookieJar, Json<IssuedToken>), WebError> {
    let (session, jar) = session::resolve(jar);
    let issued = state
        .auth
        .register(&form.username, &form.email, &form.password, &session.owner)
        .await?;
    let jar = session::authenticate(jar, &issued.user_id, &issued.access_token);
    Ok((jar, Json(issued)))
}

/// POST /auth/logout: drop the session.
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<serde_json::Value>) {
    (session::clear(jar), Json(json!({ "message": "Logged out" })))
}

/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Parsed browser upload form.
#[derive(Default)]
struct UploadForm {
    file: Option<(Bytes, String)>,
    password: Option<String>,
    expires_days: Option<i64>,
    expires_hours: Option<i64>,
    max_downloads: Option<i32>,
}

/// Drain the browser's multipart form, rejecting oversized files before
/// anything is forwarded upstream.
async fn read_upload_form(
    mut multipart: Multipart,
    max_upload_size: u64,
) -> Result<UploadForm, AppError> {
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
                let filename = field.file_name().unwrap_or("file").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Failed to read file field: {e}")))?;
                if data.len() as u64 > max_upload_size {
                    return Err(AppError::validation(format!(
                        "File exceeds maximum upload size of {max_upload_size} bytes"
                    )));
                }
                form.file = Some((data, filename));
            }
            "password" => form.password = Some(text(field).await?),
            "expires_days" => form.expires_days = Some(number(field, "expires_days").await?),
            "expires_hours" => form.expires_hours = Some(number(field, "expires_hours").await?),
            "max_downloads" => form.max_downloads = Some(number(field, "max_downloads").await?),
            _ => {}
        }
    }

    Ok(form)
}

async fn text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::validation(format!("Malformed form field: {e}")))
}

async fn number<T: std::str::FromStr>(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<T, AppError> {
    text(field)
        .await?
        .trim()
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid value for {name}")))
}

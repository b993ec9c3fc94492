use axum::Json;
use axum::body::Body;
use axum::extract::multipart::Field;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use common::storage::validate_flat_filename;
use tokio_util::io::ReaderStream;
use tracing::{info, instrument};

use crate::error::{AppError, ErrorBody};
use crate::extractors::{AppMultipart, AppPath};
use crate::models::image::{UploadImageForm, UploadResponse};
use crate::state::AppState;

/// Multipart framing allowance on top of the configured file size limit.
const MULTIPART_OVERHEAD: u64 = 64 * 1024;

pub fn upload_body_limit(max_upload_size: u64) -> DefaultBodyLimit {
    DefaultBodyLimit::max(upload_body_limit_bytes(max_upload_size))
}

fn upload_body_limit_bytes(max_upload_size: u64) -> usize {
    let limit = max_upload_size.saturating_add(MULTIPART_OVERHEAD);
    usize::try_from(limit).unwrap_or(usize::MAX)
}

#[utoipa::path(
    post,
    path = "/uploadimage",
    tag = "Images",
    operation_id = "uploadImage",
    summary = "Upload an image",
    description = "Stores the multipart `file` field under its own filename. \
        Uploading a name that already exists replaces the stored file. \
        Filenames with path separators, `..`, a leading dot or control characters are rejected.",
    request_body(content = UploadImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Image stored", body = UploadResponse),
        (status = 400, description = "Not a multipart request, missing file or invalid filename (VALIDATION_ERROR)", body = ErrorBody),
        (status = 413, description = "File too large (PAYLOAD_TOO_LARGE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn upload_image(
    State(state): State<AppState>,
    AppMultipart(mut multipart): AppMultipart,
) -> Result<impl IntoResponse, AppError> {
    let max_size = state.config.storage.max_upload_size;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .ok_or_else(|| AppError::Validation("File field must have a filename".into()))?
            .to_string();
        let filename = validate_flat_filename(&filename)
            .map_err(|e| AppError::Validation(e.to_string()))?
            .to_string();

        let data = read_field(field, max_size).await?;
        let size = state.files.save(&filename, &data).await?;

        info!(file = %filename, size, "Image uploaded");

        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse::uploaded(&filename)),
        ));
    }

    Err(AppError::Validation("Missing 'file' field".into()))
}

#[utoipa::path(
    get,
    path = "/getimage/{nama_file}",
    tag = "Images",
    operation_id = "getImage",
    summary = "Download an image",
    description = "Streams the stored file. `Content-Type` is guessed from the extension.",
    params(("nama_file" = String, Path, description = "Filename used at upload")),
    responses(
        (status = 200, description = "Raw file content"),
        (status = 400, description = "Invalid filename (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "File not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_image(
    State(state): State<AppState>,
    AppPath(nama_file): AppPath<String>,
) -> Result<Response, AppError> {
    let file = state.files.open(&nama_file).await?;

    let content_type = mime_guess::from_path(&file.name).first_or_octet_stream();
    let body = Body::from_stream(ReaderStream::new(file.reader));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type.as_ref())
        .header(header::CONTENT_LENGTH, file.size.to_string())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_value(&file.name),
        )
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}

/// Buffer one multipart field, refusing to grow past `max_size`.
async fn read_field(mut field: Field<'_>, max_size: u64) -> Result<Vec<u8>, AppError> {
    let mut data = Vec::new();

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
    {
        if (data.len() + chunk.len()) as u64 > max_size {
            return Err(AppError::PayloadTooLarge(format!(
                "File exceeds maximum size of {max_size} bytes"
            )));
        }
        data.extend_from_slice(&chunk);
    }

    Ok(data)
}

/// Build a safe `Content-Disposition` header value.
fn content_disposition_value(filename: &str) -> String {
    let ascii_safe: String = filename
        .chars()
        .filter(|c| c.is_ascii_graphic() && !matches!(c, '"' | ';' | '\\'))
        .collect();
    let ascii_name = if ascii_safe.is_empty() {
        "image".to_string()
    } else {
        ascii_safe
    };

    // RFC 5987 percent-encoding for filename*.
    let encoded: String = filename
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                String::from(b as char)
            }
            _ => format!("%{b:02X}"),
        })
        .collect();

    format!("inline; filename=\"{ascii_name}\"; filename*=UTF-8''{encoded}")
}

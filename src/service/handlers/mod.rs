//! HTTP request handlers for the gene-guard web service

pub mod extract;
pub mod health;
pub mod info;
pub mod predict;

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Multipart, Query, Request},
    http::{header, StatusCode},
    response::Json,
};

use crate::prioritize::{extract_notable_variants, Extraction};
use crate::service::{
    server::AppState,
    types::{ErrorResponse, ServiceError, UploadQuery},
    validation::{sanitize_filename, validate_upload, ValidationError},
};

/// Error half of every handler result
pub type HandlerError = (StatusCode, Json<ErrorResponse>);

/// Form field carrying the uploaded file
pub const UPLOAD_FIELD: &str = "file";

/// Convert a service error into a status code and JSON body
pub(crate) fn error_response(error: ServiceError) -> HandlerError {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(error.to_response()))
}

fn upload_error(status: StatusCode, text: String) -> HandlerError {
    let error = ServiceError::InvalidUpload(format!("File upload error: {}", text));
    (status, Json(error.to_response()))
}

/// An uploaded file with the subject fields sent alongside it
///
/// Accepts `multipart/form-data` with the file in the `file` field (and
/// optional `age` and `gender` text fields), or the file as the raw request
/// body. Query parameters `filename`, `age` and `gender` apply to both; form
/// fields win over query parameters.
#[derive(Debug, Clone, Default)]
pub struct Upload {
    /// Client-side file name
    pub filename: Option<String>,
    /// Declared content type of the file
    pub content_type: Option<String>,
    /// Subject age
    pub age: Option<u32>,
    /// Subject gender
    pub gender: Option<String>,
    /// File contents
    pub body: Bytes,
}

impl Upload {
    fn from_query(query: UploadQuery) -> Self {
        Self {
            filename: query.filename,
            age: query.age,
            gender: query.gender,
            ..Self::default()
        }
    }
}

#[axum::async_trait]
impl FromRequest<AppState> for Upload {
    type Rejection = HandlerError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();
        let Query(query) = Query::<UploadQuery>::from_request_parts(&mut parts, state)
            .await
            .map_err(|e| error_response(ServiceError::BadRequest(e.body_text())))?;
        let content_type = parts
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let req = Request::from_parts(parts, body);

        let mut upload = Upload::from_query(query);
        let is_multipart = content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if !is_multipart {
            upload.content_type = content_type;
            upload.body = Bytes::from_request(req, state)
                .await
                .map_err(|e| upload_error(e.status(), e.body_text()))?;
            return Ok(upload);
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| upload_error(e.status(), e.body_text()))?;
        let mut file = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| upload_error(e.status(), e.body_text()))?
        {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some(UPLOAD_FIELD) => {
                    if let Some(filename) = field.file_name() {
                        upload.filename = Some(filename.to_string());
                    }
                    upload.content_type = field.content_type().map(str::to_string);
                    file = Some(
                        field
                            .bytes()
                            .await
                            .map_err(|e| upload_error(e.status(), e.body_text()))?,
                    );
                }
                Some("age") => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| upload_error(e.status(), e.body_text()))?;
                    let age = text.trim().parse::<u32>().map_err(|_| {
                        error_response(ServiceError::BadRequest(
                            ValidationError::InvalidParameter(format!("invalid age: {}", text))
                                .to_string(),
                        ))
                    })?;
                    upload.age = Some(age);
                }
                Some("gender") => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| upload_error(e.status(), e.body_text()))?;
                    upload.gender = Some(text.trim().to_string());
                }
                _ => {}
            }
        }

        upload.body = file.ok_or_else(|| {
            error_response(ServiceError::InvalidUpload(ValidationError::NoFile.to_string()))
        })?;
        Ok(upload)
    }
}

/// Validate an uploaded file and run extraction on it
pub(crate) fn receive_and_extract(
    state: &AppState,
    upload: &Upload,
) -> Result<Extraction, HandlerError> {
    let filename = upload.filename.as_deref().map(sanitize_filename);

    let text = validate_upload(
        filename.as_deref(),
        upload.content_type.as_deref(),
        &upload.body,
        state.max_upload_bytes,
    )
    .map_err(|e| error_response(ServiceError::InvalidUpload(e.to_string())))?;

    tracing::info!(
        "Received {} ({} bytes)",
        filename.as_deref().unwrap_or("<unnamed>"),
        upload.body.len()
    );

    extract_notable_variants(text, &state.config.prioritize).map_err(|e| {
        tracing::warn!("Extraction failed: {}", e);
        error_response(ServiceError::from(e))
    })
}

//! Request body decoding
//!
//! Multipart uploads are written to the media store while the body is read.
//! When a later part fails (size, count, malformed body) every file already
//! stored for the request is deleted before the error is returned.

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Form, FromRequest, Multipart, Request};
use axum::Json;
use http::{StatusCode, header};
use serde_json::Value;

use crate::content::{FormFields, HomeUpdate, UploadedFile};
use crate::core::ServerState;
use crate::services::MediaStore;
use crate::services::media::sanitize_prefix;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Limits and naming for one multipart endpoint
#[derive(Debug, Clone, Copy)]
pub struct UploadPolicy<'a> {
    pub max_file_bytes: usize,
    pub max_files: usize,
    /// Only files under this field are accepted; `None` accepts any field
    pub file_field: Option<&'a str>,
    /// Stored name prefix; `None` derives it from the field name
    pub prefix: Option<&'a str>,
}

/// Decoded multipart body
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: FormFields,
    pub files: Vec<UploadedFile>,
}

impl MultipartForm {
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).as_str()
    }

    /// First file under `field`
    pub fn take_file(&mut self, field: &str) -> Option<UploadedFile> {
        let idx = self.files.iter().position(|f| f.field_name == field)?;
        Some(self.files.remove(idx))
    }
}

/// Read every part, storing files through `media`
pub async fn read_multipart(
    media: &MediaStore,
    mut multipart: Multipart,
    policy: UploadPolicy<'_>,
) -> AppResult<MultipartForm> {
    let mut form = MultipartForm::default();
    match read_parts(media, &mut multipart, policy, &mut form).await {
        Ok(()) => Ok(form),
        Err(err) => {
            let stored: Vec<String> = form.files.iter().map(|f| f.stored_path.clone()).collect();
            media.delete_best_effort(&stored).await;
            Err(err)
        }
    }
}

async fn read_parts(
    media: &MediaStore,
    multipart: &mut Multipart,
    policy: UploadPolicy<'_>,
    form: &mut MultipartForm,
) -> AppResult<()> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        let Some(file_name) = field.file_name().map(str::to_string) else {
            let text = field.text().await.map_err(multipart_error)?;
            form.fields.insert(name, text);
            continue;
        };

        if policy.file_field.is_some_and(|expected| expected != name) {
            return Err(AppError::invalid_request(format!(
                "Campo de arquivo inesperado: {name}"
            ))
            .with_detail("field", name));
        }

        let bytes = read_limited(field, policy.max_file_bytes).await?;
        // an empty file input still sends a part
        if file_name.is_empty() && bytes.is_empty() {
            continue;
        }
        if form.files.len() >= policy.max_files {
            return Err(AppError::too_many_files(policy.max_files));
        }

        let prefix = match policy.prefix {
            Some(prefix) => prefix.to_string(),
            None => sanitize_prefix(&name),
        };
        let stored_path = media
            .store(&prefix, Some(&file_name), &bytes)
            .await
            .map_err(|e| {
                AppError::with_message(ErrorCode::FileStorageFailed, format!("Falha ao salvar arquivo: {e}"))
            })?;

        form.files.push(UploadedFile {
            field_name: name,
            stored_path,
            size_bytes: bytes.len() as u64,
        });
    }
    Ok(())
}

async fn read_limited(mut field: Field<'_>, max_bytes: usize) -> AppResult<Vec<u8>> {
    let mut data = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if data.len() + chunk.len() > max_bytes {
            return Err(AppError::file_too_large(max_bytes));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::with_message(ErrorCode::FileTooLarge, e.body_text());
    }
    AppError::with_message(
        ErrorCode::InvalidMultipart,
        format!("Invalid multipart request: {}", e.body_text()),
    )
}

/// Unwrap a JSON body, turning rejections into the failure shape
pub fn json_payload<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::invalid_request(rejection.body_text()))
}

/// Home document update in any of the accepted encodings
///
/// - `multipart/form-data`: text fields plus uploaded files
/// - `application/json`: an object of fields, no files
/// - anything else is read as `application/x-www-form-urlencoded`
pub struct HomeForm(pub HomeUpdate);

impl FromRequest<ServerState> for HomeForm {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &ServerState) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|r| AppError::with_message(ErrorCode::InvalidMultipart, r.body_text()))?;
            let policy = UploadPolicy {
                max_file_bytes: state.config.max_file_size_bytes,
                max_files: state.config.max_files_per_request,
                file_field: None,
                prefix: None,
            };
            let form = read_multipart(&state.media, multipart, policy).await?;
            return Ok(Self(HomeUpdate::new(form.fields, form.files)));
        }

        if content_type.starts_with("application/json") {
            let value = json_payload(Json::<Value>::from_request(req, state).await)?;
            let Value::Object(object) = value else {
                return Err(AppError::invalid_request("Corpo JSON deve ser um objeto."));
            };
            return Ok(Self(HomeUpdate::new(FormFields::from_json_object(object), Vec::new())));
        }

        let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
            .await
            .map_err(|r| AppError::invalid_request(r.body_text()))?;
        Ok(Self(HomeUpdate::new(pairs.into_iter().collect(), Vec::new())))
    }
}

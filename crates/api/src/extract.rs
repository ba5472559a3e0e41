//! Request extractors.
//!
//! Every rejection becomes a 400 error envelope instead of axum's plain-text
//! default.

use std::path::Path as FsPath;

use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{
    Form, FromRequest, FromRequestParts, Json, Multipart, Path, Query, Request,
};
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use packline_core::catalog::{FormFields, flag_filter, search_term};
use packline_core::upload::{StagedFile, StagedUploads, UploadError, UploadSlot, staging_file};
use packline_shared::PageRequest;

use crate::AppState;
use crate::error::ApiError;

/// JSON body; a malformed body is a 400.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::bad_request(rejection.body_text())),
        }
    }
}

/// The `{id}` path segment as a UUID.
#[derive(Debug, Clone, Copy)]
pub struct ResourceId(pub Uuid);

impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;

        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| ApiError::bad_request(format!("Invalid id: {raw}")))
    }
}

/// Query parameters accepted by list routes. Everything is optional text;
/// each route picks what it understands.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    /// 1-based page number.
    pub page: Option<String>,
    /// Page size; absent means everything.
    pub limit: Option<String>,
    /// Free-text search.
    pub search: Option<String>,
    /// Name substring (products).
    pub name: Option<String>,
    /// `"true"` or `"false"`.
    pub is_active: Option<String>,
    /// Category ID (products).
    pub category: Option<String>,
    /// Material ID (products).
    pub material: Option<String>,
}

impl ListParams {
    /// Pagination window requested.
    #[must_use]
    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_query(self.page.as_deref(), self.limit.as_deref())
    }

    /// The active-flag filter.
    #[must_use]
    pub fn is_active(&self) -> Option<bool> {
        flag_filter(self.is_active.as_deref())
    }

    /// Trimmed search term, if any.
    #[must_use]
    pub fn search(&self) -> Option<String> {
        search_term(self.search.as_deref())
    }

    /// An ID-valued filter parameter.
    ///
    /// # Errors
    ///
    /// Returns 400 when the value is present but not a UUID.
    pub fn id(&self, name: &str, raw: Option<&str>) -> Result<Option<Uuid>, ApiError> {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(None),
            Some(value) => Uuid::parse_str(value)
                .map(Some)
                .map_err(|_| ApiError::bad_request(format!("{name} must be a valid id"))),
        }
    }
}

/// List query string.
#[derive(Debug, Clone, Default)]
pub struct ListQuery(pub ListParams);

impl<S> FromRequestParts<S> for ListQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<ListParams>::from_request_parts(parts, state)
            .await
            .map(|Query(params)| Self(params))
            .map_err(|e| ApiError::bad_request(e.body_text()))
    }
}

/// Text fields plus any files, from a multipart, urlencoded or JSON body.
///
/// Files are streamed to the staging directory as they arrive. If the
/// request fails part-way, the files staged so far are removed when this
/// value (or the partial set) is dropped.
#[derive(Debug, Default)]
pub struct FormData {
    /// Text fields.
    pub fields: FormFields,
    /// Staged files.
    pub files: StagedUploads,
}

impl FromRequest<AppState> for FormData {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;
            let max_file_size = state.uploads.limits.max_file_size;
            return read_multipart(multipart, &state.uploads.dir, max_file_size).await;
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;
            let mut fields = FormFields::new();
            for (name, value) in pairs {
                fields.push(name, value);
            }
            return Ok(Self {
                fields,
                files: StagedUploads::new(),
            });
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let value: serde_json::Value = serde_json::from_slice(&body)
            .map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {e}")))?;
        Ok(Self {
            fields: FormFields::from_json(&value)?,
            files: StagedUploads::new(),
        })
    }
}

fn bad_multipart(err: MultipartError) -> ApiError {
    ApiError::bad_request(err.body_text())
}

async fn read_multipart(
    mut multipart: Multipart,
    dir: &FsPath,
    max_file_size: u64,
) -> Result<FormData, ApiError> {
    let mut form = FormData::default();

    while let Some(mut field) = multipart.next_field().await.map_err(bad_multipart)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        let Some(file_name) = field.file_name().map(str::to_string) else {
            let text = field.text().await.map_err(bad_multipart)?;
            form.fields.push(name, text);
            continue;
        };

        let slot = UploadSlot::parse(&name);
        let content_type = field.content_type().map(str::to_string);
        let (file, path) = staging_file(dir).map_err(UploadError::from)?;
        let mut file = tokio::fs::File::from_std(file);
        let mut size: u64 = 0;

        while let Some(chunk) = field.chunk().await.map_err(bad_multipart)? {
            size += chunk.len() as u64;
            if slot != UploadSlot::Unrecognized && size > max_file_size {
                return Err(UploadError::FileTooLarge {
                    field: name,
                    size,
                    max: max_file_size,
                }
                .into());
            }
            file.write_all(&chunk).await.map_err(UploadError::from)?;
        }
        file.flush().await.map_err(UploadError::from)?;

        form.files.push(StagedFile {
            slot,
            field_name: name,
            file_name: Some(file_name).filter(|n| !n.is_empty()),
            content_type,
            size,
            path,
        });
    }

    Ok(form)
}

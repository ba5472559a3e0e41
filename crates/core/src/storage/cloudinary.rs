//! Cloudinary image host.
//!
//! Uploads and deletes go through the signed REST API as multipart forms.
//! The signature is SHA-256 over the sorted signed parameters followed by the
//! API secret.

use std::fmt;
use std::path::Path;

use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use super::error::StorageError;
use super::host::{HostedImage, ImageHost};

/// Cloudinary upload API client.
#[derive(Clone)]
pub struct CloudinaryHost {
    client: reqwest::Client,
    api_base: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

impl fmt::Debug for CloudinaryHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudinaryHost")
            .field("api_base", &self.api_base)
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl CloudinaryHost {
    /// Public API base URL.
    pub const DEFAULT_API_BASE: &'static str = "https://api.cloudinary.com/v1_1";

    /// Create a client for a cloud.
    #[must_use]
    pub fn new(cloud_name: String, api_key: String, api_secret: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: Self::DEFAULT_API_BASE.to_string(),
            cloud_name,
            api_key,
            api_secret,
        }
    }

    /// Point the client at another API base, e.g. a local stub.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/{}/auto/upload",
            self.api_base.trim_end_matches('/'),
            self.cloud_name
        )
    }

    fn destroy_url(&self, resource_type: &str) -> String {
        format!(
            "{}/{}/{resource_type}/destroy",
            self.api_base.trim_end_matches('/'),
            self.cloud_name
        )
    }

    /// Resource type and public ID of a delivery URL from this cloud.
    ///
    /// `https://res.cloudinary.com/{cloud}/image/upload/v17/products/abc.png`
    /// gives `("image", "products/abc")`.
    fn locate<'u>(&self, url: &'u str) -> Option<(&'u str, String)> {
        let marker = format!("/{}/", self.cloud_name);
        let (_, path) = url.split_once(marker.as_str())?;
        let (resource_type, rest) = path.split_once("/upload/")?;
        if resource_type.is_empty() || resource_type.contains('/') {
            return None;
        }

        let rest = rest.split(['?', '#']).next().unwrap_or_default();
        let rest = match rest.split_once('/') {
            Some((version, tail))
                if version.len() > 1
                    && version.starts_with('v')
                    && version[1..].bytes().all(|b| b.is_ascii_digit()) =>
            {
                tail
            }
            _ => rest,
        };

        let public_id = match rest.rsplit_once('.') {
            Some((stem, ext)) if !ext.contains('/') => stem,
            _ => rest,
        };
        (!public_id.is_empty()).then(|| (resource_type, public_id.to_string()))
    }

    async fn rejection(response: reqwest::Response) -> StorageError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let message =
            serde_json::from_str::<ErrorResponse>(&text).map_or(text, |body| body.error.message);
        StorageError::Rejected {
            status: status.as_u16(),
            message,
        }
    }
}

/// Request signature: `k1=v1&k2=v2...` sorted by key, then the secret,
/// hashed with SHA-256 and hex encoded.
fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_unstable_by_key(|(key, _)| *key);

    let joined = sorted
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    format!("{:x}", Sha256::digest(format!("{joined}{api_secret}")))
}

impl ImageHost for CloudinaryHost {
    async fn upload(
        &self,
        path: &Path,
        folder: &str,
        file_name: Option<&str>,
    ) -> Result<HostedImage, StorageError> {
        let bytes = tokio::fs::read(path).await?;
        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign(
            &[("folder", folder), ("timestamp", timestamp.as_str())],
            &self.api_secret,
        );

        let part = Part::bytes(bytes).file_name(file_name.unwrap_or("upload").to_string());
        let form = Form::new()
            .part("file", part)
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", folder.to_string())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let body: UploadResponse = response.json().await?;
        debug!(public_id = %body.public_id, "Image uploaded to Cloudinary");

        Ok(HostedImage {
            url: body.secure_url,
            public_id: body.public_id,
        })
    }

    async fn delete(&self, url: &str) -> Result<bool, StorageError> {
        let Some((resource_type, public_id)) = self.locate(url) else {
            return Ok(false);
        };

        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign(
            &[("public_id", public_id.as_str()), ("timestamp", timestamp.as_str())],
            &self.api_secret,
        );
        let form = Form::new()
            .text("public_id", public_id.clone())
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let response = self
            .client
            .post(self.destroy_url(resource_type))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let body: DestroyResponse = response.json().await?;
        debug!(public_id = %public_id, result = %body.result, "Cloudinary destroy");
        Ok(body.result == "ok")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_sorts_params() {
        let a = sign(&[("timestamp", "1700000000"), ("folder", "products")], "secret");
        let b = sign(&[("folder", "products"), ("timestamp", "1700000000")], "secret");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_sign_matches_manual_digest() {
        let expected = format!(
            "{:x}",
            Sha256::digest("folder=blogs&timestamp=1315060510abcd")
        );
        assert_eq!(
            sign(&[("folder", "blogs"), ("timestamp", "1315060510")], "abcd"),
            expected
        );
    }

    #[test]
    fn test_sign_depends_on_secret() {
        let params = [("folder", "blogs"), ("timestamp", "1")];
        assert_ne!(sign(&params, "one"), sign(&params, "two"));
    }

    #[test]
    fn test_upload_url() {
        let host = CloudinaryHost::new("packline".into(), "k".into(), "s".into())
            .with_api_base("http://127.0.0.1:9000/v1_1/");
        assert_eq!(
            host.upload_url(),
            "http://127.0.0.1:9000/v1_1/packline/auto/upload"
        );
    }

    #[test]
    fn test_locate_delivery_urls() {
        let host = CloudinaryHost::new("packline".into(), "k".into(), "s".into());
        assert_eq!(
            host.locate(
                "https://res.cloudinary.com/packline/image/upload/v1700000000/products/abc123.png"
            ),
            Some(("image", "products/abc123".to_string()))
        );
        assert_eq!(
            host.locate("https://res.cloudinary.com/packline/raw/upload/blogs/icons/tape"),
            Some(("raw", "blogs/icons/tape".to_string()))
        );
        assert_eq!(
            host.locate("https://res.cloudinary.com/packline/image/upload/v2/a.b/c.jpg?x=1"),
            Some(("image", "a.b/c".to_string()))
        );
    }

    #[test]
    fn test_locate_ignores_foreign_urls() {
        let host = CloudinaryHost::new("packline".into(), "k".into(), "s".into());
        assert_eq!(
            host.locate("https://res.cloudinary.com/othercloud/image/upload/v1/a.png"),
            None
        );
        assert_eq!(host.locate("https://cdn.example.com/products/a.png"), None);
        assert_eq!(
            host.locate("https://res.cloudinary.com/packline/image/upload/"),
            None
        );
    }

    #[test]
    fn test_destroy_url() {
        let host = CloudinaryHost::new("packline".into(), "k".into(), "s".into())
            .with_api_base("http://127.0.0.1:9000/v1_1");
        assert_eq!(
            host.destroy_url("image"),
            "http://127.0.0.1:9000/v1_1/packline/image/destroy"
        );
    }

    #[tokio::test]
    async fn test_delete_skips_foreign_url_without_calling_api() {
        let host = CloudinaryHost::new("packline".into(), "k".into(), "s".into())
            .with_api_base("http://127.0.0.1:1/v1_1");
        let removed = host.delete("https://cdn.example.com/a.png").await.unwrap();
        assert!(!removed);
    }

    #[test]
    fn test_debug_hides_secret() {
        let host = CloudinaryHost::new("packline".into(), "k".into(), "topsecret".into());
        assert!(!format!("{host:?}").contains("topsecret"));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let host = CloudinaryHost::new("packline".into(), "k".into(), "s".into());
        let err = host
            .upload(Path::new("/nonexistent/packline-upload"), "products", None)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
    }
}

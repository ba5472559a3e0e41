//! Object-store image host using Apache OpenDAL.

use std::path::Path;

use opendal::{Operator, services};
use tracing::debug;
use uuid::Uuid;

use super::error::StorageError;
use super::host::{HostedImage, ImageHost};
use packline_shared::ImageProviderConfig;

/// Stores images in an S3 bucket, Azure container or local directory and
/// serves them from `public_base_url`.
pub struct ObjectStoreHost {
    operator: Operator,
    public_base_url: String,
}

impl ObjectStoreHost {
    /// Create a host for an object-store provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be initialized, or if it is
    /// not an object store.
    pub fn from_config(
        provider: &ImageProviderConfig,
        public_base_url: impl Into<String>,
    ) -> Result<Self, StorageError> {
        let operator = Self::create_operator(provider)?;
        Ok(Self {
            operator,
            public_base_url: public_base_url.into(),
        })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &ImageProviderConfig) -> Result<Operator, StorageError> {
        match provider {
            ImageProviderConfig::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
            ImageProviderConfig::AzureBlob {
                account,
                access_key,
                container,
            } => {
                let builder = services::Azblob::default()
                    .account_name(account)
                    .account_key(access_key)
                    .container(container);

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
            ImageProviderConfig::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
            ImageProviderConfig::Cloudinary { .. } => Err(StorageError::configuration(
                "cloudinary is not an object store",
            )),
        }
    }

    /// Object key for a new image.
    ///
    /// Format: `{folder}/{uuid}-{sanitized_filename}`, or `{folder}/{uuid}`
    /// when the upload had no name.
    #[must_use]
    pub fn generate_key(folder: &str, file_name: Option<&str>) -> String {
        let folder = folder.trim_matches('/');
        let id = Uuid::new_v4();
        match file_name.map(sanitize_filename).filter(|n| !n.is_empty()) {
            Some(name) => format!("{folder}/{id}-{name}"),
            None => format!("{folder}/{id}"),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url.trim_end_matches('/'), key)
    }

    /// Object key behind one of this host's public URLs.
    fn key_for(&self, url: &str) -> Option<String> {
        let base = self.public_base_url.trim_end_matches('/');
        let key = url.strip_prefix(base)?.strip_prefix('/')?;
        let valid = !key.is_empty()
            && key
                .split('/')
                .all(|segment| !segment.is_empty() && segment != "." && segment != "..");
        valid.then(|| key.to_string())
    }
}

impl ImageHost for ObjectStoreHost {
    async fn upload(
        &self,
        path: &Path,
        folder: &str,
        file_name: Option<&str>,
    ) -> Result<HostedImage, StorageError> {
        let bytes = tokio::fs::read(path).await?;
        let key = Self::generate_key(folder, file_name);

        self.operator.write(&key, bytes).await?;
        debug!(key = %key, "Image stored");

        Ok(HostedImage {
            url: self.public_url(&key),
            public_id: key,
        })
    }

    async fn delete(&self, url: &str) -> Result<bool, StorageError> {
        let Some(key) = self.key_for(url) else {
            return Ok(false);
        };
        if !self.operator.exists(&key).await? {
            return Ok(false);
        }

        self.operator.delete(&key).await?;
        debug!(key = %key, "Image removed");
        Ok(true)
    }
}

/// Sanitize filename for storage key.
///
/// Only allows ASCII alphanumeric characters, dots, hyphens, and underscores.
fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Extension trait for pipe operator.
trait Pipe: Sized {
    fn pipe<F, R>(self, f: F) -> R
    where
        F: FnOnce(Self) -> R,
    {
        f(self)
    }
}

impl<T> Pipe for T {}

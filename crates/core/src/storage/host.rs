//! The image host seam and the configured implementation.

use std::future::Future;
use std::path::Path;

use packline_shared::{ImageConfig, ImageProviderConfig};

use super::cloudinary::CloudinaryHost;
use super::error::StorageError;
use super::object_store::ObjectStoreHost;

/// An image stored by a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedImage {
    /// Durable public URL.
    pub url: String,
    /// Host-side identifier (Cloudinary public ID or object key).
    pub public_id: String,
}

/// Somewhere uploaded images can be pushed to.
pub trait ImageHost: Send + Sync {
    /// Upload the file at `path` into `folder`.
    fn upload(
        &self,
        path: &Path,
        folder: &str,
        file_name: Option<&str>,
    ) -> impl Future<Output = Result<HostedImage, StorageError>> + Send;

    /// Remove a previously hosted image by its public URL.
    ///
    /// Resolves to `false` when the URL does not belong to this host or the
    /// host no longer has the image.
    fn delete(&self, url: &str) -> impl Future<Output = Result<bool, StorageError>> + Send;
}

/// The image host selected by configuration.
pub enum ImageStore {
    /// Cloudinary upload API.
    Cloudinary(CloudinaryHost),
    /// S3, Azure Blob or local filesystem through OpenDAL.
    ObjectStore(ObjectStoreHost),
}

impl ImageStore {
    /// Build the configured host.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be initialized.
    pub fn from_config(config: &ImageConfig) -> Result<Self, StorageError> {
        match &config.provider {
            ImageProviderConfig::Cloudinary {
                cloud_name,
                api_key,
                api_secret,
            } => Ok(Self::Cloudinary(CloudinaryHost::new(
                cloud_name.clone(),
                api_key.clone(),
                api_secret.clone(),
            ))),
            provider => Ok(Self::ObjectStore(ObjectStoreHost::from_config(
                provider,
                config.public_base_url.clone(),
            )?)),
        }
    }

    /// Provider name for logs.
    #[must_use]
    pub const fn provider_name(&self) -> &'static str {
        match self {
            Self::Cloudinary(_) => "cloudinary",
            Self::ObjectStore(_) => "object_store",
        }
    }
}

impl ImageHost for ImageStore {
    async fn upload(
        &self,
        path: &Path,
        folder: &str,
        file_name: Option<&str>,
    ) -> Result<HostedImage, StorageError> {
        match self {
            Self::Cloudinary(host) => host.upload(path, folder, file_name).await,
            Self::ObjectStore(host) => host.upload(path, folder, file_name).await,
        }
    }

    async fn delete(&self, url: &str) -> Result<bool, StorageError> {
        match self {
            Self::Cloudinary(host) => host.delete(url).await,
            Self::ObjectStore(host) => host.delete(url).await,
        }
    }
}

impl<H: ImageHost> ImageHost for std::sync::Arc<H> {
    fn upload(
        &self,
        path: &Path,
        folder: &str,
        file_name: Option<&str>,
    ) -> impl Future<Output = Result<HostedImage, StorageError>> + Send {
        (**self).upload(path, folder, file_name)
    }

    fn delete(&self, url: &str) -> impl Future<Output = Result<bool, StorageError>> + Send {
        (**self).delete(url)
    }
}

//! Pushes staged files to the image host.

use packline_shared::ImageConfig;
use tracing::{debug, warn};

use super::error::UploadError;
use super::staged::{StagedFile, StagedUploads};
use super::slot::UploadSlot;
use crate::storage::ImageHost;

/// Size and type limits for uploaded images.
#[derive(Debug, Clone)]
pub struct UploadLimits {
    /// Maximum file size in bytes.
    pub max_file_size: u64,
    /// Allowed MIME types.
    pub allowed_mime_types: Vec<String>,
}

impl UploadLimits {
    /// Default max file size: 10MB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

    /// Limits from the image configuration.
    #[must_use]
    pub fn from_config(config: &ImageConfig) -> Self {
        Self {
            max_file_size: config.max_file_size,
            allowed_mime_types: config.allowed_mime_types.clone(),
        }
    }

    /// Set maximum file size.
    #[must_use]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Check if a MIME type is allowed.
    #[must_use]
    pub fn is_mime_type_allowed(&self, mime_type: &str) -> bool {
        self.allowed_mime_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(mime_type))
    }

    /// Validate one staged file.
    ///
    /// # Errors
    ///
    /// Returns an error if file size or MIME type is invalid.
    pub fn check(&self, file: &StagedFile) -> Result<(), UploadError> {
        if file.size > self.max_file_size {
            return Err(UploadError::FileTooLarge {
                field: file.field_name.clone(),
                size: file.size,
                max: self.max_file_size,
            });
        }

        let mime_type = file
            .content_type
            .as_deref()
            .unwrap_or("application/octet-stream");
        if !self.is_mime_type_allowed(mime_type) {
            return Err(UploadError::InvalidMimeType {
                mime_type: mime_type.to_string(),
            });
        }

        Ok(())
    }
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self::from_config(&ImageConfig::default())
    }
}

/// Where a resource's uploads go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    /// Folder for main images.
    pub images_folder: String,
    /// Folder for content-block icons.
    pub icons_folder: String,
    /// Number of content blocks that can take an icon.
    pub icon_slots: usize,
}

impl UploadTarget {
    /// Target for a resource with main images only.
    #[must_use]
    pub fn images(folder: impl Into<String>) -> Self {
        let folder = folder.into();
        Self {
            icons_folder: folder.clone(),
            images_folder: folder,
            icon_slots: 0,
        }
    }
}

/// Durable URLs returned by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Published {
    /// Main image URLs, in arrival order.
    pub images: Vec<String>,
    /// Icon URLs with their content-block index.
    pub icons: Vec<(usize, String)>,
}

/// Validates staged uploads and publishes them to an [`ImageHost`].
pub struct UploadPipeline<H> {
    host: H,
    limits: UploadLimits,
}

impl<H: ImageHost> UploadPipeline<H> {
    /// Create a pipeline.
    #[must_use]
    pub const fn new(host: H, limits: UploadLimits) -> Self {
        Self { host, limits }
    }

    /// The limits enforced.
    #[must_use]
    pub const fn limits(&self) -> &UploadLimits {
        &self.limits
    }

    /// Check every file headed for the host. Files in unrecognized slots are
    /// skipped; they are never uploaded.
    ///
    /// # Errors
    ///
    /// Returns the first size or type violation.
    pub fn validate(&self, staged: &StagedUploads) -> Result<(), UploadError> {
        staged
            .iter()
            .filter(|file| file.slot != UploadSlot::Unrecognized)
            .try_for_each(|file| self.limits.check(file))
    }

    /// Upload every file with a destination, one at a time.
    ///
    /// Each local file is deleted as soon as its upload finishes or fails.
    /// Nothing is uploaded if validation fails. On a failed upload the
    /// remaining files are deleted; copies already on the host stay there.
    ///
    /// # Errors
    ///
    /// Returns a validation error or the first host failure.
    pub async fn publish(
        &self,
        staged: StagedUploads,
        target: &UploadTarget,
    ) -> Result<Published, UploadError> {
        if let Err(e) = self.validate(&staged) {
            staged.discard();
            return Err(e);
        }

        let sorted = staged.sort(target.icon_slots);
        let total = sorted.len();
        let mut published = Published::default();

        let mut images = sorted.images.into_iter();
        while let Some(file) = images.next() {
            match self.push(file, &target.images_folder).await {
                Ok(url) => published.images.push(url),
                Err(e) => {
                    images.for_each(StagedFile::discard);
                    sorted.icons.into_iter().for_each(|(_, f)| f.discard());
                    return Err(e);
                }
            }
        }

        let mut icons = sorted.icons.into_iter();
        while let Some((index, file)) = icons.next() {
            match self.push(file, &target.icons_folder).await {
                Ok(url) => published.icons.push((index, url)),
                Err(e) => {
                    icons.for_each(|(_, f)| f.discard());
                    return Err(e);
                }
            }
        }

        if total > 0 {
            debug!(
                images = published.images.len(),
                icons = published.icons.len(),
                "Uploads published"
            );
        }
        Ok(published)
    }

    /// Remove images a record no longer references from the host.
    ///
    /// Best effort: failures are logged and skipped. Returns how many
    /// images the host removed.
    pub async fn retire(&self, urls: &[String]) -> usize {
        let mut removed = 0;
        for url in urls {
            match self.host.delete(url).await {
                Ok(true) => removed += 1,
                Ok(false) => debug!(url = %url, "Image not held by host"),
                Err(e) => warn!(url = %url, error = %e, "Image removal failed"),
            }
        }
        removed
    }

    async fn push(&self, file: StagedFile, folder: &str) -> Result<String, UploadError> {
        let result = self
            .host
            .upload(file.path(), folder, file.file_name.as_deref())
            .await;

        let field = file.field_name.clone();
        file.discard();

        match result {
            Ok(hosted) => Ok(hosted.url),
            Err(e) => {
                warn!(field = %field, error = %e, "Image upload failed");
                Err(e.into())
            }
        }
    }
}

/// URLs in `before` that `after` no longer references. Blank entries are
/// skipped.
#[must_use]
pub fn orphaned(before: &[String], after: &[String]) -> Vec<String> {
    let mut gone: Vec<String> = before
        .iter()
        .filter(|url| !url.trim().is_empty() && !after.contains(url))
        .cloned()
        .collect();
    gone.dedup();
    gone
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;

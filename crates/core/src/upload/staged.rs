//! Uploaded files staged on local disk.
//!
//! Each file lives behind a [`TempPath`], so it is removed when the
//! [`StagedFile`] is dropped, whichever way the request ends.

use std::fs::File;
use std::io;
use std::path::Path;

use tempfile::TempPath;
use tracing::debug;

use super::slot::UploadSlot;

/// Create the temp file an upload is streamed into.
///
/// # Errors
///
/// Returns an error if the staging directory cannot be created or written.
pub fn staging_file(dir: &Path) -> io::Result<(File, TempPath)> {
    std::fs::create_dir_all(dir)?;
    let staged = tempfile::Builder::new()
        .prefix("upload-")
        .tempfile_in(dir)?;
    Ok(staged.into_parts())
}

/// One uploaded file waiting on local disk.
#[derive(Debug)]
pub struct StagedFile {
    /// Slot parsed from the field name.
    pub slot: UploadSlot,
    /// Raw multipart field name.
    pub field_name: String,
    /// Client-supplied file name.
    pub file_name: Option<String>,
    /// Client-supplied content type.
    pub content_type: Option<String>,
    /// Bytes written to disk.
    pub size: u64,
    /// Local path; removed on drop.
    pub path: TempPath,
}

impl StagedFile {
    /// Local path of the staged bytes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the local file now.
    pub fn discard(self) {
        let path = self.path.to_path_buf();
        if let Err(e) = self.path.close() {
            debug!(path = %path.display(), error = %e, "Staged file already gone");
        }
    }
}

/// Files staged for one request, in arrival order.
#[derive(Debug, Default)]
pub struct StagedUploads {
    files: Vec<StagedFile>,
}

/// Staged files sorted by destination.
#[derive(Debug, Default)]
pub struct SortedUploads {
    /// Main images, in arrival order.
    pub images: Vec<StagedFile>,
    /// Icons with their content-block index.
    pub icons: Vec<(usize, StagedFile)>,
}

impl SortedUploads {
    /// Total number of files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len() + self.icons.len()
    }

    /// Whether there is nothing to upload.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StagedUploads {
    /// No files.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a staged file.
    pub fn push(&mut self, file: StagedFile) {
        self.files.push(file);
    }

    /// Number of staged files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether nothing was staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate over staged files.
    pub fn iter(&self) -> impl Iterator<Item = &StagedFile> {
        self.files.iter()
    }

    /// Delete every staged file.
    pub fn discard(self) {
        for file in self.files {
            file.discard();
        }
    }

    /// Split into main images and icons.
    ///
    /// Files in unrecognized slots, icons for block `icon_slots` or beyond,
    /// and every icon after the first for a block are deleted here.
    #[must_use]
    pub fn sort(self, icon_slots: usize) -> SortedUploads {
        let mut sorted = SortedUploads::default();
        for file in self.files {
            match file.slot {
                UploadSlot::MainImage => sorted.images.push(file),
                UploadSlot::BlockIcon(index)
                    if index < icon_slots && !sorted.icons.iter().any(|(i, _)| *i == index) =>
                {
                    sorted.icons.push((index, file));
                }
                UploadSlot::BlockIcon(_) | UploadSlot::Unrecognized => {
                    debug!(field = %file.field_name, "Discarding upload with no destination");
                    file.discard();
                }
            }
        }
        sorted
    }
}

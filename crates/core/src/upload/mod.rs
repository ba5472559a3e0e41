//! Image uploads attached to product and blog requests.
//!
//! Files are streamed to local temp files as the request arrives
//! ([`StagedUploads`]), classified by field name ([`UploadSlot`]), checked
//! against [`UploadLimits`] and then pushed to the image host by
//! [`UploadPipeline`]. Local copies never outlive the request.

mod error;
mod pipeline;
mod slot;
mod staged;

pub use error::UploadError;
pub use pipeline::{Published, UploadLimits, UploadPipeline, UploadTarget, orphaned};
pub use slot::UploadSlot;
pub use staged::{SortedUploads, StagedFile, StagedUploads, staging_file};

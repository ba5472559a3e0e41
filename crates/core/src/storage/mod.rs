//! Image hosting.
//!
//! Uploaded images end up on one of two kinds of host:
//! - Cloudinary, through its signed upload API
//! - an object store through Apache OpenDAL: S3-compatible buckets, Azure
//!   Blob Storage, or a local directory in development
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │            ImageHost::upload(path)           │
//! ├───────────────────────┬──────────────────────┤
//! │ CloudinaryHost        │ ObjectStoreHost      │
//! │ POST /{cloud}/auto/   │ op.write(key, bytes) │
//! │      upload           │ url = base + key     │
//! └───────────────────────┴──────────────────────┘
//! ```

mod cloudinary;
mod error;
mod host;
mod object_store;

pub use cloudinary::CloudinaryHost;
pub use error::StorageError;
pub use host::{HostedImage, ImageHost, ImageStore};
pub use object_store::ObjectStoreHost;

//! Catalog resources: products, taxonomy terms, blogs and contact queries.
//!
//! Every resource runs through the same [`CatalogService`]: uniqueness checks
//! ignore case, lists are newest first and optionally paginated, and missing
//! IDs are reported as not found.

mod blog;
mod contact;
mod error;
mod fields;
mod product;
mod resource;
mod service;
mod term;

pub use blog::{
    Blog, BlogChanges, BlogDraft, BlogFilter, BlogForm, ContentBlock, apply_icons, content_icons,
    parse_content,
};
pub use contact::{
    ContactDraft, ContactFilter, ContactInput, ContactMessage, ContactQuery, ContactSearch,
    ValidContactMessage,
};
pub use error::CatalogError;
pub use fields::{FormFields, deserialize_flag, flag_filter, parse_flag, search_term};
pub use product::{
    HOME_PRODUCT_COUNT, Product, ProductChanges, ProductDraft, ProductFilter, ProductForm,
    ProductKey, merge_images,
};
pub use resource::{CatalogStore, Resource};
pub use service::CatalogService;
pub use term::{TaxonomyKind, Term, TermChanges, TermDraft, TermFilter, TermInput, TermKey};

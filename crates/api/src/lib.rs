//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes under `/api/v1`
//! - The auth gate middleware
//! - Request extractors
//! - The `{statusCode, data, message, success}` response envelope

pub mod error;
pub mod extract;
pub mod middleware;
pub mod response;
pub mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue, Method, header};
use sea_orm::DatabaseConnection;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use packline_core::account::AccountService;
use packline_core::catalog::{
    Blog, CatalogService, ContactQuery, Product, TaxonomyKind, Term,
};
use packline_core::storage::ImageStore;
use packline_core::upload::{UploadLimits, UploadPipeline};
use packline_db::{
    AdminRepository, BlogRepository, ContactRepository, ProductRepository, TermRepository,
};
use packline_shared::{EmailService, ImageConfig, JwtService};

pub use error::ApiError;
pub use response::ApiResponse;

/// Where uploads are staged and published.
#[derive(Debug, Clone)]
pub struct UploadSettings {
    /// Local directory for staged files.
    pub dir: PathBuf,
    /// Size and type limits.
    pub limits: UploadLimits,
    /// Host folder for product images.
    pub product_folder: String,
    /// Host folder for blog images.
    pub blog_folder: String,
    /// Host folder for blog content icons.
    pub blog_icon_folder: String,
}

impl UploadSettings {
    /// Builds settings from the image config and a staging directory.
    #[must_use]
    pub fn new(dir: PathBuf, images: &ImageConfig) -> Self {
        Self {
            dir,
            limits: UploadLimits::from_config(images),
            product_folder: images.product_folder.clone(),
            blog_folder: images.blog_folder.clone(),
            blog_icon_folder: images.blog_icon_folder.clone(),
        }
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Email service for OTPs and forwarded contact forms.
    pub email_service: Arc<EmailService>,
    /// Image host for uploads.
    pub images: Arc<ImageStore>,
    /// Upload staging and destinations.
    pub uploads: Arc<UploadSettings>,
}

/// Admin accounts backed by this state's database and mailer.
pub type Accounts = AccountService<AdminRepository, Arc<EmailService>>;

impl AppState {
    /// Account service.
    #[must_use]
    pub fn accounts(&self) -> Accounts {
        AccountService::new(
            AdminRepository::new((*self.db).clone()),
            Arc::clone(&self.email_service),
            Arc::clone(&self.jwt_service),
        )
    }

    /// Product catalog.
    #[must_use]
    pub fn products(&self) -> CatalogService<Product, ProductRepository> {
        CatalogService::new(ProductRepository::new((*self.db).clone()))
    }

    /// Categories, materials or sizes.
    #[must_use]
    pub fn terms(&self, kind: TaxonomyKind) -> CatalogService<Term, TermRepository> {
        CatalogService::new(TermRepository::new((*self.db).clone(), kind))
    }

    /// Blog posts.
    #[must_use]
    pub fn blogs(&self) -> CatalogService<Blog, BlogRepository> {
        CatalogService::new(BlogRepository::new((*self.db).clone()))
    }

    /// Contact queries.
    #[must_use]
    pub fn contacts(&self) -> CatalogService<ContactQuery, ContactRepository> {
        CatalogService::new(ContactRepository::new((*self.db).clone()))
    }

    /// Upload pipeline publishing to the configured image host.
    #[must_use]
    pub fn upload_pipeline(&self) -> UploadPipeline<Arc<ImageStore>> {
        UploadPipeline::new(Arc::clone(&self.images), self.uploads.limits.clone())
    }
}

/// Router options that come from server config rather than state.
#[derive(Debug, Clone, Default)]
pub struct RouterOptions {
    /// Allowed CORS origin; any origin when unset.
    pub cors_origin: Option<String>,
    /// Maximum request body size in bytes.
    pub max_body_bytes: Option<usize>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    create_router_with(state, &RouterOptions::default())
}

/// Creates the main application router with explicit options.
pub fn create_router_with(state: AppState, options: &RouterOptions) -> Router {
    let body_limit = options.max_body_bytes.unwrap_or(DEFAULT_MAX_BODY_BYTES);

    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(options.cors_origin.as_deref()))
        .with_state(state)
}

/// Default request body cap: a handful of images per request.
pub const DEFAULT_MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(middleware::TOKEN_HEADER),
        ]);

    match origin.and_then(|o| HeaderValue::from_str(o).ok()) {
        Some(origin) => layer
            .allow_origin(AllowOrigin::exact(origin))
            .allow_credentials(true),
        None => layer.allow_origin(Any),
    }
}

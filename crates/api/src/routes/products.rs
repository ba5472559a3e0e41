//! Product routes.
//!
//! Creates and updates accept multipart forms with `images` file parts; the
//! files are staged on disk while the request is read and only pushed to the
//! image host once the record is known not to conflict.

use axum::{
    Router,
    extract::State,
    middleware,
    routing::{get, post, put},
};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use packline_core::catalog::{
    BlogFilter, CatalogError, HOME_PRODUCT_COUNT, Product, ProductFilter, ProductForm,
    TaxonomyKind, TermFilter, merge_images, search_term,
};
use packline_core::upload::{UploadTarget, orphaned};

use super::{ApiResult, listing};
use crate::AppState;
use crate::extract::{FormData, ListQuery, ResourceId};
use crate::middleware::auth_middleware;
use crate::response::{ApiResponse, Empty};

/// Creates the product router.
pub fn routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/products", get(list_products))
        .route("/products/home", get(home_products))
        .route("/products/{id}", get(get_product));

    let protected = Router::new()
        .route("/products", post(create_product))
        .route("/products/{id}", put(update_product).delete(delete_product))
        .route("/products/dashboard/counts", get(dashboard_counts))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    public.merge(protected)
}

/// GET /products
///
/// Filters: `category`, `material`, `isActive`, and `name` (or `search`) as
/// a case-insensitive substring.
async fn list_products(
    State(state): State<AppState>,
    ListQuery(params): ListQuery,
) -> ApiResult<Value> {
    let filter = ProductFilter {
        category_id: params.id("category", params.category.as_deref())?,
        material_id: params.id("material", params.material.as_deref())?,
        is_active: params.is_active(),
        name: search_term(params.name.as_deref()).or_else(|| params.search()),
    };

    let page = state
        .products()
        .list(&filter, params.page_request())
        .await?;

    Ok(ApiResponse::ok(
        listing("products", page),
        "Products fetched successfully",
    ))
}

/// GET /products/home
///
/// The newest products for the storefront landing page.
async fn home_products(State(state): State<AppState>) -> ApiResult<Vec<Product>> {
    let products = state
        .products()
        .latest(&ProductFilter::default(), HOME_PRODUCT_COUNT)
        .await?;

    Ok(ApiResponse::ok(products, "Latest home screen products fetched"))
}

/// GET /products/{id}
async fn get_product(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> ApiResult<Product> {
    let product = state.products().get(id).await?;
    Ok(ApiResponse::ok(product, "Product fetched"))
}

/// POST /products
async fn create_product(State(state): State<AppState>, form: FormData) -> ApiResult<Product> {
    let FormData { fields, files } = form;

    let draft = match ProductForm::parse(&fields).and_then(ProductForm::into_draft) {
        Ok(draft) => draft,
        Err(e) => {
            files.discard();
            return Err(e.into());
        }
    };

    let pipeline = state.upload_pipeline();
    let target = UploadTarget::images(state.uploads.product_folder.clone());

    let product = state
        .products()
        .create_with(draft, |mut draft| async move {
            draft.images = pipeline.publish(files, &target).await?.images;
            Ok::<_, CatalogError>(draft)
        })
        .await?;

    info!(product_id = %product.id, images = product.images.len(), "Product created");
    Ok(ApiResponse::created(product, "Product created successfully"))
}

/// PUT /products/{id}
///
/// `existingImages` lists the current images to keep; new uploads are
/// appended after them. Without it every current image is kept. Images left
/// out of the list are removed from the image host.
async fn update_product(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    form: FormData,
) -> ApiResult<Product> {
    let FormData { fields, files } = form;

    let (changes, keep) = match ProductForm::parse(&fields) {
        Ok(parsed) => parsed.into_update(),
        Err(e) => {
            files.discard();
            return Err(e.into());
        }
    };

    let pipeline = state.upload_pipeline();
    let target = UploadTarget::images(state.uploads.product_folder.clone());
    let mut dropped = Vec::new();
    let dropped_slot = &mut dropped;

    let product = state
        .products()
        .update_with(id, changes, |current, mut changes| async move {
            let has_uploads = !files.is_empty();
            let uploaded = pipeline.publish(files, &target).await?.images;
            if keep.is_some() || has_uploads {
                let images = merge_images(&current.images, keep, uploaded);
                *dropped_slot = orphaned(&current.images, &images);
                changes.images = Some(images);
            }
            Ok::<_, CatalogError>(changes)
        })
        .await?;

    retire_images(&state, dropped);
    Ok(ApiResponse::ok(product, "Product updated successfully"))
}

/// Removes images a record stopped referencing, off the request path.
pub(super) fn retire_images(state: &AppState, urls: Vec<String>) {
    if urls.is_empty() {
        return;
    }
    let pipeline = state.upload_pipeline();
    tokio::spawn(async move {
        let removed = pipeline.retire(&urls).await;
        info!(removed, dropped = urls.len(), "Retired hosted images");
    });
}

/// DELETE /products/{id}
///
/// Hosted images are left in place.
async fn delete_product(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> ApiResult<Empty> {
    state.products().delete(id).await?;
    Ok(ApiResponse::ok(Empty {}, "Product deleted successfully"))
}

/// Record counts for the admin dashboard.
#[derive(Debug, Serialize)]
pub struct DashboardCounts {
    /// All products.
    pub products: u64,
    /// All categories.
    pub categories: u64,
    /// All materials.
    pub materials: u64,
    /// All sizes.
    pub sizes: u64,
    /// All blog posts.
    pub blogs: u64,
}

/// GET /products/dashboard/counts
async fn dashboard_counts(State(state): State<AppState>) -> ApiResult<DashboardCounts> {
    let products = state.products();
    let categories = state.terms(TaxonomyKind::Category);
    let materials = state.terms(TaxonomyKind::Material);
    let sizes = state.terms(TaxonomyKind::Size);
    let blogs = state.blogs();

    let all_products = ProductFilter::default();
    let all_terms = TermFilter::default();
    let all_blogs = BlogFilter::default();

    let (products, categories, materials, sizes, blogs) = tokio::try_join!(
        products.count(&all_products),
        categories.count(&all_terms),
        materials.count(&all_terms),
        sizes.count(&all_terms),
        blogs.count(&all_blogs),
    )?;

    Ok(ApiResponse::ok(
        DashboardCounts {
            products,
            categories,
            materials,
            sizes,
            blogs,
        },
        "Home screen counts fetched",
    ))
}

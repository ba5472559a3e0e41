//! Category, material and size routes.
//!
//! The three kinds share handlers; each kind's router carries its
//! [`TaxonomyKind`] as a request extension. Size reads are public, everything
//! else needs an admin.

use axum::{
    Extension, Router,
    extract::State,
    middleware,
    routing::{get, post, put},
};
use serde_json::Value;

use packline_core::catalog::{TaxonomyKind, Term, TermFilter, TermInput};

use super::{ApiResult, listing};
use crate::AppState;
use crate::extract::{ListQuery, ResourceId, ValidJson};
use crate::middleware::auth_middleware;
use crate::response::ApiResponse;

/// Creates the taxonomy router for all three kinds.
pub fn routes(state: &AppState) -> Router<AppState> {
    TaxonomyKind::ALL
        .into_iter()
        .fold(Router::new(), |router, kind| {
            router.merge(kind_routes(state, kind))
        })
}

/// Collection path segment and list key for a kind.
const fn collection(kind: TaxonomyKind) -> &'static str {
    match kind {
        TaxonomyKind::Category => "categories",
        TaxonomyKind::Material => "materials",
        TaxonomyKind::Size => "sizes",
    }
}

/// Storefront filters read sizes without logging in.
const fn public_reads(kind: TaxonomyKind) -> bool {
    matches!(kind, TaxonomyKind::Size)
}

fn kind_routes(state: &AppState, kind: TaxonomyKind) -> Router<AppState> {
    let base = format!("/{}", collection(kind));
    let item = format!("{base}/{{id}}");

    let reads = Router::new()
        .route(&base, get(list_terms))
        .route(&item, get(get_term));
    let writes = Router::new()
        .route(&base, post(create_term))
        .route(&item, put(update_term).delete(delete_term));
    let gate = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let router = if public_reads(kind) {
        reads.merge(writes.route_layer(gate))
    } else {
        reads.merge(writes).route_layer(gate)
    };

    router.layer(Extension(kind))
}

/// GET /{kind}
///
/// Filters: `search` (name substring) and `isActive`.
async fn list_terms(
    State(state): State<AppState>,
    Extension(kind): Extension<TaxonomyKind>,
    ListQuery(params): ListQuery,
) -> ApiResult<Value> {
    let filter = TermFilter {
        search: params.search(),
        is_active: params.is_active(),
    };

    let page = state
        .terms(kind)
        .list(&filter, params.page_request())
        .await?;

    Ok(ApiResponse::ok(
        listing(collection(kind), page),
        format!("Fetched {} successfully", collection(kind)),
    ))
}

/// GET /{kind}/{id}
async fn get_term(
    State(state): State<AppState>,
    Extension(kind): Extension<TaxonomyKind>,
    ResourceId(id): ResourceId,
) -> ApiResult<Term> {
    let term = state.terms(kind).get(id).await?;
    Ok(ApiResponse::ok(
        term,
        format!("Fetched {} successfully", kind.label().to_lowercase()),
    ))
}

/// POST /{kind}
async fn create_term(
    State(state): State<AppState>,
    Extension(kind): Extension<TaxonomyKind>,
    ValidJson(input): ValidJson<TermInput>,
) -> ApiResult<Term> {
    let term = state.terms(kind).create(input.into_draft()?).await?;
    Ok(ApiResponse::created(
        term,
        format!("{} created successfully", kind.label()),
    ))
}

/// PUT /{kind}/{id}
async fn update_term(
    State(state): State<AppState>,
    Extension(kind): Extension<TaxonomyKind>,
    ResourceId(id): ResourceId,
    ValidJson(input): ValidJson<TermInput>,
) -> ApiResult<Term> {
    let term = state
        .terms(kind)
        .update(id, input.into_changes()?)
        .await?;
    Ok(ApiResponse::ok(
        term,
        format!("{} updated successfully", kind.label()),
    ))
}

/// DELETE /{kind}/{id}
async fn delete_term(
    State(state): State<AppState>,
    Extension(kind): Extension<TaxonomyKind>,
    ResourceId(id): ResourceId,
) -> ApiResult<Option<()>> {
    state.terms(kind).delete(id).await?;
    Ok(ApiResponse::ok(
        None,
        format!("{} deleted successfully", kind.label()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_sizes_read_publicly() {
        assert!(public_reads(TaxonomyKind::Size));
        assert!(!public_reads(TaxonomyKind::Category));
        assert!(!public_reads(TaxonomyKind::Material));
    }

    #[test]
    fn test_collections_are_distinct() {
        let names: Vec<_> = TaxonomyKind::ALL.into_iter().map(collection).collect();
        assert_eq!(names, ["categories", "materials", "sizes"]);
    }
}

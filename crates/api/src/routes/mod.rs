//! API route definitions.
//!
//! Each module returns its own router with public and gated routes already
//! separated; the gate is applied per module with `route_layer` so a path can
//! be public for `GET` and gated for writes.

use axum::Router;
use serde::Serialize;
use serde_json::{Value, json};

use packline_shared::Page;

use crate::AppState;
use crate::error::ApiError;
use crate::response::ApiResponse;

pub mod admin;
pub mod blogs;
pub mod contacts;
pub mod health;
pub mod products;
pub mod taxonomy;

/// Result type for route handlers.
pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

/// Creates the API router with all routes.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(admin::routes(&state))
        .merge(products::routes(&state))
        .merge(taxonomy::routes(&state))
        .merge(blogs::routes(&state))
        .merge(contacts::routes(&state))
}

/// List payload: `{<key>: [...], pagination}`.
fn listing<T: Serialize>(key: &str, page: Page<T>) -> Value {
    json!({
        key: page.items,
        "pagination": page.pagination,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use packline_shared::PageRequest;

    #[test]
    fn test_listing_names_the_collection() {
        let request = PageRequest::from_query(Some("1"), Some("2"));
        let page = Page::new(vec!["a", "b"], &request, 5);

        let value = listing("sizes", page);

        assert_eq!(value["sizes"], json!(["a", "b"]));
        assert_eq!(value["pagination"]["total"], 5);
        assert!(value.get("items").is_none());
    }
}

//! Contact query routes. Anyone can submit; only admins can read.

use axum::{
    Router,
    extract::State,
    middleware,
    routing::{get, post},
};
use serde_json::Value;
use tracing::info;

use packline_core::catalog::{ContactFilter, ContactInput, ContactQuery};

use super::{ApiResult, listing};
use crate::AppState;
use crate::extract::{ListQuery, ValidJson};
use crate::middleware::auth_middleware;
use crate::response::ApiResponse;

/// Creates the contact router.
pub fn routes(state: &AppState) -> Router<AppState> {
    let public = Router::new().route("/contacts", post(create_contact));

    let protected = Router::new()
        .route("/contacts", get(list_contacts))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    public.merge(protected)
}

/// POST /contacts
async fn create_contact(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<ContactInput>,
) -> ApiResult<ContactQuery> {
    let contact = state.contacts().create(input.into_draft()?).await?;
    info!(contact_id = %contact.id, "Contact query received");
    Ok(ApiResponse::created(
        contact,
        "Contact query created successfully",
    ))
}

/// GET /contacts
///
/// Admin only. The storefront this replaces served the list publicly.
///
/// An all-digit `search` matches phone numbers; anything else matches names,
/// email and message text.
async fn list_contacts(
    State(state): State<AppState>,
    ListQuery(params): ListQuery,
) -> ApiResult<Value> {
    let filter = ContactFilter::from_search(params.search.as_deref());
    let page = state
        .contacts()
        .list(&filter, params.page_request())
        .await?;

    let message = if page.items.is_empty() {
        "No contact queries found"
    } else {
        "Contact queries fetched successfully"
    };
    Ok(ApiResponse::ok(listing("contacts", page), message))
}

//! Blog routes.

use axum::{
    Router,
    extract::State,
    middleware,
    routing::{get, post, put},
};
use serde_json::Value;

use packline_core::catalog::{
    Blog, BlogFilter, BlogForm, CatalogError, apply_icons, content_icons,
};
use packline_core::upload::{UploadTarget, orphaned};

use super::products::retire_images;
use super::{ApiResult, listing};
use crate::AppState;
use crate::extract::{FormData, ListQuery, ResourceId};
use crate::middleware::auth_middleware;
use crate::response::ApiResponse;

/// Creates the blog router.
pub fn routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/blogs", get(list_blogs))
        .route("/blogs/{id}", get(get_blog));

    let protected = Router::new()
        .route("/blogs", post(create_blog))
        .route("/blogs/{id}", put(update_blog).delete(delete_blog))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    public.merge(protected)
}

fn upload_target(state: &AppState, icon_slots: usize) -> UploadTarget {
    UploadTarget {
        images_folder: state.uploads.blog_folder.clone(),
        icons_folder: state.uploads.blog_icon_folder.clone(),
        icon_slots,
    }
}

/// GET /blogs
async fn list_blogs(
    State(state): State<AppState>,
    ListQuery(params): ListQuery,
) -> ApiResult<Value> {
    let filter = BlogFilter {
        is_active: params.is_active(),
        search: params.search(),
    };

    let page = state.blogs().list(&filter, params.page_request()).await?;
    Ok(ApiResponse::ok(listing("blogs", page), "Fetched all blogs"))
}

/// GET /blogs/{id}
async fn get_blog(State(state): State<AppState>, ResourceId(id): ResourceId) -> ApiResult<Blog> {
    let blog = state.blogs().get(id).await?;
    Ok(ApiResponse::ok(blog, "Fetched blog successfully"))
}

/// POST /blogs
///
/// `images` parts become the gallery; `content[n][icon]` parts become the
/// icon of content block `n`.
async fn create_blog(State(state): State<AppState>, form: FormData) -> ApiResult<Blog> {
    let FormData { fields, files } = form;

    let parsed = BlogForm::parse(&fields).and_then(|blog| {
        let slots = blog.icon_slots();
        blog.into_draft().map(|draft| (draft, slots))
    });
    let (draft, slots) = match parsed {
        Ok(parsed) => parsed,
        Err(e) => {
            files.discard();
            return Err(e.into());
        }
    };

    let pipeline = state.upload_pipeline();
    let target = upload_target(&state, slots);

    let blog = state
        .blogs()
        .create_with(draft, |mut draft| async move {
            let published = pipeline.publish(files, &target).await?;
            draft.images = published.images;
            apply_icons(&mut draft.content, published.icons);
            Ok::<_, CatalogError>(draft)
        })
        .await?;

    Ok(ApiResponse::created(blog, "Blog created successfully"))
}

/// PUT /blogs/{id}
///
/// New `images` are appended to the gallery. Icons only apply when `content`
/// is sent, since they index into it; icons the new content no longer uses
/// are removed from the image host.
async fn update_blog(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    form: FormData,
) -> ApiResult<Blog> {
    let FormData { fields, files } = form;

    let blog = match BlogForm::parse(&fields) {
        Ok(blog) => blog,
        Err(e) => {
            files.discard();
            return Err(e.into());
        }
    };

    let pipeline = state.upload_pipeline();
    let target = upload_target(&state, blog.icon_slots());
    let changes = blog.into_changes();
    let mut dropped = Vec::new();
    let dropped_slot = &mut dropped;

    let blog = state
        .blogs()
        .update_with(id, changes, |current, mut changes| async move {
            let published = pipeline.publish(files, &target).await?;
            if let Some(content) = changes.content.as_mut() {
                apply_icons(content, published.icons);
                *dropped_slot = orphaned(&content_icons(&current.content), &content_icons(content));
            }
            if !published.images.is_empty() {
                let mut images = current.images;
                images.extend(published.images);
                changes.images = Some(images);
            }
            Ok::<_, CatalogError>(changes)
        })
        .await?;

    retire_images(&state, dropped);
    Ok(ApiResponse::ok(blog, "Blog updated successfully"))
}

/// DELETE /blogs/{id}
async fn delete_blog(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> ApiResult<Option<()>> {
    state.blogs().delete(id).await?;
    Ok(ApiResponse::ok(None, "Blog deleted successfully"))
}

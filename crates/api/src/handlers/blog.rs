//! Handlers for the `/blogs` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use rigline_core::error::CoreError;
use rigline_core::types::DbId;
use rigline_db::models::blog::{Blog, CreateBlog, UpdateBlog};
use rigline_db::repositories::BlogRepo;

use crate::auth::middleware::AuthAdmin;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters for the blog listing.
#[derive(Debug, Default, Deserialize)]
pub struct BlogListQuery {
    #[serde(default)]
    pub published_only: bool,
}

/// POST /api/v1/blogs
pub async fn create(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Json(input): Json<CreateBlog>,
) -> AppResult<(StatusCode, Json<Blog>)> {
    let blog = BlogRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(blog)))
}

/// GET /api/v1/blogs
pub async fn list(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Query(query): Query<BlogListQuery>,
) -> AppResult<Json<Vec<Blog>>> {
    let blogs = BlogRepo::list(&state.pool, query.published_only).await?;
    Ok(Json(blogs))
}

/// GET /api/v1/blogs/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<Blog>> {
    let blog = BlogRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Blog", id })?;
    Ok(Json(blog))
}

/// GET /api/v1/blogs/slug/{slug}
pub async fn get_by_slug(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(slug): Path<String>,
) -> AppResult<Json<Blog>> {
    let blog = BlogRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No blog post with slug '{slug}'")))?;
    Ok(Json(blog))
}

/// PUT /api/v1/blogs/{id}
pub async fn update(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBlog>,
) -> AppResult<Json<Blog>> {
    let blog = BlogRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound { entity: "Blog", id })?;
    Ok(Json(blog))
}

/// DELETE /api/v1/blogs/{id}
pub async fn delete(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = BlogRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(CoreError::NotFound { entity: "Blog", id }.into());
    }
    Ok(StatusCode::NO_CONTENT)
}

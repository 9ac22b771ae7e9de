//! Handlers for the `/services` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use rigline_core::error::CoreError;
use rigline_core::types::DbId;
use rigline_db::models::service::{CreateService, Service, UpdateService};
use rigline_db::repositories::ServiceRepo;

use crate::auth::middleware::AuthAdmin;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters for the service listing.
#[derive(Debug, Default, Deserialize)]
pub struct ServiceListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

/// POST /api/v1/services
pub async fn create(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Json(input): Json<CreateService>,
) -> AppResult<(StatusCode, Json<Service>)> {
    let service = ServiceRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(service)))
}

/// GET /api/v1/services
pub async fn list(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Query(query): Query<ServiceListQuery>,
) -> AppResult<Json<Vec<Service>>> {
    let services = ServiceRepo::list(&state.pool, query.include_inactive).await?;
    Ok(Json(services))
}

/// GET /api/v1/services/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<Service>> {
    let service = ServiceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Service",
            id,
        })?;
    Ok(Json(service))
}

/// GET /api/v1/services/slug/{slug}
pub async fn get_by_slug(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(slug): Path<String>,
) -> AppResult<Json<Service>> {
    let service = ServiceRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No service page with slug '{slug}'")))?;
    Ok(Json(service))
}

/// PUT /api/v1/services/{id}
pub async fn update(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateService>,
) -> AppResult<Json<Service>> {
    let service = ServiceRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Service",
            id,
        })?;
    Ok(Json(service))
}

/// DELETE /api/v1/services/{id}
pub async fn delete(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ServiceRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(CoreError::NotFound {
            entity: "Service",
            id,
        }
        .into());
    }
    Ok(StatusCode::NO_CONTENT)
}

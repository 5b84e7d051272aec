//! Request handlers.
//!
//! Each handler is a thin shim: extract, call the [`HeroStore`], serialize.
//! Extraction failures are turned into `400 { "message": ... }` rather than
//! axum's plain-text rejections.
//!
//! [`HeroStore`]: herodex_core::HeroStore

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use herodex_core::{Error, Hero, HeroId, HeroPage, HeroPatch, HeroQuery, ListParams, NewHero};

use crate::api::{DeleteResponse, HealthResponse, MessageResponse};
use crate::error::ApiError;
use crate::server::AppState;

type ApiResult<T> = Result<T, ApiError>;

/// `GET /`
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new("The API is working!"))
}

/// Fallback for paths no route matches.
pub async fn route_not_found() -> (StatusCode, Json<MessageResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(MessageResponse::new("Route not found.")),
    )
}

/// Fallback for a known path hit with an unsupported method.
pub async fn method_not_allowed() -> (StatusCode, Json<MessageResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(MessageResponse::new("Method not allowed.")),
    )
}

/// `GET /health`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        heroes: state.store.len().await,
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

/// `GET /api/heroes` (and `/api/heroes/`)
pub async fn list_heroes(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<HeroPage>> {
    let Query(params) = params?;
    let query = HeroQuery::from(&params);

    tracing::debug!(?query, "Listing heroes");
    Ok(Json(state.store.list(&query).await))
}

/// `GET /api/heroes/:heroName`
pub async fn get_hero(
    State(state): State<Arc<AppState>>,
    Path(hero_name): Path<String>,
) -> ApiResult<Json<Hero>> {
    let hero = state.store.find_by_localized_name(&hero_name).await?;
    Ok(Json(hero))
}

/// `PUT /api/heroes/:id`
pub async fn update_hero(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<HeroPatch>, JsonRejection>,
) -> ApiResult<Json<Hero>> {
    let id = parse_id(&id)?;
    let Json(patch) = payload?;

    tracing::debug!(id, ?patch, "Update request");
    let hero = state.store.update(id, patch).await?;
    Ok(Json(hero))
}

/// `POST /api/create-hero`
pub async fn create_hero(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewHero>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Hero>)> {
    let Json(new_hero) = payload?;

    tracing::debug!(?new_hero, "Create request");
    let hero = state.store.insert(new_hero).await?;
    Ok((StatusCode::CREATED, Json(hero)))
}

/// `DELETE /api/heroes/:id`
pub async fn delete_hero(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let id = parse_id(&id)?;
    let deleted_hero = state.store.delete(id).await?;

    Ok(Json(DeleteResponse {
        message: "Hero deleted successfully".to_string(),
        deleted_hero,
    }))
}

fn parse_id(raw: &str) -> ApiResult<HeroId> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError(Error::invalid_request(format!("Invalid hero id: {raw}"))))
}

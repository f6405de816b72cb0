//! Publisher endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use super::{AuthenticatedUser, JsonBody, PathParam};
use crate::{
    error::{AppResult, ErrorResponse},
    models::publisher::{CreatePublisher, Publisher, PublisherSearch, UpdatePublisher},
    AppState,
};

/// Add a publisher (admin only)
#[utoipa::path(
    post,
    path = "/v1/publishers",
    tag = "publishers",
    security(("bearer_auth" = [])),
    request_body = CreatePublisher,
    responses(
        (status = 201, description = "Publisher created", body = Publisher),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Not an administrator", body = ErrorResponse),
        (status = 409, description = "Publisher already exists", body = ErrorResponse)
    )
)]
pub async fn add_publisher(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    JsonBody(publisher): JsonBody<CreatePublisher>,
) -> AppResult<(StatusCode, Json<Publisher>)> {
    claims.require_admin("User not allowed to Add a Publisher")?;

    let created = state.services.publishers.add(publisher).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Get publisher by ID
#[utoipa::path(
    get,
    path = "/v1/publishers/{id}",
    tag = "publishers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Publisher ID")),
    responses(
        (status = 200, description = "Publisher details", body = Publisher),
        (status = 404, description = "Publisher not found", body = ErrorResponse)
    )
)]
pub async fn get_publisher(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<Publisher>> {
    let publisher = state.services.publishers.get(id).await?;
    Ok(Json(publisher))
}

/// Update publisher contact details (admin only)
#[utoipa::path(
    put,
    path = "/v1/publishers/{id}",
    tag = "publishers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Publisher ID")),
    request_body = UpdatePublisher,
    responses(
        (status = 200, description = "Publisher updated", body = Publisher),
        (status = 401, description = "Not an administrator", body = ErrorResponse),
        (status = 404, description = "Publisher not found", body = ErrorResponse)
    )
)]
pub async fn update_publisher(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    PathParam(id): PathParam<i32>,
    JsonBody(publisher): JsonBody<UpdatePublisher>,
) -> AppResult<Json<Publisher>> {
    claims.require_admin("User not allowed to update a Publisher")?;

    let updated = state.services.publishers.update(id, publisher).await?;
    Ok(Json(updated))
}

/// Delete a publisher (admin only)
#[utoipa::path(
    delete,
    path = "/v1/publishers/{id}",
    tag = "publishers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Publisher ID")),
    responses(
        (status = 202, description = "Publisher deleted"),
        (status = 401, description = "Not an administrator", body = ErrorResponse),
        (status = 404, description = "Publisher not found", body = ErrorResponse)
    )
)]
pub async fn delete_publisher(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    PathParam(id): PathParam<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin("User not allowed to delete a Publisher")?;

    state.services.publishers.delete(id).await?;
    Ok(StatusCode::ACCEPTED)
}

/// Search publishers by name
#[utoipa::path(
    get,
    path = "/v1/publishers/search",
    tag = "publishers",
    security(("bearer_auth" = [])),
    params(PublisherSearch),
    responses(
        (status = 200, description = "Matching publishers", body = Vec<Publisher>),
        (status = 400, description = "No name given", body = ErrorResponse)
    )
)]
pub async fn search_publishers(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(search): Query<PublisherSearch>,
) -> AppResult<Json<Vec<Publisher>>> {
    let publishers = state.services.publishers.search(search.name).await?;
    Ok(Json(publishers))
}

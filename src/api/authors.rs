//! Author endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use super::{AuthenticatedUser, JsonBody, PathParam};
use crate::{
    error::{AppResult, ErrorResponse},
    models::author::{Author, AuthorSearch, CreateAuthor, UpdateAuthor},
    AppState,
};

/// Add an author (admin only)
#[utoipa::path(
    post,
    path = "/v1/authors",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Not an administrator", body = ErrorResponse),
        (status = 409, description = "Author already exists", body = ErrorResponse)
    )
)]
pub async fn add_author(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    JsonBody(author): JsonBody<CreateAuthor>,
) -> AppResult<(StatusCode, Json<Author>)> {
    claims.require_admin("User not allowed to Add a Author")?;

    let created = state.services.authors.add(author).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Get author by ID
#[utoipa::path(
    get,
    path = "/v1/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = Author),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<Author>> {
    let author = state.services.authors.get(id).await?;
    Ok(Json(author))
}

/// Update an author's date of birth or gender (admin only)
#[utoipa::path(
    put,
    path = "/v1/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    request_body = UpdateAuthor,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 401, description = "Not an administrator", body = ErrorResponse),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    PathParam(id): PathParam<i32>,
    JsonBody(author): JsonBody<UpdateAuthor>,
) -> AppResult<Json<Author>> {
    claims.require_admin("User not allowed to update a Author")?;

    let updated = state.services.authors.update(id, author).await?;
    Ok(Json(updated))
}

/// Delete an author (admin only)
#[utoipa::path(
    delete,
    path = "/v1/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 202, description = "Author deleted"),
        (status = 401, description = "Not an administrator", body = ErrorResponse),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    PathParam(id): PathParam<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin("User not allowed to delete a Author")?;

    state.services.authors.delete(id).await?;
    Ok(StatusCode::ACCEPTED)
}

/// Search authors by first and/or last name
#[utoipa::path(
    get,
    path = "/v1/authors/search",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(AuthorSearch),
    responses(
        (status = 200, description = "Matching authors", body = Vec<Author>),
        (status = 400, description = "No name given", body = ErrorResponse)
    )
)]
pub async fn search_authors(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(search): Query<AuthorSearch>,
) -> AppResult<Json<Vec<Author>>> {
    let authors = state
        .services
        .authors
        .search(search.first_name, search.last_name)
        .await?;
    Ok(Json(authors))
}

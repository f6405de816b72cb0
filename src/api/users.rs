//! User endpoints: registration, self-service profile and book issuance

use std::collections::BTreeSet;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use super::{AuthenticatedUser, JsonBody, PathParam};
use crate::{
    error::{AppResult, ErrorResponse},
    models::{
        issuance::IssueBookResponse,
        user::{CreateUser, SelfService, UpdateUser, User, UserSearch, UserShort},
    },
    AppState,
};

/// Register a new user (no login required)
#[utoipa::path(
    post,
    path = "/v1/users",
    tag = "users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User registered", body = User),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Username already taken", body = ErrorResponse)
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    JsonBody(user): JsonBody<CreateUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    let created = state.services.users.register(user).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Get your own user record
#[utoipa::path(
    get,
    path = "/v1/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 401, description = "Not the owner of this record", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<User>> {
    claims.require_owner(id, SelfService::Read)?;

    let user = state.services.users.get(id).await?;
    Ok(Json(user))
}

/// Update your own e-mail, phone number or password
#[utoipa::path(
    put,
    path = "/v1/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 401, description = "Not the owner of this record", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    PathParam(id): PathParam<i32>,
    JsonBody(user): JsonBody<UpdateUser>,
) -> AppResult<Json<User>> {
    claims.require_owner(id, SelfService::Update)?;

    let updated = state.services.users.update(id, user).await?;
    Ok(Json(updated))
}

/// Delete your own account
#[utoipa::path(
    delete,
    path = "/v1/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 202, description = "User deleted"),
        (status = 401, description = "Not the owner of this record", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    PathParam(id): PathParam<i32>,
) -> AppResult<StatusCode> {
    claims.require_owner(id, SelfService::Delete)?;

    state.services.users.delete(id).await?;
    Ok(StatusCode::ACCEPTED)
}

/// Search users by first and/or last name (no login required)
#[utoipa::path(
    get,
    path = "/v1/users/search",
    tag = "users",
    params(UserSearch),
    responses(
        (status = 200, description = "Matching users", body = Vec<UserShort>),
        (status = 400, description = "No name given", body = ErrorResponse)
    )
)]
pub async fn search_users(
    State(state): State<AppState>,
    Query(search): Query<UserSearch>,
) -> AppResult<Json<Vec<UserShort>>> {
    let users = state
        .services
        .users
        .search(search.first_name, search.last_name)
        .await?;
    Ok(Json(users))
}

/// Issue or re-issue books to a user (admin only)
#[utoipa::path(
    put,
    path = "/v1/users/{id}/books",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body(content = Vec<i32>, description = "Book IDs to issue"),
    responses(
        (status = 200, description = "Per-book issuance outcome", body = IssueBookResponse),
        (status = 400, description = "Empty book list", body = ErrorResponse),
        (status = 401, description = "Not an administrator", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn issue_books(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    PathParam(id): PathParam<i32>,
    JsonBody(book_ids): JsonBody<BTreeSet<i32>>,
) -> AppResult<Json<IssueBookResponse>> {
    claims.require_admin("User attempted to issue Books. Disallowed.")?;

    let response = state.services.users.issue_books(id, book_ids).await?;
    Ok(Json(response))
}

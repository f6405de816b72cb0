//! Authentication endpoints

use axum::{extract::State, http::header::AUTHORIZATION, response::IntoResponse, Json};

use super::JsonBody;
use crate::{
    error::AppResult,
    models::user::{LoginRequest, LoginResponse},
    AppState,
};

/// Login with username and password
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful; the token is also sent in the Authorization header", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let token = state
        .services
        .auth
        .authenticate(&request.username, &request.password)
        .await?;

    let bearer = format!("Bearer {}", token);
    Ok((
        [(AUTHORIZATION, bearer)],
        Json(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
        }),
    ))
}

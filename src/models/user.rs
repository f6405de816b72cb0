//! User model, authentication claims and related types

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{
    enums::{Gender, Role},
    non_blank, validate_past_date, PHONE_NUMBER,
};
use crate::error::AppError;

/// Internal row structure for database queries
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i32,
    pub username: String,
    /// Hashed password (argon2)
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub phone_number: Option<String>,
    pub email_id: Option<String>,
    pub role: Role,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            user_id: row.id,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            date_of_birth: row.date_of_birth,
            gender: row.gender.and_then(|g| g.parse().ok()),
            phone_number: row.phone_number,
            email_id: row.email_id,
            role: row.role,
        }
    }
}

/// Library user. The password hash never leaves the repository layer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: i32,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub phone_number: Option<String>,
    pub email_id: Option<String>,
    pub role: Role,
}

/// Public search result
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserShort {
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Registration request. Self-registered accounts always get the USER role.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[validate(length(min = 1, max = 50, message = "Username must be between 1 and 50 characters"))]
    pub username: String,
    /// Falls back to the configured default password when omitted
    #[validate(length(min = 8, max = 20, message = "Password must be between 8 and 20 characters"))]
    pub password: Option<String>,
    #[validate(length(min = 1, max = 50, message = "First Name must be between 1 and 50 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Last Name must be between 1 and 50 characters"))]
    pub last_name: Option<String>,
    #[validate(custom(function = "validate_past_date"))]
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    #[validate(regex(path = *PHONE_NUMBER, message = "Please enter phone number in format 123-456-789"))]
    pub phone_number: Option<String>,
    #[validate(email(message = "Please enter a valid EmailId"))]
    pub email_id: Option<String>,
}

/// Update user request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[validate(email(message = "Please enter a valid EmailId"))]
    pub email_id: Option<String>,
    #[validate(regex(path = *PHONE_NUMBER, message = "Please enter phone number in format 123-456-789"))]
    pub phone_number: Option<String>,
    #[validate(length(min = 8, max = 20, message = "Password must be between 8 and 20 characters"))]
    pub password: Option<String>,
}

impl UpdateUser {
    pub fn normalized(self) -> Self {
        Self {
            email_id: non_blank(self.email_id),
            phone_number: non_blank(self.phone_number),
            password: non_blank(self.password),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.email_id.is_none() && self.phone_number.is_none() && self.password.is_none()
    }
}

/// User search parameters
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct UserSearch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
}

/// Operations a user may only perform on their own record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfService {
    Read,
    Update,
    Delete,
}

impl SelfService {
    fn admin_refusal(&self) -> &'static str {
        match self {
            SelfService::Read => "Even an admin user is not allowed to get a user's details",
            SelfService::Update => "Even an admin user is not allowed to update a user's details",
            SelfService::Delete => "Even an admin user is not allowed to delete a user",
        }
    }

    fn other_user_refusal(&self) -> &'static str {
        match self {
            SelfService::Read => "Not allowed to get the details of another user",
            SelfService::Update => "Not allowed to update the details of another user",
            SelfService::Delete => "Not allowed to delete another user",
        }
    }
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    /// Username
    pub sub: String,
    #[serde(rename = "userId")]
    pub user_id: i32,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    pub fn new(user_id: i32, username: &str, role: Role, ttl_minutes: u64) -> Self {
        let now = Utc::now();
        Self {
            sub: username.to_string(),
            user_id,
            role,
            iat: now.timestamp(),
            exp: (now + Duration::minutes(ttl_minutes as i64)).timestamp(),
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
        encode(
            &Header::new(Algorithm::HS512),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token, rejecting bad signatures and expired tokens
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS512),
        )?;
        Ok(token_data.claims)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Require admin privileges; `refusal` is reported to the caller
    pub fn require_admin(&self, refusal: &str) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            tracing::warn!(user_id = self.user_id, "Non-admin request refused: {}", refusal);
            Err(AppError::Unauthorized(refusal.to_string()))
        }
    }

    /// Only a USER acting on their own record passes
    pub fn require_owner(&self, user_id: i32, operation: SelfService) -> Result<(), AppError> {
        if self.is_admin() {
            tracing::warn!(user_id = self.user_id, target = user_id, "Admin refused on self-service endpoint");
            return Err(AppError::Unauthorized(operation.admin_refusal().to_string()));
        }
        if self.user_id != user_id {
            tracing::warn!(user_id = self.user_id, target = user_id, "Access to another user's record refused");
            return Err(AppError::Unauthorized(operation.other_user_refusal().to_string()));
        }
        Ok(())
    }
}

//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{enums::Gender, validate_past_date};

/// Internal row structure for database queries (gender stored as text)
#[derive(Debug, Clone, FromRow)]
pub struct AuthorRow {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
}

impl From<AuthorRow> for Author {
    fn from(row: AuthorRow) -> Self {
        Author {
            author_id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            date_of_birth: row.date_of_birth,
            gender: row.gender.and_then(|g| g.parse().ok()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub author_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
}

/// Create author request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuthor {
    #[validate(length(min = 1, max = 50, message = "First name must be between 1 and 50 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50, message = "Last name must be between 1 and 50 characters"))]
    pub last_name: String,
    #[validate(custom(function = "validate_past_date"))]
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
}

/// Update author request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAuthor {
    #[validate(custom(function = "validate_past_date"))]
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
}

impl UpdateAuthor {
    pub fn is_empty(&self) -> bool {
        self.date_of_birth.is_none() && self.gender.is_none()
    }
}

/// Author search parameters
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSearch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_future_birth_date_rejected() {
        let author = CreateAuthor {
            first_name: "Ursula".into(),
            last_name: "Le Guin".into(),
            date_of_birth: Some(Utc::now().date_naive() + Duration::days(2)),
            gender: Some(Gender::Female),
        };
        let errors = author.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("date_of_birth"));
    }

    #[test]
    fn test_author_request_json() {
        let author: CreateAuthor = serde_json::from_str(
            r#"{"firstName":"Terry","lastName":"Pratchett","dateOfBirth":"1948-04-28","gender":"Male"}"#,
        )
        .unwrap();
        assert!(author.validate().is_ok());
        assert_eq!(author.gender, Some(Gender::Male));
        assert_eq!(author.date_of_birth, NaiveDate::from_ymd_opt(1948, 4, 28));
    }

    #[test]
    fn test_row_with_unknown_gender() {
        let author = Author::from(AuthorRow {
            id: 1,
            first_name: "A".into(),
            last_name: "B".into(),
            date_of_birth: None,
            gender: Some("?".into()),
        });
        assert!(author.gender.is_none());
    }
}

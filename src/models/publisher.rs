//! Publisher model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{non_blank, PHONE_NUMBER};

/// Internal row structure for database queries
#[derive(Debug, Clone, FromRow)]
pub struct PublisherRow {
    pub id: i32,
    pub name: String,
    pub email_id: Option<String>,
    pub phone_number: Option<String>,
}

impl From<PublisherRow> for Publisher {
    fn from(row: PublisherRow) -> Self {
        Publisher {
            publisher_id: row.id,
            name: row.name,
            email_id: row.email_id,
            phone_number: row.phone_number,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Publisher {
    pub publisher_id: i32,
    pub name: String,
    pub email_id: Option<String>,
    pub phone_number: Option<String>,
}

/// Create publisher request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePublisher {
    #[validate(length(min = 1, max = 50, message = "Publisher name must be between 1 and 50 characters"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid Email Id"))]
    pub email_id: Option<String>,
    #[validate(regex(path = *PHONE_NUMBER, message = "Please enter phone number in format 123-456-789"))]
    pub phone_number: Option<String>,
}

/// Update publisher request. Only contact details can change.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePublisher {
    #[validate(email(message = "Please enter a valid Email Id"))]
    pub email_id: Option<String>,
    #[validate(regex(path = *PHONE_NUMBER, message = "Please enter phone number in format 123-456-789"))]
    pub phone_number: Option<String>,
}

impl UpdatePublisher {
    pub fn normalized(self) -> Self {
        Self {
            email_id: non_blank(self.email_id),
            phone_number: non_blank(self.phone_number),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.email_id.is_none() && self.phone_number.is_none()
    }
}

/// Publisher search parameters
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PublisherSearch {
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_publisher_validation() {
        let ok = CreatePublisher {
            name: "Penguin".into(),
            email_id: Some("contact@penguin.com".into()),
            phone_number: Some("123-456-789".into()),
        };
        assert!(ok.validate().is_ok());

        let bad = CreatePublisher {
            name: String::new(),
            email_id: Some("nope".into()),
            phone_number: Some("12-34".into()),
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email_id"));
        assert!(fields.contains_key("phone_number"));
    }

    #[test]
    fn test_blank_update_fields_are_dropped() {
        let update = UpdatePublisher {
            email_id: Some("  ".into()),
            phone_number: Some("999-888-777".into()),
        }
        .normalized();
        assert!(update.email_id.is_none());
        assert_eq!(update.phone_number.as_deref(), Some("999-888-777"));
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_publisher_json_is_camel_case() {
        let publisher = Publisher::from(PublisherRow {
            id: 3,
            name: "Orbit".into(),
            email_id: None,
            phone_number: Some("111-222-333".into()),
        });
        let json = serde_json::to_value(&publisher).unwrap();
        assert_eq!(json["publisherId"], 3);
        assert_eq!(json["phoneNumber"], "111-222-333");
    }
}

//! Data models for the Library APIs

pub mod author;
pub mod book;
pub mod enums;
pub mod issuance;
pub mod publisher;
pub mod user;

use chrono::{NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

// Re-export commonly used types
pub use author::Author;
pub use book::{Book, BookStatus};
pub use enums::{BookState, Gender, Role};
pub use issuance::{IssueBookResponse, IssueBookStatus};
pub use publisher::Publisher;
pub use user::{User, UserClaims};

/// Phone numbers are stored as `ddd-ddd-ddd`
pub static PHONE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{3}-\d{3}-\d{3}$").expect("valid phone number pattern"));

pub(crate) fn validate_past_date(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date < Utc::now().date_naive() {
        Ok(())
    } else {
        let mut err = ValidationError::new("past_date");
        err.message = Some("Date of birth must be a past date".into());
        Err(err)
    }
}

/// Treat empty and whitespace-only strings as "not supplied"
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_phone_number_pattern() {
        assert!(PHONE_NUMBER.is_match("123-456-789"));
        assert!(!PHONE_NUMBER.is_match("123-4567-89"));
        assert!(!PHONE_NUMBER.is_match("1234-456-789"));
        assert!(!PHONE_NUMBER.is_match("abc-def-ghi"));
    }

    #[test]
    fn test_past_date() {
        let today = Utc::now().date_naive();
        assert!(validate_past_date(&(today - Duration::days(1))).is_ok());
        assert!(validate_past_date(&today).is_err());
        assert!(validate_past_date(&(today + Duration::days(30))).is_err());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("   ".into())), None);
        assert_eq!(non_blank(Some("x".into())), Some("x".to_string()));
    }
}

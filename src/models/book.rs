//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{author::Author, enums::BookState, non_blank};

/// Book joined with its status row
#[derive(Debug, Clone, FromRow)]
pub struct BookRow {
    pub id: i32,
    pub isbn: String,
    pub title: Option<String>,
    pub publisher_id: i32,
    pub year_published: Option<i32>,
    pub edition: Option<String>,
    pub state: String,
    pub total_number_of_copies: i32,
    pub number_of_copies_issued: i32,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Book {
            book_id: row.id,
            isbn: row.isbn,
            title: row.title,
            publisher_id: row.publisher_id,
            year_published: row.year_published,
            edition: row.edition,
            book_status: BookStatus {
                state: row.state.parse().unwrap_or_default(),
                total_number_of_copies: row.total_number_of_copies,
                number_of_copies_issued: row.number_of_copies_issued,
            },
            authors: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub book_id: i32,
    pub isbn: String,
    pub title: Option<String>,
    pub publisher_id: i32,
    pub year_published: Option<i32>,
    pub edition: Option<String>,
    pub book_status: BookStatus,
    pub authors: Vec<Author>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookStatus {
    pub state: BookState,
    pub total_number_of_copies: i32,
    pub number_of_copies_issued: i32,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    #[validate(length(min = 1, max = 50, message = "ISBN must be between 1 and 50 characters"))]
    pub isbn: String,
    #[validate(length(min = 1, max = 50, message = "Title must be between 1 and 50 characters"))]
    pub title: Option<String>,
    pub publisher_id: i32,
    pub year_published: Option<i32>,
    #[validate(length(min = 1, max = 20, message = "Edition must be between 1 and 20 characters"))]
    pub edition: Option<String>,
    #[validate(nested)]
    pub book_status: CreateBookStatus,
}

/// Initial stock of a new book; nothing is issued yet
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookStatus {
    #[serde(default)]
    pub state: BookState,
    #[validate(range(min = 1, message = "Total number of copies must be at least 1"))]
    pub total_number_of_copies: i32,
}

/// Update book request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 20, message = "Edition must be between 1 and 20 characters"))]
    pub edition: Option<String>,
    pub year_published: Option<i32>,
}

impl UpdateBook {
    pub fn normalized(self) -> Self {
        Self {
            edition: non_blank(self.edition),
            year_published: self.year_published,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.edition.is_none() && self.year_published.is_none()
    }
}

/// Book search parameters
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookSearch {
    pub title: Option<String>,
}

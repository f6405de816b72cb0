//! Book issuance records and responses

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A (user, book) issuance row from `user_books`
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct IssuanceRecord {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub issued_date: NaiveDate,
    pub return_date: NaiveDate,
    pub number_of_times_issued: i32,
}

/// Locked copy counters of one book
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct CopyCounts {
    pub total_number_of_copies: i32,
    pub number_of_copies_issued: i32,
}

impl CopyCounts {
    pub fn available(&self) -> i32 {
        self.total_number_of_copies - self.number_of_copies_issued
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum IssueStatus {
    #[serde(rename = "Issued")]
    Issued,
    #[serde(rename = "Not Issued")]
    NotIssued,
}

/// Outcome for a single requested book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueBookStatus {
    pub book_id: i32,
    pub status: IssueStatus,
    pub remarks: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueBookResponse {
    pub issue_book_statuses: Vec<IssueBookStatus>,
}

//! Book issuance rules

use chrono::{Duration, NaiveDate};

use crate::{
    config::LibraryConfig,
    models::issuance::{CopyCounts, IssuanceRecord, IssueBookStatus, IssueStatus},
};

/// What to do with one requested book, decided over a locked snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueDecision {
    BookNotFound,
    NoCopiesAvailable,
    ReissueLimitReached { max_reissue: i32 },
    /// Bump the existing record's counter and restart the loan period
    Reissue { record_id: i32, issued_date: NaiveDate, return_date: NaiveDate },
    /// Create a record with count 1 and take one copy off the shelf
    FirstIssue { issued_date: NaiveDate, return_date: NaiveDate },
}

impl IssueDecision {
    pub fn outcome(&self, book_id: i32) -> IssueBookStatus {
        let (status, remarks) = match self {
            IssueDecision::BookNotFound => (IssueStatus::NotIssued, "Book Not Found".to_string()),
            IssueDecision::NoCopiesAvailable => {
                (IssueStatus::NotIssued, "No copies available".to_string())
            }
            IssueDecision::ReissueLimitReached { max_reissue } => (
                IssueStatus::NotIssued,
                format!("Book already issued to the user for {} times", max_reissue),
            ),
            IssueDecision::Reissue { .. } => (IssueStatus::Issued, "Book Re-Issued".to_string()),
            IssueDecision::FirstIssue { .. } => (IssueStatus::Issued, "Book Issued".to_string()),
        };

        IssueBookStatus {
            book_id,
            status,
            remarks,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct IssuancePolicy {
    pub max_reissue: i32,
    pub loan_period_days: i64,
}

impl From<&LibraryConfig> for IssuancePolicy {
    fn from(config: &LibraryConfig) -> Self {
        Self {
            max_reissue: config.max_reissue,
            loan_period_days: config.loan_period_days,
        }
    }
}

impl IssuancePolicy {
    pub fn decide(
        &self,
        copies: Option<CopyCounts>,
        record: Option<&IssuanceRecord>,
        today: NaiveDate,
    ) -> IssueDecision {
        let Some(copies) = copies else {
            return IssueDecision::BookNotFound;
        };

        // Re-issues need a free copy too
        if copies.available() <= 0 {
            return IssueDecision::NoCopiesAvailable;
        }

        let return_date = today + Duration::days(self.loan_period_days);
        match record {
            Some(record) if record.number_of_times_issued >= self.max_reissue => {
                IssueDecision::ReissueLimitReached {
                    max_reissue: self.max_reissue,
                }
            }
            Some(record) => IssueDecision::Reissue {
                record_id: record.id,
                issued_date: today,
                return_date,
            },
            None => IssueDecision::FirstIssue {
                issued_date: today,
                return_date,
            },
        }
    }
}

//! Issuance records (`user_books`). Every call runs on the caller's transaction.

use chrono::NaiveDate;
use sqlx::PgConnection;

use crate::{error::AppResult, models::issuance::IssuanceRecord};

#[derive(Clone, Copy)]
pub struct IssuancesRepository;

impl IssuancesRepository {
    /// Fetch and lock the (user, book) record
    pub async fn find_for_update(
        &self,
        conn: &mut PgConnection,
        user_id: i32,
        book_id: i32,
    ) -> AppResult<Option<IssuanceRecord>> {
        let record = sqlx::query_as::<_, IssuanceRecord>(
            r#"
            SELECT id, user_id, book_id, issued_date, return_date, number_of_times_issued
            FROM user_books
            WHERE user_id = $1 AND book_id = $2
            FOR UPDATE
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_optional(conn)
        .await?;

        Ok(record)
    }

    /// First issuance of a book to a user
    pub async fn create(
        &self,
        conn: &mut PgConnection,
        user_id: i32,
        book_id: i32,
        issued_date: NaiveDate,
        return_date: NaiveDate,
    ) -> AppResult<IssuanceRecord> {
        let record = sqlx::query_as::<_, IssuanceRecord>(
            r#"
            INSERT INTO user_books (user_id, book_id, issued_date, return_date, number_of_times_issued)
            VALUES ($1, $2, $3, $4, 1)
            RETURNING id, user_id, book_id, issued_date, return_date, number_of_times_issued
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(issued_date)
        .bind(return_date)
        .fetch_one(conn)
        .await?;

        Ok(record)
    }

    /// Re-issue: bump the counter and restart the loan period
    pub async fn renew(
        &self,
        conn: &mut PgConnection,
        id: i32,
        issued_date: NaiveDate,
        return_date: NaiveDate,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE user_books
            SET number_of_times_issued = number_of_times_issued + 1,
                issued_date = $2,
                return_date = $3
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(issued_date)
        .bind(return_date)
        .execute(conn)
        .await?;

        Ok(())
    }
}

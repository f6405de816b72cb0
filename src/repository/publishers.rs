//! Publishers repository for database operations

use sqlx::{Pool, Postgres};

use super::is_foreign_key_violation;
use crate::{
    error::{AppError, AppResult},
    models::publisher::{CreatePublisher, Publisher, PublisherRow, UpdatePublisher},
};

#[derive(Clone)]
pub struct PublishersRepository {
    pool: Pool<Postgres>,
}

impl PublishersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Create a new publisher
    pub async fn create(&self, data: &CreatePublisher) -> AppResult<Publisher> {
        let row = sqlx::query_as::<_, PublisherRow>(
            r#"
            INSERT INTO publishers (name, email_id, phone_number)
            VALUES ($1, $2, $3)
            RETURNING id, name, email_id, phone_number
            "#,
        )
        .bind(&data.name)
        .bind(&data.email_id)
        .bind(&data.phone_number)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::on_conflict(e, "Publisher already exists!!"))?;

        Ok(row.into())
    }

    /// Get publisher by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Publisher> {
        sqlx::query_as::<_, PublisherRow>(
            "SELECT id, name, email_id, phone_number FROM publishers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Publisher::from)
        .ok_or_else(|| AppError::NotFound(format!("Publisher Id: {} Not Found", id)))
    }

    /// Update contact details; fields left as `None` are kept
    pub async fn update(&self, id: i32, data: &UpdatePublisher) -> AppResult<Publisher> {
        if data.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut sets = Vec::new();
        let mut idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.email_id, "email_id");
        add_field!(data.phone_number, "phone_number");

        let query = format!(
            "UPDATE publishers SET {} WHERE id = $1 RETURNING id, name, email_id, phone_number",
            sets.join(", ")
        );

        let mut builder = sqlx::query_as::<_, PublisherRow>(&query).bind(id);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.email_id);
        bind_field!(data.phone_number);

        builder
            .fetch_optional(&self.pool)
            .await?
            .map(Publisher::from)
            .ok_or_else(|| AppError::NotFound(format!("Publisher Id: {} Not Found", id)))
    }

    /// Delete a publisher that no book refers to
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM publishers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::BadRequest(format!(
                        "Publisher Id: {} still has books and cannot be deleted",
                        id
                    ))
                } else {
                    AppError::Database(e)
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Publisher Id: {} Not Found", id)));
        }

        Ok(())
    }

    /// Case-sensitive "name contains" search
    pub async fn search_by_name(&self, name: &str) -> AppResult<Vec<Publisher>> {
        let rows = sqlx::query_as::<_, PublisherRow>(
            r#"
            SELECT id, name, email_id, phone_number
            FROM publishers
            WHERE strpos(name, $1) > 0
            ORDER BY id
            "#,
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Publisher::from).collect())
    }
}

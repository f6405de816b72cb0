//! Authors repository for database operations

use sqlx::{FromRow, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::author::{Author, AuthorRow, CreateAuthor, UpdateAuthor},
};

const AUTHOR_COLUMNS: &str = "id, first_name, last_name, date_of_birth, gender";

/// Author joined through `book_authors`
#[derive(Debug, FromRow)]
struct BookAuthorRow {
    book_id: i32,
    #[sqlx(flatten)]
    author: AuthorRow,
}

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Create a new author
    pub async fn create(&self, data: &CreateAuthor) -> AppResult<Author> {
        let row = sqlx::query_as::<_, AuthorRow>(&format!(
            r#"
            INSERT INTO authors (first_name, last_name, date_of_birth, gender)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            AUTHOR_COLUMNS
        ))
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(data.date_of_birth)
        .bind(data.gender.map(|g| g.as_str()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::on_conflict(e, "Author already exists!!"))?;

        Ok(row.into())
    }

    /// Get author by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        sqlx::query_as::<_, AuthorRow>(&format!(
            "SELECT {} FROM authors WHERE id = $1",
            AUTHOR_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Author::from)
        .ok_or_else(|| AppError::NotFound(format!("Author Id: {} Not Found", id)))
    }

    /// Update date of birth and/or gender
    pub async fn update(&self, id: i32, data: &UpdateAuthor) -> AppResult<Author> {
        if data.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut sets = Vec::new();
        let mut idx = 2;

        if data.date_of_birth.is_some() {
            sets.push(format!("date_of_birth = ${}", idx));
            idx += 1;
        }
        if data.gender.is_some() {
            sets.push(format!("gender = ${}", idx));
        }

        let query = format!(
            "UPDATE authors SET {} WHERE id = $1 RETURNING {}",
            sets.join(", "),
            AUTHOR_COLUMNS
        );

        let mut builder = sqlx::query_as::<_, AuthorRow>(&query).bind(id);
        if let Some(date_of_birth) = data.date_of_birth {
            builder = builder.bind(date_of_birth);
        }
        if let Some(gender) = data.gender {
            builder = builder.bind(gender.as_str());
        }

        builder
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::on_conflict(e, "Author already exists!!"))?
            .map(Author::from)
            .ok_or_else(|| AppError::NotFound(format!("Author Id: {} Not Found", id)))
    }

    /// Delete an author; their book links go with them
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Author Id: {} Not Found", id)));
        }

        Ok(())
    }

    /// Case-sensitive "contains" search; a `None` criterion matches everything
    pub async fn search(
        &self,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, AuthorRow>(&format!(
            r#"
            SELECT {}
            FROM authors
            WHERE ($1::text IS NULL OR strpos(first_name, $1) > 0)
              AND ($2::text IS NULL OR strpos(last_name, $2) > 0)
            ORDER BY id
            "#,
            AUTHOR_COLUMNS
        ))
        .bind(first_name)
        .bind(last_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Author::from).collect())
    }

    /// Authors of the given books, as (book id, author) pairs
    pub async fn for_books(&self, book_ids: &[i32]) -> AppResult<Vec<(i32, Author)>> {
        if book_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, BookAuthorRow>(
            r#"
            SELECT ba.book_id, a.id, a.first_name, a.last_name, a.date_of_birth, a.gender
            FROM book_authors ba
            JOIN authors a ON a.id = ba.author_id
            WHERE ba.book_id = ANY($1)
            ORDER BY ba.book_id, a.id
            "#,
        )
        .bind(book_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.book_id, Author::from(row.author)))
            .collect())
    }
}

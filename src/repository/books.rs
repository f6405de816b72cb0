//! Books repository for database operations

use std::collections::HashMap;

use sqlx::{PgConnection, Pool, Postgres};

use super::{authors::AuthorsRepository, is_foreign_key_violation};
use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookRow, CreateBook, UpdateBook},
        issuance::CopyCounts,
    },
};

const BOOK_SELECT: &str = r#"
    SELECT b.id, b.isbn, b.title, b.publisher_id, b.year_published, b.edition,
           s.state, s.total_number_of_copies, s.number_of_copies_issued
    FROM books b
    JOIN book_status s ON s.book_id = b.id
"#;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
    authors: AuthorsRepository,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: AuthorsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a book together with its status row
    pub async fn create(&self, data: &CreateBook) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let book_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO books (isbn, title, publisher_id, year_published, edition)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&data.isbn)
        .bind(&data.title)
        .bind(data.publisher_id)
        .bind(data.year_published)
        .bind(&data.edition)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::NotFound("Publisher mentioned for the book does not exist".to_string())
            } else {
                AppError::on_conflict(e, "Book already exists!!")
            }
        })?;

        sqlx::query(
            r#"
            INSERT INTO book_status (book_id, state, total_number_of_copies, number_of_copies_issued)
            VALUES ($1, $2, $3, 0)
            "#,
        )
        .bind(book_id)
        .bind(data.book_status.state.as_str())
        .bind(data.book_status.total_number_of_copies)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get_by_id(book_id).await
    }

    /// Get book by ID, with status and authors
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        let row = sqlx::query_as::<_, BookRow>(&format!("{} WHERE b.id = $1", BOOK_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book Id: {} Not Found", id)))?;

        let mut books = self.with_authors(vec![row]).await?;
        books
            .pop()
            .ok_or_else(|| AppError::NotFound(format!("Book Id: {} Not Found", id)))
    }

    /// Update edition and/or year published
    pub async fn update(&self, id: i32, data: &UpdateBook) -> AppResult<Book> {
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

        add_field!(data.edition, "edition");
        add_field!(data.year_published, "year_published");

        let query = format!("UPDATE books SET {} WHERE id = $1 RETURNING id", sets.join(", "));

        let mut builder = sqlx::query_scalar::<_, i32>(&query).bind(id);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.edition);
        bind_field!(data.year_published);

        let updated = builder.fetch_optional(&self.pool).await?;
        match updated {
            Some(book_id) => self.get_by_id(book_id).await,
            None => Err(AppError::NotFound(format!("Book Id: {} Not Found", id))),
        }
    }

    /// Delete a book; status, author links and issuance records cascade
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book Id: {} Not Found", id)));
        }

        Ok(())
    }

    /// Case-sensitive "title contains" search
    pub async fn search_by_title(&self, title: &str) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, BookRow>(&format!(
            "{} WHERE strpos(b.title, $1) > 0 ORDER BY b.id",
            BOOK_SELECT
        ))
        .bind(title)
        .fetch_all(&self.pool)
        .await?;

        self.with_authors(rows).await
    }

    /// Replace the author set of a book with the requested ids that exist
    pub async fn set_authors(&self, book_id: i32, author_ids: &[i32]) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        sqlx::query_scalar::<_, i32>("SELECT id FROM books WHERE id = $1 FOR UPDATE")
            .bind(book_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book Id: {} Not Found", book_id)))?;

        let found: Vec<i32> =
            sqlx::query_scalar("SELECT id FROM authors WHERE id = ANY($1) ORDER BY id")
                .bind(author_ids)
                .fetch_all(&mut *tx)
                .await?;

        if found.is_empty() {
            return Err(AppError::NotFound(format!(
                "Book Id: {}. None of the authors were found",
                book_id
            )));
        }

        sqlx::query("DELETE FROM book_authors WHERE book_id = $1")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO book_authors (book_id, author_id) SELECT $1, UNNEST($2::int4[])",
        )
        .bind(book_id)
        .bind(&found)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get_by_id(book_id).await
    }

    /// Lock a book's status row for the rest of the transaction
    pub async fn lock_copies(
        &self,
        conn: &mut PgConnection,
        book_id: i32,
    ) -> AppResult<Option<CopyCounts>> {
        let counts = sqlx::query_as::<_, CopyCounts>(
            r#"
            SELECT total_number_of_copies, number_of_copies_issued
            FROM book_status
            WHERE book_id = $1
            FOR UPDATE
            "#,
        )
        .bind(book_id)
        .fetch_optional(conn)
        .await?;

        Ok(counts)
    }

    pub async fn increment_issued(&self, conn: &mut PgConnection, book_id: i32) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE book_status
            SET number_of_copies_issued = number_of_copies_issued + 1
            WHERE book_id = $1
            "#,
        )
        .bind(book_id)
        .execute(conn)
        .await?;

        Ok(())
    }

    async fn with_authors(&self, rows: Vec<BookRow>) -> AppResult<Vec<Book>> {
        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let mut authors_by_book: HashMap<i32, Vec<_>> = HashMap::new();
        for (book_id, author) in self.authors.for_books(&ids).await? {
            authors_by_book.entry(book_id).or_default().push(author);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let authors = authors_by_book.remove(&row.id).unwrap_or_default();
                let mut book = Book::from(row);
                book.authors = authors;
                book
            })
            .collect())
    }
}

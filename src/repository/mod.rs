//! Repository layer for database operations

pub mod authors;
pub mod books;
pub mod issuances;
pub mod publishers;
pub mod users;

use sqlx::{Pool, Postgres, Transaction};

use crate::error::AppResult;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub publishers: publishers::PublishersRepository,
    pub authors: authors::AuthorsRepository,
    pub books: books::BooksRepository,
    pub users: users::UsersRepository,
    pub issuances: issuances::IssuancesRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            publishers: publishers::PublishersRepository::new(pool.clone()),
            authors: authors::AuthorsRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            issuances: issuances::IssuancesRepository,
            pool,
        }
    }

    /// Start a transaction spanning several repositories
    pub async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        Ok(self.pool.begin().await?)
    }
}

/// True when the error is a foreign key violation (SQLSTATE 23503)
pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

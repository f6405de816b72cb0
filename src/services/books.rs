//! Book catalog service

use std::collections::BTreeSet;

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, CreateBook, UpdateBook},
        non_blank,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn add(&self, data: CreateBook) -> AppResult<Book> {
        data.validate()?;
        let book = self.repository.books.create(&data).await?;
        tracing::info!(book_id = book.book_id, isbn = %book.isbn, "Book added");
        Ok(book)
    }

    pub async fn get(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    pub async fn update(&self, id: i32, data: UpdateBook) -> AppResult<Book> {
        let data = data.normalized();
        data.validate()?;
        self.repository.books.update(id, &data).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!(book_id = id, "Book deleted");
        Ok(())
    }

    pub async fn search(&self, title: Option<String>) -> AppResult<Vec<Book>> {
        let title = non_blank(title)
            .ok_or_else(|| AppError::BadRequest("Please enter a name to search Book.".to_string()))?;
        self.repository.books.search_by_title(&title).await
    }

    /// Replace the book's authors with those of `author_ids` that exist
    pub async fn set_authors(&self, book_id: i32, author_ids: BTreeSet<i32>) -> AppResult<Book> {
        if author_ids.is_empty() {
            return Err(AppError::BadRequest(
                "Please supply at least one author to be added".to_string(),
            ));
        }

        let ids: Vec<i32> = author_ids.into_iter().collect();
        let book = self.repository.books.set_authors(book_id, &ids).await?;
        tracing::info!(book_id, authors = book.authors.len(), "Book authors replaced");
        Ok(book)
    }
}

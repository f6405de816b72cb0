//! Author management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, CreateAuthor, UpdateAuthor},
        non_blank,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn add(&self, data: CreateAuthor) -> AppResult<Author> {
        data.validate()?;
        let author = self.repository.authors.create(&data).await?;
        tracing::info!(author_id = author.author_id, "Author added");
        Ok(author)
    }

    pub async fn get(&self, id: i32) -> AppResult<Author> {
        self.repository.authors.get_by_id(id).await
    }

    pub async fn update(&self, id: i32, data: UpdateAuthor) -> AppResult<Author> {
        data.validate()?;
        self.repository.authors.update(id, &data).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.authors.delete(id).await?;
        tracing::info!(author_id = id, "Author deleted");
        Ok(())
    }

    /// At least one of the names must be given
    pub async fn search(
        &self,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> AppResult<Vec<Author>> {
        let first_name = non_blank(first_name);
        let last_name = non_blank(last_name);
        if first_name.is_none() && last_name.is_none() {
            return Err(AppError::BadRequest("Please enter a name to search Author.".to_string()));
        }

        self.repository
            .authors
            .search(first_name.as_deref(), last_name.as_deref())
            .await
    }
}

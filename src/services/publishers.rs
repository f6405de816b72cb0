//! Publisher management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        non_blank,
        publisher::{CreatePublisher, Publisher, UpdatePublisher},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct PublishersService {
    repository: Repository,
}

impl PublishersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn add(&self, data: CreatePublisher) -> AppResult<Publisher> {
        data.validate()?;
        let publisher = self.repository.publishers.create(&data).await?;
        tracing::info!(publisher_id = publisher.publisher_id, "Publisher added");
        Ok(publisher)
    }

    pub async fn get(&self, id: i32) -> AppResult<Publisher> {
        self.repository.publishers.get_by_id(id).await
    }

    pub async fn update(&self, id: i32, data: UpdatePublisher) -> AppResult<Publisher> {
        let data = data.normalized();
        data.validate()?;
        self.repository.publishers.update(id, &data).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.publishers.delete(id).await?;
        tracing::info!(publisher_id = id, "Publisher deleted");
        Ok(())
    }

    pub async fn search(&self, name: Option<String>) -> AppResult<Vec<Publisher>> {
        let name = non_blank(name)
            .ok_or_else(|| AppError::BadRequest("Please enter a name to search Publisher.".to_string()))?;
        self.repository.publishers.search_by_name(&name).await
    }
}

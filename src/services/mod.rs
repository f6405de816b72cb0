//! Business logic services

pub mod auth;
pub mod authors;
pub mod books;
pub mod issuance;
pub mod publishers;
pub mod users;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub publishers: publishers::PublishersService,
    pub authors: authors::AuthorsService,
    pub books: books::BooksService,
    pub users: users::UsersService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone(), config.auth.clone()),
            publishers: publishers::PublishersService::new(repository.clone()),
            authors: authors::AuthorsService::new(repository.clone()),
            books: books::BooksService::new(repository.clone()),
            users: users::UsersService::new(
                repository,
                config.users.clone(),
                config.admin.clone(),
                issuance::IssuancePolicy::from(&config.library),
            ),
        }
    }
}

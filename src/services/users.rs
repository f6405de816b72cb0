//! User management and book issuance service

use std::collections::BTreeSet;

use chrono::Utc;
use validator::Validate;

use super::{
    auth::hash_password,
    issuance::{IssuancePolicy, IssueDecision},
};
use crate::{
    config::{AdminConfig, UsersConfig},
    error::{AppError, AppResult},
    models::{
        enums::Role,
        issuance::IssueBookResponse,
        non_blank,
        user::{CreateUser, UpdateUser, User, UserShort},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: UsersConfig,
    admin: AdminConfig,
    policy: IssuancePolicy,
}

impl UsersService {
    pub fn new(
        repository: Repository,
        config: UsersConfig,
        admin: AdminConfig,
        policy: IssuancePolicy,
    ) -> Self {
        Self {
            repository,
            config,
            admin,
            policy,
        }
    }

    /// Self-registration; the account always gets the USER role
    pub async fn register(&self, data: CreateUser) -> AppResult<User> {
        data.validate()?;
        let password = non_blank(data.password.clone())
            .unwrap_or_else(|| self.config.default_password.clone());
        let hash = hash_password(&password)?;

        let user = self.repository.users.create(&data, &hash, Role::User).await?;
        tracing::info!(user_id = user.user_id, username = %user.username, "User registered");
        Ok(user)
    }

    pub async fn get(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    pub async fn update(&self, id: i32, data: UpdateUser) -> AppResult<User> {
        let mut data = data.normalized();
        data.validate()?;
        if let Some(password) = data.password.take() {
            data.password = Some(hash_password(&password)?);
        }
        self.repository.users.update(id, &data).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.users.delete(id).await?;
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }

    /// At least one of the names must be given
    pub async fn search(
        &self,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> AppResult<Vec<UserShort>> {
        let first_name = non_blank(first_name);
        let last_name = non_blank(last_name);
        if first_name.is_none() && last_name.is_none() {
            return Err(AppError::BadRequest("Please enter a name to search User.".to_string()));
        }

        self.repository
            .users
            .search(first_name.as_deref(), last_name.as_deref())
            .await
    }

    /// Issue or re-issue each requested book to the user in one transaction.
    ///
    /// The user row is share-locked, then each book's status row and the
    /// user's issuance record are locked in ascending book id order. A book
    /// that cannot be issued only affects its own entry in the response.
    pub async fn issue_books(
        &self,
        user_id: i32,
        book_ids: BTreeSet<i32>,
    ) -> AppResult<IssueBookResponse> {
        if book_ids.is_empty() {
            return Err(AppError::BadRequest(
                "Invalid Book list. List is either not present or empty.".to_string(),
            ));
        }

        let mut tx = self.repository.begin().await?;

        if !self.repository.users.lock_for_share(&mut *tx, user_id).await? {
            return Err(AppError::NotFound(format!("Library User Id: {} Not Found", user_id)));
        }

        let today = Utc::now().date_naive();
        let mut statuses = Vec::with_capacity(book_ids.len());

        for book_id in book_ids {
            let copies = self.repository.books.lock_copies(&mut *tx, book_id).await?;
            let record = match copies {
                Some(_) => {
                    self.repository
                        .issuances
                        .find_for_update(&mut *tx, user_id, book_id)
                        .await?
                }
                None => None,
            };

            let decision = self.policy.decide(copies, record.as_ref(), today);
            match &decision {
                IssueDecision::FirstIssue { issued_date, return_date } => {
                    self.repository
                        .issuances
                        .create(&mut *tx, user_id, book_id, *issued_date, *return_date)
                        .await?;
                    self.repository.books.increment_issued(&mut *tx, book_id).await?;
                }
                IssueDecision::Reissue { record_id, issued_date, return_date } => {
                    self.repository
                        .issuances
                        .renew(&mut *tx, *record_id, *issued_date, *return_date)
                        .await?;
                }
                _ => {}
            }

            let outcome = decision.outcome(book_id);
            tracing::info!(user_id, book_id, remarks = %outcome.remarks, "Issuance decided");
            statuses.push(outcome);
        }

        tx.commit().await?;

        Ok(IssueBookResponse {
            issue_book_statuses: statuses,
        })
    }

    /// Seed the administrator account when it does not exist yet
    pub async fn ensure_admin(&self) -> AppResult<bool> {
        if self
            .repository
            .users
            .get_by_username(&self.admin.username)
            .await?
            .is_some()
        {
            return Ok(false);
        }

        let admin = CreateUser {
            username: self.admin.username.clone(),
            password: None,
            first_name: Some("Library".to_string()),
            last_name: Some("Admin".to_string()),
            date_of_birth: None,
            gender: None,
            phone_number: Some("000-000-000".to_string()),
            email_id: Some("library.admin@library.com".to_string()),
        };
        let hash = hash_password(&self.admin.password)?;

        match self.repository.users.create(&admin, &hash, Role::Admin).await {
            Ok(user) => {
                tracing::info!(user_id = user.user_id, username = %user.username, "Administrator account created");
                Ok(true)
            }
            // Another instance seeded it first
            Err(AppError::AlreadyExists(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

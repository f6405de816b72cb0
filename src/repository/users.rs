//! Users repository for database operations

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::Role,
        user::{CreateUser, UpdateUser, User, UserRow, UserShort},
    },
};

const USER_COLUMNS: &str = "id, username, password, first_name, last_name, date_of_birth, gender, phone_number, email_id, role";

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Create a user; `password_hash` replaces whatever password the request carried
    pub async fn create(&self, data: &CreateUser, password_hash: &str, role: Role) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (username, password, first_name, last_name, date_of_birth,
                               gender, phone_number, email_id, role)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&data.username)
        .bind(password_hash)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(data.date_of_birth)
        .bind(data.gender.map(|g| g.as_str()))
        .bind(&data.phone_number)
        .bind(&data.email_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::on_conflict(e, "User already exists!!"))?;

        Ok(row.into())
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, UserRow>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(User::from)
            .ok_or_else(|| AppError::NotFound(format!("User Id: {} Not Found", id)))
    }

    /// Get user by username, password hash included (authentication only)
    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<UserRow>> {
        let user = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update contact details and/or password. A supplied password must already be hashed.
    pub async fn update(&self, id: i32, data: &UpdateUser) -> AppResult<User> {
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
        add_field!(data.password, "password");

        let query = format!(
            "UPDATE users SET {} WHERE id = $1 RETURNING {}",
            sets.join(", "),
            USER_COLUMNS
        );

        let mut builder = sqlx::query_as::<_, UserRow>(&query).bind(id);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.email_id);
        bind_field!(data.phone_number);
        bind_field!(data.password);

        builder
            .fetch_optional(&self.pool)
            .await?
            .map(User::from)
            .ok_or_else(|| AppError::NotFound(format!("User Id: {} Not Found", id)))
    }

    /// Delete a user; their issuance records cascade
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User Id: {} Not Found", id)));
        }

        Ok(())
    }

    /// Case-sensitive "contains" search; a `None` criterion matches everything
    pub async fn search(
        &self,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> AppResult<Vec<UserShort>> {
        let users = sqlx::query_as::<_, UserShort>(
            r#"
            SELECT username, first_name, last_name
            FROM users
            WHERE ($1::text IS NULL OR strpos(first_name, $1) > 0)
              AND ($2::text IS NULL OR strpos(last_name, $2) > 0)
            ORDER BY id
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Lock a user row against deletion for the rest of the transaction
    pub async fn lock_for_share(&self, conn: &mut PgConnection, id: i32) -> AppResult<bool> {
        let found: Option<i32> = sqlx::query_scalar("SELECT id FROM users WHERE id = $1 FOR SHARE")
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(found.is_some())
    }
}

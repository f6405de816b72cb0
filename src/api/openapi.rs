//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, authors, books, health, publishers, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library APIs",
        version = "1.0.0",
        description = "Publishers, authors, books, users and book issuance REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        // Publishers
        publishers::add_publisher,
        publishers::get_publisher,
        publishers::update_publisher,
        publishers::delete_publisher,
        publishers::search_publishers,
        // Authors
        authors::add_author,
        authors::get_author,
        authors::update_author,
        authors::delete_author,
        authors::search_authors,
        // Books
        books::add_book,
        books::get_book,
        books::update_book,
        books::delete_book,
        books::search_books,
        books::set_book_authors,
        // Users
        users::register_user,
        users::get_user,
        users::update_user,
        users::delete_user,
        users::search_users,
        users::issue_books,
    ),
    components(
        schemas(
            // Auth
            crate::models::user::LoginRequest,
            crate::models::user::LoginResponse,
            // Publishers
            crate::models::publisher::Publisher,
            crate::models::publisher::CreatePublisher,
            crate::models::publisher::UpdatePublisher,
            // Authors
            crate::models::author::Author,
            crate::models::author::CreateAuthor,
            crate::models::author::UpdateAuthor,
            crate::models::enums::Gender,
            // Books
            crate::models::book::Book,
            crate::models::book::BookStatus,
            crate::models::book::CreateBook,
            crate::models::book::CreateBookStatus,
            crate::models::book::UpdateBook,
            crate::models::enums::BookState,
            // Users
            crate::models::user::User,
            crate::models::user::UserShort,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            crate::models::enums::Role,
            // Issuance
            crate::models::issuance::IssueBookResponse,
            crate::models::issuance::IssueBookStatus,
            crate::models::issuance::IssueStatus,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "publishers", description = "Publisher management"),
        (name = "authors", description = "Author management"),
        (name = "books", description = "Book catalog"),
        (name = "users", description = "Users and book issuance")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        for path in [
            "/login",
            "/v1/publishers",
            "/v1/publishers/{id}",
            "/v1/authors/search",
            "/v1/books/{id}/authors",
            "/v1/users/{id}/books",
        ] {
            assert!(paths.contains_key(path), "missing {}", path);
        }
        assert!(doc
            .components
            .as_ref()
            .map(|c| c.security_schemes.contains_key("bearer_auth"))
            .unwrap_or(false));
    }
}

//! Book endpoints

use std::collections::BTreeSet;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use super::{AuthenticatedUser, JsonBody, PathParam};
use crate::{
    error::{AppResult, ErrorResponse},
    models::book::{Book, BookSearch, CreateBook, UpdateBook},
    AppState,
};

/// Add a book with its initial stock (admin only)
#[utoipa::path(
    post,
    path = "/v1/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Not an administrator", body = ErrorResponse),
        (status = 404, description = "Publisher does not exist", body = ErrorResponse),
        (status = 409, description = "Book already exists", body = ErrorResponse)
    )
)]
pub async fn add_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    JsonBody(book): JsonBody<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    claims.require_admin("User not allowed to Add a Book")?;

    let created = state.services.books.add(book).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/v1/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.get(id).await?;
    Ok(Json(book))
}

/// Update a book's edition or year published (admin only)
#[utoipa::path(
    put,
    path = "/v1/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 401, description = "Not an administrator", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    PathParam(id): PathParam<i32>,
    JsonBody(book): JsonBody<UpdateBook>,
) -> AppResult<Json<Book>> {
    claims.require_admin("User not allowed to update a Book")?;

    let updated = state.services.books.update(id, book).await?;
    Ok(Json(updated))
}

/// Delete a book (admin only)
#[utoipa::path(
    delete,
    path = "/v1/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 202, description = "Book deleted"),
        (status = 401, description = "Not an administrator", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    PathParam(id): PathParam<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin("User not allowed to delete a Book")?;

    state.services.books.delete(id).await?;
    Ok(StatusCode::ACCEPTED)
}

/// Search books by title (no login required)
#[utoipa::path(
    get,
    path = "/v1/books/search",
    tag = "books",
    params(BookSearch),
    responses(
        (status = 200, description = "Matching books", body = Vec<Book>),
        (status = 400, description = "No title given", body = ErrorResponse)
    )
)]
pub async fn search_books(
    State(state): State<AppState>,
    Query(search): Query<BookSearch>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.search(search.title).await?;
    Ok(Json(books))
}

/// Replace the authors of a book (admin only)
#[utoipa::path(
    put,
    path = "/v1/books/{id}/authors",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body(content = Vec<i32>, description = "Author IDs"),
    responses(
        (status = 200, description = "Book with its new authors", body = Book),
        (status = 400, description = "No author given", body = ErrorResponse),
        (status = 401, description = "Not an administrator", body = ErrorResponse),
        (status = 404, description = "Book or authors not found", body = ErrorResponse)
    )
)]
pub async fn set_book_authors(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    PathParam(id): PathParam<i32>,
    JsonBody(author_ids): JsonBody<BTreeSet<i32>>,
) -> AppResult<Json<Book>> {
    claims.require_admin("User not allowed to add Authors to a Book")?;

    let book = state.services.books.set_authors(id, author_ids).await?;
    Ok(Json(book))
}

//! API integration tests
//!
//! These run against a live server with the default admin account seeded.

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080";
const ADMIN_USERNAME: &str = "lib-admin";
const ADMIN_PASSWORD: &str = "admin-password";

/// Short unique suffix so repeated runs never collide on unique columns
fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, &uuid::Uuid::new_v4().simple().to_string()[..8])
}

async fn login(client: &Client, username: &str, password: &str) -> String {
    let response = client
        .post(format!("{}/login", BASE_URL))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

async fn admin_token(client: &Client) -> String {
    login(client, ADMIN_USERNAME, ADMIN_PASSWORD).await
}

async fn create_publisher(client: &Client, token: &str) -> i64 {
    let response = client
        .post(format!("{}/v1/publishers", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "name": unique("pub"),
            "emailId": "contact@publisher.com",
            "phoneNumber": "123-456-789"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    body["publisherId"].as_i64().unwrap()
}

async fn create_book(client: &Client, token: &str, publisher_id: i64, copies: i32) -> i64 {
    let response = client
        .post(format!("{}/v1/books", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "isbn": unique("isbn"),
            "title": unique("Title"),
            "publisherId": publisher_id,
            "yearPublished": 2020,
            "edition": "First",
            "bookStatus": { "state": "Active", "totalNumberOfCopies": copies }
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    body["bookId"].as_i64().unwrap()
}

/// Register a user and return (user id, username)
async fn register_user(client: &Client) -> (i64, String) {
    let username = unique("reader");
    let response = client
        .post(format!("{}/v1/users", BASE_URL))
        .json(&json!({
            "username": username,
            "password": "Secret1234",
            "firstName": "Jane",
            "lastName": unique("Doe"),
            "phoneNumber": "111-222-333",
            "emailId": "jane@example.com",
            "gender": "Female"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["role"], "USER");
    assert!(body.get("password").is_none());
    (body["userId"].as_i64().unwrap(), username)
}

async fn issue(client: &Client, token: &str, user_id: i64, book_ids: &[i64]) -> Vec<Value> {
    let response = client
        .put(format!("{}/v1/users/{}/books", BASE_URL, user_id))
        .bearer_auth(token)
        .json(&book_ids)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    body["issueBookStatuses"].as_array().unwrap().clone()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    assert!(response.headers().contains_key("trace-id"));

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login_returns_bearer_header() {
    let client = Client::new();

    let response = client
        .post(format!("{}/login", BASE_URL))
        .json(&json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let header = response.headers()["authorization"].to_str().unwrap().to_string();
    assert!(header.starts_with("Bearer "));

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["tokenType"], "Bearer");
    assert_eq!(header, format!("Bearer {}", body["token"].as_str().unwrap()));
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/login", BASE_URL))
        .json(&json!({ "username": ADMIN_USERNAME, "password": "wrong" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_publisher_lifecycle() {
    let client = Client::new();
    let token = admin_token(&client).await;
    let name = unique("Orbit");

    let response = client
        .post(format!("{}/v1/publishers", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "name": name, "emailId": "orbit@books.com", "phoneNumber": "123-123-123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = response.json().await.unwrap();
    let id = created["publisherId"].as_i64().unwrap();

    // Duplicate name
    let response = client
        .post(format!("{}/v1/publishers", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "name": name }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["errorMessage"], "Publisher already exists!!");

    // Partial update keeps the e-mail
    let response = client
        .put(format!("{}/v1/publishers/{}", BASE_URL, id))
        .bearer_auth(&token)
        .json(&json!({ "phoneNumber": "999-888-777" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["phoneNumber"], "999-888-777");
    assert_eq!(updated["emailId"], "orbit@books.com");
    assert_eq!(updated["name"], name);

    let response = client
        .get(format!("{}/v1/publishers/search", BASE_URL))
        .bearer_auth(&token)
        .query(&[("name", &name[..6])])
        .send()
        .await
        .unwrap();
    let found: Vec<Value> = response.json().await.unwrap();
    assert!(found.iter().any(|p| p["publisherId"] == id));

    let response = client
        .delete(format!("{}/v1/publishers/{}", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let response = client
        .get(format!("{}/v1/publishers/{}", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["errorMessage"], format!("Publisher Id: {} Not Found", id));
}

#[tokio::test]
#[ignore]
async fn test_book_with_unknown_publisher() {
    let client = Client::new();
    let token = admin_token(&client).await;

    let response = client
        .post(format!("{}/v1/books", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "isbn": unique("isbn"),
            "title": "Orphan",
            "publisherId": i32::MAX,
            "bookStatus": { "totalNumberOfCopies": 1 }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["errorMessage"], "Publisher mentioned for the book does not exist");
}

#[tokio::test]
#[ignore]
async fn test_book_authors_and_public_search() {
    let client = Client::new();
    let token = admin_token(&client).await;
    let publisher_id = create_publisher(&client, &token).await;
    let book_id = create_book(&client, &token, publisher_id, 2).await;

    let response = client
        .post(format!("{}/v1/authors", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "firstName": "Mary",
            "lastName": unique("Shelley"),
            "dateOfBirth": "1797-08-30",
            "gender": "Female"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let author: Value = response.json().await.unwrap();
    let author_id = author["authorId"].as_i64().unwrap();

    // Unknown ids are skipped as long as one author exists
    let response = client
        .put(format!("{}/v1/books/{}/authors", BASE_URL, book_id))
        .bearer_auth(&token)
        .json(&json!([author_id, i32::MAX]))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let book: Value = response.json().await.unwrap();
    let authors = book["authors"].as_array().unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0]["authorId"], author_id);

    let response = client
        .put(format!("{}/v1/books/{}/authors", BASE_URL, book_id))
        .bearer_auth(&token)
        .json(&json!([i32::MAX]))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["errorMessage"],
        format!("Book Id: {}. None of the authors were found", book_id)
    );

    let title = book["title"].as_str().unwrap().to_string();
    let response = client
        .get(format!("{}/v1/books/search", BASE_URL))
        .query(&[("title", title.as_str())])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let found: Vec<Value> = response.json().await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["authors"][0]["authorId"], author_id);
}

#[tokio::test]
#[ignore]
async fn test_user_self_service() {
    let client = Client::new();
    let (user_id, username) = register_user(&client).await;
    let (other_id, _) = register_user(&client).await;
    let token = login(&client, &username, "Secret1234").await;

    let response = client
        .get(format!("{}/v1/users/{}", BASE_URL, user_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .get(format!("{}/v1/users/{}", BASE_URL, other_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Password change takes effect on the next login
    let response = client
        .put(format!("{}/v1/users/{}", BASE_URL, user_id))
        .bearer_auth(&token)
        .json(&json!({ "password": "Changed5678" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["emailId"], "jane@example.com");

    let response = client
        .post(format!("{}/login", BASE_URL))
        .json(&json!({ "username": username, "password": "Changed5678" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .delete(format!("{}/v1/users/{}", BASE_URL, user_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
#[ignore]
async fn test_issue_reissue_and_limits() {
    let client = Client::new();
    let token = admin_token(&client).await;
    let publisher_id = create_publisher(&client, &token).await;
    let book_id = create_book(&client, &token, publisher_id, 2).await;
    let (user_id, _) = register_user(&client).await;

    let statuses = issue(&client, &token, user_id, &[book_id, i32::MAX as i64]).await;
    assert_eq!(statuses.len(), 2);
    assert_eq!(statuses[0]["bookId"], book_id);
    assert_eq!(statuses[0]["status"], "Issued");
    assert_eq!(statuses[0]["remarks"], "Book Issued");
    assert_eq!(statuses[1]["status"], "Not Issued");
    assert_eq!(statuses[1]["remarks"], "Book Not Found");

    for _ in 0..2 {
        let statuses = issue(&client, &token, user_id, &[book_id]).await;
        assert_eq!(statuses[0]["remarks"], "Book Re-Issued");
    }

    let statuses = issue(&client, &token, user_id, &[book_id]).await;
    assert_eq!(statuses[0]["status"], "Not Issued");
    assert_eq!(statuses[0]["remarks"], "Book already issued to the user for 3 times");

    // Re-issues never take another copy
    let response = client
        .get(format!("{}/v1/books/{}", BASE_URL, book_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let book: Value = response.json().await.unwrap();
    assert_eq!(book["bookStatus"]["numberOfCopiesIssued"], 1);

    let response = client
        .put(format!("{}/v1/users/{}/books", BASE_URL, i32::MAX))
        .bearer_auth(&token)
        .json(&json!([book_id]))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_no_copies_available() {
    let client = Client::new();
    let token = admin_token(&client).await;
    let publisher_id = create_publisher(&client, &token).await;
    let book_id = create_book(&client, &token, publisher_id, 1).await;
    let (first, _) = register_user(&client).await;
    let (second, _) = register_user(&client).await;

    let statuses = issue(&client, &token, first, &[book_id]).await;
    assert_eq!(statuses[0]["status"], "Issued");

    let statuses = issue(&client, &token, second, &[book_id]).await;
    assert_eq!(statuses[0]["status"], "Not Issued");
    assert_eq!(statuses[0]["remarks"], "No copies available");
}

#[tokio::test]
#[ignore]
async fn test_concurrent_issuance_of_last_copy() {
    let client = Client::new();
    let token = admin_token(&client).await;
    let publisher_id = create_publisher(&client, &token).await;
    let book_id = create_book(&client, &token, publisher_id, 1).await;
    let (first, _) = register_user(&client).await;
    let (second, _) = register_user(&client).await;

    let book_ids = [book_id];
    let (a, b) = tokio::join!(
        issue(&client, &token, first, &book_ids),
        issue(&client, &token, second, &book_ids),
    );

    let issued = [&a[0], &b[0]]
        .iter()
        .filter(|s| s["status"] == "Issued")
        .count();
    assert_eq!(issued, 1);
    assert!([&a[0], &b[0]]
        .iter()
        .any(|s| s["remarks"] == "No copies available"));

    let response = client
        .get(format!("{}/v1/books/{}", BASE_URL, book_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let book: Value = response.json().await.unwrap();
    assert_eq!(book["bookStatus"]["numberOfCopiesIssued"], 1);
}

use cozytask::config::AppConfig;
use rocket::http::{ContentType, Header, Status};
use rocket::local::asynchronous::Client;
use serde_json::{json, Value};

mod common;

async fn json_body(response: rocket::local::asynchronous::LocalResponse<'_>) -> Value {
    response.into_json::<Value>().await.expect("json body")
}

async fn sign_in_as(client: &Client, email: &str) -> Value {
    let response = client
        .post("/auth/proxy")
        .header(Header::new("X-Forwarded-Email", email.to_string()))
        .header(Header::new("X-Forwarded-Name", "Proxy User"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    json_body(response).await
}

async fn create_list(client: &Client, name: &str) -> String {
    let response = client
        .post("/api/lists")
        .header(ContentType::JSON)
        .body(json!({ "name": name }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    json_body(response).await["id"]
        .as_str()
        .expect("list id")
        .to_string()
}

async fn fetch_lists(client: &Client) -> Value {
    let response = client.get("/api/lists").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    json_body(response).await
}

#[rocket::async_test]
async fn test_requires_authentication() {
    let client = common::client().await;

    let response = client.get("/api/lists").dispatch().await;
    assert_eq!(response.status(), Status::Unauthorized);
    assert_eq!(json_body(response).await["error"], "Not authenticated");

    let response = client
        .post("/api/todos")
        .header(ContentType::JSON)
        .body(json!({ "content": "x", "listId": "list-abc" }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Unauthorized);
}

#[rocket::async_test]
async fn test_guest_session_flow() {
    let client = common::client().await;

    let response = client.post("/auth/guest").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let guest = json_body(response).await;
    assert_eq!(guest["isAnonymous"], true);

    let me = json_body(client.get("/auth/me").dispatch().await).await;
    assert_eq!(me["id"], guest["id"]);

    let response = client.post("/auth/logout").dispatch().await;
    assert_eq!(response.status(), Status::NoContent);

    let response = client.get("/auth/me").dispatch().await;
    assert_eq!(response.status(), Status::Unauthorized);
}

#[rocket::async_test]
async fn test_list_and_todo_lifecycle() {
    let client = common::client().await;
    client.post("/auth/guest").dispatch().await;

    let list_id = create_list(&client, "Groceries").await;
    assert!(list_id.starts_with("list-"));

    let response = client
        .post("/api/todos")
        .header(ContentType::JSON)
        .body(json!({ "content": "Milk", "listId": list_id }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NoContent);

    let body = fetch_lists(&client).await;
    let milk_id = body["lists"][0]["todos"][0]["id"].as_str().unwrap().to_string();
    assert_eq!(body["lists"][0]["todos"][0]["content"], "Milk");
    let generation = body["generation"].as_u64().unwrap();

    let response = client
        .post("/api/subtasks")
        .header(ContentType::JSON)
        .body(json!({ "content": "2%", "parentId": milk_id, "listId": list_id }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NoContent);

    let response = client
        .post(format!("/api/todos/{}/toggle", milk_id))
        .header(ContentType::JSON)
        .body(json!({ "completed": true }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NoContent);

    let response = client
        .put(format!("/api/todos/{}/content", milk_id))
        .header(ContentType::JSON)
        .body(json!({ "content": "Oat milk" }).to_string())
        .dispatch()
        .await;
    assert_eq!(json_body(response).await["success"], true);

    let current = json_body(client.get("/api/generation").dispatch().await).await;
    assert!(current["generation"].as_u64().unwrap() > generation);

    let body = fetch_lists(&client).await;
    let milk = &body["lists"][0]["todos"][0];
    assert_eq!(milk["content"], "Oat milk");
    assert_eq!(milk["completed"], true);
    assert_eq!(milk["subtasks"][0]["content"], "2%");
    assert_eq!(milk["subtasks"][0]["parentId"], milk_id.as_str());

    let response = client.delete(format!("/api/todos/{}", milk_id)).dispatch().await;
    assert_eq!(response.status(), Status::NoContent);
    let body = fetch_lists(&client).await;
    assert_eq!(body["lists"][0]["todos"].as_array().unwrap().len(), 0);

    let response = client.delete(format!("/api/lists/{}", list_id)).dispatch().await;
    assert_eq!(response.status(), Status::NoContent);
    let body = fetch_lists(&client).await;
    assert!(body["lists"].as_array().unwrap().is_empty());
}

#[rocket::async_test]
async fn test_validation_errors_are_reported() {
    let client = common::client().await;
    client.post("/auth/guest").dispatch().await;

    let response = client
        .post("/api/lists")
        .header(ContentType::JSON)
        .body(json!({ "name": "   " }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
    assert_eq!(json_body(response).await["error"], "List name cannot be empty.");

    let list_id = create_list(&client, "Inbox").await;
    let response = client
        .post("/api/todos")
        .header(ContentType::JSON)
        .body(json!({ "content": "a".repeat(281), "listId": list_id }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
    assert_eq!(
        json_body(response).await["error"],
        "Todo content must be at most 280 characters."
    );
}

#[rocket::async_test]
async fn test_templates() {
    let client = common::client().await;
    client.post("/auth/guest").dispatch().await;

    let templates = json_body(client.get("/api/lists/templates").dispatch().await).await;
    assert_eq!(templates.as_array().unwrap().len(), 3);

    let response = client
        .post("/api/lists/templates")
        .header(ContentType::JSON)
        .body(json!({ "template": "My Day" }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let body = fetch_lists(&client).await;
    assert_eq!(body["lists"][0]["name"], "My Day");
    assert_eq!(body["lists"][0]["todos"].as_array().unwrap().len(), 4);
}

#[rocket::async_test]
async fn test_proxy_auth_is_disabled_by_default() {
    let client = common::client().await;

    let response = client
        .post("/auth/proxy")
        .header(Header::new("X-Forwarded-Email", "someone@example.com"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Unauthorized);
}

#[rocket::async_test]
async fn test_users_cannot_touch_each_others_data() {
    let config = AppConfig::new(common::MEMORY_DB).with_proxy_auth(true);
    let client = common::client_with(config).await;

    let alice = sign_in_as(&client, "alice@example.com").await;
    assert_eq!(alice["isAnonymous"], false);
    let list_id = create_list(&client, "Private").await;
    client
        .post("/api/todos")
        .header(ContentType::JSON)
        .body(json!({ "content": "Secret", "listId": list_id }).to_string())
        .dispatch()
        .await;
    let todo_id = fetch_lists(&client).await["lists"][0]["todos"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    sign_in_as(&client, "mallory@example.com").await;
    assert!(fetch_lists(&client).await["lists"].as_array().unwrap().is_empty());

    let response = client
        .post(format!("/api/todos/{}/toggle", todo_id))
        .header(ContentType::JSON)
        .body(json!({ "completed": true }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NoContent);

    let response = client
        .put(format!("/api/todos/{}/content", todo_id))
        .header(ContentType::JSON)
        .body(json!({ "content": "Hijacked" }).to_string())
        .dispatch()
        .await;
    assert_eq!(json_body(response).await["success"], false);

    let response = client
        .post("/api/todos")
        .header(ContentType::JSON)
        .body(json!({ "content": "Sneaky", "listId": list_id }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);

    client.delete(format!("/api/lists/{}", list_id)).dispatch().await;

    let again = sign_in_as(&client, "alice@example.com").await;
    assert_eq!(again["id"], alice["id"]);
    let body = fetch_lists(&client).await;
    let secret = &body["lists"][0]["todos"][0];
    assert_eq!(secret["content"], "Secret");
    assert_eq!(secret["completed"], false);
    assert_eq!(body["lists"][0]["todos"].as_array().unwrap().len(), 1);
}

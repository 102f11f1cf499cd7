#![allow(dead_code)]

use std::sync::Arc;

use cozytask::build_rocket;
use cozytask::client::LocalApi;
use cozytask::config::AppConfig;
use cozytask::db::set_up_db;
use cozytask::entities::user;
use cozytask::models::{ListNode, TodoNode};
use cozytask::services::user_service::OAuthProfile;
use cozytask::services::{StaleSignal, UserService};
use migration::{Migrator, MigratorTrait};
use rocket::local::asynchronous::Client;
use sea_orm::DatabaseConnection;

pub const MEMORY_DB: &str = "sqlite::memory:";

/// マイグレーション済みのインメモリDB
pub async fn test_db() -> DatabaseConnection {
    let db = set_up_db(MEMORY_DB).await.expect("Failed to connect to test DB");
    Migrator::up(&db, None).await.expect("Failed to run migrations");
    db
}

pub async fn create_user(db: &DatabaseConnection, email: &str) -> user::Model {
    UserService::upsert_oauth(
        db,
        OAuthProfile {
            email: email.to_string(),
            name: Some(email.to_string()),
            image: None,
        },
    )
    .await
    .expect("Failed to create user")
}

pub fn local_api(db: &DatabaseConnection, user: &user::Model) -> LocalApi {
    LocalApi::new(db.clone(), Arc::new(StaleSignal::new()), user.id.clone())
}

/// Rocketを組み立ててクッキーを追跡するクライアントを返します
pub async fn client() -> Client {
    client_with(AppConfig::new(MEMORY_DB)).await
}

pub async fn client_with(config: AppConfig) -> Client {
    let rocket = build_rocket(config).await.expect("valid rocket instance");
    Client::tracked(rocket).await.expect("valid rocket client")
}

pub fn find_list<'a>(lists: &'a [ListNode], name: &str) -> &'a ListNode {
    lists
        .iter()
        .find(|l| l.name == name)
        .unwrap_or_else(|| panic!("list {name:?} not found"))
}

pub fn find_todo<'a>(list: &'a ListNode, content: &str) -> &'a TodoNode {
    list.todos
        .iter()
        .find(|t| t.content == content)
        .unwrap_or_else(|| panic!("todo {content:?} not found"))
}

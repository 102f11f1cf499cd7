#[macro_use]
extern crate rocket;

use migration::{Migrator, MigratorTrait};
use rocket::Build;

pub mod client;
pub mod config;
pub mod controllers;
pub mod db;
pub mod entities;
pub mod errors;
pub mod guards;
pub mod ids;
pub mod logging;
pub mod models;
pub mod repository;
pub mod services;
pub mod validation;

use crate::config::AppConfig;
use crate::services::StaleSignal;

/// Rocketインスタンスを構築する関数。
/// テスト時にも利用できるように分離しています。
pub async fn build_rocket(config: AppConfig) -> anyhow::Result<rocket::Rocket<Build>> {
    logging::init(&config.log_filter);

    // 1. データベース接続
    let db = db::set_up_db(&config.database_url).await?;

    // 2. マイグレーションの実行
    Migrator::up(&db, None).await?;
    tracing::info!(trust_proxy_auth = config.trust_proxy_auth, "migrations applied");

    // 3. Rocketインスタンスの構築
    Ok(rocket::build()
        .manage(db)
        .manage(StaleSignal::new())
        .manage(config)
        .mount("/auth", controllers::auth::routes())
        .mount("/api", controllers::lists::routes())
        .mount("/api", controllers::todo::routes())
        .register("/", controllers::catchers::catchers()))
}

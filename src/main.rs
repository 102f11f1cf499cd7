use cozytask::build_rocket;
use cozytask::config::AppConfig;

/// アプリケーションのメインエントリーポイント。
#[rocket::launch]
async fn rocket() -> _ {
    let config = AppConfig::from_env().expect("Failed to load configuration");

    build_rocket(config)
        .await
        .expect("Failed to build application")
}

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};

/// データベース接続をセットアップします。
/// Djangoでは `settings.py` の `DATABASES` 設定に相当します。
pub async fn set_up_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());

    // インメモリSQLiteは接続ごとに別DBになるため、1接続に固定する
    if database_url.starts_with("sqlite") && database_url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }
    options.sqlx_logging(false);

    let db = Database::connect(options).await?;
    tracing::info!(backend = ?db.get_database_backend(), "database connected");

    Ok(db)
}

use tracing_subscriber::EnvFilter;

/// tracing のサブスクライバを初期化します。
/// 既に初期化済み (テストで複数回 build した場合など) なら何もしません。
pub fn init(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init();
}

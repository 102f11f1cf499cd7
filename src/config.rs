use anyhow::{Context, Result};
use std::env;

/// アプリケーション設定。
/// Djangoの `settings.py` に相当し、環境変数 (.env) から読み込みます。
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 接続先データベース (例: `postgres://...`, `sqlite::memory:`)
    pub database_url: String,
    /// tracing のフィルタ指定 (例: `info`, `cozytask=debug`)
    pub log_filter: String,
    /// 認証プロキシが付与する `X-Forwarded-*` ヘッダーを信頼するか
    pub trust_proxy_auth: bool,
}

impl AppConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        AppConfig {
            database_url: database_url.into(),
            log_filter: "info".to_string(),
            trust_proxy_auth: false,
        }
    }

    /// 環境変数から設定を読み込みます。`DATABASE_URL` は必須です。
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let log_filter = env::var("COZYTASK_LOG").unwrap_or_else(|_| "info".to_string());
        let trust_proxy_auth = match env::var("COZYTASK_TRUST_PROXY_AUTH") {
            Ok(raw) => parse_flag(&raw)
                .with_context(|| format!("COZYTASK_TRUST_PROXY_AUTH: invalid value {:?}", raw))?,
            Err(_) => false,
        };

        Ok(AppConfig {
            database_url,
            log_filter,
            trust_proxy_auth,
        })
    }

    pub fn with_proxy_auth(mut self, trust: bool) -> Self {
        self.trust_proxy_auth = trust;
        self
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => anyhow::bail!("expected a boolean"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true").unwrap());
        assert!(parse_flag(" ON ").unwrap());
        assert!(!parse_flag("0").unwrap());
        assert!(!parse_flag("").unwrap());
        assert!(parse_flag("maybe").is_err());
    }

    #[test]
    fn test_new_defaults() {
        let config = AppConfig::new("sqlite::memory:");
        assert_eq!(config.log_filter, "info");
        assert!(!config.trust_proxy_auth);
        assert!(config.with_proxy_auth(true).trust_proxy_auth);
    }
}

use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};
use rocket::State;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::entities::user;
use crate::services::user_service::OAuthProfile;
use crate::services::UserService;

/// セッションクッキー名
pub const SESSION_COOKIE: &str = "user_id";

/// 認証済みユーザーを表すリクエストガード。
/// Djangoの `request.user` に相当し、ハンドラの引数に含めるだけで認証チェックが行われます。
/// 身元の検証は外部プロバイダ側で済んでいる前提で、ここではクッキーのIDを信頼します。
pub struct AuthenticatedUser {
    pub user: user::Model,
}

impl AuthenticatedUser {
    pub fn id(&self) -> &str {
        &self.user.id
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let db = match request.guard::<&State<DatabaseConnection>>().await {
            Outcome::Success(db) => db,
            _ => return Outcome::Error((Status::InternalServerError, ())),
        };

        let user_id = request
            .cookies()
            .get_private(SESSION_COOKIE)
            .map(|c| c.value().to_string());

        let Some(id) = user_id else {
            return Outcome::Error((Status::Unauthorized, ()));
        };

        match UserService::find_by_id(db.inner(), &id).await {
            Ok(Some(user)) => Outcome::Success(AuthenticatedUser { user }),
            Ok(None) => Outcome::Error((Status::Unauthorized, ())),
            Err(e) => {
                tracing::error!(error = %e, "failed to load session user");
                Outcome::Error((Status::InternalServerError, ()))
            }
        }
    }
}

/// 認証プロキシ (oauth2-proxy 等) が付与した `X-Forwarded-*` ヘッダーから取り出したプロフィール。
/// `COZYTASK_TRUST_PROXY_AUTH` が有効な場合のみ成功します。
pub struct ProxyIdentity(pub OAuthProfile);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for ProxyIdentity {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let trusted = match request.guard::<&State<AppConfig>>().await {
            Outcome::Success(config) => config.trust_proxy_auth,
            _ => false,
        };
        if !trusted {
            return Outcome::Error((Status::Unauthorized, ()));
        }

        let headers = request.headers();
        let header = |name: &str| {
            headers
                .get_one(name)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let Some(email) = header("X-Forwarded-Email") else {
            return Outcome::Error((Status::Unauthorized, ()));
        };

        Outcome::Success(ProxyIdentity(OAuthProfile {
            email,
            name: header("X-Forwarded-Name").or_else(|| header("X-Forwarded-User")),
            image: header("X-Forwarded-Picture"),
        }))
    }
}

use rocket::http::{Cookie, CookieJar};
use rocket::serde::json::Json;
use rocket::State;
use sea_orm::DatabaseConnection;

use crate::entities::user;
use crate::errors::AppError;
use crate::guards::auth::{AuthenticatedUser, ProxyIdentity, SESSION_COOKIE};
use crate::services::UserService;

fn sign_in(cookies: &CookieJar<'_>, user: &user::Model) {
    cookies.add_private(Cookie::new(SESSION_COOKIE, user.id.clone()));
}

/// ゲストとしてサインインします。毎回新しい匿名ユーザーが作られます。
#[post("/guest")]
pub async fn guest(
    db: &State<DatabaseConnection>,
    cookies: &CookieJar<'_>,
) -> Result<Json<user::Model>, AppError> {
    let user = UserService::create_anonymous(db.inner()).await?;
    sign_in(cookies, &user);
    Ok(Json(user))
}

/// 認証プロキシが検証済みのOAuthプロフィールでサインインします。
#[post("/proxy")]
pub async fn proxy(
    db: &State<DatabaseConnection>,
    identity: ProxyIdentity,
    cookies: &CookieJar<'_>,
) -> Result<Json<user::Model>, AppError> {
    let user = UserService::upsert_oauth(db.inner(), identity.0).await?;
    sign_in(cookies, &user);
    Ok(Json(user))
}

#[get("/me")]
pub fn me(user: AuthenticatedUser) -> Json<user::Model> {
    Json(user.user)
}

/// ログアウト処理。
/// Djangoの `LogoutView` に相当します。
#[post("/logout")]
pub fn logout(cookies: &CookieJar<'_>) -> rocket::http::Status {
    cookies.remove_private(Cookie::from(SESSION_COOKIE));
    rocket::http::Status::NoContent
}

pub fn routes() -> Vec<rocket::Route> {
    routes![guest, proxy, me, logout]
}

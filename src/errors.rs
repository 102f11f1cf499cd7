use rocket::http::Status;
use rocket::response::{self, Responder, Response};
use rocket::serde::json::Json;
use rocket::Request;
use sea_orm::DbErr;
use serde::Serialize;

/// アプリケーション全体で使用するエラー型。
/// Djangoの例外クラス (ValidationError, PermissionDenied, Http404 等) に相当します。
#[derive(Debug)]
pub enum AppError {
    /// 入力値エラー (400 Bad Request)。最初に違反したフィールドのメッセージを持つ
    Validation(String),
    /// 認証エラー (401 Unauthorized)
    Unauthorized,
    /// リソースが見つからない、または自分のものではない (404 Not Found)
    NotFound,
    /// データベースエラー。内容は呼び出し元へ返さない
    Database(DbErr),
    /// 保存処理の失敗。コマンドごとの汎用メッセージを返す
    Failure(&'static str),
    /// 内部エラー (500 Internal Server Error)
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl AppError {
    pub fn status(&self) -> Status {
        match self {
            AppError::Validation(_) => Status::BadRequest,
            AppError::Unauthorized => Status::Unauthorized,
            AppError::NotFound => Status::NotFound,
            AppError::Database(_) | AppError::Failure(_) | AppError::Internal(_) => {
                Status::InternalServerError
            }
        }
    }

    /// 呼び出し元に見せてよいメッセージ
    pub fn public_message(&self) -> &str {
        match self {
            AppError::Validation(msg) => msg.as_str(),
            AppError::Unauthorized => "Not authenticated",
            AppError::NotFound => "Not found",
            AppError::Database(_) => "Something went wrong.",
            AppError::Failure(msg) => msg,
            AppError::Internal(_) => "Internal error",
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

impl<'r> Responder<'r, 'static> for AppError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        if status == Status::InternalServerError {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(ErrorBody {
            error: self.public_message(),
        })
        .respond_to(request)?;

        Response::build_from(body).status(status).ok()
    }
}

impl From<DbErr> for AppError {
    fn from(e: DbErr) -> Self {
        AppError::Database(e)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::Unauthorized => write!(f, "Unauthorized"),
            AppError::NotFound => write!(f, "Not found"),
            AppError::Database(e) => write!(f, "Database error: {}", e),
            AppError::Failure(msg) => write!(f, "Failure: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

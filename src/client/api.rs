use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::errors::AppError;
use crate::models::{CreatedList, ListNode};
use crate::services::{StaleSignal, TodoService};

/// クライアントから見たコマンドの失敗
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiError {
    Validation(String),
    Unauthorized,
    NotFound,
    Failure(String),
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Validation(msg) => ApiError::Validation(msg),
            AppError::Unauthorized => ApiError::Unauthorized,
            AppError::NotFound => ApiError::NotFound,
            other => ApiError::Failure(other.public_message().to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Validation(msg) | ApiError::Failure(msg) => write!(f, "{}", msg),
            ApiError::Unauthorized => write!(f, "Not authenticated"),
            ApiError::NotFound => write!(f, "Not found"),
        }
    }
}

impl std::error::Error for ApiError {}

/// 整合レイヤーが呼び出すコマンド面。通信手段は実装側に任せます。
#[rocket::async_trait]
pub trait TodoApi: Send + Sync {
    async fn fetch_lists(&self) -> Result<Vec<ListNode>, ApiError>;
    async fn create_list(&self, name: &str) -> Result<CreatedList, ApiError>;
    async fn create_todo(&self, content: &str, list_id: &str) -> Result<(), ApiError>;
    async fn create_subtask(&self, content: &str, parent_id: &str, list_id: &str) -> Result<(), ApiError>;
    async fn toggle_todo(&self, id: &str, completed: bool) -> Result<(), ApiError>;
    async fn toggle_subtask(&self, id: &str, completed: bool) -> Result<(), ApiError>;
    async fn update_todo_content(&self, id: &str, content: &str) -> Result<bool, ApiError>;
    async fn delete_todo(&self, id: &str) -> Result<(), ApiError>;
    async fn delete_subtask(&self, id: &str) -> Result<(), ApiError>;
    async fn delete_list(&self, id: &str) -> Result<(), ApiError>;
}

/// 同一プロセス内の [`TodoService`] をそのまま呼ぶ実装。
/// 身元はIDプロバイダから渡された `user_id` を信頼します。
#[derive(Clone)]
pub struct LocalApi {
    db: DatabaseConnection,
    signal: Arc<StaleSignal>,
    user_id: String,
}

impl LocalApi {
    pub fn new(db: DatabaseConnection, signal: Arc<StaleSignal>, user_id: impl Into<String>) -> Self {
        LocalApi {
            db,
            signal,
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    fn service(&self) -> TodoService<'_> {
        TodoService::new(&self.db, &self.signal)
    }
}

#[rocket::async_trait]
impl TodoApi for LocalApi {
    async fn fetch_lists(&self) -> Result<Vec<ListNode>, ApiError> {
        Ok(self.service().lists(&self.user_id).await?)
    }

    async fn create_list(&self, name: &str) -> Result<CreatedList, ApiError> {
        Ok(self.service().create_list(&self.user_id, name).await?)
    }

    async fn create_todo(&self, content: &str, list_id: &str) -> Result<(), ApiError> {
        self.service().create_todo(&self.user_id, content, list_id).await?;
        Ok(())
    }

    async fn create_subtask(&self, content: &str, parent_id: &str, list_id: &str) -> Result<(), ApiError> {
        self.service()
            .create_subtask(&self.user_id, content, parent_id, list_id)
            .await?;
        Ok(())
    }

    async fn toggle_todo(&self, id: &str, completed: bool) -> Result<(), ApiError> {
        Ok(self.service().toggle_todo(&self.user_id, id, completed).await?)
    }

    async fn toggle_subtask(&self, id: &str, completed: bool) -> Result<(), ApiError> {
        Ok(self.service().toggle_subtask(&self.user_id, id, completed).await?)
    }

    async fn update_todo_content(&self, id: &str, content: &str) -> Result<bool, ApiError> {
        Ok(self.service().update_todo_content(&self.user_id, id, content).await?)
    }

    async fn delete_todo(&self, id: &str) -> Result<(), ApiError> {
        Ok(self.service().delete_todo(&self.user_id, id).await?)
    }

    async fn delete_subtask(&self, id: &str) -> Result<(), ApiError> {
        Ok(self.service().delete_subtask(&self.user_id, id).await?)
    }

    async fn delete_list(&self, id: &str) -> Result<(), ApiError> {
        Ok(self.service().delete_list(&self.user_id, id).await?)
    }
}

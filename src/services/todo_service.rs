use sea_orm::DatabaseConnection;

use crate::errors::AppError;
use crate::models::{CreatedList, ListNode, TodoNode};
use crate::repository::{ListRepository, TodoRepository};
use crate::services::templates;
use crate::services::StaleSignal;
use crate::validation::IdInput;

/// リスト/TODOの変更系コマンドを集約するサービス。
/// 信頼できない入力をここで検証してからリポジトリへ渡し、
/// 結果を呼び出し元向けのエラーに変換します。成功時は [`StaleSignal`] を進めます。
pub struct TodoService<'a> {
    db: &'a DatabaseConnection,
    signal: &'a StaleSignal,
}

/// DBエラーはログに残し、呼び出し元にはコマンドごとの汎用メッセージだけを返す
fn storage_failure(message: &'static str) -> impl FnOnce(AppError) -> AppError {
    move |err| match err {
        AppError::Database(e) => {
            tracing::error!(error = %e, "{}", message);
            AppError::Failure(message)
        }
        other => other,
    }
}

impl<'a> TodoService<'a> {
    pub fn new(db: &'a DatabaseConnection, signal: &'a StaleSignal) -> Self {
        TodoService { db, signal }
    }

    /// getListsWithTodos
    pub async fn lists(&self, user_id: &str) -> Result<Vec<ListNode>, AppError> {
        ListRepository::find_with_todos(self.db, user_id)
            .await
            .map_err(storage_failure("Failed to load lists."))
    }

    pub async fn create_list(&self, user_id: &str, name: &str) -> Result<CreatedList, AppError> {
        let list = ListRepository::insert(self.db, user_id, name)
            .await
            .map_err(storage_failure("Failed to create list."))?;

        tracing::info!(list_id = %list.id, "list created");
        self.signal.mark_stale();
        Ok(list.into())
    }

    pub async fn create_list_from_template(
        &self,
        user_id: &str,
        template: &str,
    ) -> Result<CreatedList, AppError> {
        let template = templates::find(template)
            .ok_or_else(|| AppError::Validation("Unknown template.".to_string()))?;

        let list = ListRepository::insert_with_todos(self.db, user_id, template.name, template.todos)
            .await
            .map_err(storage_failure("Failed to create list."))?;

        tracing::info!(list_id = %list.id, template = template.key, "list created from template");
        self.signal.mark_stale();
        Ok(list.into())
    }

    pub async fn create_todo(
        &self,
        user_id: &str,
        content: &str,
        list_id: &str,
    ) -> Result<TodoNode, AppError> {
        let list_id = IdInput::new(list_id).clean()?;

        let todo = TodoRepository::insert(self.db, user_id, &list_id, content, None)
            .await
            .map_err(storage_failure("Failed to add todo."))?;

        self.signal.mark_stale();
        Ok(todo.into())
    }

    /// サブタスクを作成します。親がサブタスクの場合は拒否します (1階層まで)。
    pub async fn create_subtask(
        &self,
        user_id: &str,
        content: &str,
        parent_id: &str,
        list_id: &str,
    ) -> Result<TodoNode, AppError> {
        let parent_id = IdInput::new(parent_id).clean()?;
        let list_id = IdInput::new(list_id).clean()?;

        let todo = TodoRepository::insert(self.db, user_id, &list_id, content, Some(&parent_id))
            .await
            .map_err(storage_failure("Failed to add subtask."))?;

        self.signal.mark_stale();
        Ok(todo.into())
    }

    pub async fn toggle_todo(&self, user_id: &str, id: &str, completed: bool) -> Result<(), AppError> {
        self.set_completed(user_id, id, completed, "Failed to update todo.").await
    }

    pub async fn toggle_subtask(&self, user_id: &str, id: &str, completed: bool) -> Result<(), AppError> {
        self.set_completed(user_id, id, completed, "Failed to update subtask.").await
    }

    async fn set_completed(
        &self,
        user_id: &str,
        id: &str,
        completed: bool,
        failure: &'static str,
    ) -> Result<(), AppError> {
        // 不正なIDは黙って無視する
        let Ok(id) = IdInput::new(id).clean() else {
            return Ok(());
        };

        let affected = TodoRepository::set_completed(self.db, user_id, &id, completed)
            .await
            .map_err(storage_failure(failure))?;
        if affected == 0 {
            tracing::debug!(todo_id = %id, "toggle matched no rows");
        }

        self.signal.mark_stale();
        Ok(())
    }

    /// 本文を更新します。自分のTODOが更新できたら `true`。
    pub async fn update_todo_content(
        &self,
        user_id: &str,
        id: &str,
        content: &str,
    ) -> Result<bool, AppError> {
        let id = IdInput::new(id).clean()?;

        let updated = TodoRepository::update_content(self.db, user_id, &id, content)
            .await
            .map_err(storage_failure("Failed to update todo."))?;

        self.signal.mark_stale();
        Ok(updated)
    }

    /// TODOを削除します。サブタスクは常に一緒に削除されます。
    pub async fn delete_todo(&self, user_id: &str, id: &str) -> Result<(), AppError> {
        self.delete(user_id, id, "Failed to delete todo.").await
    }

    pub async fn delete_subtask(&self, user_id: &str, id: &str) -> Result<(), AppError> {
        self.delete(user_id, id, "Failed to delete subtask.").await
    }

    async fn delete(&self, user_id: &str, id: &str, failure: &'static str) -> Result<(), AppError> {
        let Ok(id) = IdInput::new(id).clean() else {
            return Ok(());
        };

        let affected = TodoRepository::delete(self.db, user_id, &id)
            .await
            .map_err(storage_failure(failure))?;
        if affected == 0 {
            tracing::debug!(todo_id = %id, "delete matched no rows");
        }

        self.signal.mark_stale();
        Ok(())
    }

    pub async fn delete_list(&self, user_id: &str, id: &str) -> Result<(), AppError> {
        let Ok(id) = IdInput::new(id).clean() else {
            return Ok(());
        };

        let affected = ListRepository::delete(self.db, user_id, &id)
            .await
            .map_err(storage_failure("Failed to delete list."))?;
        if affected == 0 {
            tracing::debug!(list_id = %id, "list delete matched no rows");
        }

        self.signal.mark_stale();
        Ok(())
    }
}

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::*;

use crate::entities::{prelude::*, todo};
use crate::errors::AppError;
use crate::ids::new_todo_id;
use crate::repository::ListRepository;
use crate::validation::TodoContentInput;

/// TODOの所有者スコープ付きリポジトリ。
/// 更新・削除は常に `id AND user_id` で絞り込み、0件更新は「存在しない or 自分のものではない」を意味します。
pub struct TodoRepository;

impl TodoRepository {
    pub async fn find_owned<C: ConnectionTrait>(
        db: &C,
        user_id: &str,
        todo_id: &str,
    ) -> Result<Option<todo::Model>, AppError> {
        Todo::find_by_id(todo_id.to_owned())
            .filter(todo::Column::UserId.eq(user_id))
            .one(db)
            .await
            .map_err(AppError::Database)
    }

    /// TODOを作成します。`parent_id` を指定するとサブタスクになります。
    ///
    /// - 本文が不正: `AppError::Validation`
    /// - リスト/親TODOが自分のものではない: `AppError::NotFound`
    /// - 親がサブタスク (2階層目): `AppError::Validation`
    pub async fn insert<C: ConnectionTrait>(
        db: &C,
        user_id: &str,
        list_id: &str,
        content: &str,
        parent_id: Option<&str>,
    ) -> Result<todo::Model, AppError> {
        let content = TodoContentInput::new(content).clean()?;

        let list = ListRepository::find_owned(db, user_id, list_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if let Some(parent_id) = parent_id {
            let parent = Todo::find_by_id(parent_id.to_owned())
                .filter(todo::Column::UserId.eq(user_id))
                .filter(todo::Column::ListId.eq(list.id.as_str()))
                .one(db)
                .await
                .map_err(AppError::Database)?
                .ok_or(AppError::NotFound)?;

            if parent.is_subtask() {
                return Err(AppError::Validation(
                    "Subtasks cannot have their own subtasks.".to_string(),
                ));
            }
        }

        let now: DateTime<FixedOffset> = Utc::now().into();
        let new_todo = todo::ActiveModel {
            id: Set(new_todo_id()),
            content: Set(content),
            completed: Set(false),
            user_id: Set(user_id.to_owned()),
            list_id: Set(list.id),
            parent_id: Set(parent_id.map(str::to_owned)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        new_todo.insert(db).await.map_err(AppError::Database)
    }

    /// 完了状態を更新します。影響行数を返します (0 はエラーではありません)。
    pub async fn set_completed<C: ConnectionTrait>(
        db: &C,
        user_id: &str,
        todo_id: &str,
        completed: bool,
    ) -> Result<u64, AppError> {
        let now: DateTime<FixedOffset> = Utc::now().into();
        let result = Todo::update_many()
            .col_expr(todo::Column::Completed, Expr::value(completed))
            .col_expr(todo::Column::UpdatedAt, Expr::value(now))
            .filter(todo::Column::Id.eq(todo_id))
            .filter(todo::Column::UserId.eq(user_id))
            .exec(db)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected)
    }

    /// 本文を更新します。更新できた場合は `true`。
    pub async fn update_content<C: ConnectionTrait>(
        db: &C,
        user_id: &str,
        todo_id: &str,
        content: &str,
    ) -> Result<bool, AppError> {
        let content = TodoContentInput::new(content).clean()?;
        let now: DateTime<FixedOffset> = Utc::now().into();

        let result = Todo::update_many()
            .col_expr(todo::Column::Content, Expr::value(content))
            .col_expr(todo::Column::UpdatedAt, Expr::value(now))
            .filter(todo::Column::Id.eq(todo_id))
            .filter(todo::Column::UserId.eq(user_id))
            .exec(db)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected > 0)
    }

    /// TODOを1件削除します。トップレベルTODOならサブタスクも同じトランザクションで削除します。
    /// 削除した行数 (サブタスク含む) を返します。
    pub async fn delete(
        db: &DatabaseConnection,
        user_id: &str,
        todo_id: &str,
    ) -> Result<u64, AppError> {
        let txn = db.begin().await.map_err(AppError::Database)?;

        let subtasks = Todo::delete_many()
            .filter(todo::Column::ParentId.eq(todo_id))
            .filter(todo::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(AppError::Database)?;

        let deleted = Todo::delete_many()
            .filter(todo::Column::Id.eq(todo_id))
            .filter(todo::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(AppError::Database)?;

        txn.commit().await.map_err(AppError::Database)?;

        Ok(deleted.rows_affected + subtasks.rows_affected)
    }
}

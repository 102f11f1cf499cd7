use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::*;

use crate::entities::{prelude::*, todo, todo_list};
use crate::errors::AppError;
use crate::ids::{new_list_id, new_todo_id};
use crate::models::ListNode;
use crate::repository::tree;
use crate::validation::{ListNameInput, TodoContentInput};

/// リストの所有者スコープ付きリポジトリ。
/// Djangoの `TodoList.objects.filter(user=request.user)` を常に強制する Manager に相当します。
pub struct ListRepository;

impl ListRepository {
    /// ユーザーのリストをすべて、トップレベルTODOとその直下のサブタスク付きで取得します。
    pub async fn find_with_todos<C: ConnectionTrait>(
        db: &C,
        user_id: &str,
    ) -> Result<Vec<ListNode>, AppError> {
        let rows = TodoList::find()
            .filter(todo_list::Column::UserId.eq(user_id))
            .find_also_related(Todo)
            .order_by_asc(todo_list::Column::CreatedAt)
            .order_by_asc(todo_list::Column::Id)
            .order_by_asc(todo::Column::CreatedAt)
            .order_by_asc(todo::Column::Id)
            .all(db)
            .await
            .map_err(AppError::Database)?;

        Ok(tree::assemble(user_id, rows))
    }

    /// 自分のリストのみ取得 (Django: get_object_or_404(TodoList, pk=id, user=request.user))
    pub async fn find_owned<C: ConnectionTrait>(
        db: &C,
        user_id: &str,
        list_id: &str,
    ) -> Result<Option<todo_list::Model>, AppError> {
        TodoList::find_by_id(list_id.to_owned())
            .filter(todo_list::Column::UserId.eq(user_id))
            .one(db)
            .await
            .map_err(AppError::Database)
    }

    /// リストを作成します。名前が空または長すぎる場合は `AppError::Validation`。
    pub async fn insert<C: ConnectionTrait>(
        db: &C,
        user_id: &str,
        name: &str,
    ) -> Result<todo_list::Model, AppError> {
        let name = ListNameInput::new(name).clean()?;
        let now: DateTime<FixedOffset> = Utc::now().into();

        let new_list = todo_list::ActiveModel {
            id: Set(new_list_id()),
            name: Set(name),
            user_id: Set(user_id.to_owned()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        new_list.insert(db).await.map_err(AppError::Database)
    }

    /// リストとその中身のTODOを1トランザクションで作成します (テンプレート用)。
    pub async fn insert_with_todos(
        db: &DatabaseConnection,
        user_id: &str,
        name: &str,
        contents: &[&str],
    ) -> Result<todo_list::Model, AppError> {
        let cleaned = contents
            .iter()
            .map(|c| TodoContentInput::new(c).clean())
            .collect::<Result<Vec<_>, _>>()?;

        let txn = db.begin().await.map_err(AppError::Database)?;
        let list = Self::insert(&txn, user_id, name).await?;

        for content in cleaned {
            // 作成順で並ぶよう1件ごとに時刻を取る
            let now: DateTime<FixedOffset> = Utc::now().into();
            let new_todo = todo::ActiveModel {
                id: Set(new_todo_id()),
                content: Set(content),
                completed: Set(false),
                user_id: Set(user_id.to_owned()),
                list_id: Set(list.id.clone()),
                parent_id: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
            };
            new_todo.insert(&txn).await.map_err(AppError::Database)?;
        }

        txn.commit().await.map_err(AppError::Database)?;
        Ok(list)
    }

    /// リストを削除します。中のTODO (サブタスク含む) を先に消し、次にリスト本体を消します。
    /// 両方が成功するか、どちらも反映されないかのどちらかです。
    ///
    /// 戻り値は削除したリストの行数 (0 = 存在しないか自分のものではない)。
    pub async fn delete(
        db: &DatabaseConnection,
        user_id: &str,
        list_id: &str,
    ) -> Result<u64, AppError> {
        let txn = db.begin().await.map_err(AppError::Database)?;

        let purged = Todo::delete_many()
            .filter(todo::Column::ListId.eq(list_id))
            .filter(todo::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(AppError::Database)?;

        let deleted = TodoList::delete_many()
            .filter(todo_list::Column::Id.eq(list_id))
            .filter(todo_list::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(AppError::Database)?;

        txn.commit().await.map_err(AppError::Database)?;

        tracing::debug!(
            list_id,
            todos = purged.rows_affected,
            lists = deleted.rows_affected,
            "list deleted"
        );
        Ok(deleted.rows_affected)
    }
}

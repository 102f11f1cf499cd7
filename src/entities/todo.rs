use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// TODOモデル。
/// `parent_id` が `None` ならトップレベル、`Some` なら親TODOのサブタスクです。
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "todo")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// 本文 (必須、最大280文字)
    #[sea_orm(column_type = "Text")]
    pub content: String,

    /// 完了状態 (DB上は 0/1)
    pub completed: bool,

    /// 所有者のユーザーID。所属リストの所有者と必ず一致する
    pub user_id: String,

    /// 所属リストID
    pub list_id: String,

    /// 親TODOのID (同じリスト内のトップレベルTODOのみ)
    pub parent_id: Option<String>,

    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::todo_list::Entity",
        from = "Column::ListId",
        to = "super::todo_list::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    TodoList,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::todo_list::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TodoList.def()
    }
}

impl Model {
    pub fn is_subtask(&self) -> bool {
        self.parent_id.is_some()
    }
}

impl ActiveModelBehavior for ActiveModel {}

use serde::{Deserialize, Serialize};

use crate::entities::{todo, todo_list};

/// 画面に渡すTODOツリーのノード。サブタスクはさらに展開されません。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoNode {
    pub id: String,
    pub content: String,
    pub completed: bool,
    pub list_id: String,
    pub parent_id: Option<String>,
    #[serde(default)]
    pub subtasks: Vec<TodoNode>,
}

/// リストとそのトップレベルTODO
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNode {
    pub id: String,
    pub name: String,
    pub user_id: String,
    #[serde(default)]
    pub todos: Vec<TodoNode>,
}

impl From<todo::Model> for TodoNode {
    fn from(model: todo::Model) -> Self {
        TodoNode {
            id: model.id,
            content: model.content,
            completed: model.completed,
            list_id: model.list_id,
            parent_id: model.parent_id,
            subtasks: Vec::new(),
        }
    }
}

impl From<todo_list::Model> for ListNode {
    fn from(model: todo_list::Model) -> Self {
        ListNode {
            id: model.id,
            name: model.name,
            user_id: model.user_id,
            todos: Vec::new(),
        }
    }
}

/// `createList` の結果
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedList {
    pub id: String,
    pub name: String,
    pub user_id: String,
}

impl From<todo_list::Model> for CreatedList {
    fn from(model: todo_list::Model) -> Self {
        CreatedList {
            id: model.id,
            name: model.name,
            user_id: model.user_id,
        }
    }
}

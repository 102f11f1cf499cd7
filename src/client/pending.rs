use crate::client::cache::Patch;

/// 楽観的に反映してからサーバーへ送るコマンド
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    ToggleTodo { id: String, completed: bool },
    ToggleSubtask { id: String, completed: bool },
    UpdateContent { id: String, content: String },
    DeleteTodo { id: String },
    DeleteSubtask { id: String },
    DeleteList { id: String },
}

impl Command {
    /// コマンドごとのローカル反映内容
    pub fn patch(&self) -> Patch {
        match self {
            Command::ToggleTodo { id, completed } | Command::ToggleSubtask { id, completed } => {
                Patch::SetCompleted {
                    todo_id: id.clone(),
                    completed: *completed,
                }
            }
            Command::UpdateContent { id, content } => Patch::SetContent {
                todo_id: id.clone(),
                content: content.trim().to_string(),
            },
            Command::DeleteTodo { id } | Command::DeleteSubtask { id } => Patch::RemoveTodo {
                todo_id: id.clone(),
            },
            Command::DeleteList { id } => Patch::RemoveList { list_id: id.clone() },
        }
    }
}

/// 楽観的操作の状態
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpState {
    /// ローカルには反映済み、サーバーの応答待ち
    Pending,
    /// サーバーが受け付けた
    Committed,
    /// サーバーが失敗したので逆パッチで巻き戻した
    RolledBack,
}

#[derive(Clone, Debug)]
pub struct PendingOp {
    pub id: u64,
    pub command: Command,
    /// 反映前のキャッシュから求めた逆パッチ。対象がローカルに無かった場合は `None`
    pub inverse: Option<Patch>,
    pub state: OpState,
}

impl PendingOp {
    pub fn is_settled(&self) -> bool {
        self.state != OpState::Pending
    }
}

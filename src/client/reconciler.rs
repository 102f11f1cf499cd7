use std::collections::HashMap;
use std::time::Instant;

use crate::client::api::{ApiError, TodoApi};
use crate::client::cache::ListCache;
use crate::client::pending::{Command, OpState, PendingOp};
use crate::client::undo::UndoWindow;
use crate::models::CreatedList;

/// 楽観的更新とサーバー応答の突き合わせを行います。
///
/// 操作は [`Reconciler::begin`] でローカルに反映し、[`Reconciler::settle`] で結果を確定します。
/// 応答はネットワーク順に届くため、同じTODOへの連続操作は最後に届いた応答が勝ちます。
pub struct Reconciler<A: TodoApi> {
    api: A,
    cache: ListCache,
    ops: HashMap<u64, PendingOp>,
    next_op_id: u64,
    undo: Option<UndoWindow>,
}

async fn execute<A: TodoApi>(api: &A, command: &Command) -> Result<(), ApiError> {
    match command {
        Command::ToggleTodo { id, completed } => api.toggle_todo(id, *completed).await,
        Command::ToggleSubtask { id, completed } => api.toggle_subtask(id, *completed).await,
        Command::UpdateContent { id, content } => {
            if api.update_todo_content(id, content).await? {
                Ok(())
            } else {
                Err(ApiError::NotFound)
            }
        }
        Command::DeleteTodo { id } => api.delete_todo(id).await,
        Command::DeleteSubtask { id } => api.delete_subtask(id).await,
        Command::DeleteList { id } => api.delete_list(id).await,
    }
}

impl<A: TodoApi> Reconciler<A> {
    pub fn new(api: A, user_id: impl Into<String>) -> Self {
        Reconciler {
            api,
            cache: ListCache::new(user_id),
            ops: HashMap::new(),
            next_op_id: 1,
            undo: None,
        }
    }

    pub fn cache(&self) -> &ListCache {
        &self.cache
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// サーバーからツリーを取り直してキャッシュを置き換えます
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        let lists = self.api.fetch_lists().await?;
        self.cache = self.cache.replace(lists);
        Ok(())
    }

    /// アクティブなリストの切り替え。ローカルのみで完結します。
    pub fn select_list(&mut self, list_id: &str) {
        self.cache = self.cache.select_list(list_id);
    }

    // ---- 楽観的操作 ----

    /// コマンドをローカルへ反映し、追跡用のIDを返します
    pub fn begin(&mut self, command: Command) -> u64 {
        let patch = command.patch();
        let inverse = patch.inverse(&self.cache);
        self.cache = self.cache.apply(&patch);

        let id = self.next_op_id;
        self.next_op_id += 1;
        self.ops.insert(
            id,
            PendingOp {
                id,
                command,
                inverse,
                state: OpState::Pending,
            },
        );
        id
    }

    /// サーバーの結果で操作を確定します。失敗なら逆パッチを適用して巻き戻します。
    pub fn settle(&mut self, op_id: u64, result: &Result<(), ApiError>) -> OpState {
        let Some(op) = self.ops.get_mut(&op_id) else {
            return OpState::RolledBack;
        };
        if op.is_settled() {
            return op.state;
        }

        match result {
            Ok(()) => op.state = OpState::Committed,
            Err(err) => {
                tracing::warn!(op_id, error = %err, command = ?op.command, "optimistic update rolled back");
                if let Some(inverse) = &op.inverse {
                    self.cache = self.cache.apply(inverse);
                }
                op.state = OpState::RolledBack;
            }
        }
        op.state
    }

    pub fn op_state(&self, op_id: u64) -> Option<OpState> {
        self.ops.get(&op_id).map(|op| op.state)
    }

    pub fn pending_count(&self) -> usize {
        self.ops.values().filter(|op| !op.is_settled()).count()
    }

    /// 確定済みの操作履歴を捨てます
    pub fn prune_settled(&mut self) {
        self.ops.retain(|_, op| !op.is_settled());
    }

    /// `begin` → 送信 → `settle` をまとめて行います
    pub async fn dispatch(&mut self, command: Command) -> OpState {
        let op_id = self.begin(command.clone());
        let result = execute(&self.api, &command).await;
        self.settle(op_id, &result)
    }

    /// トップレベルTODOの完了切り替え。完了にした場合は取り消し枠を開き、
    /// 枠の対象を未完了に戻した場合は枠を閉じます。
    pub async fn toggle_todo(&mut self, id: &str, completed: bool, now: Instant) -> OpState {
        if completed {
            let top_level = self.cache.find_todo(id).filter(|t| t.parent_id.is_none());
            if let Some(todo) = top_level {
                let window = UndoWindow::open(
                    id,
                    todo.completed,
                    todo.subtasks.iter().map(|st| (st.id.clone(), st.completed)).collect(),
                    now,
                );
                // 前の枠はここで破棄される
                self.undo = Some(window);
            }
        } else if self.undo.as_ref().is_some_and(|w| w.todo_id == id) {
            self.undo = None;
        }

        self.dispatch(Command::ToggleTodo {
            id: id.to_string(),
            completed,
        })
        .await
    }

    pub async fn toggle_subtask(&mut self, id: &str, completed: bool) -> OpState {
        self.dispatch(Command::ToggleSubtask {
            id: id.to_string(),
            completed,
        })
        .await
    }

    pub async fn update_content(&mut self, id: &str, content: &str) -> OpState {
        self.dispatch(Command::UpdateContent {
            id: id.to_string(),
            content: content.to_string(),
        })
        .await
    }

    pub async fn delete_todo(&mut self, id: &str) -> OpState {
        self.dispatch(Command::DeleteTodo { id: id.to_string() }).await
    }

    pub async fn delete_subtask(&mut self, id: &str) -> OpState {
        self.dispatch(Command::DeleteSubtask { id: id.to_string() }).await
    }

    pub async fn delete_list(&mut self, id: &str) -> OpState {
        self.dispatch(Command::DeleteList { id: id.to_string() }).await
    }

    // ---- 取り消し ----

    /// 開いている取り消し枠。期限切れなら `None`。
    pub fn undo_window(&self, now: Instant) -> Option<&UndoWindow> {
        self.undo.as_ref().filter(|w| w.is_open(now))
    }

    /// 取り消し枠を閉じます (トーストを消した場合など)
    pub fn dismiss_undo(&mut self) {
        self.undo = None;
    }

    /// 完了操作を取り消します。TODOと、完了時点で記録したサブタスクの状態を
    /// ローカルとサーバーの両方へ戻します。枠が無いか期限切れなら `false`。
    pub async fn undo(&mut self, now: Instant) -> bool {
        let Some(window) = self.undo.take() else {
            return false;
        };
        if !window.is_open(now) {
            return false;
        }

        self.dispatch(Command::ToggleTodo {
            id: window.todo_id.clone(),
            completed: window.prev_completed,
        })
        .await;

        for (subtask_id, completed) in window.subtasks {
            self.dispatch(Command::ToggleSubtask {
                id: subtask_id,
                completed,
            })
            .await;
        }
        true
    }

    // ---- 作成系 (サーバーのIDが必要なので楽観的には反映しない) ----

    /// リストを作成し、取り直したうえで新しいリストをアクティブにします
    pub async fn create_list(&mut self, name: &str) -> Result<CreatedList, ApiError> {
        let created = self.api.create_list(name).await?;
        self.refresh().await?;
        self.select_list(&created.id);
        Ok(created)
    }

    /// アクティブなリストにTODOを追加します
    pub async fn create_todo(&mut self, content: &str) -> Result<(), ApiError> {
        let Some(list_id) = self.cache.active_list_id().map(str::to_string) else {
            return Err(ApiError::NotFound);
        };
        self.api.create_todo(content, &list_id).await?;
        self.refresh().await
    }

    pub async fn create_subtask(&mut self, parent_id: &str, content: &str) -> Result<(), ApiError> {
        let Some(list_id) = self.cache.active_list_id().map(str::to_string) else {
            return Err(ApiError::NotFound);
        };
        self.api.create_subtask(content, parent_id, &list_id).await?;
        self.refresh().await
    }
}

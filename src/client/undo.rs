use std::time::{Duration, Instant};

/// 完了操作を取り消せる時間
pub const UNDO_WINDOW: Duration = Duration::from_secs(7);

/// トップレベルTODOを完了にした直後の「元に戻す」枠。
/// 同時に開いているのは1つだけで、新しい枠が開くと前の枠は破棄されます。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UndoWindow {
    pub todo_id: String,
    pub prev_completed: bool,
    /// 完了時点のサブタスクの完了状態
    pub subtasks: Vec<(String, bool)>,
    pub expires_at: Instant,
}

impl UndoWindow {
    pub fn open(
        todo_id: impl Into<String>,
        prev_completed: bool,
        subtasks: Vec<(String, bool)>,
        now: Instant,
    ) -> Self {
        UndoWindow {
            todo_id: todo_id.into(),
            prev_completed,
            subtasks,
            expires_at: now + UNDO_WINDOW,
        }
    }

    pub fn is_open(&self, now: Instant) -> bool {
        now < self.expires_at
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }
}

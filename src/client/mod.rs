//! クライアント側の整合レイヤー。
//!
//! サーバーの状態を写したリストツリーをメモリに持ち、操作を即座にローカルへ反映 (楽観的更新) してから
//! 対応するコマンドを発行します。各操作は `Pending → Committed | RolledBack` のタグで追跡し、
//! 失敗したものは逆パッチで巻き戻します。

pub mod api;
pub mod cache;
pub mod pending;
pub mod reconciler;
pub mod undo;

pub use api::{ApiError, LocalApi, TodoApi};
pub use cache::{ListCache, Patch};
pub use pending::{Command, OpState, PendingOp};
pub use reconciler::Reconciler;
pub use undo::{UndoWindow, UNDO_WINDOW};

//! 所有者スコープ付きのデータアクセス層。
//! すべての読み書きは呼び出し元の `user_id` で追加フィルタされ、
//! 他人の行はIDを推測しても参照・変更できません。

pub mod lists;
pub mod todos;
pub mod tree;

pub use lists::ListRepository;
pub use todos::TodoRepository;

pub mod auth;
pub mod catchers;
pub mod lists;
pub mod todo;

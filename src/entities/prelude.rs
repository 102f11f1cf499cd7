pub use super::todo::Entity as Todo;
pub use super::todo_list::Entity as TodoList;
pub use super::user::Entity as User;

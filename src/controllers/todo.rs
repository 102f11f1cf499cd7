use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::guards::auth::AuthenticatedUser;
use crate::services::{StaleSignal, TodoService};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTodoForm {
    pub content: String,
    pub list_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubtaskForm {
    pub content: String,
    pub parent_id: String,
    pub list_id: String,
}

#[derive(Deserialize)]
pub struct ToggleForm {
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct ContentForm {
    pub content: String,
}

#[derive(Serialize)]
pub struct UpdateResult {
    pub success: bool,
}

#[post("/todos", data = "<form>")]
pub async fn create_todo(
    db: &State<DatabaseConnection>,
    signal: &State<StaleSignal>,
    user: AuthenticatedUser,
    form: Json<NewTodoForm>,
) -> Result<Status, AppError> {
    TodoService::new(db.inner(), signal.inner())
        .create_todo(user.id(), &form.content, &form.list_id)
        .await?;
    Ok(Status::NoContent)
}

#[post("/subtasks", data = "<form>")]
pub async fn create_subtask(
    db: &State<DatabaseConnection>,
    signal: &State<StaleSignal>,
    user: AuthenticatedUser,
    form: Json<NewSubtaskForm>,
) -> Result<Status, AppError> {
    TodoService::new(db.inner(), signal.inner())
        .create_subtask(user.id(), &form.content, &form.parent_id, &form.list_id)
        .await?;
    Ok(Status::NoContent)
}

/// 完了/未完了の切り替え。自分のものでないIDは何もせず成功扱いにします。
#[post("/todos/<id>/toggle", data = "<form>")]
pub async fn toggle_todo(
    db: &State<DatabaseConnection>,
    signal: &State<StaleSignal>,
    user: AuthenticatedUser,
    id: &str,
    form: Json<ToggleForm>,
) -> Result<Status, AppError> {
    TodoService::new(db.inner(), signal.inner())
        .toggle_todo(user.id(), id, form.completed)
        .await?;
    Ok(Status::NoContent)
}

#[post("/subtasks/<id>/toggle", data = "<form>")]
pub async fn toggle_subtask(
    db: &State<DatabaseConnection>,
    signal: &State<StaleSignal>,
    user: AuthenticatedUser,
    id: &str,
    form: Json<ToggleForm>,
) -> Result<Status, AppError> {
    TodoService::new(db.inner(), signal.inner())
        .toggle_subtask(user.id(), id, form.completed)
        .await?;
    Ok(Status::NoContent)
}

#[put("/todos/<id>/content", data = "<form>")]
pub async fn update_content(
    db: &State<DatabaseConnection>,
    signal: &State<StaleSignal>,
    user: AuthenticatedUser,
    id: &str,
    form: Json<ContentForm>,
) -> Result<Json<UpdateResult>, AppError> {
    let success = TodoService::new(db.inner(), signal.inner())
        .update_todo_content(user.id(), id, &form.content)
        .await?;
    Ok(Json(UpdateResult { success }))
}

#[delete("/todos/<id>")]
pub async fn delete_todo(
    db: &State<DatabaseConnection>,
    signal: &State<StaleSignal>,
    user: AuthenticatedUser,
    id: &str,
) -> Result<Status, AppError> {
    TodoService::new(db.inner(), signal.inner())
        .delete_todo(user.id(), id)
        .await?;
    Ok(Status::NoContent)
}

#[delete("/subtasks/<id>")]
pub async fn delete_subtask(
    db: &State<DatabaseConnection>,
    signal: &State<StaleSignal>,
    user: AuthenticatedUser,
    id: &str,
) -> Result<Status, AppError> {
    TodoService::new(db.inner(), signal.inner())
        .delete_subtask(user.id(), id)
        .await?;
    Ok(Status::NoContent)
}

pub fn routes() -> Vec<rocket::Route> {
    routes![
        create_todo,
        create_subtask,
        toggle_todo,
        toggle_subtask,
        update_content,
        delete_todo,
        delete_subtask
    ]
}

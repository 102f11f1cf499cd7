use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::guards::auth::AuthenticatedUser;
use crate::models::{CreatedList, ListNode};
use crate::services::templates::{ListTemplate, TEMPLATES};
use crate::services::{StaleSignal, TodoService};

#[derive(Deserialize)]
pub struct NewListForm {
    pub name: String,
}

#[derive(Deserialize)]
pub struct TemplateForm {
    pub template: String,
}

#[derive(Serialize)]
pub struct ListsResponse {
    pub generation: u64,
    pub lists: Vec<ListNode>,
}

#[derive(Serialize)]
pub struct GenerationResponse {
    pub generation: u64,
}

/// 自分のリストをTODOツリー付きで返します。
/// 世代番号は取得前に読むので、取得中に変更があっても次回の比較で古さを検知できます。
#[get("/lists")]
pub async fn list_lists(
    db: &State<DatabaseConnection>,
    signal: &State<StaleSignal>,
    user: AuthenticatedUser,
) -> Result<Json<ListsResponse>, AppError> {
    let generation = signal.generation();
    let lists = TodoService::new(db.inner(), signal.inner()).lists(user.id()).await?;
    Ok(Json(ListsResponse { generation, lists }))
}

#[get("/generation")]
pub fn generation(signal: &State<StaleSignal>, _user: AuthenticatedUser) -> Json<GenerationResponse> {
    Json(GenerationResponse {
        generation: signal.generation(),
    })
}

#[post("/lists", data = "<form>")]
pub async fn create_list(
    db: &State<DatabaseConnection>,
    signal: &State<StaleSignal>,
    user: AuthenticatedUser,
    form: Json<NewListForm>,
) -> Result<Json<CreatedList>, AppError> {
    let created = TodoService::new(db.inner(), signal.inner())
        .create_list(user.id(), &form.name)
        .await?;
    Ok(Json(created))
}

#[get("/lists/templates")]
pub fn list_templates(_user: AuthenticatedUser) -> Json<&'static [ListTemplate]> {
    Json(TEMPLATES)
}

#[post("/lists/templates", data = "<form>")]
pub async fn create_from_template(
    db: &State<DatabaseConnection>,
    signal: &State<StaleSignal>,
    user: AuthenticatedUser,
    form: Json<TemplateForm>,
) -> Result<Json<CreatedList>, AppError> {
    let created = TodoService::new(db.inner(), signal.inner())
        .create_list_from_template(user.id(), &form.template)
        .await?;
    Ok(Json(created))
}

/// リストを削除します。中のTODOとサブタスクも削除されます。
#[delete("/lists/<id>")]
pub async fn delete_list(
    db: &State<DatabaseConnection>,
    signal: &State<StaleSignal>,
    user: AuthenticatedUser,
    id: &str,
) -> Result<Status, AppError> {
    TodoService::new(db.inner(), signal.inner())
        .delete_list(user.id(), id)
        .await?;
    Ok(Status::NoContent)
}

pub fn routes() -> Vec<rocket::Route> {
    routes![
        list_lists,
        generation,
        create_list,
        list_templates,
        create_from_template,
        delete_list
    ]
}

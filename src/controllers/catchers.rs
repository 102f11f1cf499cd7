use rocket::http::Status;
use rocket::serde::json::{json, Value};
use rocket::Request;

/// ガードやルーティングで失敗したリクエストにもJSONでエラーを返します
#[catch(default)]
pub fn default_catcher(status: Status, _req: &Request<'_>) -> (Status, Value) {
    let message = match status.code {
        401 => "Not authenticated",
        404 => "Not found",
        400 | 422 => "Invalid request body.",
        _ => "Something went wrong.",
    };
    (status, json!({ "error": message }))
}

pub fn catchers() -> Vec<rocket::Catcher> {
    catchers![default_catcher]
}

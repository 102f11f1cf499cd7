use cozytask::entities::{prelude::*, todo, todo_list};
use cozytask::errors::AppError;
use cozytask::repository::{ListRepository, TodoRepository};
use sea_orm::*;

mod common;

#[rocket::async_test]
async fn test_lists_are_scoped_to_owner() {
    let db = common::test_db().await;
    let alice = common::create_user(&db, "alice@example.com").await;
    let bob = common::create_user(&db, "bob@example.com").await;

    let list = ListRepository::insert(&db, &alice.id, "Groceries").await.unwrap();
    TodoRepository::insert(&db, &alice.id, &list.id, "Milk", None).await.unwrap();
    ListRepository::insert(&db, &bob.id, "Bob's list").await.unwrap();

    let lists = ListRepository::find_with_todos(&db, &alice.id).await.unwrap();
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].name, "Groceries");
    assert!(lists.iter().all(|l| l.user_id == alice.id));

    let todo_ids: Vec<_> = lists[0].todos.iter().map(|t| t.id.clone()).collect();
    let rows = Todo::find()
        .filter(todo::Column::Id.is_in(todo_ids))
        .all(&db)
        .await
        .unwrap();
    assert!(rows.iter().all(|t| t.user_id == alice.id));
}

#[rocket::async_test]
async fn test_create_todo_round_trip() {
    let db = common::test_db().await;
    let user = common::create_user(&db, "round@example.com").await;
    let list = ListRepository::insert(&db, &user.id, "Inbox").await.unwrap();

    TodoRepository::insert(&db, &user.id, &list.id, "Buy milk", None).await.unwrap();

    let lists = ListRepository::find_with_todos(&db, &user.id).await.unwrap();
    let todos = &lists[0].todos;
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].content, "Buy milk");
    assert!(!todos[0].completed);
    assert_eq!(todos[0].list_id, list.id);
    assert!(todos[0].id.starts_with("todo-"));
}

#[rocket::async_test]
async fn test_subtasks_are_nested_under_parent() {
    let db = common::test_db().await;
    let user = common::create_user(&db, "nest@example.com").await;
    let list = ListRepository::insert(&db, &user.id, "Groceries").await.unwrap();
    let milk = TodoRepository::insert(&db, &user.id, &list.id, "Milk", None).await.unwrap();
    let sub = TodoRepository::insert(&db, &user.id, &list.id, "2%", Some(&milk.id)).await.unwrap();

    let lists = ListRepository::find_with_todos(&db, &user.id).await.unwrap();
    let groceries = common::find_list(&lists, "Groceries");
    assert_eq!(groceries.todos.len(), 1, "subtasks must not appear at top level");

    let milk_node = common::find_todo(groceries, "Milk");
    assert_eq!(milk_node.subtasks.len(), 1);
    assert_eq!(milk_node.subtasks[0].id, sub.id);
    assert_eq!(milk_node.subtasks[0].parent_id.as_deref(), Some(milk.id.as_str()));
    assert_eq!(milk_node.subtasks[0].list_id, milk_node.list_id);
}

#[rocket::async_test]
async fn test_second_level_subtask_is_rejected() {
    let db = common::test_db().await;
    let user = common::create_user(&db, "depth@example.com").await;
    let list = ListRepository::insert(&db, &user.id, "Deep").await.unwrap();
    let parent = TodoRepository::insert(&db, &user.id, &list.id, "Parent", None).await.unwrap();
    let child = TodoRepository::insert(&db, &user.id, &list.id, "Child", Some(&parent.id)).await.unwrap();

    let result = TodoRepository::insert(&db, &user.id, &list.id, "Grandchild", Some(&child.id)).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[rocket::async_test]
async fn test_parent_must_be_in_same_list() {
    let db = common::test_db().await;
    let user = common::create_user(&db, "samelist@example.com").await;
    let a = ListRepository::insert(&db, &user.id, "A").await.unwrap();
    let b = ListRepository::insert(&db, &user.id, "B").await.unwrap();
    let parent = TodoRepository::insert(&db, &user.id, &a.id, "In A", None).await.unwrap();

    let result = TodoRepository::insert(&db, &user.id, &b.id, "In B", Some(&parent.id)).await;
    assert!(matches!(result, Err(AppError::NotFound)));
}

#[rocket::async_test]
async fn test_insert_into_foreign_list_fails() {
    let db = common::test_db().await;
    let alice = common::create_user(&db, "alice2@example.com").await;
    let mallory = common::create_user(&db, "mallory@example.com").await;
    let list = ListRepository::insert(&db, &alice.id, "Private").await.unwrap();

    let result = TodoRepository::insert(&db, &mallory.id, &list.id, "Sneaky", None).await;
    assert!(matches!(result, Err(AppError::NotFound)));

    let count = Todo::find().count(&db).await.unwrap();
    assert_eq!(count, 0);
}

#[rocket::async_test]
async fn test_set_completed_on_foreign_todo_affects_nothing() {
    let db = common::test_db().await;
    let alice = common::create_user(&db, "alice3@example.com").await;
    let mallory = common::create_user(&db, "mallory3@example.com").await;
    let list = ListRepository::insert(&db, &alice.id, "Mine").await.unwrap();
    let item = TodoRepository::insert(&db, &alice.id, &list.id, "Secret", None).await.unwrap();

    let affected = TodoRepository::set_completed(&db, &mallory.id, &item.id, true).await.unwrap();
    assert_eq!(affected, 0);

    let stored = Todo::find_by_id(item.id.clone()).one(&db).await.unwrap().unwrap();
    assert!(!stored.completed);

    let affected = TodoRepository::set_completed(&db, &alice.id, &item.id, true).await.unwrap();
    assert_eq!(affected, 1);
    let stored = Todo::find_by_id(item.id).one(&db).await.unwrap().unwrap();
    assert!(stored.completed);
}

#[rocket::async_test]
async fn test_content_length_boundary() {
    let db = common::test_db().await;
    let user = common::create_user(&db, "boundary@example.com").await;
    let list = ListRepository::insert(&db, &user.id, "Bounds").await.unwrap();

    let ok = TodoRepository::insert(&db, &user.id, &list.id, &"a".repeat(280), None).await;
    assert!(ok.is_ok());

    let too_long = TodoRepository::insert(&db, &user.id, &list.id, &"a".repeat(281), None).await;
    assert!(matches!(too_long, Err(AppError::Validation(_))));

    let empty_name = ListRepository::insert(&db, &user.id, "  ").await;
    assert!(matches!(empty_name, Err(AppError::Validation(_))));
}

#[rocket::async_test]
async fn test_update_content_is_scoped_and_validated() {
    let db = common::test_db().await;
    let alice = common::create_user(&db, "alice4@example.com").await;
    let bob = common::create_user(&db, "bob4@example.com").await;
    let list = ListRepository::insert(&db, &alice.id, "Edits").await.unwrap();
    let item = TodoRepository::insert(&db, &alice.id, &list.id, "Draft", None).await.unwrap();

    assert!(TodoRepository::update_content(&db, &alice.id, &item.id, " Final ").await.unwrap());
    assert!(!TodoRepository::update_content(&db, &bob.id, &item.id, "Hijacked").await.unwrap());
    assert!(TodoRepository::update_content(&db, &alice.id, &item.id, "").await.is_err());

    let stored = TodoRepository::find_owned(&db, &alice.id, &item.id).await.unwrap().unwrap();
    assert_eq!(stored.content, "Final");
}

#[rocket::async_test]
async fn test_deleting_parent_removes_subtasks() {
    let db = common::test_db().await;
    let user = common::create_user(&db, "cascade@example.com").await;
    let list = ListRepository::insert(&db, &user.id, "Cascade").await.unwrap();
    let parent = TodoRepository::insert(&db, &user.id, &list.id, "Parent", None).await.unwrap();
    TodoRepository::insert(&db, &user.id, &list.id, "Child 1", Some(&parent.id)).await.unwrap();
    TodoRepository::insert(&db, &user.id, &list.id, "Child 2", Some(&parent.id)).await.unwrap();

    let deleted = TodoRepository::delete(&db, &user.id, &parent.id).await.unwrap();
    assert_eq!(deleted, 3);

    let remaining = Todo::find()
        .filter(todo::Column::ListId.eq(list.id.as_str()))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}

#[rocket::async_test]
async fn test_delete_list_removes_only_that_list() {
    let db = common::test_db().await;
    let user = common::create_user(&db, "twolists@example.com").await;
    let a = ListRepository::insert(&db, &user.id, "A").await.unwrap();
    let b = ListRepository::insert(&db, &user.id, "B").await.unwrap();
    let a_parent = TodoRepository::insert(&db, &user.id, &a.id, "A1", None).await.unwrap();
    TodoRepository::insert(&db, &user.id, &a.id, "A1.1", Some(&a_parent.id)).await.unwrap();
    TodoRepository::insert(&db, &user.id, &b.id, "B1", None).await.unwrap();

    let deleted = ListRepository::delete(&db, &user.id, &a.id).await.unwrap();
    assert_eq!(deleted, 1);

    let lists = ListRepository::find_with_todos(&db, &user.id).await.unwrap();
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].id, b.id);
    assert_eq!(lists[0].todos.len(), 1);

    let orphans = Todo::find()
        .filter(todo::Column::ListId.eq(a.id.as_str()))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(orphans, 0);
}

#[rocket::async_test]
async fn test_delete_foreign_list_is_noop() {
    let db = common::test_db().await;
    let alice = common::create_user(&db, "alice5@example.com").await;
    let mallory = common::create_user(&db, "mallory5@example.com").await;
    let list = ListRepository::insert(&db, &alice.id, "Keep").await.unwrap();
    TodoRepository::insert(&db, &alice.id, &list.id, "Still here", None).await.unwrap();

    let deleted = ListRepository::delete(&db, &mallory.id, &list.id).await.unwrap();
    assert_eq!(deleted, 0);

    let stored = TodoList::find_by_id(list.id.clone()).one(&db).await.unwrap();
    assert!(stored.is_some());
    let todos = Todo::find()
        .filter(todo::Column::ListId.eq(list.id.as_str()))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(todos, 1);
    let lists = TodoList::find()
        .filter(todo_list::Column::UserId.eq(mallory.id.as_str()))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(lists, 0);
}

#[rocket::async_test]
async fn test_template_list_is_created_with_todos() {
    let db = common::test_db().await;
    let user = common::create_user(&db, "template@example.com").await;

    let list = ListRepository::insert_with_todos(&db, &user.id, "Work Tasks", &["Reply", "Review"])
        .await
        .unwrap();

    let lists = ListRepository::find_with_todos(&db, &user.id).await.unwrap();
    assert_eq!(lists[0].id, list.id);
    let mut contents: Vec<_> = lists[0].todos.iter().map(|t| t.content.as_str()).collect();
    contents.sort();
    assert_eq!(contents, vec!["Reply", "Review"]);
}

#[rocket::async_test]
async fn test_template_with_invalid_todo_creates_nothing() {
    let db = common::test_db().await;
    let user = common::create_user(&db, "atomic@example.com").await;

    let result = ListRepository::insert_with_todos(&db, &user.id, "Broken", &["ok", ""]).await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let lists = ListRepository::find_with_todos(&db, &user.id).await.unwrap();
    assert!(lists.is_empty());
}

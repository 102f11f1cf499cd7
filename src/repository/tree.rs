use std::collections::HashMap;

use crate::entities::{todo, todo_list};
use crate::models::{ListNode, TodoNode};

/// リスト単位に集めたTODO (IDで引けるフラットな集合 + 取得順)
#[derive(Default)]
struct Bucket {
    order: Vec<String>,
    todos: HashMap<String, todo::Model>,
}

/// `todo_list LEFT JOIN todo` の結果行からリスト→TODO→サブタスクの木を組み立てます。
///
/// JOINの行順では親が子より先に現れる保証がないため、2パスで処理します。
/// 1. すべてのTODOを `list_id` ごとのフラットな集合に振り分ける
/// 2. `parent_id` を持つTODOを親のサブタスクへ付け替え、トップレベルから外す
///
/// 親が見つからないもの、親自身がサブタスクであるもの (2階層以上) は捨てます。
/// `user_id` が一致しない行も返しません。
pub fn assemble(
    user_id: &str,
    rows: Vec<(todo_list::Model, Option<todo::Model>)>,
) -> Vec<ListNode> {
    let mut lists: Vec<ListNode> = Vec::new();
    let mut buckets: HashMap<String, Bucket> = HashMap::new();

    // 1st pass
    for (list, todo) in rows {
        if list.user_id != user_id {
            continue;
        }
        if !buckets.contains_key(&list.id) {
            buckets.insert(list.id.clone(), Bucket::default());
            lists.push(ListNode::from(list.clone()));
        }

        let Some(todo) = todo else { continue };
        if todo.user_id != user_id {
            tracing::warn!(todo_id = %todo.id, list_id = %list.id, "todo owner differs from list owner; skipped");
            continue;
        }
        if let Some(bucket) = buckets.get_mut(&list.id) {
            if !bucket.todos.contains_key(&todo.id) {
                bucket.order.push(todo.id.clone());
                bucket.todos.insert(todo.id.clone(), todo);
            }
        }
    }

    // 2nd pass
    for list in lists.iter_mut() {
        let Some(bucket) = buckets.remove(&list.id) else { continue };
        let Bucket { order, mut todos } = bucket;

        let mut top: Vec<TodoNode> = Vec::new();
        let mut top_index: HashMap<String, usize> = HashMap::new();
        for id in &order {
            if let Some(model) = todos.get(id) {
                if model.parent_id.is_none() {
                    top_index.insert(id.clone(), top.len());
                    top.push(TodoNode::from(model.clone()));
                }
            }
        }

        for id in &order {
            let Some(model) = todos.remove(id) else { continue };
            let Some(parent_id) = model.parent_id.clone() else { continue };
            match top_index.get(&parent_id) {
                Some(&pos) => top[pos].subtasks.push(TodoNode::from(model)),
                None => {
                    tracing::debug!(todo_id = %model.id, parent_id = %parent_id, "orphaned or nested subtask dropped");
                }
            }
        }

        list.todos = top;
    }

    lists
}

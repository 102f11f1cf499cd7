use crate::models::{ListNode, TodoNode};

/// ユーザーセッションごとのリストツリーのキャッシュ。
///
/// 取得時に丸ごと置き換え ([`ListCache::replace`])、それ以外は [`Patch`] を適用した
/// 新しい値を返すだけで、既存の値は変更しません。適用のたびに `version` が進みます。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListCache {
    user_id: String,
    version: u64,
    lists: Vec<ListNode>,
    active_list_id: Option<String>,
}

/// キャッシュへの型付き変更
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Patch {
    SetCompleted { todo_id: String, completed: bool },
    SetContent { todo_id: String, content: String },
    /// トップレベルTODOならサブタスクごと取り除く
    RemoveTodo { todo_id: String },
    InsertTodo {
        list_id: String,
        parent_id: Option<String>,
        index: usize,
        node: TodoNode,
    },
    /// アクティブなリストが消えた場合は残りの先頭をアクティブにする
    RemoveList { list_id: String },
    /// `activate` が真なら挿入したリストをアクティブにする
    InsertList {
        index: usize,
        node: ListNode,
        activate: bool,
    },
    Batch(Vec<Patch>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Location {
    list: usize,
    parent: Option<usize>,
    index: usize,
}

impl ListCache {
    pub fn new(user_id: impl Into<String>) -> Self {
        ListCache {
            user_id: user_id.into(),
            version: 0,
            lists: Vec::new(),
            active_list_id: None,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn lists(&self) -> &[ListNode] {
        &self.lists
    }

    pub fn active_list_id(&self) -> Option<&str> {
        self.active_list_id.as_deref()
    }

    pub fn active_list(&self) -> Option<&ListNode> {
        let active = self.active_list_id.as_deref()?;
        self.lists.iter().find(|l| l.id == active)
    }

    pub fn find_list(&self, list_id: &str) -> Option<&ListNode> {
        self.lists.iter().find(|l| l.id == list_id)
    }

    /// トップレベル・サブタスクを問わずIDでTODOを探します
    pub fn find_todo(&self, todo_id: &str) -> Option<&TodoNode> {
        self.locate(todo_id).map(|loc| self.node(loc))
    }

    /// サーバーから取得したツリーで丸ごと置き換えます。
    /// 以前のアクティブリストが残っていればそのまま、なければ先頭を選びます。
    pub fn replace(&self, lists: Vec<ListNode>) -> ListCache {
        let active_list_id = self
            .active_list_id
            .as_ref()
            .filter(|id| lists.iter().any(|l| &l.id == *id))
            .cloned()
            .or_else(|| lists.first().map(|l| l.id.clone()));

        ListCache {
            user_id: self.user_id.clone(),
            version: self.version + 1,
            lists,
            active_list_id,
        }
    }

    /// アクティブなリストを切り替えます (通信なし)。存在しないIDは無視します。
    pub fn select_list(&self, list_id: &str) -> ListCache {
        let mut next = self.clone();
        if self.find_list(list_id).is_some() {
            next.active_list_id = Some(list_id.to_string());
            next.version += 1;
        }
        next
    }

    pub fn apply(&self, patch: &Patch) -> ListCache {
        let mut next = self.clone();
        next.apply_in_place(patch);
        next.version = self.version + 1;
        next
    }

    // `apply` が作ったコピーに対してだけ呼ばれる
    fn apply_in_place(&mut self, patch: &Patch) {
        match patch {
            Patch::SetCompleted { todo_id, completed } => {
                if let Some(loc) = self.locate(todo_id) {
                    self.node_mut(loc).completed = *completed;
                }
            }
            Patch::SetContent { todo_id, content } => {
                if let Some(loc) = self.locate(todo_id) {
                    self.node_mut(loc).content = content.clone();
                }
            }
            Patch::RemoveTodo { todo_id } => {
                if let Some(loc) = self.locate(todo_id) {
                    let todos = &mut self.lists[loc.list].todos;
                    match loc.parent {
                        None => {
                            todos.remove(loc.index);
                        }
                        Some(parent) => {
                            todos[parent].subtasks.remove(loc.index);
                        }
                    }
                }
            }
            Patch::InsertTodo {
                list_id,
                parent_id,
                index,
                node,
            } => {
                let Some(list) = self.lists.iter_mut().find(|l| &l.id == list_id) else {
                    return;
                };
                let siblings = match parent_id {
                    None => &mut list.todos,
                    Some(parent_id) => match list.todos.iter_mut().find(|t| &t.id == parent_id) {
                        Some(parent) => &mut parent.subtasks,
                        None => return,
                    },
                };
                let at = (*index).min(siblings.len());
                siblings.insert(at, node.clone());
            }
            Patch::RemoveList { list_id } => {
                self.lists.retain(|l| &l.id != list_id);
                if self.active_list_id.as_ref() == Some(list_id) {
                    self.active_list_id = self.lists.first().map(|l| l.id.clone());
                }
            }
            Patch::InsertList {
                index,
                node,
                activate,
            } => {
                let at = (*index).min(self.lists.len());
                self.lists.insert(at, node.clone());
                if *activate || self.active_list_id.is_none() {
                    self.active_list_id = Some(node.id.clone());
                }
            }
            Patch::Batch(patches) => {
                for patch in patches {
                    self.apply_in_place(patch);
                }
            }
        }
    }

    fn locate(&self, todo_id: &str) -> Option<Location> {
        for (li, list) in self.lists.iter().enumerate() {
            for (ti, todo) in list.todos.iter().enumerate() {
                if todo.id == todo_id {
                    return Some(Location { list: li, parent: None, index: ti });
                }
                if let Some(si) = todo.subtasks.iter().position(|st| st.id == todo_id) {
                    return Some(Location { list: li, parent: Some(ti), index: si });
                }
            }
        }
        None
    }

    fn node(&self, loc: Location) -> &TodoNode {
        let todos = &self.lists[loc.list].todos;
        match loc.parent {
            None => &todos[loc.index],
            Some(parent) => &todos[parent].subtasks[loc.index],
        }
    }

    fn node_mut(&mut self, loc: Location) -> &mut TodoNode {
        let todos = &mut self.lists[loc.list].todos;
        match loc.parent {
            None => &mut todos[loc.index],
            Some(parent) => &mut todos[parent].subtasks[loc.index],
        }
    }
}

impl Patch {
    /// 適用前のキャッシュに対して、このパッチを打ち消すパッチを求めます。
    /// 対象が見つからない場合は `None`。
    pub fn inverse(&self, cache: &ListCache) -> Option<Patch> {
        match self {
            Patch::SetCompleted { todo_id, .. } => cache.find_todo(todo_id).map(|node| Patch::SetCompleted {
                todo_id: todo_id.clone(),
                completed: node.completed,
            }),
            Patch::SetContent { todo_id, .. } => cache.find_todo(todo_id).map(|node| Patch::SetContent {
                todo_id: todo_id.clone(),
                content: node.content.clone(),
            }),
            Patch::RemoveTodo { todo_id } => cache.locate(todo_id).map(|loc| {
                let list = &cache.lists[loc.list];
                Patch::InsertTodo {
                    list_id: list.id.clone(),
                    parent_id: loc.parent.map(|p| list.todos[p].id.clone()),
                    index: loc.index,
                    node: cache.node(loc).clone(),
                }
            }),
            Patch::InsertTodo { node, .. } => Some(Patch::RemoveTodo {
                todo_id: node.id.clone(),
            }),
            Patch::RemoveList { list_id } => cache
                .lists
                .iter()
                .position(|l| &l.id == list_id)
                .map(|index| Patch::InsertList {
                    index,
                    node: cache.lists[index].clone(),
                    activate: cache.active_list_id.as_ref() == Some(list_id),
                }),
            Patch::InsertList { node, .. } => Some(Patch::RemoveList {
                list_id: node.id.clone(),
            }),
            Patch::Batch(patches) => {
                let mut state = cache.clone();
                let mut inverses = Vec::new();
                for patch in patches {
                    if let Some(inverse) = patch.inverse(&state) {
                        inverses.push(inverse);
                    }
                    state = state.apply(patch);
                }
                inverses.reverse();
                Some(Patch::Batch(inverses))
            }
        }
    }
}

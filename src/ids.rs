use rand::Rng;

/// URLセーフな英数字 + `_-` (nanoid と同じ文字集合)
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";
const ID_LEN: usize = 10;

fn random_suffix() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// `list-xxxxxxxxxx` 形式のID
pub fn new_list_id() -> String {
    format!("list-{}", random_suffix())
}

/// `todo-xxxxxxxxxx` 形式のID
pub fn new_todo_id() -> String {
    format!("todo-{}", random_suffix())
}

/// ゲスト/OAuthユーザーのID
pub fn new_user_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

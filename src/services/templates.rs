use serde::Serialize;

/// 空のアカウント向けに用意しているリストのひな形
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ListTemplate {
    pub key: &'static str,
    pub name: &'static str,
    pub todos: &'static [&'static str],
}

pub const TEMPLATES: &[ListTemplate] = &[
    ListTemplate {
        key: "my-day",
        name: "My Day",
        todos: &["Check emails", "Morning meeting", "Plan top 3 tasks", "Take a walk"],
    },
    ListTemplate {
        key: "grocery-shopping",
        name: "Grocery Shopping",
        todos: &["Milk", "Eggs", "Bread", "Vegetables", "Fruit"],
    },
    ListTemplate {
        key: "work-tasks",
        name: "Work Tasks",
        todos: &["Reply to client", "Finish report", "Code review"],
    },
];

/// キーまたは表示名 (大文字小文字無視) でテンプレートを探します
pub fn find(key_or_name: &str) -> Option<&'static ListTemplate> {
    let needle = key_or_name.trim();
    TEMPLATES
        .iter()
        .find(|t| t.key == needle || t.name.eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_key_and_name() {
        assert_eq!(find("my-day").map(|t| t.name), Some("My Day"));
        assert_eq!(find("grocery shopping").map(|t| t.key), Some("grocery-shopping"));
        assert!(find("unknown").is_none());
    }

    #[test]
    fn test_templates_fit_validation_bounds() {
        for template in TEMPLATES {
            assert!(template.name.chars().count() <= 100);
            assert!(template.todos.iter().all(|t| !t.is_empty() && t.chars().count() <= 280));
        }
    }
}

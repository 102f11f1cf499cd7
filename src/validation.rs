use validator::{Validate, ValidationError, ValidationErrors};

use crate::errors::AppError;

/// リスト名のバリデーション。
/// Djangoの `forms.Form` + `clean_name` に相当。
#[derive(Debug, Validate)]
pub struct ListNameInput {
    #[validate(
        custom(function = "not_blank", message = "List name cannot be empty."),
        length(max = 100, message = "List name must be at most 100 characters.")
    )]
    pub name: String,
}

/// TODO本文のバリデーション
#[derive(Debug, Validate)]
pub struct TodoContentInput {
    #[validate(
        custom(function = "not_blank", message = "Todo content cannot be empty."),
        length(max = 280, message = "Todo content must be at most 280 characters.")
    )]
    pub content: String,
}

/// 外部キー形式のIDのバリデーション
#[derive(Debug, Validate)]
pub struct IdInput {
    #[validate(length(min = 1, max = 255, message = "Invalid identifier."))]
    pub id: String,
}

impl ListNameInput {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
        }
    }

    /// 検証済みのリスト名を返します
    pub fn clean(self) -> Result<String, AppError> {
        self.validate().map_err(first_message)?;
        Ok(self.name)
    }
}

impl TodoContentInput {
    pub fn new(content: &str) -> Self {
        Self {
            content: content.trim().to_string(),
        }
    }

    pub fn clean(self) -> Result<String, AppError> {
        self.validate().map_err(first_message)?;
        Ok(self.content)
    }
}

impl IdInput {
    pub fn new(id: &str) -> Self {
        Self { id: id.trim().to_string() }
    }

    pub fn clean(self) -> Result<String, AppError> {
        self.validate().map_err(first_message)?;
        Ok(self.id)
    }
}

/// 空白のみの文字列を拒否します
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank"))
    } else {
        Ok(())
    }
}

/// 最初に違反したフィールドのメッセージを `AppError::Validation` に変換します
fn first_message(errors: ValidationErrors) -> AppError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let msg = fields
        .into_iter()
        .find_map(|(field, field_errors)| {
            field_errors.first().map(|error| {
                error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid.", field))
            })
        })
        .unwrap_or_else(|| "Invalid input.".to_string());

    AppError::Validation(msg)
}

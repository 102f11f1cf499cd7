use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::*;
use serde::Deserialize;

use crate::entities::{prelude::*, user};
use crate::errors::AppError;
use crate::ids::new_user_id;

/// 外部のIDプロバイダから受け取ったプロフィール
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OAuthProfile {
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
}

/// ユーザー関連のビジネスロジックを集約するサービス。
/// 認証そのものは外部プロバイダに任せ、ここではユーザー行の作成と検索だけを行います。
pub struct UserService;

impl UserService {
    /// IDでユーザーを検索 (Django: User.objects.get(pk=id))
    pub async fn find_by_id(db: &DatabaseConnection, id: &str) -> Result<Option<user::Model>, AppError> {
        User::find_by_id(id.to_owned())
            .one(db)
            .await
            .map_err(AppError::Database)
    }

    /// メールアドレスで検索
    pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<user::Model>, AppError> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .one(db)
            .await
            .map_err(AppError::Database)
    }

    /// ゲストユーザーを作成します。呼ばれるたびに新しいユーザーになります。
    pub async fn create_anonymous(db: &DatabaseConnection) -> Result<user::Model, AppError> {
        let id = new_user_id();
        let now: DateTime<FixedOffset> = Utc::now().into();

        let guest = user::ActiveModel {
            email: Set(Some(format!("anon-{}@example.com", id))),
            id: Set(id),
            name: Set(Some("Guest User".to_owned())),
            image: Set(None),
            is_anonymous: Set(true),
            created_at: Set(now),
        };

        let created = guest.insert(db).await.map_err(AppError::Database)?;
        tracing::info!(user_id = %created.id, "guest user created");
        Ok(created)
    }

    /// OAuthの初回サインインでユーザーを作成し、2回目以降は既存ユーザーを返します。
    /// 名前と画像はプロバイダの最新値で上書きします。
    pub async fn upsert_oauth(db: &DatabaseConnection, profile: OAuthProfile) -> Result<user::Model, AppError> {
        let email = profile.email.trim().to_lowercase();
        if email.is_empty() {
            return Err(AppError::Validation("Email is required.".to_string()));
        }

        if let Some(existing) = Self::find_by_email(db, &email).await? {
            if profile.name.is_none() && profile.image.is_none() {
                return Ok(existing);
            }
            let mut active_model: user::ActiveModel = existing.into();
            if profile.name.is_some() {
                active_model.name = Set(profile.name);
            }
            if profile.image.is_some() {
                active_model.image = Set(profile.image);
            }
            return active_model.update(db).await.map_err(AppError::Database);
        }

        let now: DateTime<FixedOffset> = Utc::now().into();
        let new_user = user::ActiveModel {
            id: Set(new_user_id()),
            name: Set(profile.name),
            email: Set(Some(email)),
            image: Set(profile.image),
            is_anonymous: Set(false),
            created_at: Set(now),
        };

        let created = new_user.insert(db).await.map_err(AppError::Database)?;
        tracing::info!(user_id = %created.id, "oauth user created");
        Ok(created)
    }
}

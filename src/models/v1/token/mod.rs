use chrono::TimeDelta;
use rand::Rng;
use rand::distributions::Alphanumeric;
use sea_orm::prelude::*;

use crate::entities::v1::tokens::{ActiveModel, Column, Entity, Model};
use crate::entities::v1::users;
use crate::helpers::{is_unique_violation, now};

pub const KEY_LENGTH: usize = 40;

pub fn generate_key() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(KEY_LENGTH)
        .map(char::from)
        .collect()
}

impl Model {
    pub fn new(user_id: Uuid, lifetime: Option<TimeDelta>) -> Self {
        let now = now();

        Self {
            key: generate_key(),
            user_id,
            created_at: now,
            expired_at: lifetime.and_then(|lifetime| now.checked_add_signed(lifetime)),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expired_at.is_some_and(|expired_at| expired_at <= now())
    }

    /// Token together with its owner, expiry is not checked here
    pub async fn find_with_user(
        db: &DatabaseConnection,
        key: &str,
    ) -> Result<Option<(Self, users::Model)>, DbErr> {
        let found = Entity::find_by_id(key.to_string())
            .find_also_related(users::Entity)
            .one(db)
            .await?;

        Ok(found.and_then(|(token, user)| user.map(|user| (token, user))))
    }

    pub async fn find_by_user(db: &DatabaseConnection, user_id: Uuid) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(Column::UserId.eq(user_id))
            .one(db)
            .await
    }

    pub async fn store(&self, db: &DatabaseConnection) -> Result<Self, DbErr> {
        ActiveModel::from(self.clone()).insert(db).await
    }

    pub async fn delete(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        Entity::delete_by_id(self.key.clone()).exec(db).await?;

        Ok(())
    }

    /// Return the user's live token, replacing an expired one
    ///
    /// A user owns at most one token. When two requests race to create it
    /// the loser reads back the winner's row.
    pub async fn get_or_create(
        db: &DatabaseConnection,
        user_id: Uuid,
        lifetime: Option<TimeDelta>,
    ) -> Result<Self, DbErr> {
        if let Some(token) = Self::find_by_user(db, user_id).await? {
            if !token.is_expired() {
                return Ok(token);
            }

            ::tracing::debug!(user_id = %user_id, "Replacing expired token");
            token.delete(db).await?;
        }

        match Self::new(user_id, lifetime).store(db).await {
            Ok(token) => Ok(token),
            Err(e) if is_unique_violation(&e) => Self::find_by_user(db, user_id)
                .await?
                .ok_or(e),
            Err(e) => Err(e),
        }
    }
}

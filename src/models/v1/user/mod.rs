use sea_orm::prelude::*;
use sea_orm::{PaginatorTrait, Set};

use crate::entities::v1::users::{ActiveModel, Column, Entity, Model};
use crate::helpers::now;
use crate::responses::v1::user::User;

impl Model {
    pub fn new<Email, Name>(email: Email, name: Name, password: String) -> Self
    where
        Email: ToString,
        Name: ToString,
    {
        let now = now();

        Self {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.to_string(),
            password,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn find_by_email<T: ToString>(
        db: &DatabaseConnection,
        email: T,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(Column::Email.eq(email.to_string()))
            .one(db)
            .await
    }

    pub async fn email_exists<T: ToString>(db: &DatabaseConnection, email: T) -> Result<bool, DbErr> {
        let count = Entity::find()
            .filter(Column::Email.eq(email.to_string()))
            .count(db)
            .await?;

        Ok(count > 0)
    }

    pub async fn store(&self, db: &DatabaseConnection) -> Result<Self, DbErr> {
        ActiveModel::from(self.clone()).insert(db).await
    }

    /// Apply a partial profile update, `None` leaves the column untouched
    pub async fn update_profile(
        &self,
        db: &DatabaseConnection,
        name: Option<String>,
        password: Option<String>,
    ) -> Result<Self, DbErr> {
        if name.is_none() && password.is_none() {
            return Ok(self.clone());
        }

        let mut model = ActiveModel::from(self.clone());

        if let Some(name) = name {
            model.name = Set(name);
        }

        if let Some(password) = password {
            model.password = Set(password);
        }

        model.updated_at = Set(now());
        model.update(db).await
    }

    pub async fn update_password(&self, db: &DatabaseConnection, password: String) -> Result<Self, DbErr> {
        self.update_profile(db, None, Some(password)).await
    }
}

impl From<Model> for User {
    fn from(val: Model) -> Self {
        User {
            email: val.email,
            name: val.name,
        }
    }
}

impl From<&Model> for User {
    fn from(val: &Model) -> Self {
        User {
            email: val.email.clone(),
            name: val.name.clone(),
        }
    }
}

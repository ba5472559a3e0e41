//! Admin repository for database operations.

use chrono::Utc;
use packline_core::account::{
    AccountError, Admin, AdminChanges, AdminRecord, AdminStore, NewAdmin,
};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set, SqlErr, Unchanged,
};
use uuid::Uuid;

use super::query::lower_eq;
use crate::entities::admins;

/// Admin repository.
#[derive(Debug, Clone)]
pub struct AdminRepository {
    db: DatabaseConnection,
}

impl AdminRepository {
    /// Creates a new admin repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl AdminStore for AdminRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AdminRecord>, AccountError> {
        let model = admins::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AccountError::repository(e.to_string()))?;

        Ok(model.map(to_record))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AdminRecord>, AccountError> {
        let model = admins::Entity::find()
            .filter(lower_eq(admins::Column::Email, email))
            .one(&self.db)
            .await
            .map_err(|e| AccountError::repository(e.to_string()))?;

        Ok(model.map(to_record))
    }

    async fn insert(&self, admin: NewAdmin) -> Result<Admin, AccountError> {
        let now = Utc::now().into();
        let model = admins::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(admin.name),
            email: Set(admin.email),
            password_hash: Set(admin.password_hash),
            avatar: Set(admin.avatar),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AccountError::AlreadyExists,
            _ => AccountError::repository(e.to_string()),
        })?;

        Ok(to_record(model).profile)
    }

    async fn update(&self, id: Uuid, changes: AdminChanges) -> Result<Admin, AccountError> {
        let mut model = admins::ActiveModel {
            id: Unchanged(id),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };
        if let Some(name) = changes.name {
            model.name = Set(name);
        }
        if let Some(email) = changes.email {
            model.email = Set(email);
        }
        if let Some(avatar) = changes.avatar {
            model.avatar = Set(Some(avatar));
        }
        if let Some(hash) = changes.password_hash {
            model.password_hash = Set(hash);
        }

        let updated = model.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => AccountError::NotFound,
            e => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => AccountError::EmailTaken,
                _ => AccountError::repository(e.to_string()),
            },
        })?;

        Ok(to_record(updated).profile)
    }
}

fn to_record(model: admins::Model) -> AdminRecord {
    AdminRecord {
        profile: Admin {
            id: model.id,
            name: model.name,
            email: model.email,
            avatar: model.avatar,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        },
        password_hash: model.password_hash,
    }
}

//! User repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set, SqlErr,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity, Model};
use common::{AppError, AppResult};
use domain::{UserId, UserRecord, UserStatus};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// The backing store owns `id` generation and the unique key on `email`.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<UserRecord>>;

    /// Find user by exact email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>>;

    /// Insert an unsaved record and return it with its generated id.
    ///
    /// Fails with `ConstraintViolation` when the email is taken.
    async fn create(&self, record: UserRecord) -> AppResult<UserRecord>;

    /// Write every mutable field of a persisted record.
    ///
    /// `id` and `created_at` are never written.
    async fn update(&self, record: UserRecord) -> AppResult<UserRecord>;

    /// List all users ordered by id
    async fn list(&self) -> AppResult<Vec<UserRecord>>;

    /// List users in the given status ordered by id
    async fn list_by_status(&self, status: UserStatus) -> AppResult<Vec<UserRecord>>;
}

/// Concrete implementation of UserRepository backed by SeaORM
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Translate write failures: unique key hits become constraint violations,
/// and a row that vanished before the write becomes `NotFound`.
fn map_write_error(err: DbErr) -> AppError {
    if matches!(err, DbErr::RecordNotUpdated) {
        return AppError::NotFound;
    }

    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::warn!(%detail, "Unique constraint rejected user write");
            AppError::constraint_violation("email")
        }
        _ => AppError::from(err),
    }
}

fn to_records(models: Vec<Model>) -> AppResult<Vec<UserRecord>> {
    models.into_iter().map(UserRecord::try_from).collect()
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<UserRecord>> {
        let result = UserEntity::find_by_id(id.value())
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        result.map(UserRecord::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        result.map(UserRecord::try_from).transpose()
    }

    async fn create(&self, record: UserRecord) -> AppResult<UserRecord> {
        if let Some(id) = record.id() {
            return Err(AppError::validation(format!(
                "User {} is already persisted",
                id
            )));
        }

        let active_model = ActiveModel {
            id: NotSet,
            name: Set(record.name().to_string()),
            email: Set(record.email().to_string()),
            password_hash: Set(record.password_hash().as_str().to_string()),
            employee_number: Set(record.employee_number().map(str::to_string)),
            status: Set(record.status().to_string()),
            role: Set(record.role().to_string()),
            created_at: Set(record.created_at()),
        };

        let model = active_model.insert(&self.db).await.map_err(map_write_error)?;
        let created = UserRecord::try_from(model)?;

        tracing::info!(user_id = ?created.id(), email = %created.email(), "User created");
        Ok(created)
    }

    async fn update(&self, record: UserRecord) -> AppResult<UserRecord> {
        let id = record
            .id()
            .ok_or_else(|| AppError::validation("User must be persisted before update"))?;

        let existing = UserEntity::find_by_id(id.value())
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        active.name = Set(record.name().to_string());
        active.email = Set(record.email().to_string());
        active.password_hash = Set(record.password_hash().as_str().to_string());
        active.employee_number = Set(record.employee_number().map(str::to_string));
        active.status = Set(record.status().to_string());
        active.role = Set(record.role().to_string());

        let model = active.update(&self.db).await.map_err(map_write_error)?;
        let updated = UserRecord::try_from(model)?;

        tracing::info!(
            user_id = %id,
            status = %updated.status(),
            role = %updated.role(),
            "User updated"
        );
        Ok(updated)
    }

    async fn list(&self) -> AppResult<Vec<UserRecord>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        to_records(models)
    }

    async fn list_by_status(&self, status: UserStatus) -> AppResult<Vec<UserRecord>> {
        let models = UserEntity::find()
            .filter(user::Column::Status.eq(status.as_str()))
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        to_records(models)
    }
}

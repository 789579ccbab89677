//! User service - registration, approval and role assignment.
//!
//! Each use case is a short sequence of repository calls. Authentication and
//! authorization decisions live with the callers.

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppError, AppResult, OptionExt};
use domain::{NewUser, UserId, UserRecord, UserRole, UserStatus};

use crate::repository::UserRepository;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Register a new pending researcher (password already hashed)
    async fn register(&self, new_user: NewUser) -> AppResult<UserRecord>;

    /// Get user by ID
    async fn get_user(&self, id: UserId) -> AppResult<UserRecord>;

    /// Get user by email
    async fn get_user_by_email(&self, email: &str) -> AppResult<UserRecord>;

    /// List users awaiting approval
    async fn list_pending(&self) -> AppResult<Vec<UserRecord>>;

    /// Move a user to APPROVED
    async fn approve(&self, email: &str) -> AppResult<UserRecord>;

    /// Change a user's role
    async fn assign_role(&self, email: &str, role: UserRole) -> AppResult<UserRecord>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
}

impl UserManager {
    /// Create new user service instance with repository
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn register(&self, new_user: NewUser) -> AppResult<UserRecord> {
        // The unique key still rejects concurrent registrations at insert time
        if self.repo.find_by_email(&new_user.email).await?.is_some() {
            tracing::warn!(email = %new_user.email, "Registration with existing email");
            return Err(AppError::constraint_violation("email"));
        }

        self.repo.create(UserRecord::new(new_user)).await
    }

    async fn get_user(&self, id: UserId) -> AppResult<UserRecord> {
        self.repo.find_by_id(id).await?.ok_or_not_found()
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<UserRecord> {
        self.repo.find_by_email(email).await?.ok_or_not_found()
    }

    async fn list_pending(&self) -> AppResult<Vec<UserRecord>> {
        self.repo.list_by_status(UserStatus::Pending).await
    }

    async fn approve(&self, email: &str) -> AppResult<UserRecord> {
        let mut user = self.get_user_by_email(email).await?;

        if user.status().is_approved() {
            tracing::debug!(email, "User already approved");
            return Ok(user);
        }

        user.set_status(UserStatus::Approved);
        self.repo.update(user).await
    }

    async fn assign_role(&self, email: &str, role: UserRole) -> AppResult<UserRecord> {
        let mut user = self.get_user_by_email(email).await?;

        if user.role() == role {
            return Ok(user);
        }

        user.set_role(role);
        self.repo.update(user).await
    }
}

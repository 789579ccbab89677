//! User Service Library
//!
//! Persistence for user records: the `users` table mapping, a repository
//! that honors the unique email key and generates ids, and the
//! registration/approval use cases built on it.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use crate::config::UserServiceConfig;
use crate::infra::Database;
use crate::repository::UserStore;
use crate::service::UserManager;

/// Connect to the configured database and wire up the service.
///
/// The schema is not touched; run `Database::ensure_schema` first on a fresh
/// database.
pub async fn build_service(config: &UserServiceConfig) -> Result<UserManager, sea_orm::DbErr> {
    let db = Database::connect(&config.database).await?;
    let user_repo = Arc::new(UserStore::new(db.get_connection()));

    Ok(UserManager::new(user_repo))
}

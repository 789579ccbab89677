//! Domain layer - the user record and its closed enumerations.
//!
//! This crate has no storage or runtime dependencies. Storage crates map
//! [`UserRecord`] onto their own row types.

pub mod constants;
pub mod error;
pub mod password;
pub mod user;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use password::PasswordHash;
pub use user::{NewUser, UserId, UserRecord, UserRole, UserStatus};

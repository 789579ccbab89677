//! User domain entity and related types.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{ROLE_ADMIN, ROLE_RESEARCHER, STATUS_APPROVED, STATUS_PENDING};
use crate::error::{DomainError, DomainResult};
use crate::password::PasswordHash;

/// Storage-assigned user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Approval state of an account
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    #[default]
    Pending,
    Approved,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Pending => STATUS_PENDING,
            UserStatus::Approved => STATUS_APPROVED,
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, UserStatus::Approved)
    }
}

impl FromStr for UserStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_PENDING => Ok(UserStatus::Pending),
            STATUS_APPROVED => Ok(UserStatus::Approved),
            other => Err(DomainError::validation(format!("Unknown user status: {}", other))),
        }
    }
}

impl From<UserStatus> for String {
    fn from(status: UserStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User roles enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    Researcher,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Researcher => ROLE_RESEARCHER,
            UserRole::Admin => ROLE_ADMIN,
        }
    }

    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_RESEARCHER => Ok(UserRole::Researcher),
            ROLE_ADMIN => Ok(UserRole::Admin),
            other => Err(DomainError::validation(format!("Unknown user role: {}", other))),
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registration input for a user that has not been stored yet
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    /// User display name
    pub name: String,
    /// User email address (unique across all users)
    pub email: String,
    /// Credential hash produced outside this crate
    pub password_hash: PasswordHash,
    /// Optional HR employee number
    pub employee_number: Option<String>,
}

/// User domain entity.
///
/// `id` is `None` until a storage layer assigns one, and is never replaced
/// afterwards. `created_at` is fixed at construction. Neither has a setter.
/// Uniqueness of `email` is declared here but enforced by storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<UserId>,
    name: String,
    email: String,
    #[serde(skip_serializing)]
    password_hash: PasswordHash,
    employee_number: Option<String>,
    status: UserStatus,
    role: UserRole,
    created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Create a pending researcher stamped with the current time
    pub fn new(new_user: NewUser) -> Self {
        Self::new_at(new_user, Utc::now())
    }

    /// Create a pending researcher with an explicit creation instant
    pub fn new_at(new_user: NewUser, created_at: DateTime<Utc>) -> Self {
        Self {
            id: None,
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            employee_number: new_user.employee_number,
            status: UserStatus::default(),
            role: UserRole::default(),
            created_at,
        }
    }

    /// Record the storage-generated identifier. Only storage layers call this.
    pub fn assign_id(&mut self, id: UserId) -> DomainResult<()> {
        match self.id {
            Some(existing) => Err(DomainError::IdAlreadyAssigned(existing)),
            None => {
                self.id = Some(id);
                Ok(())
            }
        }
    }

    pub fn id(&self) -> Option<UserId> {
        self.id
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn set_password_hash(&mut self, password_hash: PasswordHash) {
        self.password_hash = password_hash;
    }

    pub fn employee_number(&self) -> Option<&str> {
        self.employee_number.as_deref()
    }

    pub fn set_employee_number(&mut self, employee_number: Option<String>) {
        self.employee_number = employee_number;
    }

    pub fn status(&self) -> UserStatus {
        self.status
    }

    pub fn set_status(&mut self, status: UserStatus) {
        self.status = status;
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn set_role(&mut self, role: UserRole) {
        self.role = role;
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

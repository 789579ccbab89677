//! Domain-level constants.
//!
//! These are the storage and wire spellings of the closed user enumerations.

// =============================================================================
// User Status
// =============================================================================

/// Account registered and waiting for an administrator
pub const STATUS_PENDING: &str = "PENDING";

/// Account approved and allowed to act
pub const STATUS_APPROVED: &str = "APPROVED";

// =============================================================================
// User Roles
// =============================================================================

/// Default role assigned to new users
pub const ROLE_RESEARCHER: &str = "RESEARCHER";

/// Administrator role with elevated privileges
pub const ROLE_ADMIN: &str = "ADMIN";

//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use common::AppError;
use domain::{NewUser, PasswordHash, UserId, UserRecord, UserRole, UserStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub employee_number: Option<String>,
    /// `PENDING` or `APPROVED`
    pub status: String,
    /// `RESEARCHER` or `ADMIN`
    pub role: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity.
///
/// Rows holding a status or role outside the closed sets are rejected.
impl TryFrom<Model> for UserRecord {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let status: UserStatus = model.status.parse()?;
        let role: UserRole = model.role.parse()?;

        let mut record = UserRecord::new_at(
            NewUser {
                name: model.name,
                email: model.email,
                password_hash: PasswordHash::from_hash(model.password_hash),
                employee_number: model.employee_number,
            },
            model.created_at,
        );
        record.set_status(status);
        record.set_role(role);
        record.assign_id(UserId::new(model.id))?;

        Ok(record)
    }
}

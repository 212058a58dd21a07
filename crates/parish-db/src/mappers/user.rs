//! User model -> entity mapper

use parish_core::{DomainError, PhoneNumber, User, UserId};

use super::parse_column;
use crate::models::UserModel;

impl TryFrom<UserModel> for User {
    type Error = DomainError;

    fn try_from(model: UserModel) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId::from_uuid(model.id),
            name: model.name,
            phone: PhoneNumber::from_normalized(model.phone),
            email: model.email,
            role: parse_column("users.role", &model.role)?,
            is_active: model.is_active,
            notifications_enabled: model.notifications_enabled,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

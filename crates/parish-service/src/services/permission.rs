//! Permission service
//!
//! Resolves the acting user and checks role capabilities.

use parish_common::AppError;
use parish_core::{Capabilities, DomainError, User, UserId};
use tracing::{debug, instrument};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Permission service for access control
pub struct PermissionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PermissionService<'a> {
    /// Create a new PermissionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Load the acting user
    ///
    /// The token only names the user, so role and active flag are always
    /// read fresh from the store.
    #[instrument(skip(self))]
    pub async fn actor(&self, user_id: UserId) -> ServiceResult<User> {
        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(ServiceError::App(AppError::InvalidToken))?;

        if !user.is_active {
            return Err(DomainError::AccountInactive.into());
        }

        Ok(user)
    }

    /// Load the acting user and require every capability in `required`
    #[instrument(skip(self))]
    pub async fn require(&self, user_id: UserId, required: Capabilities) -> ServiceResult<User> {
        let user = self.actor(user_id).await?;

        if !user.role.can(required) {
            debug!(user_id = %user_id, role = %user.role, "Capability check failed");
            return Err(ServiceError::permission_denied(required.list().join(", ")));
        }

        Ok(user)
    }
}

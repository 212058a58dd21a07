//! User service
//!
//! Manages peer ministers and administrators: creation, profile edits,
//! roles and deactivation. The parish always keeps one active super admin.

use parish_core::{Capabilities, DomainError, PhoneNumber, Role, User, UserId};
use tracing::{info, instrument};

use crate::dto::{
    ChangeRoleRequest, CreateUserRequest, ListUsersQuery, SetActiveRequest, UpdateUserRequest,
    UserResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::permission::PermissionService;

/// Capability needed to manage a user holding `role`
fn managing(role: Role) -> Capabilities {
    if role.is_admin() {
        Capabilities::MANAGE_ADMINS
    } else {
        Capabilities::MANAGE_PEOPLE
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    /// Create a new UserService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a user
    ///
    /// Phone numbers are normalized before the uniqueness check. Only
    /// administrators carry an email address.
    #[instrument(skip(self, request))]
    pub async fn create_user(
        &self,
        actor_id: UserId,
        request: CreateUserRequest,
    ) -> ServiceResult<UserResponse> {
        PermissionService::new(self.ctx)
            .require(actor_id, managing(request.role))
            .await?;

        let phone = PhoneNumber::parse(&request.phone)?;
        if self.ctx.user_repo().find_by_phone(&phone).await?.is_some() {
            return Err(DomainError::PhoneAlreadyExists.into());
        }

        let mut user = User::new(request.name, phone, request.role);
        if let Some(email) = request.email.as_deref() {
            user.email = Some(self.check_email(&user, email).await?);
        }

        self.ctx.user_repo().create(&user).await?;

        info!(user_id = %user.id, role = %user.role, "User created");

        Ok(UserResponse::from(&user))
    }

    /// List users, by name
    #[instrument(skip(self, query))]
    pub async fn list_users(
        &self,
        actor_id: UserId,
        query: ListUsersQuery,
    ) -> ServiceResult<Vec<UserResponse>> {
        PermissionService::new(self.ctx)
            .require(actor_id, Capabilities::MANAGE_PEOPLE)
            .await?;

        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        let digits: String = search
            .as_deref()
            .unwrap_or_default()
            .chars()
            .filter(char::is_ascii_digit)
            .collect();

        let users = self.ctx.user_repo().list(query.role).await?;

        Ok(users
            .iter()
            .filter(|u| query.active.map_or(true, |active| u.is_active == active))
            .filter(|u| match &search {
                None => true,
                Some(term) => {
                    u.name.to_lowercase().contains(term.as_str())
                        || (!digits.is_empty() && u.phone.as_str().contains(&digits))
                }
            })
            .map(UserResponse::from)
            .collect())
    }

    /// The caller's own record
    #[instrument(skip(self))]
    pub async fn me(&self, actor_id: UserId) -> ServiceResult<UserResponse> {
        let actor = PermissionService::new(self.ctx).actor(actor_id).await?;
        Ok(UserResponse::from(&actor))
    }

    /// Edit name, email or notification preference
    ///
    /// Anyone may edit themselves; editing someone else takes the capability
    /// to manage their role.
    #[instrument(skip(self, request))]
    pub async fn update_user(
        &self,
        actor_id: UserId,
        user_id: UserId,
        request: UpdateUserRequest,
    ) -> ServiceResult<UserResponse> {
        let mut user = self.get_user_entity(user_id).await?;
        let permissions = PermissionService::new(self.ctx);
        if actor_id == user_id {
            permissions.actor(actor_id).await?;
        } else {
            permissions.require(actor_id, managing(user.role)).await?;
        }

        if let Some(name) = request.name {
            user.set_name(name);
        }
        if let Some(email) = request.email.as_deref() {
            let email = self.check_email(&user, email).await?;
            user.set_email(Some(email));
        }
        if let Some(enabled) = request.notifications_enabled {
            user.set_notifications_enabled(enabled);
        }

        self.ctx.user_repo().update(&user).await?;

        info!(user_id = %user_id, "User updated");

        Ok(UserResponse::from(&user))
    }

    /// Change a user's role
    #[instrument(skip(self))]
    pub async fn change_role(
        &self,
        actor_id: UserId,
        user_id: UserId,
        request: ChangeRoleRequest,
    ) -> ServiceResult<UserResponse> {
        PermissionService::new(self.ctx)
            .require(actor_id, Capabilities::MANAGE_ADMINS)
            .await?;

        let mut user = self.get_user_entity(user_id).await?;

        if user.is_active_super_admin() && !request.role.is_super_admin() {
            self.ensure_other_super_admin().await?;
        }
        if !request.role.is_admin() && user.email.is_some() {
            user.set_email(None);
        }

        user.set_role(request.role);
        self.ctx.user_repo().update(&user).await?;

        info!(user_id = %user_id, role = %user.role, "User role changed");

        Ok(UserResponse::from(&user))
    }

    /// Activate or deactivate a user
    #[instrument(skip(self))]
    pub async fn set_active(
        &self,
        actor_id: UserId,
        user_id: UserId,
        request: SetActiveRequest,
    ) -> ServiceResult<UserResponse> {
        let mut user = self.get_user_entity(user_id).await?;
        PermissionService::new(self.ctx)
            .require(actor_id, managing(user.role))
            .await?;

        if user.is_active_super_admin() && !request.is_active {
            self.ensure_other_super_admin().await?;
        }

        user.set_active(request.is_active);
        self.ctx.user_repo().update(&user).await?;

        info!(user_id = %user_id, is_active = user.is_active, "User activation changed");

        Ok(UserResponse::from(&user))
    }

    /// Get user entity by ID
    #[instrument(skip(self))]
    pub async fn get_user_entity(&self, user_id: UserId) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))
    }

    /// Normalize an email for `user` and make sure no one else holds it
    async fn check_email(&self, user: &User, email: &str) -> ServiceResult<String> {
        if !user.role.is_admin() {
            return Err(ServiceError::validation(
                "Only administrators may have an email address",
            ));
        }

        let email = normalize_email(email);
        if let Some(holder) = self.ctx.user_repo().find_by_email(&email).await? {
            if holder.id != user.id {
                return Err(DomainError::EmailAlreadyExists.into());
            }
        }
        Ok(email)
    }

    async fn ensure_other_super_admin(&self) -> ServiceResult<()> {
        if self.ctx.user_repo().count_active_super_admins().await? <= 1 {
            return Err(DomainError::LastSuperAdmin.into());
        }
        Ok(())
    }
}

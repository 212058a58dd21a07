//! User entity - admins and peer ministers

use chrono::{DateTime, Utc};

use crate::value_objects::{PhoneNumber, Role, UserId};

/// User entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub phone: PhoneNumber,
    /// Only admins carry an email
    pub email: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub notifications_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new active user with notifications on
    pub fn new(name: String, phone: PhoneNumber, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            name,
            phone,
            email: None,
            role,
            is_active: true,
            notifications_enabled: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether scheduled SMS reminders may be sent to this user
    #[inline]
    pub fn accepts_reminders(&self) -> bool {
        self.is_active && self.notifications_enabled
    }

    /// Active super admins are the ones the last-admin guard protects
    #[inline]
    pub fn is_active_super_admin(&self) -> bool {
        self.is_active && self.role.is_super_admin()
    }

    pub fn set_name(&mut self, name: String) {
        self.name = name;
        self.updated_at = Utc::now();
    }

    pub fn set_email(&mut self, email: Option<String>) {
        self.email = email;
        self.updated_at = Utc::now();
    }

    pub fn set_role(&mut self, role: Role) {
        self.role = role;
        self.updated_at = Utc::now();
    }

    pub fn set_active(&mut self, is_active: bool) {
        self.is_active = is_active;
        self.updated_at = Utc::now();
    }

    pub fn set_notifications_enabled(&mut self, enabled: bool) {
        self.notifications_enabled = enabled;
        self.updated_at = Utc::now();
    }
}

//! User roles and the capability matrix derived from them

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

bitflags! {
    /// Actions a role is allowed to perform
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u32 {
        /// Create, edit and delete events, slots and assignments
        const MANAGE_SCHEDULE   = 1 << 0;
        /// Create and deactivate volunteer accounts
        const MANAGE_PEOPLE     = 1 << 1;
        /// Create admins and change anyone's role
        const MANAGE_ADMINS     = 1 << 2;
        /// Trigger ad-hoc SMS reminders
        const SEND_REMINDERS    = 1 << 3;
        /// See one's own assignments
        const VIEW_OWN_SCHEDULE = 1 << 4;

        const ADMIN = Self::MANAGE_SCHEDULE.bits()
            | Self::MANAGE_PEOPLE.bits()
            | Self::SEND_REMINDERS.bits()
            | Self::VIEW_OWN_SCHEDULE.bits();

        const ALL = Self::ADMIN.bits() | Self::MANAGE_ADMINS.bits();
    }
}

impl Capabilities {
    /// Names of the individual capabilities that are set
    pub fn list(&self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }
}

/// Closed set of user roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    #[default]
    PeerMinister,
}

impl Role {
    /// Capabilities granted to this role
    #[inline]
    pub fn capabilities(self) -> Capabilities {
        match self {
            Self::SuperAdmin => Capabilities::ALL,
            Self::Admin => Capabilities::ADMIN,
            Self::PeerMinister => Capabilities::VIEW_OWN_SCHEDULE,
        }
    }

    /// Check whether this role holds every capability in `required`
    #[inline]
    pub fn can(self, required: Capabilities) -> bool {
        self.capabilities().contains(required)
    }

    /// Admin-type roles sign in with email and may carry one
    #[inline]
    pub fn is_admin(self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Admin)
    }

    #[inline]
    pub fn is_super_admin(self) -> bool {
        matches!(self, Self::SuperAdmin)
    }

    /// Database / wire representation
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::Admin => "admin",
            Self::PeerMinister => "peer_minister",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Self::SuperAdmin),
            "admin" => Ok(Self::Admin),
            "peer_minister" => Ok(Self::PeerMinister),
            other => Err(DomainError::ValidationError(format!("Unknown role: {other}"))),
        }
    }
}

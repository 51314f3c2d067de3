//! # Validation Context
//!
//! Who is asking. Built fresh for each request from the authenticated
//! session and handed to the validator by reference. Fields are private and
//! there are no setters, so a context cannot change during a call.

use uuid::Uuid;

pub use jobboard_core::Role;

/// The caller's role, identity and organization for one validation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationContext {
    role: Role,
    caller_id: Uuid,
    organization_id: Uuid,
}

impl ValidationContext {
    /// Bundle the caller attributes role rules consult.
    pub fn new(role: Role, caller_id: Uuid, organization_id: Uuid) -> Self {
        Self {
            role,
            caller_id,
            organization_id,
        }
    }

    /// The caller's role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// The caller's user id.
    pub fn caller_id(&self) -> Uuid {
        self.caller_id
    }

    /// The organization the caller acts for.
    pub fn organization_id(&self) -> Uuid {
        self.organization_id
    }

    /// Whether the caller is an administrator.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

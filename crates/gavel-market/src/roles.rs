//! Role-gated admin surface.

use std::collections::HashMap;

use gavel_types::{Address, MarketError, Result};
use serde::{Deserialize, Serialize};

/// Roles recognized by the market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// May change fee parameters, manage roles, and force-cancel auctions.
    Admin,
}

/// Address-to-role table. Mutations are themselves admin-gated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleTable {
    roles: HashMap<Address, Role>,
}

impl RoleTable {
    /// A fresh table with one initial admin.
    #[must_use]
    pub fn new(admin: Address) -> Self {
        let mut roles = HashMap::new();
        roles.insert(admin, Role::Admin);
        Self { roles }
    }

    #[must_use]
    pub fn is_admin(&self, who: Address) -> bool {
        self.roles.get(&who) == Some(&Role::Admin)
    }

    /// Grant `role` to `who`. Caller must be an admin.
    pub fn grant(&mut self, caller: Address, who: Address, role: Role) -> Result<()> {
        if !self.is_admin(caller) {
            return Err(MarketError::Unauthorized);
        }
        self.roles.insert(who, role);
        Ok(())
    }

    /// Revoke any role held by `who`. Caller must be an admin; the last
    /// remaining admin cannot be revoked.
    pub fn revoke(&mut self, caller: Address, who: Address) -> Result<()> {
        if !self.is_admin(caller) {
            return Err(MarketError::Unauthorized);
        }
        let admins = self
            .roles
            .values()
            .filter(|r| **r == Role::Admin)
            .count();
        if self.is_admin(who) && admins == 1 {
            return Err(MarketError::Unauthorized);
        }
        self.roles.remove(&who);
        Ok(())
    }
}

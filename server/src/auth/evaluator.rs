//! Authorization evaluator
//!
//! Pure decision functions over an already-authenticated [`Identity`]. The
//! session gate loads the identity with role and permissions fully
//! materialized; everything here is a synchronous lookup with no I/O, safe to
//! call from any request task.

use std::collections::BTreeMap;

use crate::db::models::{Permission, RoleDetail, UserHydrated, UserId};
use surrealdb::RecordId;

/// Privilege tier derived from a role's integer level.
///
/// Level 1 is the unconditionally all-permissioned super admin; levels 1-2
/// form the admin tier; everything else (or no role at all) is customer-tier.
/// This is the single place the level numbers are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleTier {
    SuperAdmin,
    Operator,
    Customer,
}

impl RoleTier {
    pub fn from_level(level: u8) -> Self {
        match level {
            1 => RoleTier::SuperAdmin,
            2 => RoleTier::Operator,
            _ => RoleTier::Customer,
        }
    }

    /// Admin tier: allowed into the admin console and ownership bypass
    pub fn is_admin_tier(self) -> bool {
        matches!(self, RoleTier::SuperAdmin | RoleTier::Operator)
    }
}

/// A resource with a well-known owner, for ownership checks
pub trait Owned {
    fn owner(&self) -> Option<&RecordId>;
}

/// Authenticated identity with role and permissions materialized.
///
/// Produced by the session gate once per request; never cached across
/// requests, so role or permission edits take effect on the next request.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// Legacy admin flag, equivalent-or-broader than admin tier
    pub is_admin: bool,
    pub is_active: bool,
    pub role: Option<RoleDetail>,
    /// Direct (role-override) permissions, additive to role permissions
    pub permissions: Vec<Permission>,
}

impl Identity {
    /// Privilege tier of the identity's role; no role means customer tier
    pub fn tier(&self) -> RoleTier {
        self.role
            .as_ref()
            .map(|r| RoleTier::from_level(r.level))
            .unwrap_or(RoleTier::Customer)
    }

    pub fn is_super_admin(&self) -> bool {
        self.tier() == RoleTier::SuperAdmin
    }

    /// Admin check used by the session gate: the legacy flag or admin tier
    pub fn is_admin(&self) -> bool {
        self.is_admin || self.tier().is_admin_tier()
    }

    /// Check a single permission slug.
    ///
    /// Inactive identities are denied everything. The super-admin tier is
    /// granted everything, including slugs it was never explicitly given.
    /// Otherwise direct permissions are consulted first, then role
    /// permissions, each filtered by the permission record's own active flag.
    /// Unknown slugs simply fail to match.
    pub fn has_permission(&self, slug: &str) -> bool {
        if !self.is_active {
            return false;
        }

        if self.is_super_admin() {
            return true;
        }

        if self
            .permissions
            .iter()
            .any(|p| p.is_active && p.slug == slug)
        {
            return true;
        }

        self.role
            .as_ref()
            .map(|r| r.permissions.iter().any(|p| p.is_active && p.slug == slug))
            .unwrap_or(false)
    }

    /// True if any of the slugs is held; vacuously true for an empty list
    pub fn has_any_permission(&self, slugs: &[&str]) -> bool {
        if slugs.is_empty() {
            return true;
        }
        slugs.iter().any(|s| self.has_permission(s))
    }

    /// True if every slug is held; vacuously true for an empty list
    pub fn has_all_permissions(&self, slugs: &[&str]) -> bool {
        slugs.iter().all(|s| self.has_permission(s))
    }

    /// True iff the identity has a role at least as privileged as
    /// `min_level`. Lower level = more privilege, so this checks
    /// `role.level <= min_level`.
    pub fn has_minimum_role_level(&self, min_level: u8) -> bool {
        self.role
            .as_ref()
            .map(|r| r.level <= min_level)
            .unwrap_or(false)
    }

    /// True if the identity has the given role slug
    pub fn has_role(&self, role_slug: &str) -> bool {
        self.role
            .as_ref()
            .map(|r| r.slug == role_slug)
            .unwrap_or(false)
    }

    /// Ownership check with admin-tier bypass: admins can access any
    /// resource, everyone else only their own.
    pub fn owns_resource<T: Owned>(&self, resource: &T) -> bool {
        if self.tier().is_admin_tier() {
            return true;
        }
        resource.owner().is_some_and(|owner| *owner == self.id)
    }

    /// Effective permission set: active role permissions unioned with active
    /// direct permissions, deduplicated by slug. On a slug collision the
    /// direct record's metadata wins.
    pub fn effective_permissions(&self) -> Vec<Permission> {
        if !self.is_active {
            return vec![];
        }

        let mut by_slug: BTreeMap<&str, &Permission> = BTreeMap::new();

        if let Some(role) = &self.role {
            for perm in role.permissions.iter().filter(|p| p.is_active) {
                by_slug.insert(perm.slug.as_str(), perm);
            }
        }

        for perm in self.permissions.iter().filter(|p| p.is_active) {
            by_slug.insert(perm.slug.as_str(), perm);
        }

        by_slug.into_values().cloned().collect()
    }
}

impl From<UserHydrated> for Identity {
    fn from(user: UserHydrated) -> Self {
        Self {
            // Records loaded from the database always carry an id
            id: user
                .id
                .unwrap_or_else(|| RecordId::from_table_key("user", "unknown")),
            name: user.name,
            email: user.email,
            is_admin: user.is_admin,
            is_active: user.is_active,
            role: user.role,
            permissions: user.permissions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::PermissionAction;

    fn permission(slug: &str, active: bool) -> Permission {
        Permission {
            id: Some(RecordId::from_table_key("permission", slug.replace('.', "_"))),
            name: slug.to_string(),
            slug: slug.to_string(),
            category: "test".to_string(),
            resource: "test".to_string(),
            action: PermissionAction::Read,
            is_active: active,
        }
    }

    fn role(slug: &str, level: u8, permissions: Vec<Permission>) -> RoleDetail {
        RoleDetail {
            id: Some(RecordId::from_table_key("role", slug)),
            name: slug.to_string(),
            slug: slug.to_string(),
            description: String::new(),
            level,
            permissions,
            is_system: true,
            is_active: true,
        }
    }

    fn identity(role: Option<RoleDetail>, direct: Vec<Permission>) -> Identity {
        Identity {
            id: RecordId::from_table_key("user", "u1"),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            is_admin: false,
            is_active: true,
            role,
            permissions: direct,
        }
    }

    struct Note {
        owner: Option<RecordId>,
    }

    impl Owned for Note {
        fn owner(&self) -> Option<&RecordId> {
            self.owner.as_ref()
        }
    }

    #[test]
    fn test_super_admin_grants_everything() {
        let ident = identity(Some(role("super-admin", 1, vec![])), vec![]);

        assert!(ident.has_permission("orders.refund"));
        assert!(ident.has_permission("not.a.real.slug"));
        assert!(ident.has_all_permissions(&["users.delete", "made.up"]));
    }

    #[test]
    fn test_inactive_identity_denied_everything() {
        let mut ident = identity(
            Some(role("super-admin", 1, vec![permission("orders.read", true)])),
            vec![permission("users.read", true)],
        );
        ident.is_active = false;

        assert!(!ident.has_permission("orders.read"));
        assert!(!ident.has_permission("users.read"));
        assert!(ident.effective_permissions().is_empty());
    }

    #[test]
    fn test_role_permission_grants() {
        let ident = identity(
            Some(role("store-manager", 2, vec![permission("orders.read", true)])),
            vec![],
        );

        assert!(ident.has_permission("orders.read"));
        assert!(!ident.has_permission("users.delete"));
    }

    #[test]
    fn test_direct_permissions_are_additive() {
        let ident = identity(
            Some(role("customer", 3, vec![permission("products.read", true)])),
            vec![permission("orders.refund", true)],
        );

        assert!(ident.has_permission("products.read"));
        assert!(ident.has_permission("orders.refund"));
    }

    #[test]
    fn test_inactive_permission_never_grants() {
        let ident = identity(
            Some(role("customer", 3, vec![permission("orders.read", false)])),
            vec![permission("users.read", false)],
        );

        assert!(!ident.has_permission("orders.read"));
        assert!(!ident.has_permission("users.read"));
    }

    #[test]
    fn test_empty_lists_are_vacuously_true() {
        let ident = identity(None, vec![]);

        assert!(ident.has_any_permission(&[]));
        assert!(ident.has_all_permissions(&[]));
    }

    #[test]
    fn test_any_and_all() {
        let ident = identity(
            Some(role("store-manager", 2, vec![permission("orders.read", true)])),
            vec![],
        );

        assert!(ident.has_any_permission(&["users.delete", "orders.read"]));
        assert!(!ident.has_any_permission(&["users.delete", "users.read"]));
        assert!(ident.has_all_permissions(&["orders.read"]));
        assert!(!ident.has_all_permissions(&["orders.read", "users.delete"]));
    }

    #[test]
    fn test_minimum_role_level() {
        let manager = identity(Some(role("store-manager", 2, vec![])), vec![]);
        let customer = identity(Some(role("customer", 3, vec![])), vec![]);
        let roleless = identity(None, vec![]);

        assert!(manager.has_minimum_role_level(2));
        assert!(manager.has_minimum_role_level(3));
        assert!(!manager.has_minimum_role_level(1));
        assert!(!customer.has_minimum_role_level(2));
        assert!(!roleless.has_minimum_role_level(10));
    }

    #[test]
    fn test_has_role() {
        let manager = identity(Some(role("store-manager", 2, vec![])), vec![]);
        assert!(manager.has_role("store-manager"));
        assert!(!manager.has_role("customer"));
        assert!(!identity(None, vec![]).has_role("customer"));
    }

    #[test]
    fn test_tier_mapping() {
        assert_eq!(RoleTier::from_level(1), RoleTier::SuperAdmin);
        assert_eq!(RoleTier::from_level(2), RoleTier::Operator);
        assert_eq!(RoleTier::from_level(3), RoleTier::Customer);
        assert_eq!(RoleTier::from_level(10), RoleTier::Customer);

        let roleless = identity(None, vec![]);
        assert_eq!(roleless.tier(), RoleTier::Customer);
    }

    #[test]
    fn test_ownership_admin_bypass() {
        let manager = identity(Some(role("store-manager", 2, vec![])), vec![]);
        let other_note = Note {
            owner: Some(RecordId::from_table_key("user", "someone-else")),
        };

        assert!(manager.owns_resource(&other_note));
    }

    #[test]
    fn test_ownership_matches_owner_only() {
        let customer = identity(Some(role("customer", 3, vec![])), vec![]);
        let own = Note {
            owner: Some(RecordId::from_table_key("user", "u1")),
        };
        let foreign = Note {
            owner: Some(RecordId::from_table_key("user", "u2")),
        };
        let orphan = Note { owner: None };

        assert!(customer.owns_resource(&own));
        assert!(!customer.owns_resource(&foreign));
        assert!(!customer.owns_resource(&orphan));
    }

    #[test]
    fn test_effective_permissions_dedup_prefers_direct() {
        let mut role_perm = permission("orders.read", true);
        role_perm.category = "role-copy".to_string();
        let mut direct_perm = permission("orders.read", true);
        direct_perm.category = "direct-copy".to_string();

        let ident = identity(
            Some(role(
                "store-manager",
                2,
                vec![role_perm, permission("products.read", true)],
            )),
            vec![direct_perm, permission("orders.refund", false)],
        );

        let effective = ident.effective_permissions();
        assert_eq!(effective.len(), 2);

        let orders = effective.iter().find(|p| p.slug == "orders.read").unwrap();
        assert_eq!(orders.category, "direct-copy");
        // Inactive direct permission filtered out entirely
        assert!(!effective.iter().any(|p| p.slug == "orders.refund"));
    }

    #[test]
    fn test_legacy_admin_flag() {
        let mut ident = identity(Some(role("customer", 3, vec![])), vec![]);
        assert!(!ident.is_admin());

        ident.is_admin = true;
        assert!(ident.is_admin());
        // The legacy flag does not bypass permission checks
        assert!(!ident.has_permission("users.delete"));
    }
}

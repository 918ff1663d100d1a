//! Permission catalog and built-in role definitions
//!
//! The catalog is the static source of truth for every permission the store
//! knows about. The seed routine materializes it into the `permission` table
//! once; authorization checks afterwards key off the slugs defined here.

use crate::db::models::PermissionAction;

/// Static permission definition, seeded into the `permission` table
#[derive(Debug, Clone, Copy)]
pub struct PermissionDef {
    pub name: &'static str,
    pub slug: &'static str,
    pub category: &'static str,
    pub resource: &'static str,
    pub action: PermissionAction,
}

const fn perm(
    name: &'static str,
    slug: &'static str,
    category: &'static str,
    resource: &'static str,
    action: PermissionAction,
) -> PermissionDef {
    PermissionDef {
        name,
        slug,
        category,
        resource,
        action,
    }
}

use crate::db::models::PermissionAction::{Create, Delete, Manage, Read, Update};

/// Every permission the store defines
pub const PERMISSION_CATALOG: &[PermissionDef] = &[
    // === Authentication ===
    perm("Login", "auth.login", "authentication", "auth", Read),
    perm("Logout", "auth.logout", "authentication", "auth", Read),
    perm("Password Reset", "auth.password-reset", "authentication", "auth", Update),
    // === Store Management ===
    perm("View Store Profile", "store.profile.read", "store", "store", Read),
    perm("Update Store Profile", "store.profile.update", "store", "store", Update),
    perm("View Store Settings", "store.settings.read", "store", "store", Read),
    perm("Update Store Settings", "store.settings.update", "store", "store", Update),
    perm("Manage Banners", "store.banners.manage", "store", "banner", Manage),
    perm("Manage Homepage", "store.homepage.manage", "store", "homepage", Manage),
    perm("Manage Payment Methods", "store.payment.manage", "store", "payment", Manage),
    perm("Manage Shipping Zones", "store.shipping.manage", "store", "shipping", Manage),
    // === Products ===
    perm("View Products", "products.read", "products", "product", Read),
    perm("Create Products", "products.create", "products", "product", Create),
    perm("Update Products", "products.update", "products", "product", Update),
    perm("Delete Products", "products.delete", "products", "product", Delete),
    perm("Bulk Upload Products", "products.bulk-upload", "products", "product", Create),
    perm("Manage Categories", "products.categories.manage", "products", "category", Manage),
    // === Inventory ===
    perm("View Inventory", "inventory.read", "inventory", "inventory", Read),
    perm("Update Inventory", "inventory.update", "inventory", "inventory", Update),
    perm("View Stock Alerts", "inventory.alerts.read", "inventory", "inventory", Read),
    perm("Manage Suppliers", "inventory.suppliers.manage", "inventory", "supplier", Manage),
    perm("Manage Batches", "inventory.batches.manage", "inventory", "batch", Manage),
    // === Orders ===
    perm("View Orders", "orders.read", "orders", "order", Read),
    perm("Update Order Status", "orders.update", "orders", "order", Update),
    perm("Assign Delivery Partner", "orders.assign-delivery", "orders", "order", Update),
    perm("Cancel Orders", "orders.cancel", "orders", "order", Update),
    perm("Process Refunds", "orders.refund", "orders", "order", Update),
    perm("Generate Invoices", "orders.invoice", "orders", "order", Read),
    // === Users ===
    perm("View Users", "users.read", "users", "user", Read),
    perm("Create Users", "users.create", "users", "user", Create),
    perm("Update Users", "users.update", "users", "user", Update),
    perm("Delete Users", "users.delete", "users", "user", Delete),
    perm("Block/Unblock Users", "users.block", "users", "user", Update),
    perm("Create Sub-Admins", "users.sub-admins.create", "users", "user", Create),
    perm("Manage Sub-Admins", "users.sub-admins.manage", "users", "user", Manage),
    // === Reviews ===
    perm("View Reviews", "reviews.read", "reviews", "review", Read),
    perm("Moderate Reviews", "reviews.moderate", "reviews", "review", Update),
    perm("Approve Reviews", "reviews.approve", "reviews", "review", Update),
    perm("Delete Reviews", "reviews.delete", "reviews", "review", Delete),
    // === Content ===
    perm("Manage Blog Posts", "content.blog.manage", "content", "blog", Manage),
    perm("Manage FAQs", "content.faq.manage", "content", "faq", Manage),
    // === Promotions ===
    perm("Manage Coupons", "promotions.coupons.manage", "promotions", "coupon", Manage),
    perm("Manage Flash Sales", "promotions.flash-sales.manage", "promotions", "flash-sale", Manage),
    perm("Manage Loyalty Program", "promotions.loyalty.manage", "promotions", "loyalty", Manage),
    perm("Manage Campaigns", "promotions.campaigns.manage", "promotions", "campaign", Manage),
    // === Analytics ===
    perm("View Dashboard", "analytics.dashboard.read", "analytics", "dashboard", Read),
    perm("View Sales Reports", "analytics.sales.read", "analytics", "report", Read),
    perm("View Product Analytics", "analytics.products.read", "analytics", "report", Read),
    perm("View Customer Analytics", "analytics.customers.read", "analytics", "report", Read),
    perm("Export Reports", "analytics.export", "analytics", "report", Read),
    // === Settings ===
    perm("Manage Roles", "settings.roles.manage", "settings", "role", Manage),
    perm("Manage Permissions", "settings.permissions.manage", "settings", "permission", Manage),
    perm("View Activity Logs", "settings.activity.read", "settings", "activity", Read),
    perm("Manage Support Tickets", "settings.support.manage", "settings", "support", Manage),
];

/// Built-in role slugs
pub const ROLE_SUPER_ADMIN: &str = "super-admin";
pub const ROLE_STORE_MANAGER: &str = "store-manager";
pub const ROLE_CUSTOMER: &str = "customer";

/// Static definition of a built-in (system) role
#[derive(Debug, Clone, Copy)]
pub struct RoleDef {
    pub name: &'static str,
    pub slug: &'static str,
    pub description: &'static str,
    pub level: u8,
}

/// The three system roles created by the seed routine
pub const SYSTEM_ROLES: &[RoleDef] = &[
    RoleDef {
        name: "Super Admin",
        slug: ROLE_SUPER_ADMIN,
        description: "Full system access with all permissions",
        level: 1,
    },
    RoleDef {
        name: "Store Manager",
        slug: ROLE_STORE_MANAGER,
        description: "Store operations and management",
        level: 2,
    },
    RoleDef {
        name: "Customer",
        slug: ROLE_CUSTOMER,
        description: "Regular customer with shopping and account management",
        level: 3,
    },
];

/// Store manager default permissions
const STORE_MANAGER_PERMISSIONS: &[&str] = &[
    "store.profile.read",
    "store.profile.update",
    "store.settings.read",
    "store.settings.update",
    "store.banners.manage",
    "store.homepage.manage",
    "store.payment.manage",
    "store.shipping.manage",
    "products.read",
    "products.create",
    "products.update",
    "products.delete",
    "products.bulk-upload",
    "products.categories.manage",
    "inventory.read",
    "inventory.update",
    "inventory.alerts.read",
    "inventory.suppliers.manage",
    "inventory.batches.manage",
    "orders.read",
    "orders.update",
    "orders.assign-delivery",
    "orders.cancel",
    "orders.refund",
    "orders.invoice",
    "users.read",
    "users.update",
    "users.block",
    "reviews.read",
    "reviews.moderate",
    "reviews.approve",
    "reviews.delete",
    "content.blog.manage",
    "content.faq.manage",
    "promotions.coupons.manage",
    "promotions.flash-sales.manage",
    "promotions.loyalty.manage",
    "promotions.campaigns.manage",
    "analytics.dashboard.read",
    "analytics.sales.read",
    "analytics.products.read",
    "analytics.customers.read",
    "analytics.export",
    "settings.activity.read",
    "settings.support.manage",
];

/// Customer default permissions
const CUSTOMER_PERMISSIONS: &[&str] = &[
    "auth.login",
    "auth.logout",
    "auth.password-reset",
    "products.read",
    "orders.read",
];

/// Get the seeded permission slugs for a built-in role.
/// Super admin owns the full catalog (it bypasses checks anyway, but the
/// explicit grant keeps the admin UI honest).
pub fn default_role_permissions(role_slug: &str) -> Vec<String> {
    match role_slug {
        ROLE_SUPER_ADMIN => PERMISSION_CATALOG
            .iter()
            .map(|p| p.slug.to_string())
            .collect(),
        ROLE_STORE_MANAGER => STORE_MANAGER_PERMISSIONS
            .iter()
            .map(|s| s.to_string())
            .collect(),
        ROLE_CUSTOMER => CUSTOMER_PERMISSIONS.iter().map(|s| s.to_string()).collect(),
        _ => vec![],
    }
}

/// Look up a catalog entry by slug
pub fn find_permission(slug: &str) -> Option<&'static PermissionDef> {
    PERMISSION_CATALOG.iter().find(|p| p.slug == slug)
}

/// Validate that a permission slug exists in the catalog
pub fn is_valid_permission(slug: &str) -> bool {
    find_permission(slug).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_slugs_unique() {
        let mut seen = HashSet::new();
        for def in PERMISSION_CATALOG {
            assert!(seen.insert(def.slug), "duplicate slug: {}", def.slug);
        }
    }

    #[test]
    fn test_default_role_permissions_exist_in_catalog() {
        for role in SYSTEM_ROLES {
            for slug in default_role_permissions(role.slug) {
                assert!(is_valid_permission(&slug), "unknown slug: {}", slug);
            }
        }
    }

    #[test]
    fn test_super_admin_owns_full_catalog() {
        let slugs = default_role_permissions(ROLE_SUPER_ADMIN);
        assert_eq!(slugs.len(), PERMISSION_CATALOG.len());
    }

    #[test]
    fn test_unknown_role_gets_nothing() {
        assert!(default_role_permissions("warehouse-bot").is_empty());
    }
}

//! Database models
//!
//! Plain serde structs matching the SurrealDB tables, plus the
//! create/update payload types consumed by the repositories.

pub mod serde_helpers;

// Auth
pub mod permission;
pub mod role;
pub mod user;

// Catalog
pub mod brand;
pub mod category;
pub mod certification;
pub mod product;

// Commerce
pub mod order;
pub mod store_settings;

// System
pub mod activity_log;

pub use activity_log::{ActivityLog, ActivityLogId, ActivityQuery};
pub use brand::{Brand, BrandCreate, BrandId, BrandUpdate};
pub use category::{Category, CategoryCreate, CategoryId, CategoryUpdate};
pub use certification::{
    Certification, CertificationCreate, CertificationId, CertificationUpdate,
};
pub use order::{
    Address, Order, OrderCreate, OrderId, OrderItem, OrderItemInput, OrderPage, OrderQuery,
};
pub use permission::{Permission, PermissionAction, PermissionId};
pub use product::{
    Product, ProductCreate, ProductId, ProductPage, ProductQuery, ProductUpdate, WeightUnit,
};
pub use role::{Role, RoleCreate, RoleDetail, RoleId, RoleUpdate};
pub use store_settings::{StoreProfile, StoreSettings, StoreSettingsUpdate};
pub use user::{
    LOCK_DURATION_MS, MAX_LOGIN_ATTEMPTS, User, UserCreate, UserHydrated, UserId, UserPage,
    UserQuery, UserUpdate,
};

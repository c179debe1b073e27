//! Category management.
//!
//! Categories label transactions. A fixed set of built-in categories is
//! merged with the user's own categories, which can be created and deleted
//! on the settings page.

mod create_endpoint;
mod db;
mod delete_endpoint;
mod domain;
mod registry;

pub use create_endpoint::create_category_endpoint;
pub use db::{create_category, create_category_table, delete_category, get_categories_by_user};
pub use delete_endpoint::delete_category_endpoint;
pub use domain::{CategoryColor, CategoryName};
pub use registry::{
    BuiltinCategory, RegistryEntry, builtin_categories, category_color, is_builtin_name,
    merged_categories, validate_new_category_name,
};

use serde::{Deserialize, Serialize};

use crate::{auth::UserId, database_id::CategoryId, transaction::TransactionKind};

/// A user-created category for income or expense transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The display name of the category.
    pub name: CategoryName,
    /// Whether the category labels income or expense transactions.
    pub kind: TransactionKind,
    /// The badge color of the category.
    pub color: CategoryColor,
    /// The ID of the user that created the category.
    pub user_id: UserId,
}

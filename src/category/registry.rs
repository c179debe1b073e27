//! The merged view of built-in and user-created categories.
//!
//! A fixed set of categories is compiled into the app. Users can add their
//! own on top, but never shadow a built-in: the add path rejects names that
//! match a built-in of the same kind, ignoring case.

use crate::{
    Error,
    category::{Category, CategoryColor, CategoryName},
    database_id::CategoryId,
    transaction::TransactionKind,
};

/// A category that ships with the app.
///
/// Built-ins exist for the lifetime of the process, carry no database ID,
/// and cannot be deleted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuiltinCategory {
    /// The display name of the category.
    pub name: &'static str,
    /// The badge color of the category.
    pub color: CategoryColor,
}

const BUILTIN_INCOME: [BuiltinCategory; 3] = [
    BuiltinCategory {
        name: "Salary",
        color: CategoryColor::Green,
    },
    BuiltinCategory {
        name: "Business",
        color: CategoryColor::Emerald,
    },
    BuiltinCategory {
        name: "Other",
        color: CategoryColor::Lime,
    },
];

const BUILTIN_EXPENSE: [BuiltinCategory; 4] = [
    BuiltinCategory {
        name: "Food",
        color: CategoryColor::Red,
    },
    BuiltinCategory {
        name: "Rent",
        color: CategoryColor::Orange,
    },
    BuiltinCategory {
        name: "Transport",
        color: CategoryColor::Yellow,
    },
    BuiltinCategory {
        name: "Other",
        color: CategoryColor::Pink,
    },
];

/// The built-in categories for `kind`.
pub fn builtin_categories(kind: TransactionKind) -> &'static [BuiltinCategory] {
    match kind {
        TransactionKind::Income => &BUILTIN_INCOME,
        TransactionKind::Expense => &BUILTIN_EXPENSE,
    }
}

/// Whether `name` matches a built-in category of `kind`, ignoring case and
/// surrounding whitespace.
pub fn is_builtin_name(kind: TransactionKind, name: &str) -> bool {
    let name = name.trim();

    builtin_categories(kind)
        .iter()
        .any(|builtin| builtin.name.eq_ignore_ascii_case(name))
}

/// One entry in the merged category list shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryEntry {
    /// The database ID for user-created categories. Built-ins have none,
    /// which is also what makes them undeletable.
    pub id: Option<CategoryId>,
    /// The display name of the category.
    pub name: String,
    /// The badge color of the category.
    pub color: CategoryColor,
    /// Whether this entry is one of the compiled-in categories.
    pub is_default: bool,
}

/// Merge the built-in categories with the user's own categories of `kind`.
///
/// Built-ins come first, followed by the user categories in the order the
/// store returned them (insertion order).
pub fn merged_categories(kind: TransactionKind, user_categories: &[Category]) -> Vec<RegistryEntry> {
    let builtins = builtin_categories(kind).iter().map(|builtin| RegistryEntry {
        id: None,
        name: builtin.name.to_owned(),
        color: builtin.color,
        is_default: true,
    });

    let user_entries = user_categories
        .iter()
        .filter(|category| category.kind == kind)
        .map(|category| RegistryEntry {
            id: Some(category.id),
            name: category.name.to_string(),
            color: category.color,
            is_default: false,
        });

    builtins.chain(user_entries).collect()
}

/// Validate the name of a new user category of `kind`.
///
/// # Errors
/// This function will return an:
/// - [Error::EmptyCategoryName] if the trimmed name is empty,
/// - or [Error::DuplicateBuiltinCategory] if the name matches a built-in
///   category of the same kind, ignoring case.
pub fn validate_new_category_name(
    kind: TransactionKind,
    name: &str,
) -> Result<CategoryName, Error> {
    let name = CategoryName::new(name)?;

    if is_builtin_name(kind, name.as_ref()) {
        return Err(Error::DuplicateBuiltinCategory(name.to_string()));
    }

    Ok(name)
}

/// Look up the badge color for a transaction's stored category name.
///
/// Transactions keep their category name as a string snapshot, so the name
/// may refer to a category that has since been deleted. In that case the
/// neutral fallback color is returned rather than dropping the row.
pub fn category_color(
    kind: TransactionKind,
    name: &str,
    user_categories: &[Category],
) -> CategoryColor {
    merged_categories(kind, user_categories)
        .iter()
        .find(|entry| entry.name == name)
        .map(|entry| entry.color)
        .unwrap_or(CategoryColor::Gray)
}

#[cfg(test)]
mod registry_tests {
    use crate::{
        Error,
        category::{Category, CategoryColor, CategoryName},
        transaction::TransactionKind,
    };

    use super::{
        builtin_categories, category_color, is_builtin_name, merged_categories,
        validate_new_category_name,
    };

    fn user_category(id: i64, name: &str, kind: TransactionKind) -> Category {
        let name = CategoryName::new_unchecked(name);
        let color = CategoryColor::assign(&name);

        Category {
            id,
            name,
            kind,
            color,
            user_id: 1,
        }
    }

    #[test]
    fn builtins_match_the_compiled_in_table() {
        assert_eq!(builtin_categories(TransactionKind::Income).len(), 3);
        assert_eq!(builtin_categories(TransactionKind::Expense).len(), 4);
    }

    #[test]
    fn merged_lists_builtins_first_then_user_categories_in_order() {
        let user_categories = vec![
            user_category(1, "Coffee", TransactionKind::Expense),
            user_category(2, "Gym", TransactionKind::Expense),
        ];

        let merged = merged_categories(TransactionKind::Expense, &user_categories);

        let names: Vec<_> = merged.iter().map(|entry| entry.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Food", "Rent", "Transport", "Other", "Coffee", "Gym"]
        );
        assert!(merged[0].is_default);
        assert!(!merged[4].is_default);
        assert_eq!(merged[4].id, Some(1));
    }

    #[test]
    fn merged_excludes_categories_of_the_other_kind() {
        let user_categories = vec![
            user_category(1, "Coffee", TransactionKind::Expense),
            user_category(2, "Dividends", TransactionKind::Income),
        ];

        let merged = merged_categories(TransactionKind::Income, &user_categories);

        assert!(merged.iter().any(|entry| entry.name == "Dividends"));
        assert!(!merged.iter().any(|entry| entry.name == "Coffee"));
    }

    #[test]
    fn builtin_name_check_ignores_case_and_whitespace() {
        assert!(is_builtin_name(TransactionKind::Expense, "food"));
        assert!(is_builtin_name(TransactionKind::Expense, "  FOOD  "));
        assert!(!is_builtin_name(TransactionKind::Income, "food"));
    }

    #[test]
    fn new_category_name_rejects_builtin_duplicates() {
        let result = validate_new_category_name(TransactionKind::Expense, "Food");

        assert_eq!(
            result,
            Err(Error::DuplicateBuiltinCategory("Food".to_owned()))
        );
    }

    #[test]
    fn new_category_name_rejects_case_insensitive_builtin_duplicates() {
        let result = validate_new_category_name(TransactionKind::Income, " salary ");

        assert_eq!(
            result,
            Err(Error::DuplicateBuiltinCategory("salary".to_owned()))
        );
    }

    #[test]
    fn new_category_name_rejects_empty_names() {
        assert_eq!(
            validate_new_category_name(TransactionKind::Expense, "   "),
            Err(Error::EmptyCategoryName)
        );
    }

    #[test]
    fn new_category_name_allows_builtin_of_other_kind() {
        let name = validate_new_category_name(TransactionKind::Income, "Transport").unwrap();

        assert_eq!(name.as_ref(), "Transport");
    }

    #[test]
    fn color_lookup_finds_builtins_and_user_categories() {
        let user_categories = vec![user_category(1, "Coffee", TransactionKind::Expense)];

        assert_eq!(
            category_color(TransactionKind::Expense, "Food", &user_categories),
            CategoryColor::Red
        );
        assert_eq!(
            category_color(TransactionKind::Expense, "Coffee", &user_categories),
            user_categories[0].color
        );
    }

    #[test]
    fn color_lookup_falls_back_for_deleted_categories() {
        let color = category_color(TransactionKind::Expense, "Ghosts", &[]);

        assert_eq!(color, CategoryColor::Gray);
    }
}

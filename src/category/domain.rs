//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// Leading and trailing whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is
    /// empty or contains only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the non-empty invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The fixed palette of badge colors a category can be displayed with.
///
/// Colors are a presentation tag only, the aggregation logic never branches
/// on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryColor {
    /// Used by the built-in Salary category.
    Green,
    /// Used by the built-in Business category.
    Emerald,
    /// Used by the built-in Other income category and user categories.
    Lime,
    /// Used by the built-in Food category.
    Red,
    /// Used by the built-in Rent category.
    Orange,
    /// Used by the built-in Transport category.
    Yellow,
    /// Used by the built-in Other expense category.
    Pink,
    /// Available to user categories.
    Blue,
    /// Available to user categories.
    Purple,
    /// Available to user categories.
    Teal,
    /// Available to user categories.
    Indigo,
    /// Fallback badge color for category names that are no longer in the
    /// registry.
    Gray,
}

/// The colors assigned to user-created categories.
const USER_PALETTE: [CategoryColor; 6] = [
    CategoryColor::Blue,
    CategoryColor::Purple,
    CategoryColor::Teal,
    CategoryColor::Indigo,
    CategoryColor::Orange,
    CategoryColor::Lime,
];

impl CategoryColor {
    /// The string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryColor::Green => "green",
            CategoryColor::Emerald => "emerald",
            CategoryColor::Lime => "lime",
            CategoryColor::Red => "red",
            CategoryColor::Orange => "orange",
            CategoryColor::Yellow => "yellow",
            CategoryColor::Pink => "pink",
            CategoryColor::Blue => "blue",
            CategoryColor::Purple => "purple",
            CategoryColor::Teal => "teal",
            CategoryColor::Indigo => "indigo",
            CategoryColor::Gray => "gray",
        }
    }

    /// The CSS classes for rendering a badge in this color.
    pub fn badge_class(&self) -> &'static str {
        match self {
            CategoryColor::Green => "bg-green-500/10 text-green-700",
            CategoryColor::Emerald => "bg-emerald-500/10 text-emerald-700",
            CategoryColor::Lime => "bg-lime-500/10 text-lime-700",
            CategoryColor::Red => "bg-red-500/10 text-red-700",
            CategoryColor::Orange => "bg-orange-500/10 text-orange-700",
            CategoryColor::Yellow => "bg-yellow-500/10 text-yellow-700",
            CategoryColor::Pink => "bg-pink-500/10 text-pink-700",
            CategoryColor::Blue => "bg-blue-500/10 text-blue-700",
            CategoryColor::Purple => "bg-purple-500/10 text-purple-700",
            CategoryColor::Teal => "bg-teal-500/10 text-teal-700",
            CategoryColor::Indigo => "bg-indigo-500/10 text-indigo-700",
            CategoryColor::Gray => "bg-gray-100 text-gray-800",
        }
    }

    /// Pick the badge color for a new user category.
    ///
    /// The pick is a function of the name so that creating the same category
    /// twice (e.g. after deleting it) yields the same color.
    pub fn assign(name: &CategoryName) -> Self {
        let index = name
            .as_ref()
            .bytes()
            .fold(0usize, |sum, byte| sum.wrapping_add(byte as usize));

        USER_PALETTE[index % USER_PALETTE.len()]
    }
}

impl Display for CategoryColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CategoryColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "green" => Ok(CategoryColor::Green),
            "emerald" => Ok(CategoryColor::Emerald),
            "lime" => Ok(CategoryColor::Lime),
            "red" => Ok(CategoryColor::Red),
            "orange" => Ok(CategoryColor::Orange),
            "yellow" => Ok(CategoryColor::Yellow),
            "pink" => Ok(CategoryColor::Pink),
            "blue" => Ok(CategoryColor::Blue),
            "purple" => Ok(CategoryColor::Purple),
            "teal" => Ok(CategoryColor::Teal),
            "indigo" => Ok(CategoryColor::Indigo),
            "gray" => Ok(CategoryColor::Gray),
            _ => Err(Error::NotFound),
        }
    }
}


#[cfg(test)]
mod category_color_tests {
    use std::str::FromStr;

    use crate::category::{CategoryColor, CategoryName};

    #[test]
    fn assign_is_deterministic() {
        let name = CategoryName::new_unchecked("Coffee");

        assert_eq!(CategoryColor::assign(&name), CategoryColor::assign(&name));
    }

    #[test]
    fn assign_never_picks_the_fallback() {
        for name in ["Coffee", "Gym", "Books", "Pets", "Travel", "Gifts"] {
            let color = CategoryColor::assign(&CategoryName::new_unchecked(name));

            assert_ne!(color, CategoryColor::Gray);
        }
    }

    #[test]
    fn colors_round_trip_through_strings() {
        for color in [
            CategoryColor::Green,
            CategoryColor::Emerald,
            CategoryColor::Lime,
            CategoryColor::Red,
            CategoryColor::Orange,
            CategoryColor::Yellow,
            CategoryColor::Pink,
            CategoryColor::Blue,
            CategoryColor::Purple,
            CategoryColor::Teal,
            CategoryColor::Indigo,
            CategoryColor::Gray,
        ] {
            assert_eq!(CategoryColor::from_str(color.as_str()), Ok(color));
        }
    }
}

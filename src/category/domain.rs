//! The category domain types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::Error;

/// The ID of a category.
pub type CategoryId = i64;

/// A label for grouping expenses, for example "Food" or "Rent".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// The category's ID.
    pub id: CategoryId,
    /// The category's name.
    pub name: String,
}

/// A validated category name.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name, trimming surrounding whitespace and storing
    /// the result in uppercase so "food" and "Food" name the same category.
    ///
    /// # Errors
    /// Returns [Error::CategoryNameTooShort] if the trimmed name has fewer
    /// than two characters.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.chars().count() < 2 {
            return Err(Error::CategoryNameTooShort);
        }

        Ok(Self(name.to_uppercase()))
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod category_name_tests {
    use crate::Error;

    use super::CategoryName;

    #[test]
    fn trims_whitespace() {
        let name = CategoryName::new("  Food  ").unwrap();

        assert_eq!(name.as_str(), "FOOD");
    }

    #[test]
    fn uppercases_name() {
        let name = CategoryName::new("food").unwrap();

        assert_eq!(name.as_str(), "FOOD");
    }

    #[test]
    fn rejects_single_character_name() {
        assert!(matches!(
            CategoryName::new("F"),
            Err(Error::CategoryNameTooShort)
        ));
    }

    #[test]
    fn rejects_whitespace_only_name() {
        assert!(matches!(
            CategoryName::new("  \t "),
            Err(Error::CategoryNameTooShort)
        ));
    }
}

//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// A request requires at least one ingredient
    #[error("At least one ingredient is required")]
    EmptyIngredients,

    /// Meal plan length outside the supported range
    #[error("Invalid plan length: {days} days (must be 1-30)")]
    InvalidPlanLength {
        /// Requested number of days
        days: u16,
    },

    /// Unknown theme name
    #[error("Unknown theme: {0}. Use 'light' or 'dark'")]
    UnknownTheme(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ingredients_message() {
        let err = DomainError::EmptyIngredients;
        assert_eq!(err.to_string(), "At least one ingredient is required");
    }

    #[test]
    fn invalid_plan_length_message() {
        let err = DomainError::InvalidPlanLength { days: 45 };
        assert_eq!(
            err.to_string(),
            "Invalid plan length: 45 days (must be 1-30)"
        );
    }

    #[test]
    fn unknown_theme_message() {
        let err = DomainError::UnknownTheme("sepia".to_string());
        assert_eq!(err.to_string(), "Unknown theme: sepia. Use 'light' or 'dark'");
    }
}

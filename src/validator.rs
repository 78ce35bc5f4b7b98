// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Chat message validator.
//!
//! Both fields must be present and non-blank after trimming, and each
//! must fit its configured character limit.

use crate::config::ValidationConfig;
use thiserror::Error;
use tracing::debug;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Author and content are required")]
    MissingField(&'static str),

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
}

/// Result of validation.
#[derive(Debug, Clone)]
pub enum ValidationResult {
    /// Message is valid
    Valid,
    /// Message is invalid
    Invalid(ValidationError),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(e) => Some(e),
        }
    }
}

/// Validator for submitted chat messages.
pub struct MessageValidator {
    config: ValidationConfig,
}

impl MessageValidator {
    /// Create a new validator with the given configuration.
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate the author and content of a submission.
    pub fn validate(&self, author: Option<&str>, content: Option<&str>) -> ValidationResult {
        let author = match author.map(str::trim) {
            Some(a) if !a.is_empty() => a,
            _ => {
                debug!("Missing author");
                return ValidationResult::Invalid(ValidationError::MissingField("author"));
            }
        };

        let content = match content.map(str::trim) {
            Some(c) if !c.is_empty() => c,
            _ => {
                debug!("Missing content");
                return ValidationResult::Invalid(ValidationError::MissingField("content"));
            }
        };

        if let Some(err) = check_length("author", author, self.config.author_max_chars) {
            return ValidationResult::Invalid(err);
        }

        if let Some(err) = check_length("content", content, self.config.content_max_chars) {
            return ValidationResult::Invalid(err);
        }

        ValidationResult::Valid
    }
}

fn check_length(field: &'static str, value: &str, max: usize) -> Option<ValidationError> {
    let len = value.chars().count();
    if len > max {
        debug!(field, len, max, "Field too long");
        Some(ValidationError::TooLong { field, max })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_validator() -> MessageValidator {
        MessageValidator::new(ValidationConfig::default())
    }

    #[test]
    fn test_valid_message() {
        let validator = default_validator();
        assert!(validator.validate(Some("alice"), Some("hello")).is_valid());
    }

    #[test]
    fn test_missing_author() {
        let validator = default_validator();

        let result = validator.validate(None, Some("hello"));
        assert!(matches!(
            result.error(),
            Some(ValidationError::MissingField("author"))
        ));
    }

    #[test]
    fn test_blank_content_rejected() {
        let validator = default_validator();

        for content in [Some(""), Some("   \n\t"), None] {
            let result = validator.validate(Some("alice"), content);
            assert!(matches!(
                result.error(),
                Some(ValidationError::MissingField("content"))
            ));
        }
    }

    #[test]
    fn test_missing_field_message_is_generic() {
        assert_eq!(
            ValidationError::MissingField("content").to_string(),
            "Author and content are required"
        );
    }

    #[test]
    fn test_length_limits_count_characters() {
        let validator = MessageValidator::new(ValidationConfig {
            author_max_chars: 3,
            content_max_chars: 4,
        });

        // Multi-byte characters count once each
        assert!(validator.validate(Some("äöü"), Some("ßßßß")).is_valid());

        let result = validator.validate(Some("abcd"), Some("ok"));
        assert_eq!(
            result.error(),
            Some(&ValidationError::TooLong { field: "author", max: 3 })
        );

        let result = validator.validate(Some("abc"), Some("12345"));
        assert_eq!(
            result.error().map(ToString::to_string).as_deref(),
            Some("content must be at most 4 characters")
        );
    }

    #[test]
    fn test_surrounding_whitespace_not_counted() {
        let validator = MessageValidator::new(ValidationConfig {
            author_max_chars: 3,
            content_max_chars: 3,
        });
        assert!(validator.validate(Some("  bob  "), Some(" hi ")).is_valid());
    }
}

//! Error types for page extraction and catalog walking
//!
//! Most extraction problems are absorbed as empty defaults; these variants
//! cover the cases that must surface: bad configuration, a required field
//! that is missing, a failed extraction step, and a walk that found nothing.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ParsingError {
    #[error("Required field '{field}' not found in HTML")]
    RequiredFieldMissing {
        field: String,
        context: Option<String>,
    },

    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Invalid pattern: {pattern} - {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Extraction step '{step}' failed for {url}: {reason}")]
    ExtractionFailed {
        step: String,
        url: String,
        reason: String,
    },

    #[error("No product URLs found across {category_pages} category page(s)")]
    NoProductUrlsFound {
        category_pages: usize,
        failed_pages: Vec<String>,
    },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String, field: String },
}

impl ParsingError {
    pub fn required_field_missing(field: &str, context: Option<&str>) -> Self {
        Self::RequiredFieldMissing {
            field: field.to_string(),
            context: context.map(str::to_string),
        }
    }

    pub fn invalid_selector(selector: &str, reason: impl ToString) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_pattern(pattern: &str, reason: impl ToString) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn extraction_failed(step: &str, url: &str, reason: impl ToString) -> Self {
        Self::ExtractionFailed {
            step: step.to_string(),
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn configuration(field: &str, message: impl ToString) -> Self {
        Self::ConfigurationError {
            message: message.to_string(),
            field: field.to_string(),
        }
    }

    /// Whether the walk can continue past this error.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::RequiredFieldMissing { .. } => true,
            Self::ExtractionFailed { .. } => true,
            Self::InvalidSelector { .. } => false,
            Self::InvalidPattern { .. } => false,
            Self::NoProductUrlsFound { .. } => false,
            Self::ConfigurationError { .. } => false,
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;

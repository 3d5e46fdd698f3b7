//! Error types and error code constants for metadoc.
//!
//! This module provides the unified error type (`MetadocError`) returned by
//! every public entry point of the metadata, reference, canonical-name and
//! declaration-graph layers.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments (absent handle, empty module set, empty additions)
//! - `3`: Malformed canonical name (fails the `<letter>:<identifier>` shape)
//! - `4`: Configuration errors (unreadable or invalid TOML)
//! - `10`: Unclassifiable metadata (the whole build is aborted)
//!
//! ## Design
//!
//! - **Unified type**: `MetadocError` is the single error type across crates
//! - **No "not found" errors**: lookups that can legitimately miss return `Option`
//! - **Code mapping**: `ErrorCode` provides stable integer codes for callers

use std::fmt;

use thiserror::Error;

// ============================================================================
// Error Codes
// ============================================================================

/// Stable error codes for callers that surface failures (CLI, services).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorCode {
    /// Invalid arguments from caller.
    InvalidArguments = 2,
    /// Canonical name does not match the identifier grammar.
    MalformedName = 3,
    /// Configuration could not be read or parsed.
    Configuration = 4,
    /// Metadata shape the builder cannot classify.
    Unclassifiable = 10,
}

impl ErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for metadoc.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetadocError {
    /// A required input is absent or out of range.
    #[error("invalid argument '{parameter}': {message}")]
    InvalidArgument { parameter: String, message: String },

    /// A canonical name failed the grammar's shape checks.
    #[error("malformed canonical name '{name}': {reason}")]
    MalformedCanonicalName { name: String, reason: String },

    /// The builder met a metadata shape it cannot classify.
    #[error("cannot classify {entity}: {reason}")]
    Unclassifiable { entity: String, reason: String },

    /// Configuration could not be loaded.
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

/// Result type for metadoc operations.
pub type MetadocResult<T> = Result<T, MetadocError>;

// ============================================================================
// Error Code Mapping
// ============================================================================

impl From<&MetadocError> for ErrorCode {
    fn from(err: &MetadocError) -> Self {
        match err {
            MetadocError::InvalidArgument { .. } => ErrorCode::InvalidArguments,
            MetadocError::MalformedCanonicalName { .. } => ErrorCode::MalformedName,
            MetadocError::Configuration { .. } => ErrorCode::Configuration,
            MetadocError::Unclassifiable { .. } => ErrorCode::Unclassifiable,
        }
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl MetadocError {
    /// Create an invalid argument error for the named parameter.
    pub fn invalid_argument(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        MetadocError::InvalidArgument {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a malformed canonical name error.
    pub fn malformed_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        MetadocError::MalformedCanonicalName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an unclassifiable metadata error.
    pub fn unclassifiable(entity: impl Into<String>, reason: impl Into<String>) -> Self {
        MetadocError::Unclassifiable {
            entity: entity.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        MetadocError::Configuration {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> ErrorCode {
        ErrorCode::from(self)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod error_code_mapping {
        use super::*;

        #[test]
        fn invalid_argument_maps_to_invalid_arguments() {
            let err = MetadocError::invalid_argument("modules", "cannot be empty");
            assert_eq!(err.error_code(), ErrorCode::InvalidArguments);
            assert_eq!(err.error_code().code(), 2);
        }

        #[test]
        fn malformed_name_maps_to_malformed_name() {
            let err = MetadocError::malformed_name("K:x", "unknown member type");
            assert_eq!(err.error_code(), ErrorCode::MalformedName);
            assert_eq!(err.error_code().code(), 3);
        }

        #[test]
        fn unclassifiable_maps_to_code_10() {
            let err =
                MetadocError::unclassifiable("type 'N.Broken'", "interface with a base class");
            assert_eq!(err.error_code().code(), 10);
        }
    }

    mod display {
        use super::*;

        #[test]
        fn malformed_name_includes_offending_string() {
            let err = MetadocError::malformed_name("T.wrong_separator", "expected ':'");
            let message = err.to_string();
            assert!(message.contains("T.wrong_separator"));
            assert!(message.contains("expected ':'"));
        }

        #[test]
        fn invalid_argument_names_the_parameter() {
            let err =
                MetadocError::invalid_argument("additions", "at least one addition is required");
            assert_eq!(
                err.to_string(),
                "invalid argument 'additions': at least one addition is required"
            );
        }
    }
}

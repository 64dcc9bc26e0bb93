//! Error types for settings construction using snafu.
//!
//! Settings validation distinguishes two failure classes:
//! - **Null arguments**: a required sequence or mapping was explicitly supplied as `None`
//! - **Invalid arguments**: a supplied value violates a range, length, or cross-field constraint
//!
//! Both name the offending parameter so callers can correct it and retry.

use snafu::{Location, Snafu};

/// Result type alias for settings construction.
pub type Result<T, E = SettingsError> = std::result::Result<T, E>;

/// Settings validation error.
///
/// Returned by every construction and derivation entry point. A failed
/// construction never produces an instance.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SettingsError {
    /// A required value was explicitly supplied as `None`.
    #[snafu(display("Value cannot be null: {parameter}"))]
    ArgumentNull {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// Source location.
        #[snafu(implicit)]
        location: Location,
    },

    /// A supplied value is out of range or inconsistent with another value.
    #[snafu(display("Invalid argument {parameter}: {message}"))]
    InvalidArgument {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// Description of the violated constraint.
        message: String,
        /// Source location.
        #[snafu(implicit)]
        location: Location,
    },
}

impl SettingsError {
    /// Returns the name of the parameter that failed validation.
    #[must_use]
    pub fn parameter(&self) -> &'static str {
        match self {
            Self::ArgumentNull { parameter, .. } | Self::InvalidArgument { parameter, .. } => {
                parameter
            },
        }
    }

    /// Returns true if a required value was supplied as `None`.
    #[must_use]
    pub fn is_argument_null(&self) -> bool {
        matches!(self, Self::ArgumentNull { .. })
    }

    /// Returns true if a supplied value violated a constraint.
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}

//! Validation primitives for settings construction.
//!
//! Every primitive takes a resolved value and the name of the parameter it came
//! from. On success the value is returned unchanged so checks compose inline
//! with field assignment; on failure the error names the parameter.

use std::fmt;

use chrono::TimeDelta;

use crate::error::{ArgumentNullSnafu, InvalidArgumentSnafu, Result};

/// A value with a well-defined zero to compare against.
pub trait ZeroBounded: PartialOrd + fmt::Display + Sized {
    /// Returns the zero value of the type.
    fn zero() -> Self;
}

impl ZeroBounded for i32 {
    fn zero() -> Self {
        0
    }
}

impl ZeroBounded for i64 {
    fn zero() -> Self {
        0
    }
}

impl ZeroBounded for TimeDelta {
    fn zero() -> Self {
        TimeDelta::zero()
    }
}

/// Rejects an explicitly supplied `None`.
///
/// # Errors
///
/// Returns [`SettingsError::ArgumentNull`](crate::SettingsError::ArgumentNull)
/// if `value` is `None`.
pub fn is_not_null<T>(value: Option<T>, parameter: &'static str) -> Result<T> {
    match value {
        Some(value) => Ok(value),
        None => {
            tracing::debug!(parameter, "rejected null settings value");
            ArgumentNullSnafu { parameter }.fail()
        },
    }
}

/// Requires `value > 0`.
///
/// # Errors
///
/// Returns [`SettingsError::InvalidArgument`](crate::SettingsError::InvalidArgument)
/// if `value` is zero or negative.
pub fn is_greater_than_zero<T: ZeroBounded>(value: T, parameter: &'static str) -> Result<T> {
    that(
        value > T::zero(),
        parameter,
        || format!("value is not greater than zero: {value}"),
    )?;
    Ok(value)
}

/// Requires `value >= 0`.
///
/// # Errors
///
/// Returns [`SettingsError::InvalidArgument`](crate::SettingsError::InvalidArgument)
/// if `value` is negative.
pub fn is_greater_than_or_equal_to_zero<T: ZeroBounded>(
    value: T,
    parameter: &'static str,
) -> Result<T> {
    that(
        value >= T::zero(),
        parameter,
        || format!("value is not greater than or equal to zero: {value}"),
    )?;
    Ok(value)
}

/// Requires an optional string to be absent or at most `max` characters long.
///
/// # Errors
///
/// Returns [`SettingsError::InvalidArgument`](crate::SettingsError::InvalidArgument)
/// if `value` holds more than `max` characters.
pub fn is_null_or_length_at_most(
    value: Option<String>,
    max: usize,
    parameter: &'static str,
) -> Result<Option<String>> {
    if let Some(ref s) = value {
        let length = s.chars().count();
        that(length <= max, parameter, || {
            format!("length {length} exceeds maximum of {max} characters")
        })?;
    }
    Ok(value)
}

/// Requires a string to be non-empty.
///
/// # Errors
///
/// Returns [`SettingsError::InvalidArgument`](crate::SettingsError::InvalidArgument)
/// if `value` is empty.
pub fn is_not_empty(value: String, parameter: &'static str) -> Result<String> {
    that(!value.is_empty(), parameter, || "value cannot be empty".to_owned())?;
    Ok(value)
}

/// Requires an arbitrary condition, typically a cross-field constraint.
///
/// `message` is only evaluated on failure.
///
/// # Errors
///
/// Returns [`SettingsError::InvalidArgument`](crate::SettingsError::InvalidArgument)
/// if `condition` is false.
pub fn that<F>(condition: bool, parameter: &'static str, message: F) -> Result<()>
where
    F: FnOnce() -> String,
{
    if condition {
        return Ok(());
    }
    let message = message();
    tracing::debug!(parameter, reason = %message, "rejected settings value");
    InvalidArgumentSnafu { parameter, message }.fail()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_is_not_null_passes_value_through() {
        assert_eq!(is_not_null(Some(vec![1, 2]), "compressors").unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_is_not_null_rejects_none() {
        let err = is_not_null::<Vec<u8>>(None, "compressors").unwrap_err();
        assert!(err.is_argument_null());
        assert_eq!(err.parameter(), "compressors");
    }

    #[test]
    fn test_is_not_null_accepts_empty_collection() {
        assert!(is_not_null(Some(Vec::<u8>::new()), "authenticators").unwrap().is_empty());
    }

    #[test]
    fn test_greater_than_zero_boundaries() {
        assert!(is_greater_than_zero(1, "n").is_ok());
        assert!(is_greater_than_zero(0, "n").is_err());
        assert!(is_greater_than_zero(-1, "n").is_err());

        assert!(is_greater_than_zero(TimeDelta::nanoseconds(1), "d").is_ok());
        assert!(is_greater_than_zero(TimeDelta::zero(), "d").is_err());
        assert!(is_greater_than_zero(TimeDelta::nanoseconds(-1), "d").is_err());
    }

    #[test]
    fn test_greater_than_zero_error_names_parameter() {
        let err = is_greater_than_zero(TimeDelta::zero(), "max_idle_time").unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(err.parameter(), "max_idle_time");
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn test_greater_than_or_equal_to_zero_boundaries() {
        assert!(is_greater_than_or_equal_to_zero(0, "n").is_ok());
        assert!(is_greater_than_or_equal_to_zero(i32::MAX, "n").is_ok());
        assert!(is_greater_than_or_equal_to_zero(-1, "n").is_err());
        assert!(is_greater_than_or_equal_to_zero(i64::MIN, "n").is_err());

        assert!(is_greater_than_or_equal_to_zero(TimeDelta::zero(), "d").is_ok());
        assert!(is_greater_than_or_equal_to_zero(TimeDelta::milliseconds(-1), "d").is_err());
    }

    #[test]
    fn test_length_at_most_boundaries() {
        assert!(is_null_or_length_at_most(None, 128, "application_name").unwrap().is_none());
        assert!(is_null_or_length_at_most(Some("a".repeat(128)), 128, "application_name").is_ok());

        let err =
            is_null_or_length_at_most(Some("a".repeat(129)), 128, "application_name").unwrap_err();
        assert_eq!(err.parameter(), "application_name");
        assert!(err.to_string().contains("129"));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 128 two-byte characters is 256 bytes but still 128 characters.
        assert!(is_null_or_length_at_most(Some("é".repeat(128)), 128, "name").is_ok());
        assert!(is_null_or_length_at_most(Some("é".repeat(129)), 128, "name").is_err());
    }

    #[test]
    fn test_is_not_empty() {
        assert_eq!(is_not_empty("mongodb".to_owned(), "srv_service_name").unwrap(), "mongodb");
        let err = is_not_empty(String::new(), "srv_service_name").unwrap_err();
        assert_eq!(err.parameter(), "srv_service_name");
    }

    #[test]
    fn test_that_evaluates_message_only_on_failure() {
        assert!(that(true, "x", || panic!("message must not be built")).is_ok());
        let err = that(false, "x", || "broken".to_owned()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid argument x: broken");
    }
}

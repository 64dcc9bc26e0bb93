//! Assertion helpers for settings validation failures.
//!
//! Construction errors carry the offending parameter name. These helpers
//! check the error class and the parameter in one call and print the full
//! error on mismatch.

use std::fmt::Debug;

use driver_core_settings::SettingsError;

/// Asserts that `result` failed with an invalid-argument error naming `parameter`.
///
/// # Panics
///
/// Panics if `result` is `Ok`, is a null-argument error, or names a different parameter.
///
/// # Example
///
/// ```no_run
/// use driver_core_settings::ClusterSettings;
/// use driver_core_test_utils::assert_invalid_argument;
///
/// let result = ClusterSettings::builder().max_server_selection_wait_queue_size(-1).build();
/// assert_invalid_argument(&result, "max_server_selection_wait_queue_size");
/// ```
#[track_caller]
#[allow(clippy::panic)]
pub fn assert_invalid_argument<T: Debug>(result: &Result<T, SettingsError>, parameter: &str) {
    match result {
        Err(err @ SettingsError::InvalidArgument { .. }) if err.parameter() == parameter => {},
        Err(err) => panic!("expected invalid argument for `{parameter}`, got error: {err}"),
        Ok(value) => panic!("expected invalid argument for `{parameter}`, got: {value:?}"),
    }
}

/// Asserts that `result` failed with a null-argument error naming `parameter`.
///
/// # Panics
///
/// Panics if `result` is `Ok`, is an invalid-argument error, or names a different parameter.
#[track_caller]
#[allow(clippy::panic)]
pub fn assert_argument_null<T: Debug>(result: &Result<T, SettingsError>, parameter: &str) {
    match result {
        Err(err @ SettingsError::ArgumentNull { .. }) if err.parameter() == parameter => {},
        Err(err) => panic!("expected null argument for `{parameter}`, got error: {err}"),
        Ok(value) => panic!("expected null argument for `{parameter}`, got: {value:?}"),
    }
}

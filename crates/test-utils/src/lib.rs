//! Shared test utilities for the driver settings crates.
//!
//! This crate provides common test helpers to reduce boilerplate across test modules:
//!
//! - [`strategies`] - Proptest generators for settings values
//! - [`test_authenticator`], [`test_compressor`], [`test_selector`] - Distinct opaque handles
//! - [`test_cluster_settings`], [`test_connection_settings`] - Fully populated settings
//! - [`assert_invalid_argument`], [`assert_argument_null`] - Validation failure checks

#![deny(unsafe_code)]

mod assertions;
pub use assertions::{assert_argument_null, assert_invalid_argument};

mod fixtures;
pub use fixtures::{
    TestAuthenticator, TestCompressor, TestSelector, test_authenticator, test_cluster_settings,
    test_compressor, test_connection_settings, test_selector,
};

pub mod strategies;

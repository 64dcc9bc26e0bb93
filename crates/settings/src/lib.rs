//! Immutable, validated settings for the driver core.
//!
//! This crate models how a database client is configured:
//! - [`ClusterSettings`]: topology discovery, endpoints, and server selection
//! - [`ConnectionSettings`]: per-connection handshake and pooling behavior
//!
//! Every settings value is validated exactly once, when it is built, and is
//! never mutated afterwards. Derived values are produced with `with()`, which
//! copies every field that is not overridden and re-runs the full validation.
//!
//! Parameters are wrapped in [`Optional`] so "not supplied" stays distinct
//! from "supplied, equal to the default" or "supplied as `None`".
//!
//! # Quick Start
//!
//! ```
//! use chrono::TimeDelta;
//! use driver_core_settings::{ClusterSettings, ConnectionSettings, EndPoint};
//!
//! # fn main() -> driver_core_settings::Result<()> {
//! let cluster = ClusterSettings::builder()
//!     .end_points(vec!["db1:27017".parse::<EndPoint>()?])
//!     .server_selection_timeout(TimeDelta::seconds(10))
//!     .build()?;
//!
//! let connection = ConnectionSettings::builder().application_name("reporting").build()?;
//!
//! // Derivation never touches the original.
//! let renamed = connection.with().application_name("reporting-v2").build()?;
//! assert_eq!(connection.application_name(), Some("reporting"));
//! assert_eq!(renamed.application_name(), Some("reporting-v2"));
//! assert_eq!(cluster.end_points().len(), 1);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cluster;
mod connection;
mod endpoint;
pub mod ensure;
mod error;
mod handle;
mod optional;

pub use cluster::{
    ClusterConnectionMode, ClusterSettings, ConnectionStringScheme, DEFAULT_SRV_SERVICE_NAME,
    KmsProviders, SchemaMap,
};
pub use connection::{ConnectionSettings, MAX_APPLICATION_NAME_LENGTH};
pub use endpoint::{DEFAULT_PORT, EndPoint};
pub use error::{Result, SettingsError};
pub use handle::{
    Authenticator, AuthenticatorHandle, CompressorConfiguration, CompressorHandle, Handle,
    ServerSelector, ServerSelectorHandle,
};
pub use optional::Optional;

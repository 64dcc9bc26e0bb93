//! Opaque collaborator fixtures.
//!
//! Settings only store authenticators, compressors, and selectors by
//! reference. These minimal implementations give tests distinct handles to
//! pass through and compare by identity.

use std::sync::Arc;

use chrono::TimeDelta;
use driver_core_settings::{
    Authenticator, AuthenticatorHandle, ClusterConnectionMode, ClusterSettings,
    CompressorConfiguration, CompressorHandle, ConnectionSettings, EndPoint, Handle,
    ServerSelector, ServerSelectorHandle,
};

/// Authenticator that only reports its mechanism name.
#[derive(Debug, Clone)]
pub struct TestAuthenticator {
    /// Mechanism name reported by [`Authenticator::mechanism`].
    pub mechanism: String,
}

impl Authenticator for TestAuthenticator {
    fn mechanism(&self) -> &str {
        &self.mechanism
    }
}

/// Compressor configuration that only reports its compressor name.
#[derive(Debug, Clone)]
pub struct TestCompressor {
    /// Compressor name reported by [`CompressorConfiguration::compressor`].
    pub name: String,
}

impl CompressorConfiguration for TestCompressor {
    fn compressor(&self) -> &str {
        &self.name
    }
}

/// Server selector that only reports its name.
#[derive(Debug, Clone)]
pub struct TestSelector {
    /// Name reported by [`ServerSelector::name`].
    pub name: String,
}

impl ServerSelector for TestSelector {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Returns a fresh authenticator handle.
///
/// Each call yields a distinct identity, even for the same mechanism.
#[must_use]
pub fn test_authenticator(mechanism: &str) -> AuthenticatorHandle {
    let inner: Arc<dyn Authenticator> =
        Arc::new(TestAuthenticator { mechanism: mechanism.to_owned() });
    Handle::new(inner)
}

/// Returns a fresh compressor handle.
#[must_use]
pub fn test_compressor(name: &str) -> CompressorHandle {
    let inner: Arc<dyn CompressorConfiguration> =
        Arc::new(TestCompressor { name: name.to_owned() });
    Handle::new(inner)
}

/// Returns a fresh server selector handle.
#[must_use]
pub fn test_selector(name: &str) -> ServerSelectorHandle {
    let inner: Arc<dyn ServerSelector> = Arc::new(TestSelector { name: name.to_owned() });
    Handle::new(inner)
}

/// Returns connection settings with every field set away from its default.
///
/// - `application_name`: `"test-app"`
/// - one `SCRAM-SHA-256` authenticator, one `zstd` compressor
/// - `load_balanced`: true
/// - `max_idle_time`: 1 minute, `max_life_time`: 5 minutes
///
/// # Panics
///
/// Panics if the fixture values no longer pass validation.
#[must_use]
#[allow(clippy::expect_used)]
pub fn test_connection_settings() -> ConnectionSettings {
    ConnectionSettings::builder()
        .application_name("test-app")
        .authenticators(vec![test_authenticator("SCRAM-SHA-256")])
        .compressors(vec![test_compressor("zstd")])
        .load_balanced(true)
        .max_idle_time(TimeDelta::minutes(1))
        .max_life_time(TimeDelta::minutes(5))
        .build()
        .expect("connection settings fixture must be valid")
}

/// Returns a three-member replica set configuration with both selectors set.
///
/// # Panics
///
/// Panics if the fixture values no longer pass validation.
#[must_use]
#[allow(clippy::expect_used)]
pub fn test_cluster_settings() -> ClusterSettings {
    let members = ["rs1.test", "rs2.test", "rs3.test"]
        .into_iter()
        .map(|host| EndPoint::dns(host, 27017).expect("fixture host must be valid"))
        .collect::<Vec<_>>();
    ClusterSettings::builder()
        .connection_mode(ClusterConnectionMode::ReplicaSet)
        .end_points(members)
        .replica_set_name("rs0")
        .max_server_selection_wait_queue_size(100)
        .server_selection_timeout(TimeDelta::seconds(5))
        .pre_server_selector(test_selector("pre"))
        .post_server_selector(test_selector("post"))
        .build()
        .expect("cluster settings fixture must be valid")
}

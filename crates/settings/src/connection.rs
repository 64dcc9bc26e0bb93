//! Per-connection settings.

use std::sync::Arc;

use chrono::TimeDelta;

use crate::{
    ensure,
    error::Result,
    handle::{AuthenticatorHandle, CompressorHandle},
    optional::Optional,
};

// =============================================================================
// Limits and Defaults
// =============================================================================

/// Maximum length of an application name, in characters.
pub const MAX_APPLICATION_NAME_LENGTH: usize = 128;

/// Default maximum time a pooled connection may sit idle (10 minutes).
fn default_max_idle_time() -> TimeDelta {
    TimeDelta::minutes(10)
}

/// Default maximum lifetime of a pooled connection (30 minutes).
fn default_max_life_time() -> TimeDelta {
    TimeDelta::minutes(30)
}

// =============================================================================
// Connection Settings
// =============================================================================

/// Settings that govern an individual server connection.
///
/// Instances are validated when built and never change afterwards. Use
/// [`ConnectionSettings::with`] to derive a modified copy.
///
/// # Example
///
/// ```
/// # use chrono::TimeDelta;
/// # use driver_core_settings::ConnectionSettings;
/// # fn example() -> driver_core_settings::Result<()> {
/// let settings = ConnectionSettings::builder()
///     .application_name("inventory-service")
///     .max_idle_time(TimeDelta::minutes(2))
///     .build()?;
///
/// let longer_lived = settings.with().max_life_time(TimeDelta::hours(1)).build()?;
/// assert_eq!(longer_lived.application_name(), Some("inventory-service"));
/// assert_eq!(settings.max_life_time(), TimeDelta::minutes(30));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    /// Name reported to the server during the handshake.
    application_name: Option<String>,
    /// Authenticators applied, in order, to each new connection.
    authenticators: Arc<[AuthenticatorHandle]>,
    /// Compressors offered to the server, in preference order.
    compressors: Arc<[CompressorHandle]>,
    /// Whether connections go through a load balancer.
    load_balanced: bool,
    /// How long a pooled connection may sit idle before it is closed.
    max_idle_time: TimeDelta,
    /// How long a pooled connection may live before it is closed.
    max_life_time: TimeDelta,
}

/// Fully resolved inputs to the single validating construction path.
struct Resolved {
    application_name: Option<String>,
    authenticators: Option<Vec<AuthenticatorHandle>>,
    compressors: Option<Vec<CompressorHandle>>,
    load_balanced: bool,
    max_idle_time: TimeDelta,
    max_life_time: TimeDelta,
}

#[bon::bon]
impl ConnectionSettings {
    /// Creates connection settings, defaulting every unspecified parameter.
    ///
    /// | Parameter | Default |
    /// |---|---|
    /// | `application_name` | `None` |
    /// | `authenticators` | empty |
    /// | `compressors` | empty |
    /// | `load_balanced` | `false` |
    /// | `max_idle_time` | 10 minutes |
    /// | `max_life_time` | 30 minutes |
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `authenticators` or `compressors` is explicitly `None`
    /// - `application_name` exceeds 128 characters
    /// - `max_idle_time` or `max_life_time` is zero or negative
    #[builder]
    pub fn new(
        #[builder(default, into)] application_name: Optional<Option<String>>,
        #[builder(default, into)] authenticators: Optional<Option<Vec<AuthenticatorHandle>>>,
        #[builder(default, into)] compressors: Optional<Option<Vec<CompressorHandle>>>,
        #[builder(default, into)] load_balanced: Optional<bool>,
        #[builder(default, into)] max_idle_time: Optional<TimeDelta>,
        #[builder(default, into)] max_life_time: Optional<TimeDelta>,
    ) -> Result<Self> {
        Self::default()
            .with()
            .application_name(application_name)
            .authenticators(authenticators)
            .compressors(compressors)
            .load_balanced(load_balanced)
            .max_idle_time(max_idle_time)
            .max_life_time(max_life_time)
            .build()
    }

    /// Derives new settings, copying every parameter that is not overridden.
    ///
    /// The result is validated from scratch. `self` is left untouched.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`ConnectionSettings::new`] for any
    /// overridden value that violates a constraint.
    #[builder(finish_fn = build)]
    pub fn with(
        &self,
        #[builder(default, into)] application_name: Optional<Option<String>>,
        #[builder(default, into)] authenticators: Optional<Option<Vec<AuthenticatorHandle>>>,
        #[builder(default, into)] compressors: Optional<Option<Vec<CompressorHandle>>>,
        #[builder(default, into)] load_balanced: Optional<bool>,
        #[builder(default, into)] max_idle_time: Optional<TimeDelta>,
        #[builder(default, into)] max_life_time: Optional<TimeDelta>,
    ) -> Result<Self> {
        tracing::trace!(
            overrides.application_name = application_name.is_present(),
            overrides.authenticators = authenticators.is_present(),
            overrides.compressors = compressors.is_present(),
            "deriving connection settings"
        );
        Self::from_resolved(Resolved {
            application_name: application_name.resolve_with(|| self.application_name.clone()),
            authenticators: authenticators.resolve_with(|| Some(self.authenticators.to_vec())),
            compressors: compressors.resolve_with(|| Some(self.compressors.to_vec())),
            load_balanced: load_balanced.resolve(self.load_balanced),
            max_idle_time: max_idle_time.resolve(self.max_idle_time),
            max_life_time: max_life_time.resolve(self.max_life_time),
        })
    }
}

impl ConnectionSettings {
    fn from_resolved(resolved: Resolved) -> Result<Self> {
        let application_name = ensure::is_null_or_length_at_most(
            resolved.application_name,
            MAX_APPLICATION_NAME_LENGTH,
            "application_name",
        )?;
        let authenticators = ensure::is_not_null(resolved.authenticators, "authenticators")?;
        let compressors = ensure::is_not_null(resolved.compressors, "compressors")?;
        let max_idle_time = ensure::is_greater_than_zero(resolved.max_idle_time, "max_idle_time")?;
        let max_life_time = ensure::is_greater_than_zero(resolved.max_life_time, "max_life_time")?;

        tracing::trace!(
            authenticators = authenticators.len(),
            compressors = compressors.len(),
            "constructed connection settings"
        );

        Ok(Self {
            application_name,
            authenticators: authenticators.into(),
            compressors: compressors.into(),
            load_balanced: resolved.load_balanced,
            max_idle_time,
            max_life_time,
        })
    }

    /// Returns the application name reported to the server.
    #[must_use]
    pub fn application_name(&self) -> Option<&str> {
        self.application_name.as_deref()
    }

    /// Returns the authenticators, in the order they are applied.
    #[must_use]
    pub fn authenticators(&self) -> &[AuthenticatorHandle] {
        &self.authenticators
    }

    /// Returns the compressors, in preference order.
    #[must_use]
    pub fn compressors(&self) -> &[CompressorHandle] {
        &self.compressors
    }

    /// Returns whether connections go through a load balancer.
    #[must_use]
    pub fn load_balanced(&self) -> bool {
        self.load_balanced
    }

    /// Returns the maximum idle time of a pooled connection.
    #[must_use]
    pub fn max_idle_time(&self) -> TimeDelta {
        self.max_idle_time
    }

    /// Returns the maximum lifetime of a pooled connection.
    #[must_use]
    pub fn max_life_time(&self) -> TimeDelta {
        self.max_life_time
    }
}

// =============================================================================
// Default Instance
// =============================================================================

/// The documented default table. [`ConnectionSettings::new`] derives from this value,
/// so every built instance passes through the same validation.
impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            application_name: None,
            authenticators: Arc::new([]),
            compressors: Arc::new([]),
            load_balanced: false,
            max_idle_time: default_max_idle_time(),
            max_life_time: default_max_life_time(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::handle::{Authenticator, CompressorConfiguration, Handle};

    #[derive(Debug)]
    struct Scram;

    impl Authenticator for Scram {
        fn mechanism(&self) -> &str {
            "SCRAM-SHA-256"
        }
    }

    #[derive(Debug)]
    struct Zstd;

    impl CompressorConfiguration for Zstd {
        fn compressor(&self) -> &str {
            "zstd"
        }
    }

    fn scram() -> AuthenticatorHandle {
        let inner: Arc<dyn Authenticator> = Arc::new(Scram);
        Handle::new(inner)
    }

    fn zstd() -> CompressorHandle {
        let inner: Arc<dyn CompressorConfiguration> = Arc::new(Zstd);
        Handle::new(inner)
    }

    #[test]
    fn test_defaults() {
        let settings = ConnectionSettings::builder().build().unwrap();
        assert_eq!(settings.application_name(), None);
        assert!(settings.authenticators().is_empty());
        assert!(settings.compressors().is_empty());
        assert!(!settings.load_balanced());
        assert_eq!(settings.max_idle_time(), TimeDelta::minutes(10));
        assert_eq!(settings.max_life_time(), TimeDelta::minutes(30));
    }

    #[test]
    fn test_default_impl_matches_builder() {
        assert_eq!(ConnectionSettings::default(), ConnectionSettings::builder().build().unwrap());
    }

    #[test]
    fn test_default_instance_passes_validation() {
        let rebuilt = ConnectionSettings::default().with().build().unwrap();
        assert_eq!(rebuilt, ConnectionSettings::default());
    }

    #[test]
    fn test_builder_and_with_reject_alike() {
        let built =
            ConnectionSettings::builder().max_idle_time(TimeDelta::zero()).build().unwrap_err();
        let derived = ConnectionSettings::default()
            .with()
            .max_idle_time(TimeDelta::zero())
            .build()
            .unwrap_err();
        assert_eq!(built.parameter(), "max_idle_time");
        assert_eq!(derived.parameter(), built.parameter());
    }

    #[test]
    fn test_custom_values() {
        let auth = scram();
        let comp = zstd();
        let settings = ConnectionSettings::builder()
            .application_name("app1")
            .authenticators(vec![auth.clone()])
            .compressors(vec![comp.clone()])
            .load_balanced(true)
            .max_idle_time(TimeDelta::seconds(30))
            .max_life_time(TimeDelta::hours(1))
            .build()
            .unwrap();

        assert_eq!(settings.application_name(), Some("app1"));
        assert_eq!(settings.authenticators(), &[auth]);
        assert_eq!(settings.authenticators()[0].mechanism(), "SCRAM-SHA-256");
        assert_eq!(settings.compressors(), &[comp]);
        assert!(settings.load_balanced());
        assert_eq!(settings.max_idle_time(), TimeDelta::seconds(30));
        assert_eq!(settings.max_life_time(), TimeDelta::hours(1));
    }

    #[test]
    fn test_application_name_length_boundary() {
        let name = "a".repeat(MAX_APPLICATION_NAME_LENGTH);
        let settings =
            ConnectionSettings::builder().application_name(name.clone()).build().unwrap();
        assert_eq!(settings.application_name(), Some(name.as_str()));

        let err = ConnectionSettings::builder()
            .application_name("a".repeat(MAX_APPLICATION_NAME_LENGTH + 1))
            .build()
            .unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(err.parameter(), "application_name");
    }

    #[test]
    fn test_null_authenticators_rejected() {
        let err = ConnectionSettings::builder()
            .authenticators(Optional::Present(None))
            .build()
            .unwrap_err();
        assert!(err.is_argument_null());
        assert_eq!(err.parameter(), "authenticators");
    }

    #[test]
    fn test_null_compressors_rejected() {
        let err =
            ConnectionSettings::builder().compressors(Optional::Present(None)).build().unwrap_err();
        assert!(err.is_argument_null());
        assert_eq!(err.parameter(), "compressors");
    }

    #[test]
    fn test_max_idle_time_must_be_positive() {
        for value in [TimeDelta::zero(), TimeDelta::seconds(-1)] {
            let err = ConnectionSettings::builder().max_idle_time(value).build().unwrap_err();
            assert_eq!(err.parameter(), "max_idle_time");
        }
        let smallest = TimeDelta::nanoseconds(1);
        let settings = ConnectionSettings::builder().max_idle_time(smallest).build().unwrap();
        assert_eq!(settings.max_idle_time(), smallest);
    }

    #[test]
    fn test_max_life_time_must_be_positive() {
        for value in [TimeDelta::zero(), TimeDelta::minutes(-5)] {
            let err = ConnectionSettings::builder().max_life_time(value).build().unwrap_err();
            assert_eq!(err.parameter(), "max_life_time");
        }
        let result = ConnectionSettings::builder().max_life_time(TimeDelta::nanoseconds(1)).build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_first_failure_wins() {
        // Both are invalid; the earlier check reports.
        let err = ConnectionSettings::builder()
            .compressors(Optional::Present(None))
            .max_idle_time(TimeDelta::zero())
            .build()
            .unwrap_err();
        assert_eq!(err.parameter(), "compressors");
    }

    #[test]
    fn test_with_application_name() {
        let settings = ConnectionSettings::builder()
            .application_name("app1")
            .authenticators(vec![scram()])
            .max_idle_time(TimeDelta::minutes(3))
            .build()
            .unwrap();

        let derived = settings.with().application_name("app2").build().unwrap();

        assert_eq!(derived.application_name(), Some("app2"));
        assert_eq!(derived.authenticators(), settings.authenticators());
        assert_eq!(derived.compressors(), settings.compressors());
        assert_eq!(derived.load_balanced(), settings.load_balanced());
        assert_eq!(derived.max_idle_time(), settings.max_idle_time());
        assert_eq!(derived.max_life_time(), settings.max_life_time());
        assert_eq!(settings.application_name(), Some("app1"));
    }

    #[test]
    fn test_with_explicit_none_clears_application_name() {
        let settings = ConnectionSettings::builder().application_name("app1").build().unwrap();
        let derived = settings.with().application_name(None::<String>).build().unwrap();
        assert_eq!(derived.application_name(), None);
        assert_eq!(settings.application_name(), Some("app1"));
    }

    #[test]
    fn test_with_no_overrides_is_equal() {
        let settings = ConnectionSettings::builder()
            .application_name("app1")
            .authenticators(vec![scram()])
            .compressors(vec![zstd()])
            .build()
            .unwrap();
        assert_eq!(settings.with().build().unwrap(), settings);
    }

    #[test]
    fn test_with_invalid_override_leaves_original_intact() {
        let settings = ConnectionSettings::default();
        let err = settings.with().max_life_time(TimeDelta::zero()).build().unwrap_err();
        assert_eq!(err.parameter(), "max_life_time");
        assert_eq!(settings, ConnectionSettings::default());
    }

    #[test]
    fn test_with_null_authenticators_rejected() {
        let settings = ConnectionSettings::builder().authenticators(vec![scram()]).build().unwrap();
        let err = settings.with().authenticators(Optional::Present(None)).build().unwrap_err();
        assert!(err.is_argument_null());
        assert_eq!(settings.authenticators().len(), 1);
    }

    #[test]
    fn test_with_snapshots_sequences() {
        let settings = ConnectionSettings::builder().authenticators(vec![scram()]).build().unwrap();
        let derived = settings.with().build().unwrap();
        // Handles are shared, backing storage is not.
        assert_eq!(derived.authenticators(), settings.authenticators());
        assert!(!std::ptr::eq(derived.authenticators(), settings.authenticators()));
    }
}

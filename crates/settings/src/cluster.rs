//! Cluster topology settings.

use std::{collections::BTreeMap, fmt, sync::Arc};

use chrono::TimeDelta;

use crate::{
    endpoint::EndPoint,
    ensure,
    error::Result,
    handle::ServerSelectorHandle,
    optional::Optional,
};

// =============================================================================
// Payload Types
// =============================================================================

/// Key management provider settings, keyed by provider name (e.g., `aws`, `local`).
///
/// Each provider maps its own setting names to values. The contents are
/// forwarded to the encryption subsystem without interpretation.
pub type KmsProviders = BTreeMap<String, BTreeMap<String, serde_json::Value>>;

/// Client-side schemas, keyed by full collection namespace (`db.collection`).
pub type SchemaMap = BTreeMap<String, serde_json::Value>;

// =============================================================================
// Defaults
// =============================================================================

/// Default bound on operations waiting for server selection.
const fn default_max_server_selection_wait_queue_size() -> i32 {
    500
}

/// Default server selection timeout (30 seconds).
fn default_server_selection_timeout() -> TimeDelta {
    TimeDelta::seconds(30)
}

/// Default latency window for choosing among suitable servers (15 milliseconds).
fn default_local_threshold() -> TimeDelta {
    TimeDelta::milliseconds(15)
}

/// Default DNS SRV service name.
pub const DEFAULT_SRV_SERVICE_NAME: &str = "mongodb";

// =============================================================================
// Topology Enums
// =============================================================================

/// How the client discovers and talks to the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClusterConnectionMode {
    /// Discover the topology from the servers.
    #[default]
    Automatic,
    /// Talk to exactly one server, whatever its type.
    Direct,
    /// Expect a single standalone server.
    Standalone,
    /// Expect members of a replica set.
    ReplicaSet,
    /// Expect routers of a sharded cluster.
    Sharded,
}

impl fmt::Display for ClusterConnectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Automatic => "Automatic",
            Self::Direct => "Direct",
            Self::Standalone => "Standalone",
            Self::ReplicaSet => "ReplicaSet",
            Self::Sharded => "Sharded",
        };
        f.write_str(name)
    }
}

/// Scheme of the connection string the settings were derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionStringScheme {
    /// Hosts are listed explicitly.
    #[default]
    Standard,
    /// Hosts are discovered through a DNS SRV lookup.
    Srv,
}

impl ConnectionStringScheme {
    /// Returns the URI scheme prefix.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "mongodb",
            Self::Srv => "mongodb+srv",
        }
    }
}

impl fmt::Display for ConnectionStringScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Cluster Settings
// =============================================================================

/// Settings that govern how the client models and selects from the cluster.
///
/// Instances are validated when built and never change afterwards. Use
/// [`ClusterSettings::with`] to derive a modified copy.
///
/// # Example
///
/// ```
/// # use driver_core_settings::{ClusterConnectionMode, ClusterSettings, EndPoint};
/// # fn example() -> driver_core_settings::Result<()> {
/// let settings = ClusterSettings::builder()
///     .connection_mode(ClusterConnectionMode::ReplicaSet)
///     .end_points(vec![EndPoint::dns("db1", 27017)?, EndPoint::dns("db2", 27017)?])
///     .replica_set_name("rs0")
///     .build()?;
///
/// let narrowed = settings.with().max_server_selection_wait_queue_size(50).build()?;
/// assert_eq!(narrowed.replica_set_name(), Some("rs0"));
/// assert_eq!(settings.max_server_selection_wait_queue_size(), 500);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSettings {
    /// How the topology is discovered.
    connection_mode: ClusterConnectionMode,
    /// Whether to talk to a single server directly, if stated.
    direct_connection: Option<bool>,
    /// Seed endpoints, in the order given.
    end_points: Arc<[EndPoint]>,
    /// Key management providers for client-side encryption.
    kms_providers: Option<Arc<KmsProviders>>,
    /// Whether the cluster sits behind a load balancer.
    load_balanced: bool,
    /// Latency window for choosing among suitable servers.
    local_threshold: TimeDelta,
    /// Bound on operations waiting for server selection.
    max_server_selection_wait_queue_size: i32,
    /// Selector applied after the built-in selection.
    post_server_selector: Option<ServerSelectorHandle>,
    /// Selector applied before the built-in selection.
    pre_server_selector: Option<ServerSelectorHandle>,
    /// Expected replica set name.
    replica_set_name: Option<String>,
    /// Client-side schemas keyed by namespace.
    schema_map: Option<Arc<SchemaMap>>,
    /// Connection string scheme the settings came from.
    scheme: ConnectionStringScheme,
    /// How long server selection may wait before failing.
    server_selection_timeout: TimeDelta,
    /// Maximum number of SRV hosts to use, 0 for no limit.
    srv_max_hosts: i32,
    /// DNS SRV service name.
    srv_service_name: String,
}

/// Fully resolved inputs to the single validating construction path.
struct Resolved {
    connection_mode: ClusterConnectionMode,
    direct_connection: Option<bool>,
    end_points: Option<Vec<EndPoint>>,
    kms_providers: Option<KmsProviders>,
    load_balanced: bool,
    local_threshold: TimeDelta,
    max_server_selection_wait_queue_size: i32,
    post_server_selector: Option<ServerSelectorHandle>,
    pre_server_selector: Option<ServerSelectorHandle>,
    replica_set_name: Option<String>,
    schema_map: Option<SchemaMap>,
    scheme: ConnectionStringScheme,
    server_selection_timeout: TimeDelta,
    srv_max_hosts: i32,
    srv_service_name: String,
}

#[bon::bon]
impl ClusterSettings {
    /// Creates cluster settings, defaulting every unspecified parameter.
    ///
    /// | Parameter | Default |
    /// |---|---|
    /// | `connection_mode` | [`ClusterConnectionMode::Automatic`] |
    /// | `direct_connection` | `None` |
    /// | `end_points` | `[localhost:27017]` |
    /// | `kms_providers` | `None` |
    /// | `load_balanced` | `false` |
    /// | `local_threshold` | 15 milliseconds |
    /// | `max_server_selection_wait_queue_size` | 500 |
    /// | `post_server_selector` / `pre_server_selector` | `None` |
    /// | `replica_set_name` | `None` |
    /// | `schema_map` | `None` |
    /// | `scheme` | [`ConnectionStringScheme::Standard`] |
    /// | `server_selection_timeout` | 30 seconds |
    /// | `srv_max_hosts` | 0 (unlimited) |
    /// | `srv_service_name` | `"mongodb"` |
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `end_points` is explicitly `None`
    /// - `max_server_selection_wait_queue_size`, `server_selection_timeout`, `local_threshold`, or
    ///   `srv_max_hosts` is negative
    /// - `srv_service_name` is empty
    /// - `direct_connection` is `Some(true)` without exactly one endpoint
    /// - `load_balanced` is combined with a replica set name or a direct connection
    /// - `srv_max_hosts` is positive without the SRV scheme
    #[builder]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        #[builder(default, into)] connection_mode: Optional<ClusterConnectionMode>,
        #[builder(default, into)] direct_connection: Optional<Option<bool>>,
        #[builder(default, into)] end_points: Optional<Option<Vec<EndPoint>>>,
        #[builder(default, into)] kms_providers: Optional<Option<KmsProviders>>,
        #[builder(default, into)] load_balanced: Optional<bool>,
        #[builder(default, into)] local_threshold: Optional<TimeDelta>,
        #[builder(default, into)] max_server_selection_wait_queue_size: Optional<i32>,
        #[builder(default, into)] post_server_selector: Optional<Option<ServerSelectorHandle>>,
        #[builder(default, into)] pre_server_selector: Optional<Option<ServerSelectorHandle>>,
        #[builder(default, into)] replica_set_name: Optional<Option<String>>,
        #[builder(default, into)] schema_map: Optional<Option<SchemaMap>>,
        #[builder(default, into)] scheme: Optional<ConnectionStringScheme>,
        #[builder(default, into)] server_selection_timeout: Optional<TimeDelta>,
        #[builder(default, into)] srv_max_hosts: Optional<i32>,
        #[builder(default, into)] srv_service_name: Optional<String>,
    ) -> Result<Self> {
        Self::default()
            .with()
            .connection_mode(connection_mode)
            .direct_connection(direct_connection)
            .end_points(end_points)
            .kms_providers(kms_providers)
            .load_balanced(load_balanced)
            .local_threshold(local_threshold)
            .max_server_selection_wait_queue_size(max_server_selection_wait_queue_size)
            .post_server_selector(post_server_selector)
            .pre_server_selector(pre_server_selector)
            .replica_set_name(replica_set_name)
            .schema_map(schema_map)
            .scheme(scheme)
            .server_selection_timeout(server_selection_timeout)
            .srv_max_hosts(srv_max_hosts)
            .srv_service_name(srv_service_name)
            .build()
    }

    /// Derives new settings, copying every parameter that is not overridden.
    ///
    /// The result is validated from scratch, including cross-field
    /// constraints between overridden and copied values. `self` is left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`ClusterSettings::new`].
    #[builder(finish_fn = build)]
    #[allow(clippy::too_many_arguments)]
    pub fn with(
        &self,
        #[builder(default, into)] connection_mode: Optional<ClusterConnectionMode>,
        #[builder(default, into)] direct_connection: Optional<Option<bool>>,
        #[builder(default, into)] end_points: Optional<Option<Vec<EndPoint>>>,
        #[builder(default, into)] kms_providers: Optional<Option<KmsProviders>>,
        #[builder(default, into)] load_balanced: Optional<bool>,
        #[builder(default, into)] local_threshold: Optional<TimeDelta>,
        #[builder(default, into)] max_server_selection_wait_queue_size: Optional<i32>,
        #[builder(default, into)] post_server_selector: Optional<Option<ServerSelectorHandle>>,
        #[builder(default, into)] pre_server_selector: Optional<Option<ServerSelectorHandle>>,
        #[builder(default, into)] replica_set_name: Optional<Option<String>>,
        #[builder(default, into)] schema_map: Optional<Option<SchemaMap>>,
        #[builder(default, into)] scheme: Optional<ConnectionStringScheme>,
        #[builder(default, into)] server_selection_timeout: Optional<TimeDelta>,
        #[builder(default, into)] srv_max_hosts: Optional<i32>,
        #[builder(default, into)] srv_service_name: Optional<String>,
    ) -> Result<Self> {
        tracing::trace!(
            overrides.connection_mode = connection_mode.is_present(),
            overrides.end_points = end_points.is_present(),
            overrides.replica_set_name = replica_set_name.is_present(),
            "deriving cluster settings"
        );
        Self::from_resolved(Resolved {
            connection_mode: connection_mode.resolve(self.connection_mode),
            direct_connection: direct_connection.resolve(self.direct_connection),
            end_points: end_points.resolve_with(|| Some(self.end_points.to_vec())),
            kms_providers: kms_providers
                .resolve_with(|| self.kms_providers.as_deref().cloned()),
            load_balanced: load_balanced.resolve(self.load_balanced),
            local_threshold: local_threshold.resolve(self.local_threshold),
            max_server_selection_wait_queue_size: max_server_selection_wait_queue_size
                .resolve(self.max_server_selection_wait_queue_size),
            post_server_selector: post_server_selector
                .resolve_with(|| self.post_server_selector.clone()),
            pre_server_selector: pre_server_selector
                .resolve_with(|| self.pre_server_selector.clone()),
            replica_set_name: replica_set_name.resolve_with(|| self.replica_set_name.clone()),
            schema_map: schema_map.resolve_with(|| self.schema_map.as_deref().cloned()),
            scheme: scheme.resolve(self.scheme),
            server_selection_timeout: server_selection_timeout
                .resolve(self.server_selection_timeout),
            srv_max_hosts: srv_max_hosts.resolve(self.srv_max_hosts),
            srv_service_name: srv_service_name.resolve_with(|| self.srv_service_name.clone()),
        })
    }
}

impl ClusterSettings {
    fn from_resolved(resolved: Resolved) -> Result<Self> {
        let end_points = ensure::is_not_null(resolved.end_points, "end_points")?;
        let local_threshold =
            ensure::is_greater_than_or_equal_to_zero(resolved.local_threshold, "local_threshold")?;
        let max_server_selection_wait_queue_size = ensure::is_greater_than_or_equal_to_zero(
            resolved.max_server_selection_wait_queue_size,
            "max_server_selection_wait_queue_size",
        )?;
        let server_selection_timeout = ensure::is_greater_than_or_equal_to_zero(
            resolved.server_selection_timeout,
            "server_selection_timeout",
        )?;
        let srv_max_hosts =
            ensure::is_greater_than_or_equal_to_zero(resolved.srv_max_hosts, "srv_max_hosts")?;
        let srv_service_name =
            ensure::is_not_empty(resolved.srv_service_name, "srv_service_name")?;

        let direct = resolved.direct_connection == Some(true);
        ensure::that(!direct || end_points.len() == 1, "end_points", || {
            format!("a direct connection requires exactly one endpoint, got {}", end_points.len())
        })?;
        ensure::that(
            !resolved.load_balanced || resolved.replica_set_name.is_none(),
            "replica_set_name",
            || "a replica set name cannot be combined with load balancing".to_owned(),
        )?;
        ensure::that(!resolved.load_balanced || !direct, "direct_connection", || {
            "a direct connection cannot be combined with load balancing".to_owned()
        })?;
        ensure::that(
            srv_max_hosts == 0 || resolved.scheme == ConnectionStringScheme::Srv,
            "srv_max_hosts",
            || format!("srv_max_hosts requires the {} scheme", ConnectionStringScheme::Srv),
        )?;

        tracing::trace!(
            connection_mode = %resolved.connection_mode,
            end_points = end_points.len(),
            scheme = %resolved.scheme,
            "constructed cluster settings"
        );

        Ok(Self {
            connection_mode: resolved.connection_mode,
            direct_connection: resolved.direct_connection,
            end_points: end_points.into(),
            kms_providers: resolved.kms_providers.map(Arc::new),
            load_balanced: resolved.load_balanced,
            local_threshold,
            max_server_selection_wait_queue_size,
            post_server_selector: resolved.post_server_selector,
            pre_server_selector: resolved.pre_server_selector,
            replica_set_name: resolved.replica_set_name,
            schema_map: resolved.schema_map.map(Arc::new),
            scheme: resolved.scheme,
            server_selection_timeout,
            srv_max_hosts,
            srv_service_name,
        })
    }

    /// Returns the connection mode.
    #[must_use]
    pub fn connection_mode(&self) -> ClusterConnectionMode {
        self.connection_mode
    }

    /// Returns the explicit direct-connection flag, if one was given.
    #[must_use]
    pub fn direct_connection(&self) -> Option<bool> {
        self.direct_connection
    }

    /// Returns the seed endpoints.
    #[must_use]
    pub fn end_points(&self) -> &[EndPoint] {
        &self.end_points
    }

    /// Returns the key management provider settings.
    #[must_use]
    pub fn kms_providers(&self) -> Option<&KmsProviders> {
        self.kms_providers.as_deref()
    }

    /// Returns whether the cluster sits behind a load balancer.
    #[must_use]
    pub fn load_balanced(&self) -> bool {
        self.load_balanced
    }

    /// Returns the latency window used when choosing among suitable servers.
    #[must_use]
    pub fn local_threshold(&self) -> TimeDelta {
        self.local_threshold
    }

    /// Returns the maximum number of operations waiting for server selection.
    #[must_use]
    pub fn max_server_selection_wait_queue_size(&self) -> i32 {
        self.max_server_selection_wait_queue_size
    }

    /// Returns the selector applied after the built-in selection.
    #[must_use]
    pub fn post_server_selector(&self) -> Option<&ServerSelectorHandle> {
        self.post_server_selector.as_ref()
    }

    /// Returns the selector applied before the built-in selection.
    #[must_use]
    pub fn pre_server_selector(&self) -> Option<&ServerSelectorHandle> {
        self.pre_server_selector.as_ref()
    }

    /// Returns the expected replica set name.
    #[must_use]
    pub fn replica_set_name(&self) -> Option<&str> {
        self.replica_set_name.as_deref()
    }

    /// Returns the client-side schema map.
    #[must_use]
    pub fn schema_map(&self) -> Option<&SchemaMap> {
        self.schema_map.as_deref()
    }

    /// Returns the connection string scheme.
    #[must_use]
    pub fn scheme(&self) -> ConnectionStringScheme {
        self.scheme
    }

    /// Returns how long server selection may wait before failing.
    #[must_use]
    pub fn server_selection_timeout(&self) -> TimeDelta {
        self.server_selection_timeout
    }

    /// Returns the maximum number of SRV hosts to use, or 0 for no limit.
    #[must_use]
    pub fn srv_max_hosts(&self) -> i32 {
        self.srv_max_hosts
    }

    /// Returns the DNS SRV service name.
    #[must_use]
    pub fn srv_service_name(&self) -> &str {
        &self.srv_service_name
    }
}

// =============================================================================
// Default Instance
// =============================================================================

/// The documented default table. [`ClusterSettings::new`] derives from this value,
/// so every built instance passes through the same validation.
impl Default for ClusterSettings {
    fn default() -> Self {
        Self {
            connection_mode: ClusterConnectionMode::Automatic,
            direct_connection: None,
            end_points: Arc::new([EndPoint::localhost()]),
            kms_providers: None,
            load_balanced: false,
            local_threshold: default_local_threshold(),
            max_server_selection_wait_queue_size: default_max_server_selection_wait_queue_size(),
            post_server_selector: None,
            pre_server_selector: None,
            replica_set_name: None,
            schema_map: None,
            scheme: ConnectionStringScheme::Standard,
            server_selection_timeout: default_server_selection_timeout(),
            srv_max_hosts: 0,
            srv_service_name: DEFAULT_SRV_SERVICE_NAME.to_owned(),
        }
    }
}

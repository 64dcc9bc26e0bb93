//! Proptest strategies for driver settings types.
//!
//! Reusable generators for property-based testing. Strategies produce values
//! that satisfy the settings invariants unless their name says otherwise
//! (`arb_invalid_*`), so properties can focus on one constraint at a time.
//!
//! # Usage
//!
//! ```no_run
//! use driver_core_test_utils::strategies;
//! use proptest::prelude::*;
//!
//! proptest! {
//!     #[test]
//!     fn my_property(settings in strategies::arb_cluster_settings()) {
//!         // test invariant with randomly generated settings
//!     }
//! }
//! ```

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

use chrono::TimeDelta;
use driver_core_settings::{
    ClusterConnectionMode, ClusterSettings, ConnectionSettings, ConnectionStringScheme, EndPoint,
    KmsProviders, MAX_APPLICATION_NAME_LENGTH, SchemaMap,
};
use proptest::prelude::*;

use crate::fixtures::{test_authenticator, test_compressor, test_selector};

/// Generates a host name of 1-32 characters matching `[a-z][a-z0-9-]{0,31}`.
pub fn arb_host() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,31}"
}

/// Generates a dotted-digit host such as `10.0.0` that is not a valid IP literal.
pub fn arb_ip_like_host() -> impl Strategy<Value = String> {
    "[0-9]{1,3}(\\.[0-9]{1,3}){0,2}"
}

/// Generates an [`EndPoint`] with a non-zero port.
///
/// Mixes host names, IP-like host names, IPv4 literals, and IPv6 literals.
pub fn arb_end_point() -> impl Strategy<Value = EndPoint> {
    prop_oneof![
        3 => (arb_host(), 1u16..=u16::MAX)
            .prop_filter_map("valid host", |(host, port)| EndPoint::dns(host, port).ok()),
        1 => (arb_ip_like_host(), 1u16..=u16::MAX)
            .prop_filter_map("valid host", |(host, port)| EndPoint::dns(host, port).ok()),
        1 => (any::<Ipv4Addr>(), 1u16..=u16::MAX).prop_filter_map("valid address", |(ip, port)| {
            EndPoint::ip(SocketAddr::new(ip.into(), port)).ok()
        }),
        1 => (any::<Ipv6Addr>(), 1u16..=u16::MAX).prop_filter_map("valid address", |(ip, port)| {
            EndPoint::ip(SocketAddr::new(ip.into(), port)).ok()
        }),
    ]
}

/// Generates 0-7 endpoints.
pub fn arb_end_points() -> impl Strategy<Value = Vec<EndPoint>> {
    proptest::collection::vec(arb_end_point(), 0..8)
}

/// Generates an application name of at most 128 characters, including multi-byte ones.
pub fn arb_application_name() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![proptest::char::range('a', 'z'), Just('é'), Just('-')],
        0..=MAX_APPLICATION_NAME_LENGTH,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

/// Generates an application name of 129-256 characters.
pub fn arb_invalid_application_name() -> impl Strategy<Value = String> {
    (MAX_APPLICATION_NAME_LENGTH + 1..=2 * MAX_APPLICATION_NAME_LENGTH)
        .prop_map(|len| "x".repeat(len))
}

/// Generates a strictly positive duration between 1 ns and ~11.5 days.
pub fn arb_positive_duration() -> impl Strategy<Value = TimeDelta> {
    (1i64..1_000_000_000_000_000).prop_map(TimeDelta::nanoseconds)
}

/// Generates a non-negative duration between 0 and ~11.5 days.
pub fn arb_non_negative_duration() -> impl Strategy<Value = TimeDelta> {
    (0i64..1_000_000_000_000_000).prop_map(TimeDelta::nanoseconds)
}

/// Generates a zero or negative duration.
pub fn arb_non_positive_duration() -> impl Strategy<Value = TimeDelta> {
    (-1_000_000_000_000_000i64..=0).prop_map(TimeDelta::nanoseconds)
}

/// Generates a strictly negative duration.
pub fn arb_negative_duration() -> impl Strategy<Value = TimeDelta> {
    (-1_000_000_000_000_000i64..0).prop_map(TimeDelta::nanoseconds)
}

/// Generates any [`ClusterConnectionMode`].
pub fn arb_connection_mode() -> impl Strategy<Value = ClusterConnectionMode> {
    prop::sample::select(vec![
        ClusterConnectionMode::Automatic,
        ClusterConnectionMode::Direct,
        ClusterConnectionMode::Standalone,
        ClusterConnectionMode::ReplicaSet,
        ClusterConnectionMode::Sharded,
    ])
}

/// Generates a small schema map keyed by `db.collection` namespaces.
pub fn arb_schema_map() -> impl Strategy<Value = SchemaMap> {
    proptest::collection::btree_map(
        ("[a-z]{1,8}", "[a-z]{1,8}").prop_map(|(db, coll)| format!("{db}.{coll}")),
        Just(serde_json::json!({ "bsonType": "object" })),
        0..4,
    )
}

/// Generates KMS provider settings with 0-2 providers of 0-2 entries each.
pub fn arb_kms_providers() -> impl Strategy<Value = KmsProviders> {
    proptest::collection::btree_map(
        "[a-z]{1,8}",
        proptest::collection::btree_map(
            "[a-zA-Z]{1,12}",
            prop_oneof![
                "[A-Za-z0-9+/]{4,16}".prop_map(serde_json::Value::from),
                any::<i64>().prop_map(serde_json::Value::from),
            ],
            0..3,
        ),
        0..3,
    )
}

/// Generates valid [`ConnectionSettings`] with random names, handles, and lifetimes.
pub fn arb_connection_settings() -> impl Strategy<Value = ConnectionSettings> {
    (
        proptest::option::of(arb_application_name()),
        0usize..3, // authenticator count
        0usize..3, // compressor count
        any::<bool>(),
        arb_positive_duration(),
        arb_positive_duration(),
    )
        .prop_filter_map(
            "settings must build",
            |(name, auths, comps, load_balanced, idle, life)| {
                let authenticators: Vec<_> =
                    (0..auths).map(|_| test_authenticator("SCRAM-SHA-256")).collect();
                let compressors: Vec<_> = (0..comps).map(|_| test_compressor("zstd")).collect();
                ConnectionSettings::builder()
                    .application_name(name)
                    .authenticators(authenticators)
                    .compressors(compressors)
                    .load_balanced(load_balanced)
                    .max_idle_time(idle)
                    .max_life_time(life)
                    .build()
                    .ok()
            },
        )
}

/// Generates valid [`ClusterSettings`] with every field varied.
///
/// Generated values are shaped to satisfy the cross-field constraints: a
/// direct connection keeps exactly one endpoint, load balancing drops the
/// replica set name and any direct connection, and `srv_max_hosts` is only
/// positive with the SRV scheme.
pub fn arb_cluster_settings() -> impl Strategy<Value = ClusterSettings> {
    let topology = (
        arb_connection_mode(),
        proptest::option::of(any::<bool>()), // direct connection
        arb_end_point(),
        arb_end_points(),
        any::<bool>(), // load balanced
        proptest::option::of("[a-z]{1,8}"),
    );
    let selection = (
        0i32..10_000,
        arb_non_negative_duration(),
        arb_non_negative_duration(),
        any::<bool>(), // with selectors
    );
    let discovery = (
        proptest::option::of(arb_kms_providers()),
        proptest::option::of(arb_schema_map()),
        any::<bool>(), // srv
        0i32..5,
        "[a-z][a-z0-9-]{0,15}",
    );
    (topology, selection, discovery).prop_filter_map(
        "settings must build",
        |(
            (mode, direct, first, rest, load_balanced, rs),
            (queue, timeout, threshold, sel),
            (kms, schemas, srv, max_hosts, service),
        )| {
            let direct = if load_balanced && direct == Some(true) { Some(false) } else { direct };
            let rs = if load_balanced { None } else { rs };
            let end_points = if direct == Some(true) {
                vec![first]
            } else {
                std::iter::once(first).chain(rest).collect()
            };
            let scheme =
                if srv { ConnectionStringScheme::Srv } else { ConnectionStringScheme::Standard };
            let selector = sel.then(|| test_selector("latency"));
            ClusterSettings::builder()
                .connection_mode(mode)
                .direct_connection(direct)
                .end_points(end_points)
                .kms_providers(kms)
                .load_balanced(load_balanced)
                .local_threshold(threshold)
                .max_server_selection_wait_queue_size(queue)
                .post_server_selector(selector.clone())
                .pre_server_selector(selector)
                .replica_set_name(rs)
                .schema_map(schemas)
                .scheme(scheme)
                .server_selection_timeout(timeout)
                .srv_max_hosts(if srv { max_hosts } else { 0 })
                .srv_service_name(service)
                .build()
                .ok()
        },
    )
}

//! Opaque handles to externally supplied collaborators.
//!
//! Authenticators, compressor configurations, and server selectors are owned
//! by other subsystems. Settings store them behind a shared [`Handle`] and
//! forward them unchanged; two handles are equal only when they refer to the
//! same collaborator instance.

use std::{fmt, ops::Deref, sync::Arc};

/// Authenticates a connection during the handshake.
pub trait Authenticator: fmt::Debug + Send + Sync {
    /// Returns the authentication mechanism name (e.g., `SCRAM-SHA-256`).
    fn mechanism(&self) -> &str;
}

/// Describes a wire compressor the client is willing to negotiate.
pub trait CompressorConfiguration: fmt::Debug + Send + Sync {
    /// Returns the compressor name (e.g., `zstd`).
    fn compressor(&self) -> &str;
}

/// Narrows the set of servers eligible for an operation.
pub trait ServerSelector: fmt::Debug + Send + Sync {
    /// Returns a short human-readable description of the selector.
    fn name(&self) -> &str;
}

/// Shared reference to an authenticator.
pub type AuthenticatorHandle = Handle<dyn Authenticator>;

/// Shared reference to a compressor configuration.
pub type CompressorHandle = Handle<dyn CompressorConfiguration>;

/// Shared reference to a server selector.
pub type ServerSelectorHandle = Handle<dyn ServerSelector>;

/// Reference-counted handle with identity equality.
///
/// Cloning a handle shares the underlying collaborator.
pub struct Handle<T: ?Sized>(Arc<T>);

impl<T: ?Sized> Handle<T> {
    /// Wraps a shared collaborator.
    #[must_use]
    pub fn new(inner: Arc<T>) -> Self {
        Self(inner)
    }

    /// Returns true if both handles refer to the same collaborator.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Returns the shared collaborator.
    #[must_use]
    pub fn as_arc(&self) -> &Arc<T> {
        &self.0
    }
}

impl<T: ?Sized> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> Deref for Handle<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized> From<Arc<T>> for Handle<T> {
    fn from(inner: Arc<T>) -> Self {
        Self(inner)
    }
}

impl<T: ?Sized> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T: ?Sized> Eq for Handle<T> {}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Plain(&'static str);

    impl Authenticator for Plain {
        fn mechanism(&self) -> &str {
            self.0
        }
    }

    fn handle(mechanism: &'static str) -> AuthenticatorHandle {
        let inner: Arc<dyn Authenticator> = Arc::new(Plain(mechanism));
        Handle::new(inner)
    }

    #[test]
    fn test_clone_shares_identity() {
        let a = handle("PLAIN");
        let b = a.clone();
        assert_eq!(a, b);
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn test_equal_contents_different_instances_are_not_equal() {
        assert_ne!(handle("PLAIN"), handle("PLAIN"));
    }

    #[test]
    fn test_deref_reaches_collaborator() {
        assert_eq!(handle("SCRAM-SHA-256").mechanism(), "SCRAM-SHA-256");
    }

    #[test]
    fn test_debug_delegates_to_inner() {
        assert_eq!(format!("{:?}", handle("PLAIN")), "Plain(\"PLAIN\")");
    }
}

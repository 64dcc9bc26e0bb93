//! Optional parameter wrapper.
//!
//! [`Optional`] records whether a caller supplied a parameter at all, which is
//! a different question from whether the supplied value is `None` or equal to
//! the default. A single resolution step, [`Optional::resolve`], serves both
//! first construction (fallback is the documented default) and derivation
//! (fallback is the current instance's value).

use crate::handle::Handle;

/// A parameter that was either supplied by the caller or left unspecified.
///
/// `Present(None)` and `Absent` are distinct: the former explicitly supplies
/// "no value" and overrides any fallback, the latter falls through to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Optional<T> {
    /// The caller did not supply this parameter.
    Absent,
    /// The caller supplied this value, which may equal the default.
    Present(T),
}

impl<T> Optional<T> {
    /// Creates a supplied parameter.
    #[must_use]
    pub const fn present(value: T) -> Self {
        Self::Present(value)
    }

    /// Creates an unspecified parameter.
    #[must_use]
    pub const fn absent() -> Self {
        Self::Absent
    }

    /// Returns true if the caller supplied a value.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Returns true if the caller left the parameter unspecified.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Borrows the supplied value, if any.
    #[must_use]
    pub const fn as_ref(&self) -> Optional<&T> {
        match self {
            Self::Absent => Optional::Absent,
            Self::Present(value) => Optional::Present(value),
        }
    }

    /// Returns the supplied value, or `fallback` if unspecified.
    #[must_use]
    pub fn resolve(self, fallback: T) -> T {
        match self {
            Self::Absent => fallback,
            Self::Present(value) => value,
        }
    }

    /// Returns the supplied value, or computes the fallback if unspecified.
    ///
    /// `fallback` runs only when the parameter is absent.
    #[must_use]
    pub fn resolve_with<F>(self, fallback: F) -> T
    where
        F: FnOnce() -> T,
    {
        match self {
            Self::Absent => fallback(),
            Self::Present(value) => value,
        }
    }
}

impl<T> Default for Optional<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> From<T> for Optional<T> {
    fn from(value: T) -> Self {
        Self::Present(value)
    }
}

impl From<&str> for Optional<Option<String>> {
    fn from(value: &str) -> Self {
        Self::Present(Some(value.to_owned()))
    }
}

impl From<String> for Optional<Option<String>> {
    fn from(value: String) -> Self {
        Self::Present(Some(value))
    }
}

impl From<&str> for Optional<String> {
    fn from(value: &str) -> Self {
        Self::Present(value.to_owned())
    }
}

impl From<bool> for Optional<Option<bool>> {
    fn from(value: bool) -> Self {
        Self::Present(Some(value))
    }
}

impl<T> From<Vec<T>> for Optional<Option<Vec<T>>> {
    fn from(value: Vec<T>) -> Self {
        Self::Present(Some(value))
    }
}

impl<T: ?Sized> From<Handle<T>> for Optional<Option<Handle<T>>> {
    fn from(value: Handle<T>) -> Self {
        Self::Present(Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_resolves_to_fallback() {
        let param: Optional<i32> = Optional::absent();
        assert_eq!(param.resolve(500), 500);
    }

    #[test]
    fn test_present_ignores_fallback() {
        assert_eq!(Optional::present(7).resolve(500), 7);
    }

    #[test]
    fn test_present_default_value_is_still_present() {
        // Supplying the default is not the same as supplying nothing.
        let param = Optional::present(500);
        assert!(param.is_present());
        assert_eq!(param.resolve(42), 500);
    }

    #[test]
    fn test_present_none_overrides_some_fallback() {
        let param: Optional<Option<String>> = Optional::present(None);
        assert_eq!(param.resolve(Some("app1".to_owned())), None);
    }

    #[test]
    fn test_resolve_with_is_lazy_when_present() {
        let mut calls = 0;
        let value = Optional::present(1).resolve_with(|| {
            calls += 1;
            2
        });
        assert_eq!(value, 1);
        assert_eq!(calls, 0);

        let value = Optional::<i32>::absent().resolve_with(|| {
            calls += 1;
            2
        });
        assert_eq!(value, 2);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_default_is_absent() {
        let param: Optional<u8> = Optional::default();
        assert!(param.is_absent());
    }

    #[test]
    fn test_string_conversions_wrap_in_some() {
        let from_str: Optional<Option<String>> = "app".into();
        assert_eq!(from_str, Optional::Present(Some("app".to_owned())));

        let from_string: Optional<Option<String>> = String::from("app").into();
        assert_eq!(from_string, Optional::Present(Some("app".to_owned())));
    }

    #[test]
    fn test_vec_conversion_wraps_in_some() {
        let param: Optional<Option<Vec<u8>>> = vec![1, 2].into();
        assert_eq!(param, Optional::Present(Some(vec![1, 2])));
    }

    #[test]
    fn test_as_ref_preserves_variant() {
        let param = Optional::present(String::from("x"));
        assert_eq!(param.as_ref(), Optional::Present(&String::from("x")));
        assert!(Optional::<String>::absent().as_ref().is_absent());
    }
}

//! Extension traits for wrapping errors in method position.
//!
//! - [`ResultExt`]: call `.wrap("msg")`, `.annotate()` or `.wrap_with_code()`
//!   directly on a `Result`, instead of `map_err` boilerplate.
//! - [`Wrappable`]: the "maybe an error" abstraction behind the macros and
//!   the free functions, implemented for `Result<T, E>` and `Option<E>`.

use std::borrow::Cow;

use crate::BoxError;
use crate::chain::Chain;
use crate::code::Coded;
use crate::location::Location;

// ============================================================================
// Wrappable - a value that may hold an error
// ============================================================================

/// A value that may or may not hold an error: `Result<T, E>` or `Option<E>`.
///
/// Wrapping `Ok`/`None` gives `Ok`/`None` back untouched, without building
/// the message or capturing the location.
///
/// ```rust
/// use errchain::{new, wrap, wrap_with_code};
///
/// let ok: Result<u8, errchain::Chain> = Ok(7);
/// assert_eq!(wrap!(ok, "unused {}", "message").unwrap(), 7);
///
/// let none: Option<std::io::Error> = None;
/// assert!(wrap(none, "never built").is_none());
///
/// let some = Some(new!("root"));
/// assert_eq!(wrap(some, "outer").unwrap().to_string(), "outer: root");
///
/// assert!(wrap_with_code(Ok::<(), std::fmt::Error>(()), 7, "never coded").is_ok());
/// ```
pub trait Wrappable: Sized {
    /// `Self` with the error wrapped in a [`Chain`].
    type Wrapped;
    /// `Self` with the error wrapped in a [`Chain`] and tagged with a code.
    type WrappedWithCode;

    #[doc(hidden)]
    fn wrap_at<M: Into<Cow<'static, str>>>(
        self,
        location: impl FnOnce() -> Location,
        message: impl FnOnce() -> M,
    ) -> Self::Wrapped;

    #[doc(hidden)]
    fn wrap_with_code_at<M: Into<Cow<'static, str>>>(
        self,
        location: impl FnOnce() -> Location,
        code: i64,
        message: impl FnOnce() -> M,
    ) -> Self::WrappedWithCode;
}

impl<T, E: Into<BoxError>> Wrappable for Result<T, E> {
    type Wrapped = Result<T, Chain>;
    type WrappedWithCode = Result<T, Coded>;

    #[inline]
    fn wrap_at<M: Into<Cow<'static, str>>>(
        self,
        location: impl FnOnce() -> Location,
        message: impl FnOnce() -> M,
    ) -> Self::Wrapped {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Chain::from_parts(Some(e.into()), location(), message())),
        }
    }

    #[inline]
    fn wrap_with_code_at<M: Into<Cow<'static, str>>>(
        self,
        location: impl FnOnce() -> Location,
        code: i64,
        message: impl FnOnce() -> M,
    ) -> Self::WrappedWithCode {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Coded::from_parts(
                Chain::from_parts(Some(e.into()), location(), message()),
                code,
            )),
        }
    }
}

impl<E: Into<BoxError>> Wrappable for Option<E> {
    type Wrapped = Option<Chain>;
    type WrappedWithCode = Option<Coded>;

    #[inline]
    fn wrap_at<M: Into<Cow<'static, str>>>(
        self,
        location: impl FnOnce() -> Location,
        message: impl FnOnce() -> M,
    ) -> Self::Wrapped {
        self.map(|e| Chain::from_parts(Some(e.into()), location(), message()))
    }

    #[inline]
    fn wrap_with_code_at<M: Into<Cow<'static, str>>>(
        self,
        location: impl FnOnce() -> Location,
        code: i64,
        message: impl FnOnce() -> M,
    ) -> Self::WrappedWithCode {
        self.map(|e| {
            Coded::from_parts(Chain::from_parts(Some(e.into()), location(), message()), code)
        })
    }
}

// ============================================================================
// ResultExt - method-position wrapping
// ============================================================================

/// Wrap the error of a `Result` at the caller's location.
///
/// Locations captured through these methods carry file and line; the
/// macros also record the enclosing function.
///
/// ## Example
///
/// ```rust
/// use errchain::ResultExt;
///
/// fn read_settings(path: &str) -> Result<String, errchain::Chain> {
///     std::fs::read_to_string(path).wrap_with(|| format!("reading {path}"))
/// }
///
/// let err = read_settings("/nonexistent/settings.toml").unwrap_err();
/// assert!(err.to_string().starts_with("reading /nonexistent/settings.toml: "));
/// assert!(err.location().function().is_empty());
/// ```
pub trait ResultExt<T> {
    /// Wrap the error with a static message.
    #[track_caller]
    fn wrap(self, message: &'static str) -> Result<T, Chain>;

    /// Wrap the error with a lazily built message.
    #[track_caller]
    fn wrap_with<M: Into<Cow<'static, str>>>(self, message: impl FnOnce() -> M) -> Result<T, Chain>;

    /// Record the caller's location without a message.
    #[track_caller]
    fn annotate(self) -> Result<T, Chain>;

    /// Wrap the error with a static message and tag it with `code`.
    #[track_caller]
    fn wrap_with_code(self, code: i64, message: &'static str) -> Result<T, Coded>;
}

impl<T, E: Into<BoxError>> ResultExt<T> for Result<T, E> {
    #[track_caller]
    #[inline]
    fn wrap(self, message: &'static str) -> Result<T, Chain> {
        let caller = core::panic::Location::caller();
        self.wrap_at(|| Location::from_panic_location(caller), || message)
    }

    #[track_caller]
    #[inline]
    fn wrap_with<M: Into<Cow<'static, str>>>(self, message: impl FnOnce() -> M) -> Result<T, Chain> {
        let caller = core::panic::Location::caller();
        self.wrap_at(|| Location::from_panic_location(caller), message)
    }

    #[track_caller]
    #[inline]
    fn annotate(self) -> Result<T, Chain> {
        let caller = core::panic::Location::caller();
        self.wrap_at(|| Location::from_panic_location(caller), || "")
    }

    #[track_caller]
    #[inline]
    fn wrap_with_code(self, code: i64, message: &'static str) -> Result<T, Coded> {
        let caller = core::panic::Location::caller();
        self.wrap_with_code_at(|| Location::from_panic_location(caller), code, || message)
    }
}

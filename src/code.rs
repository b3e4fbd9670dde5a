//! Integer codes attached to errors.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use crate::BoxError;
use crate::chain::Chain;
use crate::location::Location;
use crate::render;

/// An error tagged with an integer code.
///
/// `Coded` is a decorator: `Display` and `Debug` are those of the base error,
/// and [`source()`](Error::source) returns the base. Read the code of any
/// chain with [`code()`](crate::code()), which finds the outermost `Coded`.
///
/// ```rust
/// use errchain::{code, new_with_code, wrap};
///
/// let err = wrap!(Err::<(), _>(new_with_code!(123, "loading config")), "initializing system")
///     .unwrap_err();
/// assert_eq!(err.to_string(), "initializing system: loading config");
/// assert_eq!(code(&err), 123);
/// ```
pub struct Coded {
    base: BoxError,
    code: i64,
}

impl Coded {
    /// Create a root [`Chain`] at the caller's location and tag it with `code`.
    #[track_caller]
    #[inline]
    pub fn new(code: i64, message: impl Into<Cow<'static, str>>) -> Self {
        Self::from_parts(Chain::new(message), code)
    }

    /// Wrap `cause` in a [`Chain`] at the caller's location and tag it with
    /// `code`.
    #[track_caller]
    #[inline]
    pub fn wrap(cause: impl Into<BoxError>, code: i64, message: impl Into<Cow<'static, str>>) -> Self {
        Self::from_parts(Chain::wrap(cause, message), code)
    }

    /// Tag an existing error.
    pub fn from_parts(base: impl Into<BoxError>, code: i64) -> Self {
        Self {
            base: base.into(),
            code,
        }
    }

    /// The attached code.
    #[inline]
    pub fn code(&self) -> i64 {
        self.code
    }

    /// The decorated error.
    #[inline]
    pub fn base(&self) -> &(dyn Error + Send + Sync + 'static) {
        &*self.base
    }

    /// Drop the code and return the decorated error.
    pub fn into_base(self) -> BoxError {
        self.base
    }

    /// Location of the base, when the base is a [`Chain`].
    pub fn location(&self) -> Option<&Location> {
        self.base.downcast_ref::<Chain>().map(Chain::location)
    }
}

impl fmt::Display for Coded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.base, f)
    }
}

impl fmt::Debug for Coded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render::write_detailed(self.base(), f)
    }
}

impl Error for Coded {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.base())
    }
}

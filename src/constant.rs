use std::error::Error;
use std::fmt;

/// A constant error: a `'static` message and nothing else.
///
/// Declare sentinels as `const` items and compare against them with
/// [`is()`](crate::is). Returning a `Const` costs nothing; wrapping one
/// records where it surfaced.
///
/// ```rust
/// use errchain::{Const, is, wrap};
///
/// const NOT_FOUND: Const = Const::new("not found");
///
/// fn lookup(key: &str) -> Result<u32, Const> {
///     if key == "answer" { Ok(42) } else { Err(NOT_FOUND) }
/// }
///
/// let err = wrap!(lookup("question"), "resolving {}", "question").unwrap_err();
/// assert_eq!(err.to_string(), "resolving question: not found");
/// assert!(is(&err, &NOT_FOUND));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Const(&'static str);

impl Const {
    /// Declare a constant error.
    pub const fn new(message: &'static str) -> Self {
        Self(message)
    }

    /// The message.
    pub const fn message(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Const {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl Error for Const {}

//! The [`Chain`] error node.
//!
//! A `Chain` holds a message, the location where it was created and the error
//! it wraps. Wrapping never mutates a node: every layer owns the previous one,
//! so a chain reads outermost (most recent context) to innermost (root cause).

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use crate::BoxError;
use crate::inspect;
use crate::location::Location;
use crate::render::{self, Compact, Detailed};

// ============================================================================
// Chain - Core node type
// ============================================================================

/// An error annotated with a message and the location where it was raised or
/// wrapped, optionally caused by another error.
///
/// ## Shapes
///
/// - **root**: no cause, created by [`new!()`](crate::new!) / [`Chain::new`].
/// - **wrap layer**: a cause and a message, created by [`wrap!()`](crate::wrap!).
/// - **pure marker**: a cause and an empty message, created by
///   [`annotate!()`](crate::annotate!). It only records a location.
///
/// ## Rendering
///
/// `Display` is the compact form: every non-empty message joined with `": "`,
/// outermost first. `Debug` is the detailed form with one location line per
/// layer:
///
/// ```rust
/// use errchain::{new, wrap};
///
/// fn load_config() -> Result<(), errchain::Chain> {
///     Err(new!("file missing"))
/// }
///
/// fn init() -> Result<(), errchain::Chain> {
///     wrap!(load_config(), "initializing {}", "system")
/// }
///
/// let err = init().unwrap_err();
/// assert_eq!(err.to_string(), "initializing system: file missing");
///
/// let detailed = format!("{err:?}");
/// assert!(detailed.starts_with("initializing system\n --- at "));
/// assert!(detailed.contains("(init) ---\ncaused by file missing\n --- at "));
/// ```
pub struct Chain {
    cause: Option<BoxError>,
    message: Cow<'static, str>,
    location: Location,
}

impl Chain {
    /// Create a root error at the caller's location.
    ///
    /// The location carries file and line only; use [`new!()`](crate::new!)
    /// to also record the enclosing function.
    #[track_caller]
    #[inline]
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self::from_parts(None, Location::caller(), message)
    }

    /// Wrap `cause` with a message at the caller's location.
    ///
    /// An empty message makes a pure marker.
    #[track_caller]
    #[inline]
    pub fn wrap(cause: impl Into<BoxError>, message: impl Into<Cow<'static, str>>) -> Self {
        Self::from_parts(Some(cause.into()), Location::caller(), message)
    }

    /// Mark `cause` with the caller's location and no message.
    #[track_caller]
    #[inline]
    pub fn annotate(cause: impl Into<BoxError>) -> Self {
        Self::from_parts(Some(cause.into()), Location::caller(), "")
    }

    /// Assemble a node from its parts.
    ///
    /// This is what the macros expand to. Pass [`Location::UNKNOWN`] to build
    /// a node without location.
    pub fn from_parts(
        cause: Option<BoxError>,
        location: Location,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            cause,
            message: message.into(),
            location,
        }
    }

    /// This layer's message (empty for pure markers).
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Where this layer was created.
    #[inline]
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// The wrapped error, `None` for a root.
    #[inline]
    pub fn cause(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Consume the node and return the wrapped error.
    pub fn into_cause(mut self) -> Option<BoxError> {
        self.cause.take()
    }

    /// Whether this node starts the chain (has no cause).
    #[inline]
    pub fn is_root(&self) -> bool {
        self.cause.is_none()
    }

    /// Whether this node only carries a location.
    #[inline]
    pub fn is_marker(&self) -> bool {
        self.cause.is_some() && self.message.is_empty()
    }

    /// Known locations of every `Chain` reachable from this one, outermost
    /// first.
    ///
    /// ```rust
    /// use errchain::{new, wrap};
    ///
    /// let err = wrap!(Err::<(), _>(new!("root")), "outer").unwrap_err();
    /// let lines: Vec<u32> = err.locations().map(|l| l.line()).collect();
    /// assert_eq!(lines.len(), 2);
    /// assert!(lines.iter().all(|&l| l == lines[0]));
    /// ```
    pub fn locations(&self) -> impl Iterator<Item = &Location> + '_ {
        inspect::causes(self)
            .filter_map(|err| err.downcast_ref::<Chain>())
            .map(Chain::location)
            .filter(|loc| !loc.is_unknown())
    }

    /// Format as the compact one-line form (same as `Display`).
    pub fn compact(&self) -> Compact<'_> {
        render::compact(self)
    }

    /// Format as the detailed multi-line form (same as `Debug`).
    pub fn detailed(&self) -> Detailed<'_> {
        render::detailed(self)
    }

    /// Write the detailed form.
    ///
    /// The cause is prefixed with `caused by ` only when this layer wrote a
    /// line of its own and the cause is not a pure marker, so stacked
    /// location-only frames read as one block. Runs of `Chain` links are
    /// walked in a loop, so depth does not grow the stack.
    pub(crate) fn write_detailed(&self, w: &mut dyn fmt::Write) -> fmt::Result {
        let mut current = self;
        loop {
            let mut sep = "";
            if !current.message.is_empty() {
                w.write_str(&current.message)?;
                sep = "\n";
            }
            if !current.location.is_unknown() {
                write!(w, "{sep} --- at {} ---", current.location)?;
                sep = "\n";
            }
            let Some(cause) = current.cause.as_deref() else {
                return Ok(());
            };
            w.write_str(sep)?;
            let next = cause.downcast_ref::<Chain>();
            if !sep.is_empty() && !next.is_some_and(Chain::is_marker) {
                w.write_str("caused by ")?;
            }
            match next {
                Some(chain) => current = chain,
                None => return render::write_detailed(cause, w),
            }
        }
    }
}

// ============================================================================
// Formatting
// ============================================================================

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        let mut current = self;
        loop {
            let Some(cause) = current.cause.as_deref() else {
                return write!(f, "{sep}{}", current.message);
            };
            if !current.message.is_empty() {
                write!(f, "{sep}{}", current.message)?;
                sep = ": ";
            }
            match cause.downcast_ref::<Chain>() {
                Some(chain) => current = chain,
                None => return write!(f, "{sep}{cause}"),
            }
        }
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_detailed(f)
    }
}

// Nested chains are unlinked one at a time.
impl Drop for Chain {
    fn drop(&mut self) {
        let mut next = self.cause.take();
        while let Some(cause) = next {
            next = match cause.downcast::<Chain>() {
                Ok(mut chain) => chain.cause.take(),
                Err(_) => None,
            };
        }
    }
}

// ============================================================================
// Error impl
// ============================================================================

impl Error for Chain {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_deref().map(|cause| cause as &(dyn Error + 'static))
    }
}

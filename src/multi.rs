//! Combining several errors into one.
//!
//! [`append_into`] accumulates failures into an error slot, [`combine`] folds
//! a collection. Both produce an [`Aggregate`] once more than one error is
//! involved, and never nest one aggregate inside another.

use std::error::Error;
use std::fmt;

use crate::BoxError;
use crate::render::{self, Indented};

#[cfg(not(feature = "smallvec"))]
type ErrorVec = Vec<BoxError>;

#[cfg(feature = "smallvec")]
type ErrorVec = smallvec::SmallVec<[BoxError; 2]>;

// ============================================================================
// Aggregate
// ============================================================================

/// Several errors reported as one.
///
/// `Display` joins the constituents' compact forms with `"; "`. `Debug` lists
/// each constituent's detailed form:
///
/// ```text
/// the following errors occurred:
///  -  flushing output
///      --- at src/report.rs:40 ---
///     caused by disk full
///  -  connection reset
/// ```
///
/// An aggregate always holds at least two errors and has no
/// [`source()`](Error::source); the inspection functions search each
/// constituent in order instead.
pub struct Aggregate {
    errors: ErrorVec,
}

impl Aggregate {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            errors: ErrorVec::with_capacity(capacity),
        }
    }

    /// Append, splicing in the constituents of another aggregate.
    fn push(&mut self, err: BoxError) {
        match err.downcast::<Aggregate>() {
            Ok(nested) => {
                let Aggregate { errors } = *nested;
                self.errors.extend(errors);
            }
            Err(err) => self.errors.push(err),
        }
    }

    /// The constituents, in the order they were added.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &(dyn Error + Send + Sync + 'static)> + '_ {
        self.errors.iter().map(|err| &**err)
    }

    /// Number of constituents.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether there are no constituents, never the case for a built
    /// aggregate.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Take the constituents out.
    pub fn into_errors(self) -> Vec<BoxError> {
        self.errors.into_iter().collect()
    }

    pub(crate) fn write_detailed(&self, w: &mut dyn fmt::Write) -> fmt::Result {
        w.write_str("the following errors occurred:")?;
        for err in self.iter() {
            w.write_str("\n -  ")?;
            render::write_detailed(err, &mut Indented::new(&mut *w, "    "))?;
        }
        Ok(())
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_detailed(f)
    }
}

impl Error for Aggregate {}

// ============================================================================
// Accumulating
// ============================================================================

/// Placeholder error left in a slot while its error is moved out.
#[derive(Debug)]
struct Vacant;

impl fmt::Display for Vacant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("vacant error slot")
    }
}

impl Error for Vacant {}

/// Move the error out of `slot`, leaving a placeholder to be overwritten.
pub(crate) fn take_error(slot: &mut BoxError) -> BoxError {
    std::mem::replace(slot, Box::new(Vacant))
}

/// Append the error of `result`, if any, to the error in `slot`.
///
/// Returns whether `result` was an error. An `Ok` slot takes the error as is;
/// an error already in the slot is kept and combined with the new one.
///
/// ```rust
/// use errchain::{BoxError, append_into};
///
/// fn flush_all() -> Result<(), BoxError> {
///     let mut result = Ok(());
///     append_into(&mut result, Err::<(), _>("first failed"));
///     append_into(&mut result, Ok::<(), BoxError>(()));
///     append_into(&mut result, Err::<(), _>("third failed"));
///     result
/// }
///
/// assert_eq!(flush_all().unwrap_err().to_string(), "first failed; third failed");
/// ```
pub fn append_into<T, E: Into<BoxError>>(slot: &mut Result<T, BoxError>, result: Result<(), E>) -> bool {
    let Err(err) = result else {
        return false;
    };
    let err: BoxError = err.into();
    match slot {
        Err(existing) => {
            if let Some(aggregate) = existing.downcast_mut::<Aggregate>() {
                aggregate.push(err);
            } else {
                let mut aggregate = Aggregate::with_capacity(2);
                aggregate.push(take_error(existing));
                aggregate.push(err);
                *existing = Box::new(aggregate);
            }
        }
        Ok(_) => *slot = Err(err),
    }
    true
}

/// Fold a collection of errors into at most one.
///
/// No errors give `None`, a single error comes back unchanged, and several
/// become an [`Aggregate`].
///
/// ```rust
/// use errchain::{BoxError, combine};
///
/// assert!(combine(Vec::<BoxError>::new()).is_none());
/// assert_eq!(combine(["only"]).unwrap().to_string(), "only");
/// assert_eq!(combine(["a", "b"]).unwrap().to_string(), "a; b");
/// ```
pub fn combine<I>(errors: I) -> Option<BoxError>
where
    I: IntoIterator,
    I::Item: Into<BoxError>,
{
    let errors = errors.into_iter();
    let mut aggregate = Aggregate::with_capacity(errors.size_hint().0);
    for err in errors {
        aggregate.push(err.into());
    }
    match aggregate.len() {
        0 => None,
        1 => aggregate.errors.pop(),
        _ => Some(Box::new(aggregate)),
    }
}

//! Compact and detailed rendering for any error.
//!
//! The crate's own types implement `Display` (compact) and `Debug` (detailed)
//! directly. The adapters here apply the same two forms to an arbitrary
//! `&dyn Error`, which is what a boxed error at the top of a program usually
//! is.

use std::error::Error;
use std::fmt;

use crate::chain::Chain;
use crate::code::Coded;
use crate::multi::Aggregate;

/// Display adapter for the compact one-line form.
///
/// Created by [`compact()`] or [`Chain::compact()`].
pub struct Compact<'a>(&'a (dyn Error + 'static));

impl fmt::Display for Compact<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.0, f)
    }
}

/// Display adapter for the detailed multi-line form.
///
/// Created by [`detailed()`] or [`Chain::detailed()`].
pub struct Detailed<'a>(&'a (dyn Error + 'static));

impl fmt::Display for Detailed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_detailed(self.0, f)
    }
}

/// Render `err` in compact form: messages only, joined with `": "`.
pub fn compact<'a>(err: &'a (dyn Error + 'static)) -> Compact<'a> {
    Compact(err)
}

/// Render `err` in detailed form: messages, locations and `caused by` links.
///
/// Errors from outside this crate render with their `Display` form and end
/// the detailed output. Their own sources and `Debug` output are not
/// rendered, because there is no general way to tell a derived `Debug` dump
/// from a human-readable report. Walk [`causes()`](crate::causes) to reach
/// them.
///
/// ```rust
/// use errchain::{BoxError, new, wrap};
///
/// let err: BoxError = wrap!(Err::<(), _>(new!("disk full")), "saving").unwrap_err().into();
/// let text = errchain::detailed(&*err).to_string();
/// assert!(text.starts_with("saving\n --- at "));
/// assert!(text.contains("caused by disk full\n --- at "));
/// ```
pub fn detailed<'a>(err: &'a (dyn Error + 'static)) -> Detailed<'a> {
    Detailed(err)
}

/// Detailed form of one link. Only the crate's own types have a multi-line
/// form; anything else is a leaf.
pub(crate) fn write_detailed(err: &(dyn Error + 'static), w: &mut dyn fmt::Write) -> fmt::Result {
    if let Some(chain) = err.downcast_ref::<Chain>() {
        chain.write_detailed(w)
    } else if let Some(coded) = err.downcast_ref::<Coded>() {
        write_detailed(coded.base(), w)
    } else if let Some(aggregate) = err.downcast_ref::<Aggregate>() {
        aggregate.write_detailed(w)
    } else {
        write!(w, "{err}")
    }
}

// ============================================================================
// Indented writer
// ============================================================================

/// Writer that indents every line after the first.
pub(crate) struct Indented<'a> {
    inner: &'a mut dyn fmt::Write,
    indent: &'static str,
}

impl<'a> Indented<'a> {
    pub(crate) fn new(inner: &'a mut dyn fmt::Write, indent: &'static str) -> Self {
        Self { inner, indent }
    }
}

impl fmt::Write for Indented<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for (i, line) in s.split('\n').enumerate() {
            if i > 0 {
                self.inner.write_char('\n')?;
                self.inner.write_str(self.indent)?;
            }
            self.inner.write_str(line)?;
        }
        Ok(())
    }
}

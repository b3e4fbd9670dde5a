//! Walking and querying error chains.
//!
//! Every query starts at the given error and follows [`Error::source`]. When
//! the walk meets an [`Aggregate`](crate::Aggregate) it descends into each
//! constituent in order instead, since an aggregate has no single source.

use std::error::Error;
use std::iter::FusedIterator;

use crate::chain::Chain;
use crate::code::Coded;
use crate::multi::Aggregate;

// ============================================================================
// Cause iteration
// ============================================================================

/// Iterator over an error and its sources, outermost first.
///
/// Created by [`causes()`].
#[derive(Clone)]
pub struct Causes<'a> {
    next: Option<&'a (dyn Error + 'static)>,
}

impl<'a> Iterator for Causes<'a> {
    type Item = &'a (dyn Error + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}

impl FusedIterator for Causes<'_> {}

/// Iterate over `err` and every error reachable through `source()`.
///
/// ```rust
/// use errchain::{causes, new, wrap};
///
/// let err = wrap!(Err::<(), _>(new!("root")), "outer").unwrap_err();
/// let messages: Vec<String> = causes(&err).map(|e| e.to_string()).collect();
/// assert_eq!(messages, ["outer: root", "root"]);
/// ```
pub fn causes<'a>(err: &'a (dyn Error + 'static)) -> Causes<'a> {
    Causes { next: Some(err) }
}

// ============================================================================
// Queries
// ============================================================================

/// Visit the chain outermost first, fanning out into aggregates, and return
/// the first hit.
fn search<'a, R>(
    err: &'a (dyn Error + 'static),
    visit: &mut dyn FnMut(&'a (dyn Error + 'static)) -> Option<R>,
) -> Option<R> {
    let mut current = Some(err);
    while let Some(err) = current {
        if let Some(hit) = visit(err) {
            return Some(hit);
        }
        if let Some(aggregate) = err.downcast_ref::<Aggregate>() {
            return aggregate.iter().find_map(|inner| search(inner, &mut *visit));
        }
        current = err.source();
    }
    None
}

/// Find the outermost error of type `T` in the chain.
///
/// ```rust
/// use errchain::{find, wrap};
///
/// let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
/// let err = wrap!(Err::<(), _>(io), "opening settings").unwrap_err();
///
/// let found = find::<std::io::Error>(&err).expect("io error in chain");
/// assert_eq!(found.kind(), std::io::ErrorKind::NotFound);
/// ```
pub fn find<'a, T: Error + 'static>(err: &'a (dyn Error + 'static)) -> Option<&'a T> {
    search(err, &mut |e: &'a (dyn Error + 'static)| e.downcast_ref::<T>())
}

/// Whether an error equal to `target` occurs anywhere in the chain.
pub fn is<T: Error + PartialEq + 'static>(err: &(dyn Error + 'static), target: &T) -> bool {
    search(err, &mut |e| e.downcast_ref::<T>().filter(|e| *e == target).map(|_| ())).is_some()
}

/// The innermost [`Chain`] reachable from `err`, `err` itself included.
///
/// Useful to get at the location where an error entered the chain, past every
/// layer of added context.
pub fn root_error<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a Chain> {
    causes(err).filter_map(|e| e.downcast_ref::<Chain>()).last()
}

/// The code of the outermost [`Coded`] in the chain, or 0 without one.
///
/// An explicit code of 0 reads the same as no code.
pub fn code(err: &(dyn Error + 'static)) -> i64 {
    find::<Coded>(err).map_or(0, Coded::code)
}

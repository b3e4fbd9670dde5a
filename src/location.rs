//! Captured call-site locations.
//!
//! A [`Location`] is the (file, line, function) triple recorded when an error is
//! created or wrapped. Two capture paths exist:
//!
//! - [`location!()`](crate::location!) expands at the invoking site and also
//!   records the enclosing function.
//! - [`Location::caller()`] relies on `#[track_caller]` and records file and
//!   line only.

use std::borrow::Cow;
use std::fmt;

use crate::config;

/// A call-site location: sanitized file, line and cleaned function name.
///
/// [`Location::UNKNOWN`] (also `Location::default()`) stands for "no location"
/// and never equals a real capture.
///
/// ```rust
/// use errchain::{location, Location};
///
/// fn load() -> Location {
///     location!()
/// }
///
/// let loc = load();
/// assert_eq!(loc.function(), "load");
/// assert!(loc.line() > 0);
/// assert!(!loc.is_unknown());
/// assert!(Location::default().is_unknown());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Location {
    file: Cow<'static, str>,
    line: u32,
    function: Cow<'static, str>,
}

impl Location {
    /// The "no location" sentinel.
    pub const UNKNOWN: Location = Location {
        file: Cow::Borrowed(""),
        line: 0,
        function: Cow::Borrowed(""),
    };

    /// Build a location from raw call-site parts.
    ///
    /// The file name goes through the active file-name sanitizer and the
    /// function path is reduced to its `Type::method` / `function` form.
    /// Usually reached through [`location!()`](crate::location!).
    pub fn new(file: &'static str, line: u32, function: &'static str) -> Self {
        Self {
            file: config::clean_file_name(file),
            line,
            function: clean_function_name(function),
        }
    }

    /// The location of the caller, resolved through `#[track_caller]`.
    ///
    /// The function name is not available on this path and stays empty.
    #[track_caller]
    #[inline]
    pub fn caller() -> Self {
        Self::from_panic_location(core::panic::Location::caller())
    }

    pub(crate) fn from_panic_location(loc: &'static core::panic::Location<'static>) -> Self {
        Self {
            file: config::clean_file_name(loc.file()),
            line: loc.line(),
            function: Cow::Borrowed(""),
        }
    }

    /// Sanitized file name.
    #[inline]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Line number, 0 for [`Location::UNKNOWN`].
    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Cleaned function name, empty when unknown.
    #[inline]
    pub fn function(&self) -> &str {
        &self.function
    }

    /// Whether this is the [`Location::UNKNOWN`] sentinel.
    #[inline]
    pub fn is_unknown(&self) -> bool {
        *self == Self::UNKNOWN
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.function.is_empty() {
            write!(f, "{}:{}", self.file, self.line)
        } else {
            write!(f, "{}:{} ({})", self.file, self.line, self.function)
        }
    }
}

// ============================================================================
// Function name cleaning
// ============================================================================

const CLOSURE: &str = "{{closure}}";

/// Reduce a fully-qualified function path to its short form.
///
/// ```text
/// app::config::load                      --> load
/// app::db::Pool::connect                 --> Pool::connect
/// <app::db::Pool as app::Open>::open     --> Pool::open
/// app::run::{{closure}}                  --> run::{{closure}}
/// ```
pub(crate) fn clean_function_name(long: &'static str) -> Cow<'static, str> {
    let segments = split_path(long);
    let closures = segments.iter().rev().take_while(|s| **s == CLOSURE).count();
    let named = &segments[..segments.len() - closures];
    if named.is_empty() {
        return Cow::Borrowed(long);
    }

    // `<Type as Trait>::method`: keep the self type's last segment.
    if let Some(qualified) = named[0].strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
        let self_ty = qualified.split(" as ").next().unwrap_or(qualified);
        let self_ty = self_ty.trim_start_matches('&').trim_start_matches("mut ");
        let receiver = split_path(self_ty).last().copied().unwrap_or(self_ty);
        let mut out = String::from(receiver);
        for segment in &segments[1..] {
            out.push_str("::");
            out.push_str(segment);
        }
        return Cow::Owned(out);
    }

    let start = named[..named.len() - 1]
        .iter()
        .rposition(|s| s.starts_with(|c: char| c.is_ascii_uppercase()))
        .unwrap_or(named.len() - 1);

    // Segments are contiguous and `::`-separated, so the short form is a suffix.
    let offset: usize = segments[..start].iter().map(|s| s.len() + 2).sum();
    Cow::Borrowed(&long[offset..])
}

/// Split a path at top-level `::`, keeping `<...>` groups intact.
pub(crate) fn split_path(path: &str) -> Vec<&str> {
    let bytes = path.as_bytes();
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            // `->` in a fn pointer type does not close a group.
            b'>' if i > 0 && bytes[i - 1] == b'-' => {}
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                segments.push(&path[start..i]);
                i += 2;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    segments.push(&path[start..]);
    segments
}

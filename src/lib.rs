//! # errchain - Error chains that remember where they happened
//!
//! Every time an error is created or wrapped, errchain records the call site.
//! The result is a chain of messages and locations that prints as one terse
//! line for users and as a full provenance trail for developers:
//!
//! ```text
//! initializing system: loading config: file missing          <- {}
//!
//! initializing system                                          <- {:?}
//!  --- at src/main.rs:12 (init) ---
//! caused by loading config
//!  --- at src/config.rs:30 (Config::load) ---
//! caused by file missing
//!  --- at src/config.rs:41 (Config::read) ---
//! ```
//!
//! ## Try It Now
//!
//! ```rust
//! use errchain::{Chain, new, wrap};
//!
//! fn read() -> Result<String, Chain> {
//!     Err(new!("file missing"))
//! }
//!
//! fn load() -> Result<String, Chain> {
//!     wrap!(read(), "loading config")
//! }
//!
//! let err = load().unwrap_err();
//! assert_eq!(err.to_string(), "loading config: file missing");
//! assert_eq!(err.location().function(), "load");
//! println!("{err:?}"); // messages, locations and causes
//! ```
//!
//! ## Building a Chain
//!
//! | Operation | Macro (records the function) | Function / method (`#[track_caller]`) |
//! |-----------|------------------------------|----------------------------------------|
//! | New root error | [`new!("fmt", ..)`](new!) | [`new(msg)`](new()), [`Chain::new`] |
//! | Wrap with context | [`wrap!(res, "fmt", ..)`](wrap!) | [`wrap(res, msg)`](wrap()), [`ResultExt::wrap`] |
//! | Record location only | [`annotate!(res)`](annotate!) | [`annotate(res)`](annotate()), [`ResultExt::annotate`] |
//! | Wrap an error slot in place | [`wrap_into!(&mut res, "fmt", ..)`](wrap_into!) | [`wrap_into(&mut res, msg)`](wrap_into()) |
//! | New error with a code | [`new_with_code!(code, "fmt", ..)`](new_with_code!) | [`new_with_code(code, msg)`](new_with_code()), [`Coded::new`] |
//! | Wrap with a code | [`wrap_with_code!(res, code, "fmt", ..)`](wrap_with_code!) | [`wrap_with_code(res, code, msg)`](wrap_with_code()), [`ResultExt::wrap_with_code`] |
//!
//! The wrapping operations take any [`Wrappable`]: a `Result<T, E>` or an
//! `Option<E>` with `E: Into<BoxError>`. `Ok` and `None` pass through without
//! formatting the message or capturing a location.
//!
//! Macros expand at the call site and also record the enclosing function.
//! The functions rely on `#[track_caller]` and record file and line only.
//!
//! ## Reading a Chain
//!
//! | Function | Returns |
//! |----------|---------|
//! | [`causes(err)`](causes) | `err` and everything reachable through `source()` |
//! | [`find::<T>(err)`](find) | the outermost `T` in the chain |
//! | [`is(err, &SENTINEL)`](is) | whether an equal `T` occurs in the chain |
//! | [`root_error(err)`](root_error) | the innermost [`Chain`], where the error entered |
//! | [`code(err)`](code()) | the outermost [`Coded`] code, or 0 |
//!
//! ## Rendering
//!
//! `Display` is compact: messages joined with `": "`, no locations. `Debug`
//! is detailed: one block per layer with its location and a `caused by` link.
//! [`compact()`] and [`detailed()`] apply the same forms to any `&dyn Error`.
//!
//! ## Several Errors at Once
//!
//! [`append_into`] and [`combine`] merge errors into an [`Aggregate`]. The
//! closing helpers in [`close_and_append_on_error`] and
//! [`close_and_log_on_error`] build on them so that a failed close is never
//! silently dropped.
//!
//! ## Configuration
//!
//! Captured file names pass through a sanitizer installed with
//! [`CaptureConfig`]; by default they are kept as the compiler reports them.

#![deny(unsafe_code)]

mod chain;
mod close;
mod code;
mod config;
mod constant;
mod ext;
mod inspect;
mod location;
mod multi;
pub mod prelude;
mod render;

use std::borrow::Cow;

pub use chain::Chain;
pub use close::{Close, close_and_append_on_error, close_and_log_on_error, close_and_trace_on_error};
pub use code::Coded;
pub use config::{CaptureConfig, CaptureConfigBuilder, CleanFileNameFn, InstalledConfig};
pub use constant::Const;
pub use ext::{ResultExt, Wrappable};
pub use inspect::{Causes, causes, code, find, is, root_error};
pub use location::Location;
pub use multi::{Aggregate, append_into, combine};
pub use render::{Compact, Detailed, compact, detailed};

/// Owned, thread-safe, type-erased error: the currency for causes and error
/// slots.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ============================================================================
// Macro support
// ============================================================================

#[doc(hidden)]
pub mod __private {
    use std::borrow::Cow;
    use std::fmt;

    use crate::BoxError;
    use crate::chain::Chain;
    use crate::location::Location;
    use crate::multi::take_error;

    /// Type name of the value's type.
    pub fn type_name_of<T>(_: T) -> &'static str {
        core::any::type_name::<T>()
    }

    /// Path of the function enclosing a `__errchain_here` marker item.
    pub fn function_name(marker: &'static str) -> &'static str {
        marker.strip_suffix("::__errchain_here").unwrap_or(marker)
    }

    /// Literal-only arguments stay borrowed.
    pub fn message(args: fmt::Arguments<'_>) -> Cow<'static, str> {
        match args.as_str() {
            Some(s) => Cow::Borrowed(s),
            None => Cow::Owned(fmt::format(args)),
        }
    }

    pub fn wrap_into_at<T, M: Into<Cow<'static, str>>>(
        slot: &mut Result<T, BoxError>,
        location: impl FnOnce() -> Location,
        message: impl FnOnce() -> M,
    ) {
        if let Err(err) = slot {
            let cause = take_error(err);
            *err = Box::new(Chain::from_parts(Some(cause), location(), message()));
        }
    }
}

/// Path of the enclosing function, resolved at compile time.
#[doc(hidden)]
#[macro_export]
macro_rules! __function_name {
    () => {{
        fn __errchain_here() {}
        $crate::__private::function_name($crate::__private::type_name_of(__errchain_here))
    }};
}

/// A location-producing closure for the invoking site. The function name is
/// resolved outside the closure so it names the caller, not the closure.
#[doc(hidden)]
#[macro_export]
macro_rules! __lazy_location {
    () => {{
        let function = $crate::__function_name!();
        move || $crate::Location::new(::core::file!(), ::core::line!(), function)
    }};
}

// ============================================================================
// Public macros
// ============================================================================

/// Capture the current [`Location`]: file, line and enclosing function.
///
/// ```rust
/// fn connect() -> errchain::Location {
///     errchain::location!()
/// }
///
/// let loc = connect();
/// assert_eq!(loc.function(), "connect");
/// assert_eq!(loc.line(), line!() - 5);
/// ```
#[macro_export]
macro_rules! location {
    () => {
        $crate::Location::new(::core::file!(), ::core::line!(), $crate::__function_name!())
    };
}

/// Create a root [`Chain`] with a formatted message.
///
/// ```rust
/// use errchain::new;
///
/// let port = 8080;
/// let err = new!("port {port} already in use");
/// assert_eq!(err.to_string(), "port 8080 already in use");
/// assert!(err.is_root());
/// ```
#[macro_export]
macro_rules! new {
    ($($arg:tt)+) => {
        $crate::Chain::from_parts(
            ::core::option::Option::None,
            $crate::location!(),
            $crate::__private::message(::core::format_args!($($arg)+)),
        )
    };
}

/// Wrap the error of a [`Wrappable`] with a formatted message.
///
/// `Ok`/`None` pass through and the arguments are not formatted. An empty
/// message makes a pure marker, like [`annotate!`].
///
/// ```rust
/// use errchain::{Chain, wrap};
///
/// fn parse(input: &str) -> Result<u16, Chain> {
///     wrap!(input.parse::<u16>(), "parsing port {input:?}")
/// }
///
/// assert_eq!(parse("80").unwrap(), 80);
/// assert_eq!(
///     parse("eighty").unwrap_err().to_string(),
///     "parsing port \"eighty\": invalid digit found in string"
/// );
/// ```
#[macro_export]
macro_rules! wrap {
    ($err:expr, $($arg:tt)+) => {
        $crate::Wrappable::wrap_at(
            $err,
            $crate::__lazy_location!(),
            || $crate::__private::message(::core::format_args!($($arg)+)),
        )
    };
}

/// Record the current location on the error of a [`Wrappable`], without a
/// message.
///
/// The compact form is unchanged; the detailed form gains a location line.
///
/// ```rust
/// use errchain::{annotate, new};
///
/// let err = annotate!(Err::<(), _>(new!("timeout"))).unwrap_err();
/// assert_eq!(err.to_string(), "timeout");
/// assert!(err.is_marker());
/// ```
#[macro_export]
macro_rules! annotate {
    ($err:expr $(,)?) => {
        $crate::Wrappable::wrap_at($err, $crate::__lazy_location!(), || "")
    };
}

/// Wrap the error held in a `&mut Result<T, BoxError>` slot in place.
///
/// Does nothing on `Ok`. Call it right before returning the slot.
///
/// ```rust
/// use errchain::{BoxError, wrap_into};
///
/// fn sync() -> Result<(), BoxError> {
///     let mut result: Result<(), BoxError> = Err("link down".into());
///     wrap_into!(&mut result, "syncing {} peers", 3);
///     result
/// }
///
/// assert_eq!(sync().unwrap_err().to_string(), "syncing 3 peers: link down");
/// ```
#[macro_export]
macro_rules! wrap_into {
    ($slot:expr, $($arg:tt)+) => {
        $crate::__private::wrap_into_at(
            $slot,
            $crate::__lazy_location!(),
            || $crate::__private::message(::core::format_args!($($arg)+)),
        )
    };
}

/// Create a root [`Chain`] tagged with a code.
///
/// ```rust
/// use errchain::{code, new_with_code};
///
/// let err = new_with_code!(404, "no user {}", 7);
/// assert_eq!(err.to_string(), "no user 7");
/// assert_eq!(code(&err), 404);
/// ```
#[macro_export]
macro_rules! new_with_code {
    ($code:expr, $($arg:tt)+) => {
        $crate::Coded::from_parts($crate::new!($($arg)+), $code)
    };
}

/// Wrap the error of a [`Wrappable`] with a formatted message and tag it with
/// a code.
///
/// A code attached further out shadows this one.
#[macro_export]
macro_rules! wrap_with_code {
    ($err:expr, $code:expr, $($arg:tt)+) => {
        $crate::Wrappable::wrap_with_code_at(
            $err,
            $crate::__lazy_location!(),
            $code,
            || $crate::__private::message(::core::format_args!($($arg)+)),
        )
    };
}

// ============================================================================
// Functions
// ============================================================================

/// Create a root [`Chain`] at the caller's location.
///
/// Same as [`Chain::new`]; use [`new!()`](new!) to format the message and
/// record the function.
#[track_caller]
#[inline]
pub fn new(message: impl Into<Cow<'static, str>>) -> Chain {
    Chain::new(message)
}

/// Wrap the error of a [`Wrappable`] at the caller's location.
///
/// ```rust
/// use errchain::{BoxError, wrap};
///
/// fn connect() -> Result<(), BoxError> {
///     Err("refused".into())
/// }
///
/// let err = wrap(connect(), "connecting to db").unwrap_err();
/// assert_eq!(err.to_string(), "connecting to db: refused");
/// assert_eq!(err.location().line(), line!() - 2);
/// ```
#[track_caller]
#[inline]
pub fn wrap<W: Wrappable>(err: W, message: impl Into<Cow<'static, str>>) -> W::Wrapped {
    let caller = core::panic::Location::caller();
    err.wrap_at(|| Location::from_panic_location(caller), || message)
}

/// Record the caller's location on the error of a [`Wrappable`].
#[track_caller]
#[inline]
pub fn annotate<W: Wrappable>(err: W) -> W::Wrapped {
    let caller = core::panic::Location::caller();
    err.wrap_at(|| Location::from_panic_location(caller), || "")
}

/// Wrap the error held in `slot` in place, at the caller's location.
#[track_caller]
#[inline]
pub fn wrap_into<T>(slot: &mut Result<T, BoxError>, message: impl Into<Cow<'static, str>>) {
    let caller = core::panic::Location::caller();
    __private::wrap_into_at(slot, || Location::from_panic_location(caller), || message);
}

/// Create a root [`Chain`] at the caller's location, tagged with `code`.
#[track_caller]
#[inline]
pub fn new_with_code(code: i64, message: impl Into<Cow<'static, str>>) -> Coded {
    Coded::new(code, message)
}

/// Wrap the error of a [`Wrappable`] at the caller's location and tag it
/// with `code`.
#[track_caller]
#[inline]
pub fn wrap_with_code<W: Wrappable>(
    err: W,
    code: i64,
    message: impl Into<Cow<'static, str>>,
) -> W::WrappedWithCode {
    let caller = core::panic::Location::caller();
    err.wrap_with_code_at(|| Location::from_panic_location(caller), code, || message)
}

//! Closing resources without losing their errors.
//!
//! A close failure often matters as much as the failure that led to the
//! close: a buffered writer that cannot flush has lost data. These helpers
//! record it next to whatever error is already on its way out.

use std::borrow::Cow;
use std::error::Error;
use std::io::{BufWriter, Write};

use crate::BoxError;
use crate::chain::Chain;
use crate::location::Location;
use crate::multi::append_into;

/// A resource with a fallible close.
pub trait Close {
    /// Release the resource.
    fn close(&mut self) -> Result<(), BoxError>;
}

/// Closing a `BufWriter` flushes it, the step that reports lost bytes.
impl<W: Write> Close for BufWriter<W> {
    fn close(&mut self) -> Result<(), BoxError> {
        Ok(self.flush()?)
    }
}

/// Close `closer` and, on failure, append the wrapped close error to `slot`.
///
/// The close error is wrapped with `message` at the caller's location. An
/// error already in `slot` is kept.
///
/// ```rust
/// use std::io::{self, BufWriter, Write};
/// use errchain::{BoxError, close_and_append_on_error};
///
/// struct Full;
///
/// impl Write for Full {
///     fn write(&mut self, _: &[u8]) -> io::Result<usize> {
///         Err(io::Error::other("disk full"))
///     }
///     fn flush(&mut self) -> io::Result<()> {
///         Ok(())
///     }
/// }
///
/// fn save() -> Result<(), BoxError> {
///     let mut out = BufWriter::new(Full);
///     let mut result = out.write_all(b"report").map_err(BoxError::from);
///     close_and_append_on_error(&mut result, &mut out, "flushing report");
///     result
/// }
///
/// assert_eq!(save().unwrap_err().to_string(), "flushing report: disk full");
/// ```
#[track_caller]
pub fn close_and_append_on_error<T, C>(
    slot: &mut Result<T, BoxError>,
    closer: &mut C,
    message: impl Into<Cow<'static, str>>,
) where
    C: Close + ?Sized,
{
    let caller = core::panic::Location::caller();
    let result = closer.close().map_err(|err| {
        Chain::from_parts(Some(err), Location::from_panic_location(caller), message)
    });
    append_into(slot, result);
}

/// Close every resource in order, then call `log` once with the combined
/// failures, if any.
///
/// Every close is attempted even after one has failed.
pub fn close_and_log_on_error<F>(log: F, closers: &mut [&mut dyn Close])
where
    F: FnOnce(&(dyn Error + Send + Sync + 'static)),
{
    let mut result: Result<(), BoxError> = Ok(());
    for closer in closers.iter_mut() {
        append_into(&mut result, closer.close());
    }
    if let Err(err) = result {
        log(&*err);
    }
}

/// [`close_and_log_on_error`] reporting through `tracing` at error level.
pub fn close_and_trace_on_error(closers: &mut [&mut dyn Close]) {
    let count = closers.len();
    close_and_log_on_error(
        |err| {
            tracing::error!(
                closers = count,
                error = %err,
                detail = %crate::render::detailed(err),
                "failed to close resources"
            );
        },
        closers,
    );
}

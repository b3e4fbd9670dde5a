//! Tests for the closing helpers.

use std::error::Error;
use std::io::{self, BufWriter, Write};

use errchain::{
    Aggregate, BoxError, Chain, Close, close_and_append_on_error, close_and_log_on_error, close_and_trace_on_error,
};

/// A resource whose close fails with a fixed message, or succeeds.
struct TestCloser {
    failure: Option<&'static str>,
    closed: bool,
}

impl TestCloser {
    fn ok() -> Self {
        Self { failure: None, closed: false }
    }

    fn failing(message: &'static str) -> Self {
        Self {
            failure: Some(message),
            closed: false,
        }
    }
}

impl Close for TestCloser {
    fn close(&mut self) -> Result<(), BoxError> {
        self.closed = true;
        match self.failure {
            Some(message) => Err(message.into()),
            None => Ok(()),
        }
    }
}

/// Sink that rejects every write.
struct FullDisk;

impl Write for FullDisk {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::StorageFull, "no space left"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ============================================================================
// close_and_append_on_error
// ============================================================================

#[test]
fn append_on_error_wraps_close_failure() {
    let mut closer = TestCloser::failing("badness");
    let mut result: Result<(), BoxError> = Ok(());
    close_and_append_on_error(&mut result, &mut closer, "closing file");
    let line = line!() - 1;

    assert!(closer.closed);
    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "closing file: badness");

    let chain = err.downcast_ref::<Chain>().expect("chain");
    assert_eq!(chain.location().line(), line);
    assert_eq!(chain.location().file(), file!());
}

#[test]
fn append_on_error_keeps_existing_error() {
    let mut closer = TestCloser::failing("flush failed");
    let mut result: Result<u32, BoxError> = Err("write failed".into());
    close_and_append_on_error(&mut result, &mut closer, "closing");

    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "write failed; closing: flush failed");
    assert_eq!(err.downcast_ref::<Aggregate>().map(Aggregate::len), Some(2));
}

#[test]
fn append_on_success_is_noop() {
    let mut closer = TestCloser::ok();
    let mut result: Result<u32, BoxError> = Ok(5);
    close_and_append_on_error(&mut result, &mut closer, "closing");
    assert!(closer.closed);
    assert_eq!(result.ok(), Some(5));
}

#[test]
fn bufwriter_close_reports_lost_bytes() {
    let mut writer = BufWriter::new(FullDisk);
    let mut result: Result<(), BoxError> = writer.write_all(b"buffered").map_err(Into::into);
    assert!(result.is_ok(), "the write only fills the buffer");

    close_and_append_on_error(&mut result, &mut writer, "flushing output");
    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "flushing output: no space left");

    let io_err = errchain::find::<io::Error>(&*err).expect("io error");
    assert_eq!(io_err.kind(), io::ErrorKind::StorageFull);
}

// ============================================================================
// close_and_log_on_error
// ============================================================================

#[test]
fn log_on_error_aggregates_all_failures() {
    let mut a = TestCloser::failing("badness");
    let mut b = TestCloser::ok();
    let mut c = TestCloser::failing("badness2");

    let mut logged = Vec::new();
    close_and_log_on_error(|err| logged.push(err.to_string()), &mut [&mut a, &mut b, &mut c]);

    assert!(a.closed && b.closed && c.closed, "every closer runs");
    assert_eq!(logged.len(), 1);
    assert!(logged[0].contains("badness"), "Got: {}", logged[0]);
    assert!(logged[0].contains("badness2"), "Got: {}", logged[0]);
    assert_eq!(logged[0], "badness; badness2");
}

#[test]
fn log_on_error_single_failure_is_unwrapped() {
    let mut a = TestCloser::ok();
    let mut b = TestCloser::failing("only one");

    let mut seen: Option<(String, bool)> = None;
    close_and_log_on_error(
        |err: &(dyn Error + Send + Sync + 'static)| seen = Some((err.to_string(), err.is::<Aggregate>())),
        &mut [&mut a, &mut b],
    );

    assert_eq!(seen, Some(("only one".to_string(), false)));
}

#[test]
fn log_on_error_silent_when_all_succeed() {
    let mut a = TestCloser::ok();
    let mut b = TestCloser::ok();

    let mut calls = 0;
    close_and_log_on_error(|_| calls += 1, &mut [&mut a, &mut b]);
    assert_eq!(calls, 0);
}

#[test]
fn log_on_error_detailed_aggregate() {
    let mut a = TestCloser::failing("first");
    let mut b = TestCloser::failing("second");

    let mut detailed = String::new();
    close_and_log_on_error(|err| detailed = format!("{:?}", err), &mut [&mut a, &mut b]);
    assert_eq!(detailed, "the following errors occurred:\n -  first\n -  second");
}

#[test]
fn trace_on_error_closes_everything() {
    let mut a = TestCloser::failing("traced");
    let mut b = TestCloser::ok();
    close_and_trace_on_error(&mut [&mut a, &mut b]);
    assert!(a.closed && b.closed);
}

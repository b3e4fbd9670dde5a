//! Integration tests for compact and detailed output.

use errchain::{BoxError, Chain, ResultExt, annotate, compact, detailed, new, new_with_code, wrap, wrap_with_code};

#[derive(Debug)]
enum TestError {
    NotFound,
    InvalidInput(String),
}

impl core::fmt::Display for TestError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TestError::NotFound => write!(f, "not found"),
            TestError::InvalidInput(s) => write!(f, "invalid input: {}", s),
        }
    }
}

impl std::error::Error for TestError {}

fn load_config() -> Result<(), Chain> {
    Err(new!("file missing"))
}

fn init() -> Result<(), Chain> {
    wrap!(load_config(), "initializing {}", "system")
}

// ============================================================================
// Compact output
// ============================================================================

#[test]
fn compact_output_joins_messages() {
    let err = init().unwrap_err();
    assert_eq!(err.to_string(), "initializing system: file missing");
    assert_eq!(format!("{:#}", err), "initializing system: file missing");
    assert_eq!(err.compact().to_string(), err.to_string());
}

#[test]
fn compact_output_has_no_locations() {
    let err = init().unwrap_err();
    let output = err.to_string();
    assert!(
        !output.contains("output_format.rs"),
        "Display should not mention files. Got:\n{}",
        output
    );
}

#[test]
fn compact_output_of_foreign_leaf() {
    let err = wrap!(Err::<(), _>(TestError::InvalidInput("x".into())), "validating").unwrap_err();
    assert_eq!(err.to_string(), "validating: invalid input: x");
}

// ============================================================================
// Detailed output
// ============================================================================

#[test]
fn detailed_output_exact() {
    let err = init().unwrap_err();
    let output = format!("{:?}", err);

    let expected = format!(
        "initializing system\n --- at {file}:{outer} (init) ---\ncaused by file missing\n --- at {file}:{inner} (load_config) ---",
        file = file!(),
        outer = err.location().line(),
        inner = errchain::root_error(&err).unwrap().location().line(),
    );
    assert_eq!(output, expected);
}

#[test]
fn detailed_output_has_one_caused_by_per_link() {
    fn level3() -> Result<(), Chain> {
        Err(new!("level 3"))
    }
    fn level2() -> Result<(), Chain> {
        wrap!(level3(), "level 2")
    }
    fn level1() -> Result<(), Chain> {
        wrap!(level2(), "level 1")
    }

    let output = format!("{:?}", level1().unwrap_err());
    assert_eq!(
        output.matches("caused by ").count(),
        2,
        "Expected two links. Got:\n{}",
        output
    );
    assert_eq!(output.matches(" --- at ").count(), 3, "Got:\n{}", output);
    assert!(output.contains("(level1) ---"), "Got:\n{}", output);
    assert!(output.contains("(level2) ---"), "Got:\n{}", output);
    assert!(output.contains("(level3) ---"), "Got:\n{}", output);
}

#[test]
fn detailed_output_annotations_stack() {
    fn source() -> Result<(), Chain> {
        Err(new!("timeout"))
    }
    fn relay() -> Result<(), Chain> {
        annotate!(source())
    }
    fn forward() -> Result<(), Chain> {
        annotate!(relay())
    }
    fn handle() -> Result<(), Chain> {
        wrap!(forward(), "handling request")
    }

    let err = handle().unwrap_err();
    assert_eq!(err.to_string(), "handling request: timeout");

    let output = format!("{:?}", err);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 6, "Got:\n{}", output);
    assert_eq!(lines[0], "handling request");
    assert!(lines[1].ends_with("(handle) ---"), "Got:\n{}", output);
    assert!(lines[2].starts_with(" --- at ") && lines[2].ends_with("(forward) ---"), "Got:\n{}", output);
    assert!(lines[3].starts_with(" --- at ") && lines[3].ends_with("(relay) ---"), "Got:\n{}", output);
    assert_eq!(lines[4], "caused by timeout");
    assert!(lines[5].ends_with("(source) ---"), "Got:\n{}", output);
}

#[test]
fn detailed_output_marker_over_foreign_error() {
    let err = annotate!(Err::<(), _>(TestError::NotFound)).unwrap_err();
    let output = format!("{:?}", err);
    let line = err.location().line();
    assert_eq!(
        output,
        format!(" --- at {}:{} (detailed_output_marker_over_foreign_error) ---\ncaused by not found", file!(), line)
    );
}

#[test]
fn detailed_output_through_box() {
    let boxed: BoxError = init().unwrap_err().into();
    assert_eq!(format!("{:?}", boxed), detailed(&*boxed).to_string());
    assert_eq!(compact(&*boxed).to_string(), "initializing system: file missing");
}

#[test]
fn detailed_adapter_on_foreign_error_uses_display() {
    let err = TestError::InvalidInput("y".into());
    assert_eq!(detailed(&err).to_string(), "invalid input: y");
}

#[test]
fn track_caller_locations_have_no_function() {
    let result: Result<(), TestError> = Err(TestError::NotFound);
    let err = result.wrap("reading").unwrap_err();
    let output = format!("{:?}", err);
    assert_eq!(
        output,
        format!("reading\n --- at {}:{} ---\ncaused by not found", file!(), line!() - 4)
    );
}

// ============================================================================
// Codes in output
// ============================================================================

#[test]
fn coded_error_output_is_the_base() {
    let err = wrap!(Err::<(), _>(new_with_code!(123, "loading config")), "initializing system").unwrap_err();
    assert_eq!(err.to_string(), "initializing system: loading config");
    assert_eq!(errchain::code(&err), 123);

    let output = format!("{:?}", err);
    assert!(output.contains("caused by loading config\n --- at "), "Got:\n{}", output);
}

#[test]
fn wrap_with_code_output() {
    let err = wrap_with_code!(Err::<(), _>(TestError::NotFound), 404, "fetching {}", "user").unwrap_err();
    assert_eq!(err.to_string(), "fetching user: not found");
    assert_eq!(err.code(), 404);
    let output = format!("{:?}", err);
    assert!(
        output.starts_with("fetching user\n --- at "),
        "Got:\n{}",
        output
    );
    assert!(output.ends_with("(wrap_with_code_output) ---\ncaused by not found"), "Got:\n{}", output);
}

#[test]
fn function_forms_match_macro_output_shape() {
    let err = wrap(Err::<(), _>(TestError::NotFound), "via function").unwrap_err();
    let output = format!("{:?}", err);
    assert_eq!(
        output,
        format!("via function\n --- at {}:{} ---\ncaused by not found", file!(), line!() - 4)
    );
}

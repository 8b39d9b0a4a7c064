// Unit tests for logger module initialization logic
// Tests focus on thread-safety and error handling

use crate::logger::{build_dispatch, initialize};

use std::path::PathBuf;

use tempfile::TempDir;

/// **VALUE**: Verifies that calling initialize() multiple times doesn't panic or fail.
///
/// **WHY THIS MATTERS**: Library consumers and tests may both try to set up logging. If the
/// second call errors, it would abort the command before any request is made.
///
/// **BUG THIS CATCHES**: Would catch if the Once or AtomicBool guards are removed,
/// causing fern to fail when trying to set a global logger twice.
#[test]
fn given_logger_initialized_when_called_again_then_returns_ok() {
    // GIVEN: A valid temporary directory
    let temp_dir = TempDir::new().unwrap();

    // WHEN: Calling initialize twice
    let result1 = initialize(temp_dir.path());
    let result2 = initialize(temp_dir.path());

    // THEN: Both should return Ok (second one logs warning but doesn't error)
    assert!(result1.is_ok(), "First initialization should succeed");
    assert!(
        result2.is_ok(),
        "Second initialization should succeed (idempotent)"
    );
}

/// **VALUE**: Verifies that an unusable log directory produces an error instead of a panic.
///
/// **BUG THIS CATCHES**: Would catch if `fern::log_file()` is unwrapped.
#[test]
fn given_invalid_log_dir_when_dispatch_built_then_returns_error() {
    // GIVEN: A path that cannot contain files
    let invalid_dir = PathBuf::from("/dev/null/invalid-path");

    // WHEN: Building the dispatch
    let result = build_dispatch(&invalid_dir);

    // THEN: Should return the app error variant
    let Err(err) = result else {
        panic!("Should return error for invalid log directory");
    };
    assert!(
        format!("{err:?}").contains("Opendsm"),
        "Error should be OpendsmError::Opendsm variant"
    );
}

#[test]
fn given_valid_log_dir_when_dispatch_built_then_creates_log_file() {
    let temp_dir = TempDir::new().unwrap();

    let result = build_dispatch(temp_dir.path());

    assert!(result.is_ok());
    assert!(temp_dir.path().join("opendsm.log").exists());
}

#![allow(dead_code)]

use std::panic::{self, AssertUnwindSafe};

use scratch_tester::TestDirectory;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

pub const TEST_DATA_FILE: &str = "tests/data/test.txt";
pub const TEST_CHILD_DIRECTORY_NAME: &str = "child-directory";
pub const TEST_FILE_NAME: &str = "test.txt";

/// Sends log output through the test harness; `RUST_LOG=debug` shows the lifecycle steps.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Runs an assertion that is expected to fail and returns its panic message.
pub fn panic_message<F: FnOnce()>(assertion: F) -> String {
    let payload = panic::catch_unwind(AssertUnwindSafe(assertion))
        .expect_err("assertion should have failed");

    if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else {
        String::from("<non-string panic payload>")
    }
}

/// An initialized test directory below a fresh temporary root.
pub fn initialized_test_directory() -> (TempDir, TestDirectory) {
    init_tracing();
    let root = tempfile::tempdir().expect("temporary root");
    let test_directory =
        TestDirectory::unique_in(root.path(), "test-files").expect("test directory");
    test_directory.initialize().expect("initialized test directory");
    (root, test_directory)
}

//! Assertions about a single file.
use std::path::Path;

use super::{require_argument, FILE_NAME_ARGUMENT_MESSAGE};

/// Asserts that `file` exists and refers to a file.
///
/// ```rust
/// # use scratch_tester::asserts::assert_file_exists;
/// assert_file_exists("Cargo.toml");
/// ```
#[track_caller]
pub fn assert_file_exists<P: AsRef<Path>>(file: P) {
    let file = file.as_ref();
    require_argument(file, FILE_NAME_ARGUMENT_MESSAGE);

    assert!(file.exists(), "File {} does not exist", file.display());
    assert!(file.is_file(), "{} does not refer to a file", file.display());
}

/// Asserts that nothing exists at `file`.
#[track_caller]
pub fn assert_file_not_exists<P: AsRef<Path>>(file: P) {
    let file = file.as_ref();
    require_argument(file, FILE_NAME_ARGUMENT_MESSAGE);

    assert!(!file.exists(), "{} exists", file.display());
}

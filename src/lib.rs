//! This library provides a scratch directory and filesystem assertions for tests.
//! When you are testing something that reads or writes files, you need a directory that starts
//! out empty, can be populated by the test, verified, and wiped out once the work is done.
//! This package creates (or clears) such a directory before the test, offers helpers to fill it
//! and assert on its state, and optionally removes its contents after the test.

pub mod scratch;

pub use scratch::asserts;
pub use scratch::config::TestDirectoryConf;
pub use scratch::test_directory::{TestDirectory, TestDirectoryScope, DEFAULT_DIRECTORY};
pub use scratch::test_directory_error::{Result, TestDirectoryError};

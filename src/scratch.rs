//! The `scratch` module provides the scratch directory used by tests.
//! It includes the directory lifecycle, configuration, filesystem assertions and error handling.

pub mod asserts;
pub mod config;
pub mod test_directory;
pub mod test_directory_error;

//! Assertions about a [`TestDirectory`], for callers that prefer free functions
//! over the `assert_*` methods.
use crate::scratch::test_directory::TestDirectory;

use super::directory_assert;

/// Asserts that the test directory has no children.
#[track_caller]
pub fn assert_is_empty(test_directory: &TestDirectory) {
    directory_assert::assert_directory_is_empty(test_directory);
}

/// Asserts that the test directory has children.
#[track_caller]
pub fn assert_not_empty(test_directory: &TestDirectory) {
    directory_assert::assert_directory_not_empty(test_directory);
}

#[track_caller]
pub fn assert_child_count_equals(test_directory: &TestDirectory, expected_child_count: usize) {
    directory_assert::assert_directory_child_count_equals(test_directory, expected_child_count);
}

#[track_caller]
pub fn assert_file_count_equals(test_directory: &TestDirectory, expected_file_count: usize) {
    directory_assert::assert_directory_child_file_count_equals(
        test_directory,
        expected_file_count,
    );
}

/// Counts child directories, not files.
#[track_caller]
pub fn assert_child_directory_count_equals(
    test_directory: &TestDirectory,
    expected_directory_count: usize,
) {
    directory_assert::assert_directory_child_directory_count_equals(
        test_directory,
        expected_directory_count,
    );
}

#[track_caller]
pub fn assert_contains_file(test_directory: &TestDirectory, file_name: &str) {
    directory_assert::assert_directory_contains_file(test_directory, file_name);
}

#[track_caller]
pub fn assert_not_contains_file(test_directory: &TestDirectory, file_name: &str) {
    directory_assert::assert_directory_not_contains_file(test_directory, file_name);
}

#[track_caller]
pub fn assert_contains_directory(test_directory: &TestDirectory, directory_name: &str) {
    directory_assert::assert_directory_contains_directory(test_directory, directory_name);
}

#[track_caller]
pub fn assert_not_contains_directory(test_directory: &TestDirectory, directory_name: &str) {
    directory_assert::assert_directory_not_contains_directory(test_directory, directory_name);
}

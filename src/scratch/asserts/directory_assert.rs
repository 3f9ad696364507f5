//! Assertions about a directory and its direct children.
use std::path::Path;

use tracing::warn;

use super::{
    child_names, count_children, format_listing, require_argument,
    DIRECTORY_NAME_ARGUMENT_MESSAGE, FILE_NAME_ARGUMENT_MESSAGE,
};

/// Asserts that `directory` exists and refers to a directory.
#[track_caller]
pub fn assert_directory_exists<P: AsRef<Path>>(directory: P) {
    let directory = directory.as_ref();
    require_argument(directory, DIRECTORY_NAME_ARGUMENT_MESSAGE);

    assert!(
        directory.exists(),
        "Directory {} does not exist",
        directory.display()
    );
    assert!(
        directory.is_dir(),
        "{} does not refer to a directory",
        directory.display()
    );
}

/// Asserts that nothing exists at `directory`.
#[track_caller]
pub fn assert_directory_not_exists<P: AsRef<Path>>(directory: P) {
    let directory = directory.as_ref();
    require_argument(directory, DIRECTORY_NAME_ARGUMENT_MESSAGE);

    assert!(!directory.exists(), "{} exists", directory.display());
}

/// Asserts that `directory` exists, refers to a directory and has no children.
///
/// The failure message lists what was found:
/// `Directory target/test-files is not empty - contains [child, test.txt]`.
#[track_caller]
pub fn assert_directory_is_empty<P: AsRef<Path>>(directory: P) {
    let directory = directory.as_ref();
    assert_directory_exists(directory);

    let entries = child_names(directory);
    assert!(
        entries.is_empty(),
        "Directory {} is not empty - contains {}",
        directory.display(),
        format_listing(&entries)
    );
}

/// Asserts that `directory` exists, refers to a directory and has at least one child.
#[track_caller]
pub fn assert_directory_not_empty<P: AsRef<Path>>(directory: P) {
    let directory = directory.as_ref();
    assert_directory_exists(directory);

    assert!(
        !child_names(directory).is_empty(),
        "Directory {} is empty",
        directory.display()
    );
}

/// Asserts that `directory` has exactly `expected_child_count` direct children of any kind.
#[track_caller]
pub fn assert_directory_child_count_equals<P: AsRef<Path>>(
    directory: P,
    expected_child_count: usize,
) {
    let directory = directory.as_ref();
    assert_directory_exists(directory);

    assert_eq!(
        expected_child_count,
        child_names(directory).len(),
        "Unexpected number of children in directory {}",
        directory.display()
    );
}

/// Asserts that `directory` has exactly `expected_file_count` direct children that are files.
#[track_caller]
pub fn assert_directory_child_file_count_equals<P: AsRef<Path>>(
    directory: P,
    expected_file_count: usize,
) {
    let directory = directory.as_ref();
    assert_directory_exists(directory);

    assert_eq!(
        expected_file_count,
        count_children(directory, Path::is_file),
        "Unexpected number of files in directory {}",
        directory.display()
    );
}

/// Asserts that `directory` has exactly `expected_directory_count` direct children that are
/// directories.
///
/// The failure message reads "Unexpected number of files" like the file count check; existing
/// consumers match on that text.
#[track_caller]
pub fn assert_directory_child_directory_count_equals<P: AsRef<Path>>(
    directory: P,
    expected_directory_count: usize,
) {
    let directory = directory.as_ref();
    assert_directory_exists(directory);

    assert_eq!(
        expected_directory_count,
        count_children(directory, Path::is_dir),
        "Unexpected number of files in directory {}",
        directory.display()
    );
}

/// Asserts that `file_name` exists in `directory` and refers to a file.
#[track_caller]
pub fn assert_directory_contains_file<P: AsRef<Path>>(directory: P, file_name: &str) {
    let directory = directory.as_ref();
    require_argument(Path::new(file_name), FILE_NAME_ARGUMENT_MESSAGE);
    assert_directory_exists(directory);

    let expected = directory.join(file_name);
    assert!(
        expected.exists(),
        "File {} does not exist in directory {}",
        file_name,
        directory.display()
    );
    assert!(
        expected.is_file(),
        "{} in directory {} does not refer to a file",
        file_name,
        directory.display()
    );
}

/// Asserts that no file named `file_name` exists in `directory`.
///
/// A directory with that name does not fail the assertion, it is only reported as a warning.
#[track_caller]
pub fn assert_directory_not_contains_file<P: AsRef<Path>>(directory: P, file_name: &str) {
    let directory = directory.as_ref();
    require_argument(Path::new(file_name), FILE_NAME_ARGUMENT_MESSAGE);
    assert_directory_exists(directory);

    let expected = directory.join(file_name);
    if expected.exists() {
        if expected.is_file() {
            panic!(
                "File {} exists in directory {}",
                file_name,
                directory.display()
            );
        } else {
            warn!(
                "The directory {} contains {}, but it is not a file",
                directory.display(),
                file_name
            );
        }
    }
}

/// Asserts that `directory_name` exists in `directory` and refers to a directory.
#[track_caller]
pub fn assert_directory_contains_directory<P: AsRef<Path>>(directory: P, directory_name: &str) {
    let directory = directory.as_ref();
    require_argument(Path::new(directory_name), DIRECTORY_NAME_ARGUMENT_MESSAGE);
    assert_directory_exists(directory);

    let expected = directory.join(directory_name);
    assert!(
        expected.exists(),
        "Directory {} does not exist in directory {}",
        directory_name,
        directory.display()
    );
    assert!(
        expected.is_dir(),
        "{} in directory {} does not refer to a directory",
        directory_name,
        directory.display()
    );
}

/// Asserts that no directory named `directory_name` exists in `directory`.
///
/// A file with that name does not fail the assertion, it is only reported as a warning.
#[track_caller]
pub fn assert_directory_not_contains_directory<P: AsRef<Path>>(
    directory: P,
    directory_name: &str,
) {
    let directory = directory.as_ref();
    require_argument(Path::new(directory_name), DIRECTORY_NAME_ARGUMENT_MESSAGE);
    assert_directory_exists(directory);

    let expected = directory.join(directory_name);
    if expected.exists() {
        if expected.is_dir() {
            panic!(
                "Directory {} exists in directory {}",
                directory_name,
                directory.display()
            );
        } else {
            warn!(
                "The directory {} contains {}, but it is not a directory",
                directory.display(),
                directory_name
            );
        }
    }
}

//! Filesystem assertions for tests.
//!
//! Every assertion panics with a descriptive message when the filesystem does not match
//! the expectation, the same way `assert!` does. Empty paths and names are rejected with
//! their own message before the filesystem is queried.

pub mod directory_assert;
pub mod file_assert;
pub mod test_directory_assert;

use std::fs;
use std::path::{Path, PathBuf};

pub use directory_assert::{
    assert_directory_child_count_equals, assert_directory_child_directory_count_equals,
    assert_directory_child_file_count_equals, assert_directory_contains_directory,
    assert_directory_contains_file, assert_directory_exists, assert_directory_is_empty,
    assert_directory_not_contains_directory, assert_directory_not_contains_file,
    assert_directory_not_empty, assert_directory_not_exists,
};
pub use file_assert::{assert_file_exists, assert_file_not_exists};

pub(crate) const FILE_NAME_ARGUMENT_MESSAGE: &str = "File name argument cannot be null or empty";
pub(crate) const DIRECTORY_NAME_ARGUMENT_MESSAGE: &str =
    "Directory name argument cannot be null or empty";

#[track_caller]
pub(crate) fn require_argument(path: &Path, message: &str) {
    if path.as_os_str().is_empty() {
        panic!("{}", message);
    }
}

/// Paths of the direct children of `directory`, in listing order.
#[track_caller]
fn child_paths(directory: &Path) -> Vec<PathBuf> {
    let entries = fs::read_dir(directory).unwrap_or_else(|error| {
        panic!(
            "Failed to list the contents of directory {}: {}",
            directory.display(),
            error
        )
    });

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.unwrap_or_else(|error| {
            panic!(
                "Failed to list the contents of directory {}: {}",
                directory.display(),
                error
            )
        });
        paths.push(entry.path());
    }
    paths
}

/// Names of the direct children of `directory`, sorted.
///
/// Names that are not valid UTF-8 are rendered lossily, so use these for messages only.
#[track_caller]
pub(crate) fn child_names(directory: &Path) -> Vec<String> {
    let mut names: Vec<String> = child_paths(directory)
        .iter()
        .filter_map(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Number of direct children of `directory` accepted by `kind`.
#[track_caller]
pub(crate) fn count_children<F>(directory: &Path, kind: F) -> usize
where
    F: Fn(&Path) -> bool,
{
    child_paths(directory)
        .iter()
        .filter(|path| kind(path.as_path()))
        .count()
}

/// Renders a listing the way the not-empty message shows it: `[a, b]`.
pub(crate) fn format_listing(names: &[String]) -> String {
    format!("[{}]", names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_is_bracketed_and_comma_separated() {
        assert_eq!("[]", format_listing(&[]));
        assert_eq!("[child]", format_listing(&[String::from("child")]));
        assert_eq!(
            "[a.txt, b]",
            format_listing(&[String::from("a.txt"), String::from("b")])
        );
    }

    #[test]
    fn child_names_are_sorted() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("zeta.txt"), "").unwrap();
        fs::create_dir(root.path().join("alpha")).unwrap();

        assert_eq!(vec!["alpha", "zeta.txt"], child_names(root.path()));
        assert_eq!(1, count_children(root.path(), Path::is_dir));
        assert_eq!(1, count_children(root.path(), Path::is_file));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_names_are_counted_by_kind() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join(OsStr::from_bytes(b"bad\xff.txt")), "").unwrap();
        fs::create_dir(root.path().join(OsStr::from_bytes(b"dir\xfe"))).unwrap();

        assert_eq!(1, count_children(root.path(), Path::is_file));
        assert_eq!(1, count_children(root.path(), Path::is_dir));
        assert_eq!(2, child_names(root.path()).len());
    }

    #[test]
    #[should_panic(expected = "File name argument cannot be null or empty")]
    fn empty_argument_is_rejected() {
        require_argument(Path::new(""), FILE_NAME_ARGUMENT_MESSAGE);
    }
}

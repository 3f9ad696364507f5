use rand::Rng;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use walkdir::WalkDir;

use super::asserts::directory_assert;
use super::config::TestDirectoryConf;
use super::test_directory_error::{Result, TestDirectoryError};

/// Location used by [`TestDirectory::with_default_directory`].
pub const DEFAULT_DIRECTORY: &str = "target/test-files";

/// Test Directory is a scratch directory owned by one test.
/// Before the test body runs it is created, or cleared if it already exists.
/// The test fills it through the helpers below and verifies it with the `assert_*` methods.
/// After the test its contents are removed when `delete_after_test` is set.
///
/// # Example of use in tests
///
/// ```rust
/// use scratch_tester::{TestDirectory, TestDirectoryError};
///
/// # fn main() -> Result<(), TestDirectoryError> {
/// let test_directory = TestDirectory::new("target/test-files/doc_example")?.delete_after_test();
///
/// test_directory.perform_test(|dir| {
///     dir.new_file_with_body("test.txt", "Hello, world!")?;
///     dir.assert_contains_file("test.txt");
///     assert_eq!("Hello, world!", dir.read_file("test.txt")?);
///     Ok::<(), TestDirectoryError>(())
/// });
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestDirectory {
    directory: PathBuf,
    delete_after_test: bool,
}

impl TestDirectory {
    /// Binds a test directory to `directory`. Nothing is created until [`initialize`](Self::initialize).
    ///
    /// Fails with an invalid argument error when the path is empty or exists but is not a directory.
    pub fn new<P: AsRef<Path>>(directory: P) -> Result<TestDirectory> {
        let directory = directory.as_ref();
        if directory.as_os_str().is_empty() {
            return Err(TestDirectoryError::invalid_argument(
                "The directory name argument for the test directory cannot be null or empty",
            ));
        }

        if directory.exists() && !directory.is_dir() {
            return Err(TestDirectoryError::invalid_argument(format!(
                "The specified directory name '{}' does not refer to a directory",
                directory.display()
            )));
        }

        Ok(TestDirectory {
            directory: directory.to_path_buf(),
            delete_after_test: false,
        })
    }

    /// Binds a test directory to [`DEFAULT_DIRECTORY`].
    pub fn with_default_directory() -> Result<TestDirectory> {
        Self::new(DEFAULT_DIRECTORY)
    }

    /// Binds a test directory to `<parent>/<name>_<random number>`, so tests running in
    /// parallel under the same parent never share a directory.
    pub fn unique_in<P: AsRef<Path>>(parent: P, name: &str) -> Result<TestDirectory> {
        if name.is_empty() {
            return Err(TestDirectoryError::invalid_argument(
                "The directory name argument for the test directory cannot be null or empty",
            ));
        }

        let uniq_code = rand::rng().random::<u64>();
        Self::new(parent.as_ref().join(format!("{}_{}", name, uniq_code)))
    }

    /// Builds a test directory from a YAML or JSON configuration string.
    /// See [`TestDirectoryConf`] for the format; the `SCRATCH_DELETE_AFTER_TEST`
    /// environment variable overrides the configured flag.
    pub fn from_config(config_str: &str) -> Result<TestDirectory> {
        let conf = TestDirectoryConf::parse(config_str)?.with_env_overrides();
        Self::from_conf(&conf)
    }

    pub fn from_conf(conf: &TestDirectoryConf) -> Result<TestDirectory> {
        Ok(Self::new(&conf.directory)?.with_delete_after_test(conf.delete_after_test))
    }

    pub fn path(&self) -> &Path {
        &self.directory
    }

    pub fn is_delete_after_test(&self) -> bool {
        self.delete_after_test
    }

    pub fn set_delete_after_test(&mut self, delete_after_test: bool) {
        self.delete_after_test = delete_after_test;
    }

    /// Fluent form of `set_delete_after_test(true)`.
    pub fn delete_after_test(self) -> Self {
        self.with_delete_after_test(true)
    }

    pub fn with_delete_after_test(mut self, delete_after_test: bool) -> Self {
        self.set_delete_after_test(delete_after_test);
        self
    }

    /// Prepares the directory for a test: creates it with all missing parents,
    /// or removes everything inside it when it already exists.
    pub fn initialize(&self) -> Result<()> {
        if self.directory.exists() {
            if !self.directory.is_dir() {
                return Err(TestDirectoryError::illegal_state(format!(
                    "The test directory '{}' does not refer to a directory",
                    self
                )));
            }
            self.cleanup()
        } else {
            debug!("Creating test directory {}", self);
            fs::create_dir_all(&self.directory).map_err(|error| {
                TestDirectoryError::operation_failed(
                    format!("Failed to create {} directory", self),
                    error,
                )
            })
        }
    }

    /// Removes every entry inside the directory and keeps the directory itself.
    pub fn cleanup(&self) -> Result<()> {
        if !self.directory.is_dir() {
            return Ok(());
        }

        let clean_error = |error: io::Error| {
            TestDirectoryError::operation_failed(
                format!("Failed to clean existing {} directory", self),
                error,
            )
        };

        let entries = self.entry_names().map_err(clean_error)?;
        if !entries.is_empty() {
            info!("Clearing test directory {} contents {:?}", self, entries);
            self.remove_contents().map_err(clean_error)?;
        }
        Ok(())
    }

    /// Runs after the test body; clears the directory only when `delete_after_test` is set.
    pub fn after(&self) -> Result<()> {
        if self.delete_after_test {
            debug!("Deleting contents of test directory {}", self);
            self.cleanup()
        } else {
            Ok(())
        }
    }

    /// Initializes the directory and returns a scope that runs [`after`](Self::after)
    /// when it is closed or dropped, including while a failed test unwinds.
    pub fn open(&self) -> Result<TestDirectoryScope<'_>> {
        self.initialize()?;

        Ok(TestDirectoryScope {
            test_directory: self,
            closed: false,
        })
    }

    /// The test_proc closure is the test body. It runs between the initialization and
    /// the teardown of the directory; teardown happens whatever the outcome.
    /// A setup failure or an error returned by the closure fails the test.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use scratch_tester::{TestDirectory, TestDirectoryError};
    /// let test_directory = TestDirectory::new("target/test-files/perform_test_example")
    ///     .expect("Incorrect test directory");
    /// test_directory.perform_test(|dir| {
    ///     dir.copy_file("Cargo.toml")?;
    ///     dir.assert_file_count_equals(1);
    ///     Ok::<(), TestDirectoryError>(())
    /// });
    /// ```
    pub fn perform_test<F, E>(&self, test_proc: F)
    where
        F: FnOnce(&TestDirectory) -> std::result::Result<(), E>,
        E: fmt::Display,
    {
        let scope = match self.open() {
            Ok(scope) => scope,
            Err(e) => panic!("Failed to set up the test directory {}: {}", self, e),
        };

        if let Err(e) = test_proc(&*scope) {
            panic!("inner test has error: {}", e)
        }
    }

    /// Returns the path of an existing file directly inside the test directory.
    pub fn get_file(&self, file_name: &str) -> Result<PathBuf> {
        if file_name.is_empty() {
            return Err(TestDirectoryError::invalid_argument(format!(
                "Failed to get a File object from the '{}' directory - the filename argument cannot be null or empty",
                self
            )));
        }

        let file = self.directory.join(file_name);
        if !file.exists() {
            return Err(TestDirectoryError::illegal_state(format!(
                "Failed to get a File object for the '{}' file from the '{}' directory - the file does not exist",
                file_name, self
            )));
        } else if !file.is_file() {
            return Err(TestDirectoryError::illegal_state(format!(
                "Failed to get a File object for the '{}' file from the '{}' directory -  the filename does not refer to a file",
                file_name, self
            )));
        }

        Ok(file)
    }

    /// Returns the path of an existing file inside an existing child directory.
    pub fn get_file_from_child_directory(
        &self,
        child_directory_name: &str,
        file_name: &str,
    ) -> Result<PathBuf> {
        if child_directory_name.is_empty() {
            return Err(TestDirectoryError::invalid_argument(format!(
                "Failed to get a File object from the child directory in the '{}' directory - the child directory name argument cannot be null or empty",
                self
            )));
        } else if file_name.is_empty() {
            return Err(TestDirectoryError::invalid_argument(format!(
                "Failed to get a File object from the '{}' child directory in the '{}' directory - the filename argument cannot be null or empty",
                child_directory_name, self
            )));
        }

        let child_directory = self.directory.join(child_directory_name);
        if !child_directory.exists() {
            return Err(TestDirectoryError::illegal_state(format!(
                "Failed to get a File object for the '{}' file from the '{}' child directory in the '{}' directory - the child directory does not exist",
                file_name, child_directory_name, self
            )));
        } else if !child_directory.is_dir() {
            return Err(TestDirectoryError::illegal_state(format!(
                "Failed to get a File object for the '{}' file from the '{}' child directory in the '{}' directory - the child directory name does not refer to a directory",
                file_name, child_directory_name, self
            )));
        }

        let file = child_directory.join(file_name);
        if !file.exists() {
            return Err(TestDirectoryError::illegal_state(format!(
                "Failed to get a File object for the '{}' file from the '{}' child directory in the '{}' directory - the file does not exist",
                file_name, child_directory_name, self
            )));
        } else if !file.is_file() {
            return Err(TestDirectoryError::illegal_state(format!(
                "Failed to get a File object for the '{}' file from the '{}' child directory in the '{}' directory - the filename does not refer to a file",
                file_name, child_directory_name, self
            )));
        }

        Ok(file)
    }

    /// Returns the path of an existing child directory.
    pub fn get_directory(&self, child_directory_name: &str) -> Result<PathBuf> {
        if child_directory_name.is_empty() {
            return Err(TestDirectoryError::invalid_argument(format!(
                "Failed to get a File object for a child directory from the '{}' directory - the child directory name argument cannot be null or empty",
                self
            )));
        }

        let child_directory = self.directory.join(child_directory_name);
        if !child_directory.exists() {
            return Err(TestDirectoryError::illegal_state(format!(
                "Failed to get a File object for the {} child directory from the '{}' directory - the child directory does not exist",
                child_directory_name, self
            )));
        } else if !child_directory.is_dir() {
            return Err(TestDirectoryError::illegal_state(format!(
                "Failed to get a File object for the {} child directory from the '{}' directory - the child directory name does not refer to a directory",
                child_directory_name, self
            )));
        }

        Ok(child_directory)
    }

    pub fn delete_file(&self, file_name: &str) -> Result<()> {
        if file_name.is_empty() {
            return Err(TestDirectoryError::invalid_argument(format!(
                "Failed to delete a file from the '{}' directory - the filename argument cannot be null or empty",
                self
            )));
        }

        let file = self.directory.join(file_name);
        if !file.exists() {
            return Err(TestDirectoryError::illegal_state(format!(
                "Failed to delete the '{}' file from the '{}' directory - the file does not exist",
                file_name, self
            )));
        } else if !file.is_file() {
            return Err(TestDirectoryError::illegal_state(format!(
                "Failed to delete the '{}' file from the '{}' directory - the filename does not refer to a file",
                file_name, self
            )));
        }

        fs::remove_file(&file).map_err(|error| {
            TestDirectoryError::operation_failed(
                format!(
                    "Failed to delete the '{}' file from the '{}' directory",
                    file_name, self
                ),
                error,
            )
        })
    }

    /// Removes a child directory and everything below it.
    pub fn delete_directory(&self, child_directory_name: &str) -> Result<()> {
        if child_directory_name.is_empty() {
            return Err(TestDirectoryError::invalid_argument(format!(
                "Failed to delete a child directory from the '{}' directory - the child directory name argument cannot be null or empty",
                self
            )));
        }

        let child_directory = self.directory.join(child_directory_name);
        if !child_directory.exists() {
            return Err(TestDirectoryError::illegal_state(format!(
                "Failed to delete the '{}' child directory from the '{}' directory - the child directory does not exist",
                child_directory_name, self
            )));
        } else if !child_directory.is_dir() {
            return Err(TestDirectoryError::illegal_state(format!(
                "Failed to delete the '{}' child directory from the '{}' directory - the child directory name does not refer to a directory",
                child_directory_name, self
            )));
        }

        fs::remove_dir_all(&child_directory).map_err(|error| {
            TestDirectoryError::operation_failed(
                format!(
                    "Failed to delete the '{}' child directory from the '{}' directory",
                    child_directory_name, self
                ),
                error,
            )
        })
    }

    /// Reads the whole file as UTF-8 text, exactly as stored.
    pub fn read_file(&self, file_name: &str) -> Result<String> {
        if file_name.is_empty() {
            return Err(TestDirectoryError::invalid_argument(format!(
                "Failed to read a file in the '{}' directory - the filename argument cannot be null or empty",
                self
            )));
        }

        let file = self.directory.join(file_name);
        if !file.exists() {
            return Err(TestDirectoryError::illegal_state(format!(
                "Failed to read the '{}' file in the '{}' directory - the file does not exist",
                file_name, self
            )));
        } else if !file.is_file() {
            return Err(TestDirectoryError::illegal_state(format!(
                "Failed to read the '{}' file in the '{}' directory - the filename does not refer to a file",
                file_name, self
            )));
        }

        fs::read_to_string(&file).map_err(|error| {
            TestDirectoryError::operation_failed(
                format!(
                    "Failed to read the '{}' file in the '{}' directory",
                    file_name, self
                ),
                error,
            )
        })
    }

    /// Reads the file as lines. `\n`, `\r\n` and a lone `\r` all end a line and a final
    /// line ending does not produce an extra empty line.
    pub fn read_file_lines(&self, file_name: &str) -> Result<Vec<String>> {
        if file_name.is_empty() {
            return Err(TestDirectoryError::invalid_argument(format!(
                "Failed to read the lines of a file in the '{}' directory - the filename argument cannot be null or empty",
                self
            )));
        }

        let file = self.directory.join(file_name);
        if !file.exists() {
            return Err(TestDirectoryError::illegal_state(format!(
                "Failed to read the lines of the '{}' file in the '{}' directory - the file does not exist",
                file_name, self
            )));
        } else if !file.is_file() {
            return Err(TestDirectoryError::illegal_state(format!(
                "Failed to read the lines of the '{}' file in the '{}' directory - the filename does not refer to a file",
                file_name, self
            )));
        }

        let content = fs::read_to_string(&file).map_err(|error| {
            TestDirectoryError::operation_failed(
                format!(
                    "Failed to read the lines of the '{}' file in the '{}' directory",
                    file_name, self
                ),
                error,
            )
        })?;

        Ok(split_lines(&content))
    }

    /// Creates an empty file directly inside the test directory.
    /// Fails when a file with this name already exists.
    pub fn new_file(&self, file_name: &str) -> Result<PathBuf> {
        let (file, _) = self.create_file(file_name)?;
        Ok(file)
    }

    /// Creates a file and writes `body` into it verbatim.
    pub fn new_file_with_body(&self, file_name: &str, body: &str) -> Result<PathBuf> {
        let (file, mut writer) = self.create_file(file_name)?;

        writer
            .write_all(body.as_bytes())
            .and_then(|_| writer.flush())
            .map_err(|error| {
                TestDirectoryError::operation_failed(
                    format!(
                        "Failed to write body to new '{}' file in '{}' directory",
                        file.display(),
                        self
                    ),
                    error,
                )
            })?;

        Ok(file)
    }

    fn create_file(&self, file_name: &str) -> Result<(PathBuf, File)> {
        if file_name.is_empty() {
            return Err(TestDirectoryError::invalid_argument(format!(
                "Failed to create a new file in the '{}' directory - the filename argument cannot be null or empty",
                self
            )));
        }

        let file = self.directory.join(file_name);
        debug!("Creating file {}", file.display());
        let writer = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&file)
            .map_err(|error| {
                let message = if error.kind() == io::ErrorKind::AlreadyExists {
                    format!(
                        "Failed to create the '{}' file in the '{}' directory - the file already exists",
                        file_name, self
                    )
                } else {
                    format!(
                        "Failed to create the '{}' file in the '{}' directory",
                        file_name, self
                    )
                };
                TestDirectoryError::operation_failed(message, error)
            })?;

        Ok((file, writer))
    }

    /// Copies an existing file into the test directory under its own file name.
    pub fn copy_file<P: AsRef<Path>>(&self, source_file: P) -> Result<PathBuf> {
        let source_file = source_file.as_ref();
        if source_file.as_os_str().is_empty() {
            return Err(TestDirectoryError::invalid_argument(format!(
                "Failed to copy a source file to the '{}' directory - the source file argument cannot be null or empty",
                self
            )));
        } else if !source_file.exists() {
            return Err(TestDirectoryError::invalid_argument(format!(
                "Failed to copy the '{}' source file to the '{}' directory - the source file does not exist",
                source_file.display(),
                self
            )));
        } else if !source_file.is_file() {
            return Err(TestDirectoryError::invalid_argument(format!(
                "Failed to copy the '{}' source file to the '{}' directory - the source file does not refer to a file",
                source_file.display(),
                self
            )));
        }

        let Some(file_name) = source_file.file_name() else {
            return Err(TestDirectoryError::invalid_argument(format!(
                "Failed to copy the '{}' source file to the '{}' directory - the source file has no file name",
                source_file.display(),
                self
            )));
        };

        let target = self.directory.join(file_name);
        debug!("Copying {} to {}", source_file.display(), target.display());
        fs::copy(source_file, &target).map_err(|error| {
            TestDirectoryError::operation_failed(
                format!(
                    "Failed to copy the '{}' source file to the '{}' directory",
                    source_file.display(),
                    self
                ),
                error,
            )
        })?;

        Ok(target)
    }

    /// Copies an existing file into the test directory as `new_file_name`.
    pub fn copy_file_as<P: AsRef<Path>>(
        &self,
        source_file: P,
        new_file_name: &str,
    ) -> Result<PathBuf> {
        let source_file = source_file.as_ref();
        if source_file.as_os_str().is_empty() {
            return Err(TestDirectoryError::invalid_argument(format!(
                "Failed to copy a source file to the '{}' directory as the '{}' file - the source file argument cannot be null or empty",
                self, new_file_name
            )));
        } else if !source_file.exists() {
            return Err(TestDirectoryError::invalid_argument(format!(
                "Failed to copy the '{}' source file to the '{}' directory as the '{}' file - the source file does not exist",
                source_file.display(),
                self,
                new_file_name
            )));
        } else if !source_file.is_file() {
            return Err(TestDirectoryError::invalid_argument(format!(
                "Failed to copy the '{}' source file to the '{}' directory as the '{}' file - the source file does not refer to a file",
                source_file.display(),
                self,
                new_file_name
            )));
        } else if new_file_name.is_empty() {
            return Err(TestDirectoryError::invalid_argument(format!(
                "Failed to copy the '{}' source file to the '{}' directory with a new filename - the new filename argument cannot be null or empty",
                source_file.display(),
                self
            )));
        }

        let target = self.directory.join(new_file_name);
        debug!("Copying {} to {}", source_file.display(), target.display());
        fs::copy(source_file, &target).map_err(|error| {
            TestDirectoryError::operation_failed(
                format!(
                    "Failed to copy the '{}' source file to the '{}' directory under the new name {}",
                    source_file.display(),
                    self,
                    new_file_name
                ),
                error,
            )
        })?;

        Ok(target)
    }

    /// Creates a child directory; `child_directory_name` may span several levels (`a/b/c`).
    /// Fails when the child directory already exists.
    pub fn new_directory(&self, child_directory_name: &str) -> Result<PathBuf> {
        if child_directory_name.is_empty() {
            return Err(TestDirectoryError::invalid_argument(format!(
                "Failed to create a new child directory in the '{}' directory - the child directory name argument cannot be null or empty",
                self
            )));
        }

        let child_directory = self.directory.join(child_directory_name);
        if child_directory.exists() {
            return Err(TestDirectoryError::operation_failed(
                format!(
                    "Failed to create a new '{}' child directory in the '{}' directory - the child directory already exists",
                    child_directory_name, self
                ),
                io::Error::from(io::ErrorKind::AlreadyExists),
            ));
        }

        debug!("Creating directory {}", child_directory.display());
        fs::create_dir_all(&child_directory).map_err(|error| {
            TestDirectoryError::operation_failed(
                format!(
                    "Failed to create a new '{}' child directory in the '{}' directory",
                    child_directory_name, self
                ),
                error,
            )
        })?;

        Ok(child_directory)
    }

    fn entry_names(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.directory)? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    fn remove_contents(&self) -> io::Result<()> {
        // contents_first yields every child before its parent, so directories are empty
        // by the time they are removed. Symlinks are removed, never followed.
        for entry in WalkDir::new(&self.directory)
            .min_depth(1)
            .contents_first(true)
        {
            let entry = entry?;
            if entry.file_type().is_dir() {
                fs::remove_dir(entry.path())?;
            } else {
                fs::remove_file(entry.path())?;
            }
        }
        Ok(())
    }

    fn child(&self, child_directory_name: &str) -> PathBuf {
        self.directory.join(child_directory_name)
    }

    /// Asserts that the test directory has no children.
    #[track_caller]
    pub fn assert_is_empty(&self) {
        directory_assert::assert_directory_is_empty(&self.directory);
    }

    /// Asserts that the test directory has children.
    #[track_caller]
    pub fn assert_not_empty(&self) {
        directory_assert::assert_directory_not_empty(&self.directory);
    }

    /// Asserts that the child directory exists and has no children.
    #[track_caller]
    pub fn assert_child_directory_is_empty(&self, child_directory_name: &str) {
        self.assert_contains_directory(child_directory_name);

        directory_assert::assert_directory_is_empty(self.child(child_directory_name));
    }

    /// Asserts that the child directory exists and has children.
    #[track_caller]
    pub fn assert_child_directory_not_empty(&self, child_directory_name: &str) {
        self.assert_contains_directory(child_directory_name);

        directory_assert::assert_directory_not_empty(self.child(child_directory_name));
    }

    #[track_caller]
    pub fn assert_child_count_equals(&self, expected_child_count: usize) {
        directory_assert::assert_directory_child_count_equals(
            &self.directory,
            expected_child_count,
        );
    }

    #[track_caller]
    pub fn assert_file_count_equals(&self, expected_file_count: usize) {
        directory_assert::assert_directory_child_file_count_equals(
            &self.directory,
            expected_file_count,
        );
    }

    /// Counts child directories, not files. The failure message still reads
    /// "Unexpected number of files in directory".
    #[track_caller]
    pub fn assert_child_directory_count_equals(&self, expected_directory_count: usize) {
        directory_assert::assert_directory_child_directory_count_equals(
            &self.directory,
            expected_directory_count,
        );
    }

    #[track_caller]
    pub fn assert_child_count_in_child_directory_equals(
        &self,
        child_directory_name: &str,
        expected_child_count: usize,
    ) {
        self.assert_contains_directory(child_directory_name);

        directory_assert::assert_directory_child_count_equals(
            self.child(child_directory_name),
            expected_child_count,
        );
    }

    #[track_caller]
    pub fn assert_file_count_in_child_directory_equals(
        &self,
        child_directory_name: &str,
        expected_file_count: usize,
    ) {
        self.assert_contains_directory(child_directory_name);

        directory_assert::assert_directory_child_file_count_equals(
            self.child(child_directory_name),
            expected_file_count,
        );
    }

    /// Counts child directories, not files. The failure message still reads
    /// "Unexpected number of files in directory".
    #[track_caller]
    pub fn assert_child_directory_in_child_directory_count_equals(
        &self,
        child_directory_name: &str,
        expected_directory_count: usize,
    ) {
        self.assert_contains_directory(child_directory_name);

        directory_assert::assert_directory_child_directory_count_equals(
            self.child(child_directory_name),
            expected_directory_count,
        );
    }

    #[track_caller]
    pub fn assert_contains_file(&self, file_name: &str) {
        directory_assert::assert_directory_contains_file(&self.directory, file_name);
    }

    #[track_caller]
    pub fn assert_not_contains_file(&self, file_name: &str) {
        directory_assert::assert_directory_not_contains_file(&self.directory, file_name);
    }

    #[track_caller]
    pub fn assert_contains_directory(&self, directory_name: &str) {
        directory_assert::assert_directory_contains_directory(&self.directory, directory_name);
    }

    #[track_caller]
    pub fn assert_not_contains_directory(&self, directory_name: &str) {
        directory_assert::assert_directory_not_contains_directory(&self.directory, directory_name);
    }

    #[track_caller]
    pub fn assert_contains_file_in_child_directory(
        &self,
        child_directory_name: &str,
        file_name: &str,
    ) {
        self.assert_contains_directory(child_directory_name);

        directory_assert::assert_directory_contains_file(
            self.child(child_directory_name),
            file_name,
        );
    }

    #[track_caller]
    pub fn assert_not_contains_file_in_child_directory(
        &self,
        child_directory_name: &str,
        file_name: &str,
    ) {
        self.assert_contains_directory(child_directory_name);

        directory_assert::assert_directory_not_contains_file(
            self.child(child_directory_name),
            file_name,
        );
    }

    #[track_caller]
    pub fn assert_contains_directory_in_child_directory(
        &self,
        child_directory_name: &str,
        directory_name: &str,
    ) {
        self.assert_contains_directory(child_directory_name);

        directory_assert::assert_directory_contains_directory(
            self.child(child_directory_name),
            directory_name,
        );
    }

    #[track_caller]
    pub fn assert_not_contains_directory_in_child_directory(
        &self,
        child_directory_name: &str,
        directory_name: &str,
    ) {
        self.assert_contains_directory(child_directory_name);

        directory_assert::assert_directory_not_contains_directory(
            self.child(child_directory_name),
            directory_name,
        );
    }
}

impl fmt::Display for TestDirectory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.directory.display())
    }
}

fn split_lines(content: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut rest = content;
    while !rest.is_empty() {
        match rest.find(['\r', '\n']) {
            Some(end) => {
                lines.push(rest[..end].to_string());
                let terminator = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[end + terminator..];
            }
            None => {
                lines.push(rest.to_string());
                break;
            }
        }
    }
    lines
}

impl AsRef<Path> for TestDirectory {
    fn as_ref(&self) -> &Path {
        &self.directory
    }
}

/// An initialized [`TestDirectory`]. Dereferences to the test directory and runs its
/// [`after`](TestDirectory::after) step when closed or dropped.
#[must_use = "the test directory is torn down as soon as the scope is dropped"]
pub struct TestDirectoryScope<'a> {
    test_directory: &'a TestDirectory,
    closed: bool,
}

impl TestDirectoryScope<'_> {
    /// Runs the teardown now and reports its outcome.
    pub fn close(mut self) -> Result<()> {
        self.closed = true;
        self.test_directory.after()
    }
}

impl Deref for TestDirectoryScope<'_> {
    type Target = TestDirectory;

    fn deref(&self) -> &TestDirectory {
        self.test_directory
    }
}

impl Drop for TestDirectoryScope<'_> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.test_directory.after() {
            error!("Failed to tear down test directory {}: {}", self.test_directory, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::panic;

    use super::*;

    const TEST_CHILD_DIRECTORY_NAME: &str = "child-directory";
    const TEST_FILE_NAME: &str = "test.txt";

    #[test]
    fn constructor_should_reject_empty_name() {
        let error = TestDirectory::new("").unwrap_err();
        assert!(error.is_invalid_argument());
        assert_eq!(
            "The directory name argument for the test directory cannot be null or empty",
            error.to_string()
        );
    }

    #[test]
    fn constructor_should_reject_file() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join(TEST_FILE_NAME);
        fs::write(&file, "keep me").unwrap();

        let error = TestDirectory::new(&file).unwrap_err();
        assert!(error.is_invalid_argument());
        assert_eq!(
            format!(
                "The specified directory name '{}' does not refer to a directory",
                file.display()
            ),
            error.to_string()
        );
        assert_eq!("keep me", fs::read_to_string(&file).unwrap());
    }

    #[test]
    fn constructor_should_not_create_anything() {
        let root = tempfile::tempdir().unwrap();
        let directory = root.path().join("scratch");

        let test_directory = TestDirectory::new(&directory).unwrap();
        assert_eq!(directory.as_path(), test_directory.path());
        assert!(!directory.exists());
    }

    #[test]
    fn default_directory_is_under_target() {
        let test_directory = TestDirectory::with_default_directory().unwrap();
        assert_eq!(Path::new(DEFAULT_DIRECTORY), test_directory.path());
        assert_eq!(DEFAULT_DIRECTORY, test_directory.to_string());
    }

    #[test]
    fn unique_directories_differ() {
        let root = tempfile::tempdir().unwrap();
        let first = TestDirectory::unique_in(root.path(), "test").unwrap();
        let second = TestDirectory::unique_in(root.path(), "test").unwrap();

        assert_ne!(first.path(), second.path());
        assert!(first
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("test_"));
        assert!(TestDirectory::unique_in(root.path(), "")
            .unwrap_err()
            .is_invalid_argument());
    }

    #[test]
    fn delete_after_test_flag() {
        let mut test_directory = TestDirectory::new("target/test-files/flag").unwrap();
        assert!(!test_directory.is_delete_after_test());

        test_directory.set_delete_after_test(true);
        assert!(test_directory.is_delete_after_test());

        let test_directory = test_directory.with_delete_after_test(false);
        assert!(!test_directory.is_delete_after_test());

        let test_directory = test_directory.delete_after_test();
        assert!(test_directory.is_delete_after_test());
    }

    #[test]
    fn from_conf_applies_flag() {
        let conf = TestDirectoryConf {
            directory: String::from("target/test-files/conf"),
            delete_after_test: true,
        };
        let test_directory = TestDirectory::from_conf(&conf).unwrap();

        assert_eq!(Path::new("target/test-files/conf"), test_directory.path());
        assert!(test_directory.is_delete_after_test());
    }

    #[test]
    fn initialize_creates_missing_parents() {
        let root = tempfile::tempdir().unwrap();
        let directory = root.path().join("a").join("b");
        let test_directory = TestDirectory::new(&directory).unwrap();

        test_directory.initialize().unwrap();
        assert!(directory.is_dir());
        test_directory.assert_is_empty();
    }

    #[test]
    fn initialize_clears_existing_contents() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join(TEST_CHILD_DIRECTORY_NAME).join("nested");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join(TEST_FILE_NAME), "data").unwrap();
        fs::write(root.path().join(TEST_FILE_NAME), "data").unwrap();

        let test_directory = TestDirectory::new(root.path()).unwrap();
        test_directory.initialize().unwrap();
        test_directory.assert_is_empty();

        // a second run over an already empty directory is a no-op
        test_directory.initialize().unwrap();
        test_directory.assert_is_empty();
    }

    #[test]
    fn after_keeps_contents_by_default() {
        let root = tempfile::tempdir().unwrap();
        let test_directory = TestDirectory::new(root.path()).unwrap();
        test_directory.initialize().unwrap();
        test_directory.new_file(TEST_FILE_NAME).unwrap();

        test_directory.after().unwrap();
        test_directory.assert_child_count_equals(1);
    }

    #[test]
    fn scope_tears_down_on_drop() {
        let root = tempfile::tempdir().unwrap();
        let test_directory = TestDirectory::new(root.path()).unwrap().delete_after_test();

        {
            let scope = test_directory.open().unwrap();
            scope.new_directory(TEST_CHILD_DIRECTORY_NAME).unwrap();
            scope.new_file(TEST_FILE_NAME).unwrap();
            scope.assert_child_count_equals(2);
        }

        assert!(root.path().is_dir());
        test_directory.assert_is_empty();
    }

    #[test]
    fn scope_tears_down_when_test_panics() {
        let root = tempfile::tempdir().unwrap();
        let test_directory = TestDirectory::new(root.path()).unwrap().delete_after_test();

        let outcome = panic::catch_unwind(|| {
            test_directory.perform_test(|dir| {
                dir.new_file(TEST_FILE_NAME)?;
                dir.assert_file_count_equals(2);
                Ok::<(), TestDirectoryError>(())
            })
        });

        assert!(outcome.is_err());
        test_directory.assert_is_empty();
    }

    #[test]
    fn scope_close_reports_outcome() {
        let root = tempfile::tempdir().unwrap();
        let test_directory = TestDirectory::new(root.path()).unwrap().delete_after_test();

        let scope = test_directory.open().unwrap();
        scope.new_file(TEST_FILE_NAME).unwrap();
        scope.close().unwrap();

        test_directory.assert_is_empty();
    }

    #[test]
    #[should_panic(expected = "inner test has error")]
    fn perform_test_fails_on_error() {
        let root = tempfile::tempdir().unwrap();
        let test_directory = TestDirectory::new(root.path()).unwrap();

        test_directory.perform_test(|dir| dir.read_file(TEST_FILE_NAME).map(|_| ()));
    }

    #[test]
    fn new_directory_fails_when_present() {
        let root = tempfile::tempdir().unwrap();
        let test_directory = TestDirectory::new(root.path()).unwrap();
        test_directory.new_directory("a/b").unwrap();

        let error = test_directory.new_directory("a/b").unwrap_err();
        assert!(error.is_operation_failed());
        test_directory.assert_contains_directory_in_child_directory("a", "b");
    }

    #[test]
    fn lines_end_at_any_line_terminator() {
        assert!(split_lines("").is_empty());
        assert_eq!(vec!["one"], split_lines("one\n"));
        assert_eq!(vec!["one", "two", "three"], split_lines("one\rtwo\r\nthree"));
        assert_eq!(vec!["one", "", "two"], split_lines("one\n\ntwo\r"));
        assert_eq!(vec!["", "one"], split_lines("\r\none"));
    }

    #[test]
    fn new_file_fails_when_present() {
        let root = tempfile::tempdir().unwrap();
        let test_directory = TestDirectory::new(root.path()).unwrap();
        test_directory.new_file(TEST_FILE_NAME).unwrap();

        let error = test_directory.new_file(TEST_FILE_NAME).unwrap_err();
        assert!(error.is_operation_failed());
        assert!(error.to_string().ends_with("the file already exists"));
    }
}

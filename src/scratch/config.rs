//! The `config` module describes a test directory in YAML or JSON.
use serde::{Deserialize, Serialize};

use super::test_directory::DEFAULT_DIRECTORY;
use super::test_directory_error::{Result, TestDirectoryError};

/// Environment variable that overrides the `delete_after_test` flag: `Y` or `N`.
pub const DELETE_AFTER_TEST_VAR_NAME: &str = "SCRATCH_DELETE_AFTER_TEST";

/// Structure of the test directory configuration.
/// Both fields are optional.
///
/// ## yaml:
///
/// ```yaml
/// directory: target/test-files/parser
/// delete_after_test: true
/// ```
///
/// ## json:
///
/// ```json
/// {
///     "directory": "target/test-files/parser",
///     "delete_after_test": true
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone)]
#[serde(default)]
pub struct TestDirectoryConf {
    /// Location of the scratch directory.
    pub directory: String,

    /// Remove the directory contents once the test is finished.
    pub delete_after_test: bool,
}

impl Default for TestDirectoryConf {
    fn default() -> Self {
        TestDirectoryConf {
            directory: String::from(DEFAULT_DIRECTORY),
            delete_after_test: false,
        }
    }
}

impl TestDirectoryConf {
    /// The configuration parser.
    /// Input starting with `{` or `[` is read as JSON, anything else as YAML.
    ///
    /// ```rust
    /// # use scratch_tester::TestDirectoryConf;
    /// let conf = TestDirectoryConf::parse("directory: target/test-files/docs\n").unwrap();
    /// assert_eq!("target/test-files/docs", conf.directory);
    /// assert!(!conf.delete_after_test);
    ///
    /// let conf = TestDirectoryConf::parse("{\"delete_after_test\": true}").unwrap();
    /// assert_eq!("target/test-files", conf.directory);
    /// assert!(conf.delete_after_test);
    /// ```
    pub fn parse(config_str: &str) -> Result<TestDirectoryConf> {
        let config_str = config_str.trim_start();
        match config_str.chars().next() {
            Some('{') | Some('[') => Ok(serde_json::from_str(config_str)?),
            Some(_) => Ok(serde_yaml::from_str(config_str)?),
            None => Err(TestDirectoryError::EmptyConfig),
        }
    }

    /// Applies the value of [`DELETE_AFTER_TEST_VAR_NAME`] when it is set to `Y` or `N`.
    pub fn with_env_overrides(mut self) -> Self {
        let value = std::env::var(DELETE_AFTER_TEST_VAR_NAME).ok();
        if let Some(delete) = delete_after_test_override(value) {
            self.delete_after_test = delete;
        }
        self
    }
}

fn delete_after_test_override(value: Option<String>) -> Option<bool> {
    match value.as_deref().map(str::trim) {
        Some("Y") | Some("y") => Some(true),
        Some("N") | Some("n") => Some(false),
        _ => None,
    }
}

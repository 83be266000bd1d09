//! Environment variable access.

use std::collections::HashMap;

/// Source of environment variables consulted by env references.
pub trait Environment: Send + Sync + std::fmt::Debug {
    /// Returns the value of `name`, or `None` if it is not set.
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads the process environment.
///
/// A variable that is set counts as present even when empty. Values that are
/// not valid unicode are converted lossily.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var_os(name).map(|value| value.to_string_lossy().into_owned())
    }
}

/// A fixed set of variables, independent of the process environment.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Environment for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_map_env() {
        let env: MapEnv = [("MY_ENV", "value 1")].into_iter().collect();
        assert_eq!(env.var("MY_ENV").as_deref(), Some("value 1"));
        assert_eq!(env.var("OTHER"), None);
    }

    #[test]
    #[serial]
    fn test_process_env_reads_set_and_unset() {
        temp_env::with_vars(
            [
                ("_DEFERRED_ENV_TEST_SET", Some("value 1")),
                ("_DEFERRED_ENV_TEST_UNSET", None),
            ],
            || {
                assert_eq!(
                    ProcessEnv.var("_DEFERRED_ENV_TEST_SET").as_deref(),
                    Some("value 1")
                );
                assert_eq!(ProcessEnv.var("_DEFERRED_ENV_TEST_UNSET"), None);
            },
        );
    }

    #[test]
    #[serial]
    fn test_process_env_empty_string_is_present() {
        temp_env::with_var("_DEFERRED_ENV_TEST_EMPTY", Some(""), || {
            assert_eq!(
                ProcessEnv.var("_DEFERRED_ENV_TEST_EMPTY").as_deref(),
                Some("")
            );
        });
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_process_env_non_unicode_is_present() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(&[0x66, 0x6f, 0xff]);
        temp_env::with_var("_DEFERRED_ENV_TEST_NON_UNICODE", Some(raw), || {
            assert_eq!(
                ProcessEnv.var("_DEFERRED_ENV_TEST_NON_UNICODE").as_deref(),
                Some("fo\u{FFFD}")
            );
        });
    }
}

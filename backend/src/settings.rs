//! Application configuration loaded via OrthoConfig.
//!
//! Values are layered from CLI flags, `TIMETRACKER_*` environment variables
//! and configuration files. Accessors supply the defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::PasswordPolicy;
use crate::domain::signup::{DEBUG_PASSWORD_MIN_LENGTH, RELEASE_PASSWORD_MIN_LENGTH};
use crate::outbound::persistence::DEFAULT_MAX_CONNECTIONS;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Build flavour, used to pick defaults and strictness.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Relaxed defaults for local development and tests.
    Debug,
    /// Production defaults.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use timetracker::settings::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    #[must_use]
    pub fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TIMETRACKER")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without one the in-memory store is used.
    pub database_url: Option<String>,
    /// Minimum owner password length in characters.
    pub password_min_length: Option<usize>,
    /// File holding at least 64 bytes of session key material.
    pub session_key_file: Option<PathBuf>,
    /// Mark session cookies `Secure`. Defaults to `true`.
    pub cookie_secure: Option<bool>,
    /// Permit a generated session key when the key file is missing.
    pub allow_ephemeral_session_key: Option<bool>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
}

impl AppSettings {
    /// Parsed bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    #[must_use]
    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    #[must_use]
    pub fn allow_ephemeral_session_key(&self) -> bool {
        self.allow_ephemeral_session_key.unwrap_or(false)
    }

    #[must_use]
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS)
    }

    /// Password policy for `mode`, honouring an explicit minimum.
    #[must_use]
    pub fn password_policy(&self, mode: BuildMode) -> PasswordPolicy {
        let default = if mode.is_debug() {
            DEBUG_PASSWORD_MIN_LENGTH
        } else {
            RELEASE_PASSWORD_MIN_LENGTH
        };
        PasswordPolicy::with_min_length(self.password_min_length.unwrap_or(default))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const KEYS: [&str; 7] = [
        "TIMETRACKER_BIND_ADDR",
        "TIMETRACKER_DATABASE_URL",
        "TIMETRACKER_PASSWORD_MIN_LENGTH",
        "TIMETRACKER_SESSION_KEY_FILE",
        "TIMETRACKER_COOKIE_SECURE",
        "TIMETRACKER_ALLOW_EPHEMERAL_SESSION_KEY",
        "TIMETRACKER_DB_MAX_CONNECTIONS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("timetracker")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(KEYS.map(|key| (key, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default address"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal address")
        );
        assert!(settings.database_url.is_none());
        assert!(settings.cookie_secure());
        assert!(!settings.allow_ephemeral_session_key());
        assert_eq!(settings.session_key_file(), PathBuf::from(DEFAULT_SESSION_KEY_FILE));
        assert_eq!(settings.db_max_connections(), DEFAULT_MAX_CONNECTIONS);
    }

    #[rstest]
    #[case(BuildMode::Debug, DEBUG_PASSWORD_MIN_LENGTH)]
    #[case(BuildMode::Release, RELEASE_PASSWORD_MIN_LENGTH)]
    fn password_minimum_follows_build_mode(#[case] mode: BuildMode, #[case] expected: usize) {
        let _guard = lock_env(KEYS.map(|key| (key, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.password_policy(mode).min_length(), expected);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("TIMETRACKER_BIND_ADDR", Some("127.0.0.1:3000".to_owned())),
            (
                "TIMETRACKER_DATABASE_URL",
                Some("postgres://localhost/timetracker".to_owned()),
            ),
            ("TIMETRACKER_PASSWORD_MIN_LENGTH", Some("12".to_owned())),
            ("TIMETRACKER_SESSION_KEY_FILE", Some("/tmp/key".to_owned())),
            ("TIMETRACKER_COOKIE_SECURE", Some("false".to_owned())),
            (
                "TIMETRACKER_ALLOW_EPHEMERAL_SESSION_KEY",
                Some("true".to_owned()),
            ),
            ("TIMETRACKER_DB_MAX_CONNECTIONS", Some("3".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("valid address").port(),
            3000
        );
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/timetracker")
        );
        assert_eq!(settings.password_policy(BuildMode::Release).min_length(), 12);
        assert_eq!(settings.session_key_file(), PathBuf::from("/tmp/key"));
        assert!(!settings.cookie_secure());
        assert!(settings.allow_ephemeral_session_key());
        assert_eq!(settings.db_max_connections(), 3);
    }

    #[rstest]
    fn malformed_bind_address_is_reported() {
        let _guard = lock_env([("TIMETRACKER_BIND_ADDR", Some("not-an-address".to_owned()))]);

        let settings = load_from_empty_args();
        let err = settings.bind_addr().expect_err("address should not parse");
        assert!(err.to_string().contains("not-an-address"));
    }
}

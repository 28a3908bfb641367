//! Session cookie settings derived from [`AppSettings`].
//!
//! The cookie session carries flash messages only, but it is still signed and
//! encrypted, so the key material is handled with `zeroize` hygiene.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use tracing::warn;
use zeroize::Zeroize;

use crate::settings::{AppSettings, BuildMode};

/// Minimum key length accepted by [`Key::derive_from`].
pub const SESSION_KEY_MIN_LEN: usize = 64;

/// Session settings handed to the server builder.
pub struct SessionSettings {
    /// Signing and encryption key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// `SameSite` policy for session cookies.
    pub same_site: SameSite,
}

/// Errors raised while preparing session settings.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The session key file is shorter than [`SESSION_KEY_MIN_LEN`].
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

/// Build session settings from loaded configuration.
///
/// A missing key file falls back to a generated key in debug builds, or in
/// release builds when `allow_ephemeral_session_key` is set. Sessions signed
/// with a generated key do not survive a restart.
pub fn session_settings(
    settings: &AppSettings,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    if !settings.cookie_secure() && !mode.is_debug() {
        warn!("session cookies are not marked Secure");
    }
    let key = session_key(
        settings.session_key_file(),
        mode.is_debug() || settings.allow_ephemeral_session_key(),
    )?;
    Ok(SessionSettings {
        key,
        cookie_secure: settings.cookie_secure(),
        same_site: SameSite::Lax,
    })
}

fn session_key(path: PathBuf, allow_ephemeral: bool) -> Result<Key, SessionConfigError> {
    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key"
            );
            Ok(Key::generate())
        }
        Err(error) => Err(SessionConfigError::KeyRead {
            path,
            source: error,
        }),
    }
}

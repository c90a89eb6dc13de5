//! Environment variable guards for tests.
//!
//! Documents are mirrored into `CONFIG` and CLI settings are read from
//! `TN_*` variables, so tests touching either must not overlap. Every
//! mutation takes a process-wide re-entrant lock and returns a guard that
//! restores the previous value on drop, re-taking the lock to do so.
//!
//! Guards for the same key restore in LIFO order. Use [`lock`] to keep the
//! environment to yourself across several operations.
//!
//! # Examples
//!
//! ```
//! use test_helpers::env;
//!
//! let _verbose = env::set_var("TN_VERBOSE", "true");
//! assert_eq!(std::env::var("TN_VERBOSE").ok().as_deref(), Some("true"));
//! ```

use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::LazyLock;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// Restores one environment variable to its earlier state when dropped.
#[must_use = "dropping restores the prior value"]
pub struct EnvVarGuard {
    key: String,
    original: Option<OsString>,
}

impl fmt::Debug for EnvVarGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvVarGuard")
            .field("key", &self.key)
            .field("had_original", &self.original.is_some())
            .finish()
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let _held = ENV_MUTEX.lock();
        match self.original.take() {
            // SAFETY: every mutation made through this module holds ENV_MUTEX.
            Some(value) => unsafe { env::set_var(&self.key, value) },
            // SAFETY: as above.
            None => unsafe { env::remove_var(&self.key) },
        }
    }
}

/// Exclusive access to the environment for as long as it lives.
#[must_use = "dropping releases the environment lock"]
pub struct EnvVarLock {
    _held: ReentrantMutexGuard<'static, ()>,
}

impl fmt::Debug for EnvVarLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvVarLock").finish_non_exhaustive()
    }
}

impl EnvVarLock {
    /// Set `key` while holding this lock.
    pub fn set_var<K, V>(&self, key: K, value: V) -> EnvVarGuard
    where
        K: Into<String>,
        V: AsRef<OsStr>,
    {
        set_var(key, value)
    }

    /// Remove `key` while holding this lock.
    pub fn remove_var<K: Into<String>>(&self, key: K) -> EnvVarGuard {
        remove_var(key)
    }
}

fn mutate<F: FnOnce(&str)>(key: String, mutation: F) -> EnvVarGuard {
    let _held = ENV_MUTEX.lock();
    let original = env::var_os(&key);
    mutation(&key);
    EnvVarGuard { key, original }
}

/// Set `key` to `value` until the returned guard is dropped.
pub fn set_var<K, V>(key: K, value: V) -> EnvVarGuard
where
    K: Into<String>,
    V: AsRef<OsStr>,
{
    // SAFETY: `mutate` holds ENV_MUTEX for the duration of the call.
    mutate(key.into(), |k| unsafe { env::set_var(k, value.as_ref()) })
}

/// Unset `key` until the returned guard is dropped.
///
/// # Examples
///
/// ```
/// use test_helpers::env;
///
/// let _gone = env::remove_var("CONFIG");
/// assert!(std::env::var_os("CONFIG").is_none());
/// ```
pub fn remove_var<K: Into<String>>(key: K) -> EnvVarGuard {
    // SAFETY: `mutate` holds ENV_MUTEX for the duration of the call.
    mutate(key.into(), |k| unsafe { env::remove_var(k) })
}

/// Take the environment lock until the returned guard is dropped.
///
/// Code under test that writes the environment itself, rather than through
/// this module, should run while the lock is held.
///
/// # Examples
///
/// ```
/// use test_helpers::env;
///
/// let lock = env::lock();
/// let _config = lock.remove_var("CONFIG");
/// // Nothing else touches the environment until `lock` is dropped.
/// ```
pub fn lock() -> EnvVarLock {
    EnvVarLock {
        _held: ENV_MUTEX.lock(),
    }
}

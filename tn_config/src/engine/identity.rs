//! Cache of component results keyed by target path and identity token.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

use parking_lot::ReentrantMutex;
use serde_json::Value;
use tracing::debug;

use crate::{Resolved, TnResult};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct IdentityKey {
    target: String,
    token: String,
}

impl IdentityKey {
    /// Tokens are keyed by their JSON rendering so `1` and `"1"` differ.
    fn new(target: &str, token: &Value) -> Self {
        Self {
            target: target.to_owned(),
            token: token.to_string(),
        }
    }
}

/// Shared cache of identity-tagged component results.
///
/// A marker mapping carrying an `_id_` token is instantiated at most once
/// per `(target, token)` pair; later occurrences receive the cached value.
/// The cache is an ordinary value owned by an [`Engine`](crate::Engine) or
/// shared between engines through an [`Arc`](std::sync::Arc).
///
/// The lock is re-entrant and held while a missing entry is constructed, so
/// nested markers resolved during construction can still consult the cache
/// while concurrent callers wait.
#[derive(Default)]
pub struct IdentityRegistry {
    entries: ReentrantMutex<RefCell<HashMap<IdentityKey, Resolved>>>,
}

impl IdentityRegistry {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `target` and `token`, if any.
    #[must_use]
    pub fn get(&self, target: &str, token: &Value) -> Option<Resolved> {
        self.entries
            .lock()
            .borrow()
            .get(&IdentityKey::new(target, token))
            .cloned()
    }

    /// Returns the cached value or builds, stores and returns a new one.
    ///
    /// `build` runs with the lock held. It is not called on a cache hit, and
    /// nothing is stored when it fails.
    pub(crate) fn get_or_try_insert_with<F>(
        &self,
        target: &str,
        token: &Value,
        build: F,
    ) -> TnResult<Resolved>
    where
        F: FnOnce() -> TnResult<Resolved>,
    {
        let key = IdentityKey::new(target, token);
        let guard = self.entries.lock();
        let cached = guard.borrow().get(&key).cloned();
        if let Some(hit) = cached {
            debug!(component = target, identity = %key.token, "identity cache hit");
            return Ok(hit);
        }
        let value = build()?;
        guard.borrow_mut().insert(key, value.clone());
        Ok(value)
    }

    /// Number of cached identities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().borrow().len()
    }

    /// Returns `true` when nothing has been cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached value.
    pub fn clear(&self) {
        self.entries.lock().borrow_mut().clear();
    }
}

impl fmt::Debug for IdentityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityRegistry")
            .field("len", &self.len())
            .finish()
    }
}

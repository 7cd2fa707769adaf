// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token storage.
//!
//! On device the token lives in secure storage owned by the host app. The
//! client only needs to read it per request and drop it when the API rejects
//! it.

use std::sync::{PoisonError, RwLock, RwLockWriteGuard};

use tracing::warn;

/// Source of the bearer token attached to API requests.
pub trait TokenStore: Send + Sync {
    /// Current token, if the user is signed in.
    fn token(&self) -> Option<String>;

    /// Forget the token after the API rejected it.
    fn clear(&self);
}

/// Process-local token store.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl InMemoryTokenStore {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: RwLock::new(token),
        }
    }

    pub fn set(&self, token: impl Into<String>) {
        *self.write() = Some(token.into());
    }

    /// Recovers the guard if a writer panicked.
    fn write(&self) -> RwLockWriteGuard<'_, Option<String>> {
        self.token.write().unwrap_or_else(|poisoned| {
            warn!("token store lock poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

impl TokenStore for InMemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn clear(&self) {
        *self.write() = None;
    }
}

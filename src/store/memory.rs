// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Volatile position store.

use std::io;
use std::sync::Arc;

use parking_lot::Mutex;

use super::PositionStore;
use crate::error::StoreError;
use crate::types::Position;

#[derive(Debug, Default)]
struct Inner {
    value: Option<Position>,
    history: Vec<Position>,
    failing: bool,
}

/// Store that keeps the position in memory.
///
/// Clones share the same value. Every successful save is also appended to a
/// history, so callers can check how often the position was written.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `position`.
    #[must_use]
    pub fn with_position(position: Position) -> Self {
        let store = Self::new();
        store.inner.lock().value = Some(position);
        store
    }

    /// Returns every saved value, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<Position> {
        self.inner.lock().history.clone()
    }

    /// Makes subsequent saves fail.
    pub fn set_failing(&self, failing: bool) {
        self.inner.lock().failing = failing;
    }
}

impl PositionStore for MemoryStore {
    fn load(&self) -> Result<Option<Position>, StoreError> {
        Ok(self.inner.lock().value)
    }

    fn save(&self, position: Position) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        if inner.failing {
            return Err(StoreError::Io(io::Error::other("store is read-only")));
        }
        inner.value = Some(position);
        inner.history.push(position);
        Ok(())
    }
}

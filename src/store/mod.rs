// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Persistence of the last accepted target position.
//!
//! The store holds a single integer record. It is read once at startup and
//! written each time a motion run is committed, before the motor starts.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::StoreError;
use crate::types::Position;

/// Fixed identifier of the persisted position record.
pub const POSITION_KEY: &str = "CoverPositionState";

/// Durable storage for one position value.
pub trait PositionStore: Send + Sync + 'static {
    /// Returns the saved position, or `None` if nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be read.
    fn load(&self) -> Result<Option<Position>, StoreError>;

    /// Saves the position, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the value cannot be written.
    fn save(&self, position: Position) -> Result<(), StoreError>;
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for covering state subscriptions.
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry storing and dispatching callbacks

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::state::StateChange;
use crate::types::{Position, PositionState, PowerState};

/// Unique identifier for a subscription.
///
/// IDs are unique within a covering's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

type PositionCallback = Arc<dyn Fn(Position) + Send + Sync>;

type PositionStateCallback = Arc<dyn Fn(PositionState) + Send + Sync>;

type PowerCallback = Arc<dyn Fn(PowerState) + Send + Sync>;

type StateChangedCallback = Arc<dyn Fn(&StateChange) + Send + Sync>;

/// Registry for covering subscription callbacks.
///
/// Thread-safe through `parking_lot::RwLock`; callbacks are wrapped in `Arc`
/// so dispatch can clone them out before calling. Callbacks run on whichever
/// task produced the change and must not block.
pub struct CallbackRegistry {
    next_id: AtomicU64,
    current_position_callbacks: RwLock<HashMap<SubscriptionId, PositionCallback>>,
    position_state_callbacks: RwLock<HashMap<SubscriptionId, PositionStateCallback>>,
    target_position_callbacks: RwLock<HashMap<SubscriptionId, PositionCallback>>,
    power_callbacks: RwLock<HashMap<SubscriptionId, PowerCallback>>,
    /// Receives every change, including batches as a whole.
    state_changed_callbacks: RwLock<HashMap<SubscriptionId, StateChangedCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            current_position_callbacks: RwLock::new(HashMap::new()),
            position_state_callbacks: RwLock::new(HashMap::new()),
            target_position_callbacks: RwLock::new(HashMap::new()),
            power_callbacks: RwLock::new(HashMap::new()),
            state_changed_callbacks: RwLock::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    // =========================================================================
    // Registration methods
    // =========================================================================

    /// Registers a callback for settled position changes.
    pub fn on_current_position_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Position) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.current_position_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for motion state changes.
    pub fn on_position_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PositionState) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.position_state_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for committed target changes.
    pub fn on_target_position_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Position) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.target_position_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for power supply changes.
    pub fn on_power_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PowerState) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.power_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for all state changes.
    pub fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.state_changed_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    // =========================================================================
    // Unsubscription
    // =========================================================================

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.current_position_callbacks.write().remove(&id).is_some()
            || self.position_state_callbacks.write().remove(&id).is_some()
            || self.target_position_callbacks.write().remove(&id).is_some()
            || self.power_callbacks.write().remove(&id).is_some()
            || self.state_changed_callbacks.write().remove(&id).is_some()
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Dispatches a state change to the matching callbacks.
    ///
    /// Generic callbacks see the change once; batches are then dispatched
    /// member by member to the specific callbacks, in order.
    pub fn dispatch(&self, change: &StateChange) {
        let generic: Vec<_> = self.state_changed_callbacks.read().values().cloned().collect();
        for callback in generic {
            callback(change);
        }
        self.dispatch_specific(change);
    }

    fn dispatch_specific(&self, change: &StateChange) {
        match change {
            StateChange::CurrentPosition(position) => {
                let callbacks: Vec<_> = self
                    .current_position_callbacks
                    .read()
                    .values()
                    .cloned()
                    .collect();
                for callback in callbacks {
                    callback(*position);
                }
            }
            StateChange::PositionState(state) => {
                let callbacks: Vec<_> = self
                    .position_state_callbacks
                    .read()
                    .values()
                    .cloned()
                    .collect();
                for callback in callbacks {
                    callback(*state);
                }
            }
            StateChange::TargetPosition(position) => {
                let callbacks: Vec<_> = self
                    .target_position_callbacks
                    .read()
                    .values()
                    .cloned()
                    .collect();
                for callback in callbacks {
                    callback(*position);
                }
            }
            StateChange::Power(state) => {
                let callbacks: Vec<_> = self.power_callbacks.read().values().cloned().collect();
                for callback in callbacks {
                    callback(*state);
                }
            }
            StateChange::Batch(changes) => {
                for nested in changes {
                    self.dispatch_specific(nested);
                }
            }
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.current_position_callbacks.read().len()
            + self.position_state_callbacks.read().len()
            + self.target_position_callbacks.read().len()
            + self.power_callbacks.read().len()
            + self.state_changed_callbacks.read().len()
    }

    /// Returns `true` if no callbacks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callbacks", &self.len())
            .finish_non_exhaustive()
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for coverings that push state changes.

use crate::state::StateChange;
use crate::subscription::SubscriptionId;
use crate::types::{Position, PositionState, PowerState};

/// Trait for types that push state changes to subscribers.
///
/// This is how a host framework learns about characteristic updates
/// without polling.
///
/// # Examples
///
/// ```no_run
/// use timed_cover::config::CoverConfig;
/// use timed_cover::subscription::Subscribable;
/// use timed_cover::WindowCovering;
///
/// # fn example(config: CoverConfig) -> timed_cover::Result<()> {
/// let covering = WindowCovering::http(config).build()?;
///
/// let sub_id = covering.on_current_position_changed(|position| {
///     println!("Settled at {position}");
/// });
///
/// covering.unsubscribe(sub_id);
/// # Ok(())
/// # }
/// ```
pub trait Subscribable {
    /// Subscribes to settled position changes.
    fn on_current_position_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Position) + Send + Sync + 'static;

    /// Subscribes to motion state changes.
    fn on_position_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PositionState) + Send + Sync + 'static;

    /// Subscribes to committed target changes.
    fn on_target_position_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Position) + Send + Sync + 'static;

    /// Subscribes to power supply changes.
    ///
    /// Only confirmed transitions are reported; a failed power command
    /// produces no callback.
    fn on_power_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PowerState) + Send + Sync + 'static;

    /// Subscribes to all state changes.
    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static;

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! State changes are emitted by the controllers whenever an observable
//! field moves, and can be applied to a [`CoverState`](super::CoverState)
//! mirror kept on the host side.
//!
//! # Examples
//!
//! ```
//! use timed_cover::state::{CoverState, StateChange};
//! use timed_cover::types::{Position, PositionState};
//!
//! let mut state = CoverState::new(Position::CLOSED);
//!
//! let changed = state.apply(&StateChange::PositionState(PositionState::Increasing));
//! assert!(changed);
//!
//! // Applying the same change again returns false
//! let changed = state.apply(&StateChange::PositionState(PositionState::Increasing));
//! assert!(!changed);
//! ```

use crate::device::Characteristic;
use crate::types::{Position, PositionState, PowerState};

/// Represents a change in covering state.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StateChange {
    /// The settled position changed.
    CurrentPosition(Position),

    /// The motion state changed.
    PositionState(PositionState),

    /// The committed target changed.
    TargetPosition(Position),

    /// The main power supply changed.
    Power(PowerState),

    /// Multiple changes at once.
    Batch(Vec<StateChange>),
}

impl StateChange {
    /// Creates a batch of changes.
    #[must_use]
    pub fn batch(changes: Vec<StateChange>) -> Self {
        Self::Batch(changes)
    }

    /// Returns the characteristic updates carried by this change.
    ///
    /// Power changes carry none; batches are flattened in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use timed_cover::device::Characteristic;
    /// use timed_cover::state::StateChange;
    /// use timed_cover::types::{Position, PositionState};
    ///
    /// let change = StateChange::batch(vec![
    ///     StateChange::PositionState(PositionState::Stopped),
    ///     StateChange::CurrentPosition(Position::OPEN),
    /// ]);
    /// assert_eq!(
    ///     change.characteristic_updates(),
    ///     vec![
    ///         (Characteristic::PositionState, 2),
    ///         (Characteristic::CurrentPosition, 100),
    ///     ]
    /// );
    /// ```
    #[must_use]
    pub fn characteristic_updates(&self) -> Vec<(Characteristic, u8)> {
        match self {
            Self::CurrentPosition(p) => vec![(Characteristic::CurrentPosition, p.value())],
            Self::PositionState(s) => vec![(Characteristic::PositionState, s.as_num())],
            Self::TargetPosition(p) => vec![(Characteristic::TargetPosition, p.value())],
            Self::Power(_) => Vec::new(),
            Self::Batch(changes) => changes
                .iter()
                .flat_map(Self::characteristic_updates)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn characteristic_updates_skip_power() {
        let batch = StateChange::batch(vec![
            StateChange::Power(PowerState::Off),
            StateChange::TargetPosition(Position::new(55).unwrap()),
        ]);
        assert_eq!(
            batch.characteristic_updates(),
            vec![(Characteristic::TargetPosition, 55)]
        );
    }

    #[test]
    fn serializes_with_variant_name() {
        let json = serde_json::to_string(&StateChange::CurrentPosition(Position::OPEN)).unwrap();
        assert_eq!(json, r#"{"CurrentPosition":100}"#);
    }
}

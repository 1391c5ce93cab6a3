// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Observable covering state.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::StateChange;
use crate::types::{Position, PositionState, PowerState};

/// Phase of the motion state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MotionPhase {
    /// No motion pending or active.
    #[default]
    Idle,
    /// A start timer is armed and may still be replaced.
    PendingStart,
    /// The motor is running and a stop timer is armed.
    Moving,
}

impl fmt::Display for MotionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::PendingStart => "pending-start",
            Self::Moving => "moving",
        };
        f.write_str(s)
    }
}

/// Snapshot of everything a covering exposes.
///
/// `current_position` is the last settled position. It only changes when a
/// motion run completes. `target_position` is the last committed target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverState {
    current_position: Position,
    target_position: Position,
    position_state: PositionState,
    power: PowerState,
    phase: MotionPhase,
}

impl CoverState {
    /// Creates a stopped, unpowered state settled at `position`.
    #[must_use]
    pub fn new(position: Position) -> Self {
        Self {
            current_position: position,
            target_position: position,
            position_state: PositionState::Stopped,
            power: PowerState::Off,
            phase: MotionPhase::Idle,
        }
    }

    pub(crate) fn from_parts(
        current_position: Position,
        target_position: Position,
        position_state: PositionState,
        power: PowerState,
        phase: MotionPhase,
    ) -> Self {
        Self {
            current_position,
            target_position,
            position_state,
            power,
            phase,
        }
    }

    /// Last settled position.
    #[must_use]
    pub fn current_position(&self) -> Position {
        self.current_position
    }

    /// Last committed target.
    #[must_use]
    pub fn target_position(&self) -> Position {
        self.target_position
    }

    /// Motion state.
    #[must_use]
    pub fn position_state(&self) -> PositionState {
        self.position_state
    }

    /// Main power supply state.
    #[must_use]
    pub fn power(&self) -> PowerState {
        self.power
    }

    /// Motion phase.
    ///
    /// Not carried by [`StateChange`]; mirrors built with [`CoverState::new`]
    /// keep whatever phase they started with.
    #[must_use]
    pub fn phase(&self) -> MotionPhase {
        self.phase
    }

    /// Returns true while the motor is running.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.position_state.is_moving()
    }

    /// Applies a change, returning `true` if anything changed.
    pub fn apply(&mut self, change: &StateChange) -> bool {
        match change {
            StateChange::CurrentPosition(p) => replace(&mut self.current_position, *p),
            StateChange::TargetPosition(p) => replace(&mut self.target_position, *p),
            StateChange::PositionState(s) => replace(&mut self.position_state, *s),
            StateChange::Power(p) => replace(&mut self.power, *p),
            StateChange::Batch(changes) => changes
                .iter()
                .fold(false, |changed, c| self.apply(c) || changed),
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

impl Default for CoverState {
    fn default() -> Self {
        Self::new(Position::CLOSED)
    }
}

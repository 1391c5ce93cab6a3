// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Motion state and travel direction.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;
use crate::types::Position;

/// Motion state reported through the `PositionState` characteristic.
///
/// The numeric encoding matches the host characteristic:
/// 0 = decreasing (moving down), 1 = increasing (moving up), 2 = stopped.
///
/// # Examples
///
/// ```
/// use timed_cover::types::PositionState;
///
/// assert_eq!(PositionState::Stopped.as_num(), 2);
/// assert_eq!(PositionState::try_from(1).unwrap(), PositionState::Increasing);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PositionState {
    /// Moving down, position decreasing.
    Decreasing,
    /// Moving up, position increasing.
    Increasing,
    /// Not moving.
    #[default]
    Stopped,
}

impl PositionState {
    /// Returns the numeric value used by the host characteristic.
    #[must_use]
    pub const fn as_num(&self) -> u8 {
        match self {
            Self::Decreasing => 0,
            Self::Increasing => 1,
            Self::Stopped => 2,
        }
    }

    /// Returns true while a motion run is active.
    #[must_use]
    pub const fn is_moving(&self) -> bool {
        !matches!(self, Self::Stopped)
    }
}

impl fmt::Display for PositionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Decreasing => "decreasing",
            Self::Increasing => "increasing",
            Self::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

impl TryFrom<u8> for PositionState {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Decreasing),
            1 => Ok(Self::Increasing),
            2 => Ok(Self::Stopped),
            other => Err(ValueError::InvalidPositionState(other)),
        }
    }
}

impl From<Direction> for PositionState {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::Increasing,
            Direction::Down => Self::Decreasing,
        }
    }
}

/// Direction of a motion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Opening, towards 100.
    Up,
    /// Closing, towards 0.
    Down,
}

impl Direction {
    /// Direction needed to travel from `from` to `to`.
    ///
    /// Equal positions count as `Up`.
    #[must_use]
    pub fn between(from: Position, to: Position) -> Self {
        if to >= from { Self::Up } else { Self::Down }
    }

    /// Human-readable verb used in log output.
    #[must_use]
    pub const fn as_verb(&self) -> &'static str {
        match self {
            Self::Up => "opening",
            Self::Down => "closing",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_verb())
    }
}

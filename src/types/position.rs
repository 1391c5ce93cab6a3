// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Covering position as a percentage of travel.
//!
//! Positions follow the closed-to-open convention: 0 is fully closed
//! (down) and 100 is fully open (up).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Position of the covering as a percentage (0-100).
///
/// # Examples
///
/// ```
/// use timed_cover::types::Position;
///
/// let half = Position::new(50).unwrap();
/// assert_eq!(half.value(), 50);
///
/// assert_eq!(Position::CLOSED.value(), 0);
/// assert_eq!(Position::OPEN.value(), 100);
///
/// assert!(Position::new(101).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Position(u8);

impl Position {
    /// Fully closed (down).
    pub const CLOSED: Self = Self(0);

    /// Fully open (up).
    pub const OPEN: Self = Self(100);

    /// Creates a new position.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value exceeds 100.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > 100 {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: 100,
                actual: u16::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Returns the percentage value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Returns true for the travel extremes (0 or 100).
    ///
    /// Moves ending at an extreme get the end-position settle delay.
    #[must_use]
    pub const fn is_extreme(&self) -> bool {
        self.0 == 0 || self.0 == 100
    }

    /// Number of percentage points between two positions.
    #[must_use]
    pub const fn distance(&self, other: Self) -> u8 {
        self.0.abs_diff(other.0)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<u8> for Position {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Position> for u8 {
    fn from(position: Position) -> Self {
        position.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_rejects_values_above_100() {
        assert!(Position::new(100).is_ok());
        assert_eq!(
            Position::new(101),
            Err(ValueError::OutOfRange {
                min: 0,
                max: 100,
                actual: 101
            })
        );
    }

    #[test]
    fn position_extremes() {
        assert!(Position::CLOSED.is_extreme());
        assert!(Position::OPEN.is_extreme());
        assert!(!Position::new(1).unwrap().is_extreme());
        assert!(!Position::new(99).unwrap().is_extreme());
    }

    #[test]
    fn position_distance_is_symmetric() {
        let a = Position::new(30).unwrap();
        let b = Position::new(90).unwrap();
        assert_eq!(a.distance(b), 60);
        assert_eq!(b.distance(a), 60);
        assert_eq!(a.distance(a), 0);
    }

    #[test]
    fn position_display() {
        assert_eq!(Position::new(75).unwrap().to_string(), "75%");
    }

    #[test]
    fn position_deserialize_validates() {
        let ok: Position = serde_json::from_str("64").unwrap();
        assert_eq!(ok.value(), 64);
        assert!(serde_json::from_str::<Position>("150").is_err());
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;

/// Characteristics exposed to the host automation framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Characteristic {
    /// Last settled position, 0-100. Read-only.
    CurrentPosition,
    /// Motion state: 0 decreasing, 1 increasing, 2 stopped. Read-only.
    PositionState,
    /// Requested position, 0-100. Writable.
    TargetPosition,
}

impl Characteristic {
    /// All characteristics in registration order.
    pub const ALL: [Self; 3] = [
        Self::CurrentPosition,
        Self::PositionState,
        Self::TargetPosition,
    ];

    /// Returns the characteristic name as the host knows it.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CurrentPosition => "CurrentPosition",
            Self::PositionState => "PositionState",
            Self::TargetPosition => "TargetPosition",
        }
    }

    /// Returns `true` if the host may write this characteristic.
    #[must_use]
    pub const fn is_writable(self) -> bool {
        matches!(self, Self::TargetPosition)
    }
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_target_is_writable() {
        let writable: Vec<_> = Characteristic::ALL
            .into_iter()
            .filter(|c| c.is_writable())
            .collect();
        assert_eq!(writable, vec![Characteristic::TargetPosition]);
    }

    #[test]
    fn display_uses_host_name() {
        assert_eq!(Characteristic::PositionState.to_string(), "PositionState");
    }
}

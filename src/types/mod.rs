// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for the covering model.
//!
//! - [`Position`]: travel percentage, validated to 0-100
//! - [`PositionState`] and [`Direction`]: motion state and direction
//! - [`PowerState`]: main power supply state
//! - [`HttpMethod`]: method used for actuator commands

mod method;
mod position;
mod position_state;
mod power;

pub use method::HttpMethod;
pub use position::Position;
pub use position_state::{Direction, PositionState};
pub use power::PowerState;

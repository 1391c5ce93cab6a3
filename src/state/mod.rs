// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Covering state types.
//!
//! [`CoverState`] is a snapshot of the observable fields, while
//! [`StateChange`] represents a single change pushed to subscribers.
//!
//! # Examples
//!
//! ```
//! use timed_cover::state::{CoverState, StateChange};
//! use timed_cover::types::Position;
//!
//! let mut state = CoverState::new(Position::CLOSED);
//! state.apply(&StateChange::CurrentPosition(Position::OPEN));
//!
//! assert_eq!(state.current_position(), Position::OPEN);
//! ```

mod cover_state;
mod state_change;

pub use cover_state::{CoverState, MotionPhase};
pub use state_change::StateChange;

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Controllers turning target requests into timed actuator commands.
//!
//! - [`MotionController`]: the debounce / move / settle state machine
//! - [`PowerController`]: idempotent switching of the main power supply
//! - [`TimerHandle`]: cancelable token for a scheduled callback

mod motion;
mod power;
mod timer;

pub use motion::{MotionController, RequestOutcome};
pub use power::PowerController;
pub use timer::TimerHandle;

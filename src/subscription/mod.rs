// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for covering state changes.
//!
//! The controllers push every observable change through a
//! [`CallbackRegistry`]. A host framework subscribes through the
//! [`Subscribable`] trait and forwards the values to its own
//! characteristic-update sink.

mod callback;
mod subscribable;

pub use callback::{CallbackRegistry, SubscriptionId};
pub use subscribable::Subscribable;

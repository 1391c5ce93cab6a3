// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Main power supply sequencing.
//!
//! The motor is fed by a switchable power supply. Power is switched on
//! before a motion run and off after it settles. Transitions are
//! fire-and-forget: the request is sent in the background and the
//! [`PowerState`] only flips once the actuator confirms it. A failed send
//! leaves the state where it was.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;

use crate::protocol::{Command, CommandRequest, Transport};
use crate::state::StateChange;
use crate::subscription::CallbackRegistry;
use crate::types::PowerState;

#[derive(Debug, Default)]
struct PowerSlot {
    state: PowerState,
    in_flight: Option<PowerState>,
}

struct PowerInner<T: Transport> {
    transport: Arc<T>,
    power_on: CommandRequest,
    power_off: CommandRequest,
    callbacks: Arc<CallbackRegistry>,
    runtime: Handle,
    slot: Mutex<PowerSlot>,
}

/// Idempotent switch for the main power supply.
///
/// Each actual transition costs exactly one transport call. Asking for the
/// state the supply is already in, or already being switched to, sends
/// nothing.
pub struct PowerController<T: Transport> {
    inner: Arc<PowerInner<T>>,
}

impl<T: Transport> Clone for PowerController<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Transport> std::fmt::Debug for PowerController<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = self.inner.slot.lock();
        f.debug_struct("PowerController")
            .field("state", &slot.state)
            .field("in_flight", &slot.in_flight)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> PowerController<T> {
    /// Creates a controller for a supply that is initially off.
    pub fn new(
        transport: Arc<T>,
        power_on: CommandRequest,
        power_off: CommandRequest,
        callbacks: Arc<CallbackRegistry>,
        runtime: Handle,
    ) -> Self {
        debug_assert_eq!(power_on.command, Command::PowerOn);
        debug_assert_eq!(power_off.command, Command::PowerOff);
        Self {
            inner: Arc::new(PowerInner {
                transport,
                power_on,
                power_off,
                callbacks,
                runtime,
                slot: Mutex::new(PowerSlot::default()),
            }),
        }
    }

    /// Returns the last confirmed power state.
    #[must_use]
    pub fn state(&self) -> PowerState {
        self.inner.slot.lock().state
    }

    /// Returns the transition currently waiting for a response, if any.
    #[must_use]
    pub fn in_flight(&self) -> Option<PowerState> {
        self.inner.slot.lock().in_flight
    }

    /// Switches the supply on unless it already is.
    ///
    /// Returns `true` if a power-on command was sent.
    pub fn ensure_on(&self) -> bool {
        self.ensure(PowerState::On)
    }

    /// Switches the supply off unless it already is.
    ///
    /// Returns `true` if a power-off command was sent.
    pub fn ensure_off(&self) -> bool {
        self.ensure(PowerState::Off)
    }

    fn ensure(&self, target: PowerState) -> bool {
        {
            let mut slot = self.inner.slot.lock();
            if slot.in_flight == Some(target) {
                return false;
            }
            // A pending opposite transition may still land after this one,
            // so only a settled state counts as already matching.
            if slot.in_flight.is_none() && slot.state == target {
                return false;
            }
            slot.in_flight = Some(target);
        }

        let verb = if target.is_on() { "on" } else { "off" };
        tracing::info!("Switching {verb} main power supply");

        let inner = Arc::clone(&self.inner);
        self.inner.runtime.spawn(async move {
            let request = match target {
                PowerState::On => &inner.power_on,
                PowerState::Off => &inner.power_off,
            };
            let result = inner.transport.send(request).await;
            if let Err(e) = &result {
                tracing::error!(
                    command = %request.command,
                    method = %request.method,
                    url = %request.url,
                    error = %e,
                    "Power command failed, state left unchanged"
                );
            }
            inner.complete(target, result.is_ok());
        });
        true
    }
}

impl<T: Transport> PowerInner<T> {
    fn complete(&self, target: PowerState, succeeded: bool) {
        let changed = {
            let mut slot = self.slot.lock();
            if slot.in_flight == Some(target) {
                slot.in_flight = None;
            }
            if succeeded && slot.state != target {
                slot.state = target;
                true
            } else {
                false
            }
        };
        if changed {
            self.callbacks.dispatch(&StateChange::Power(target));
        }
    }
}

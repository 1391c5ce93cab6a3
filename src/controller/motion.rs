// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Motion state machine.
//!
//! A target request goes through three phases:
//!
//! 1. **Pending start**: a debounce timer is armed. A newer request cancels
//!    it and arms its own, so a burst of requests yields one motion run.
//! 2. **Moving**: the start command has been sent and a stop timer is armed
//!    for the computed travel time. The run cannot be cancelled or
//!    retargeted; requests arriving now are acknowledged but not scheduled.
//! 3. **Settled**: the stop command has been sent and the current position
//!    is set to the target. Power is switched off after a grace delay.
//!
//! Position is never measured. The current position only jumps from the
//! old settled value to the new one when the stop timer fires.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;

use super::power::PowerController;
use super::timer::TimerHandle;
use crate::config::{CoverConfig, Endpoints, Timing};
use crate::protocol::{Command, CommandRequest, Transport};
use crate::state::{CoverState, MotionPhase, StateChange};
use crate::store::PositionStore;
use crate::subscription::CallbackRegistry;
use crate::types::{Direction, HttpMethod, Position, PositionState};

/// What happened to a target request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestOutcome {
    /// The target equals the settled position; nothing was done.
    Unchanged,
    /// A motion run was scheduled after the debounce window.
    Scheduled,
    /// A motion run is in progress; the request was acknowledged only.
    Deferred,
}

struct PendingStart {
    timer: TimerHandle,
    generation: u64,
    target: Position,
}

struct GraceTimer {
    timer: TimerHandle,
    run: u64,
}

struct MotionCore {
    last_position: Position,
    target_position: Position,
    position_state: PositionState,
    pending: Option<PendingStart>,
    stop_timer: Option<TimerHandle>,
    grace: Option<GraceTimer>,
    generation: u64,
    runs: u64,
}

impl MotionCore {
    fn phase(&self) -> MotionPhase {
        if self.stop_timer.is_some() {
            MotionPhase::Moving
        } else if self.pending.is_some() {
            MotionPhase::PendingStart
        } else {
            MotionPhase::Idle
        }
    }
}

struct MotionInner<T: Transport> {
    timing: Timing,
    method: HttpMethod,
    endpoints: Endpoints,
    transport: Arc<T>,
    store: Arc<dyn PositionStore>,
    power: PowerController<T>,
    callbacks: Arc<CallbackRegistry>,
    runtime: Handle,
    core: Mutex<MotionCore>,
}

/// Drives the motor through timed start and stop commands.
///
/// All mutation happens under one lock, either from
/// [`request_target`](Self::request_target) or from a timer callback, so the
/// controller behaves as a single actor. Commands are sent from background
/// tasks; neither the timers nor the caller wait for responses.
pub struct MotionController<T: Transport> {
    inner: Arc<MotionInner<T>>,
}

impl<T: Transport> Clone for MotionController<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Transport> std::fmt::Debug for MotionController<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotionController")
            .field("state", &self.snapshot())
            .finish_non_exhaustive()
    }
}

impl<T: Transport> MotionController<T> {
    /// Creates a controller settled at `initial`.
    ///
    /// Background tasks and timers are spawned on `runtime`.
    pub fn new(
        config: &CoverConfig,
        transport: Arc<T>,
        store: Arc<dyn PositionStore>,
        callbacks: Arc<CallbackRegistry>,
        runtime: Handle,
        initial: Position,
    ) -> Self {
        let power = PowerController::new(
            Arc::clone(&transport),
            CommandRequest::resolve(Command::PowerOn, config.http_method, &config.endpoints),
            CommandRequest::resolve(Command::PowerOff, config.http_method, &config.endpoints),
            Arc::clone(&callbacks),
            runtime.clone(),
        );

        Self {
            inner: Arc::new(MotionInner {
                timing: config.timing.clone(),
                method: config.http_method,
                endpoints: config.endpoints.clone(),
                transport,
                store,
                power,
                callbacks,
                runtime,
                core: Mutex::new(MotionCore {
                    last_position: initial,
                    target_position: initial,
                    position_state: PositionState::Stopped,
                    pending: None,
                    stop_timer: None,
                    grace: None,
                    generation: 0,
                    runs: 0,
                }),
            }),
        }
    }

    /// Asks the covering to move to `target`.
    ///
    /// Returns immediately; motion happens in the background.
    pub fn request_target(&self, target: Position) -> RequestOutcome {
        let inner = &self.inner;
        let mut core = inner.core.lock();

        // Compared against the settled position, not a pending target.
        if target == core.last_position {
            tracing::debug!(%target, "Target equals settled position, nothing to do");
            return RequestOutcome::Unchanged;
        }

        inner.power.ensure_on();

        if let Some(pending) = core.pending.take() {
            tracing::debug!(replaced = %pending.target, %target, "Replacing pending request");
            pending.timer.cancel();
        }

        if core.stop_timer.is_some() {
            tracing::info!(
                %target,
                moving_to = %core.target_position,
                "Covering is moving, request acknowledged but not scheduled"
            );
            return RequestOutcome::Deferred;
        }

        core.generation = core.generation.wrapping_add(1);
        let generation = core.generation;
        let this = Arc::clone(inner);
        let timer = TimerHandle::schedule(&inner.runtime, inner.timing.debounce_delay, move || {
            this.fire_start(generation, target);
        });
        core.pending = Some(PendingStart {
            timer,
            generation,
            target,
        });
        RequestOutcome::Scheduled
    }

    /// Last settled position.
    #[must_use]
    pub fn current_position(&self) -> Position {
        self.inner.core.lock().last_position
    }

    /// Last committed target.
    #[must_use]
    pub fn target_position(&self) -> Position {
        self.inner.core.lock().target_position
    }

    /// Motion state.
    #[must_use]
    pub fn position_state(&self) -> PositionState {
        self.inner.core.lock().position_state
    }

    /// Phase of the state machine.
    #[must_use]
    pub fn phase(&self) -> MotionPhase {
        self.inner.core.lock().phase()
    }

    /// Target of the request waiting for its debounce window, if any.
    #[must_use]
    pub fn pending_target(&self) -> Option<Position> {
        self.inner.core.lock().pending.as_ref().map(|p| p.target)
    }

    /// Power supply controller shared with this state machine.
    #[must_use]
    pub fn power(&self) -> &PowerController<T> {
        &self.inner.power
    }

    /// Returns a consistent snapshot of all observable fields.
    #[must_use]
    pub fn snapshot(&self) -> CoverState {
        let core = self.inner.core.lock();
        CoverState::from_parts(
            core.last_position,
            core.target_position,
            core.position_state,
            self.inner.power.state(),
            core.phase(),
        )
    }
}

impl<T: Transport> MotionInner<T> {
    fn fire_start(self: &Arc<Self>, generation: u64, target: Position) {
        let mut changes = Vec::new();
        {
            let mut core = self.core.lock();
            match &core.pending {
                Some(pending) if pending.generation == generation => {}
                _ => return,
            }
            core.pending = None;
            // The previous run's grace period ends here; this run owns the power supply.
            if let Some(grace) = core.grace.take() {
                grace.timer.cancel();
            }

            let from = core.last_position;
            if core.target_position != target {
                core.target_position = target;
                changes.push(StateChange::TargetPosition(target));
            }

            // Persisted before the motor starts, whatever happens next.
            if let Err(e) = self.store.save(target) {
                tracing::error!(%target, error = %e, "Failed to persist target position");
            }

            let direction = Direction::between(from, target);
            let duration = self.timing.motion_duration(from, target);
            tracing::info!(
                %from,
                to = %target,
                %direction,
                distance = from.distance(target),
                ?duration,
                end_position_delay = target.is_extreme(),
                "Moving covering"
            );

            let state = PositionState::from(direction);
            core.position_state = state;
            changes.push(StateChange::PositionState(state));

            tracing::info!("Starting {direction} covering");
            self.send(Command::start(direction));

            let this = Arc::clone(self);
            core.stop_timer = Some(TimerHandle::schedule(&self.runtime, duration, move || {
                this.fire_stop(direction, target);
            }));
        }
        self.notify(changes);
    }

    fn fire_stop(self: &Arc<Self>, direction: Direction, target: Position) {
        let mut changes = Vec::new();
        {
            let mut core = self.core.lock();
            core.stop_timer = None;

            tracing::info!("Stopping {direction} covering");
            self.send(Command::stop(direction));

            core.position_state = PositionState::Stopped;
            changes.push(StateChange::PositionState(PositionState::Stopped));
            if core.last_position != target {
                core.last_position = target;
                changes.push(StateChange::CurrentPosition(target));
            }

            core.runs = core.runs.wrapping_add(1);
            let run = core.runs;
            let this = Arc::clone(self);
            let timer = TimerHandle::schedule(&self.runtime, self.timing.power_off_delay, move || {
                this.fire_power_off(run);
            });
            core.grace = Some(GraceTimer { timer, run });
        }
        self.notify(changes);
    }

    fn fire_power_off(&self, run: u64) {
        let mut core = self.core.lock();
        match &core.grace {
            Some(grace) if grace.run == run => {}
            _ => return,
        }
        core.grace = None;
        if core.pending.is_some() || core.stop_timer.is_some() {
            tracing::debug!(phase = %core.phase(), "Newer motion run keeps the power on");
            return;
        }
        self.power.ensure_off();
    }

    fn send(&self, command: Command) {
        let request = CommandRequest::resolve(command, self.method, &self.endpoints);
        let transport = Arc::clone(&self.transport);
        self.runtime.spawn(async move {
            match transport.send(&request).await {
                Ok(()) => {
                    tracing::debug!(%command, method = %request.method, url = %request.url, "Sent request");
                }
                Err(e) => {
                    tracing::error!(
                        %command,
                        method = %request.method,
                        url = %request.url,
                        error = %e,
                        "Motor command failed"
                    );
                }
            }
        });
    }

    fn notify(&self, mut changes: Vec<StateChange>) {
        match changes.len() {
            0 => {}
            1 => {
                if let Some(change) = changes.pop() {
                    self.callbacks.dispatch(&change);
                }
            }
            _ => self.callbacks.dispatch(&StateChange::batch(changes)),
        }
    }
}

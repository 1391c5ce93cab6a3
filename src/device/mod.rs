// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-facing window covering accessory.
//!
//! A [`WindowCovering`] exposes three characteristics to a host automation
//! framework: the settled position, the motion state and the writable
//! target. Writing the target returns immediately; the motion runs in the
//! background and changes are pushed through the
//! [`Subscribable`](crate::subscription::Subscribable) trait.
//!
//! ```no_run
//! use timed_cover::config::CoverConfig;
//! use timed_cover::types::Position;
//! use timed_cover::WindowCovering;
//!
//! # #[tokio::main]
//! # async fn main() -> timed_cover::Result<()> {
//! let config = CoverConfig::from_file("cover.json")?;
//! let covering = WindowCovering::http(config).build()?;
//!
//! covering.set_target_position(Position::new(80)?);
//! # Ok(())
//! # }
//! ```

mod characteristic;
#[cfg(feature = "http")]
mod http_builder;

pub use characteristic::Characteristic;
#[cfg(feature = "http")]
pub use http_builder::HttpCoveringBuilder;

use std::sync::Arc;

use tokio::runtime::Handle;

use crate::config::CoverConfig;
use crate::controller::{MotionController, RequestOutcome};
use crate::error::{DeviceError, Error};
use crate::protocol::Transport;
use crate::state::{CoverState, StateChange};
use crate::store::PositionStore;
use crate::subscription::{CallbackRegistry, Subscribable, SubscriptionId};
use crate::types::{Position, PositionState, PowerState};

/// A timed window covering.
///
/// The covering has no position sensor. Position is inferred from elapsed
/// time and only updated when a motion run settles.
///
/// # Type Parameter
///
/// `T` is the transport used to reach the actuator: `HttpTransport` in
/// production, `RecordingTransport` in tests.
pub struct WindowCovering<T: Transport> {
    config: CoverConfig,
    motion: MotionController<T>,
    callbacks: Arc<CallbackRegistry>,
}

impl<T: Transport> std::fmt::Debug for WindowCovering<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowCovering")
            .field("name", &self.config.name)
            .field("motion", &self.motion)
            .field("callbacks", &self.callbacks)
            .finish()
    }
}

#[cfg(feature = "http")]
impl WindowCovering<crate::protocol::HttpTransport> {
    /// Creates a builder for a covering driven over HTTP.
    #[must_use]
    pub fn http(config: CoverConfig) -> HttpCoveringBuilder {
        HttpCoveringBuilder::new(config)
    }
}

impl<T: Transport> WindowCovering<T> {
    /// Opens a covering on the current tokio runtime.
    ///
    /// The initial position is the last persisted target, or the configured
    /// default when nothing was persisted.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::NoRuntime`] when called outside a tokio runtime,
    /// and the store error when the persisted position cannot be read.
    pub fn open(config: CoverConfig, transport: T, store: impl PositionStore) -> Result<Self, Error> {
        let runtime = Handle::try_current().map_err(|_| DeviceError::NoRuntime)?;
        Self::with_runtime(config, transport, Arc::new(store), runtime)
    }

    /// Opens a covering whose timers run on `runtime`.
    ///
    /// Target requests may then be issued from any thread.
    ///
    /// # Errors
    ///
    /// Returns the store error when the persisted position cannot be read.
    pub fn with_runtime(
        config: CoverConfig,
        transport: T,
        store: Arc<dyn PositionStore>,
        runtime: Handle,
    ) -> Result<Self, Error> {
        let initial = store.load()?.unwrap_or(config.default_position);
        tracing::info!(name = %config.name, position = %initial, "Window covering ready");

        let callbacks = Arc::new(CallbackRegistry::new());
        let motion = MotionController::new(
            &config,
            Arc::new(transport),
            store,
            Arc::clone(&callbacks),
            runtime,
            initial,
        );

        Ok(Self {
            config,
            motion,
            callbacks,
        })
    }

    /// Returns the accessory name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Returns the configuration this covering was opened with.
    #[must_use]
    pub fn config(&self) -> &CoverConfig {
        &self.config
    }

    // ========== Characteristics ==========

    /// Returns the last settled position.
    #[must_use]
    pub fn current_position(&self) -> Position {
        let position = self.motion.current_position();
        tracing::debug!(%position, "Requested CurrentPosition");
        position
    }

    /// Returns the motion state.
    #[must_use]
    pub fn position_state(&self) -> PositionState {
        let state = self.motion.position_state();
        tracing::debug!(%state, "Requested PositionState");
        state
    }

    /// Returns the last committed target.
    ///
    /// A request still inside its debounce window is not reflected here.
    #[must_use]
    pub fn target_position(&self) -> Position {
        let position = self.motion.target_position();
        tracing::debug!(%position, "Requested TargetPosition");
        position
    }

    /// Asks the covering to move to `target`.
    ///
    /// Returns as soon as the request is recorded.
    pub fn set_target_position(&self, target: Position) -> RequestOutcome {
        tracing::debug!(%target, "Set TargetPosition");
        self.motion.request_target(target)
    }

    /// Reads a characteristic as the host sees it.
    #[must_use]
    pub fn get(&self, characteristic: Characteristic) -> u8 {
        match characteristic {
            Characteristic::CurrentPosition => self.current_position().value(),
            Characteristic::PositionState => self.position_state().as_num(),
            Characteristic::TargetPosition => self.target_position().value(),
        }
    }

    /// Writes a characteristic as the host sees it.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::ReadOnly`] for read-only characteristics and a
    /// value error when `value` is not a valid position.
    pub fn set(&self, characteristic: Characteristic, value: u8) -> Result<RequestOutcome, Error> {
        if !characteristic.is_writable() {
            return Err(DeviceError::ReadOnly(characteristic.name()).into());
        }
        let target = Position::new(value)?;
        Ok(self.set_target_position(target))
    }

    // ========== Introspection ==========

    /// Returns a consistent snapshot of the covering state.
    #[must_use]
    pub fn snapshot(&self) -> CoverState {
        self.motion.snapshot()
    }

    /// Returns the last confirmed state of the main power supply.
    #[must_use]
    pub fn power_state(&self) -> PowerState {
        self.motion.power().state()
    }

    /// Returns `true` while a motion run is in progress.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.motion.position_state().is_moving()
    }
}

impl<T: Transport> Subscribable for WindowCovering<T> {
    fn on_current_position_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Position) + Send + Sync + 'static,
    {
        self.callbacks.on_current_position_changed(callback)
    }

    fn on_position_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PositionState) + Send + Sync + 'static,
    {
        self.callbacks.on_position_state_changed(callback)
    }

    fn on_target_position_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Position) + Send + Sync + 'static,
    {
        self.callbacks.on_target_position_changed(callback)
    }

    fn on_power_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PowerState) + Send + Sync + 'static,
    {
        self.callbacks.on_power_changed(callback)
    }

    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        self.callbacks.on_state_changed(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.callbacks.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Endpoints;
    use crate::error::ValueError;
    use crate::protocol::RecordingTransport;
    use crate::store::MemoryStore;
    use std::time::Duration;

    fn config() -> CoverConfig {
        CoverConfig::new("Bedroom", Endpoints::default())
            .with_debug_mode(true)
            .with_duration_per_percent(Duration::from_millis(10))
    }

    #[tokio::test]
    async fn initial_position_comes_from_store() {
        let store = MemoryStore::with_position(Position::new(42).unwrap());
        let covering = WindowCovering::open(config(), RecordingTransport::new(), store).unwrap();

        assert_eq!(covering.get(Characteristic::CurrentPosition), 42);
        assert_eq!(covering.get(Characteristic::TargetPosition), 42);
        assert_eq!(covering.get(Characteristic::PositionState), 2);
        assert_eq!(covering.power_state(), PowerState::Off);
        assert!(!covering.is_moving());
    }

    #[tokio::test]
    async fn empty_store_uses_default_position() {
        let config = config().with_default_position(Position::OPEN);
        let covering = WindowCovering::open(config, RecordingTransport::new(), MemoryStore::new()).unwrap();
        assert_eq!(covering.current_position(), Position::OPEN);
    }

    #[tokio::test]
    async fn read_only_characteristics_reject_writes() {
        let covering = WindowCovering::open(config(), RecordingTransport::new(), MemoryStore::new()).unwrap();

        let err = covering.set(Characteristic::CurrentPosition, 50).unwrap_err();
        assert!(matches!(err, Error::Device(DeviceError::ReadOnly("CurrentPosition"))));

        let err = covering.set(Characteristic::PositionState, 1).unwrap_err();
        assert!(matches!(err, Error::Device(DeviceError::ReadOnly(_))));
    }

    #[tokio::test]
    async fn out_of_range_target_is_rejected() {
        let covering = WindowCovering::open(config(), RecordingTransport::new(), MemoryStore::new()).unwrap();

        let err = covering.set(Characteristic::TargetPosition, 101).unwrap_err();
        assert!(matches!(err, Error::Value(ValueError::OutOfRange { actual: 101, .. })));
    }

    #[tokio::test]
    async fn writing_target_schedules_motion() {
        let covering = WindowCovering::open(config(), RecordingTransport::new(), MemoryStore::new()).unwrap();

        let outcome = covering.set(Characteristic::TargetPosition, 60).unwrap();
        assert_eq!(outcome, RequestOutcome::Scheduled);
        // Not committed until the debounce window closes.
        assert_eq!(covering.target_position(), Position::CLOSED);
    }

    #[test]
    fn open_outside_runtime_fails() {
        let err = WindowCovering::open(config(), RecordingTransport::new(), MemoryStore::new()).unwrap_err();
        assert!(matches!(err, Error::Device(DeviceError::NoRuntime)));
    }
}

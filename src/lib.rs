// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `timed_cover` - A time-based window covering driven over HTTP.
//!
//! The covering has no position sensor. It is moved by sending timed
//! start and stop commands to a remote actuator, and its position is
//! inferred from elapsed time.
//!
//! # Features
//!
//! - **Debounced targets**: a burst of target requests yields one run
//! - **Timed motion**: travel time derived from distance and end-stop delay
//! - **Power sequencing**: the motor supply is switched on before a run and
//!   off after a grace delay
//! - **Persistence**: the last target survives restarts
//! - **Subscriptions**: characteristic changes are pushed to the host
//!
//! # Quick Start
//!
//! ```no_run
//! use timed_cover::config::CoverConfig;
//! use timed_cover::subscription::Subscribable;
//! use timed_cover::types::Position;
//! use timed_cover::WindowCovering;
//!
//! #[tokio::main]
//! async fn main() -> timed_cover::Result<()> {
//!     let config = CoverConfig::from_file("cover.json")?;
//!     let covering = WindowCovering::http(config).build()?;
//!
//!     covering.on_current_position_changed(|position| {
//!         println!("Settled at {position}");
//!     });
//!
//!     covering.set_target_position(Position::new(80)?);
//!     Ok(())
//! }
//! ```
//!
//! # Testing Without Hardware
//!
//! ```
//! use timed_cover::config::{CoverConfig, Endpoints};
//! use timed_cover::protocol::RecordingTransport;
//! use timed_cover::store::MemoryStore;
//! use timed_cover::WindowCovering;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> timed_cover::Result<()> {
//! let transport = RecordingTransport::new();
//! let config = CoverConfig::new("Test", Endpoints::default()).with_debug_mode(true);
//! let covering = WindowCovering::open(config, transport.clone(), MemoryStore::new())?;
//!
//! assert_eq!(covering.current_position().value(), 0);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod device;
pub mod error;
pub mod protocol;
pub mod state;
pub mod store;
pub mod subscription;
pub mod types;

pub use config::{CoverConfig, Endpoints, Timing};
pub use controller::RequestOutcome;
#[cfg(feature = "http")]
pub use device::HttpCoveringBuilder;
pub use device::{Characteristic, WindowCovering};
pub use error::{ConfigError, DeviceError, Error, ProtocolError, Result, StoreError, ValueError};
#[cfg(feature = "http")]
pub use protocol::HttpTransport;
pub use protocol::{Command, RecordingTransport, Transport};
pub use store::{JsonFileStore, MemoryStore, PositionStore};
pub use subscription::{CallbackRegistry, Subscribable, SubscriptionId};
pub use types::{Direction, HttpMethod, Position, PositionState, PowerState};

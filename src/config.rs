// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Covering configuration.
//!
//! The configuration is a flat JSON object with camelCase keys:
//!
//! ```json
//! {
//!     "name": "Living Room Blinds",
//!     "powerOnUrl": "http://zway.local/power/on",
//!     "powerOffUrl": "http://zway.local/power/off",
//!     "openStartUrl": "http://zway.local/open/start",
//!     "openStopUrl": "http://zway.local/open/stop",
//!     "closeStartUrl": "http://zway.local/close/start",
//!     "closeStopUrl": "http://zway.local/close/stop",
//!     "httpMethod": "GET",
//!     "startDelay": 1000,
//!     "durationPerPercent": 20,
//!     "endPositionDelay": 500,
//!     "debugMode": false
//! }
//! ```
//!
//! All durations are expressed in milliseconds. The configuration is
//! immutable once a covering has been built from it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{Direction, HttpMethod, Position};

/// Default name reported to the host.
const DEFAULT_NAME: &str = "Window Covering";

/// Complete configuration of one covering.
///
/// # Examples
///
/// ```
/// use timed_cover::config::{CoverConfig, Endpoints};
/// use std::time::Duration;
///
/// let config = CoverConfig::new("Office", Endpoints::default())
///     .with_debug_mode(true)
///     .with_duration_per_percent(Duration::from_millis(20));
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverConfig {
    /// Name reported to the host framework.
    #[serde(default = "default_name")]
    pub name: String,
    /// Command endpoints.
    #[serde(flatten)]
    pub endpoints: Endpoints,
    /// HTTP method used for every command.
    #[serde(default)]
    pub http_method: HttpMethod,
    /// Motion timing.
    #[serde(flatten)]
    pub timing: Timing,
    /// Timeout applied to each HTTP request.
    #[serde(default = "default_request_timeout", with = "millis")]
    pub request_timeout: Duration,
    /// Suppresses all network I/O when set.
    #[serde(default)]
    pub debug_mode: bool,
    /// Position assumed when nothing has been persisted yet.
    #[serde(default)]
    pub default_position: Position,
    /// Directory holding the persisted position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persist_path: Option<PathBuf>,
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

impl CoverConfig {
    /// Creates a configuration with default timing.
    #[must_use]
    pub fn new(name: impl Into<String>, endpoints: Endpoints) -> Self {
        Self {
            name: name.into(),
            endpoints,
            http_method: HttpMethod::default(),
            timing: Timing::default(),
            request_timeout: default_request_timeout(),
            debug_mode: false,
            default_position: Position::CLOSED,
            persist_path: None,
        }
    }

    /// Parses a configuration from a JSON document and validates it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON and the validation
    /// errors of [`CoverConfig::validate`].
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration file and validates it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, plus the errors
    /// of [`CoverConfig::from_json_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        tracing::info!(path = %path.display(), "Loaded covering configuration");
        Self::from_json_str(&contents)
    }

    /// Checks that every endpoint is usable.
    ///
    /// Endpoints may be left empty in debug mode, since no request is sent.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEndpoint` for an empty URL and
    /// `ConfigError::InvalidValue` for a URL without an HTTP scheme.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.debug_mode {
            return Ok(());
        }
        for (field, url) in self.endpoints.iter() {
            if url.trim().is_empty() {
                return Err(ConfigError::MissingEndpoint(field));
            }
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidValue {
                    field,
                    message: format!("'{url}' is not an http(s) URL"),
                });
            }
        }
        Ok(())
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn with_http_method(mut self, method: HttpMethod) -> Self {
        self.http_method = method;
        self
    }

    /// Enables or disables debug mode.
    #[must_use]
    pub fn with_debug_mode(mut self, debug_mode: bool) -> Self {
        self.debug_mode = debug_mode;
        self
    }

    /// Sets the fixed delay added to every motion run.
    #[must_use]
    pub fn with_start_delay(mut self, delay: Duration) -> Self {
        self.timing.start_delay = delay;
        self
    }

    /// Sets the travel time per percent.
    #[must_use]
    pub fn with_duration_per_percent(mut self, duration: Duration) -> Self {
        self.timing.duration_per_percent = duration;
        self
    }

    /// Sets the extra settle time for moves to 0 or 100.
    #[must_use]
    pub fn with_end_position_delay(mut self, delay: Duration) -> Self {
        self.timing.end_position_delay = delay;
        self
    }

    /// Sets the debounce window.
    #[must_use]
    pub fn with_debounce_delay(mut self, delay: Duration) -> Self {
        self.timing.debounce_delay = delay;
        self
    }

    /// Sets the grace delay between motor stop and power-off.
    #[must_use]
    pub fn with_power_off_delay(mut self, delay: Duration) -> Self {
        self.timing.power_off_delay = delay;
        self
    }

    /// Sets the position used when the store is empty.
    #[must_use]
    pub fn with_default_position(mut self, position: Position) -> Self {
        self.default_position = position;
        self
    }

    /// Sets the persistence directory.
    #[must_use]
    pub fn with_persist_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.persist_path = Some(path.into());
        self
    }
}

/// The six command endpoints of the actuator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoints {
    /// Switches the main power supply on.
    #[serde(default)]
    pub power_on_url: String,
    /// Switches the main power supply off.
    #[serde(default)]
    pub power_off_url: String,
    /// Starts opening.
    #[serde(default)]
    pub open_start_url: String,
    /// Stops opening.
    #[serde(default)]
    pub open_stop_url: String,
    /// Starts closing.
    #[serde(default)]
    pub close_start_url: String,
    /// Stops closing.
    #[serde(default)]
    pub close_stop_url: String,
}

impl Endpoints {
    /// URL starting a motion run in the given direction.
    #[must_use]
    pub fn start_url(&self, direction: Direction) -> &str {
        match direction {
            Direction::Up => &self.open_start_url,
            Direction::Down => &self.close_start_url,
        }
    }

    /// URL stopping a motion run in the given direction.
    #[must_use]
    pub fn stop_url(&self, direction: Direction) -> &str {
        match direction {
            Direction::Up => &self.open_stop_url,
            Direction::Down => &self.close_stop_url,
        }
    }

    fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("powerOnUrl", self.power_on_url.as_str()),
            ("powerOffUrl", self.power_off_url.as_str()),
            ("openStartUrl", self.open_start_url.as_str()),
            ("openStopUrl", self.open_stop_url.as_str()),
            ("closeStartUrl", self.close_start_url.as_str()),
            ("closeStopUrl", self.close_stop_url.as_str()),
        ]
        .into_iter()
    }
}

/// Motion timing parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timing {
    /// Fixed time added to every motion run.
    #[serde(default, with = "millis")]
    pub start_delay: Duration,
    /// Travel time for one percent of travel.
    #[serde(default, with = "millis")]
    pub duration_per_percent: Duration,
    /// Extra time for moves ending at 0 or 100.
    #[serde(default, with = "millis")]
    pub end_position_delay: Duration,
    /// Window during which repeated requests collapse into one.
    #[serde(default = "Timing::default_debounce", with = "millis")]
    pub debounce_delay: Duration,
    /// Grace delay between motor stop and power-off.
    #[serde(default = "Timing::default_power_off", with = "millis")]
    pub power_off_delay: Duration,
}

impl Timing {
    /// Default debounce window.
    pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);
    /// Default grace delay before power-off.
    pub const DEFAULT_POWER_OFF: Duration = Duration::from_millis(1000);

    fn default_debounce() -> Duration {
        Self::DEFAULT_DEBOUNCE
    }

    fn default_power_off() -> Duration {
        Self::DEFAULT_POWER_OFF
    }

    /// Time the motor has to run to travel from `from` to `to`.
    ///
    /// `start_delay + duration_per_percent * distance`, plus
    /// `end_position_delay` when `to` is 0 or 100.
    #[must_use]
    pub fn motion_duration(&self, from: Position, to: Position) -> Duration {
        let travel = self.duration_per_percent * u32::from(from.distance(to));
        let settle = if to.is_extreme() {
            self.end_position_delay
        } else {
            Duration::ZERO
        };
        self.start_delay + travel + settle
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            start_delay: Duration::ZERO,
            duration_per_percent: Duration::ZERO,
            end_position_delay: Duration::ZERO,
            debounce_delay: Self::DEFAULT_DEBOUNCE,
            power_off_delay: Self::DEFAULT_POWER_OFF,
        }
    }
}

/// Serde helper encoding a `Duration` as integer milliseconds.
mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

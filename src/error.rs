// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `timed_cover` library.
//!
//! Errors are grouped by the layer that raises them: value validation,
//! command transport, position persistence, configuration loading and
//! host-facing device operations.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while sending a command to the actuator.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred in the position store.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The configuration could not be loaded or is invalid.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Error occurred during a device operation.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },

    /// An invalid power state string was provided.
    #[error("invalid power state: {0}")]
    InvalidPowerState(String),

    /// An invalid position state value was provided.
    #[error("invalid position state: {0}")]
    InvalidPositionState(u8),

    /// An unsupported HTTP method was provided.
    #[error("unsupported HTTP method: {0}")]
    InvalidHttpMethod(String),
}

/// Errors raised while sending a command to the actuator.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed before a response was received.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The actuator answered with a status other than 200.
    #[error("unexpected status {status} ({reason})")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// Canonical reason phrase, if known.
        reason: String,
    },
}

/// Errors raised by a position store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No persistence directory could be determined.
    #[error("no persistence directory available")]
    NoPersistPath,
}

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration document is malformed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A required command endpoint is empty.
    #[error("missing endpoint: {0}")]
    MissingEndpoint(&'static str),

    /// A configured value is out of range.
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        /// The configuration key.
        field: &'static str,
        /// Description of the problem.
        message: String,
    },
}

/// Errors related to host-facing device operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The characteristic cannot be written.
    #[error("characteristic {0} is read-only")]
    ReadOnly(&'static str),

    /// No tokio runtime was available to drive the timers.
    #[error("no tokio runtime available")]
    NoRuntime,
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::OutOfRange {
            min: 0,
            max: 100,
            actual: 150,
        };
        assert_eq!(err.to_string(), "value 150 is out of range [0, 100]");
    }

    #[test]
    fn error_from_value_error() {
        let value_err = ValueError::InvalidPositionState(7);
        let err: Error = value_err.into();
        assert!(matches!(
            err,
            Error::Value(ValueError::InvalidPositionState(7))
        ));
    }

    #[test]
    fn status_error_display() {
        let err = ProtocolError::Status {
            status: 503,
            reason: "Service Unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "unexpected status 503 (Service Unavailable)");
    }

    #[test]
    fn device_error_display() {
        let err = DeviceError::ReadOnly("CurrentPosition");
        assert_eq!(err.to_string(), "characteristic CurrentPosition is read-only");
    }

    #[test]
    fn config_error_from_missing_endpoint() {
        let err: Error = ConfigError::MissingEndpoint("powerOnUrl").into();
        assert_eq!(err.to_string(), "config error: missing endpoint: powerOnUrl");
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command transport towards the remote actuator.
//!
//! Every actuator operation is a single HTTP request built from a configured
//! method and URL. Success means status 200; the body is ignored.
//!
//! # Transports
//!
//! - [`HttpTransport`]: sends real requests with `reqwest`, or nothing at
//!   all in debug mode
//! - [`RecordingTransport`]: keeps every request in memory and can be told
//!   to fail selected commands

#[cfg(feature = "http")]
mod http;
mod recording;

#[cfg(feature = "http")]
pub use http::{HttpTransport, HttpTransportBuilder};
pub use recording::{RecordingTransport, SentCommand};

use std::fmt;
use std::future::Future;

use crate::config::Endpoints;
use crate::error::ProtocolError;
use crate::types::{Direction, HttpMethod};

/// The six commands understood by the actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Switch the main power supply on.
    PowerOn,
    /// Switch the main power supply off.
    PowerOff,
    /// Start the motor opening.
    OpenStart,
    /// Stop the motor after opening.
    OpenStop,
    /// Start the motor closing.
    CloseStart,
    /// Stop the motor after closing.
    CloseStop,
}

impl Command {
    /// Command starting a motion run.
    #[must_use]
    pub const fn start(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::OpenStart,
            Direction::Down => Self::CloseStart,
        }
    }

    /// Command stopping a motion run.
    #[must_use]
    pub const fn stop(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::OpenStop,
            Direction::Down => Self::CloseStop,
        }
    }

    /// Returns the configured URL for this command.
    #[must_use]
    pub fn url<'a>(&self, endpoints: &'a Endpoints) -> &'a str {
        match self {
            Self::PowerOn => &endpoints.power_on_url,
            Self::PowerOff => &endpoints.power_off_url,
            Self::OpenStart => endpoints.start_url(Direction::Up),
            Self::OpenStop => endpoints.stop_url(Direction::Up),
            Self::CloseStart => endpoints.start_url(Direction::Down),
            Self::CloseStop => endpoints.stop_url(Direction::Down),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::PowerOn => "power-on",
            Self::PowerOff => "power-off",
            Self::OpenStart => "open-start",
            Self::OpenStop => "open-stop",
            Self::CloseStart => "close-start",
            Self::CloseStop => "close-stop",
        };
        f.write_str(s)
    }
}

/// A fully resolved request ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    /// Which actuator command this is.
    pub command: Command,
    /// HTTP method.
    pub method: HttpMethod,
    /// Target URL.
    pub url: String,
}

impl CommandRequest {
    /// Resolves `command` against the configured endpoints.
    #[must_use]
    pub fn resolve(command: Command, method: HttpMethod, endpoints: &Endpoints) -> Self {
        Self {
            command,
            method,
            url: command.url(endpoints).to_string(),
        }
    }
}

/// Sends one command to the actuator.
///
/// Implementations issue exactly one request per call and never retry.
/// Failures are reported, not corrected.
pub trait Transport: Send + Sync + 'static {
    /// Sends a request.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::Status` for any status other than 200 and a
    /// transport-specific error when no response is received.
    fn send(
        &self,
        request: &CommandRequest,
    ) -> impl Future<Output = Result<(), ProtocolError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints() -> Endpoints {
        Endpoints {
            power_on_url: "http://hub/on".to_string(),
            power_off_url: "http://hub/off".to_string(),
            open_start_url: "http://hub/os".to_string(),
            open_stop_url: "http://hub/ot".to_string(),
            close_start_url: "http://hub/cs".to_string(),
            close_stop_url: "http://hub/ct".to_string(),
        }
    }

    #[test]
    fn command_urls() {
        let e = endpoints();
        assert_eq!(Command::PowerOn.url(&e), "http://hub/on");
        assert_eq!(Command::PowerOff.url(&e), "http://hub/off");
        assert_eq!(Command::OpenStart.url(&e), "http://hub/os");
        assert_eq!(Command::OpenStop.url(&e), "http://hub/ot");
        assert_eq!(Command::CloseStart.url(&e), "http://hub/cs");
        assert_eq!(Command::CloseStop.url(&e), "http://hub/ct");
    }

    #[test]
    fn command_constructors() {
        assert_eq!(Command::start(Direction::Down), Command::CloseStart);
        assert_eq!(Command::start(Direction::Up), Command::OpenStart);
        assert_eq!(Command::stop(Direction::Down), Command::CloseStop);
    }

    #[test]
    fn resolve_request() {
        let request = CommandRequest::resolve(Command::CloseStart, HttpMethod::Post, &endpoints());
        assert_eq!(request.url, "http://hub/cs");
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.command, Command::CloseStart);
    }
}

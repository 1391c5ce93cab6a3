// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP transport implementation.

use std::time::Duration;

use reqwest::{Client, Method, StatusCode};

use crate::config::CoverConfig;
use crate::error::ProtocolError;
use crate::protocol::{CommandRequest, Transport};
use crate::types::HttpMethod;

/// HTTP transport for the actuator.
///
/// In debug mode no request leaves the process and every send succeeds.
///
/// # Examples
///
/// ```no_run
/// use timed_cover::protocol::{Command, CommandRequest, HttpTransport, Transport};
/// use timed_cover::config::Endpoints;
/// use timed_cover::types::HttpMethod;
///
/// # async fn example() -> Result<(), timed_cover::error::ProtocolError> {
/// let transport = HttpTransport::new()?;
/// let endpoints = Endpoints {
///     power_on_url: "http://zway.local/power/on".to_string(),
///     ..Endpoints::default()
/// };
/// let request = CommandRequest::resolve(Command::PowerOn, HttpMethod::Get, &endpoints);
/// transport.send(&request).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    debug_mode: bool,
}

impl HttpTransport {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a transport with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new() -> Result<Self, ProtocolError> {
        HttpTransportBuilder::new().build()
    }

    /// Creates a transport that never touches the network.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn debug() -> Result<Self, ProtocolError> {
        HttpTransportBuilder::new().debug_mode(true).build()
    }

    /// Creates a transport honoring the configured timeout and debug flag.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn from_config(config: &CoverConfig) -> Result<Self, ProtocolError> {
        HttpTransportBuilder::new()
            .timeout(config.request_timeout)
            .debug_mode(config.debug_mode)
            .build()
    }

    /// Returns whether network I/O is suppressed.
    #[must_use]
    pub fn is_debug_mode(&self) -> bool {
        self.debug_mode
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: &CommandRequest) -> Result<(), ProtocolError> {
        if self.debug_mode {
            tracing::debug!(command = %request.command, "Debug mode, request not sent");
            return Ok(());
        }

        tracing::debug!(method = %request.method, url = %request.url, "Sending HTTP command");

        let response = self
            .client
            .request(to_method(request.method), &request.url)
            .send()
            .await
            .map_err(ProtocolError::Http)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ProtocolError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        tracing::debug!(method = %request.method, url = %request.url, "Sent request");
        Ok(())
    }
}

/// Builder for an [`HttpTransport`].
#[derive(Debug, Default)]
pub struct HttpTransportBuilder {
    timeout: Option<Duration>,
    debug_mode: bool,
}

impl HttpTransportBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Enables or disables debug mode.
    #[must_use]
    pub fn debug_mode(mut self, debug_mode: bool) -> Self {
        self.debug_mode = debug_mode;
        self
    }

    /// Builds the transport.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn build(self) -> Result<HttpTransport, ProtocolError> {
        let client = Client::builder()
            .timeout(self.timeout.unwrap_or(HttpTransport::DEFAULT_TIMEOUT))
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(HttpTransport {
            client,
            debug_mode: self.debug_mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Command;

    #[test]
    fn method_mapping() {
        assert_eq!(to_method(HttpMethod::Get), Method::GET);
        assert_eq!(to_method(HttpMethod::Post), Method::POST);
        assert_eq!(to_method(HttpMethod::Put), Method::PUT);
    }

    #[test]
    fn builder_defaults_to_network_mode() {
        let transport = HttpTransportBuilder::new().build().unwrap();
        assert!(!transport.is_debug_mode());
    }

    #[test]
    fn from_config_picks_up_debug_flag() {
        let config = CoverConfig::new("Blinds", crate::config::Endpoints::default())
            .with_debug_mode(true);
        let transport = HttpTransport::from_config(&config).unwrap();
        assert!(transport.is_debug_mode());
    }

    #[tokio::test]
    async fn debug_mode_never_fails() {
        let transport = HttpTransport::debug().unwrap();
        let request = CommandRequest {
            command: Command::PowerOn,
            method: HttpMethod::Get,
            url: "http://127.0.0.1:1/unreachable".to_string(),
        };
        assert!(transport.send(&request).await.is_ok());
    }
}

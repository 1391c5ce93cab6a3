// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory transport.
//!
//! Useful for simulating an actuator and for checking the exact command
//! sequence a covering produces. Clones share the same log.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::time::Instant;

use crate::error::ProtocolError;
use crate::protocol::{Command, CommandRequest, Transport};

/// A request seen by a [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentCommand {
    /// The request as sent.
    pub request: CommandRequest,
    /// When the send started.
    pub at: Instant,
    /// Whether the simulated actuator accepted it.
    pub succeeded: bool,
}

#[derive(Debug, Default)]
struct Inner {
    sent: Vec<SentCommand>,
    failing: HashSet<Command>,
}

/// Transport that records requests instead of sending them.
///
/// # Examples
///
/// ```
/// use timed_cover::protocol::{Command, CommandRequest, RecordingTransport, Transport};
/// use timed_cover::types::HttpMethod;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let transport = RecordingTransport::new();
/// transport.fail(Command::PowerOff);
///
/// let request = CommandRequest {
///     command: Command::PowerOff,
///     method: HttpMethod::Get,
///     url: "http://hub/off".to_string(),
/// };
/// assert!(transport.send(&request).await.is_err());
/// assert_eq!(transport.commands(), vec![Command::PowerOff]);
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    inner: Arc<Mutex<Inner>>,
}

impl RecordingTransport {
    /// Creates an empty transport where every command succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every future `command` fail with status 500.
    pub fn fail(&self, command: Command) {
        self.inner.lock().failing.insert(command);
    }

    /// Lets `command` succeed again.
    pub fn recover(&self, command: Command) {
        self.inner.lock().failing.remove(&command);
    }

    /// Returns every request sent so far.
    #[must_use]
    pub fn sent(&self) -> Vec<SentCommand> {
        self.inner.lock().sent.clone()
    }

    /// Returns the commands sent so far, in order.
    #[must_use]
    pub fn commands(&self) -> Vec<Command> {
        self.inner
            .lock()
            .sent
            .iter()
            .map(|s| s.request.command)
            .collect()
    }

    /// Returns how many times `command` was sent.
    #[must_use]
    pub fn count(&self, command: Command) -> usize {
        self.inner
            .lock()
            .sent
            .iter()
            .filter(|s| s.request.command == command)
            .count()
    }
}

impl Transport for RecordingTransport {
    async fn send(&self, request: &CommandRequest) -> Result<(), ProtocolError> {
        let succeeded = {
            let mut inner = self.inner.lock();
            let succeeded = !inner.failing.contains(&request.command);
            inner.sent.push(SentCommand {
                request: request.clone(),
                at: Instant::now(),
                succeeded,
            });
            succeeded
        };

        if succeeded {
            Ok(())
        } else {
            Err(ProtocolError::Status {
                status: 500,
                reason: "Internal Server Error".to_string(),
            })
        }
    }
}

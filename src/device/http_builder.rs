// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP covering builder.

use std::sync::Arc;

use tokio::runtime::Handle;

use crate::config::CoverConfig;
use crate::device::WindowCovering;
use crate::error::{DeviceError, Error};
use crate::protocol::HttpTransport;
use crate::store::{JsonFileStore, PositionStore};

/// Builder for coverings driven over HTTP.
///
/// Created with [`WindowCovering::http`]. By default the position is
/// persisted to a JSON file under the configured `persistPath`, or under
/// the user data directory when none is set.
///
/// # Examples
///
/// ```no_run
/// use timed_cover::config::CoverConfig;
/// use timed_cover::store::MemoryStore;
/// use timed_cover::WindowCovering;
///
/// # fn example(config: CoverConfig) -> timed_cover::Result<()> {
/// let covering = WindowCovering::http(config)
///     .with_store(MemoryStore::new())
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct HttpCoveringBuilder {
    config: CoverConfig,
    store: Option<Arc<dyn PositionStore>>,
    runtime: Option<Handle>,
}

impl std::fmt::Debug for HttpCoveringBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCoveringBuilder")
            .field("config", &self.config)
            .field("store", &self.store.is_some())
            .field("runtime", &self.runtime.is_some())
            .finish()
    }
}

impl HttpCoveringBuilder {
    pub(crate) fn new(config: CoverConfig) -> Self {
        Self {
            config,
            store: None,
            runtime: None,
        }
    }

    /// Uses `store` instead of the JSON file store.
    #[must_use]
    pub fn with_store(mut self, store: impl PositionStore) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Runs timers on `runtime` instead of the current one.
    #[must_use]
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Builds the covering.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The configuration is invalid
    /// - The HTTP client cannot be created
    /// - The persistence directory cannot be created
    /// - No runtime was given and none is current
    pub fn build(self) -> Result<WindowCovering<HttpTransport>, Error> {
        self.config.validate()?;

        let runtime = match self.runtime {
            Some(runtime) => runtime,
            None => Handle::try_current().map_err(|_| DeviceError::NoRuntime)?,
        };

        let transport = HttpTransport::from_config(&self.config)?;
        if transport.is_debug_mode() {
            tracing::warn!("Debug mode enabled, no requests will be sent");
        }

        let store: Arc<dyn PositionStore> = match self.store {
            Some(store) => store,
            None => {
                let store = match &self.config.persist_path {
                    Some(dir) => JsonFileStore::open(dir)?,
                    None => JsonFileStore::open_default()?,
                };
                tracing::debug!(path = %store.path().display(), "Persisting position");
                Arc::new(store)
            }
        };

        WindowCovering::with_runtime(self.config, transport, store, runtime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Endpoints;
    use crate::error::ConfigError;
    use crate::store::MemoryStore;
    use crate::types::Position;

    fn endpoints() -> Endpoints {
        Endpoints {
            power_on_url: "http://hub/power/on".to_string(),
            power_off_url: "http://hub/power/off".to_string(),
            open_start_url: "http://hub/open/start".to_string(),
            open_stop_url: "http://hub/open/stop".to_string(),
            close_start_url: "http://hub/close/start".to_string(),
            close_stop_url: "http://hub/close/stop".to_string(),
        }
    }

    #[tokio::test]
    async fn build_with_memory_store() {
        let store = MemoryStore::with_position(Position::new(25).unwrap());
        let covering = WindowCovering::http(CoverConfig::new("Office", endpoints()))
            .with_store(store)
            .build()
            .unwrap();

        assert_eq!(covering.name(), "Office");
        assert_eq!(covering.current_position().value(), 25);
    }

    #[tokio::test]
    async fn build_persists_under_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = CoverConfig::new("Office", endpoints()).with_persist_path(dir.path());

        let covering = WindowCovering::http(config).build().unwrap();
        assert_eq!(covering.current_position(), Position::CLOSED);
    }

    #[tokio::test]
    async fn build_rejects_missing_endpoint() {
        let mut endpoints = endpoints();
        endpoints.open_stop_url.clear();

        let err = WindowCovering::http(CoverConfig::new("Office", endpoints))
            .with_store(MemoryStore::new())
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingEndpoint("openStopUrl"))
        ));
    }

    #[test]
    fn build_without_runtime_fails() {
        let err = WindowCovering::http(CoverConfig::new("Office", endpoints()))
            .with_store(MemoryStore::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Device(DeviceError::NoRuntime)));
    }

    #[test]
    fn build_with_explicit_runtime() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let covering = WindowCovering::http(CoverConfig::new("Office", endpoints()))
            .with_store(MemoryStore::new())
            .with_runtime(runtime.handle().clone())
            .build();
        assert!(covering.is_ok());
    }
}

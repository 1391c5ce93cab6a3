// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the HTTP transport using wiremock.

#![cfg(feature = "http")]

use std::time::Duration;

use timed_cover::config::{CoverConfig, Endpoints};
use timed_cover::protocol::{Command, CommandRequest, HttpTransport, HttpTransportBuilder, Transport};
use timed_cover::store::MemoryStore;
use timed_cover::types::{HttpMethod, Position, PositionState, PowerState};
use timed_cover::{ProtocolError, WindowCovering};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn endpoints(base: &str) -> Endpoints {
    Endpoints {
        power_on_url: format!("{base}/power/on"),
        power_off_url: format!("{base}/power/off"),
        open_start_url: format!("{base}/open/start"),
        open_stop_url: format!("{base}/open/stop"),
        close_start_url: format!("{base}/close/start"),
        close_stop_url: format!("{base}/close/stop"),
    }
}

// ============================================================================
// HttpTransport Tests
// ============================================================================

mod http_transport {
    use super::*;

    #[tokio::test]
    async fn status_200_is_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/power/on"))
            .respond_with(ResponseTemplate::new(200).set_body_string("whatever"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let request = CommandRequest::resolve(
            Command::PowerOn,
            HttpMethod::Get,
            &endpoints(&mock_server.uri()),
        );

        transport.send(&request).await.unwrap();
    }

    #[tokio::test]
    async fn other_status_is_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/open/start"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let request = CommandRequest::resolve(
            Command::OpenStart,
            HttpMethod::Get,
            &endpoints(&mock_server.uri()),
        );

        let err = transport.send(&request).await.unwrap_err();
        assert!(matches!(err, ProtocolError::Status { status: 500, .. }));
        assert_eq!(
            err.to_string(),
            "unexpected status 500 (Internal Server Error)"
        );
    }

    #[tokio::test]
    async fn non_200_success_status_is_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let request = CommandRequest::resolve(
            Command::CloseStop,
            HttpMethod::Get,
            &endpoints(&mock_server.uri()),
        );

        let err = transport.send(&request).await.unwrap_err();
        assert!(matches!(err, ProtocolError::Status { status: 204, .. }));
    }

    #[tokio::test]
    async fn configured_method_is_used() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/close/start"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let request = CommandRequest::resolve(
            Command::CloseStart,
            HttpMethod::Post,
            &endpoints(&mock_server.uri()),
        );

        transport.send(&request).await.unwrap();
    }

    #[tokio::test]
    async fn debug_mode_sends_nothing() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::debug().unwrap();
        assert!(transport.is_debug_mode());
        let request = CommandRequest::resolve(
            Command::PowerOff,
            HttpMethod::Get,
            &endpoints(&mock_server.uri()),
        );

        transport.send(&request).await.unwrap();
    }

    #[tokio::test]
    async fn slow_actuator_times_out() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&mock_server)
            .await;

        let transport = HttpTransportBuilder::new()
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();
        let request = CommandRequest::resolve(
            Command::PowerOn,
            HttpMethod::Get,
            &endpoints(&mock_server.uri()),
        );

        let err = transport.send(&request).await.unwrap_err();
        assert!(matches!(err, ProtocolError::Http(_)));
    }

    #[tokio::test]
    async fn unreachable_actuator_is_an_error() {
        let transport = HttpTransportBuilder::new()
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();
        let request = CommandRequest::resolve(
            Command::PowerOn,
            HttpMethod::Get,
            &endpoints("http://127.0.0.1:9"),
        );

        assert!(transport.send(&request).await.is_err());
    }
}

// ============================================================================
// WindowCovering over HTTP
// ============================================================================

mod covering {
    use super::*;

    fn fast_config(base: &str) -> CoverConfig {
        CoverConfig::new("Living room", endpoints(base))
            .with_debounce_delay(Duration::from_millis(50))
            .with_start_delay(Duration::from_millis(20))
            .with_duration_per_percent(Duration::from_millis(1))
            .with_end_position_delay(Duration::from_millis(10))
            .with_power_off_delay(Duration::from_millis(50))
    }

    fn paths(requests: &[wiremock::Request]) -> Vec<String> {
        requests.iter().map(|r| r.url.path().to_string()).collect()
    }

    #[tokio::test]
    async fn full_run_hits_endpoints_in_order() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let store = MemoryStore::with_position(Position::new(40).unwrap());
        let covering = WindowCovering::http(fast_config(&mock_server.uri()))
            .with_store(store.clone())
            .build()
            .unwrap();

        covering.set_target_position(Position::OPEN);
        tokio::time::sleep(Duration::from_millis(600)).await;

        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(
            paths(&requests),
            vec!["/power/on", "/open/start", "/open/stop", "/power/off"]
        );
        assert_eq!(covering.current_position(), Position::OPEN);
        assert_eq!(covering.position_state(), PositionState::Stopped);
        assert_eq!(covering.power_state(), PowerState::Off);
        assert_eq!(store.history(), vec![Position::OPEN]);
    }

    #[tokio::test]
    async fn failing_actuator_does_not_block_motion() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let store = MemoryStore::with_position(Position::new(60).unwrap());
        let covering = WindowCovering::http(fast_config(&mock_server.uri()))
            .with_store(store.clone())
            .build()
            .unwrap();

        covering.set_target_position(Position::new(30).unwrap());
        tokio::time::sleep(Duration::from_millis(600)).await;

        let requests = mock_server.received_requests().await.unwrap();
        // Power never confirmed on, so no power-off follows.
        assert_eq!(
            paths(&requests),
            vec!["/power/on", "/close/start", "/close/stop"]
        );
        assert_eq!(covering.current_position().value(), 30);
        assert_eq!(covering.power_state(), PowerState::Off);
        assert_eq!(store.history(), vec![Position::new(30).unwrap()]);
    }
}

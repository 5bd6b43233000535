//! Daemon-level operations against an in-process mock daemon.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use chrono::DateTime;
use httpmock::prelude::*;
use serde_json::json;
use stevedore_client::{Client, Options};
use stevedore_common::config::ClientConfig;
use stevedore_common::error::StevedoreError;

fn client_for(server: &MockServer) -> Client {
    Client::new(ClientConfig::new(server.host(), server.port())).expect("valid config")
}

#[test]
fn info_renames_daemon_fields() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/info");
        then.status(200).json_body(json!({
            "Containers": 11,
            "Images": 16,
            "Debug": 0,
            "NFd": 11,
            "NGoroutines": 21,
            "MemoryLimit": 1,
            "SwapLimit": 0,
            "IPv4Forwarding": 1
        }));
    });

    let info = client_for(&server).info().expect("info should succeed");
    mock.assert();

    assert_eq!(info.containers, Some(11));
    assert_eq!(info.images, Some(16));
    assert_eq!(info.debug, Some(false));
    assert_eq!(info.fd_count, Some(11));
    assert_eq!(info.goroutine_count, Some(21));
    assert_eq!(info.memory_limit, Some(true));
    assert_eq!(info.swap_limit, Some(false));
    assert_eq!(info.ipv4_forwarding, Some(true));
}

#[test]
fn version_renames_daemon_fields() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/version");
        then.status(200).json_body(json!({
            "Version": "0.2.2",
            "GitCommit": "5a2a5cc+CHANGES",
            "GoVersion": "go1.0.3",
            "ApiVersion": "1.12"
        }));
    });

    let version = client_for(&server).version().expect("version should succeed");
    mock.assert();

    assert_eq!(version.version.as_deref(), Some("0.2.2"));
    assert_eq!(version.git_commit.as_deref(), Some("5a2a5cc+CHANGES"));
    assert_eq!(version.go_version.as_deref(), Some("go1.0.3"));
    assert_eq!(version.api_version.as_deref(), Some("1.12"));
}

#[test]
fn list_all_containers_keeps_response_order() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/containers/json")
            .query_param("all", "true");
        then.status(200).json_body(json!([
            {
                "Id": "8dfafdbc3a40",
                "Image": "base:latest",
                "Command": "echo 1",
                "Created": 1_367_854_155,
                "Status": "Exit 0",
                "SizeRw": 12288,
                "SizeRootFs": 0
            },
            {
                "Id": "9cd87474be90",
                "Image": "base:latest",
                "Command": "echo 222222",
                "Created": 1_367_854_155,
                "Status": "Up 2 hours"
            }
        ]));
    });

    let client = client_for(&server);
    let containers = client
        .containers(&Options::new().set("all", true))
        .expect("listing should succeed");
    mock.assert();

    assert_eq!(containers.len(), 2);
    assert_eq!(containers[0].id().as_str(), "8dfafdbc3a40");
    assert_eq!(containers[1].id().as_str(), "9cd87474be90");

    for container in &containers {
        assert_eq!(container.image.as_deref(), Some("base:latest"));
        assert!(container.command.is_some());
        assert!(container.status.is_some());
        assert_eq!(container.created, DateTime::from_timestamp(1_367_854_155, 0));
    }
    assert_eq!(containers[0].command.as_deref(), Some("echo 1"));
    assert_eq!(containers[1].status.as_deref(), Some("Up 2 hours"));
    assert_eq!(containers[0].size_rw, Some(12288));
    assert!(containers[1].size_rw.is_none());
}

#[test]
fn list_containers_omits_falsy_and_unknown_options() {
    let server = MockServer::start();
    let with_query = server.mock(|when, then| {
        when.method(GET)
            .path("/containers/json")
            .query_param_exists("all");
        then.status(500);
    });
    let plain = server.mock(|when, then| {
        when.method(GET).path("/containers/json");
        then.status(200).json_body(json!([]));
    });

    let client = client_for(&server);
    let containers = client
        .containers(&Options::new().set("all", false).set("name", "web"))
        .expect("listing should succeed");

    with_query.assert_hits(0);
    plain.assert();
    assert!(containers.is_empty());
}

#[test]
fn list_images_maps_entries() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/images/json").query_param("all", "1");
        then.status(200).json_body(json!([
            {
                "Repository": "base",
                "Tag": "ubuntu-12.10",
                "Id": "b750fe79269d",
                "Created": 1_364_102_658,
                "Size": 24653,
                "VirtualSize": 180_116_135
            },
            {
                "Repository": "base",
                "Tag": "ubuntu-quantal",
                "Id": "b750fe79269d",
                "Created": 1_364_102_658,
                "Size": 24653,
                "VirtualSize": 180_116_135
            }
        ]));
    });

    let images = client_for(&server)
        .images(&Options::new().set("all", 1))
        .expect("listing should succeed");
    mock.assert();

    assert_eq!(images.len(), 2);
    assert_eq!(images[0].tag.as_deref(), Some("ubuntu-12.10"));
    assert_eq!(images[1].tag.as_deref(), Some("ubuntu-quantal"));
    assert_eq!(images[0].virtual_size, Some(180_116_135));
    assert_eq!(images[0].created, DateTime::from_timestamp(1_364_102_658, 0));
}

#[test]
fn malformed_json_is_a_parse_error() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(GET).path("/info");
        then.status(200).body("definitely not json");
    });

    let err = client_for(&server).info().unwrap_err();
    assert!(matches!(
        err,
        StevedoreError::ResponseParseError { ref method, ref path, .. }
            if method == "GET" && path == "/info"
    ));
}

#[test]
fn error_status_with_text_body_is_a_parse_error() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(GET).path("/containers/json");
        then.status(500).body("Server Error");
    });

    let err = client_for(&server).containers(&Options::new()).unwrap_err();
    assert!(err.to_string().contains("500"));
}

#[test]
fn listing_that_is_not_an_array_is_a_parse_error() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(GET).path("/images/json");
        then.status(200).json_body(json!({"message": "page not found"}));
    });

    let err = client_for(&server).images(&Options::new()).unwrap_err();
    assert!(matches!(err, StevedoreError::ResponseParseError { .. }));
}

#[test]
fn connection_refused_is_request_failed() {
    // Grab a free port, then release it so nothing listens there.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .map(|addr| addr.port())
        .expect("free port");

    let client = Client::new(ClientConfig::new("127.0.0.1", port)).expect("valid config");
    let err = client.containers(&Options::new()).unwrap_err();

    match err {
        StevedoreError::RequestFailed { method, path, .. } => {
            assert_eq!(method, "GET");
            assert_eq!(path, "/containers/json");
        }
        other => unreachable!("expected RequestFailed, got {other}"),
    }
}

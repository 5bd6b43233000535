//! Container lifecycle against an in-process mock daemon.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use chrono::DateTime;
use httpmock::prelude::*;
use serde_json::json;
use stevedore_client::{Client, Options};
use stevedore_common::config::ClientConfig;
use stevedore_common::error::StevedoreError;

const SHORT_ID: &str = "e90e34656806";
const LONG_ID: &str = "e90e34656806f3b2f7cbbd0b1fa7b6b84aa4a1b2c3d4e5f60718293a4b5c6d7e";

fn client_for(server: &MockServer) -> Client {
    Client::new(ClientConfig::new(server.host(), server.port())).expect("valid config")
}

#[test]
fn create_sends_defaults_name_and_split_command() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/containers/create")
            .query_param("name", "web")
            .header("content-type", "application/json")
            .json_body(json!({
                "AttachStdin": false,
                "AttachStdout": true,
                "AttachStderr": true,
                "Tty": true,
                "OpenStdin": true,
                "StdinOnce": true,
                "Image": "busybox",
                "Cmd": ["sh", "-c", "echo hello world"]
            }));
        then.status(201)
            .json_body(json!({"Id": SHORT_ID, "Warnings": ["no swap limit"]}));
    });

    let client = client_for(&server);
    let container = client
        .create_container(
            &Options::new()
                .set("image", "busybox")
                .set("name", "web")
                .set("cmd", "sh -c 'echo hello world'"),
        )
        .expect("create should succeed");

    mock.assert();
    assert_eq!(container.id().as_str(), SHORT_ID);
    assert!(container.bind_mounts.is_empty());
}

#[test]
fn create_without_image_sends_nothing() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/containers/create");
        then.status(201).json_body(json!({"Id": SHORT_ID}));
    });

    let err = client_for(&server)
        .create_container(&Options::new().set("cmd", "true"))
        .unwrap_err();

    mock.assert_hits(0);
    assert!(matches!(
        err,
        StevedoreError::MissingRequiredField { field: "Image", .. }
    ));
}

#[test]
fn bind_mounts_flow_from_create_to_start() {
    let server = MockServer::start();
    let create = server.mock(|when, then| {
        when.method(POST).path("/containers/create").json_body(json!({
            "AttachStdin": false,
            "AttachStdout": true,
            "AttachStderr": true,
            "Tty": true,
            "OpenStdin": true,
            "StdinOnce": true,
            "Image": "busybox",
            "Volumes": {"/data": {}, "/scratch": {}}
        }));
        then.status(201).json_body(json!({"Id": SHORT_ID}));
    });
    let start = server.mock(|when, then| {
        when.method(POST)
            .path(format!("/containers/{SHORT_ID}/start"))
            .json_body(json!({
                "Binds": ["/srv/data:/data:ro"],
                "LxcConf": [{"Key": "lxc.utsname", "Value": "docker"}]
            }));
        then.status(204);
    });

    let client = client_for(&server);
    let mut container = client
        .create_container(&Options::new().set("image", "busybox").set(
            "bind_mounts",
            json!([
                {"src": "/srv/data", "dst": "/data", "mode": "ro"},
                {"dst": "/scratch"}
            ]),
        ))
        .expect("create should succeed");

    let started = container
        .start(&Options::new().set("lxc_conf", json!({"lxc.utsname": "docker"})))
        .expect("start should succeed");

    create.assert();
    start.assert();
    assert!(started);
    assert_eq!(container.bind_mounts.len(), 2);
}

#[test]
fn stop_without_grace_period_has_no_query() {
    let server = MockServer::start();
    let with_t = server.mock(|when, then| {
        when.method(POST)
            .path(format!("/containers/{SHORT_ID}/stop"))
            .query_param_exists("t");
        then.status(500);
    });
    let plain = server.mock(|when, then| {
        when.method(POST).path(format!("/containers/{SHORT_ID}/stop"));
        then.status(204);
    });

    let client = client_for(&server);
    let stopped = client
        .container_handle(SHORT_ID)
        .stop(&Options::new())
        .expect("stop should succeed");

    with_t.assert_hits(0);
    plain.assert();
    assert!(stopped);
}

#[test]
fn stop_and_restart_pass_grace_period() {
    let server = MockServer::start();
    let stop = server.mock(|when, then| {
        when.method(POST)
            .path(format!("/containers/{SHORT_ID}/stop"))
            .query_param("t", "5");
        then.status(204);
    });
    let restart = server.mock(|when, then| {
        when.method(POST)
            .path(format!("/containers/{SHORT_ID}/restart"))
            .query_param("t", "3");
        then.status(204);
    });

    let client = client_for(&server);
    let container = client.container_handle(SHORT_ID);
    assert!(container.stop(&Options::new().set("t", 5)).expect("stop"));
    assert!(container.restart(&Options::new().set("t", 3)).expect("restart"));

    stop.assert();
    restart.assert();
}

#[test]
fn completed_error_status_still_counts_as_done() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path(format!("/containers/{SHORT_ID}/kill"));
        then.status(404).body("No such container");
    });

    let killed = client_for(&server)
        .container_handle(SHORT_ID)
        .kill()
        .expect("a completed request is not an error");

    mock.assert();
    assert!(killed);
}

#[test]
fn delete_passes_volume_flag() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(DELETE)
            .path(format!("/containers/{SHORT_ID}"))
            .query_param("v", "true");
        then.status(204);
    });

    let deleted = client_for(&server)
        .container_handle(SHORT_ID)
        .delete(&Options::new().set("v", true))
        .expect("delete should succeed");

    mock.assert();
    assert!(deleted);
}

#[test]
fn wait_returns_exit_code() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path(format!("/containers/{SHORT_ID}/wait"));
        then.status(200).json_body(json!({"StatusCode": 137}));
    });

    let code = client_for(&server)
        .container_handle(SHORT_ID)
        .wait()
        .expect("wait should succeed");

    mock.assert();
    assert_eq!(code, 137);
}

#[test]
fn wait_without_status_code_is_a_parse_error() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(POST).path(format!("/containers/{SHORT_ID}/wait"));
        then.status(200).json_body(json!({"Error": null}));
    });

    let err = client_for(&server)
        .container_handle(SHORT_ID)
        .wait()
        .unwrap_err();
    assert!(matches!(err, StevedoreError::ResponseParseError { .. }));
}

#[test]
fn info_adopts_canonical_id_and_parses_times() {
    let server = MockServer::start();
    let inspect = server.mock(|when, then| {
        when.method(GET).path(format!("/containers/{SHORT_ID}/json"));
        then.status(200).json_body(json!({
            "ID": LONG_ID,
            "Created": "2013-05-07T14:51:42.041847+02:00",
            "Path": "date",
            "Args": [],
            "Config": {"Hostname": "4fa6e0f0c678", "Memory": 0},
            "State": {
                "Running": false,
                "Pid": 0,
                "ExitCode": 0,
                "StartedAt": "2013-05-07T14:51:42.087658+02:01"
            },
            "Image": "b750fe79269d2ec9a3c593ef05b4332b1d1a02a62b4accb2c21d589ff2f5f2dc",
            "NetworkSettings": {"IPAddress": "", "Gateway": ""}
        }));
    });
    let stop = server.mock(|when, then| {
        when.method(POST).path(format!("/containers/{LONG_ID}/stop"));
        then.status(204);
    });

    let client = client_for(&server);
    let mut container = client.container_handle(SHORT_ID);
    let details = container.info().expect("info should succeed");

    inspect.assert();
    assert_eq!(details.id.as_str(), LONG_ID);
    assert_eq!(container.id().as_str(), LONG_ID);
    assert_eq!(
        Some(details.created),
        DateTime::parse_from_rfc3339("2013-05-07T14:51:42.041847+02:00")
            .ok()
            .map(|t| t.to_utc())
    );
    assert_eq!(
        details.started_at,
        DateTime::parse_from_rfc3339("2013-05-07T14:51:42.087658+02:01")
            .ok()
            .map(|t| t.to_utc())
    );
    assert_eq!(details.command(), "date");
    assert!(!details.is_running());
    assert_eq!(
        details.document.pointer("/network_settings/ip_address"),
        Some(&json!(""))
    );
    assert_eq!(container.created, Some(details.created));
    assert_eq!(
        container.config.as_ref().and_then(|c| c.get("hostname")),
        Some(&json!("4fa6e0f0c678"))
    );

    assert!(container.stop(&Options::new()).expect("stop should succeed"));
    stop.assert();
}

#[test]
fn info_with_bad_timestamp_is_a_parse_error() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(GET).path(format!("/containers/{SHORT_ID}/json"));
        then.status(200)
            .json_body(json!({"Id": SHORT_ID, "Created": "last tuesday"}));
    });

    let client = client_for(&server);
    let mut container = client.container_handle(SHORT_ID);
    let err = container.info().unwrap_err();
    assert!(err.to_string().contains("created"));
}

#[test]
fn client_container_inspects_once() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path(format!("/containers/{SHORT_ID}/json"));
        then.status(200).json_body(json!({
            "Id": LONG_ID,
            "Created": "2024-02-01T10:00:00Z",
            "Path": "sleep",
            "Args": ["60"],
            "State": {"Running": true}
        }));
    });

    let client = client_for(&server);
    let container = client.container(SHORT_ID).expect("lookup should succeed");

    mock.assert_hits(1);
    assert_eq!(container.id().as_str(), LONG_ID);
    assert_eq!(container.command.as_deref(), Some("sleep 60"));
}

#[test]
fn logs_request_both_streams_without_following() {
    let server = MockServer::start();
    let follow = server.mock(|when, then| {
        when.method(GET)
            .path(format!("/containers/{SHORT_ID}/logs"))
            .query_param("follow", "true");
        then.status(500);
    });
    let logs = server.mock(|when, then| {
        when.method(GET)
            .path(format!("/containers/{SHORT_ID}/logs"))
            .query_param("stdout", "true")
            .query_param("stderr", "true")
            .query_param("tail", "10");
        then.status(200).body("hello\nworld\n");
    });

    let output = client_for(&server)
        .container_handle(SHORT_ID)
        .logs(&Options::new().set("follow", true).set("tail", 10))
        .expect("logs should succeed");

    follow.assert_hits(0);
    logs.assert();
    assert_eq!(output, "hello\nworld\n");
}

#[test]
fn listed_container_adopts_canonical_id_on_info() {
    let server = MockServer::start();
    let list = server.mock(|when, then| {
        when.method(GET).path("/containers/json");
        then.status(200).json_body(json!([{
            "Id": SHORT_ID,
            "Image": "base:latest",
            "Command": "date",
            "Created": 1_367_854_155,
            "Status": "Exit 0"
        }]));
    });
    let inspect = server.mock(|when, then| {
        when.method(GET).path(format!("/containers/{SHORT_ID}/json"));
        then.status(200).json_body(json!({
            "ID": LONG_ID,
            "Created": "2013-05-06T15:29:15.041847+02:00",
            "Path": "date",
            "Args": [],
            "State": {"Running": false, "StartedAt": "2013-05-06T15:29:15.087658+02:00"}
        }));
    });

    let client = client_for(&server);
    let mut containers = client
        .containers(&Options::new())
        .expect("listing should succeed");
    let container = containers.first_mut().expect("one container listed");
    assert_eq!(container.id().as_str(), SHORT_ID);

    let details = container.info().expect("info should succeed");

    list.assert();
    inspect.assert();
    assert_eq!(container.id().as_str(), LONG_ID);
    assert_eq!(details.id.as_str(), LONG_ID);
    assert_eq!(
        container.created,
        DateTime::parse_from_rfc3339("2013-05-06T15:29:15.041847+02:00")
            .ok()
            .map(|t| t.to_utc())
    );
    assert_eq!(
        details.started_at,
        DateTime::parse_from_rfc3339("2013-05-06T15:29:15.087658+02:00")
            .ok()
            .map(|t| t.to_utc())
    );
    assert_eq!(container.image.as_deref(), Some("base:latest"));
}

#[test]
fn rejected_create_reports_daemon_message() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(POST).path("/containers/create");
        then.status(404)
            .json_body(json!({"message": "No such image: nope:latest"}));
    });

    let err = client_for(&server)
        .create_container(&Options::new().set("image", "nope:latest"))
        .unwrap_err();

    assert!(matches!(err, StevedoreError::ResponseParseError { .. }));
    assert!(err.to_string().contains("No such image: nope:latest"));
}

//! Full container lifecycle against a running daemon.
//!
//! Creates a container with a bind mount, starts it, waits for it to exit,
//! prints its output and removes it.
//!
//! Run with:
//! ```bash
//! STEVEDORE_HOST=127.0.0.1 STEVEDORE_PORT=4243 cargo run --example lifecycle
//! ```

use serde_json::json;
use stevedore_client::{Client, Options};
use stevedore_common::error::StevedoreError;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let client = Client::from_env()?;
    let version = client.version()?;
    tracing::info!(daemon = ?version.version, api = ?version.api_version, "connected");

    let mut container = client.create_container(
        &Options::new()
            .set("image", "busybox")
            .set("cmd", "sh -c 'echo Starting...; ls /data; echo Done.'")
            .set("env", json!(["APP_NAME=lifecycle-demo"]))
            .set("bind_mounts", json!([{"src": "/tmp", "dst": "/data", "mode": "ro"}])),
    )?;
    tracing::info!(id = %container.id(), "container created");

    let _ = container.start(&Options::new())?;
    let code = container.wait()?;
    tracing::info!(code, "container exited");

    let details = container.info()?;
    tracing::info!(id = %details.id, command = %details.command(), "inspected");

    print!("{}", container.logs(&Options::new())?);
    let _ = container.delete(&Options::new().set("v", true))?;

    match client.create_container(&Options::new().set("cmd", "true")) {
        Ok(_) => tracing::warn!("expected an error for missing image"),
        Err(StevedoreError::MissingRequiredField { field, operation }) => {
            tracing::info!(field, operation, "missing image rejected before any request");
        }
        Err(e) => tracing::error!(%e, "unexpected error type"),
    }

    Ok(())
}

//! Containers and their lifecycle operations.
//!
//! A [`Container`] is a local handle on a remote container. It borrows the
//! client's [`Dispatcher`] for follow-up calls and caches whatever the last
//! response reported about it. Deleting the remote container leaves the
//! handle stale; nothing tracks aliasing between handles.

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;

use stevedore_common::error::Result;
use stevedore_common::types::ContainerId;

use crate::casing::snake_case_keys;
use crate::dispatcher::{Dispatcher, RequestDescriptor, ResponseKind, malformed};
use crate::mapping::{self, BindMount};
use crate::options::Options;
use crate::query::{self, QueryParams, extract_query};

const CREATE_PATH: &str = "/containers/create";

/// One element of the `GET /containers/json` array, in wire vocabulary.
#[derive(Debug, Deserialize)]
pub(crate) struct ContainerListing {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Image", default)]
    image: Option<String>,
    #[serde(rename = "Command", default)]
    command: Option<String>,
    #[serde(rename = "Created", default)]
    created: Option<i64>,
    #[serde(rename = "Status", default)]
    status: Option<String>,
    #[serde(rename = "SizeRw", default)]
    size_rw: Option<i64>,
    #[serde(rename = "SizeRootFs", default)]
    size_root_fs: Option<i64>,
}

/// Result of inspecting a container, with keys converted to snake_case.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerDetails {
    /// Canonical (full-length) identifier.
    pub id: ContainerId,
    /// Creation time.
    pub created: DateTime<Utc>,
    /// Last start time, if the daemon reported one.
    pub started_at: Option<DateTime<Utc>>,
    /// Executable the container runs.
    pub path: String,
    /// Arguments passed to [`ContainerDetails::path`].
    pub args: Vec<String>,
    /// Container configuration block.
    pub config: Option<Value>,
    /// Runtime state block.
    pub state: Option<Value>,
    /// The complete inspection document.
    pub document: Value,
}

impl ContainerDetails {
    /// The command line: path followed by its arguments.
    #[must_use]
    pub fn command(&self) -> String {
        std::iter::once(self.path.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether the daemon reports the container as running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.document
            .pointer("/state/running")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

/// A container on the daemon, addressed by identity.
#[derive(Debug, Clone)]
pub struct Container<'c> {
    dispatcher: &'c Dispatcher,
    id: ContainerId,
    /// Image the container was created from.
    pub image: Option<String>,
    /// Command line the container runs.
    pub command: Option<String>,
    /// Creation time.
    pub created: Option<DateTime<Utc>>,
    /// Human-readable status, e.g. `Up 2 hours`.
    pub status: Option<String>,
    /// Size of files written by the container, in bytes.
    pub size_rw: Option<i64>,
    /// Total size of the container's root filesystem, in bytes.
    pub size_root_fs: Option<i64>,
    /// Configuration block from the last inspection.
    pub config: Option<Value>,
    /// Bind mounts passed at create time, replayed on start.
    pub bind_mounts: Vec<BindMount>,
}

impl<'c> Container<'c> {
    /// Builds a handle from an identity alone; descriptive fields stay unset
    /// until [`Container::info`] is called.
    #[must_use]
    pub const fn new(dispatcher: &'c Dispatcher, id: ContainerId) -> Self {
        Self {
            dispatcher,
            id,
            image: None,
            command: None,
            created: None,
            status: None,
            size_rw: None,
            size_root_fs: None,
            config: None,
            bind_mounts: Vec::new(),
        }
    }

    pub(crate) fn from_listing(dispatcher: &'c Dispatcher, entry: ContainerListing) -> Self {
        Self {
            image: entry.image,
            command: entry.command,
            created: entry.created.and_then(|secs| DateTime::from_timestamp(secs, 0)),
            status: entry.status,
            size_rw: entry.size_rw,
            size_root_fs: entry.size_root_fs,
            ..Self::new(dispatcher, ContainerId::new(entry.id))
        }
    }

    /// Creates a container on the daemon.
    ///
    /// The `name` option goes to the query string, the rest of the options
    /// through the create rule table. Warnings reported by the daemon are
    /// logged.
    pub(crate) fn create(dispatcher: &'c Dispatcher, options: &Options) -> Result<Self> {
        let (body, mounts) = mapping::create_container_body(options)?;
        let query = extract_query(query::CREATE_CONTAINER, options);

        let res = dispatcher.post_json(CREATE_PATH, query, Some(body))?;
        let id = res.get("Id").and_then(Value::as_str).ok_or_else(|| {
            let reason = res.get("message").and_then(Value::as_str).map_or_else(
                || "response has no Id".to_string(),
                |message| format!("response has no Id: {message}"),
            );
            malformed(&Method::POST, CREATE_PATH, reason)
        })?;

        for warning in res
            .get("Warnings")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
        {
            tracing::warn!(id, warning, "container created with warning");
        }
        tracing::info!(id, "container created");

        let mut container = Self::new(dispatcher, ContainerId::new(id));
        container.bind_mounts = mounts.unwrap_or_default();
        Ok(container)
    }

    /// The identity later calls are issued against.
    #[must_use]
    pub const fn id(&self) -> &ContainerId {
        &self.id
    }

    fn path(&self, action: &str) -> String {
        format!("/containers/{}/{action}", self.id)
    }

    /// Inspects the container and refreshes the cached fields.
    ///
    /// Afterwards the handle uses the canonical identity returned by the
    /// daemon, which may be longer than the one it was built with.
    ///
    /// # Errors
    ///
    /// Returns [`StevedoreError::ResponseParseError`] if the document lacks
    /// an `Id` or `Created`, or a timestamp is not RFC 3339, plus any
    /// dispatch error.
    ///
    /// [`StevedoreError::ResponseParseError`]: stevedore_common::error::StevedoreError::ResponseParseError
    pub fn info(&mut self) -> Result<ContainerDetails> {
        let path = self.path("json");
        let document = snake_case_keys(self.dispatcher.get_json(path.as_str(), QueryParams::new())?);
        let bad = |reason: String| malformed(&Method::GET, &path, reason);

        let id = document
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| bad("inspection has no id".to_string()))?;
        let created = document
            .get("created")
            .and_then(Value::as_str)
            .ok_or_else(|| bad("inspection has no created time".to_string()))?;
        let created = parse_timestamp(created).map_err(|e| bad(format!("created: {e}")))?;
        let started_at = document
            .pointer("/state/started_at")
            .and_then(Value::as_str)
            .map(parse_timestamp)
            .transpose()
            .map_err(|e| bad(format!("state.started_at: {e}")))?;

        let details = ContainerDetails {
            id: ContainerId::new(id),
            created,
            started_at,
            path: document
                .get("path")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            args: document
                .get("args")
                .and_then(Value::as_array)
                .map(|args| args.iter().filter_map(Value::as_str).map(str::to_string).collect())
                .unwrap_or_default(),
            config: document.get("config").cloned(),
            state: document.get("state").cloned(),
            document,
        };

        if details.id != self.id {
            tracing::debug!(from = %self.id, to = %details.id, "adopting canonical container id");
        }
        self.id = details.id.clone();
        self.created = Some(details.created);
        self.config.clone_from(&details.config);
        self.command = Some(details.command());

        Ok(details)
    }

    /// Starts the container.
    ///
    /// Bind mounts given here replace the ones remembered from create time.
    ///
    /// # Errors
    ///
    /// Returns [`StevedoreError::InvalidOption`] for malformed `lxc_conf` or
    /// `bind_mounts`, plus any dispatch error.
    ///
    /// [`StevedoreError::InvalidOption`]: stevedore_common::error::StevedoreError::InvalidOption
    pub fn start(&mut self, options: &Options) -> Result<bool> {
        let (body, given) = mapping::start_container_body(options, &self.bind_mounts)?;
        if let Some(mounts) = given {
            self.bind_mounts = mounts;
        }

        let started = self.dispatcher.post_ok(self.path("start"), QueryParams::new(), Some(body))?;
        tracing::info!(id = %self.id, "container started");
        Ok(started)
    }

    /// Stops the container; `t` is the grace period in seconds.
    ///
    /// # Errors
    ///
    /// Returns any dispatch error.
    pub fn stop(&self, options: &Options) -> Result<bool> {
        let query = extract_query(query::STOP_CONTAINER, options);
        let stopped = self.dispatcher.post_ok(self.path("stop"), query, None)?;
        tracing::info!(id = %self.id, "container stopped");
        Ok(stopped)
    }

    /// Restarts the container; `t` is the grace period in seconds.
    ///
    /// # Errors
    ///
    /// Returns any dispatch error.
    pub fn restart(&self, options: &Options) -> Result<bool> {
        let query = extract_query(query::STOP_CONTAINER, options);
        let restarted = self.dispatcher.post_ok(self.path("restart"), query, None)?;
        tracing::info!(id = %self.id, "container restarted");
        Ok(restarted)
    }

    /// Kills the container.
    ///
    /// # Errors
    ///
    /// Returns any dispatch error.
    pub fn kill(&self) -> Result<bool> {
        let killed = self.dispatcher.post_ok(self.path("kill"), QueryParams::new(), None)?;
        tracing::info!(id = %self.id, "container killed");
        Ok(killed)
    }

    /// Blocks until the container exits and returns its exit code.
    ///
    /// Not subject to the request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`StevedoreError::ResponseParseError`] if the reply has no
    /// integer `StatusCode`, plus any dispatch error.
    ///
    /// [`StevedoreError::ResponseParseError`]: stevedore_common::error::StevedoreError::ResponseParseError
    pub fn wait(&self) -> Result<i64> {
        let path = self.path("wait");
        let request = RequestDescriptor::new(Method::POST, path.as_str(), ResponseKind::Json).unbounded();
        let res = self.dispatcher.json(&request)?;

        let code = res
            .get("StatusCode")
            .and_then(Value::as_i64)
            .ok_or_else(|| malformed(&Method::POST, &path, "response has no StatusCode"))?;
        tracing::debug!(id = %self.id, code, "container exited");
        Ok(code)
    }

    /// Removes the container; `v` also removes its volumes.
    ///
    /// # Errors
    ///
    /// Returns any dispatch error.
    pub fn delete(&self, options: &Options) -> Result<bool> {
        let query = extract_query(query::DELETE_CONTAINER, options);
        let deleted = self
            .dispatcher
            .delete_ok(format!("/containers/{}", self.id), query)?;
        tracing::info!(id = %self.id, "container deleted");
        Ok(deleted)
    }

    /// Fetches the container's output so far.
    ///
    /// Following is not supported, so `follow` is always turned off. Without
    /// `stdout` or `stderr`, both streams are requested.
    ///
    /// # Errors
    ///
    /// Returns any dispatch error.
    pub fn logs(&self, options: &Options) -> Result<String> {
        let mut options = options.clone();
        let _ = options.insert("follow", false);
        if !options.contains("stdout") && !options.contains("stderr") {
            let _ = options.insert("stdout", true);
            let _ = options.insert("stderr", true);
        }

        let query = extract_query(query::CONTAINER_LOGS, &options);
        self.dispatcher.get_text(self.path("logs"), query)
    }
}

fn parse_timestamp(raw: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use stevedore_common::config::ClientConfig;

    use super::*;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(&ClientConfig::default()).expect("valid config")
    }

    #[test]
    fn from_listing_converts_epoch_seconds() {
        let dispatcher = dispatcher();
        let entry: ContainerListing = serde_json::from_value(json!({
            "Id": "8dfafdbc3a40",
            "Image": "base:latest",
            "Command": "echo 1",
            "Created": 1_367_854_155,
            "Status": "Exit 0",
            "SizeRw": 12288,
            "SizeRootFs": 0
        }))
        .expect("valid listing");

        let container = Container::from_listing(&dispatcher, entry);
        assert_eq!(container.id().as_str(), "8dfafdbc3a40");
        assert_eq!(container.image.as_deref(), Some("base:latest"));
        assert_eq!(container.command.as_deref(), Some("echo 1"));
        assert_eq!(container.status.as_deref(), Some("Exit 0"));
        assert_eq!(
            container.created.map(|t| t.timestamp()),
            Some(1_367_854_155)
        );
        assert_eq!(container.size_rw, Some(12288));
        assert!(container.config.is_none());
    }

    #[test]
    fn new_leaves_descriptive_fields_unset() {
        let dispatcher = dispatcher();
        let container = Container::new(&dispatcher, ContainerId::new("abc"));
        assert!(container.image.is_none());
        assert!(container.created.is_none());
        assert!(container.bind_mounts.is_empty());
    }

    #[test]
    fn action_paths_embed_the_id() {
        let dispatcher = dispatcher();
        let container = Container::new(&dispatcher, ContainerId::new("abc"));
        assert_eq!(container.path("start"), "/containers/abc/start");
    }

    #[test]
    fn parse_timestamp_accepts_nanosecond_offsets() {
        let parsed = parse_timestamp("2013-05-07T14:51:42.041847+02:00").expect("valid time");
        assert_eq!(parsed.to_rfc3339(), "2013-05-07T12:51:42.041847+00:00");
    }

    #[test]
    fn parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn details_command_joins_path_and_args() {
        let details = ContainerDetails {
            id: ContainerId::new("abc"),
            created: DateTime::from_timestamp(0, 0).unwrap_or_default(),
            started_at: None,
            path: "date".to_string(),
            args: vec!["-u".to_string(), "+%s".to_string()],
            config: None,
            state: None,
            document: json!({"state": {"running": true}}),
        };
        assert_eq!(details.command(), "date -u +%s");
        assert!(details.is_running());
    }
}

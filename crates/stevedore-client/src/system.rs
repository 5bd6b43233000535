//! Daemon-wide information: `/info` and `/version`.
//!
//! Field names are this client's own; the serde attributes carry the
//! daemon's wire vocabulary so callers never see it.

use serde::{Deserialize, Deserializer};

/// Summary returned by `GET /info`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DaemonInfo {
    /// Number of containers known to the daemon.
    #[serde(rename = "Containers", default)]
    pub containers: Option<u64>,
    /// Number of images known to the daemon.
    #[serde(rename = "Images", default)]
    pub images: Option<u64>,
    /// Whether the daemon runs in debug mode.
    #[serde(rename = "Debug", default, deserialize_with = "flag")]
    pub debug: Option<bool>,
    /// Open file descriptors in the daemon.
    #[serde(rename = "NFd", default)]
    pub fd_count: Option<u64>,
    /// Goroutines running in the daemon.
    #[serde(rename = "NGoroutines", default)]
    pub goroutine_count: Option<u64>,
    /// Whether memory limits are supported.
    #[serde(rename = "MemoryLimit", default, deserialize_with = "flag")]
    pub memory_limit: Option<bool>,
    /// Whether swap limits are supported.
    #[serde(rename = "SwapLimit", default, deserialize_with = "flag")]
    pub swap_limit: Option<bool>,
    /// Whether IPv4 forwarding is enabled on the host.
    #[serde(rename = "IPv4Forwarding", default, deserialize_with = "flag")]
    pub ipv4_forwarding: Option<bool>,
}

/// Build information returned by `GET /version`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DaemonVersion {
    /// Daemon release.
    #[serde(rename = "Version", default)]
    pub version: Option<String>,
    /// Commit the daemon was built from.
    #[serde(rename = "GitCommit", default)]
    pub git_commit: Option<String>,
    /// Go toolchain the daemon was built with.
    #[serde(rename = "GoVersion", default)]
    pub go_version: Option<String>,
    /// Highest API version the daemon speaks.
    #[serde(rename = "ApiVersion", default)]
    pub api_version: Option<String>,
    /// Operating system of the daemon host.
    #[serde(rename = "Os", default)]
    pub os: Option<String>,
    /// CPU architecture of the daemon host.
    #[serde(rename = "Arch", default)]
    pub arch: Option<String>,
}

/// Older daemons report switches as `0`/`1`, newer ones as booleans.
fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(Option::<Flag>::deserialize(deserializer)?.map(|f| match f {
        Flag::Bool(b) => b,
        Flag::Int(i) => i != 0,
    }))
}

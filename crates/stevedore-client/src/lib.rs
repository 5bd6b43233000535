//! # stevedore-client
//!
//! Synchronous client for a container daemon speaking the Docker Remote API
//! over HTTP.
//!
//! Provides:
//! - [`Client`]: daemon-level operations (`info`, `version`, listings) and
//!   container creation.
//! - [`Container`]: lifecycle operations on one container (`start`, `stop`,
//!   `restart`, `kill`, `wait`, `delete`, `info`, `logs`).
//! - [`mapping`] and [`query`]: the declarative translation of [`Options`]
//!   into request bodies and query strings.
//! - [`Dispatcher`]: one blocking HTTP round trip per call.
//!
//! # Example
//!
//! ```rust,no_run
//! use stevedore_client::{Client, Options};
//!
//! # fn main() -> stevedore_common::error::Result<()> {
//! let client = Client::connect()?;
//! let mut container = client.create_container(
//!     &Options::new().set("image", "busybox").set("cmd", "sh -c 'echo hello'"),
//! )?;
//! container.start(&Options::new())?;
//! let code = container.wait()?;
//! # let _ = code;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod casing;
pub mod client;
pub mod container;
pub mod dispatcher;
pub mod image;
pub mod mapping;
pub mod options;
pub mod query;
pub mod shell;
pub mod system;

pub use client::Client;
pub use container::{Container, ContainerDetails};
pub use dispatcher::{Dispatcher, Reply, RequestDescriptor, ResponseKind};
pub use image::Image;
pub use mapping::BindMount;
pub use options::Options;
pub use system::{DaemonInfo, DaemonVersion};

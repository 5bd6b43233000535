//! Entry point of the library.

use serde::de::DeserializeOwned;
use serde_json::Value;

use stevedore_common::config::ClientConfig;
use stevedore_common::error::{Result, StevedoreError};
use stevedore_common::types::ContainerId;

use crate::container::{Container, ContainerListing};
use crate::dispatcher::Dispatcher;
use crate::image::{Image, ImageListing};
use crate::options::Options;
use crate::query::{self, QueryParams, extract_query};
use crate::system::{DaemonInfo, DaemonVersion};

/// Client for one daemon.
///
/// Owns the [`Dispatcher`]; every [`Container`] it hands out borrows it and
/// therefore cannot outlive the client.
#[derive(Debug, Clone)]
pub struct Client {
    config: ClientConfig,
    dispatcher: Dispatcher,
}

impl Client {
    /// Creates a client for the daemon described by `config`.
    ///
    /// No request is sent until an operation is called.
    ///
    /// # Errors
    ///
    /// Returns [`StevedoreError::Config`] if the daemon address is invalid.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let dispatcher = Dispatcher::new(&config)?;
        Ok(Self { config, dispatcher })
    }

    /// Creates a client for the default daemon at `127.0.0.1:4243`.
    ///
    /// # Errors
    ///
    /// Returns [`StevedoreError::Config`] if the HTTP client cannot be built.
    pub fn connect() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    /// Creates a client configured from `STEVEDORE_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`StevedoreError::Config`] on malformed variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// The configuration this client was built with.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The dispatcher issuing this client's requests.
    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Queries daemon-wide counters and capabilities (`GET /info`).
    ///
    /// # Errors
    ///
    /// Returns any dispatch error, or [`StevedoreError::ResponseParseError`]
    /// if a field has an unexpected type.
    pub fn info(&self) -> Result<DaemonInfo> {
        let res = self.dispatcher.get_json("/info", QueryParams::new())?;
        decode("GET", "/info", res)
    }

    /// Queries the daemon's build information (`GET /version`).
    ///
    /// # Errors
    ///
    /// Returns any dispatch error, or [`StevedoreError::ResponseParseError`]
    /// if a field has an unexpected type.
    pub fn version(&self) -> Result<DaemonVersion> {
        let res = self.dispatcher.get_json("/version", QueryParams::new())?;
        decode("GET", "/version", res)
    }

    /// Lists containers (`GET /containers/json`), in the daemon's order.
    ///
    /// Accepted options: `all`, `limit`, `since`, `before`, `size`.
    ///
    /// # Errors
    ///
    /// Returns any dispatch error, or [`StevedoreError::ResponseParseError`]
    /// if the response is not an array of containers.
    pub fn containers(&self, options: &Options) -> Result<Vec<Container<'_>>> {
        const PATH: &str = "/containers/json";

        let query = extract_query(query::LIST_CONTAINERS, options);
        let res = self.dispatcher.get_json(PATH, query)?;
        let entries: Vec<ContainerListing> = decode("GET", PATH, res)?;

        tracing::debug!(count = entries.len(), "listed containers");
        Ok(entries
            .into_iter()
            .map(|entry| Container::from_listing(&self.dispatcher, entry))
            .collect())
    }

    /// Lists images (`GET /images/json`), in the daemon's order.
    ///
    /// Accepted options: `all`.
    ///
    /// # Errors
    ///
    /// Returns any dispatch error, or [`StevedoreError::ResponseParseError`]
    /// if the response is not an array of images.
    pub fn images(&self, options: &Options) -> Result<Vec<Image>> {
        const PATH: &str = "/images/json";

        let query = extract_query(query::LIST_IMAGES, options);
        let res = self.dispatcher.get_json(PATH, query)?;
        let entries: Vec<ImageListing> = decode("GET", PATH, res)?;

        tracing::debug!(count = entries.len(), "listed images");
        Ok(entries.into_iter().map(Image::from_listing).collect())
    }

    /// Creates a container (`POST /containers/create`).
    ///
    /// `image` is required; `name` names the container; `cmd` may be a
    /// shell-style string or an argument array; `bind_mounts` is an array of
    /// `{src, dst, mode}` objects remembered for [`Container::start`].
    ///
    /// # Errors
    ///
    /// Returns [`StevedoreError::MissingRequiredField`] without `image`,
    /// [`StevedoreError::InvalidOption`] for malformed options, plus any
    /// dispatch error.
    pub fn create_container(&self, options: &Options) -> Result<Container<'_>> {
        Container::create(&self.dispatcher, options)
    }

    /// Returns a handle on container `id` without contacting the daemon.
    #[must_use]
    pub fn container_handle(&self, id: impl Into<String>) -> Container<'_> {
        Container::new(&self.dispatcher, ContainerId::new(id))
    }

    /// Returns a handle on container `id`, refreshed by one inspection.
    ///
    /// # Errors
    ///
    /// See [`Container::info`].
    pub fn container(&self, id: impl Into<String>) -> Result<Container<'_>> {
        let mut container = self.container_handle(id);
        let _ = container.info()?;
        Ok(container)
    }
}

fn decode<T: DeserializeOwned>(method: &str, path: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| StevedoreError::ResponseParseError {
        method: method.to_string(),
        path: path.to_string(),
        reason: e.to_string(),
    })
}

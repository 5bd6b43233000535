//! Declarative translation of option bags into wire request bodies.
//!
//! Each operation that sends a JSON body owns an ordered table of
//! [`MappingRule`]s. [`map_fields`] walks the table once; operation-specific
//! overrides (command splitting, bind mounts, LXC settings) then run on the
//! produced body and may replace keys it emitted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use stevedore_common::error::{Result, StevedoreError};

use crate::options::Options;
use crate::shell;

/// Wire body of a request, keyed by the daemon's field names.
pub type WireBody = Map<String, Value>;

/// Default emitted for a rule whose option is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    /// A boolean default.
    Bool(bool),
    /// An integer default.
    Int(i64),
    /// A string default.
    Str(&'static str),
}

impl DefaultValue {
    fn to_value(self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(b),
            Self::Int(i) => Value::from(i),
            Self::Str(s) => Value::from(s),
        }
    }
}

/// How one wire field is filled from the option bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingRule {
    /// Field name in the daemon's JSON schema.
    pub wire_key: &'static str,
    /// Option name the value is read from.
    pub source_key: &'static str,
    /// Value emitted when the option is absent.
    pub default: Option<DefaultValue>,
    /// Whether an absent option without default is an error.
    pub required: bool,
}

impl MappingRule {
    /// Copies the option if present, omits the field otherwise.
    #[must_use]
    pub const fn optional(wire_key: &'static str, source_key: &'static str) -> Self {
        Self {
            wire_key,
            source_key,
            default: None,
            required: false,
        }
    }

    /// Copies the option if present, emits `default` otherwise.
    #[must_use]
    pub const fn with_default(
        wire_key: &'static str,
        source_key: &'static str,
        default: DefaultValue,
    ) -> Self {
        Self {
            wire_key,
            source_key,
            default: Some(default),
            required: false,
        }
    }

    /// Copies the option and fails when it is absent.
    #[must_use]
    pub const fn required(wire_key: &'static str, source_key: &'static str) -> Self {
        Self {
            wire_key,
            source_key,
            default: None,
            required: true,
        }
    }
}

/// Body rules for `POST /containers/create`.
pub const CREATE_CONTAINER: &[MappingRule] = &[
    MappingRule::optional("Hostname", "host"),
    MappingRule::optional("User", "user"),
    MappingRule::optional("Memory", "memory"),
    MappingRule::optional("MemorySwap", "memory_swap"),
    MappingRule::with_default("AttachStdin", "attach_stdin", DefaultValue::Bool(false)),
    MappingRule::with_default("AttachStdout", "attach_stdout", DefaultValue::Bool(true)),
    MappingRule::with_default("AttachStderr", "attach_stderr", DefaultValue::Bool(true)),
    MappingRule::optional("PortSpecs", "port_specs"),
    MappingRule::with_default("Tty", "tty", DefaultValue::Bool(true)),
    MappingRule::with_default("OpenStdin", "open_stdin", DefaultValue::Bool(true)),
    MappingRule::with_default("StdinOnce", "stdin_once", DefaultValue::Bool(true)),
    MappingRule::optional("Env", "env"),
    MappingRule::optional("Cmd", "cmd"),
    MappingRule::required("Image", "image"),
    MappingRule::optional("Volumes", "volumes"),
    MappingRule::optional("VolumesFrom", "volumes_from"),
    MappingRule::optional("WorkingDir", "working_dir"),
    MappingRule::optional("DisableNetwork", "disable_network"),
    MappingRule::optional("ExposedPorts", "exposed_ports"),
];

/// Body rules for `POST /containers/{id}/start`.
pub const START_CONTAINER: &[MappingRule] = &[
    MappingRule::optional("ContainerIDFile", "container_id_file"),
    MappingRule::optional("Privileged", "privileged"),
    MappingRule::optional("PortBindings", "port_bindings"),
    MappingRule::optional("Links", "links"),
    MappingRule::optional("PublishAllPorts", "publish_all_ports"),
    MappingRule::optional("Dns", "dns"),
    MappingRule::optional("DnsSearch", "dns_search"),
    MappingRule::optional("VolumesFrom", "volumes_from"),
    MappingRule::optional("NetworkMode", "network_mode"),
];

/// Runs the declarative pass of `rules` over `options`.
///
/// # Errors
///
/// Returns [`StevedoreError::MissingRequiredField`] for the first required
/// rule that has neither a value nor a default.
pub fn map_fields(
    operation: &'static str,
    rules: &[MappingRule],
    options: &Options,
) -> Result<WireBody> {
    let mut body = WireBody::new();

    for rule in rules {
        let value = if let Some(value) = options.get(rule.source_key) {
            value.clone()
        } else if let Some(default) = rule.default {
            default.to_value()
        } else if rule.required {
            return Err(StevedoreError::MissingRequiredField {
                field: rule.wire_key,
                operation,
            });
        } else {
            continue;
        };
        let _ = body.insert(rule.wire_key.to_string(), value);
    }

    Ok(body)
}

/// A host path (or anonymous volume) mounted into a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindMount {
    /// Host path; `None` makes this a plain volume rather than a bind.
    pub src: Option<String>,
    /// Path inside the container.
    pub dst: String,
    /// Access mode, `rw` when unset.
    pub mode: Option<String>,
}

impl BindMount {
    /// Creates a bind of `src` onto `dst`.
    #[must_use]
    pub fn bind(src: impl Into<String>, dst: impl Into<String>) -> Self {
        Self {
            src: Some(src.into()),
            dst: dst.into(),
            mode: None,
        }
    }

    /// Creates an anonymous volume at `dst`.
    #[must_use]
    pub fn volume(dst: impl Into<String>) -> Self {
        Self {
            src: None,
            dst: dst.into(),
            mode: None,
        }
    }

    /// Sets the access mode.
    #[must_use]
    pub fn mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    /// Reads the `bind_mounts` option, an array of `{src, dst, mode}` objects.
    ///
    /// Returns `Ok(None)` when the option is absent or null.
    ///
    /// # Errors
    ///
    /// Returns [`StevedoreError::InvalidOption`] if the option is not an
    /// array of objects or an entry has no string `dst`.
    pub fn from_options(operation: &'static str, options: &Options) -> Result<Option<Vec<Self>>> {
        let invalid = |message: String| StevedoreError::InvalidOption { operation, message };

        let entries = match options.get("bind_mounts") {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Array(entries)) => entries,
            Some(other) => {
                return Err(invalid(format!("bind_mounts must be an array, got {other}")));
            }
        };

        let text = |entry: &Map<String, Value>, key: &str| -> Result<Option<String>> {
            match entry.get(key) {
                None | Some(Value::Null) => Ok(None),
                Some(Value::String(s)) => Ok(Some(s.clone())),
                Some(other) => Err(invalid(format!("bind mount {key} must be a string, got {other}"))),
            }
        };

        entries
            .iter()
            .map(|entry| {
                let Value::Object(entry) = entry else {
                    return Err(invalid(format!("bind mount must be an object, got {entry}")));
                };
                let dst = text(entry, "dst")?
                    .ok_or_else(|| invalid("bind_mounts must have a dst attribute".to_string()))?;
                Ok(Self {
                    src: text(entry, "src")?,
                    dst,
                    mode: text(entry, "mode")?,
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    /// The `src:dst:mode` form used by `Binds`, or `None` for a plain volume.
    #[must_use]
    pub fn bind_spec(&self) -> Option<String> {
        let src = self.src.as_deref()?;
        let mode = self.mode.as_deref().unwrap_or("rw");
        Some(format!("{src}:{}:{mode}", self.dst))
    }
}

impl From<&BindMount> for Value {
    fn from(mount: &BindMount) -> Self {
        let mut entry = Map::new();
        if let Some(src) = &mount.src {
            let _ = entry.insert("src".to_string(), Value::from(src.as_str()));
        }
        let _ = entry.insert("dst".to_string(), Value::from(mount.dst.as_str()));
        if let Some(mode) = &mount.mode {
            let _ = entry.insert("mode".to_string(), Value::from(mode.as_str()));
        }
        Self::Object(entry)
    }
}

/// Builds the body of `POST /containers/create`.
///
/// On top of [`CREATE_CONTAINER`], a `cmd` string is split into an argument
/// vector and `bind_mounts` replace `Volumes` with one empty object per
/// mount destination. Also returns the parsed bind mounts so the start call
/// can turn them into `Binds`.
///
/// # Errors
///
/// Returns [`StevedoreError::MissingRequiredField`] without `image`, and
/// [`StevedoreError::InvalidOption`] for malformed `bind_mounts` or an
/// unterminated quote in `cmd`.
pub fn create_container_body(options: &Options) -> Result<(WireBody, Option<Vec<BindMount>>)> {
    const OPERATION: &str = "create container";

    let mut body = map_fields(OPERATION, CREATE_CONTAINER, options)?;

    let mounts = BindMount::from_options(OPERATION, options)?;
    if let Some(mounts) = &mounts {
        let volumes: Map<String, Value> = mounts
            .iter()
            .map(|m| (m.dst.clone(), Value::Object(Map::new())))
            .collect();
        let _ = body.insert("Volumes".to_string(), Value::Object(volumes));
    }

    if let Some(Value::String(cmd)) = options.get("cmd") {
        let argv = shell::split(cmd)?;
        let _ = body.insert("Cmd".to_string(), Value::from(argv));
    }

    Ok((body, mounts))
}

/// Builds the body of `POST /containers/{id}/start`.
///
/// On top of [`START_CONTAINER`], `lxc_conf` (an object) becomes the
/// `LxcConf` key/value list and bind mounts become `Binds`. Mounts given in
/// `options` take precedence over `remembered` ones and are returned so the
/// caller can keep them for later starts. `Binds` is emitted whenever
/// `bind_mounts` is given, so an empty array clears the remembered mounts
/// and sends `"Binds": []`.
///
/// # Errors
///
/// Returns [`StevedoreError::InvalidOption`] for a non-object `lxc_conf` or
/// malformed `bind_mounts`.
pub fn start_container_body(
    options: &Options,
    remembered: &[BindMount],
) -> Result<(WireBody, Option<Vec<BindMount>>)> {
    const OPERATION: &str = "start container";

    let mut body = map_fields(OPERATION, START_CONTAINER, options)?;

    match options.get("lxc_conf") {
        None | Some(Value::Null) => {}
        Some(Value::Object(conf)) => {
            let entries: Vec<Value> = conf
                .iter()
                .map(|(k, v)| {
                    let mut entry = Map::new();
                    let _ = entry.insert("Key".to_string(), Value::from(k.as_str()));
                    let _ = entry.insert("Value".to_string(), v.clone());
                    Value::Object(entry)
                })
                .collect();
            let _ = body.insert("LxcConf".to_string(), Value::Array(entries));
        }
        Some(other) => {
            return Err(StevedoreError::InvalidOption {
                operation: OPERATION,
                message: format!("lxc_conf must be an object, got {other}"),
            });
        }
    }

    let given = BindMount::from_options(OPERATION, options)?;
    let mounts = match given.as_deref() {
        Some(mounts) => Some(mounts),
        None if !remembered.is_empty() => Some(remembered),
        None => None,
    };
    if let Some(mounts) = mounts {
        let binds: Vec<Value> = mounts
            .iter()
            .filter_map(BindMount::bind_spec)
            .map(Value::from)
            .collect();
        let _ = body.insert("Binds".to_string(), Value::Array(binds));
    }

    Ok((body, given))
}

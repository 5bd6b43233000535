//! System-wide constants and defaults.

/// Default daemon host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default daemon TCP port.
pub const DEFAULT_PORT: u16 = 4243;

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Environment variable overriding the daemon host.
pub const ENV_HOST: &str = "STEVEDORE_HOST";

/// Environment variable overriding the daemon port.
pub const ENV_PORT: &str = "STEVEDORE_PORT";

/// Environment variable overriding the request timeout (seconds, `0` disables).
pub const ENV_TIMEOUT: &str = "STEVEDORE_TIMEOUT";

/// Content type of every JSON request body.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Application name used in CLI output.
pub const APP_NAME: &str = "stevedore";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "stv";

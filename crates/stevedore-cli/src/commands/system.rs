//! `stv info` and `stv version`: daemon-wide information.

use stevedore_client::Client;
use stevedore_common::constants::APP_NAME;

fn field<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Executes the `info` command.
///
/// # Errors
///
/// Returns an error if the daemon cannot be queried.
pub fn info(client: &Client) -> anyhow::Result<()> {
    let info = client.info()?;

    println!("Containers:       {}", field(info.containers));
    println!("Images:           {}", field(info.images));
    println!("Debug:            {}", field(info.debug));
    println!("File descriptors: {}", field(info.fd_count));
    println!("Goroutines:       {}", field(info.goroutine_count));
    println!("Memory limit:     {}", field(info.memory_limit));
    println!("Swap limit:       {}", field(info.swap_limit));
    println!("IPv4 forwarding:  {}", field(info.ipv4_forwarding));

    Ok(())
}

/// Executes the `version` command.
///
/// # Errors
///
/// Returns an error if the daemon cannot be queried.
pub fn version(client: &Client) -> anyhow::Result<()> {
    let version = client.version()?;

    println!("Client:");
    println!(" {APP_NAME} {}", env!("CARGO_PKG_VERSION"));
    println!("Daemon:");
    println!(" Version:     {}", field(version.version));
    println!(" API version: {}", field(version.api_version));
    println!(" Git commit:  {}", field(version.git_commit));
    println!(" Go version:  {}", field(version.go_version));
    println!(
        " OS/Arch:     {}/{}",
        field(version.os),
        field(version.arch)
    );

    Ok(())
}

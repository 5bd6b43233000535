//! `stv create`: create a container from an image.

use anyhow::{Context, bail};
use clap::Args;
use serde_json::{Value, json};
use stevedore_client::{Client, Options};

/// Arguments for the `create` command.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Image to create the container from.
    #[arg(long)]
    pub image: String,

    /// Name to assign to the container.
    #[arg(long)]
    pub name: Option<String>,

    /// Command to run, split like a shell would.
    #[arg(long)]
    pub cmd: Option<String>,

    /// Environment variable to set (repeatable).
    #[arg(short, long = "env", value_name = "KEY=VALUE")]
    pub env: Vec<String>,

    /// Volume or bind mount (repeatable).
    #[arg(short, long = "volume", value_name = "[SRC:]DST[:MODE]")]
    pub volumes: Vec<String>,

    /// Working directory inside the container.
    #[arg(short, long)]
    pub workdir: Option<String>,

    /// Container hostname.
    #[arg(long)]
    pub hostname: Option<String>,

    /// Start the container right after creating it.
    #[arg(long)]
    pub start: bool,
}

impl CreateArgs {
    fn options(&self) -> anyhow::Result<Options> {
        let mut options = Options::new().set("image", self.image.as_str());
        if let Some(name) = &self.name {
            let _ = options.insert("name", name.as_str());
        }
        if let Some(cmd) = &self.cmd {
            let _ = options.insert("cmd", cmd.as_str());
        }
        if let Some(workdir) = &self.workdir {
            let _ = options.insert("working_dir", workdir.as_str());
        }
        if let Some(hostname) = &self.hostname {
            let _ = options.insert("host", hostname.as_str());
        }
        if !self.env.is_empty() {
            for var in &self.env {
                if !var.contains('=') {
                    bail!("environment variable '{var}' must look like KEY=VALUE");
                }
            }
            let _ = options.insert("env", self.env.clone());
        }
        if let Some(mounts) = bind_mounts(&self.volumes)? {
            let _ = options.insert("bind_mounts", mounts);
        }
        Ok(options)
    }
}

/// Turns `-v` arguments into the `bind_mounts` option, `None` when empty.
pub(crate) fn bind_mounts(specs: &[String]) -> anyhow::Result<Option<Value>> {
    if specs.is_empty() {
        return Ok(None);
    }
    let mounts = specs
        .iter()
        .map(|spec| parse_volume(spec).with_context(|| format!("invalid volume '{spec}'")))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(Some(Value::Array(mounts)))
}

fn parse_volume(spec: &str) -> anyhow::Result<Value> {
    let parts: Vec<&str> = spec.split(':').collect();
    if parts.iter().any(|p| p.is_empty()) {
        bail!("empty path or mode");
    }
    Ok(match parts.as_slice() {
        [dst] => json!({ "dst": dst }),
        [src, dst] => json!({ "src": src, "dst": dst }),
        [src, dst, mode] => json!({ "src": src, "dst": dst, "mode": mode }),
        _ => bail!("expected [SRC:]DST[:MODE]"),
    })
}

/// Executes the `create` command.
///
/// Prints the new container's ID.
///
/// # Errors
///
/// Returns an error if the arguments are malformed or the daemon rejects
/// the request.
pub fn execute(args: &CreateArgs, client: &Client) -> anyhow::Result<()> {
    let options = args.options()?;
    let mut container = client.create_container(&options)?;

    if args.start {
        let _ = container.start(&Options::new())?;
    }
    println!("{}", container.id());

    Ok(())
}

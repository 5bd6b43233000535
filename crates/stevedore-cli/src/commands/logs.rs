//! `stv logs`: print the output of a container.

use clap::Args;
use stevedore_client::{Client, Options};

/// Arguments for the `logs` command.
#[derive(Args, Debug)]
pub struct LogsArgs {
    /// Container ID or name.
    pub container: String,

    /// Number of lines to show from the end of the logs.
    #[arg(long)]
    pub tail: Option<u32>,

    /// Prefix each line with its timestamp.
    #[arg(short, long)]
    pub timestamps: bool,
}

impl LogsArgs {
    fn options(&self) -> Options {
        let mut options = Options::new().set("timestamps", self.timestamps);
        if let Some(tail) = self.tail {
            let _ = options.insert("tail", tail);
        }
        options
    }
}

/// Executes the `logs` command.
///
/// # Errors
///
/// Returns an error if the daemon cannot be reached.
pub fn execute(args: &LogsArgs, client: &Client) -> anyhow::Result<()> {
    let logs = client
        .container_handle(args.container.as_str())
        .logs(&args.options())?;

    if logs.is_empty() {
        println!("No logs available for container: {}", args.container);
    } else {
        print!("{logs}");
    }

    Ok(())
}

//! `stv images`: list images.

use clap::Args;
use stevedore_client::{Client, Options};

use crate::output::{format_created, format_size};

/// Arguments for the `images` command.
#[derive(Args, Debug)]
pub struct ImagesArgs {
    /// Show all images (including intermediate layers).
    #[arg(short, long)]
    pub all: bool,

    /// Only display image IDs.
    #[arg(short, long)]
    pub quiet: bool,
}

/// Executes the `images` command.
///
/// # Errors
///
/// Returns an error if the daemon cannot be queried.
pub fn execute(args: &ImagesArgs, client: &Client) -> anyhow::Result<()> {
    let images = client.images(&Options::new().set("all", args.all))?;

    if args.quiet {
        for image in &images {
            println!("{}", image.id.short());
        }
        return Ok(());
    }

    println!(
        "{:<30} {:<14} {:<16} {:<12}",
        "REFERENCE", "IMAGE ID", "CREATED", "VIRTUAL SIZE"
    );
    for image in &images {
        println!(
            "{:<30} {:<14} {:<16} {:<12}",
            image.reference().unwrap_or_else(|| "<none>".to_string()),
            image.id.short(),
            format_created(image.created),
            format_size(image.virtual_size.or(image.size)),
        );
    }

    Ok(())
}

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::uninlined_format_args)]

mod logging;

use clap::Parser;
use lockwhy_core::{explain, render, Lockfile, LOCKFILE_NAME};
use miette::{IntoDiagnostic, Result};
use std::io::IsTerminal;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lockwhy")]
#[command(author, version, about = "Explain why a package is in your lockfile", long_about = None)]
struct Cli {
    /// Package specs: a name, a lockfile location, or name@range
    #[arg(required = true, value_name = "SPEC")]
    specs: Vec<String>,

    /// Path to the lockfile (defaults to bun.lock in the working directory)
    #[arg(long, value_name = "PATH")]
    lockfile: Option<PathBuf>,

    /// Override the working directory
    #[arg(long, value_name = "PATH")]
    cwd: Option<PathBuf>,

    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit the why trees as JSON (stable, machine-readable)
    #[arg(long)]
    json: bool,

    /// Disable output styling
    #[arg(long)]
    no_color: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.json);

    let cwd = match cli.cwd {
        Some(cwd) => cwd,
        None => std::env::current_dir().into_diagnostic()?,
    };
    let lockfile_path = cli
        .lockfile
        .unwrap_or_else(|| cwd.join(LOCKFILE_NAME));

    // Loaded once; the same model backs both graph construction and the
    // ranges shown in the rendered output.
    let lockfile = Lockfile::load(&lockfile_path).into_diagnostic()?;
    let nodes = explain(&lockfile, &cli.specs).into_diagnostic()?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&nodes).into_diagnostic()?
        );
        return Ok(());
    }

    let dim_paths = !cli.no_color
        && std::io::stdout().is_terminal()
        && std::env::var_os("NO_COLOR").is_none();

    let output = render(&nodes, &lockfile, dim_paths);
    if output.is_empty() {
        tracing::info!("no matching packages in {}", lockfile_path.display());
    } else {
        println!("{output}");
    }

    Ok(())
}

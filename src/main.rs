//! Command-line interface for the depbadge binary.
//!
//! The CLI exposes subcommands for materializing dependency badges into a
//! target file and for rendering the combined markdown to stdout. Invoking
//! the binary without a subcommand runs materialization with the legacy
//! argument set.

use std::{
    env, io,
    path::{Path, PathBuf},
    process
};

use clap::{ArgAction, Args, Parser, Subcommand};
use depbadge::{Error, MaterializeOptions, find_upwards, materialize, preview};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command line interface for materializing dependency badges.
#[derive(Debug, Parser)]
#[command(name = "depbadge", version, about = "Materialize dependency badges")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Legacy argument support for the default materialize command.
    #[command(flatten)]
    legacy: LegacyMaterializeArgs
}

/// Supported commands exposed by the CLI.
#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve, render and inject badges according to the configuration.
    Materialize(MaterializeArgs),
    /// Render the combined badge markdown to stdout without writing files.
    Render(RenderArgs)
}

/// Arguments accepted by the `materialize` subcommand.
#[derive(Debug, Args)]
struct MaterializeArgs {
    /// Path to the YAML configuration document.
    #[arg(long = "config", value_name = "PATH", default_value = "depbadgerc.yml")]
    config: PathBuf,

    /// Directory that receives requested side outputs.
    #[arg(long = "output", value_name = "DIR", default_value = ".depbadge")]
    output: PathBuf,

    /// Fail when the target file cannot be found.
    #[arg(long = "strict-target", action = ArgAction::SetTrue)]
    strict_target: bool
}

/// Arguments accepted when the CLI is invoked without a subcommand.
#[derive(Debug, Args)]
struct LegacyMaterializeArgs {
    /// Path to the YAML configuration document.
    #[arg(long = "config", value_name = "PATH", default_value = "depbadgerc.yml")]
    config: PathBuf,

    /// Directory that receives requested side outputs.
    #[arg(long = "output", value_name = "DIR", default_value = ".depbadge")]
    output: PathBuf,

    /// Fail when the target file cannot be found.
    #[arg(long = "strict-target", action = ArgAction::SetTrue)]
    strict_target: bool
}

/// Arguments accepted by the `render` subcommand.
#[derive(Debug, Args)]
struct RenderArgs {
    /// Path to the YAML configuration document.
    #[arg(long = "config", value_name = "PATH", default_value = "depbadgerc.yml")]
    config: PathBuf
}

/// Entry point that reports errors and sets the appropriate exit status.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .without_time()
        .init();

    if let Err(error) = run() {
        eprintln!("{}", error.to_display_string());
        let code = match error {
            Error::UnsupportedManifest {
                ..
            } => 2,
            _ => 1
        };
        process::exit(code);
    }
}

/// Executes the CLI using parsed arguments.
///
/// # Errors
///
/// Propagates errors originating from configuration loading and the
/// materialization pipeline.
fn run() -> Result<(), Error> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Materialize(args)) => run_materialize(args),
        Some(Command::Render(args)) => run_render(args),
        None => run_materialize(MaterializeArgs {
            config:        cli.legacy.config,
            output:        cli.legacy.output,
            strict_target: cli.legacy.strict_target
        })
    }
}

fn run_materialize(args: MaterializeArgs) -> Result<(), Error> {
    let config_path = resolve_config_path(&args.config)?;
    let report = materialize(&MaterializeOptions {
        config_path,
        output_dir: args.output,
        strict_target: args.strict_target
    })?;

    info!(
        "{} packages materialized, fingerprint {}, {}",
        report.package_count,
        report.fingerprint,
        if report.changed {
            "state updated"
        } else {
            "already up to date"
        }
    );
    Ok(())
}

fn run_render(args: RenderArgs) -> Result<(), Error> {
    let config_path = resolve_config_path(&args.config)?;
    let document = preview(&config_path)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_document(&mut handle, &document)
}

fn write_document<W: io::Write>(writer: &mut W, document: &str) -> Result<(), Error> {
    writer
        .write_all(document.as_bytes())
        .and_then(|()| writer.write_all(b"\n"))
        .map_err(|e| Error::service(format!("failed to write document: {e}")))
}

/// Uses the configured path as given when it exists, otherwise walks up
/// from the working directory looking for it.
fn resolve_config_path(given: &Path) -> Result<PathBuf, Error> {
    if given.exists() {
        return Ok(given.to_path_buf());
    }

    let start = env::current_dir()
        .map_err(|e| Error::service(format!("failed to determine working directory: {e}")))?;
    find_upwards(&given.to_string_lossy(), &start).ok_or_else(|| {
        Error::validation(format!(
            "configuration '{}' not found from the working directory upwards",
            given.display()
        ))
    })
}

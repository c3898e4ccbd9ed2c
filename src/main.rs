use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use theme_bridge::config_io::load_config;
use theme_bridge::Pipeline;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "theme-bridge")]
#[command(about = "Convert IntelliJ themes into a VS Code color-theme package")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./theme-bridge.json when present)
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Theme source directory, overriding the configuration
    #[arg(long, value_name = "DIR")]
    source: Option<PathBuf>,

    /// Package output directory, overriding the configuration
    #[arg(long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Convert every theme and write the VS Code package
    Convert,
    /// Strip prefixed properties from the source JSON files in place
    CleanProperties,
    /// Sync scheme names in the companion XML descriptors
    SyncNames,
    /// Regenerate theme providers in the plugin descriptor
    PluginXml,
    /// Run every step: clean-properties, sync-names, plugin-xml, convert
    All,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(source) = cli.source {
        config.source_dir = source;
    }
    if let Some(output) = cli.output {
        config.output_dir = output;
    }

    let pipeline = Pipeline::new(config);
    let summary = match cli.command {
        Command::Convert => pipeline.convert()?,
        Command::CleanProperties => pipeline.clean_properties()?,
        Command::SyncNames => pipeline.sync_names()?,
        Command::PluginXml => pipeline.update_plugin_xml()?,
        Command::All => pipeline.run_all()?,
    };

    print!("{}", summary);
    Ok(if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

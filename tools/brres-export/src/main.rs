//! brres-export - BRRES animation export tool
//!
//! Converts keyframed curves described by an export manifest into CHR0,
//! CLR0 or SRT0 animation nodes.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use brres_export::{export, manifest::ExportManifest};

#[derive(Parser)]
#[command(name = "brres-export")]
#[command(about = "BRRES animation node export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a node from a manifest file
    Export {
        /// Path to the export manifest (.toml or .json)
        manifest: PathBuf,

        /// Output node file (defaults to the manifest path with the node extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate and encode a manifest without writing a node
    Check {
        /// Path to the export manifest (.toml or .json)
        manifest: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match &cli.command {
        Commands::Export { verbose: true, .. } => tracing::Level::DEBUG,
        _ => tracing::Level::INFO,
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match cli.command {
        Commands::Export {
            manifest,
            output,
            verbose,
        } => {
            let config = ExportManifest::load(&manifest)?;
            let output = output.unwrap_or_else(|| {
                manifest.with_extension(config.settings.node_type.extension())
            });
            if verbose {
                tracing::info!("Exporting {:?} -> {:?}", manifest, output);
            }
            let node = export::export_manifest(&config, &output)?;
            if !node.hints.is_empty() {
                tracing::info!("{} hint(s) reported", node.hints.len());
            }
            tracing::info!("Done!");
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = ExportManifest::load(&manifest)?;
            let node = export::export_node(&config)?;
            tracing::info!(
                "Manifest is valid! {} node would be {} bytes",
                node.node_type,
                node.bytes.len()
            );
        }
    }

    Ok(())
}

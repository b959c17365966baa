//! Command-line interface for gmpack.
//!
//! Provides the `export` command, which turns a selection of a GameMaker
//! project into a local package, and `config` for inspecting settings.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config;
use crate::core::{ExportOptions, ExportReport, ExportRequest, Exporter, SelectionPattern};
use crate::domain::PackageFields;

/// gmpack - Export GameMaker local packages
#[derive(Parser, Debug)]
#[command(name = "gmpack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export a local package
    Export {
        /// Path of the project root
        #[arg(short = 'P', long)]
        project_path: PathBuf,

        /// Glob pattern of the assets to be included in the package
        /// (defaults to the configured pattern, which defaults to "*")
        #[arg(short, long)]
        assets_pattern: Option<String>,

        /// Local package display name
        #[arg(short = 'd', long)]
        package_display_name: String,

        /// Local package ID
        #[arg(short = 'i', long)]
        package_id: String,

        /// Local package publisher name
        #[arg(short = 'p', long)]
        package_publisher_name: String,

        /// Local package version
        #[arg(short = 'v', long)]
        package_version: String,

        /// Local package output file path
        #[arg(short, long)]
        output_file: PathBuf,

        /// Show the selection without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Abort if any resource payload fails to copy
        #[arg(long)]
        fail_on_copy_error: bool,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Export {
                project_path,
                assets_pattern,
                package_display_name,
                package_id,
                package_publisher_name,
                package_version,
                output_file,
                dry_run,
                fail_on_copy_error,
            } => {
                let fields = PackageFields {
                    display_name: package_display_name,
                    id: package_id,
                    publisher: package_publisher_name,
                    version: package_version,
                };
                export_package(
                    project_path,
                    output_file,
                    assets_pattern,
                    fields,
                    dry_run,
                    fail_on_copy_error,
                )
                .await
            }
            Commands::Config => show_config(),
        }
    }
}

/// Export a local package
async fn export_package(
    project_path: PathBuf,
    output_file: PathBuf,
    assets_pattern: Option<String>,
    fields: PackageFields,
    dry_run: bool,
    fail_on_copy_error: bool,
) -> Result<()> {
    let cfg = config::config()?;

    let pattern_str = assets_pattern.unwrap_or_else(|| cfg.assets_pattern.clone());
    let pattern = SelectionPattern::parse(&pattern_str)?;

    let mut options = ExportOptions::from(cfg);
    options.fail_on_copy_error |= fail_on_copy_error;

    let request = ExportRequest {
        project_path,
        output_file,
        pattern,
        fields,
        dry_run,
    };

    let report = Exporter::new(options)
        .export(&request)
        .await
        .with_context(|| format!("Export of {} failed", request.project_path.display()))?;

    print_report(&report);
    Ok(())
}

fn print_report(report: &ExportReport) {
    match &report.output {
        Some(output) => {
            println!("Local package exported in {}", output.display());
            println!(
                "  {} resource(s), {} folder(s)",
                report.resources.len(),
                report.folders.len()
            );
        }
        None => {
            println!("Folders ({}):", report.folders.len());
            for folder in &report.folders {
                println!("  {}", folder);
            }
            println!("Resources ({}):", report.resources.len());
            for resource in &report.resources {
                println!("  {}", resource);
            }
        }
    }

    if !report.flagged_sections.is_empty() {
        eprintln!(
            "\nWarning: sections passed through with references outside the selection: {}",
            report.flagged_sections.join(", ")
        );
    }

    if !report.copy_failures.is_empty() {
        eprintln!("\n{} payload(s) could not be copied:", report.copy_failures.len());
        for failure in &report.copy_failures {
            eprintln!("  {}: {}", failure.resource, failure.error);
        }
    }
}

/// Show resolved configuration
fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("gmpack configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Export:");
    println!("  Staging directory:  {}", cfg.staging_dir.display());
    println!("  Assets pattern:     {}", cfg.assets_pattern);
    println!("  Fail on copy error: {}", cfg.fail_on_copy_error);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_args_parse() {
        let cli = Cli::try_parse_from([
            "gmpack", "export", "-P", "proj", "-d", "Tools", "-i", "com.example.tools", "-p",
            "Example", "-v", "1.0.0", "-o", "out.yymps", "-a", "Scripts/**",
        ])
        .unwrap();

        match cli.command {
            Commands::Export {
                project_path,
                assets_pattern,
                package_version,
                dry_run,
                ..
            } => {
                assert_eq!(project_path, PathBuf::from("proj"));
                assert_eq!(assets_pattern.as_deref(), Some("Scripts/**"));
                assert_eq!(package_version, "1.0.0");
                assert!(!dry_run);
            }
            other => panic!("Expected export command, got {other:?}"),
        }
    }

    #[test]
    fn test_export_requires_package_fields() {
        let result = Cli::try_parse_from(["gmpack", "export", "-P", "proj", "-o", "out.yymps"]);
        assert!(result.is_err());
    }
}

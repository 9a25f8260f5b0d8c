//! CLI commands for data export
//!
//! Exports one month of the ledger. Without `--output` the file goes to the
//! exports directory; `--output -` writes to stdout.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Subcommand;

use super::Scope;
use crate::config::BudgetwisePaths;
use crate::error::{BudgetError, BudgetResult};
use crate::export::{csv, json, yaml};
use crate::storage::Storage;

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export the month's transactions to CSV
    Csv {
        /// Output file path ("-" for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export the month's budget and transactions to JSON
    Json {
        /// Output file path ("-" for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export the month's budget and transactions to YAML
    Yaml {
        /// Output file path ("-" for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle export commands
pub fn handle_export_command(
    storage: &Storage,
    paths: &BudgetwisePaths,
    scope: &Scope,
    cmd: ExportCommands,
) -> BudgetResult<()> {
    let (output, extension) = match &cmd {
        ExportCommands::Csv { output } => (output.clone(), "csv"),
        ExportCommands::Json { output } => (output.clone(), "json"),
        ExportCommands::Yaml { output } => (output.clone(), "yaml"),
    };

    let target = output.unwrap_or_else(|| {
        paths
            .export_dir()
            .join(format!("{}-{}.{}", scope.user, scope.month, extension))
    });

    if target == Path::new("-") {
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        write_export(storage, scope, &cmd, &mut writer)?;
        return Ok(());
    }

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(&target).map_err(|e| {
        BudgetError::Export(format!(
            "Failed to create file {}: {}",
            target.display(),
            e
        ))
    })?;
    let mut writer = BufWriter::new(file);

    write_export(storage, scope, &cmd, &mut writer)?;
    writer
        .flush()
        .map_err(|e| BudgetError::Export(e.to_string()))?;

    println!(
        "Exported {} to: {}",
        scope.month.friendly(),
        target.display()
    );
    Ok(())
}

fn write_export<W: Write>(
    storage: &Storage,
    scope: &Scope,
    cmd: &ExportCommands,
    writer: &mut W,
) -> BudgetResult<()> {
    match cmd {
        ExportCommands::Csv { .. } => {
            csv::export_transactions_csv(storage, &scope.user, scope.month, writer)?;
        }
        ExportCommands::Json { .. } => {
            json::export_month_json(storage, &scope.user, scope.month, writer)?;
        }
        ExportCommands::Yaml { .. } => {
            yaml::export_month_yaml(storage, &scope.user, scope.month, writer)?;
        }
    }
    Ok(())
}

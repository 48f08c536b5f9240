use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use evidence_harmonizer::{HarmonizeConfig, OutputFormat, run};
use log::info;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Parquet,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => Self::Csv,
            FormatArg::Parquet => Self::Parquet,
        }
    }
}

/// Harmonize evidence catalog extracts into dashboard tables.
///
/// Every source must be a CSV export with a header row. Workbook sources
/// such as the grants ledger ("Final" sheet) and the country code table
/// are exported to CSV first.
#[derive(Parser, Debug)]
#[command(name = "evidence-harmonizer", version)]
struct Cli {
    /// Directory holding the source CSV exports (EvidenceCatalog.csv,
    /// AssetHarmonization.csv, CategoryHarmonization.csv,
    /// StatusHarmonization.csv, "Grants Budgets and Payments.csv",
    /// country_codes.csv)
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Directory the output tables are written to
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// JSON configuration file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit every record column instead of the display subset
    #[arg(long)]
    no_subset: bool,

    /// Keep the internal column names
    #[arg(long)]
    no_rename: bool,

    /// Keep rows the dashboard exclusion list would drop
    #[arg(long)]
    no_pre_filter: bool,

    /// Output file format
    #[arg(long, value_enum)]
    format: Option<FormatArg>,
}

impl Cli {
    fn into_config(self) -> Result<(PathBuf, PathBuf, HarmonizeConfig)> {
        let mut config = match &self.config {
            Some(path) => HarmonizeConfig::from_json_file(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?,
            None => HarmonizeConfig::default(),
        };

        if self.no_subset {
            config.output.subset_columns = false;
        }
        if self.no_rename {
            config.output.rename_columns = false;
        }
        if self.no_pre_filter {
            config.output.apply_pre_filters = false;
        }
        if let Some(format) = self.format {
            config.format = format.into();
        }

        Ok((self.data_dir, self.output_dir, config))
    }
}

fn main() -> Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (data_dir, output_dir, config) = Cli::parse().into_config()?;
    info!("Harmonizing sources from: {}", data_dir.display());

    let summary = run(&data_dir, &output_dir, &config)
        .with_context(|| format!("Harmonization of {} failed", data_dir.display()))?;

    info!(
        "Wrote {} records to {} and {} study countries to {} ({} rows pre-filtered)",
        summary.record_rows,
        summary.outputs.records.display(),
        summary.country_rows,
        summary.outputs.countries.display(),
        summary.filtered_rows
    );
    Ok(())
}

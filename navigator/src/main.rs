use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ddi_navigator::config::{ConfigOverrides, NavigatorConfig};
use ddi_navigator::data_handling::evidence_table::EvidenceTable;
use ddi_navigator::data_handling::gene_table::{list_compounds, list_compounds_excluding, GeneInteractionTable};
use ddi_navigator::data_handling::Dataset;
use ddi_navigator::models::RoleMatch;
use ddi_navigator::report::DdiReport;
use ddi_navigator::GeneRoleEngine;

/// Drug-Drug Interaction Navigator
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON configuration file
    #[arg(long, env = "DDI_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Gene-interaction table (xlsx/xls/ods/csv/tsv)
    #[arg(long, env = "DDI_GENE_TABLE", global = true)]
    gene_table: Option<PathBuf>,

    /// Documented-evidence table (xlsx/xls/ods/csv/tsv)
    #[arg(long, env = "DDI_EVIDENCE_TABLE", global = true)]
    evidence_table: Option<PathBuf>,

    /// Worksheet index for workbook inputs
    #[arg(long, global = true)]
    sheet: Option<usize>,

    /// How relation text is searched for role keywords
    #[arg(long, value_enum, env = "DDI_ROLE_MATCH", global = true)]
    role_match: Option<RoleMatch>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze DRUG_A (victim candidate) against DRUG_B (perpetrator candidate)
    Analyze {
        drug_a: String,
        drug_b: String,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
        /// Also write the role table and evidence rows as CSV into this directory
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },
    /// List the compounds of the gene-interaction table
    Compounds {
        /// Leave this compound out (as the second drug picker does)
        #[arg(long)]
        exclude: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let base = match &cli.config {
        Some(path) => NavigatorConfig::from_json_file(path)?,
        None => NavigatorConfig::default(),
    };
    let config = base.with_overrides(ConfigOverrides {
        gene_table: cli.gene_table,
        evidence_table: cli.evidence_table,
        sheet_index: cli.sheet,
        role_match: cli.role_match,
    });

    info!("Starting the Drug-Drug Interaction Navigator");

    let gene_df = GeneInteractionTable {
        path: config.gene_table.clone(),
        sheet_idx: config.sheet_index,
    }
    .load()
    .with_context(|| format!("loading gene-interaction table {}", config.gene_table.display()))?;

    match cli.command {
        Command::Compounds { exclude } => {
            let names = match exclude {
                Some(name) => list_compounds_excluding(&gene_df, &name)?,
                None => list_compounds(&gene_df)?,
            };
            for name in names {
                println!("{name}");
            }
        }
        Command::Analyze { drug_a, drug_b, json, export_dir } => {
            let evidence_df = EvidenceTable {
                path: config.evidence_table.clone(),
                sheet_idx: config.sheet_index,
            }
            .load()
            .with_context(|| format!("loading evidence table {}", config.evidence_table.display()))?;

            let engine = GeneRoleEngine::new(config.role_match);
            let report = DdiReport::build(&gene_df, &evidence_df, &drug_a, &drug_b, &engine);

            if json {
                println!("{}", report.to_json()?);
            } else {
                print!("{}", report.render_text());
            }

            if let Some(dir) = export_dir {
                report
                    .export_csv(&dir)
                    .with_context(|| format!("exporting CSV files to {}", dir.display()))?;
            }
        }
    }

    Ok(())
}

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::GenerateConfig;
use crate::filter::Inclusion;
use crate::generator::Endpoint;

#[derive(Parser, Debug)]
#[command(name = "ekidata-api")]
#[command(version, about = "Generate the static ekidata.jp API from the ekidata CSV tables")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command that reads the CSV tables
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Directory containing pref.csv, company.csv, line.csv, station.csv and join.csv
    #[arg(short, long, env = "EKIDATA_CSV_DIR", default_value = "./csvs")]
    pub input_dir: PathBuf,

    /// Keep shinkansen lines and stations
    #[arg(long, env = "EKIDATA_INCLUDE_SHINKANSEN")]
    pub include_shinkansen: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate JSON and XML documents for every endpoint
    Generate {
        #[command(flatten)]
        input: InputArgs,

        /// Root directory of the generated API
        #[arg(short, long, env = "EKIDATA_OUTPUT_DIR", default_value = "./public/api")]
        output_dir: PathBuf,

        /// Only generate these endpoints (comma-separated: pref,line,station,group,join or p,l,s,g,n)
        #[arg(long, value_delimiter = ',')]
        only: Option<Vec<Endpoint>>,

        /// Build every document but write nothing
        #[arg(long)]
        dry_run: bool,

        /// Hide progress bars
        #[arg(short, long)]
        quiet: bool,
    },

    /// Load the tables and report dangling references
    Check {
        #[command(flatten)]
        input: InputArgs,
    },

    /// List the source tables and their columns
    ListTables,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

impl InputArgs {
    pub fn inclusion(&self) -> Inclusion {
        Inclusion::new(self.include_shinkansen)
    }
}

impl Commands {
    /// Pipeline configuration for the `generate` command
    pub fn generate_config(&self) -> Option<GenerateConfig> {
        match self {
            Commands::Generate {
                input,
                output_dir,
                only,
                ..
            } => Some(GenerateConfig {
                input_dir: input.input_dir.clone(),
                output_dir: output_dir.clone(),
                inclusion: input.inclusion(),
                endpoints: only.clone().unwrap_or_else(|| Endpoint::ALL.to_vec()),
            }),
            _ => None,
        }
    }
}

//! Run configuration: environment (`.env` aware) with command-line
//! overrides.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::sources::SourcePaths;

#[derive(Parser, Debug, Default)]
#[command(
    name = "transformer",
    about = "Harmonizes food recall sources into a star schema"
)]
pub struct Args {
    /// Directory for the CSV tables (overrides OUTPUT_DIR)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// JSON file replacing built-in reason classification tables
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Dry run - build and report, write nothing
    #[arg(long, default_value = "false")]
    pub dry_run: bool,

    /// Also load the tables into PostgreSQL (requires DB_URL)
    #[arg(long, default_value = "false")]
    pub load_db: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub sources: SourcePaths,
    pub output_dir: PathBuf,
    pub date_start_year: i32,
    pub date_end_year: i32,
    pub db_url: Option<String>,
    pub rules: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let path = |key: &str, default: &str| PathBuf::from(var(key).unwrap_or_else(|| default.to_string()));
        let year = |key: &str, default: i32| -> Result<i32> {
            match var(key) {
                Some(v) => v.trim().parse().with_context(|| format!("{key} must be a year, got {v:?}")),
                None => Ok(default),
            }
        };

        Ok(Self {
            sources: SourcePaths {
                fda: path(
                    "FDA_JSON_PATH",
                    "./data/input/fda-data-usa/food-enforcement-0001-of-0001.json",
                ),
                fsis: path(
                    "FSIS_PATH",
                    "./data/input/fsis-data-usa/FSIS_ALL_YEARS_COMPLETE.xlsx",
                ),
                rasff_dir: path("RASFF_DIR", "./data/input/rasff-data-europe"),
                uk_fsa: path(
                    "UK_FSA_JSON_PATH",
                    "./data/input/json/uk_fsa_alerts_2019-2026.json",
                ),
                cdc_dir: path("CDC_JSON_DIR", "./data/input/json"),
                caers: path(
                    "CAERS_JSON_PATH",
                    "./data/input/fda-data-usa/food-event-0001-of-0001.json",
                ),
            },
            output_dir: path("OUTPUT_DIR", "./data/output/star"),
            date_start_year: year("DATE_DIM_START_YEAR", 2012)?,
            date_end_year: year("DATE_DIM_END_YEAR", 2026)?,
            db_url: var("DB_URL").filter(|v| !v.trim().is_empty()),
            rules: var("RULES_PATH").map(PathBuf::from),
        })
    }

    pub fn with_args(mut self, args: &Args) -> Self {
        if let Some(dir) = &args.output_dir {
            self.output_dir = dir.clone();
        }
        if let Some(rules) = &args.rules {
            self.rules = Some(rules.clone());
        }
        self
    }
}

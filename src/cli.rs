use std::path::PathBuf;

use clap::Parser;
use log::{debug, info};

use crate::config::{Config, RejectPolicy};
use crate::error::MigrateError;
use crate::fs_ops::OsFileOps;
use crate::migration::Migration;

#[derive(Parser, Debug)]
#[command(
    name = "cms-file-migrate",
    version,
    about = "Rename CMS document files to their slugs and generate the SQL that repoints them"
)]
pub struct Cli {
    /// JSON manifest: a list of {id, file, slug} records
    pub manifest: PathBuf,

    /// Folder the record paths are resolved against
    pub root: PathBuf,

    /// File the generated SQL is written to (created or overwritten)
    pub output: PathBuf,

    /// Configuration file (default: config.toml in the local data directory)
    #[arg(long = "config", short = 'c')]
    pub config: Option<PathBuf>,

    /// How to handle manifest records that cannot be parsed (overrides config)
    #[arg(
        long = "rejected",
        value_parser = clap::builder::PossibleValuesParser::new(["silent", "warn", "fail"])
    )]
    pub rejected: Option<String>,

    /// Plan renames and print the SQL without touching any file
    #[arg(long = "dry-run", default_value_t = false)]
    pub dry_run: bool,
}

impl Cli {
    /// Loads configuration, applying command-line overrides on top of it.
    pub fn load_config(&self) -> Result<Config, MigrateError> {
        let mut config = Config::load_config(self.config.as_deref())?;

        if let Some(rejected) = &self.rejected {
            let policy: RejectPolicy = rejected
                .parse()
                .map_err(|_| MigrateError::Error(format!("Invalid rejected policy: {}", rejected)))?;
            config.migration.set_reject_policy(policy);
        }

        Ok(config)
    }

    pub fn execute(&self, config: &Config) -> Result<(), MigrateError> {
        debug!("Command-line args: {:?}", self);

        let migration = Migration::new(&self.manifest, &self.root, &self.output)
            .with_reject_policy(config.migration.reject_policy())
            .with_dry_run(self.dry_run);

        let report = migration.run(&OsFileOps)?;
        info!("{}", report);

        if self.dry_run {
            print!("{}", report.sql);
        }

        Ok(())
    }
}

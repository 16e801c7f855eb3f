mod cli;
mod config;
mod error;
mod field_parser;
mod field_text;
mod fs_ops;
mod manifest;
mod migration;
mod sql;
mod transformer;

use clap::Parser;
use cli::Cli;
use config::Config;
use error::MigrateError;
use flexi_logger::{Logger, LoggerHandle};
use log::error;

fn setup_logging(config: &Config) -> Result<LoggerHandle, MigrateError> {
    // RUST_LOG, when set, takes precedence over the configured level
    let handle = Logger::try_with_env_or_str(config.logging.log_spec())?
        .format(flexi_logger::default_format)
        .start()?;

    Ok(handle)
}

fn main() {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };

    let _logger = match setup_logging(&config) {
        Ok(handle) => handle,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = cli.execute(&config) {
        error!("{:?}", err);
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

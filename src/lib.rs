pub mod app;
pub mod calculator;
pub mod cli;
pub mod config;
pub mod export;
pub mod parser;

use anyhow::Result;
use log::*;

/// Load the configuration (an explicit path wins over the default location)
/// and run the requested command.
pub fn run(cli: cli::Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let mut app = app::Application::new(config);
    info!("Initializing evcalc");
    app.run(cli.command)
}

pub fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Debug-level logger without timestamps for library users and tests.
/// Safe to call more than once; later calls leave the first logger in place.
pub fn init_logger() {
    let _ = env_logger::Builder::new()
        .filter_module("evcalc", LevelFilter::Debug)
        .format_timestamp(None)
        .format_target(false)
        .is_test(true)
        .try_init();
}

// Re-export commonly used types
pub use calculator::{Event, EventSheet};
pub use config::Config;
pub use export::OutputFormat;
pub use parser::{ParsedEvent, TimeOfDay};

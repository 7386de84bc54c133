use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use evcalc::cli::Cli;
use log::debug;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The configured level applies unless RUST_LOG or --verbose says otherwise
    let level = if cli.verbose {
        "debug".to_string()
    } else {
        match evcalc::load_config(cli.config.as_deref()) {
            Ok(config) => config.logging.level,
            Err(_) => "info".to_string(),
        }
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(level.as_str()))
        .format(|buf, record| {
            use chrono::Local;
            use std::io::Write;
            writeln!(
                buf,
                "{} [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();

    debug!("Command line: {:?}", cli);
    evcalc::run(cli)
}

use anyhow::Context;
use clap::Parser;
use clap::error::ErrorKind;
use directory_cli::cli::{Cli, USAGE, dispatch};
use directory_cli::config::Config;
use directory_cli::error::Result;
use log::{error, info};
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
        }
    };

    // Load .env file if it exists; it may carry RUST_LOG
    dotenvy::dotenv().ok();

    if let Err(e) = init_logging(cli.log_file.as_deref()) {
        eprintln!("{:#}", e);
        return ExitCode::from(1);
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if err.is_usage() {
                eprintln!("{}", USAGE);
            }
            let code = err.exit_code();
            error!("{:?}", anyhow::Error::from(err));
            ExitCode::from(code)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let command = cli.command()?;
    info!("Starting directory-cli {}", command);

    let config = Config::load(cli.config.as_deref(), &cli.overrides)?;
    dispatch(command, &config, |entry| info!("{}", entry))
}

fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {:?}", path))?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        None => {
            builder.target(env_logger::Target::Stdout);
        }
    }

    builder.try_init()?;
    Ok(())
}

//! Interactive mock voting booth.

use std::io;
use std::sync::Arc;

use clap::{Arg, ArgAction, ArgMatches, Command};
use log::{error, info};
use thiserror::Error;

use mock_voting::{
    logging,
    wizard::{self, OutputFormat, Wizard},
    Config, Session,
};

const PROGRAM_NAME: &str = "mock-voting";

const ABOUT_TEXT: &str = "Walk through a mock vote: register, pick a candidate, \
confirm, and get a receipt. Nothing is stored; everything is forgotten on exit.";

const CONFIG: &str = "CONFIG";
const LOG_CONFIG: &str = "LOG_CONFIG";
const LIST_CANDIDATES: &str = "LIST_CANDIDATES";
const JSON: &str = "JSON";

/// Construct the CLI configuration.
fn cli() -> Command {
    // Make the build dirty when the toml changes.
    include_str!("../Cargo.toml");

    clap::command!(PROGRAM_NAME)
        .about(ABOUT_TEXT)
        .arg(
            Arg::new(CONFIG)
                .long("config")
                .help("Path to the TOML config file")
                .action(ArgAction::Set)
                .default_value("Voting.toml"),
        )
        .arg(
            Arg::new(LOG_CONFIG)
                .long("log-config")
                .help("Path to the log4rs YAML config file")
                .action(ArgAction::Set)
                .default_value("log4rs.yaml"),
        )
        .arg(
            Arg::new(LIST_CANDIDATES)
                .long("list-candidates")
                .help("Print the candidates and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(JSON)
                .long("json")
                .help("Print receipts and listings as JSON")
                .action(ArgAction::SetTrue),
        )
}

/// Errors that end the program.
#[derive(Debug, Error)]
enum Error {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] mock_voting::Error),
    #[error("Terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

fn run(args: &ArgMatches) -> Result<(), Error> {
    // Default values guarantee presence.
    let config_path: &String = args.get_one(CONFIG).unwrap();
    let format = if args.get_flag(JSON) {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let config = Config::load(config_path)?;
    let registry = Arc::new(config.registry()?);
    info!(
        "Loaded {} candidates, minimum age {}",
        registry.len(),
        config.minimum_age()
    );

    if args.get_flag(LIST_CANDIDATES) {
        wizard::list_candidates(&registry, format, &mut io::stdout().lock())?;
        return Ok(());
    }

    let session = Session::new(registry, config.rules());
    let mut wizard = Wizard::new(io::stdin().lock(), io::stdout().lock(), format);
    wizard.run(session.into())?;
    info!("Voting booth closed");
    Ok(())
}

fn main() {
    let args = cli().get_matches();

    // Set up logging.
    let log_config: &String = args.get_one(LOG_CONFIG).unwrap();
    if let Err(err) = logging::init(log_config) {
        eprintln!("{err}");
        std::process::exit(1)
    }
    info!("Initialised logging");

    if let Err(err) = run(&args) {
        eprintln!("{err}");
        error!("{err}");
        error!("Critical failure, shutting down");
        std::process::exit(1)
    }
}

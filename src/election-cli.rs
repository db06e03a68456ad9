//! A simple CLI tool for replaying recorded panchayat elections.
//! This uses the library's own registry, so the results are exactly what the
//! engine would have produced had the votes been cast live.

use std::fmt::{Display, Formatter};

use clap::{Arg, ArgAction, ArgMatches, Command};
use log::LevelFilter;

use panchayat_election::{
    logging,
    model::scenario::{ElectionScenario, ScenarioOutcome},
    Config, Error as LibError,
};

const PROGRAM_NAME: &str = "election-cli";

const ABOUT_TEXT: &str = "Replay a recorded panchayat election and report the results.

EXIT CODES:
     0: The election has a winner.
   255: Ran successfully, but nobody won.
 Other: Error.";

const SCENARIO_PATH: &str = "SCENARIO_PATH";

const SCENARIO_PATH_HELP: &str = "The path to a JSON election scenario, with \
`candidates`,\n`voters`, `votes` and optionally `regions`";

const CONFIG: &str = "config";

const VERBOSE: &str = "verbose";

/// Construct the CLI configuration.
fn cli() -> Command {
    // Make the build dirty when the toml changes.
    include_str!("../Cargo.toml");

    clap::command!(PROGRAM_NAME)
        .about(ABOUT_TEXT)
        .arg(
            Arg::new(SCENARIO_PATH)
                .help(SCENARIO_PATH_HELP)
                .action(ArgAction::Set)
                .required(true),
        )
        .arg(
            Arg::new(CONFIG)
                .help("Configuration file to use instead of Election.toml")
                .long(CONFIG)
                .short('c')
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new(VERBOSE)
                .help("Log every registration and vote")
                .long(VERBOSE)
                .short('v')
                .action(ArgAction::SetTrue),
        )
}

/// Errors that this program may produce.
#[derive(Debug, Eq, PartialEq)]
enum Error {
    /// IO error described by the inner message.
    IO(String),
    /// Failed to decode the JSON scenario.
    Format(String),
    /// Failed to load the configuration.
    Config(String),
    /// The region tree was too deeply nested.
    Regions(String),
}

impl From<LibError> for Error {
    fn from(err: LibError) -> Self {
        let msg = err.to_string();
        match err {
            LibError::Io(_) => Self::IO(msg),
            LibError::Json(_) => Self::Format(msg),
            LibError::Config(_) => Self::Config(msg),
            LibError::RegionTooDeep { .. } => Self::Regions(msg),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IO(msg) => write!(f, "IO error: {}", msg),
            Self::Format(msg) => write!(f, "Invalid JSON: {}", msg),
            Self::Config(msg) => write!(f, "Invalid configuration: {}", msg),
            Self::Regions(msg) => write!(f, "Invalid regions: {}", msg),
        }
    }
}

/// Load the config and the scenario, and run it.
fn replay(path: &str, config_path: Option<&String>) -> Result<ScenarioOutcome, Error> {
    let config = match config_path {
        Some(config_path) => Config::load_from(config_path)?,
        None => Config::load()?,
    };
    let scenario = ElectionScenario::from_file(path)?;
    let outcome = scenario.run(&config.validation_rules(), config.max_region_depth())?;
    Ok(outcome)
}

/// Print a human-readable report of the outcome.
fn report(outcome: &ScenarioOutcome) {
    println!("Results:");
    for (rank, result) in outcome.results.iter().enumerate() {
        println!("  {}. {}", rank + 1, result);
    }
    match &outcome.winner {
        Some(winner) => println!("Winner: {} ({})", winner.name, winner.party),
        None => println!("No winner"),
    }
    if !outcome.rejections.is_empty() {
        println!("Rejected registrations:");
        for rejection in &outcome.rejections {
            let who = rejection.voter_id.as_deref().unwrap_or("<no id>");
            println!("  #{} {}: {}", rejection.index, who, rejection.reason);
        }
    }
    if !outcome.failed_votes.is_empty() {
        println!("Refused votes:");
        for failed in &outcome.failed_votes {
            println!(
                "  {} -> {}: {}",
                failed.vote.voter_id, failed.vote.candidate_id, failed.reason
            );
        }
    }
    if let Some(region_votes) = outcome.region_votes {
        println!("Votes across regions: {}", region_votes);
    }
}

/// Run the replay, report the result, and return the exit code.
fn run(args: &ArgMatches) -> u8 {
    // Required argument is guaranteed to be present.
    let path: &String = args.get_one(SCENARIO_PATH).unwrap();
    let config_path: Option<&String> = args.get_one(CONFIG);
    match replay(path, config_path) {
        Ok(outcome) => {
            report(&outcome);
            if outcome.winner.is_some() {
                0
            } else {
                255
            }
        }
        Err(err) => {
            println!("{}", err);
            1
        }
    }
}

fn main() {
    let args = cli().get_matches();

    // Set up logging. Verbose mode bypasses the config file.
    if args.get_flag(VERBOSE) {
        logging::init_console(LevelFilter::Debug);
    } else {
        let log_config = Config::load()
            .map(|c| c.log_config().to_string())
            .unwrap_or_else(|_| Config::default().log_config().to_string());
        logging::init(log_config, LevelFilter::Warn);
    }

    let exit_code = run(&args);
    std::process::exit(exit_code.into())
}

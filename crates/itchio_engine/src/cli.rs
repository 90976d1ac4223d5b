//! Command-line interface for the Itchio2D engine.
//!
//! Every option here overrides the matching value in the configuration
//! file.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, Command};

use crate::config::AppConfig;

/// Command line arguments parsed from user input.
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Path to the configuration file
    pub config_path: PathBuf,
    /// Optional override for the game type
    pub game_type: Option<String>,
    /// Optional override for the systems directory
    pub systems_dir: Option<PathBuf>,
    /// Optional override for the number of frames to run
    pub max_frames: Option<u64>,
    /// Optional override for log level
    pub log_level: Option<String>,
    /// Whether to force JSON log output
    pub json_logs: bool,
}

fn command() -> Command {
    Command::new("Itchio 2D Engine")
        .version(env!("CARGO_PKG_VERSION"))
        .about("2D engine host that drives dynamically loaded game systems")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("game-type")
                .short('g')
                .long("game-type")
                .value_name("NAME")
                .help("Game type to run (e.g., GameTypeA)"),
        )
        .arg(
            Arg::new("systems")
                .short('s')
                .long("systems")
                .value_name("DIR")
                .help("Systems directory path"),
        )
        .arg(
            Arg::new("frames")
                .short('f')
                .long("frames")
                .value_name("COUNT")
                .help("Stop after this many frames")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (trace, debug, info, warn, error)"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .help("Output logs in JSON format")
                .action(ArgAction::SetTrue),
        )
}

impl CliArgs {
    /// Parses the process arguments, exiting with usage on error.
    pub fn parse() -> Self {
        Self::from_matches(&command().get_matches())
    }

    /// Parses an explicit argument list.
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Ok(Self::from_matches(&command().try_get_matches_from(args)?))
    }

    fn from_matches(matches: &clap::ArgMatches) -> Self {
        Self {
            config_path: matches
                .get_one::<String>("config")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("config.toml")),
            game_type: matches.get_one::<String>("game-type").cloned(),
            systems_dir: matches.get_one::<String>("systems").map(PathBuf::from),
            max_frames: matches.get_one::<u64>("frames").copied(),
            log_level: matches.get_one::<String>("log-level").cloned(),
            json_logs: matches.get_flag("json-logs"),
        }
    }

    /// Applies command-line overrides on top of a loaded configuration.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(game_type) = &self.game_type {
            config.engine.game_type = game_type.clone();
        }
        if let Some(dir) = &self.systems_dir {
            config.systems.directory = dir.to_string_lossy().into_owned();
        }
        if let Some(frames) = self.max_frames {
            config.engine.max_frames = frames;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if self.json_logs {
            config.logging.json_format = true;
        }
    }
}

//! Command-line interface
//!
//! No stability guaranties apply

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use clap::Parser;
use log::{debug, LevelFilter};

use self::config::Config;
use crate::{report::ReportOptions, Error, RegionStore, Report};

pub mod config;

/// Decode a Raspberry Pi OTP dump.
///
/// Reads the output of `vcgencmd otp_dump` from INPUT, or from standard input
/// if no file is given.
#[derive(Debug, Parser)]
#[command(about, version)]
pub struct Cli {
    /// OTP dump to decode
    pub input: Option<PathBuf>,

    /// Configuration file to use instead of the default search path
    #[arg(long, env = "RPI_OTP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Minimum level of log messages to print
    #[arg(long, default_value_t = LevelFilter::Info)]
    pub log_level: LevelFilter,

    /// Do not print raw binary values
    #[arg(long)]
    pub no_binary: bool,
}

impl Cli {
    /// Report options from the configuration, with command-line overrides
    pub fn report_options(&self, config: &Config) -> ReportOptions {
        let mut options = ReportOptions::from(&config.report);
        if self.no_binary {
            options.show_binary = false;
        }

        options
    }
}

/// Read the dump at `path`, or from standard input
pub fn read_input(path: Option<&Path>) -> Result<RegionStore, Error> {
    match path {
        Some(path) => {
            debug!("Reading OTP dump from {}", path.display());
            let file = File::open(path).map_err(|source| Error::InputUnavailable {
                path: path.to_path_buf(),
                source,
            })?;

            read_store(BufReader::new(file))
        }
        None => {
            debug!("Reading OTP dump from standard input");
            read_store(io::stdin().lock())
        }
    }
}

fn read_store(reader: impl BufRead) -> Result<RegionStore, Error> {
    let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;

    RegionStore::load(lines)
}

/// Decode the dump selected by `args` into a report
pub fn run(args: &Cli, config: &Config) -> Result<Report, Error> {
    let store = read_input(args.input.as_deref())?;

    Report::generate(&store, &args.report_options(config))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_arguments() {
        let args = Cli::parse_from(["rpi-otp", "dump.txt", "--no-binary", "--log-level", "debug"]);

        assert_eq!(args.input, Some(PathBuf::from("dump.txt")));
        assert_eq!(args.log_level, LevelFilter::Debug);
        assert!(args.no_binary);
    }

    #[test]
    fn input_is_optional() {
        let args = Cli::parse_from(["rpi-otp"]);

        assert_eq!(args.input, None);
        assert_eq!(args.log_level, LevelFilter::Info);
    }

    #[test]
    fn flag_overrides_config() {
        let args = Cli::parse_from(["rpi-otp", "--no-binary"]);
        let options = args.report_options(&Config::default());

        assert!(!options.show_binary);
        assert!(options.show_unknown_regions);
    }

    #[test]
    fn reads_lines_from_a_reader() {
        let store = read_store("17:1020000a\n18:1020000a\n".as_bytes()).unwrap();

        assert_eq!(store.len(), 2);
    }

    #[test]
    fn missing_file_is_unavailable() {
        let result = read_input(Some(Path::new("does/not/exist.txt")));

        assert!(matches!(result, Err(Error::InputUnavailable { .. })));
    }
}

use clap::Parser;
use log::debug;
use miette::Result;
use rpi_otp::{
    cli::{config::Config, run, Cli},
    logging::initialize_logger,
};

fn main() -> Result<()> {
    miette::set_panic_hook();

    // Attempt to parse any provided command-line arguments, or print the help
    // message and terminate if the invocation is not correct.
    let args = Cli::parse();
    initialize_logger(args.log_level);
    debug!("{:#?}", args);

    // Load any user configuration, if present.
    let config = Config::load(args.config.as_deref())?;

    // Nothing is printed until the whole dump has been decoded.
    let report = run(&args, &config)?;
    print!("{report}");

    // Warnings are shown whatever the log level.
    for warning in &report.warnings {
        eprintln!("{:?}", miette::Report::new(warning.clone()));
    }

    Ok(())
}

use std::process::ExitCode;

use log::{debug, error};

use fealab::cli::{run, CliArgs};
use fealab::utils::init_logging;

fn main() -> ExitCode {
    let args = CliArgs::parse_args();
    let config = args.config();
    init_logging(&config);
    debug!("Debug mode enabled");

    match run(args.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

use std::process::ExitCode;

use cord_explorer::config::Config;
use cord_explorer::present::{self, BatchPresenter};

fn main() -> ExitCode {
    env_logger::init();

    let result = Config::load().and_then(|config| present::run(BatchPresenter::new(), &config));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

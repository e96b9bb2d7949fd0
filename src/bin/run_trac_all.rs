use clap::Parser;

use tracall::cli::logging::setup_logging;
use tracall::cli::{output, run_cross_sectional, CliError, CrossSectionalArgs};
use tracall::config::Settings;
use tracall::infrastructure::di::ServiceContainer;

fn main() {
    let args = CrossSectionalArgs::parse();
    setup_logging(args.pipeline.verbose);

    let result = Settings::load()
        .map_err(CliError::from)
        .and_then(|settings| run_cross_sectional(&args, &ServiceContainer::new(settings)));

    if let Err(e) = result {
        output::error(&e);
        std::process::exit(e.exit_code());
    }
}

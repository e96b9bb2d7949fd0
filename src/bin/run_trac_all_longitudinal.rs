use clap::Parser;

use tracall::cli::logging::setup_logging;
use tracall::cli::{output, run_longitudinal, CliError, LongitudinalArgs};
use tracall::config::Settings;
use tracall::infrastructure::di::ServiceContainer;

fn main() {
    let args = LongitudinalArgs::parse();
    setup_logging(args.pipeline.verbose);

    let result = Settings::load()
        .map_err(CliError::from)
        .and_then(|settings| run_longitudinal(&args, &ServiceContainer::new(settings)));

    if let Err(e) = result {
        output::error(&e);
        std::process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        LongitudinalArgs::command().debug_assert();
    }
}

use ipv4_matcher::cli;
use ipv4_matcher::{Matcher, MatcherConfig};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    cli::init_logging()?;
    log::info!("#Start main()");

    let config = MatcherConfig::from_env()?;
    let matcher = Matcher::from_config(&config)?.with_logger(cli::console_logger());

    let stdin = std::io::stdin();
    cli::run(&matcher, stdin.lock(), std::io::stdout())?;

    log::info!("#End main()");
    Ok(())
}

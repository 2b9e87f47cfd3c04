//! Routes a parsed command line to its handler.

use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use super::command::{Cli, Commands, ConfigCommand};
use super::{config, notify, predict, report, score, show};

/// Run the parsed command line.
///
/// # Errors
///
/// Returns the first error from configuration loading or the command itself.
pub async fn dispatch(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Predict(args) => {
            let config = prepare(cli, &args.config)?;
            predict::execute(&config, args).await
        }
        Commands::Score(args) => {
            let config = prepare(cli, &args.config)?;
            score::execute(&config, args).await
        }
        Commands::Notify(args) => {
            let config = prepare(cli, &args.config)?;
            notify::execute(&config, args).await
        }
        Commands::Show(args) => {
            let config = prepare(cli, &args.config)?;
            show::execute(&config, args)
        }
        Commands::Report(args) => {
            let config = prepare(cli, &args.config)?;
            report::execute(&config, args)
        }
        Commands::Config(ConfigCommand::Init(args)) => config::execute_init(&args.path, args.force),
        Commands::Config(ConfigCommand::Show(args)) => config::execute_show(&args.config),
        Commands::Config(ConfigCommand::Validate(args)) => config::execute_validate(&args.config),
    }
}

/// Load the configuration (defaults when the file is absent) and start logging.
fn prepare(cli: &Cli, path: &Path) -> Result<Config> {
    let mut config = Config::load_or_default(path)?;
    config.logging = config
        .logging
        .with_cli_overrides(cli.verbose, cli.quiet, cli.command.json_logs());
    config.init_logging();
    debug!(path = %path.display(), exists = path.exists(), "Configuration loaded");
    Ok(config)
}

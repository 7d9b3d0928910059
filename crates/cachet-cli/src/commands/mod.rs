//! Command dispatch and handler modules.

mod apply;
mod check;
mod show;

use std::path::Path;

use miette::Result;

use cachet_core::config::StrategyConfig;
use cachet_core::CONFIG_FILE_NAME;
use cachet_resolver::ResolutionStrategy;
use cachet_util::errors::CachetError;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    let strategy = load_strategy(cli.config.as_deref())?;
    match cli.command {
        Command::Check { target } => check::exec(&strategy, target),
        Command::Apply { coordinates } => apply::exec(&strategy, &coordinates),
        Command::Show { json } => show::exec(&strategy, json),
    }
}

/// Build the strategy from `--config`, or from `cachet.toml` in the current
/// directory when present.
fn load_strategy(config: Option<&Path>) -> Result<ResolutionStrategy> {
    let config = match config {
        Some(path) => {
            tracing::debug!("Using strategy file {}", path.display());
            StrategyConfig::from_path(path)?
        }
        None => {
            let cwd = std::env::current_dir().map_err(CachetError::Io)?;
            tracing::debug!("Looking for {CONFIG_FILE_NAME} in {}", cwd.display());
            StrategyConfig::load(&cwd)?
        }
    };
    ResolutionStrategy::from_config(&config)
}

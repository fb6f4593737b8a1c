//! Maps validated CLI arguments to the action to run.

use crate::cli::actions::{server::Args, Action};
use anyhow::{Context, Result};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;

    Ok(Action::Server(Args { port, dsn }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_action_from_args() {
        temp_env::with_vars(
            [("RECIPES_PORT", None::<&str>), ("RECIPES_DSN", None::<&str>)],
            || {
                let matches = crate::cli::commands::new().get_matches_from(vec![
                    "recipes",
                    "--port",
                    "9000",
                    "--dsn",
                    "sqlite::memory:",
                ]);
                let action = handler(&matches);
                assert!(action.is_ok());
                if let Ok(Action::Server(args)) = action {
                    assert_eq!(
                        args,
                        Args {
                            port: 9000,
                            dsn: "sqlite::memory:".to_string(),
                        }
                    );
                }
            },
        );
    }

    #[test]
    fn server_action_defaults() {
        temp_env::with_vars(
            [("RECIPES_PORT", None::<&str>), ("RECIPES_DSN", None::<&str>)],
            || {
                let matches = crate::cli::commands::new().get_matches_from(vec!["recipes"]);
                let Ok(Action::Server(args)) = handler(&matches) else {
                    panic!("expected a server action");
                };
                assert_eq!(args.port, 8080);
                assert_eq!(args.dsn, crate::cli::commands::DEFAULT_DSN);
            },
        );
    }
}

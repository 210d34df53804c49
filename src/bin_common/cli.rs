//! CLI utilities for the binary
//!
//! Command line flags of `valo-track`.

use thiserror::Error;

/// Parse command line arguments for a binary
///
/// Returns a vector of arguments (excluding the program name)
pub fn parse_args() -> Vec<String> {
    std::env::args().skip(1).collect()
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CliError {
    #[error("Unknown argument: {0}")]
    UnknownArgument(String),

    #[error("--player needs a value in name#tag form")]
    MissingPlayer,

    #[error("Invalid player '{0}', expected name#tag")]
    InvalidPlayer(String),
}

/// Parsed `valo-track` flags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub update: bool,
    pub analyze: bool,
    /// `name#tag` overriding the configured main account
    pub player: Option<(String, String)>,
    pub help: bool,
}

impl CliArgs {
    pub fn parse(args: &[String]) -> Result<Self, CliError> {
        let mut parsed = CliArgs::default();
        let mut args = args.iter();

        while let Some(arg) = args.next() {
            match arg.trim_start_matches('-') {
                "update" => parsed.update = true,
                "analyze" => parsed.analyze = true,
                "help" | "h" => parsed.help = true,
                "player" => {
                    let value = args.next().ok_or(CliError::MissingPlayer)?;
                    parsed.player = Some(split_account(value)?);
                }
                other => match other.strip_prefix("player=") {
                    Some(value) => parsed.player = Some(split_account(value)?),
                    None => return Err(CliError::UnknownArgument(arg.clone())),
                },
            }
        }

        Ok(parsed)
    }

    /// Nothing to do without a command
    pub fn has_command(&self) -> bool {
        self.update || self.analyze
    }

    pub fn usage() -> &'static str {
        "Usage: valo-track [--update] [--analyze] [--player name#tag]\n\n  \
         --update    fetch recent matches and save them\n  \
         --analyze   aggregate saved matches and write the stats report\n  \
         --player    account to use instead of the configured main account"
    }
}

/// Split `name#tag` at the last `#`
fn split_account(value: &str) -> Result<(String, String), CliError> {
    match value.rsplit_once('#') {
        Some((name, tag)) if !name.is_empty() && !tag.is_empty() => {
            Ok((name.to_string(), tag.to_string()))
        }
        _ => Err(CliError::InvalidPlayer(value.to_string())),
    }
}

//! Operator command line for the token service
//!
//! Subcommands:
//! - `issue`: sign an access token for a subject
//! - `verify`: check a token's signature and expiry
//! - `subject`: print the subject of a valid token

pub mod logging;

use std::io::Write;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use ja_core::services::token::{Clock, TokenService};

/// Issue and check stateless access tokens
#[derive(Parser, Debug)]
#[command(name = "ja-token")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Issue an access token for a subject
    Issue { subject: String },

    /// Check a token's signature and expiry; exits non-zero when invalid
    Verify { token: String },

    /// Print the subject of a valid token
    Subject { token: String },
}

/// Run one command against the service, writing its result to `out`
///
/// Returns whether the command succeeded; `verify` reports an invalid token
/// as `Ok(false)` rather than an error.
pub fn execute<C: Clock>(
    command: &Command,
    service: &TokenService<C>,
    out: &mut impl Write,
) -> anyhow::Result<bool> {
    match command {
        Command::Issue { subject } => {
            let token = service.issue(subject)?;
            writeln!(out, "{}", token).context("Failed to write token")?;
            Ok(true)
        }
        Command::Verify { token } => {
            let valid = service.verify(token);
            writeln!(out, "{}", if valid { "valid" } else { "invalid" })
                .context("Failed to write result")?;
            Ok(valid)
        }
        Command::Subject { token } => {
            let subject = service.subject_of(token).map_err(|err| {
                let code = err
                    .as_token_error()
                    .map(|e| e.error_code())
                    .unwrap_or("INVALID_TOKEN");
                anyhow!("Token rejected: {}", code)
            })?;
            writeln!(out, "{}", subject).context("Failed to write subject")?;
            Ok(true)
        }
    }
}

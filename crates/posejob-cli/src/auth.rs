//! # Auth Subcommand
//!
//! Checks an `Authorization` header value against the secret in
//! `POSEJOB_AUTH_SECRET`.

use anyhow::{Context, Result};
use clap::Args;

use posejob_core::{AuthConfig, AuthorizationHeader};

/// Arguments for the `posejob auth` subcommand.
#[derive(Args, Debug)]
pub struct AuthArgs {
    /// Header value to check, e.g. "Bearer <secret>".
    #[arg(value_name = "HEADER")]
    pub header: String,
}

/// Execute the auth subcommand.
///
/// Returns exit code: 0 when the header is accepted, 1 when it is rejected.
pub fn run_auth(args: &AuthArgs) -> Result<u8> {
    let config = AuthConfig::from_env().context("cannot check authorization")?;
    Ok(check_header(&args.header, &config))
}

fn check_header(header: &str, config: &AuthConfig) -> u8 {
    match AuthorizationHeader::new(header, config) {
        Ok(_) => {
            println!("OK: authorization accepted");
            0
        }
        Err(e) => {
            println!("FAIL: {e}");
            1
        }
    }
}

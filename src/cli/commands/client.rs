use crate::config::parse_base_url;
use clap::{Arg, Command};
use std::path::PathBuf;

pub const ARG_API_URL: &str = "api-url";
pub const ARG_TOKEN_FILE: &str = "token-file";
pub const ARG_TIMEOUT: &str = "timeout";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .long(ARG_API_URL)
                .help("EMS API base URL, example: https://api.ems.dev")
                .env("EMS_API_URL")
                .global(true)
                .value_parser(parse_base_url),
        )
        .arg(
            Arg::new(ARG_TOKEN_FILE)
                .long(ARG_TOKEN_FILE)
                .help("File holding the bearer token (default: $EMS_HOME/token or ~/.config/ems/token)")
                .env("EMS_TOKEN_FILE")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long(ARG_TIMEOUT)
                .help("Request timeout in seconds")
                .env("EMS_TIMEOUT_SECONDS")
                .global(true)
                .default_value("60")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}

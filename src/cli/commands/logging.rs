use clap::{Arg, ArgAction, Command};

pub const ARG_VERBOSITY: &str = "verbosity";

/// Highest verbosity count; anything above is clamped by the level mapping anyway.
const MAX_VERBOSITY: u8 = 4;

/// Parses `EMS_LOG_LEVEL`: a count `0..=4` (same scale as repeated `-v`) or a
/// level name. `warning` is accepted for `warn`.
///
/// # Errors
/// Returns a message listing the accepted values.
pub fn parse_log_level(level: &str) -> Result<u8, String> {
    let level = level.trim();
    if let Ok(count) = level.parse::<u8>() {
        return if count <= MAX_VERBOSITY {
            Ok(count)
        } else {
            Err(format!("log level count must be 0-{MAX_VERBOSITY}, got {count}"))
        };
    }

    match level.to_ascii_lowercase().as_str() {
        "error" => Ok(0),
        "warn" | "warning" => Ok(1),
        "info" => Ok(2),
        "debug" => Ok(3),
        "trace" => Ok(4),
        _ => Err(format!(
            "invalid log level '{level}', expected 0-{MAX_VERBOSITY} or error, warn, info, debug, trace"
        )),
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Increase log verbosity on stderr (-v warn, -vv info, -vvv debug, -vvvv trace)")
            .long_help(
                "Increase log verbosity on stderr. EMS_LOG_LEVEL takes a count 0-4 or one of \
                 error, warn, info, debug, trace. RUST_LOG overrides both.",
            )
            .env("EMS_LOG_LEVEL")
            .global(true)
            .action(ArgAction::Count)
            .value_parser(parse_log_level),
    )
}

pub mod account;
pub mod client;
pub mod logging;
pub mod profile;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    ColorChoice, Command,
};

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("ems")
        .about("Event Management System client")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommands(account::subcommands())
        .subcommands(profile::subcommands());

    let command = client::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use url::Url;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "ems");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("Event Management System client".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_debug_assert() {
        new().debug_assert();
    }

    #[test]
    fn test_check_login_args() {
        temp_env::with_vars(
            [
                ("EMS_API_URL", None::<&str>),
                ("EMS_PASSWORD", None),
                ("EMS_TIMEOUT_SECONDS", None),
            ],
            || {
                let matches = new().get_matches_from(vec![
                    "ems",
                    "--api-url",
                    "https://api.ems.dev",
                    "login",
                    "--email",
                    "ada@ems.dev",
                    "--password",
                    "hunter22",
                ]);

                assert_eq!(
                    matches.get_one::<Url>(client::ARG_API_URL).map(Url::as_str),
                    Some("https://api.ems.dev/")
                );
                assert_eq!(matches.get_one::<u64>(client::ARG_TIMEOUT).copied(), Some(60));

                let (name, sub) = matches.subcommand().unwrap_or(("", &matches));
                assert_eq!(name, account::CMD_LOGIN);
                assert_eq!(
                    sub.get_one::<String>(account::ARG_EMAIL).cloned(),
                    Some("ada@ems.dev".to_string())
                );
                assert_eq!(
                    sub.get_one::<String>(account::ARG_PASSWORD).cloned(),
                    Some("hunter22".to_string())
                );
            },
        );
    }

    #[test]
    fn test_global_args_after_subcommand() {
        temp_env::with_vars([("EMS_API_URL", None::<&str>)], || {
            let matches = new().get_matches_from(vec![
                "ems",
                "status",
                "--api-url",
                "http://localhost:3000/api",
                "--token-file",
                "/tmp/ems-token",
                "--timeout",
                "5",
            ]);

            assert_eq!(
                matches.get_one::<Url>(client::ARG_API_URL).map(Url::as_str),
                Some("http://localhost:3000/api")
            );
            assert_eq!(
                matches.get_one::<PathBuf>(client::ARG_TOKEN_FILE).cloned(),
                Some(PathBuf::from("/tmp/ems-token"))
            );
            assert_eq!(matches.get_one::<u64>(client::ARG_TIMEOUT).copied(), Some(5));
        });
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("EMS_API_URL", Some("https://api.ems.dev")),
                ("EMS_TOKEN_FILE", Some("/tmp/ems-token")),
                ("EMS_TIMEOUT_SECONDS", Some("30")),
                ("EMS_EMAIL", Some("ada@ems.dev")),
                ("EMS_PASSWORD", Some("hunter22")),
                ("EMS_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["ems", "login"]);
                assert!(matches.get_one::<Url>(client::ARG_API_URL).is_some());
                assert_eq!(matches.get_one::<u64>(client::ARG_TIMEOUT).copied(), Some(30));
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );
                let sub = matches
                    .subcommand_matches(account::CMD_LOGIN)
                    .map(|sub| sub.get_one::<String>(account::ARG_PASSWORD).cloned());
                assert_eq!(sub, Some(Some("hunter22".to_string())));
            },
        );
    }

    #[test]
    fn test_rejects_invalid_values() {
        temp_env::with_vars([("EMS_API_URL", None::<&str>)], || {
            assert!(new()
                .try_get_matches_from(vec!["ems", "--api-url", "ftp://x.dev", "status"])
                .is_err());
            assert!(new()
                .try_get_matches_from(vec!["ems", "--timeout", "0", "status"])
                .is_err());
            assert!(new()
                .try_get_matches_from(vec!["ems", "callback", "not a url"])
                .is_err());
            assert!(new().try_get_matches_from(vec!["ems", "profile"]).is_err());
        });
    }

    #[test]
    fn test_check_log_level_env() {
        // loop cover all possible value_parse
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars([("EMS_LOG_LEVEL", Some(level))], || {
                let matches = new().get_matches_from(vec!["ems", "status"]);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(u8::try_from(index).unwrap_or(u8::MAX))
                );
            });
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for index in 0..5usize {
            temp_env::with_vars([("EMS_LOG_LEVEL", None::<String>)], || {
                let mut args = vec!["ems".to_string(), "status".to_string()];

                // Add the appropriate number of "-v" flags based on the index
                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }

                let matches = new().get_matches_from(args);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(u8::try_from(index).unwrap_or(u8::MAX))
                );
            });
        }
    }
}

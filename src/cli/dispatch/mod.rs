use crate::{
    cli::{
        actions::{
            account::{LoginArgs, SignupArgs, VerifyArgs},
            profile::ProfileArgs,
            Action,
        },
        commands::{account, client, profile},
        globals::GlobalArgs,
    },
    config::{default_token_file, ClientConfig},
};
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;
use std::{path::PathBuf, time::Duration};
use url::Url;

/// Resolves the settings shared by every subcommand.
///
/// # Errors
/// Returns an error if the API URL is missing or no token file location can be found.
pub fn globals(matches: &ArgMatches) -> Result<GlobalArgs> {
    let api_url = matches
        .get_one::<Url>(client::ARG_API_URL)
        .cloned()
        .context("missing required argument: --api-url")?;

    let token_file = matches
        .get_one::<PathBuf>(client::ARG_TOKEN_FILE)
        .cloned()
        .or_else(default_token_file)
        .context("cannot determine token file location, set --token-file or EMS_HOME")?;

    let timeout = matches
        .get_one::<u64>(client::ARG_TIMEOUT)
        .copied()
        .map(Duration::from_secs);

    let mut config = ClientConfig::new(api_url);
    if let Some(timeout) = timeout {
        config = config.with_timeout(timeout);
    }

    Ok(GlobalArgs::new(config, token_file))
}

/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some((account::CMD_SIGNUP, sub_m)) => Ok(Action::Signup(SignupArgs {
            name: string(sub_m, account::ARG_NAME)?,
            email: string(sub_m, account::ARG_EMAIL)?,
            password: secret(sub_m, account::ARG_PASSWORD)?,
            confirm_password: secret(sub_m, account::ARG_CONFIRM_PASSWORD)?,
            phone: sub_m.get_one::<String>(account::ARG_PHONE).cloned(),
        })),
        Some((account::CMD_VERIFY, sub_m)) => Ok(Action::Verify(VerifyArgs {
            email: string(sub_m, account::ARG_EMAIL)?,
            code: string(sub_m, account::ARG_CODE)?,
        })),
        Some((account::CMD_LOGIN, sub_m)) => Ok(Action::Login(LoginArgs {
            email: string(sub_m, account::ARG_EMAIL)?,
            password: secret(sub_m, account::ARG_PASSWORD)?,
        })),
        Some((account::CMD_LOGOUT, _)) => Ok(Action::Logout),
        Some((account::CMD_WHOAMI, _)) => Ok(Action::Whoami),
        Some((account::CMD_STATUS, _)) => Ok(Action::Status),
        Some((account::CMD_CALLBACK, sub_m)) => Ok(Action::Callback(
            sub_m
                .get_one::<Url>(account::ARG_URL)
                .cloned()
                .context("missing required argument: <url>")?,
        )),
        Some((profile::CMD_PROFILE, sub_m)) => Ok(Action::Profile(ProfileArgs {
            name: sub_m.get_one::<String>(profile::ARG_NAME).cloned(),
            phone: sub_m.get_one::<String>(profile::ARG_PHONE).cloned(),
            address: sub_m.get_one::<String>(profile::ARG_ADDRESS).cloned(),
        })),
        Some((profile::CMD_UPLOAD, sub_m)) => Ok(Action::Upload(path(sub_m)?)),
        Some((profile::CMD_AVATAR, sub_m)) => Ok(Action::Avatar(path(sub_m)?)),
        Some((name, _)) => Err(anyhow!("unknown command: {name}")),
        None => Err(anyhow!("no command given")),
    }
}

fn string(matches: &ArgMatches, arg: &str) -> Result<String> {
    matches
        .get_one::<String>(arg)
        .cloned()
        .with_context(|| format!("missing required argument: --{arg}"))
}

fn secret(matches: &ArgMatches, arg: &str) -> Result<SecretString> {
    string(matches, arg).map(SecretString::from)
}

fn path(matches: &ArgMatches) -> Result<PathBuf> {
    matches
        .get_one::<PathBuf>(profile::ARG_PATH)
        .cloned()
        .context("missing required argument: <path>")
}

use clap::{Arg, Command};
use url::Url;

pub const CMD_SIGNUP: &str = "signup";
pub const CMD_VERIFY: &str = "verify";
pub const CMD_LOGIN: &str = "login";
pub const CMD_LOGOUT: &str = "logout";
pub const CMD_WHOAMI: &str = "whoami";
pub const CMD_STATUS: &str = "status";
pub const CMD_CALLBACK: &str = "callback";

pub const ARG_NAME: &str = "name";
pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_CONFIRM_PASSWORD: &str = "confirm-password";
pub const ARG_PHONE: &str = "phone";
pub const ARG_CODE: &str = "code";
pub const ARG_URL: &str = "url";

fn email_arg() -> Arg {
    Arg::new(ARG_EMAIL)
        .short('e')
        .long(ARG_EMAIL)
        .help("Account email address")
        .env("EMS_EMAIL")
        .required(true)
}

fn password_arg() -> Arg {
    Arg::new(ARG_PASSWORD)
        .long(ARG_PASSWORD)
        .help("Account password")
        .env("EMS_PASSWORD")
        .hide_env_values(true)
        .required(true)
}

#[must_use]
pub fn subcommands() -> Vec<Command> {
    vec![
        Command::new(CMD_SIGNUP)
            .about("Register a new account; a verification code is sent by email")
            .arg(
                Arg::new(ARG_NAME)
                    .short('n')
                    .long(ARG_NAME)
                    .help("Display name")
                    .required(true),
            )
            .arg(email_arg())
            .arg(password_arg())
            .arg(
                Arg::new(ARG_CONFIRM_PASSWORD)
                    .long(ARG_CONFIRM_PASSWORD)
                    .help("Repeat the password")
                    .env("EMS_CONFIRM_PASSWORD")
                    .hide_env_values(true)
                    .required(true),
            )
            .arg(Arg::new(ARG_PHONE).long(ARG_PHONE).help("Contact phone number")),
        Command::new(CMD_VERIFY)
            .about("Activate an account with the emailed verification code")
            .arg(email_arg())
            .arg(
                Arg::new(ARG_CODE)
                    .short('c')
                    .long(ARG_CODE)
                    .help("Verification code")
                    .required(true),
            ),
        Command::new(CMD_LOGIN)
            .about("Sign in and store the bearer token")
            .arg(email_arg())
            .arg(password_arg()),
        Command::new(CMD_LOGOUT).about("Sign out and remove the stored token"),
        Command::new(CMD_WHOAMI).about("Show the signed-in user's profile"),
        Command::new(CMD_STATUS).about("Resolve and show the current session"),
        Command::new(CMD_CALLBACK)
            .about("Complete an identity-provider redirect carrying a token in its query")
            .arg(
                Arg::new(ARG_URL)
                    .help("Redirect URL, example: https://app.ems.dev/?token=<jwt>")
                    .required(true)
                    .value_parser(|value: &str| Url::parse(value.trim())),
            ),
    ]
}

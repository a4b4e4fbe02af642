use clap::{Arg, ArgGroup, Command};
use std::path::PathBuf;

pub const CMD_PROFILE: &str = "profile";
pub const CMD_UPLOAD: &str = "upload";
pub const CMD_AVATAR: &str = "avatar";

pub const ARG_NAME: &str = "name";
pub const ARG_PHONE: &str = "phone";
pub const ARG_ADDRESS: &str = "address";
pub const ARG_PATH: &str = "path";

fn path_arg() -> Arg {
    Arg::new(ARG_PATH)
        .help("Image file (png, jpg, gif, webp, svg)")
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
}

#[must_use]
pub fn subcommands() -> Vec<Command> {
    vec![
        Command::new(CMD_PROFILE)
            .about("Update the signed-in user's profile")
            .arg(Arg::new(ARG_NAME).short('n').long(ARG_NAME).help("Display name"))
            .arg(Arg::new(ARG_PHONE).long(ARG_PHONE).help("Contact phone number"))
            .arg(Arg::new(ARG_ADDRESS).long(ARG_ADDRESS).help("Postal address"))
            .group(
                ArgGroup::new("fields")
                    .args([ARG_NAME, ARG_PHONE, ARG_ADDRESS])
                    .multiple(true)
                    .required(true),
            ),
        Command::new(CMD_UPLOAD)
            .about("Upload an image and print its URL")
            .arg(path_arg()),
        Command::new(CMD_AVATAR)
            .about("Upload an image and set it as the profile avatar")
            .arg(path_arg()),
    ]
}

use crate::cli::{
    actions::{account, profile, Action},
    globals::GlobalArgs,
};
use anyhow::Result;

/// Execute the provided action.
// This is the single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action, globals: &GlobalArgs) -> Result<()> {
    match action {
        Action::Signup(args) => account::signup(args, globals).await,
        Action::Verify(args) => account::verify(args, globals).await,
        Action::Login(args) => account::login(args, globals).await,
        Action::Logout => account::logout(globals).await,
        Action::Whoami => account::whoami(globals).await,
        Action::Status => account::status(globals).await,
        Action::Callback(url) => account::callback(&url, globals).await,
        Action::Profile(args) => profile::update(args, globals).await,
        Action::Upload(path) => profile::upload(&path, globals).await,
        Action::Avatar(path) => profile::avatar(&path, globals).await,
    }
}

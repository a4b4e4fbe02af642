pub mod account;
pub mod profile;

// Internal "interpreter" for `Action`.
mod run;

use crate::cli::globals::GlobalArgs;
use std::path::PathBuf;
use url::Url;

#[derive(Debug)]
pub enum Action {
    Signup(account::SignupArgs),
    Verify(account::VerifyArgs),
    Login(account::LoginArgs),
    Logout,
    Whoami,
    Status,
    Callback(Url),
    Profile(profile::ProfileArgs),
    Upload(PathBuf),
    Avatar(PathBuf),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self, globals: &GlobalArgs) -> anyhow::Result<()> {
        run::execute(self, globals).await
    }
}

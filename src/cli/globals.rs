use crate::{
    api::ApiClient,
    config::ClientConfig,
    session::{SessionError, SessionManager},
    token::FileTokenStore,
};
use std::{path::PathBuf, sync::Arc};

/// Settings shared by every subcommand.
#[derive(Clone, Debug)]
pub struct GlobalArgs {
    pub client: ClientConfig,
    pub token_file: PathBuf,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(client: ClientConfig, token_file: PathBuf) -> Self {
        Self { client, token_file }
    }

    /// Builds a session manager backed by the token file.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn session(&self) -> Result<SessionManager, SessionError> {
        let tokens = Arc::new(FileTokenStore::new(self.token_file.clone()));
        let api = ApiClient::new(&self.client, tokens)?;
        Ok(SessionManager::new(api))
    }
}

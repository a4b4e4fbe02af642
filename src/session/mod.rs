//! Session manager: login, logout, identity fetch, registration and the
//! redirect-URL token side channel, on top of the [`ApiClient`] and the shared
//! [`TokenStore`].
//!
//! Flow overview: a stored JWT-shaped token makes the session start
//! `Authenticated` optimistically; [`SessionManager::bootstrap`] then confirms
//! it with `GET /users/me` or demotes it to `Anonymous`. Signup and verify
//! never authenticate by themselves. Logout is always honored locally, even
//! when the server call fails.
//!
//! There is no ordering between independent calls: when a profile update and
//! an identity fetch race, whichever response is applied last wins.

mod error;
pub mod types;
pub mod validate;

pub use self::error::SessionError;
pub use self::types::{
    Credentials, Identity, ProfileUpdate, Registration, Role, Session, SessionState, Verification,
};

use self::types::{
    IdentityPayload, SignIn, SignInRequest, SignInResponse, SignUpRequest, UploadResponse,
};
use crate::{
    api::ApiClient,
    token::{is_jwt_shaped, TokenStore},
};
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use std::{path::Path, sync::Arc};
use tracing::{debug, info, instrument, warn};
use url::Url;

pub const SIGNUP_PATH: &str = "/auth/signup";
pub const VERIFY_PATH: &str = "/auth/verify";
pub const SIGNIN_PATH: &str = "/auth/signin";
pub const LOGOUT_PATH: &str = "/auth/logout";
pub const ME_PATH: &str = "/users/me";
pub const UPLOAD_PATH: &str = "/images/upload";

/// Multipart field carrying the uploaded image.
const UPLOAD_FIELD: &str = "image";

/// Query parameters a redirect from an external identity provider may carry.
const SIDE_CHANNEL_PARAMS: [&str; 3] = ["token", "accessToken", "refreshToken"];

/// Outcome of startup resolution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bootstrap {
    /// The redirect URL with its query removed, when it carried side-channel parameters.
    pub location: Option<Url>,
    /// First failure met during startup; startup itself never aborts.
    pub error: Option<SessionError>,
}

/// Owns the session snapshot. Consumers receive it explicitly; there is no global instance.
pub struct SessionManager {
    api: ApiClient,
    session: Session,
}

impl SessionManager {
    /// Seeds the session from the token store: a JWT-shaped token is trusted
    /// until the identity fetch says otherwise, a malformed one is discarded.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        let session = match api.tokens().get() {
            Some(token) if is_jwt_shaped(token.expose_secret()) => Session::optimistic(),
            Some(_) => {
                warn!("Discarding malformed stored token");
                if let Err(err) = api.tokens().clear() {
                    warn!("Failed to clear malformed token: {err}");
                }
                Session::default()
            }
            None => Session::default(),
        };

        debug!(state = %session.state, "session initialized");
        Self { api, session }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    fn tokens(&self) -> &Arc<dyn TokenStore> {
        self.api.tokens()
    }

    /// Resolves the session at startup: consumes a side-channel token from
    /// `location` if present, then confirms an authenticated session with an
    /// identity fetch.
    pub async fn bootstrap(&mut self, location: Option<&Url>) -> Bootstrap {
        let mut outcome = Bootstrap::default();

        if let Some(side_channel) = location.and_then(SideChannel::from_url) {
            outcome.location = Some(side_channel.stripped.clone());
            if let Err(err) = self.accept_side_channel(side_channel) {
                outcome.error = Some(err);
            }
        }

        if self.session.is_authenticated() {
            if let Err(err) = self.fetch_identity().await {
                outcome.error.get_or_insert(err);
            }
        }

        // Keep a rejected redirect token visible after a successful fetch.
        if self.session.error.is_none() {
            self.session.error = outcome.error.as_ref().map(ToString::to_string);
        }

        outcome
    }

    fn accept_side_channel(&mut self, side_channel: SideChannel) -> Result<(), SessionError> {
        let Some(token) = side_channel.token else {
            debug!("redirect carried no access token; parameters stripped");
            return Ok(());
        };

        if !is_jwt_shaped(&token) {
            warn!("Rejected malformed token from redirect URL");
            // A previously stored token that is itself malformed goes too.
            if let Some(stored) = self.tokens().get() {
                if !is_jwt_shaped(stored.expose_secret()) {
                    self.tokens().clear()?;
                }
            }

            let err = SessionError::InvalidToken;
            self.session.error = Some(err.to_string());
            if !self.session.is_authenticated() {
                self.session.state = SessionState::AuthError;
                self.session.is_loading = false;
            }
            return Err(err);
        }

        self.tokens().set(SecretString::from(token))?;
        info!("token received from redirect URL");
        self.session = Session::optimistic();
        Ok(())
    }

    /// Submits credentials. On success the token is stored and the session is
    /// `Authenticated`; the identity is recorded if the response embeds one,
    /// otherwise it stays pending for [`Self::fetch_identity`].
    ///
    /// # Errors
    /// Validation failures leave the session untouched; server rejections move it to `AuthError`.
    #[instrument(skip_all)]
    pub async fn login(&mut self, credentials: &Credentials) -> Result<(), SessionError> {
        validate::credentials(credentials)?;

        self.session.state = SessionState::Authenticating;
        self.session.is_loading = true;
        self.session.error = None;

        let result: Result<Option<Identity>, SessionError> = async {
            let SignIn { token, identity } = self.sign_in(credentials).await?;
            self.tokens().set(token)?;
            Ok(identity)
        }
        .await;

        match result {
            Ok(identity) => {
                info!(pending_identity = identity.is_none(), "signed in");
                self.session = Session {
                    state: SessionState::Authenticated,
                    identity,
                    is_loading: false,
                    error: None,
                };
                Ok(())
            }
            Err(err) => {
                debug!("sign-in failed: {err}");
                self.session = Session {
                    state: SessionState::AuthError,
                    identity: None,
                    is_loading: false,
                    error: Some(err.to_string()),
                };
                Err(err)
            }
        }
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<SignIn, SessionError> {
        let response: SignInResponse = self
            .api
            .post_json(SIGNIN_PATH, &SignInRequest::from(credentials))
            .await?;
        let sign_in = response.into_sign_in().ok_or(SessionError::MissingToken)?;

        if is_jwt_shaped(sign_in.token.expose_secret()) {
            Ok(sign_in)
        } else {
            Err(SessionError::InvalidToken)
        }
    }

    /// Best-effort server logout, then the token is cleared and the session
    /// forced to `Anonymous` regardless of the server's answer.
    ///
    /// # Errors
    /// Returns an error only if the local token cannot be removed.
    #[instrument(skip_all)]
    pub async fn logout(&mut self) -> Result<(), SessionError> {
        if let Err(err) = self.api.post_empty(LOGOUT_PATH).await {
            warn!("Server-side logout failed, logging out locally: {err}");
        }

        let cleared = self.tokens().clear();
        self.session = Session::default();
        info!("signed out");
        cleared.map_err(SessionError::from)
    }

    /// Fetches the identity for the stored token. Success confirms the
    /// session; any failure demotes it to `Anonymous`.
    ///
    /// # Errors
    /// Returns the fetch failure, or `Unauthorized` without a request when no token is stored.
    #[instrument(skip_all)]
    pub async fn fetch_identity(&mut self) -> Result<Identity, SessionError> {
        if self.tokens().is_empty() {
            self.session = Session::default();
            return Err(SessionError::Unauthorized("Not signed in.".to_string()));
        }

        self.session.is_loading = true;
        match self.api.get_json::<IdentityPayload>(ME_PATH).await {
            Ok(payload) => {
                let identity = payload.into_identity();
                debug!(user_id = %identity.id, "identity fetched");
                self.session = Session {
                    state: SessionState::Authenticated,
                    identity: Some(identity.clone()),
                    is_loading: false,
                    error: None,
                };
                Ok(identity)
            }
            Err(err) => {
                let err = SessionError::from(err);
                debug!("identity fetch failed: {err}");
                self.session = Session {
                    state: SessionState::Anonymous,
                    identity: None,
                    is_loading: false,
                    error: Some(err.to_string()),
                };
                Err(err)
            }
        }
    }

    /// Sends a partial profile update and records the returned identity.
    ///
    /// # Errors
    /// Validation and server failures; a `401` also demotes the session.
    #[instrument(skip_all)]
    pub async fn update_profile(&mut self, update: &ProfileUpdate) -> Result<Identity, SessionError> {
        validate::profile_update(update)?;

        self.session.is_loading = true;
        let result = self.api.put_json::<_, IdentityPayload>(ME_PATH, update).await;
        self.session.is_loading = false;

        match result {
            Ok(payload) => {
                let identity = payload.into_identity();
                self.session.identity = Some(identity.clone());
                self.session.error = None;
                Ok(identity)
            }
            Err(err) => Err(self.absorb(SessionError::from(err))),
        }
    }

    /// Uploads an image file and returns the URL the backend stored it under.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, the upload fails or the response carries no URL.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub async fn upload_image(&mut self, path: &Path) -> Result<String, SessionError> {
        let bytes = tokio::fs::read(path).await.map_err(|err| SessionError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_string(), |name| name.to_string_lossy().into_owned());

        let mut part = Part::bytes(bytes).file_name(file_name);
        if let Some(mime) = image_mime(path) {
            part = part
                .mime_str(mime)
                .map_err(|err| SessionError::Config(format!("Invalid content type: {err}")))?;
        }
        let form = Form::new().part(UPLOAD_FIELD, part);

        self.session.is_loading = true;
        let result = self.api.post_multipart::<UploadResponse>(UPLOAD_PATH, form).await;
        self.session.is_loading = false;

        match result {
            Ok(response) => response.into_url().ok_or_else(|| {
                SessionError::Parse("upload response did not include a URL".to_string())
            }),
            Err(err) => Err(self.absorb(SessionError::from(err))),
        }
    }

    /// Uploads an image and makes it the profile avatar.
    ///
    /// # Errors
    /// Returns the first failing step's error.
    pub async fn upload_avatar(&mut self, path: &Path) -> Result<Identity, SessionError> {
        let url = self.upload_image(path).await?;
        let update = ProfileUpdate {
            avatar: Some(url),
            ..ProfileUpdate::default()
        };
        self.update_profile(&update).await
    }

    /// Submits a registration. A success triggers an out-of-band code and does
    /// not authenticate; session state is never changed here.
    ///
    /// # Errors
    /// Validation or server failures.
    #[instrument(skip_all)]
    pub async fn register(&self, registration: &Registration) -> Result<(), SessionError> {
        validate::registration(registration)?;
        self.api
            .post_json_empty(SIGNUP_PATH, &SignUpRequest::from(registration))
            .await?;
        info!("registration submitted");
        Ok(())
    }

    /// Completes account activation with the one-time code. Session state is never changed here.
    ///
    /// # Errors
    /// Validation or server failures.
    #[instrument(skip_all)]
    pub async fn verify(&self, verification: &Verification) -> Result<(), SessionError> {
        validate::verification(verification)?;
        self.api.post_json_empty(VERIFY_PATH, verification).await?;
        info!("account verified");
        Ok(())
    }

    /// Records an error from an authenticated call; a `401` already cleared the
    /// token, so the session is demoted on the spot.
    fn absorb(&mut self, err: SessionError) -> SessionError {
        if err.is_unauthorized() {
            self.session = Session::default();
        }
        self.session.error = Some(err.to_string());
        err
    }
}

/// Token parameters found on a redirect URL.
struct SideChannel {
    token: Option<String>,
    stripped: Url,
}

impl SideChannel {
    /// `token` wins over `accessToken`; `refreshToken` alone only triggers stripping.
    /// A blank `token` or `accessToken` is kept so it gets rejected, unless the other one carries a value.
    fn from_url(url: &Url) -> Option<Self> {
        let mut seen = false;
        let mut token = None;
        let mut access_token = None;

        for (key, value) in url.query_pairs() {
            let key: &str = &key;
            if !SIDE_CHANNEL_PARAMS.contains(&key) {
                continue;
            }
            seen = true;
            let value = value.trim().to_string();
            match key {
                "token" => token = Some(value),
                "accessToken" => access_token = Some(value),
                _ => {}
            }
        }

        if !seen {
            return None;
        }

        let candidates: Vec<String> = [token, access_token].into_iter().flatten().collect();
        let token = candidates
            .iter()
            .find(|value| !value.is_empty())
            .or_else(|| candidates.first())
            .cloned();

        let mut stripped = url.clone();
        stripped.set_query(None);
        Some(Self { token, stripped })
    }
}

fn image_mime(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

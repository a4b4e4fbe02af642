//! Session data and the request/response payloads of the auth and profile
//! endpoints. Request types holding passwords keep them in `SecretString` and
//! are serialized through borrowed wire structs so secrets are never `Debug`-printed.
//!
//! The backend is loose about response shapes (`token` or `accessToken`, bare
//! or wrapped in `data`, uploads answered with a string or an object). Each of
//! those is decoded into one tagged type with a single normalization method.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Session state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticating,
    Authenticated,
    AuthError,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Anonymous => "anonymous",
            Self::Authenticating => "authenticating",
            Self::Authenticated => "authenticated",
            Self::AuthError => "auth-error",
        };
        f.write_str(label)
    }
}

/// Derived session snapshot; nothing here is persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub state: SessionState,
    pub identity: Option<Identity>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Session {
    /// Assumed signed in because a token exists; corrected by the identity fetch.
    pub(crate) fn optimistic() -> Self {
        Self {
            state: SessionState::Authenticated,
            identity: None,
            is_loading: true,
            error: None,
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    /// Signed in, but the identity has not been fetched yet.
    #[must_use]
    pub fn identity_pending(&self) -> bool {
        self.is_authenticated() && self.identity.is_none()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "organizer")]
    Organizer,
    #[serde(rename = "superadmin")]
    SuperAdmin,
}

impl Role {
    /// Parses the role tags the backend is known to send; unknown tags yield `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "user" => Some(Self::User),
            "organizer" => Some(Self::Organizer),
            "superadmin" | "super_admin" | "super-admin" => Some(Self::SuperAdmin),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Organizer => "organizer",
            Self::SuperAdmin => "superadmin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn lenient_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref().and_then(Role::parse))
}

/// The authenticated user's profile as reported by `GET /users/me`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, alias = "username", alias = "fullName")]
    pub name: String,
    pub email: String,
    #[serde(
        default,
        deserialize_with = "lenient_role",
        skip_serializing_if = "Option::is_none"
    )]
    pub role: Option<Role>,
    #[serde(
        default,
        alias = "avatarUrl",
        alias = "profileImage",
        skip_serializing_if = "Option::is_none"
    )]
    pub avatar: Option<String>,
    #[serde(default, alias = "phoneNumber", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Identity {
    /// Name to show in the UI, falling back to the email when no name is set.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}

/// Identity responses arrive bare or wrapped in `user` / `data`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum IdentityPayload {
    User { user: Identity },
    Data { data: Identity },
    Bare(Identity),
}

impl IdentityPayload {
    pub(crate) fn into_identity(self) -> Identity {
        match self {
            Self::User { user } => user,
            Self::Data { data } => data,
            Self::Bare(identity) => identity,
        }
    }
}

/// Raw `POST /auth/signin` response.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignInResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    user: Option<Value>,
    #[serde(default)]
    data: Option<Box<SignInResponse>>,
}

/// Normalized sign-in result.
pub(crate) struct SignIn {
    pub token: SecretString,
    pub identity: Option<Identity>,
}

impl SignInResponse {
    /// Picks `token` over `accessToken`, top level over `data`. The token and
    /// the embedded `user` are resolved independently, so either may come from
    /// `data`. A `user` that does not decode as an identity is left for a later fetch.
    pub(crate) fn into_sign_in(self) -> Option<SignIn> {
        let (token, identity) = self.into_parts();
        Some(SignIn {
            token: SecretString::from(token?),
            identity,
        })
    }

    fn into_parts(self) -> (Option<String>, Option<Identity>) {
        let token = [self.token, self.access_token]
            .into_iter()
            .flatten()
            .map(|token| token.trim().to_string())
            .find(|token| !token.is_empty());
        let identity = self
            .user
            .and_then(|user| serde_json::from_value::<Identity>(user).ok());
        let (nested_token, nested_identity) = self
            .data
            .map_or((None, None), |data| (*data).into_parts());

        (token.or(nested_token), identity.or(nested_identity))
    }
}

/// Raw `POST /images/upload` response: a URL string or an object carrying one.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum UploadResponse {
    Url(String),
    Object(UploadObject),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UploadObject {
    #[serde(default, alias = "imageUrl", alias = "secureUrl")]
    url: Option<String>,
    #[serde(default)]
    data: Option<Box<UploadResponse>>,
}

impl UploadResponse {
    pub(crate) fn into_url(self) -> Option<String> {
        let url = match self {
            Self::Url(url) => Some(url),
            Self::Object(object) => object
                .url
                .or_else(|| object.data.and_then(|data| data.into_url())),
        };
        url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
    }
}

/// Email and password submitted to `POST /auth/signin`.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: SecretString) -> Self {
        Self {
            email: email.into(),
            password,
        }
    }
}

#[derive(Serialize)]
pub(crate) struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
}

impl<'a> From<&'a Credentials> for SignInRequest<'a> {
    fn from(credentials: &'a Credentials) -> Self {
        Self {
            email: credentials.email.trim(),
            password: credentials.password.expose_secret(),
        }
    }
}

/// Fields submitted to `POST /auth/signup`.
#[derive(Clone, Debug)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    pub phone: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignUpRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<&'a str>,
}

impl<'a> From<&'a Registration> for SignUpRequest<'a> {
    fn from(registration: &'a Registration) -> Self {
        Self {
            name: registration.name.trim(),
            email: registration.email.trim(),
            password: registration.password.expose_secret(),
            phone: registration
                .phone
                .as_deref()
                .map(str::trim)
                .filter(|phone| !phone.is_empty()),
        }
    }
}

/// One-time code delivered out of band after signup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    pub email: String,
    pub verification_code: String,
}

/// Partial identity update for `PUT /users/me`; `None` fields are omitted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.address.is_none() && self.avatar.is_none()
    }
}

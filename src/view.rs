//! Text rendering of session state for the terminal front end.

use crate::session::{Identity, Session, SessionState};
use std::fmt;

/// Transient feedback for a finished action, the terminal's equivalent of a toast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(message) => write!(f, "✔ {message}"),
            Self::Error(message) => write!(f, "✖ {message}"),
        }
    }
}

/// One-line banner describing who is signed in.
#[must_use]
pub fn render_session(session: &Session) -> String {
    match session.state {
        SessionState::Authenticated => match &session.identity {
            Some(identity) => format!("Signed in as {}", identity_line(identity)),
            None if session.is_loading => "Restoring session...".to_string(),
            None => "Signed in".to_string(),
        },
        SessionState::Authenticating => "Signing in...".to_string(),
        SessionState::AuthError => format!(
            "Sign-in failed: {}",
            session.error.as_deref().unwrap_or("unknown error")
        ),
        SessionState::Anonymous => "Not signed in".to_string(),
    }
}

fn identity_line(identity: &Identity) -> String {
    let mut line = format!("{} <{}>", identity.display_name(), identity.email);
    if let Some(role) = identity.role {
        line.push_str(&format!(" [{role}]"));
    }
    line
}

/// Multi-line profile listing.
#[must_use]
pub fn render_identity(identity: &Identity) -> String {
    let optional = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
    let rows = [
        ("id", identity.id.clone()),
        ("name", identity.display_name().to_string()),
        ("email", identity.email.clone()),
        (
            "role",
            identity
                .role
                .map_or_else(|| "-".to_string(), |role| role.to_string()),
        ),
        ("avatar", optional(&identity.avatar)),
        ("phone", optional(&identity.phone)),
        ("address", optional(&identity.address)),
    ];

    let width = rows.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    rows.iter()
        .map(|(key, value)| {
            let padding = " ".repeat(width.saturating_sub(key.len()));
            format!("{key}:{padding} {value}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

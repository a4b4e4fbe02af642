//! # EMS (Event Management System client)
//!
//! `ems` is the client side of the Event Management System: it keeps the bearer
//! credential, talks to the remote REST API and derives the signed-in state the
//! rest of the application renders from.
//!
//! ## Session lifecycle
//!
//! The [`session::SessionManager`] owns a small state machine
//! (`Anonymous`, `Authenticating`, `Authenticated`, `AuthError`). At startup the
//! state is seeded optimistically from the [`token::TokenStore`]: a JWT-shaped
//! stored token means `Authenticated` until the identity fetch (`GET /users/me`)
//! confirms or demotes it. A stored token that is not JWT-shaped is discarded
//! before any request is made.
//!
//! ## Token handling
//!
//! Exactly one bearer token is persisted. It is written on sign-in (or when a
//! redirect URL carries one), cleared on logout, and cleared by the
//! [`api::ApiClient`] whenever the backend answers `401`. Token material is kept
//! in `secrecy::SecretString` and never logged.
//!
//! ## Registration
//!
//! Signup and email verification (`/auth/signup`, `/auth/verify`) never
//! authenticate the session by themselves; they only unlock a later sign-in.

pub mod api;
pub mod cli;
pub mod config;
pub mod session;
pub mod token;
pub mod view;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_user_agent() {
        assert!(APP_USER_AGENT.starts_with("ems/"));
        assert!(APP_USER_AGENT.ends_with(env!("CARGO_PKG_VERSION")));
    }
}

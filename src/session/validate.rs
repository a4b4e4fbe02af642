//! Client-side form checks run before any network call. A failure here never
//! mutates session state.

use super::{
    error::SessionError,
    types::{Credentials, ProfileUpdate, Registration, Verification},
};
use regex::Regex;
use secrecy::ExposeSecret;

pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").map_or(false, |re| re.is_match(email.trim()))
}

fn require(field: &str, value: &str) -> Result<(), SessionError> {
    if value.trim().is_empty() {
        Err(SessionError::validation(format!("{field} is required.")))
    } else {
        Ok(())
    }
}

fn email(value: &str) -> Result<(), SessionError> {
    require("Email", value)?;
    if valid_email(value) {
        Ok(())
    } else {
        Err(SessionError::validation("Please enter a valid email address."))
    }
}

pub fn credentials(credentials: &Credentials) -> Result<(), SessionError> {
    email(&credentials.email)?;
    require("Password", credentials.password.expose_secret())
}

pub fn registration(registration: &Registration) -> Result<(), SessionError> {
    require("Name", &registration.name)?;
    email(&registration.email)?;
    require("Password", registration.password.expose_secret())?;
    if registration.password.expose_secret() != registration.confirm_password.expose_secret() {
        return Err(SessionError::validation("Passwords do not match."));
    }
    Ok(())
}

pub fn verification(verification: &Verification) -> Result<(), SessionError> {
    email(&verification.email)?;
    require("Verification code", &verification.verification_code)
}

pub fn profile_update(update: &ProfileUpdate) -> Result<(), SessionError> {
    if update.is_empty() {
        return Err(SessionError::validation("Nothing to update."));
    }
    if let Some(name) = &update.name {
        require("Name", name)?;
    }
    Ok(())
}

use crate::{
    cli::globals::GlobalArgs,
    session::{Credentials, Registration, Verification},
    view::{render_identity, render_session, Notice},
};
use anyhow::{bail, Context, Result};
use secrecy::SecretString;
use tracing::debug;
use url::Url;

#[derive(Debug)]
pub struct SignupArgs {
    pub name: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    pub phone: Option<String>,
}

#[derive(Debug)]
pub struct VerifyArgs {
    pub email: String,
    pub code: String,
}

#[derive(Debug)]
pub struct LoginArgs {
    pub email: String,
    pub password: SecretString,
}

/// # Errors
/// Returns an error if the registration is invalid or rejected.
pub async fn signup(args: SignupArgs, globals: &GlobalArgs) -> Result<()> {
    let manager = globals.session()?;
    let registration = Registration {
        name: args.name,
        email: args.email,
        password: args.password,
        confirm_password: args.confirm_password,
        phone: args.phone,
    };

    manager
        .register(&registration)
        .await
        .context("Registration failed")?;

    println!(
        "{}",
        Notice::Success(format!(
            "Registration submitted. Check {} for your verification code.",
            registration.email.trim()
        ))
    );
    Ok(())
}

/// # Errors
/// Returns an error if the code is missing or rejected.
pub async fn verify(args: VerifyArgs, globals: &GlobalArgs) -> Result<()> {
    let manager = globals.session()?;
    let verification = Verification {
        email: args.email.trim().to_string(),
        verification_code: args.code.trim().to_string(),
    };

    manager
        .verify(&verification)
        .await
        .context("Verification failed")?;

    println!(
        "{}",
        Notice::Success("Account verified. You can now sign in.".to_string())
    );
    Ok(())
}

/// # Errors
/// Returns an error if sign-in fails.
pub async fn login(args: LoginArgs, globals: &GlobalArgs) -> Result<()> {
    let mut manager = globals.session()?;
    let credentials = Credentials::new(args.email, args.password);

    manager.login(&credentials).await?;

    if manager.session().identity_pending() {
        debug!("sign-in response carried no identity, fetching it");
        manager
            .fetch_identity()
            .await
            .context("Signed in, but the profile could not be loaded")?;
    }

    println!("{}", Notice::Success(render_session(manager.session())));
    Ok(())
}

/// # Errors
/// Returns an error only if the local token cannot be removed.
pub async fn logout(globals: &GlobalArgs) -> Result<()> {
    let mut manager = globals.session()?;
    manager
        .logout()
        .await
        .with_context(|| format!("Failed to remove {}", globals.token_file.display()))?;

    println!("{}", Notice::Success("Signed out.".to_string()));
    Ok(())
}

/// # Errors
/// Returns an error if no session exists or the identity cannot be fetched.
pub async fn whoami(globals: &GlobalArgs) -> Result<()> {
    let mut manager = globals.session()?;
    if !manager.session().is_authenticated() {
        bail!("Not signed in. Run `ems login` first.");
    }

    let identity = manager.fetch_identity().await?;
    println!("{}", render_identity(&identity));
    Ok(())
}

/// Resolves the stored session and prints its banner. Startup failures are
/// reported but never fatal.
///
/// # Errors
/// Returns an error if the session manager cannot be built.
pub async fn status(globals: &GlobalArgs) -> Result<()> {
    let mut manager = globals.session()?;
    let outcome = manager.bootstrap(None).await;

    println!("{}", render_session(manager.session()));
    if let Some(err) = outcome.error {
        eprintln!("{}", Notice::Error(err.to_string()));
    }
    Ok(())
}

/// # Errors
/// Returns an error if the redirect carried an invalid token or the session cannot be confirmed.
pub async fn callback(url: &Url, globals: &GlobalArgs) -> Result<()> {
    let mut manager = globals.session()?;
    let outcome = manager.bootstrap(Some(url)).await;

    if let Some(location) = &outcome.location {
        println!("{location}");
    }
    if let Some(err) = outcome.error {
        return Err(err).context("Redirect sign-in failed");
    }

    println!("{}", Notice::Success(render_session(manager.session())));
    Ok(())
}

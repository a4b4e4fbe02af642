use crate::{
    cli::globals::GlobalArgs,
    session::{ProfileUpdate, SessionManager},
    view::{render_identity, Notice},
};
use anyhow::{bail, Context, Result};
use std::path::Path;

#[derive(Debug)]
pub struct ProfileArgs {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl From<ProfileArgs> for ProfileUpdate {
    fn from(args: ProfileArgs) -> Self {
        Self {
            name: args.name,
            phone: args.phone,
            address: args.address,
            avatar: None,
        }
    }
}

fn signed_in(globals: &GlobalArgs) -> Result<SessionManager> {
    let manager = globals.session()?;
    if !manager.session().is_authenticated() {
        bail!("Not signed in. Run `ems login` first.");
    }
    Ok(manager)
}

/// # Errors
/// Returns an error if no session exists or the update is rejected.
pub async fn update(args: ProfileArgs, globals: &GlobalArgs) -> Result<()> {
    let mut manager = signed_in(globals)?;
    let identity = manager
        .update_profile(&ProfileUpdate::from(args))
        .await
        .context("Profile update failed")?;

    println!("{}", Notice::Success("Profile updated.".to_string()));
    println!("{}", render_identity(&identity));
    Ok(())
}

/// # Errors
/// Returns an error if no session exists or the upload fails.
pub async fn upload(path: &Path, globals: &GlobalArgs) -> Result<()> {
    let mut manager = signed_in(globals)?;
    let url = manager
        .upload_image(path)
        .await
        .context("Image upload failed")?;

    println!("{url}");
    Ok(())
}

/// # Errors
/// Returns an error if no session exists, the upload fails or the profile cannot be updated.
pub async fn avatar(path: &Path, globals: &GlobalArgs) -> Result<()> {
    let mut manager = signed_in(globals)?;
    let identity = manager
        .upload_avatar(path)
        .await
        .context("Avatar update failed")?;

    println!("{}", Notice::Success("Avatar updated.".to_string()));
    println!("{}", render_identity(&identity));
    Ok(())
}

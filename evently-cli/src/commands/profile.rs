use std::path::PathBuf;

use anyhow::{Context, Result};
use evently_core::profile::ProfileUpdate;
use evently_core::validation::{validate_password, validate_username};
use owo_colors::OwoColorize;

use crate::context::App;
use crate::render::Render;
use crate::utils::tui::prompt_password;

pub async fn run(
    app: &App,
    username: Option<String>,
    change_password: bool,
    picture: Option<PathBuf>,
) -> Result<()> {
    let (session, _) = app.require_session().await?;
    let profile = app.api.profile_me(&session).await.context("Failed to fetch profile")?;

    if username.is_some() || change_password {
        let username = username.unwrap_or_else(|| profile.username.clone());
        if !validate_username(&username) {
            anyhow::bail!("Username must be alphabetic and cannot be empty");
        }

        let password = if change_password {
            let password = prompt_password("New password")?;
            let confirm = prompt_password("Confirm password")?;
            if password != confirm {
                anyhow::bail!("Passwords do not match");
            }
            if !validate_password(&password) {
                anyhow::bail!("Password must be at least 4 characters");
            }
            Some(password)
        } else {
            None
        };

        app.api
            .update_profile(&session, &ProfileUpdate { username, password })
            .await
            .context("Failed to update profile")?;
        println!("{}", "  Profile updated successfully!".green());
    }

    if let Some(path) = picture {
        app.api
            .upload_picture(&session, &path)
            .await
            .context("Failed to upload profile picture")?;
        println!("{}", "  Profile picture updated successfully!".green());
    }

    // Refetch so the printed profile reflects any update.
    let profile = app.api.profile_me(&session).await.context("Failed to fetch profile")?;
    println!("{}", profile.render());
    if let Some(url) = app.api.picture_url(&profile) {
        println!("  {}", url.dimmed());
    }
    Ok(())
}

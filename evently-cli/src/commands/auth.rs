use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use evently_core::profile::{Credentials, Registration};
use evently_core::session::{Bootstrap, Session, bootstrap};
use evently_core::validation::{validate_login, validate_signup};
use owo_colors::OwoColorize;

use crate::context::App;
use crate::render::Render;
use crate::utils::tui::{create_spinner, prompt, prompt_password};

pub async fn signup(
    app: &App,
    username: Option<String>,
    email: Option<String>,
    picture: Option<PathBuf>,
) -> Result<()> {
    let username = match username {
        Some(u) => u,
        None => prompt("Username")?,
    };
    let email = match email {
        Some(e) => e,
        None => prompt("Email")?,
    };
    let password = prompt_password("Password")?;
    let confirm = prompt_password("Confirm password")?;

    if let Err(errors) = validate_signup(&username, &email, &password, &confirm) {
        eprintln!("{}", errors.render());
        anyhow::bail!("Account not created");
    }

    let registration = Registration {
        username,
        email,
        password,
        picture,
    };
    let spinner = create_spinner("Creating account");
    let result = app.api.register(&registration).await;
    spinner.finish_and_clear();
    result.context("Sign-up failed")?;

    println!("{}", format!("  Account created for {}", registration.email).green());
    println!("  Sign in with: evently login --email {}", registration.email);
    Ok(())
}

pub async fn login(app: &App, email: Option<String>) -> Result<()> {
    let email = match email {
        Some(e) => e,
        None => prompt("Email")?,
    };
    let password = prompt_password("Password")?;

    if let Err(errors) = validate_login(&email, &password) {
        eprintln!("{}", errors.render());
        anyhow::bail!("Not signed in");
    }

    let spinner = create_spinner("Signing in");
    let result = app.api.login(&Credentials { email, password }).await;
    spinner.finish_and_clear();
    let token = result.context("Sign-in failed")?;

    let session = Session::from_token(token).context("The server returned an unusable token")?;
    app.store.save(session.token())?;

    println!("{}", format!("  Signed in as {}", session.email()).green());
    Ok(())
}

pub async fn logout(app: &App) -> Result<()> {
    let Some(token) = app.store.load()? else {
        println!("{}", "  Not signed in".dimmed());
        return Ok(());
    };

    if let Ok(session) = Session::from_token(token) {
        if let Err(e) = app.api.logout(&session).await {
            tracing::warn!("server logout failed: {e}");
        }
    }
    app.store.clear()?;

    println!("{}", "  Signed out".green());
    Ok(())
}

pub async fn whoami(app: &App) -> Result<()> {
    match bootstrap(&app.store, &app.api, Utc::now()).await? {
        Bootstrap::Authenticated { profile, .. } => {
            println!("{}", profile.render());
            if let Some(url) = app.api.picture_url(&profile) {
                println!("  {}", url.dimmed());
            }
        }
        Bootstrap::Unauthenticated => println!("{}", "Not signed in".dimmed()),
    }
    Ok(())
}

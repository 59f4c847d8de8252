use anyhow::Result;
use colored::Colorize;
use docqa_core::route::Route;
use rustyline::DefaultEditor;

use crate::app::App;

const ENV_PASSWORD: &str = "DOCQA_PASSWORD";

/// Flag, then environment, then an interactive prompt.
fn resolve_password(password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    if let Ok(password) = std::env::var(ENV_PASSWORD) {
        return Ok(password);
    }
    let mut rl = DefaultEditor::new()?;
    Ok(rl.readline("Password: ")?)
}

pub async fn login(app: &App, email: &str, password: Option<String>) -> Result<()> {
    app.enter(Route::Login)?;
    let password = resolve_password(password)?;
    let landing = app.auth.login(email, &password).await?;
    app.enter(landing.clone())?;
    println!("{}", format!("Logged in as {}", email.trim()).bright_green());
    println!("{}", format!("Landing page: {}", landing).bright_black());
    Ok(())
}

pub async fn signup(app: &App, email: &str, password: Option<String>) -> Result<()> {
    app.enter(Route::Signup)?;
    let password = resolve_password(password)?;
    let next = app.auth.register(email, &password).await?;
    println!("{}", "Account created.".bright_green());
    println!(
        "{}",
        format!("Continue at {}: docqa login --email {}", next, email.trim()).bright_black()
    );
    Ok(())
}

pub fn logout(app: &App) {
    app.auth.logout();
    println!("{}", "Logged out.".bright_green());
}

pub fn whoami(app: &App) {
    match app.session.identity() {
        Some(identity) => println!("{} ({})", identity.email, identity.role),
        None => println!("{}", "Not logged in.".bright_black()),
    }
}

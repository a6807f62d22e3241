//! Account commands: signup, login, logout, whoami

use anyhow::{Context, Result};
use colored::*;
use roomwatch_core::ports::IdentityProvider;
use std::io::{self, BufRead, Write};

/// Environment variable read instead of prompting for a password
pub const PASSWORD_ENV: &str = "ROOMWATCH_PASSWORD";

pub fn run_signup<I: IdentityProvider + ?Sized>(identity: &I, email: Option<String>) -> Result<()> {
    let email = email_or_prompt(email)?;
    let password = password_or_prompt("Password (min 6 characters): ")?;

    identity.create_account(&email, &password)?;
    println!("{}", "User created. Login now.".green().bold());
    println!("  {} {}", "Next:".dimmed(), "roomwatch login".yellow());
    Ok(())
}

pub fn run_login<I: IdentityProvider + ?Sized>(identity: &I, email: Option<String>) -> Result<()> {
    let email = email_or_prompt(email)?;
    let password = password_or_prompt("Password: ")?;

    let session = identity.sign_in(&email, &password)?;
    println!("{} Signed in as {}", "✓".green(), session.email.yellow());
    println!("  {} {}", "Next:".dimmed(), "roomwatch dashboard".yellow());
    Ok(())
}

pub fn run_logout<I: IdentityProvider + ?Sized>(identity: &I) -> Result<()> {
    match identity.current_session() {
        Some(session) => {
            identity.sign_out()?;
            println!("{} Signed out {}", "✓".green(), session.email);
        }
        None => println!("Not signed in"),
    }
    Ok(())
}

pub fn run_whoami<I: IdentityProvider + ?Sized>(identity: &I) -> Result<()> {
    match identity.current_session() {
        Some(session) => {
            println!("{}", session.email.yellow().bold());
            println!("  {} {}", "uid:".dimmed(), session.user_id);
            println!(
                "  {} {}",
                "since:".dimmed(),
                session.signed_in_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
        }
        None => println!("Not signed in. Run {}", "roomwatch login".yellow()),
    }
    Ok(())
}

fn email_or_prompt(email: Option<String>) -> Result<String> {
    if let Some(email) = email {
        return Ok(email);
    }
    print!("Email: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read email")?;
    Ok(line.trim().to_string())
}

fn password_or_prompt(prompt: &str) -> Result<String> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(password);
    }
    rpassword::prompt_password(prompt).context("Failed to read password")
}

//! User command handlers

use crate::services::AccountError;
use crate::state::SharedState;

pub async fn cmd_user_create(state: &SharedState, name: &str, email: &str) -> anyhow::Result<()> {
    println!("Password for {email}:");
    let mut password = String::new();
    std::io::stdin().read_line(&mut password)?;
    let password = password.trim_end_matches(['\r', '\n']);

    if password.is_empty() {
        println!("Password cannot be empty.");
        return Ok(());
    }

    match state.accounts.register(name, email, password).await {
        Ok(user) => {
            println!("✓ Created user {user}");
            println!("  Scan quota: {}", user.scan_quota);
        }
        Err(AccountError::EmailTaken(email)) => {
            println!("A user with email {email} already exists.");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

pub async fn cmd_user_show(state: &SharedState, email: &str) -> anyhow::Result<()> {
    let Some(user) = state.accounts.fetch(Some(email), None).await? else {
        println!("No user with email {email}.");
        return Ok(());
    };

    let reports = state.reports.list_for_user(user.id).await?;

    println!("User {user}");
    println!("{:-<60}", "");
    println!("Email:      {}", user.email);
    println!("Admin:      {}", if user.is_admin { "yes" } else { "no" });
    println!("Scan quota: {}", user.scan_quota);
    println!("Reports:    {}", reports.len());
    println!(
        "Session:    {}",
        if user.token.is_some() { "token issued" } else { "none" }
    );

    Ok(())
}

pub async fn cmd_user_delete(state: &SharedState, email: &str, yes: bool) -> anyhow::Result<()> {
    let Some(user) = state.accounts.fetch(Some(email), None).await? else {
        println!("No user with email {email}.");
        return Ok(());
    };

    if !yes {
        println!("Delete '{user}' and all of its reports?");
        println!("Enter 'y' to confirm, anything else to cancel:");

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    state.accounts.delete_user(&user).await?;
    println!("✓ Deleted: {user}");

    Ok(())
}

pub async fn cmd_user_token(
    state: &SharedState,
    email: &str,
    expires_in: Option<i64>,
) -> anyhow::Result<()> {
    let Some(user) = state.accounts.fetch(Some(email), None).await? else {
        println!("No user with email {email}.");
        return Ok(());
    };

    let token = state.accounts.issue_token(&user, expires_in).await?;
    println!("{token}");

    Ok(())
}

pub async fn cmd_user_logout(state: &SharedState, email: &str) -> anyhow::Result<()> {
    let Some(user) = state.accounts.fetch(Some(email), None).await? else {
        println!("No user with email {email}.");
        return Ok(());
    };

    state.accounts.logout(&user).await?;
    println!("✓ Cleared session token for {user}");

    Ok(())
}

pub async fn cmd_user_admin(state: &SharedState, email: &str, revoke: bool) -> anyhow::Result<()> {
    let Some(user) = state.accounts.fetch(Some(email), None).await? else {
        println!("No user with email {email}.");
        return Ok(());
    };

    state.accounts.set_admin(&user, !revoke).await?;
    if revoke {
        println!("✓ Revoked admin rights from {user}");
    } else {
        println!("✓ Granted admin rights to {user}");
    }

    Ok(())
}

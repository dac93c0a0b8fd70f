use anyhow::{Context, Result};

use trip_spotlight::api::types::LoginRequest;
use trip_spotlight::session;
use trip_spotlight::ui;

use crate::cli::Ctx;

pub fn login(ctx: &Ctx, email: &str, password: &str) -> Result<()> {
    let con = ctx.open_store()?;
    let client = ctx.api(&con)?;

    let resp = client
        .login(&LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        })
        .context("Sign-in failed")?;

    session::save_auth(&con, &resp.token, &resp.user)?;
    let who = resp.user.name.as_deref().unwrap_or(&resp.user.email);
    ui::success(format!("Signed in as {who}"));
    Ok(())
}

pub fn logout(ctx: &Ctx) -> Result<()> {
    let con = ctx.open_store()?;
    if session::clear_auth(&con)? {
        ui::success("Signed out");
    } else {
        ui::info("You were not signed in");
    }
    Ok(())
}

pub fn share(ctx: &Ctx, route_id: &str) -> Result<()> {
    let con = ctx.open_store()?;
    let client = ctx.authed_api(&con)?;

    let resp = client
        .share_route(route_id)
        .with_context(|| format!("Unable to share route {route_id}"))?;
    ui::success("Share link created");
    println!("{}", resp.share_url);
    Ok(())
}

pub fn unshare(ctx: &Ctx, route_id: &str, yes: bool) -> Result<()> {
    let con = ctx.open_store()?;
    let client = ctx.authed_api(&con)?;

    if !yes
        && !ui::confirm(&format!(
            "Revoke the share link of {route_id}? Anyone holding it loses access"
        ))?
    {
        ui::info("Nothing changed");
        return Ok(());
    }

    client
        .unshare_route(route_id)
        .with_context(|| format!("Unable to revoke the share link of {route_id}"))?;
    ui::success("Share link revoked");
    Ok(())
}

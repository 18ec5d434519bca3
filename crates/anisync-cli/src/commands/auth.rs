use super::prompts;
use super::sync_ui::is_interactive;
use super::Context;
use crate::output::Output;
use crate::AuthSite;
use anisync_config::CredentialStore;
use anisync_sources::{create_http_client, OAuthSite};
use color_eyre::Result;
use owo_colors::OwoColorize;
use tracing::info;

pub async fn run_auth(ctx: &Context, site: AuthSite, output: &Output) -> Result<()> {
    if !is_interactive() {
        return Err(color_eyre::eyre::eyre!(
            "Authorization needs an interactive terminal to paste the code into"
        ));
    }

    let config = ctx.load_config()?;
    let mut store = ctx.credential_store()?;

    let sites = match site {
        AuthSite::Anilist => vec![OAuthSite::anilist(&config)],
        AuthSite::Myanimelist => vec![OAuthSite::myanimelist(&config)],
        AuthSite::All => vec![OAuthSite::anilist(&config), OAuthSite::myanimelist(&config)],
    };

    for oauth in &sites {
        authorize(oauth, &mut store, output).await?;
    }

    Ok(())
}

async fn authorize(site: &OAuthSite, store: &mut CredentialStore, output: &Output) -> Result<()> {
    if site.client_id.is_empty() {
        return Err(color_eyre::eyre::eyre!(
            "{} client_id is not configured",
            site.name
        ));
    }

    let request = site.authorization_request();

    println!();
    println!("{}", format!("Authorize {}", site.name).bright_cyan().bold());
    println!("Open this URL in your browser and approve access:");
    println!();
    println!("  {}", request.url.bright_white());
    println!();
    println!("You will be redirected to {}.", site.redirect_uri);
    println!("Copy the value of the `code` parameter from that URL.");
    println!();

    let code = prompts::prompt_string("Authorization code", None)?;
    let token = site
        .exchange_code(&create_http_client(), &code, request.code_verifier.as_deref())
        .await
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    site.store_token(store, &token);
    store
        .save()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save credentials: {}", e))?;

    info!(site = site.name, operation = "auth", "Stored access token");
    match token.expires_at {
        Some(expires_at) => output.success(format!(
            "Authorized {} (token expires {})",
            site.name,
            expires_at.format("%Y-%m-%d %H:%M UTC")
        )),
        None => output.success(format!("Authorized {}", site.name)),
    }
    Ok(())
}

use super::Context;
use crate::output::Output;
use crate::ConfigCommands;
use anisync_config::{
    SiteConfig, ANILIST_AUTH_URL, ANILIST_TOKEN_URL, MYANIMELIST_AUTH_URL, MYANIMELIST_TOKEN_URL,
};
use anisync_sources::{ANILIST, MYANIMELIST};
use color_eyre::Result;
use comfy_table::{Cell, Table};
use owo_colors::OwoColorize;
use serde_json::json;

pub fn run_config(ctx: &Context, cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(ctx, full, output),
        ConfigCommands::Path => show_paths(ctx, output),
    }
}

fn show_config(ctx: &Context, full: bool, output: &Output) -> Result<()> {
    if !ctx.config_file.exists() {
        output.warn(format!("Configuration file not found at: {}", ctx.config_file.display()));
        output.info("Create it from config.example.toml, then run 'anisync auth all'.");
        return Ok(());
    }

    let config = ctx.load_config()?;
    let store = ctx.credential_store()?;
    let secret = |s: &str| if full { s.to_string() } else { mask_string(s) };

    if !output.is_human() {
        output.json(&json!({
            "config_file": ctx.config_file.display().to_string(),
            "oauth": { "redirect_uri": config.oauth.redirect_uri },
            "anilist": site_json(&config.anilist, ANILIST_AUTH_URL, ANILIST_TOKEN_URL, &secret, store.get_access_token(ANILIST).is_some()),
            "myanimelist": site_json(&config.myanimelist, MYANIMELIST_AUTH_URL, MYANIMELIST_TOKEN_URL, &secret, store.get_access_token(MYANIMELIST).is_some()),
            "sync": {
                "ignore_titles": config.sync.ignore_titles,
                "search_limit": config.sync.search_limit,
            },
            "valid": config.validate().is_ok(),
        }));
        return Ok(());
    }

    print_section_header("Configuration");

    let mut info_table = Table::new();
    info_table.set_header(vec![
        Cell::new("Config File").add_attribute(comfy_table::Attribute::Bold),
        Cell::new(ctx.config_file.display().to_string()),
    ]);
    info_table.add_row(vec![Cell::new("Redirect URI"), Cell::new(&config.oauth.redirect_uri)]);
    style(&mut info_table);
    println!("{}", info_table);
    println!();

    for (name, key, site, auth, token) in [
        ("AniList", ANILIST, &config.anilist, ANILIST_AUTH_URL, ANILIST_TOKEN_URL),
        ("MyAnimeList", MYANIMELIST, &config.myanimelist, MYANIMELIST_AUTH_URL, MYANIMELIST_TOKEN_URL),
    ] {
        let mut table = Table::new();
        table.set_header(vec![Cell::new(format!("{} Configuration", name))
            .fg(comfy_table::Color::Cyan)
            .add_attribute(comfy_table::Attribute::Bold)]);
        table.add_row(vec![Cell::new("Username"), Cell::new(&site.username)]);
        table.add_row(vec![Cell::new("Client ID"), Cell::new(secret(&site.client_id))]);
        table.add_row(vec![Cell::new("Client Secret"), Cell::new(secret(&site.client_secret))]);
        table.add_row(vec![Cell::new("Auth URL"), Cell::new(site.auth_url_or(auth))]);
        table.add_row(vec![Cell::new("Token URL"), Cell::new(site.token_url_or(token))]);
        table.add_row(vec![Cell::new("Authorized"), Cell::new(check_mark(store.get_access_token(key).is_some()))]);
        style(&mut table);
        println!("{}", table);
        println!();
    }

    let mut sync_table = Table::new();
    sync_table.set_header(vec![Cell::new("Sync Options")
        .fg(comfy_table::Color::Cyan)
        .add_attribute(comfy_table::Attribute::Bold)]);
    sync_table.add_row(vec![Cell::new("Search Limit"), Cell::new(config.sync.search_limit)]);
    sync_table.add_row(vec![
        Cell::new("Ignored Titles"),
        Cell::new(if config.sync.ignore_titles.is_empty() {
            "<none>".to_string()
        } else {
            config.sync.ignore_titles.join("\n")
        }),
    ]);
    style(&mut sync_table);
    println!("{}", sync_table);
    println!();

    if let Err(e) = config.validate() {
        output.warn(format!("Configuration is incomplete: {}", e));
    }

    Ok(())
}

fn site_json(
    site: &SiteConfig,
    auth: &str,
    token: &str,
    secret: &dyn Fn(&str) -> String,
    authorized: bool,
) -> serde_json::Value {
    json!({
        "username": site.username,
        "client_id": secret(&site.client_id),
        "client_secret": secret(&site.client_secret),
        "auth_url": site.auth_url_or(auth),
        "token_url": site.token_url_or(token),
        "authorized": authorized,
    })
}

fn show_paths(ctx: &Context, output: &Output) -> Result<()> {
    let config_dir = ctx.paths.config_dir().display().to_string();
    let config_file = ctx.config_file.display().to_string();
    let credentials_file = ctx.paths.credentials_file().display().to_string();
    let log_dir = ctx.paths.log_dir().display().to_string();

    if !output.is_human() {
        output.json(&json!({
            "config_dir": config_dir,
            "config_file": config_file,
            "credentials_file": credentials_file,
            "log_dir": log_dir,
        }));
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Path").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Location").add_attribute(comfy_table::Attribute::Bold),
    ]);
    table.add_row(vec![Cell::new("Config Directory"), Cell::new(config_dir)]);
    table.add_row(vec![Cell::new("Config File"), Cell::new(config_file)]);
    table.add_row(vec![Cell::new("Credentials File"), Cell::new(credentials_file)]);
    table.add_row(vec![Cell::new("Log Directory"), Cell::new(log_dir)]);
    style(&mut table);
    println!("{}", table);

    Ok(())
}

fn print_section_header(title: &str) {
    println!("\n{}", "╔════════════════════════════════════════════════════════════╗".bright_white());
    println!("{} {}", "║".bright_white(), title.bright_cyan().bold());
    println!("{}", "╚════════════════════════════════════════════════════════════╝".bright_white());
    println!();
}

fn style(table: &mut Table) {
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
}

fn check_mark(value: bool) -> String {
    if value {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}

fn mask_string(s: &str) -> String {
    if s.is_empty() || s == "YOUR_CLIENT_ID" || s == "YOUR_CLIENT_SECRET" {
        return "<not set>".to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}

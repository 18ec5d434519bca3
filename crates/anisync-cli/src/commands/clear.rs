use super::prompts;
use super::sync_ui::is_interactive;
use super::Context;
use crate::output::Output;
use color_eyre::Result;
use std::fs;

pub fn run_clear(ctx: &Context, credentials: bool, output: &Output) -> Result<()> {
    if !credentials {
        output.warn("No clear option specified. Use --credentials");
        output.info("\nExample: anisync clear --credentials");
        return Ok(());
    }

    clear_credentials(ctx, output)
}

fn clear_credentials(ctx: &Context, output: &Output) -> Result<()> {
    let credentials_file = ctx.paths.credentials_file();

    if !credentials_file.exists() {
        output.info("No credentials file found to clear");
        return Ok(());
    }

    if is_interactive()
        && output.is_human()
        && !prompts::prompt_yes_no("Remove stored AniList and MyAnimeList tokens?", Some(false))?
    {
        output.info("Nothing removed");
        return Ok(());
    }

    fs::remove_file(&credentials_file).map_err(|e| {
        color_eyre::eyre::eyre!(
            "Failed to remove credentials file at {}: {}",
            credentials_file.display(),
            e
        )
    })?;
    output.success(format!("Cleared credentials: {}", credentials_file.display()));

    Ok(())
}

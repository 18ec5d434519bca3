use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use commands::{auth, clear, config, sync, Context};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "anisync")]
#[command(about = "Bring your MyAnimeList lists in line with AniList")]
#[command(version)]
struct Cli {
    /// Enable verbose output (-v for debug logs and per-record tracing, -vv for everything)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Path to config.toml (credentials are stored next to it)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write logs to a daily-rotated file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync list progress from AniList to MyAnimeList
    #[command(long_about = "Fetch your AniList list and update every MyAnimeList entry whose status, score or progress differs. Anime is synced by default; use --manga for the manga lists.")]
    Sync {
        /// Sync manga lists instead of anime
        #[arg(long, action = ArgAction::SetTrue)]
        manga: bool,

        /// Push every record using its stored MyAnimeList id, without comparing
        #[arg(short = 'f', long, action = ArgAction::SetTrue)]
        force_sync: bool,

        /// Show what would be updated without changing anything
        #[arg(short = 'd', long, action = ArgAction::SetTrue)]
        dry_run: bool,
    },
    /// Authorize access to AniList and/or MyAnimeList
    #[command(long_about = "Print the authorization URL for a site, then paste the `code` parameter from the page you are redirected to. Tokens are stored in credentials.toml next to the config file.")]
    Auth {
        #[arg(value_enum)]
        site: AuthSite,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
    /// Remove stored data
    Clear {
        /// Remove stored OAuth tokens
        #[arg(long, action = ArgAction::SetTrue)]
        credentials: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AuthSite {
    Anilist,
    Myanimelist,
    All,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (masks secrets)
    Show {
        /// Show secrets unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Print the resolved config, credentials and log paths
    Path,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);
    let ctx = Context::new(cli.config);

    match cli.command {
        Commands::Sync {
            manga,
            force_sync,
            dry_run,
        } => {
            let args = sync::SyncArgs {
                manga,
                force_sync,
                dry_run,
                verbose: cli.verbose > 0,
            };
            sync::run_sync(&ctx, args, &output).await
        }
        Commands::Auth { site } => auth::run_auth(&ctx, site, &output).await,
        Commands::Config { cmd } => config::run_config(&ctx, cmd, &output),
        Commands::Clear { credentials } => clear::run_clear(&ctx, credentials, &output),
    }
}

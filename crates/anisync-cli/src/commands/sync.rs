use super::sync_ui::SyncUI;
use super::Context;
use crate::output::Output;
use anisync_core::{SyncOptions, SyncOrchestrator, SyncReport};
use anisync_models::{Anime, Manga, MediaKind, Record};
use anisync_sources::{anilist_client, myanimelist_client, SourceCatalog, TargetCatalog};
use color_eyre::Result;
use serde_json::json;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

pub struct SyncArgs {
    pub manga: bool,
    pub force_sync: bool,
    pub dry_run: bool,
    pub verbose: bool,
}

pub async fn run_sync(ctx: &Context, args: SyncArgs, output: &Output) -> Result<()> {
    let config = ctx.load_config()?;
    config
        .validate()
        .map_err(|e| color_eyre::eyre::eyre!("Invalid configuration in {}: {}", ctx.config_file.display(), e))?;

    let mut store = ctx.credential_store()?;
    let source = anilist_client(&config, &store)
        .map_err(|e| color_eyre::eyre::eyre!("{}. Run 'anisync auth anilist' first.", e))?;
    let target = myanimelist_client(&config, &mut store)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("{}. Run 'anisync auth myanimelist' first.", e))?;

    let options = SyncOptions {
        force_sync: args.force_sync,
        dry_run: args.dry_run,
        ignore_titles: config.ignored_titles_lowercase(),
        verbose: args.verbose,
        search_limit: config.sync.search_limit,
    };

    if options.dry_run {
        output.info("Dry run: no MyAnimeList entries will be changed");
    }

    let cancel = CancellationToken::new();
    spawn_shutdown_listener(cancel.clone());

    let kind = if args.manga { MediaKind::Manga } else { MediaKind::Anime };
    let report = match kind {
        MediaKind::Anime => {
            sync_kind::<Anime>(kind, &source, &target, options.clone(), &cancel).await?
        }
        MediaKind::Manga => {
            sync_kind::<Manga>(kind, &source, &target, options.clone(), &cancel).await?
        }
    };

    print_report(kind, &options, &report, output);
    Ok(())
}

async fn sync_kind<R>(
    kind: MediaKind,
    source: &dyn SourceCatalog<R>,
    target: &dyn TargetCatalog<R>,
    options: SyncOptions,
    cancel: &CancellationToken,
) -> Result<SyncReport>
where
    R: Record + Clone + 'static,
{
    let orchestrator = SyncOrchestrator::new(target, options);

    let ui = SyncUI::new();
    ui.set_message(format!("Fetching {} lists...", kind));
    let snapshots = orchestrator.fetch_snapshots(source, cancel).await;
    ui.finish();

    let (sources, targets) = snapshots.map_err(|e| {
        error!(kind = %kind, "Sync aborted: {}", e);
        color_eyre::eyre::eyre!("{} sync failed: {}", kind, e)
    })?;

    info!(
        kind = %kind,
        operation = "sync_start",
        source_records = sources.len(),
        target_records = targets.len(),
        "Starting {} sync",
        kind
    );

    let report = orchestrator.run(sources, targets, cancel).await;
    report.statistics.log_summary(&kind.to_string());
    Ok(report)
}

fn print_report(kind: MediaKind, options: &SyncOptions, report: &SyncReport, output: &Output) {
    if output.is_human() {
        if report.cancelled {
            output.warn("Sync was interrupted; remaining records were not processed");
        }
        if options.dry_run {
            output.info(format!("{} records would be updated", report.would_update));
        }
        output.info(report.statistics.to_string());
        return;
    }

    output.json(&json!({
        "kind": kind,
        "total": report.statistics.total,
        "updated": report.statistics.updated,
        "skipped": report.statistics.skipped,
        "would_update": report.would_update,
        "dry_run": options.dry_run,
        "force_sync": options.force_sync,
        "cancelled": report.cancelled,
        "records": report.records,
    }));
}

/// Cancel the run on Ctrl-C or SIGTERM. The orchestrator finishes the record
/// it is on and stops before the next one.
fn spawn_shutdown_listener(cancel: CancellationToken) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = signal::ctrl_c().await {
                warn!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sig) => {
                    sig.recv().await;
                }
                Err(e) => {
                    warn!("Failed to install SIGTERM handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => warn!("Received Ctrl+C, stopping after the current record"),
            _ = terminate => warn!("Received SIGTERM, stopping after the current record"),
        }
        cancel.cancel();
    });
}

use anyhow::{Context, Result};
use tracing::{info, warn};
use valo_track::bin_common::{parse_args, CliArgs, RunConfig};
use valorant::application::{init_logging_with_level, AnalysisApp};
use valorant::infrastructure::{render_console_report, AppConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse(&parse_args())?;
    if args.help || !args.has_command() {
        println!("{}", CliArgs::usage());
        return Ok(());
    }

    let config = AppConfig::from_env()
        .context("Failed to load configuration (account map path is VALO_ACCOUNTS_FILE)")?;
    init_logging_with_level(&config.log_level);
    config.log();

    let mut run = RunConfig::new("valo-track");
    if args.update {
        run = run.with_command("update");
    }
    if args.analyze {
        run = run.with_command("analyze");
    }
    run.print_banner();

    let app = AnalysisApp::new(config)?;
    let account = args
        .player
        .as_ref()
        .map(|(name, tag)| (name.as_str(), tag.as_str()));
    let request = app.request_for(account);

    let outcome = run_commands(&app, &args, request).await;

    let status = app.rate_limit_status();
    let summary = format!(
        "Rate limiter: {}/{} requests this window, {} pending",
        status.requests_made,
        app.max_requests_per_minute(),
        app.queue_size()
    );
    app.shutdown().await;
    run.print_shutdown(Some(&summary));

    outcome
}

async fn run_commands(
    app: &AnalysisApp,
    args: &CliArgs,
    request: valorant::AnalysisRequest,
) -> Result<()> {
    let (name, tag) = (request.player_name.clone(), request.player_tag.clone());

    if args.update {
        info!("=== UPDATE ===");
        let result = app.update(request).await?;
        info!(
            "Saved {} matches for {}#{} ({} rejected, {} failed) at {}",
            result.matches.len(),
            result.player_name,
            result.player_tag,
            result.rejected,
            result.failed,
            result.timestamp.format("%Y-%m-%d %H:%M:%S")
        );
    }

    if args.analyze {
        info!("=== ANALYSIS ===");
        let Some(saved) = app.analyze_saved(&name, &tag)? else {
            warn!("No saved matches. Run with --update first.");
            return Ok(());
        };

        println!(
            "{}",
            render_console_report(&saved.stats, &saved.matches, app.config.recent_matches_to_show)
        );
        info!("Stats written to {}", app.storage.stats_file().display());
    }

    Ok(())
}

//! CLI entrypoint for agora
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail, ensure};
use clap::{Parser, Subcommand};
use agora_application::use_cases::actor;
use agora_application::{
    AuditLog, ChatPlatform, Clock, ExpiryScheduler, ProposalStore, VoteLifecycle,
};
use agora_domain::{ChannelId, GovernanceConfig, ProposalTypeConfig, UserId, render};
use agora_infrastructure::{
    ConfigLoader, FileConfig, InMemoryChatPlatform, InMemoryProposalStore, JsonlAuditLogger,
    Severity, SystemClock,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "agora",
    version,
    about = "Proposal and vote lifecycle engine for community self-governance"
)]
struct Cli {
    /// Path to a config file (highest-priority source)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Write diagnostic logs to a file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load, merge and validate the configuration
    CheckConfig,
    /// Run a scripted governance round against the in-memory platform
    Simulate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    // The non-blocking writer stops once its guard drops; hold it for the
    // lifetime of main.
    let _log_guard = match &cli.log_file {
        Some(path) => {
            let file_name = path
                .file_name()
                .context("--log-file must name a file")?;
            let dir = match path.parent() {
                Some(parent) if parent.as_os_str().is_empty() => PathBuf::from("."),
                Some(parent) => parent.to_path_buf(),
                None => PathBuf::from("."),
            };
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .init();
            None
        }
    };

    match cli.command {
        Command::CheckConfig => check_config(cli.config.as_ref()),
        Command::Simulate => simulate(cli.config.as_ref()).await,
    }
}

/// Load the merged configuration and report every validation issue.
fn check_config(config_path: Option<&PathBuf>) -> Result<()> {
    println!("Configuration sources (in priority order):");
    if let Some(path) = config_path {
        println!("  [given] Explicit: {}", path.display());
    }
    match ConfigLoader::project_config_path() {
        Some(path) => println!("  [found] Project:  {}", path.display()),
        None => println!("  [     ] Project:  ./agora.toml or ./.agora.toml"),
    }
    if let Some(path) = ConfigLoader::global_config_path() {
        let marker = if path.exists() { "found" } else { "     " };
        println!("  [{marker}] Global:   {}", path.display());
    }
    println!();

    let config = ConfigLoader::load(config_path)?;
    let issues = config.validate();

    for issue in &issues {
        println!("{issue}");
    }

    if issues.iter().any(|i| i.severity == Severity::Error) {
        bail!("configuration has errors");
    }

    println!(
        "Configuration OK: guild '{}', {} proposal type(s)",
        config.guild.id,
        config.proposal_types.len()
    );
    for pt in &config.proposal_types {
        println!(
            "  {} — debate #{}, vote #{}, resolutions #{}, threshold {}, window {}s",
            pt.name,
            pt.debate_channel,
            pt.vote_channel,
            pt.resolutions_channel,
            pt.support_threshold,
            pt.vote_duration_secs
        );
    }
    Ok(())
}

/// Governance config for the simulated round. A one-second vote window
/// keeps the demo fast while leaving time to cast the scripted votes.
fn demo_governance() -> GovernanceConfig {
    GovernanceConfig::new(vec![ProposalTypeConfig {
        name: "policy".to_string(),
        debate_channel: ChannelId::new("proposals"),
        vote_channel: ChannelId::new("votes"),
        resolutions_channel: ChannelId::new("resolutions"),
        support_threshold: 3,
        vote_duration_secs: 1,
        format_labels: vec!["Policy".to_string()],
    }])
}

/// Wait out the demo vote window before sweeping.
async fn wait_for_window() {
    tokio::time::sleep(std::time::Duration::from_millis(1_200)).await;
}

/// The handle reports whether a command reached the lifecycle task; a lost
/// command means the task is gone and the transcripts would print empty.
fn delivered(ok: bool) -> Result<()> {
    ensure!(ok, "lifecycle task stopped; command not delivered");
    Ok(())
}

/// Drive one proposal and one withdrawal through the full lifecycle on the
/// in-memory platform, then print the resulting channel transcripts.
async fn simulate(config_path: Option<&PathBuf>) -> Result<()> {
    let config = ConfigLoader::load(config_path).unwrap_or_else(|_| FileConfig::default());

    let platform = Arc::new(InMemoryChatPlatform::with_channels([
        "proposals",
        "votes",
        "resolutions",
    ]));
    let store = Arc::new(InMemoryProposalStore::new());
    let governance = demo_governance();
    let guild = agora_domain::GuildId::new("simulated-guild");

    let mut lifecycle = VoteLifecycle::new(
        Arc::clone(&platform) as Arc<dyn ChatPlatform>,
        Arc::clone(&store) as Arc<dyn ProposalStore>,
        Arc::new(SystemClock) as Arc<dyn Clock>,
        guild.clone(),
        governance.clone(),
    );
    if let Some(path) = &config.audit.log_file
        && let Some(logger) = JsonlAuditLogger::new(path)
    {
        info!(path = %logger.path().display(), "audit log enabled");
        lifecycle = lifecycle.with_audit_log(Arc::new(logger) as Arc<dyn AuditLog>);
    }

    let (handle, task) = actor::spawn(lifecycle);

    // Background sweeps run exactly as they would against a live platform;
    // the scripted sweeps below only make the demo deterministic.
    let cancel = tokio_util::sync::CancellationToken::new();
    let scheduler_task = ExpiryScheduler::new(handle.clone())
        .with_poll_interval(std::time::Duration::from_secs(
            config.scheduler.poll_interval_secs,
        ))
        .with_startup_delay(std::time::Duration::from_secs(
            config.scheduler.startup_delay_secs,
        ))
        .with_cancellation(cancel.clone())
        .spawn();

    let proposals = ChannelId::new("proposals");
    let votes = ChannelId::new("votes");
    let resolutions = ChannelId::new("resolutions");
    let alice = UserId::new("alice");

    // A proposal gathers enough support and moves to a vote.
    let proposal =
        platform.post_user_message(&proposals, &alice, "**Policy**: Adopt a code of conduct")?;
    delivered(handle.support_reaction(proposal.clone(), 3).await)?;
    delivered(handle.check_ended_votes().await)?;

    // The community votes 6-2 in favor.
    let record = store
        .get(&guild, &proposal.id)
        .await?
        .context("proposal was not tracked")?;
    platform.add_reactions(&votes, &record.vote_message_id, render::YES_OPTION, 6)?;
    platform.add_reactions(&votes, &record.vote_message_id, render::NO_OPTION, 2)?;
    delivered(handle.vote_reaction(record.vote_message_id.clone()).await)?;
    wait_for_window().await;
    delivered(handle.check_ended_votes().await)?;

    // A withdrawal proposal revokes the freshly published resolution.
    let withdrawal =
        platform.post_user_message(&proposals, &alice, "**Withdraw**: Adopt a code of conduct")?;
    delivered(handle.support_reaction(withdrawal.clone(), 3).await)?;
    delivered(handle.check_ended_votes().await)?;

    if let Ok(Some(record)) = store.get(&guild, &withdrawal.id).await {
        platform.add_reactions(&votes, &record.vote_message_id, render::YES_OPTION, 5)?;
        delivered(handle.vote_reaction(record.vote_message_id.clone()).await)?;
        wait_for_window().await;
        delivered(handle.check_ended_votes().await)?;
    }

    cancel.cancel();
    scheduler_task.await.context("scheduler task panicked")?;
    drop(handle);
    task.await.context("lifecycle task panicked")?;

    for channel in [&proposals, &votes, &resolutions] {
        println!("=== #{channel} ===");
        for content in platform.channel_contents(channel) {
            println!("{content}");
            println!("---");
        }
        println!();
    }

    Ok(())
}

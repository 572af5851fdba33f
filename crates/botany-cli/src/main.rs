use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use botany_core::{Clock, SystemClock};
use botany_reconcile::{ConsistencyAuditor, ReconcileEngine};
use botany_store::HomeLayout;
use botany_store::discovery::select_users;
use clap::Parser;

mod bootstrap;
mod cli;
mod output;
mod report;

/// Exit status when the audit finds a page view that disagrees with the plant.
const EXIT_MISMATCH: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("botany-reconcile error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<ExitCode> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let settings = bootstrap::load_settings(&cli)?;
    let layout = HomeLayout::new(&settings.home_prefix);
    let users = select_users(layout.home_prefix(), cli.user.as_deref())
        .with_context(|| format!("failed to list users under {}", settings.home_prefix.display()))?;

    let table = bootstrap::open_table(&settings.db_path).await;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let engine = ReconcileEngine::new(layout.clone(), &table, Arc::clone(&clock))
        .context("failed to set up reconcile engine")?;
    let run = engine.run(&users, &settings.options).await;

    let audit = if cli.audit {
        let auditor = ConsistencyAuditor::new(layout, &table, clock)
            .context("failed to set up auditor")?;
        Some(auditor.audit_all(&users, &settings.options).await)
    } else {
        None
    };

    let report = report::CliReport {
        dry_run: settings.options.dry_run,
        run,
        audit,
    };
    output::output(&report, cli.format)?;

    if report.has_mismatch() {
        Ok(ExitCode::from(EXIT_MISMATCH))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("BOTANY_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

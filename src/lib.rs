// src/lib.rs

pub mod cli;
pub mod config;
pub mod discover;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod types;
pub mod watch;

use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{Settings, load_optional, resolve_settings};
use crate::discover::discover_targets;
use crate::engine::{DispatchCore, DispatchStats, Dispatcher};
use crate::errors::Result;
use crate::exec::{ExecutorBackend, ShellExecutor};
use crate::fs::{FileSystem, RealFileSystem};
use crate::watch::{ChangeEvent, WatchTargets, select_source};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file + CLI flags)
/// - target discovery
/// - the selected change source, dispatcher and shell executor
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let file = load_optional(args.config.as_deref().map(Path::new))?;
    let settings = resolve_settings(&args, file)?;

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let targets = discover_targets(fs.as_ref(), &settings)?;

    if args.dry_run {
        print_dry_run(&settings, &targets);
        return Ok(());
    }

    let cancel = CancellationToken::new();

    // Ctrl-C → graceful shutdown.
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            cancel.cancel();
        });
    }

    let executor = ShellExecutor::from_settings(&settings);
    run_pipeline(&settings, targets, fs, executor, cancel).await?;
    Ok(())
}

/// Run the watch → dispatch → execute pipeline until it stops.
///
/// Returns when `cancel` fires, or once every watcher has stopped (polling
/// mode with all files gone). Setup failures of the change source are
/// returned as errors before anything is dispatched.
pub async fn run_pipeline<E>(
    settings: &Settings,
    targets: WatchTargets,
    fs: Arc<dyn FileSystem>,
    executor: E,
    cancel: CancellationToken,
) -> Result<DispatchStats>
where
    E: ExecutorBackend,
{
    let strategy = settings.strategy();
    if targets.is_empty() {
        warn!(root = ?settings.root, "no files matched the configured types");
    }

    info!(
        %strategy,
        files = targets.len(),
        command = %settings.command,
        delay = ?settings.delay,
        exec_mode = ?settings.exec_mode,
        "watchrun started"
    );

    // A child token lets us stop our own watchers without cancelling the
    // caller's token.
    let shutdown = cancel.child_token();

    // Minimal buffer: watchers wait for the dispatcher to take each event.
    let (event_tx, event_rx) = mpsc::channel::<ChangeEvent>(1);

    let source = select_source(strategy, targets, fs);
    debug!(strategy = %source.strategy(), "change source selected");
    let handle = source.start(event_tx, shutdown.clone())?;

    let dispatcher = Dispatcher::new(
        DispatchCore::for_strategy(strategy),
        event_rx,
        executor,
        shutdown.clone(),
        settings.verbose,
    );
    let stats = dispatcher.run().await;

    shutdown.cancel();
    let exits = handle.join().await;
    debug!(?exits, "watchers stopped");

    Ok(stats)
}

/// Simple dry-run output: resolved settings and the watched files.
fn print_dry_run(settings: &Settings, targets: &WatchTargets) {
    println!("watchrun dry-run");
    println!("  root = {}", settings.root.display());
    println!("  types = {:?}", settings.types);
    println!("  case_insensitive_types = {}", settings.case_insensitive_types);
    println!("  command = {}", settings.command);
    println!("  strategy = {}", settings.strategy());
    println!("  delay = {:?}", settings.delay);
    println!("  exec_mode = {:?}", settings.exec_mode);
    println!("  verbose = {}", settings.verbose);
    println!();

    println!("files ({}):", targets.len());
    for path in targets.iter() {
        println!("  - {}", path.display());
    }

    debug!("dry-run complete (no watching)");
}

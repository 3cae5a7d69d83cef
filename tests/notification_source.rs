// tests/notification_source.rs

mod common;
use crate::common::{init_tracing, with_timeout, RecordingExecutor, SettingsBuilder};

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use notify::event::{CreateKind, DataChange, ModifyKind};
use notify::{Event, EventKind};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use watchrun::errors::WatchrunError;
use watchrun::fs::RealFileSystem;
use watchrun::run_pipeline;
use watchrun::types::Strategy;
use watchrun::watch::{ChangeEvent, WatchTargets, WatcherExit, forward_notifications};

type TestResult = Result<(), Box<dyn Error>>;

fn write_event(path: &str) -> Event {
    Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
        .add_path(PathBuf::from(path))
}

#[tokio::test]
async fn write_events_are_forwarded_and_errors_ignored() -> TestResult {
    init_tracing();

    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();
    let (error_tx, error_rx) = mpsc::unbounded_channel::<notify::Error>();
    let (tx, mut rx) = mpsc::channel::<ChangeEvent>(1);

    let reader = tokio::spawn(forward_notifications(
        event_rx,
        error_rx,
        tx,
        CancellationToken::new(),
    ));

    // Subscription errors are logged and do not end the reader.
    error_tx.send(notify::Error::generic("queue overflow"))?;
    // Non-write events are dropped.
    event_tx.send(
        Event::new(EventKind::Create(CreateKind::File)).add_path(PathBuf::from("/proj/new.txt")),
    )?;
    event_tx.send(write_event("/proj/a.txt"))?;

    let change = with_timeout(rx.recv()).await.expect("forwarded change");
    assert_eq!(change.path, PathBuf::from("/proj/a.txt"));
    assert_eq!(change.strategy, Strategy::Notification);

    // Closing the OS event stream ends the reader quietly.
    drop(event_tx);
    assert_eq!(with_timeout(reader).await?, WatcherExit::StreamClosed);
    assert!(rx.recv().await.is_none());
    Ok(())
}

#[tokio::test]
async fn event_with_several_paths_yields_one_change_each() -> TestResult {
    init_tracing();

    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();
    let (_error_tx, error_rx) = mpsc::unbounded_channel::<notify::Error>();
    let (tx, mut rx) = mpsc::channel::<ChangeEvent>(1);
    let cancel = CancellationToken::new();

    let reader = tokio::spawn(forward_notifications(event_rx, error_rx, tx, cancel.clone()));

    event_tx.send(write_event("/proj/a.txt").add_path(PathBuf::from("/proj/b.txt")))?;

    let first = with_timeout(rx.recv()).await.expect("first");
    let second = with_timeout(rx.recv()).await.expect("second");
    assert_eq!(first.path, PathBuf::from("/proj/a.txt"));
    assert_eq!(second.path, PathBuf::from("/proj/b.txt"));

    cancel.cancel();
    assert_eq!(with_timeout(reader).await?, WatcherExit::Cancelled);
    Ok(())
}

#[tokio::test]
async fn unregistrable_path_is_a_fatal_setup_error() -> TestResult {
    init_tracing();

    let dir = tempfile::TempDir::new()?;
    let missing = dir.path().join("gone.txt");
    let settings = SettingsBuilder::new("echo CHANGED").notification().build();

    let result = with_timeout(run_pipeline(
        &settings,
        WatchTargets::new(vec![missing]),
        Arc::new(RealFileSystem),
        RecordingExecutor::new(),
        CancellationToken::new(),
    ))
    .await;

    assert!(
        matches!(result, Err(WatchrunError::WatchSetup(_))),
        "expected WatchSetup error, got {result:?}"
    );
    Ok(())
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn single_real_write_runs_command_once() -> TestResult {
    use std::io::Write;

    init_tracing();

    let dir = tempfile::TempDir::new()?;
    let file = dir.path().join("a.txt");
    std::fs::write(&file, "initial")?;
    let file = file.canonicalize()?;

    let settings = SettingsBuilder::new("echo CHANGED").notification().build();
    let executor = RecordingExecutor::new();
    let cancel = CancellationToken::new();
    let pipeline = tokio::spawn({
        let executor = executor.clone();
        let cancel = cancel.clone();
        let targets = WatchTargets::new(vec![file.clone()]);
        async move {
            run_pipeline(&settings, targets, Arc::new(RealFileSystem), executor, cancel).await
        }
    });

    // Give the subscription a moment to be registered.
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    let mut handle = std::fs::OpenOptions::new().append(true).open(&file)?;
    writeln!(handle, "changed")?;
    handle.sync_all()?;
    drop(handle);

    with_timeout(executor.wait_for(1)).await;
    assert_eq!(executor.requests()[0].path, file);

    // Let any trailing events for the same write (close after write) arrive.
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    assert_eq!(executor.count(), 1, "one write must run the command once");

    cancel.cancel();
    let stats = with_timeout(pipeline).await??;
    assert_eq!(stats.accepted, 1);
    Ok(())
}

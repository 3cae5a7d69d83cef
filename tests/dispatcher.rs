// tests/dispatcher.rs

mod common;
use crate::common::{init_tracing, with_timeout, RecordingExecutor};

use std::error::Error;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::anyhow;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use watchrun::engine::{DispatchCore, DispatchStats, Dispatcher};
use watchrun::errors::WatchrunError;
use watchrun::exec::{ExecutionRequest, ExecutorBackend};
use watchrun::types::Strategy;
use watchrun::watch::{ChangeEvent, Debouncer};

type TestResult = Result<(), Box<dyn Error>>;

const POLL: Strategy = Strategy::Poll {
    period: Duration::from_millis(10),
};

fn event_at(path: &str, at: Instant, strategy: Strategy) -> ChangeEvent {
    ChangeEvent {
        path: PathBuf::from(path),
        observed_at: at,
        strategy,
    }
}

#[tokio::test]
async fn polling_mode_launches_once_per_event() -> TestResult {
    init_tracing();

    let (tx, rx) = mpsc::channel::<ChangeEvent>(1);
    let executor = RecordingExecutor::new();
    let dispatcher = Dispatcher::new(
        DispatchCore::for_strategy(POLL),
        rx,
        executor.clone(),
        CancellationToken::new(),
        true,
    );
    let run = tokio::spawn(dispatcher.run());

    // Same path, same instant: polling mode applies no debounce.
    let t0 = Instant::now();
    for _ in 0..3 {
        tx.send(event_at("/proj/a.go", t0, POLL)).await?;
    }
    tx.send(event_at("/proj/b.go", t0, POLL)).await?;
    drop(tx);

    let stats = with_timeout(run).await?;
    assert_eq!(
        stats,
        DispatchStats {
            received: 4,
            accepted: 4,
            suppressed: 0,
            launch_failures: 0,
        }
    );

    let paths: Vec<_> = executor.requests().into_iter().map(|r| r.path).collect();
    assert_eq!(
        paths,
        vec![
            PathBuf::from("/proj/a.go"),
            PathBuf::from("/proj/a.go"),
            PathBuf::from("/proj/a.go"),
            PathBuf::from("/proj/b.go"),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn notification_mode_suppresses_bursts() -> TestResult {
    init_tracing();

    let n = Strategy::Notification;
    let (tx, rx) = mpsc::channel::<ChangeEvent>(1);
    let executor = RecordingExecutor::new();
    let core = DispatchCore::new(Some(Debouncer::with_window(Duration::from_millis(10))));
    let run = tokio::spawn(
        Dispatcher::new(core, rx, executor.clone(), CancellationToken::new(), false).run(),
    );

    let t0 = Instant::now();
    let ms = Duration::from_millis;

    // Burst on a.txt: only the first survives, even though the last one is
    // well past the window measured from the accepted event.
    for offset in [0, 4, 8, 12, 16] {
        tx.send(event_at("/proj/a.txt", t0 + ms(offset), n)).await?;
    }
    // Another path inside the same burst is independent.
    tx.send(event_at("/proj/b.txt", t0 + ms(17), n)).await?;
    // A real pause on a.txt re-opens it.
    tx.send(event_at("/proj/a.txt", t0 + ms(40), n)).await?;
    drop(tx);

    let stats = with_timeout(run).await?;
    assert_eq!(stats.received, 7);
    assert_eq!(stats.accepted, 3);
    assert_eq!(stats.suppressed, 4);

    let accepted: Vec<ExecutionRequest> = executor.requests();
    assert_eq!(accepted[0].accepted_at, t0);
    assert_eq!(accepted[1].path, PathBuf::from("/proj/b.txt"));
    assert_eq!(accepted[2].accepted_at, t0 + ms(40));
    Ok(())
}

#[tokio::test]
async fn cancellation_stops_dispatcher_with_open_sources() -> TestResult {
    init_tracing();

    let (tx, rx) = mpsc::channel::<ChangeEvent>(1);
    let cancel = CancellationToken::new();
    let executor = RecordingExecutor::new();
    let run = tokio::spawn(
        Dispatcher::new(
            DispatchCore::for_strategy(Strategy::Notification),
            rx,
            executor.clone(),
            cancel.clone(),
            false,
        )
        .run(),
    );

    tx.send(ChangeEvent::new("/proj/a.txt", Strategy::Notification)).await?;
    with_timeout(executor.wait_for(1)).await;

    cancel.cancel();
    let stats = with_timeout(run).await?;
    assert_eq!(stats.accepted, 1);

    // Sender is still alive; the dispatcher stopped because of the token.
    assert!(tx.is_closed());
    Ok(())
}

/// Executor whose launches always fail.
struct FailingExecutor;

impl ExecutorBackend for FailingExecutor {
    fn launch(&mut self, _request: ExecutionRequest) -> watchrun::errors::Result<()> {
        Err(WatchrunError::Other(anyhow!("no shell available")))
    }
}

#[tokio::test]
async fn launch_failures_do_not_stop_dispatching() -> TestResult {
    init_tracing();

    let (tx, rx) = mpsc::channel::<ChangeEvent>(1);
    let run = tokio::spawn(
        Dispatcher::new(
            DispatchCore::for_strategy(POLL),
            rx,
            FailingExecutor,
            CancellationToken::new(),
            false,
        )
        .run(),
    );

    tx.send(ChangeEvent::new("/proj/a.go", POLL)).await?;
    tx.send(ChangeEvent::new("/proj/a.go", POLL)).await?;
    drop(tx);

    let stats = with_timeout(run).await?;
    assert_eq!(stats.accepted, 2);
    assert_eq!(stats.launch_failures, 2);
    Ok(())
}

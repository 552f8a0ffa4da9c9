use anyhow::Result;
use polivalka::console::{ConsoleCommand, HELP};
use polivalka::{Config, Controller, Snapshot, build_controller, netinfo, view};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;
    tracing::info!(device = %config.device_url, timeout_s = config.request_timeout.as_secs(), "polivalka starting");

    let Controller {
        state,
        poller,
        commander,
    } = build_controller(&config, netinfo::host_ip_label())?;

    let cancel = CancellationToken::new();
    let poll_task = poller.spawn(cancel.clone());
    let display_task = tokio::spawn(display(state.subscribe(), cancel.clone()));
    println!("{}\n{HELP}", view::render(&state.snapshot()));

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            _ = &mut shutdown => break,
            line = lines.next_line() => line,
        };
        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "stdin read failed");
                break;
            }
        };
        // Failures are already logged by the commander.
        match ConsoleCommand::parse(&line) {
            Some(ConsoleCommand::Toggle) => {
                let _ = commander.toggle().await;
            }
            Some(ConsoleCommand::Set(desired)) => {
                let _ = commander.set_watering(desired).await;
            }
            Some(ConsoleCommand::Quit) => break,
            None if line.trim().is_empty() => {}
            None => println!("{HELP}"),
        }
    }

    cancel.cancel();
    poll_task.await?;
    display_task.await?;
    tracing::info!("polivalka shutdown complete");
    Ok(())
}

async fn display(mut rx: watch::Receiver<Snapshot>, cancel: CancellationToken) {
    let mut last = String::new();
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            changed = rx.changed() => if changed.is_err() { break },
        }
        let frame = view::render(&rx.borrow_and_update());
        if frame != last {
            println!("\n{frame}");
            last = frame;
        }
    }
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};
    let mut sigint = signal(SignalKind::interrupt()).expect("listen SIGINT");
    let mut sigterm = signal(SignalKind::terminate()).expect("listen SIGTERM");
    tokio::select! {
        _ = sigint.recv() => {},
        _ = sigterm.recv() => {},
    }
    tracing::info!("shutdown signal received");
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    tracing::info!("shutdown signal received");
}

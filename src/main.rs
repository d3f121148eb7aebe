use clap::Parser;
use proclog::{MemoryLogStore, shutdown_signal, stop_on_interrupt};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Run a (simulated) task under heartbeat logging and dump the resulting
/// log rows on exit. Interrupt with Ctrl-C for a graceful shutdown.
#[derive(Parser, Debug)]
#[command(name = "proclog", version, about)]
struct Args {
    /// Name of the process being logged
    #[arg(long, default_value = "proclog-demo")]
    app_name: String,

    /// Version of the process being logged
    #[arg(long, default_value = "0.1.0")]
    app_version: String,

    /// Log table the entry is routed to
    #[arg(long, default_value = "log_proclog_demo")]
    log_table: String,

    /// Seconds between heartbeat updates
    #[arg(long, default_value_t = 5)]
    period: u64,

    /// Stop after this many seconds instead of waiting for Ctrl-C
    #[arg(long)]
    run_secs: Option<u64>,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("proclog=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let store = Arc::new(MemoryLogStore::new());
    let detail = serde_json::json!({
        "app": args.app_name.as_str(),
        "period_secs": args.period,
    })
    .to_string();

    let heartbeat = Arc::new(
        proclog::start(
            store.clone(),
            args.app_name,
            args.app_version,
            args.log_table,
            detail,
            args.period,
        )
        .await?,
    );

    match args.run_secs {
        Some(secs) => {
            let interrupt = stop_on_interrupt(Arc::clone(&heartbeat));
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(secs)) => {}
                _ = interrupt => {}
            }
        }
        None => shutdown_signal().await,
    }
    heartbeat.stop().await;

    let rows = store.entries().await;
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sb8200_adapters::sb8200::Sb8200Adapter;
use sb8200_exporter::export::export_snapshot;
use sb8200_exporter::{Overrides, Settings};
use sb8200_metrics::prometheus::{PrometheusConfig, PrometheusExporter};
use sb8200_metrics::ModemCollector;

#[derive(Parser, Debug)]
#[command(name = "sb8200-exporter")]
#[command(about = "Prometheus exporter for Arris SB8200 cable modem signal statistics")]
struct Args {
    /// Path under which to expose metrics
    #[arg(long, alias = "metrics.path")]
    metrics_path: Option<String>,

    /// Address to listen on (e.g. ":9292" or "127.0.0.1:9292")
    #[arg(long, alias = "metrics.addr")]
    metrics_addr: Option<String>,

    /// URL of the modem status page
    #[arg(long, alias = "modem.host")]
    modem_url: Option<String>,

    /// Optional TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Collect one snapshot, write it to this JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            metrics_path: self.metrics_path.clone(),
            metrics_addr: self.metrics_addr.clone(),
            modem_url: self.modem_url.clone(),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::load(args.config.as_deref(), &args.overrides())?;

    init_tracing(&settings.log_level);

    let adapter = Sb8200Adapter::builder()
        .url(settings.modem_url.clone())
        .timeout(settings.collect_timeout())
        .build()?;

    let rt = tokio::runtime::Runtime::new()?;

    // Handle export mode (non-interactive)
    if let Some(export_path) = args.export {
        let snapshot = rt.block_on(export_snapshot(
            &adapter,
            settings.collect_timeout(),
            &export_path,
        ))?;
        println!(
            "Exported {} downstream and {} upstream channels to: {}",
            snapshot.downstream.len(),
            snapshot.upstream.len(),
            export_path.display()
        );
        return Ok(());
    }

    rt.block_on(serve(adapter, &settings))
}

/// Serve metrics until the listener fails or the process is interrupted.
async fn serve(adapter: Sb8200Adapter, settings: &Settings) -> Result<()> {
    let collector = ModemCollector::new(adapter)
        .timeout(settings.collect_timeout())
        .stale_policy(settings.stale_policy()?);

    let config = PrometheusConfig::builder()
        .listen_addr(settings.listen_addr())
        .metrics_path(settings.metrics_path.clone())
        .namespace(settings.namespace.clone())
        .build();

    info!(
        modem = %settings.modem_url,
        stale_channels = %settings.stale_channels,
        "starting SB8200 exporter"
    );
    let exporter = PrometheusExporter::new(config, collector);

    tokio::select! {
        result = exporter.serve() => {
            result.map_err(|e| anyhow!("metrics server failed: {}", e))
        }
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted, shutting down");
            Ok(())
        }
    }
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

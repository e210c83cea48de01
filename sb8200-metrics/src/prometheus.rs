//! Prometheus exposition format support.
//!
//! Every request to the metrics path runs one collection cycle against the
//! modem and then renders the gauges in the Prometheus text-based exposition
//! format. A failed cycle is answered with `500` and leaves the gauges as
//! they were.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sb8200_adapters::sb8200::Sb8200Adapter;
//! use sb8200_metrics::ModemCollector;
//! use sb8200_metrics::prometheus::{PrometheusConfig, PrometheusExporter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let config = PrometheusConfig::builder()
//!         .listen_addr("0.0.0.0:9292")
//!         .metrics_path("/metrics")
//!         .build();
//!
//!     let adapter = Sb8200Adapter::builder().build()?;
//!     let exporter = PrometheusExporter::new(config, ModemCollector::new(adapter));
//!
//!     // Metrics available at http://localhost:9292/metrics
//!     exporter.serve().await
//! }
//! ```

use std::convert::Infallible;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use sb8200_adapters::{AdapterError, ModemSource};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::collector::ModemCollector;
use crate::gauge::ModemMetrics;

/// Namespace prefixed to every metric name.
pub const DEFAULT_NAMESPACE: &str = "sb8200";

const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Error type returned by the HTTP server.
pub type ServerError = Box<dyn std::error::Error + Send + Sync>;

/// Where the exporter listens when nothing else is configured.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:9292";

pub const DEFAULT_METRICS_PATH: &str = "/metrics";

/// HTTP surface of the exporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrometheusConfig {
    /// `host:port` to bind; host names are resolved at bind time.
    pub listen_addr: String,
    /// Path that triggers a collection.
    pub metrics_path: String,
    /// Prefix joined to every metric name with `_`.
    pub namespace: Option<String>,
}

impl Default for PrometheusConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            metrics_path: DEFAULT_METRICS_PATH.to_string(),
            namespace: Some(DEFAULT_NAMESPACE.to_string()),
        }
    }
}

impl PrometheusConfig {
    /// Start from the defaults and override selected fields.
    pub fn builder() -> PrometheusConfigBuilder {
        PrometheusConfigBuilder(Self::default())
    }
}

/// Fluent overrides on top of [`PrometheusConfig::default`].
#[derive(Debug)]
pub struct PrometheusConfigBuilder(PrometheusConfig);

impl PrometheusConfigBuilder {
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.0.listen_addr = addr.into();
        self
    }

    pub fn metrics_path(mut self, path: impl Into<String>) -> Self {
        self.0.metrics_path = path.into();
        self
    }

    /// Metric name prefix; `""` emits bare names.
    pub fn namespace(mut self, ns: impl Into<String>) -> Self {
        let ns = ns.into();
        self.0.namespace = (!ns.is_empty()).then_some(ns);
        self
    }

    pub fn build(self) -> PrometheusConfig {
        self.0
    }
}

/// Prometheus exporter that collects on scrape and serves metrics over HTTP.
#[derive(Debug)]
pub struct PrometheusExporter<S> {
    config: PrometheusConfig,
    collector: Arc<ModemCollector<S>>,
}

impl<S: ModemSource + 'static> PrometheusExporter<S> {
    /// Create a new Prometheus exporter.
    pub fn new(config: PrometheusConfig, collector: ModemCollector<S>) -> Self {
        Self {
            config,
            collector: Arc::new(collector),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &PrometheusConfig {
        &self.config
    }

    /// The gauges this exporter renders.
    pub fn metrics(&self) -> &Arc<ModemMetrics> {
        self.collector.metrics()
    }

    /// Render the current gauges without collecting.
    pub fn render(&self) -> String {
        format_prometheus(self.collector.metrics(), self.config.namespace.as_deref())
    }

    /// Collect once, then render.
    pub async fn scrape(&self) -> Result<String, AdapterError> {
        self.collector.collect().await?;
        Ok(self.render())
    }

    /// Bind the configured address and serve until an accept error occurs.
    pub async fn serve(&self) -> Result<(), ServerError> {
        let listener = bind(&self.config.listen_addr).await?;
        self.serve_on(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn serve_on(&self, listener: TcpListener) -> Result<(), ServerError> {
        run_server(listener, self.config.clone(), self.collector.clone()).await
    }
}

/// Bind `listen_addr`, resolving host names the way the OS does.
async fn bind(listen_addr: &str) -> Result<TcpListener, ServerError> {
    Ok(TcpListener::bind(listen_addr).await?)
}

async fn run_server<S: ModemSource + 'static>(
    listener: TcpListener,
    config: PrometheusConfig,
    collector: Arc<ModemCollector<S>>,
) -> Result<(), ServerError> {
    info!(
        addr = %listener.local_addr()?,
        path = %config.metrics_path,
        "serving metrics"
    );
    let config = Arc::new(config);

    loop {
        let (stream, peer) = listener.accept().await?;
        let io = TokioIo::new(stream);

        let config = config.clone();
        let collector = collector.clone();

        tokio::spawn(async move {
            let service = service_fn(move |req: Request<hyper::body::Incoming>| {
                let config = config.clone();
                let collector = collector.clone();

                async move { handle_request(req, &config, &collector).await }
            });

            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                warn!(%peer, error = %e, "Prometheus connection error");
            }
        });
    }
}

async fn handle_request<S: ModemSource>(
    req: Request<hyper::body::Incoming>,
    config: &PrometheusConfig,
    collector: &ModemCollector<S>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let path = req.uri().path();

    let response = if path == config.metrics_path {
        match collector.collect().await {
            Ok(()) => text_response(
                StatusCode::OK,
                EXPOSITION_CONTENT_TYPE,
                format_prometheus(collector.metrics(), config.namespace.as_deref()),
            ),
            Err(e) => text_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "text/plain",
                format!("collection failed ({}): {}\n", e.kind(), e),
            ),
        }
    } else if path == "/" {
        text_response(
            StatusCode::OK,
            "text/html; charset=utf-8",
            landing_page(&config.metrics_path),
        )
    } else if path == "/health" || path == "/healthz" {
        text_response(StatusCode::OK, "text/plain", "OK".to_string())
    } else {
        text_response(StatusCode::NOT_FOUND, "text/plain", "Not Found".to_string())
    };

    info!(
        method = %req.method(),
        path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );

    Ok(response)
}

fn text_response(
    status: StatusCode,
    content_type: &'static str,
    body: String,
) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

fn landing_page(metrics_path: &str) -> String {
    format!(
        "<html>\n\
         <head><title>Arris SB8200 Exporter</title></head>\n\
         <body>\n\
         <h1>Arris SB8200 Exporter</h1>\n\
         <p><a href='{}'>Metrics</a></p>\n\
         </body>\n\
         </html>\n",
        metrics_path
    )
}

/// Format the current gauges as Prometheus exposition format.
pub fn format_prometheus(metrics: &ModemMetrics, namespace: Option<&str>) -> String {
    let mut output = String::new();
    let prefix = namespace.map(|n| format!("{}_", n)).unwrap_or_default();

    let families = metrics.read();
    for family in families.iter() {
        let series = family.series();
        let name = series.name();

        let _ = writeln!(output, "# HELP {}{} {}", prefix, name, series.help());
        let _ = writeln!(output, "# TYPE {}{} gauge", prefix, name);

        for (channel, value) in family.iter() {
            let _ = writeln!(
                output,
                "{}{}{{{}=\"{}\"}} {}",
                prefix,
                name,
                series.label(),
                channel,
                format_value(value)
            );
        }
    }

    output
}

/// Render a sample value the way the exposition format spells specials.
fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        value.to_string()
    }
}

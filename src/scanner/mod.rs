pub mod results;
pub mod services;
pub mod tcp;

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Duration;
use tracing::{debug, info, warn};

use crate::error::ScanError;
use crate::network::resolve_host;
use crate::ports::PortRange;
pub use results::{aggregate, PortStatus, ProbeResult, Protocol, ScanReport};
pub use services::ServiceRegistry;
pub use tcp::{Prober, TcpProber};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(500);
pub const DEFAULT_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    /// Per-connect timeout.
    pub timeout: Duration,
    /// Maximum probes in flight at once.
    pub concurrency: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// Dispatches one probe per port with bounded concurrency and aggregates the
/// outcomes into a port-ordered [`ScanReport`].
pub struct Scanner<P: Prober = TcpProber> {
    prober: Arc<P>,
    concurrency: usize,
    show_progress: bool,
}

impl Scanner<TcpProber> {
    pub fn new(config: ScanConfig) -> Self {
        Self::with_prober(TcpProber::new(config.timeout), config.concurrency)
    }
}

impl<P: Prober> Scanner<P> {
    pub fn with_prober(prober: P, concurrency: usize) -> Self {
        Self {
            prober: Arc::new(prober),
            concurrency: concurrency.clamp(1, Semaphore::MAX_PERMITS),
            show_progress: false,
        }
    }

    /// Draw a progress bar on stderr while probing.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Scan `range` on `host`.
    ///
    /// Resolution failure aborts the scan with no report, as does a target where
    /// every port came back unreachable. Per-port failures never do.
    pub async fn scan(&self, host: &str, range: &PortRange) -> Result<ScanReport, ScanError> {
        let scan_start = Instant::now();
        let target = resolve_host(host).await?;
        let ports = range.ports();

        info!(host, %target, %range, ports = ports.len(), concurrency = self.concurrency, "starting scan");

        let pb = self.progress_bar(ports.len() as u64);
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for port in ports.iter().copied() {
            let sem = semaphore.clone();
            let prober = self.prober.clone();
            let pb = pb.clone();

            tasks.spawn(async move {
                let _permit = sem
                    .acquire_owned()
                    .await
                    .map_err(|e| ScanError::TaskFailed(e.to_string()))?;
                let result = prober.probe(target, port).await;
                pb.inc(1);
                result
            });
        }

        let mut results = Vec::with_capacity(ports.len());
        let mut unreachable = 0usize;
        let mut last_unreachable = None;
        while let Some(joined) = tasks.join_next().await {
            let outcome = joined
                .map_err(|e| ScanError::TaskFailed(e.to_string()))
                .and_then(|probe| probe);
            match outcome {
                Ok(result) => results.push(result),
                Err(ScanError::Unreachable { host: addr, port, source }) => {
                    debug!(%addr, port, error = %source, "port unreachable, counting as closed");
                    results.push(ProbeResult::closed(port));
                    unreachable += 1;
                    last_unreachable = Some(ScanError::Unreachable { host: addr, port, source });
                }
                Err(e) => {
                    warn!(host, error = %e, "aborting scan");
                    tasks.abort_all();
                    pb.abandon();
                    return Err(e);
                }
            }
        }

        if unreachable == results.len() {
            if let Some(e) = last_unreachable {
                warn!(host, error = %e, "target unreachable on every port");
                pb.abandon();
                return Err(e);
            }
        }

        pb.finish_and_clear();

        let report = aggregate(host, results, scan_start.elapsed());
        info!(
            host,
            open = report.open_count(),
            closed = report.closed_count(),
            elapsed_ms = report.elapsed().as_millis() as u64,
            "scan complete"
        );
        Ok(report)
    }

    /// Like [`scan`](Self::scan), but gives up with [`ScanError::Interrupted`] as
    /// soon as `shutdown` completes. In-flight probes are aborted.
    pub async fn scan_with_shutdown<F>(
        &self,
        host: &str,
        range: &PortRange,
        shutdown: F,
    ) -> Result<ScanReport, ScanError>
    where
        F: Future,
    {
        tokio::select! {
            report = self.scan(host, range) => report,
            _ = shutdown => {
                debug!(host, "shutdown requested, abandoning scan");
                Err(ScanError::Interrupted)
            }
        }
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len);
        // Template is a literal; fall back to the default style rather than fail a scan.
        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.green/black} {pos}/{len} ports scanned ({eta})")
        {
            pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏ "));
        }
        pb
    }
}

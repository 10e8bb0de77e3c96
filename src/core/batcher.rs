//! Aggregator that owns the output table and batches bar redraws

use super::sink::RenderSink;
use super::worker::UpdateNotification;
use log::{debug, error, trace, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// How module outputs are composed into one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarFormat {
    /// Placed between two module outputs
    pub separator: String,
    /// Placed before the first and after the last output
    pub padding: String,
}

impl BarFormat {
    pub fn new(separator: impl Into<String>, padding: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
            padding: padding.into(),
        }
    }

    /// Compose module outputs, in configuration order
    pub fn compose(&self, outputs: &[String]) -> String {
        format!("{}{}{}", self.padding, outputs.join(&self.separator), self.padding)
    }

    /// Split a composed line back into module outputs
    ///
    /// Exact inverse of [`compose`](Self::compose) as long as no output
    /// contains the separator.
    pub fn split<'a>(&self, line: &'a str) -> Vec<&'a str> {
        let inner = line.strip_prefix(self.padding.as_str()).unwrap_or(line);
        let inner = inner.strip_suffix(self.padding.as_str()).unwrap_or(inner);
        if self.separator.is_empty() {
            return vec![inner];
        }
        inner.split(self.separator.as_str()).collect()
    }
}

impl Default for BarFormat {
    fn default() -> Self {
        use dwmstat_core::constants::{DEFAULT_PADDING, DEFAULT_SEPARATOR};
        Self::new(DEFAULT_SEPARATOR, DEFAULT_PADDING)
    }
}

/// Collects module updates and redraws the bar
///
/// Updates are batched: the bar is redrawn once `batch_size` updates have
/// accumulated, or when `min_time` has passed since the last redraw or
/// timeout with at least one update pending, whichever comes first.
pub(crate) struct Batcher {
    outputs: Vec<String>,
    batched: usize,
    batch_size: usize,
    min_time: Duration,
    format: BarFormat,
    sink: Arc<dyn RenderSink>,
    updates: mpsc::Receiver<UpdateNotification>,
}

impl Batcher {
    pub fn new(
        outputs: Vec<String>,
        batch_size: usize,
        min_time: Duration,
        format: BarFormat,
        sink: Arc<dyn RenderSink>,
        updates: mpsc::Receiver<UpdateNotification>,
    ) -> Self {
        Self {
            outputs,
            batched: 0,
            batch_size: batch_size.max(1),
            min_time,
            format,
            sink,
            updates,
        }
    }

    /// Run until every worker has dropped its sender
    ///
    /// With `flush_first` the initial table is drawn before waiting for
    /// updates.
    pub async fn run(mut self, flush_first: bool) {
        if flush_first {
            self.flush().await;
        }

        let mut deadline = Instant::now() + self.min_time;
        loop {
            tokio::select! {
                update = self.updates.recv() => {
                    let Some(update) = update else {
                        if self.batched > 0 {
                            self.batched = 0;
                            self.flush().await;
                        }
                        debug!("All workers stopped, aggregator exiting");
                        break;
                    };
                    if self.record(update) {
                        self.batched = 0;
                        self.flush().await;
                        deadline = Instant::now() + self.min_time;
                    }
                }
                _ = tokio::time::sleep_until(deadline) => {
                    if self.batched > 0 {
                        self.batched = 0;
                        self.flush().await;
                    } else {
                        trace!("No pending updates at timeout");
                    }
                    deadline = Instant::now() + self.min_time;
                }
            }
        }
    }

    /// Store an update; returns true when the batch is full
    fn record(&mut self, update: UpdateNotification) -> bool {
        let Some(slot) = self.outputs.get_mut(update.index) else {
            warn!("Update for unknown module index {}", update.index);
            return false;
        };
        *slot = update.output;
        self.batched += 1;
        self.batched >= self.batch_size
    }

    /// Compose the table and hand it to the sink
    async fn flush(&self) {
        let line = self.format.compose(&self.outputs);
        debug!("Updating bar: '{}'", line);

        let sink = Arc::clone(&self.sink);
        match tokio::task::spawn_blocking(move || sink.apply(&line)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!("{:#}", e),
            Err(e) => error!("Render sink panicked: {}", e),
        }
    }
}

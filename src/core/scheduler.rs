//! Update scheduler coordinating module workers and the bar aggregator

use super::batcher::{BarFormat, Batcher};
use super::error::ConfigError;
use super::signal::Signal;
use super::sink::RenderSink;
use super::worker::{execute_module, SharedModule, WorkerHandle};
use super::BoxedModule;
use dwmstat_core::constants::{DEFAULT_BATCH_SIZE, DEFAULT_MIN_TIME, DEFAULT_STOP_TIMEOUT};
use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Scheduler settings
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub format: BarFormat,
    /// Number of module updates that trigger a redraw
    pub batch_size: usize,
    /// Longest time pending updates wait for a redraw
    pub min_time: Duration,
    /// Draw the initial output table right away
    pub initial_flush: bool,
    /// Grace period for workers stuck in a module on shutdown
    pub stop_timeout: Duration,
}

impl SchedulerConfig {
    pub fn validate(&self, module_count: usize) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        if module_count == 0 {
            return Err(ConfigError::NoModules);
        }
        Ok(())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            format: BarFormat::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            min_time: DEFAULT_MIN_TIME,
            initial_flush: true,
            stop_timeout: DEFAULT_STOP_TIMEOUT,
        }
    }
}

/// Running scheduler: one worker per module plus the aggregator
pub struct Scheduler {
    workers: Vec<WorkerHandle>,
    /// Module name to worker index, last registered wins
    names: HashMap<String, usize>,
    /// Signal id to every worker answering it
    signals: HashMap<String, Vec<usize>>,
    batcher: JoinHandle<()>,
    stop_timeout: Duration,
}

impl Scheduler {
    /// Start scheduling `modules`, in display order
    ///
    /// Every module runs once before any worker starts so the first redraw
    /// has no empty slot.
    pub async fn start(
        modules: Vec<BoxedModule>,
        config: SchedulerConfig,
        sink: Arc<dyn RenderSink>,
    ) -> Result<Self, ConfigError> {
        config.validate(modules.len())?;

        let mut names = HashMap::new();
        let mut signals: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, module) in modules.iter().enumerate() {
            if let Some(previous) = names.insert(module.name().to_string(), index) {
                warn!(
                    "Duplicate module name '{}' (positions {} and {}), signals reach position {}",
                    module.name(),
                    previous,
                    index,
                    index
                );
            }
            if let Some(signal) = module.signal() {
                signals.entry(signal.to_string()).or_default().push(index);
            }
        }

        let modules: Vec<SharedModule> = modules
            .into_iter()
            .map(|module| Arc::new(Mutex::new(module)))
            .collect();

        let mut outputs = Vec::with_capacity(modules.len());
        for module in &modules {
            let name = module
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .name()
                .to_string();
            debug!("Initial run of module '{}'", name);
            outputs.push(execute_module(module, &name).await);
        }

        let (updates_tx, updates_rx) = mpsc::channel(modules.len());
        let workers = modules
            .into_iter()
            .enumerate()
            .map(|(index, module)| WorkerHandle::spawn(index, module, updates_tx.clone()))
            .collect::<Vec<_>>();
        // Only workers hold senders: the aggregator ends once they all stop
        drop(updates_tx);

        let batcher = Batcher::new(
            outputs,
            config.batch_size,
            config.min_time,
            config.format,
            sink,
            updates_rx,
        );
        let batcher = tokio::spawn(batcher.run(config.initial_flush));

        info!("Scheduling {} modules", workers.len());
        Ok(Self {
            workers,
            names,
            signals,
            batcher,
            stop_timeout: config.stop_timeout,
        })
    }

    /// Worker positions addressed by a signal payload
    ///
    /// The payload matches a module name, or the signal id of any number
    /// of modules.
    fn targets(&self, target: &str) -> Vec<usize> {
        let mut targets: Vec<usize> = self.names.get(target).copied().into_iter().collect();
        if let Some(indices) = self.signals.get(target) {
            targets.extend(indices.iter().copied());
        }
        targets.sort_unstable();
        targets.dedup();
        targets
    }

    /// Run the addressed modules now
    ///
    /// Returns false if nothing answers to `target`.
    pub fn signal(&self, target: &str) -> bool {
        let targets = self.targets(target);
        if targets.is_empty() {
            warn!("Signal for unknown module '{}' ignored", target);
            return false;
        }
        for index in targets {
            self.workers[index].request_run();
        }
        true
    }

    /// Route incoming signals until the sending side closes
    pub async fn route_signals(&self, mut signals: mpsc::Receiver<Signal>) {
        while let Some(signal) = signals.recv().await {
            debug!("Routing signal '{}'", signal.target);
            self.signal(&signal.target);
        }
        debug!("Signal channel closed");
    }

    /// Names of the scheduled modules, in display order
    pub fn module_names(&self) -> Vec<&str> {
        self.workers.iter().map(|w| w.name.as_str()).collect()
    }

    /// Stop every worker, then let the aggregator draw what is pending
    ///
    /// Takes at most `stop_timeout` for the workers plus `stop_timeout` for
    /// the aggregator, even when a module or the sink hangs.
    pub async fn shutdown(self) {
        let deadline = Instant::now() + self.stop_timeout;
        for worker in self.workers {
            worker.stop(deadline).await;
        }

        let mut batcher = self.batcher;
        match tokio::time::timeout(self.stop_timeout, &mut batcher).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!("Aggregator task failed: {}", e),
            Err(_) => {
                warn!("Aggregator did not stop in time, abandoning it");
                batcher.abort();
            }
        }
        info!("Scheduler stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::channel_sink;
    use crate::core::{Module, ModuleMetadata, Schedule};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::Instant;

    /// Outputs its name followed by the number of earlier runs
    struct CountingModule {
        metadata: ModuleMetadata,
        schedule: Schedule,
        runs: Arc<AtomicUsize>,
    }

    fn counting(
        name: &str,
        interval: Option<Duration>,
        signal: Option<&str>,
    ) -> (BoxedModule, Arc<AtomicUsize>) {
        let runs = Arc::new(AtomicUsize::new(0));
        let module = CountingModule {
            metadata: ModuleMetadata {
                id: "counting".to_string(),
                description: "counts its runs".to_string(),
                default_interval: interval,
            },
            schedule: Schedule {
                name: name.to_string(),
                interval,
                signal: signal.map(str::to_string),
            },
            runs: runs.clone(),
        };
        (Box::new(module), runs)
    }

    impl Module for CountingModule {
        fn metadata(&self) -> &ModuleMetadata {
            &self.metadata
        }

        fn schedule(&self) -> &Schedule {
            &self.schedule
        }

        fn execute(&mut self) -> String {
            let n = self.runs.fetch_add(1, Ordering::SeqCst);
            format!("{}{}", self.schedule.name, n)
        }
    }

    /// Blocks in every run after the first until the test releases it
    struct StuckModule {
        metadata: ModuleMetadata,
        schedule: Schedule,
        runs: Arc<AtomicUsize>,
        release: std::sync::mpsc::Receiver<()>,
    }

    impl Module for StuckModule {
        fn metadata(&self) -> &ModuleMetadata {
            &self.metadata
        }

        fn schedule(&self) -> &Schedule {
            &self.schedule
        }

        fn execute(&mut self) -> String {
            if self.runs.fetch_add(1, Ordering::SeqCst) > 0 {
                let _ = self.release.recv();
            }
            "stuck".to_string()
        }
    }

    fn config(batch_size: usize, min_time: Duration, initial_flush: bool) -> SchedulerConfig {
        SchedulerConfig {
            format: BarFormat::default(),
            batch_size,
            min_time,
            initial_flush,
            stop_timeout: DEFAULT_STOP_TIMEOUT,
        }
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let (sink, _lines) = channel_sink();
        let (module, _) = counting("a", None, None);
        let err = Scheduler::start(vec![module], config(0, Duration::from_secs(1), true), sink.clone())
            .await
            .err()
            .unwrap();
        assert_eq!(err, ConfigError::ZeroBatchSize);

        let err = Scheduler::start(Vec::new(), SchedulerConfig::default(), sink)
            .await
            .err()
            .unwrap();
        assert_eq!(err, ConfigError::NoModules);
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_table_before_first_flush() {
        let (sink, mut lines) = channel_sink();
        let (a, _) = counting("a", Some(Duration::from_secs(1)), None);
        let (b, _) = counting("b", None, None);
        let (c, _) = counting("c", Some(Duration::from_secs(5)), None);

        let scheduler = Scheduler::start(vec![a, b, c], SchedulerConfig::default(), sink)
            .await
            .unwrap();
        assert_eq!(lines.recv().await.unwrap(), " a0 | b0 | c0 ");
        assert_eq!(scheduler.module_names(), vec!["a", "b", "c"]);

        scheduler.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_signal_only_module_never_ticks() {
        let (sink, _lines) = channel_sink();
        let (a, a_runs) = counting("a", Some(Duration::from_secs(1)), None);
        let (b, b_runs) = counting("b", None, None);

        let scheduler = Scheduler::start(vec![a, b], SchedulerConfig::default(), sink)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(10_500)).await;

        assert_eq!(b_runs.load(Ordering::SeqCst), 1);
        assert_eq!(a_runs.load(Ordering::SeqCst), 11);

        scheduler.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_intervals_are_independent() {
        let (sink, _lines) = channel_sink();
        let (fast, fast_runs) = counting("fast", Some(Duration::from_secs(1)), None);
        let (slow, slow_runs) = counting("slow", Some(Duration::from_secs(3)), None);

        let scheduler = Scheduler::start(
            vec![fast, slow],
            config(10, Duration::from_secs(60), false),
            sink,
        )
        .await
        .unwrap();
        tokio::time::sleep(Duration::from_millis(3500)).await;

        assert_eq!(fast_runs.load(Ordering::SeqCst), 4);
        assert_eq!(slow_runs.load(Ordering::SeqCst), 2);

        scheduler.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_signal_forces_run() {
        let (sink, mut lines) = channel_sink();
        let (a, _) = counting("a", None, None);
        let (b, b_runs) = counting("b", None, None);

        let scheduler = Scheduler::start(
            vec![a, b],
            config(1, Duration::from_secs(60), false),
            sink,
        )
        .await
        .unwrap();

        assert!(scheduler.signal("b"));
        assert_eq!(lines.recv().await.unwrap(), " a0 | b1 ");
        assert_eq!(b_runs.load(Ordering::SeqCst), 2);

        assert!(!scheduler.signal("nope"));
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert!(lines.try_recv().is_err());

        scheduler.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_signal_id_reaches_every_module() {
        let (sink, mut lines) = channel_sink();
        let (ram, ram_runs) = counting("ram", None, Some("res"));
        let (date, date_runs) = counting("date", None, None);
        let (cpu, cpu_runs) = counting("cpu", None, Some("res"));

        let scheduler = Scheduler::start(
            vec![ram, date, cpu],
            config(2, Duration::from_secs(60), false),
            sink,
        )
        .await
        .unwrap();

        assert!(scheduler.signal("res"));
        assert_eq!(lines.recv().await.unwrap(), " ram1 | date0 | cpu1 ");
        assert_eq!(ram_runs.load(Ordering::SeqCst), 2);
        assert_eq!(cpu_runs.load(Ordering::SeqCst), 2);
        assert_eq!(date_runs.load(Ordering::SeqCst), 1);

        scheduler.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_name_last_wins() {
        let (sink, mut lines) = channel_sink();
        let (first, first_runs) = counting("dup", None, None);
        let (second, second_runs) = counting("dup", None, None);

        let scheduler = Scheduler::start(
            vec![first, second],
            config(1, Duration::from_secs(60), false),
            sink,
        )
        .await
        .unwrap();

        assert!(scheduler.signal("dup"));
        assert_eq!(lines.recv().await.unwrap(), " dup0 | dup1 ");
        assert_eq!(first_runs.load(Ordering::SeqCst), 1);
        assert_eq!(second_runs.load(Ordering::SeqCst), 2);

        scheduler.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_routed_signals_until_closed() {
        let (sink, mut lines) = channel_sink();
        let (vol, _) = counting("vol", None, None);

        let scheduler = Scheduler::start(
            vec![vol],
            config(1, Duration::from_secs(60), false),
            sink,
        )
        .await
        .unwrap();

        let (tx, rx) = mpsc::channel(5);
        tx.send(Signal::new("vol")).await.unwrap();
        tx.send(Signal::new("unknown")).await.unwrap();
        drop(tx);
        scheduler.route_signals(rx).await;

        assert_eq!(lines.recv().await.unwrap(), " vol1 ");
        scheduler.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_batched_interval_updates() {
        let (sink, mut lines) = channel_sink();
        let (a, _) = counting("a", Some(Duration::from_secs(1)), None);
        let (b, _) = counting("b", None, None);
        let start = Instant::now();

        let scheduler = Scheduler::start(
            vec![a, b],
            config(3, Duration::from_secs(10), false),
            sink,
        )
        .await
        .unwrap();

        assert_eq!(lines.recv().await.unwrap(), " a3 | b0 ");
        let flushed_at = start.elapsed();
        assert!(flushed_at >= Duration::from_secs(3));
        assert!(flushed_at < Duration::from_millis(3100));

        scheduler.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_and_signal_scenario() {
        let (sink, mut lines) = channel_sink();
        let (a, _) = counting("A", Some(Duration::from_secs(1)), None);
        let (b, _) = counting("B", None, Some("sig-B"));
        let start = Instant::now();

        let scheduler = Scheduler::start(
            vec![a, b],
            config(1, Duration::from_secs(2), false),
            sink,
        )
        .await
        .unwrap();

        assert_eq!(lines.recv().await.unwrap(), " A1 | B0 ");
        let at = start.elapsed();
        assert!(at >= Duration::from_secs(1) && at < Duration::from_millis(1100));

        tokio::time::sleep_until(start + Duration::from_millis(1500)).await;
        assert!(lines.try_recv().is_err());
        assert!(scheduler.signal("sig-B"));
        assert_eq!(lines.recv().await.unwrap(), " A1 | B1 ");
        let at = start.elapsed();
        assert!(at >= Duration::from_millis(1500) && at < Duration::from_millis(1600));

        assert_eq!(lines.recv().await.unwrap(), " A2 | B1 ");
        let at = start.elapsed();
        assert!(at >= Duration::from_secs(2) && at < Duration::from_millis(2100));

        scheduler.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_abandons_stuck_module() {
        let (sink, _lines) = channel_sink();
        let (release_tx, release_rx) = std::sync::mpsc::channel();
        let runs = Arc::new(AtomicUsize::new(0));
        let stuck: BoxedModule = Box::new(StuckModule {
            metadata: ModuleMetadata {
                id: "stuck".to_string(),
                description: "hangs once signalled".to_string(),
                default_interval: None,
            },
            schedule: Schedule {
                name: "vol".to_string(),
                interval: None,
                signal: None,
            },
            runs: runs.clone(),
            release: release_rx,
        });
        let (date, _) = counting("date", Some(Duration::from_secs(1)), None);

        let mut settings = config(1, Duration::from_secs(60), false);
        settings.stop_timeout = Duration::from_millis(200);
        let scheduler = Scheduler::start(vec![stuck, date], settings, sink)
            .await
            .unwrap();

        assert!(scheduler.signal("vol"));
        tokio::time::timeout(Duration::from_secs(5), async {
            while runs.load(Ordering::SeqCst) < 2 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();

        let start = Instant::now();
        tokio::time::timeout(Duration::from_secs(5), scheduler.shutdown())
            .await
            .unwrap();
        assert!(start.elapsed() < Duration::from_secs(2));

        // Let the blocking thread finish so the runtime can shut down
        drop(release_tx);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_flushes_pending() {
        let (sink, mut lines) = channel_sink();
        let (a, _) = counting("a", None, None);

        let scheduler = Scheduler::start(
            vec![a],
            config(5, Duration::from_secs(60), false),
            sink,
        )
        .await
        .unwrap();
        assert!(scheduler.signal("a"));
        tokio::time::sleep(Duration::from_millis(10)).await;
        scheduler.shutdown().await;

        assert_eq!(lines.recv().await.unwrap(), " a1 ");
        assert!(lines.recv().await.is_none());
    }
}

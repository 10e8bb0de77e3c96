//! Per-module worker driving one module's execution cycle

use super::BoxedModule;
use dwmstat_core::constants::mod_exec_panic;
use log::{debug, error, info, trace, warn};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Kind of event sent to a worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// Don't wait for the interval to finish, run now
    RunNow,
    /// Skip the current interval and stop
    Stop,
}

/// Output of one module execution, addressed by configuration index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateNotification {
    pub index: usize,
    pub output: String,
}

/// A module shared between the scheduler and the blocking pool
pub(crate) type SharedModule = Arc<Mutex<BoxedModule>>;

/// Execute a module on the blocking pool
///
/// `execute()` is synchronous and may run an external command, so it never
/// runs on the async worker threads. A panic inside the module is contained
/// here and replaced by a sentinel marker.
pub(crate) async fn execute_module(module: &SharedModule, name: &str) -> String {
    let module = Arc::clone(module);
    let result = tokio::task::spawn_blocking(move || {
        // A previous panic poisons the mutex; the module itself is still usable
        let mut guard = module.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.execute()
    })
    .await;

    match result {
        Ok(output) => output,
        Err(e) => {
            let marker = mod_exec_panic(name);
            error!("{}: {}", marker, e);
            marker
        }
    }
}

/// Why a worker woke up
enum Wake {
    Interval,
    RunNow,
    Stop,
}

impl From<Option<ControlEvent>> for Wake {
    fn from(event: Option<ControlEvent>) -> Self {
        match event {
            Some(ControlEvent::RunNow) => Wake::RunNow,
            // A closed control channel means nobody can signal or stop us anymore
            Some(ControlEvent::Stop) | None => Wake::Stop,
        }
    }
}

/// Worker loop state for one module
pub(crate) struct ModuleWorker {
    pub index: usize,
    pub name: String,
    pub interval: Option<Duration>,
    pub module: SharedModule,
    pub control: mpsc::Receiver<ControlEvent>,
    pub updates: mpsc::Sender<UpdateNotification>,
}

impl ModuleWorker {
    /// Run until stopped
    ///
    /// With an interval, whichever comes first of a control event and the
    /// interval elapsing wakes the worker. Without one the worker only
    /// wakes on control events.
    pub async fn run(mut self) {
        loop {
            let wake = match self.interval {
                Some(interval) => tokio::select! {
                    event = self.control.recv() => Wake::from(event),
                    _ = tokio::time::sleep(interval) => Wake::Interval,
                },
                None => Wake::from(self.control.recv().await),
            };

            match wake {
                Wake::Stop => {
                    debug!("Stopping worker for module '{}'", self.name);
                    break;
                }
                Wake::RunNow => info!("EV_EXEC - updating module '{}'", self.name),
                Wake::Interval => trace!("UPDATE_INTERVAL - updating module '{}'", self.name),
            }

            let output = execute_module(&self.module, &self.name).await;
            let notification = UpdateNotification {
                index: self.index,
                output,
            };
            if self.updates.send(notification).await.is_err() {
                debug!("Aggregator gone, stopping worker for module '{}'", self.name);
                break;
            }
        }
    }
}

/// Handle to a running worker
pub(crate) struct WorkerHandle {
    pub name: String,
    control: mpsc::Sender<ControlEvent>,
    task: JoinHandle<()>,
}

impl WorkerHandle {
    /// Spawn a worker task
    ///
    /// The control channel holds a single event: a second `RunNow` arriving
    /// while one is still pending is redundant.
    pub fn spawn(
        index: usize,
        module: SharedModule,
        updates: mpsc::Sender<UpdateNotification>,
    ) -> Self {
        let (name, interval) = {
            let guard = module.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            (guard.name().to_string(), guard.update_interval())
        };
        let (control_tx, control_rx) = mpsc::channel(1);

        let worker = ModuleWorker {
            index,
            name: name.clone(),
            interval,
            module,
            control: control_rx,
            updates,
        };
        let task = tokio::spawn(worker.run());

        Self {
            name,
            control: control_tx,
            task,
        }
    }

    /// Ask the worker to run its module now, without blocking
    ///
    /// Returns false if the worker has stopped.
    pub fn request_run(&self) -> bool {
        match self.control.try_send(ControlEvent::RunNow) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                debug!("Run already pending for module '{}'", self.name);
                true
            }
            Err(TrySendError::Closed(_)) => {
                warn!("Worker for module '{}' is no longer running", self.name);
                false
            }
        }
    }

    /// Stop the worker, waiting for it until `deadline`
    ///
    /// A worker still inside `execute()` at the deadline is aborted. Its
    /// blocking execution is left to finish on its own and its output is
    /// discarded.
    pub async fn stop(mut self, deadline: Instant) {
        let stopped = tokio::time::timeout_at(deadline, async {
            // Send fails only if the worker already exited
            let _ = self.control.send(ControlEvent::Stop).await;
            (&mut self.task).await
        })
        .await;

        match stopped {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!("Worker task failed for module '{}': {}", self.name, e),
            Err(_) => {
                warn!("Module '{}' did not stop in time, abandoning it", self.name);
                self.task.abort();
                let _ = self.task.await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Module, ModuleMetadata, Schedule};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TickModule {
        metadata: ModuleMetadata,
        schedule: Schedule,
        runs: Arc<AtomicUsize>,
    }

    impl TickModule {
        fn shared(interval: Option<Duration>, runs: Arc<AtomicUsize>) -> SharedModule {
            Arc::new(Mutex::new(Box::new(TickModule {
                metadata: ModuleMetadata {
                    id: "tick".to_string(),
                    description: "counts executions".to_string(),
                    default_interval: interval,
                },
                schedule: Schedule {
                    name: "tick".to_string(),
                    interval,
                    signal: None,
                },
                runs,
            })))
        }
    }

    impl Module for TickModule {
        fn metadata(&self) -> &ModuleMetadata {
            &self.metadata
        }

        fn schedule(&self) -> &Schedule {
            &self.schedule
        }

        fn execute(&mut self) -> String {
            let n = self.runs.fetch_add(1, Ordering::SeqCst) + 1;
            format!("tick{}", n)
        }
    }

    struct PanicModule {
        metadata: ModuleMetadata,
        schedule: Schedule,
    }

    impl Module for PanicModule {
        fn metadata(&self) -> &ModuleMetadata {
            &self.metadata
        }

        fn schedule(&self) -> &Schedule {
            &self.schedule
        }

        fn execute(&mut self) -> String {
            panic!("module blew up");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_worker_ticks() {
        let runs = Arc::new(AtomicUsize::new(0));
        let (tx, mut rx) = mpsc::channel(8);
        let handle = WorkerHandle::spawn(
            3,
            TickModule::shared(Some(Duration::from_secs(1)), runs.clone()),
            tx,
        );

        let first = rx.recv().await.unwrap();
        assert_eq!(
            first,
            UpdateNotification {
                index: 3,
                output: "tick1".to_string()
            }
        );
        let second = rx.recv().await.unwrap();
        assert_eq!(second.output, "tick2");

        handle.stop(Instant::now() + Duration::from_secs(5)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_signal_only_worker_waits_for_run_now() {
        let runs = Arc::new(AtomicUsize::new(0));
        let (tx, mut rx) = mpsc::channel(8);
        let handle = WorkerHandle::spawn(0, TickModule::shared(None, runs.clone()), tx);

        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        assert!(handle.request_run());
        assert_eq!(rx.recv().await.unwrap().output, "tick1");

        handle.stop(Instant::now() + Duration::from_secs(5)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_now_preempts_interval() {
        let runs = Arc::new(AtomicUsize::new(0));
        let (tx, mut rx) = mpsc::channel(8);
        let handle = WorkerHandle::spawn(
            0,
            TickModule::shared(Some(Duration::from_secs(60)), runs.clone()),
            tx,
        );

        let start = tokio::time::Instant::now();
        assert!(handle.request_run());
        assert_eq!(rx.recv().await.unwrap().output, "tick1");
        assert!(start.elapsed() < Duration::from_secs(60));

        handle.stop(Instant::now() + Duration::from_secs(5)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_ends_worker_without_output() {
        let runs = Arc::new(AtomicUsize::new(0));
        let (tx, mut rx) = mpsc::channel(8);
        let handle = WorkerHandle::spawn(
            0,
            TickModule::shared(Some(Duration::from_secs(1)), runs.clone()),
            tx,
        );

        handle.stop(Instant::now() + Duration::from_secs(5)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        // The worker dropped its sender on exit
        assert!(rx.recv().await.is_none());
    }

    /// Blocks in `execute` until the test releases it
    struct BlockingModule {
        metadata: ModuleMetadata,
        schedule: Schedule,
        started: Arc<AtomicUsize>,
        release: std::sync::mpsc::Receiver<()>,
    }

    impl Module for BlockingModule {
        fn metadata(&self) -> &ModuleMetadata {
            &self.metadata
        }

        fn schedule(&self) -> &Schedule {
            &self.schedule
        }

        fn execute(&mut self) -> String {
            self.started.fetch_add(1, Ordering::SeqCst);
            let _ = self.release.recv();
            "released".to_string()
        }
    }

    #[tokio::test]
    async fn test_stop_aborts_worker_stuck_in_execute() {
        let started = Arc::new(AtomicUsize::new(0));
        let (release_tx, release_rx) = std::sync::mpsc::channel();
        let module: SharedModule = Arc::new(Mutex::new(Box::new(BlockingModule {
            metadata: ModuleMetadata {
                id: "blocking".to_string(),
                description: "waits for release".to_string(),
                default_interval: None,
            },
            schedule: Schedule {
                name: "hang".to_string(),
                interval: None,
                signal: None,
            },
            started: started.clone(),
            release: release_rx,
        })));
        let (tx, mut rx) = mpsc::channel(8);
        let handle = WorkerHandle::spawn(0, module, tx);

        assert!(handle.request_run());
        while started.load(Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let start = Instant::now();
        handle.stop(start + Duration::from_millis(100)).await;
        assert!(start.elapsed() < Duration::from_secs(2));
        // The aborted worker dropped its sender without reporting output
        assert!(rx.recv().await.is_none());

        drop(release_tx);
    }

    #[tokio::test]
    async fn test_panicking_module_becomes_sentinel() {
        let module: SharedModule = Arc::new(Mutex::new(Box::new(PanicModule {
            metadata: ModuleMetadata {
                id: "panic".to_string(),
                description: "always panics".to_string(),
                default_interval: None,
            },
            schedule: Schedule {
                name: "boom".to_string(),
                interval: None,
                signal: None,
            },
        })));

        assert_eq!(execute_module(&module, "boom").await, "MOD_EXEC_PANIC(boom)");
        // Poisoned mutex is recovered on the next run
        assert_eq!(execute_module(&module, "boom").await, "MOD_EXEC_PANIC(boom)");
    }
}

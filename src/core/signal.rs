//! Signal listener accepting force-update requests on a Unix socket
//!
//! Each connection carries exactly one message: the name (or signal id) of
//! the module to run, e.g. `printf volume | socat - UNIX-CONNECT:/tmp/dwmstat_sig`
//! or `dwmstat signal volume`.

use super::error::SignalError;
use log::{debug, error, info, warn};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::mpsc;

/// Pause after a failed accept so a persistent error doesn't spin
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Request to run one module (or every module sharing a signal id) now
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    pub target: String,
}

impl Signal {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }
}

/// Listener bound to the signal socket
///
/// The socket file is removed when the listener is dropped.
pub struct SignalListener {
    listener: UnixListener,
    path: PathBuf,
}

impl SignalListener {
    /// Bind the socket, replacing a stale socket file left by a previous run
    ///
    /// Must be called from within a tokio runtime.
    pub fn bind(path: impl AsRef<Path>) -> Result<Self, SignalError> {
        let path = path.as_ref().to_path_buf();

        match std::fs::remove_file(&path) {
            Ok(()) => debug!("Removed stale signal socket {:?}", path),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(source) => return Err(SignalError::RemoveStale { path, source }),
        }

        let listener = UnixListener::bind(&path).map_err(|source| SignalError::Bind {
            path: path.clone(),
            source,
        })?;
        info!("Listening for signals on {:?}", path);

        Ok(Self { listener, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Accept connections and forward their signals until the receiver
    /// side of `signals` is dropped
    pub async fn run(self, signals: mpsc::Sender<Signal>) {
        loop {
            tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, _)) => {
                        let signals = signals.clone();
                        tokio::spawn(async move {
                            match read_signal(stream).await {
                                Ok(signal) => {
                                    debug!("Received signal for '{}'", signal.target);
                                    if signals.send(signal).await.is_err() {
                                        debug!("Signal router gone, dropping signal");
                                    }
                                }
                                Err(e) => error!("{}", e),
                            }
                        });
                    }
                    Err(e) => {
                        error!("failed to accept connection: {}", e);
                        tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                    }
                },
                _ = signals.closed() => {
                    debug!("Signal router gone, listener exiting");
                    break;
                }
            }
        }
    }
}

impl Drop for SignalListener {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != ErrorKind::NotFound {
                warn!("Failed to remove signal socket {:?}: {}", self.path, e);
            }
        }
    }
}

/// Read one message to completion
async fn read_signal(mut stream: UnixStream) -> Result<Signal, SignalError> {
    let mut data = String::new();
    stream
        .read_to_string(&mut data)
        .await
        .map_err(SignalError::Read)?;

    let target = data.trim();
    if target.is_empty() {
        return Err(SignalError::Empty);
    }
    Ok(Signal::new(target))
}

/// Send one signal to a running instance
pub async fn send_signal(path: impl AsRef<Path>, target: &str) -> Result<(), SignalError> {
    let path = path.as_ref();
    let mut stream = UnixStream::connect(path)
        .await
        .map_err(|source| SignalError::Connect {
            path: path.to_path_buf(),
            source,
        })?;
    stream
        .write_all(target.as_bytes())
        .await
        .map_err(SignalError::Write)?;
    stream.shutdown().await.map_err(SignalError::Write)?;
    Ok(())
}

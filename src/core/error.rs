//! Typed errors of the scheduler and the signal transport

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Invalid scheduler configuration, detected before any task is spawned
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("batch size must be at least 1")]
    ZeroBatchSize,
    #[error("no modules configured")]
    NoModules,
}

/// Failures of the signal socket
#[derive(Debug, Error)]
pub enum SignalError {
    #[error("failed to remove stale signal socket {path:?}: {source}")]
    RemoveStale {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to bind signal socket {path:?}: {source}")]
    Bind {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to connect to signal socket {path:?}: {source}")]
    Connect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read from connection: {0}")]
    Read(#[source] io::Error),
    #[error("failed to write signal: {0}")]
    Write(#[source] io::Error),
    #[error("received an empty signal")]
    Empty,
}

//! I/O boundary traits for testability
//!
//! These traits abstract external collaborators, allowing services to be
//! tested with substitute implementations.

use std::io;
use std::process::Command;
use std::sync::Mutex;

use tracing::debug;

/// External incremental-build tool abstraction.
///
/// One call declares all dependencies of the current invocation as a single
/// batch and blocks until the builder has brought them up to date.
pub trait BuildRunner: Send + Sync {
    /// Declare `filenames` as dependencies and ensure they are fresh.
    /// Returns the builder's exit status; nonzero means at least one
    /// dependency could not be built.
    fn ensure_fresh(&self, filenames: &[String]) -> io::Result<i32>;
}

/// Real build runner: spawns `redo-ifchange` with the filenames as
/// arguments. No shell is involved, so filenames need no quoting.
#[derive(Debug, Default)]
pub struct RedoRunner;

impl BuildRunner for RedoRunner {
    fn ensure_fresh(&self, filenames: &[String]) -> io::Result<i32> {
        debug!("redo-ifchange {} files", filenames.len());
        let status = Command::new("redo-ifchange").args(filenames).status()?;
        // A signal-terminated builder has no code; report it as failure.
        Ok(status.code().unwrap_or(1))
    }
}

/// Test substitute: records every batch it is asked to ensure and always
/// succeeds. Failing builders are exercised end to end, since they take the
/// process down with them.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<Vec<String>>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Batches recorded so far, in call order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().expect("runner lock poisoned").clone()
    }
}

impl BuildRunner for RecordingRunner {
    fn ensure_fresh(&self, filenames: &[String]) -> io::Result<i32> {
        self.calls
            .lock()
            .expect("runner lock poisoned")
            .push(filenames.to_vec());
        Ok(0)
    }
}

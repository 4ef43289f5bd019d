//! Read orchestration service
//!
//! Flattens a request, declares the whole flat list to the builder in one
//! batched call, loads every file sequentially via extension dispatch, and
//! reconstructs the request's shape around the loaded values.

use std::path::Path;
use std::process;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{linearize, unlinearize, Request, Tree};
use crate::infrastructure::formats::{extension_of, FormatRegistry};
use crate::infrastructure::traits::BuildRunner;

/// Service for loading a request's files with rebuild-if-stale semantics.
pub struct ReaderService {
    runner: Arc<dyn BuildRunner>,
    formats: Arc<FormatRegistry>,
    declare: bool,
}

impl ReaderService {
    /// Create a reader. `declare` controls whether dependency declaration is
    /// performed at all; disabled readers only load.
    pub fn new(runner: Arc<dyn BuildRunner>, formats: Arc<FormatRegistry>, declare: bool) -> Self {
        Self {
            runner,
            formats,
            declare,
        }
    }

    /// Declare and load every file in `request`, returning a tree of the
    /// same shape with loaded values at the leaves. Extensionless files load
    /// as `None`.
    ///
    /// A nonzero builder status terminates the whole process with that
    /// status before any file is read: a stale dependency must halt the
    /// entire script, not just this call.
    pub fn read(&self, request: &Request) -> ApplicationResult<Tree<Option<Value>>> {
        self.read_with(request, false)
    }

    /// Declare dependencies only: every leaf of the result is `None`, but
    /// the shape is preserved.
    pub fn read_ignored(&self, request: &Request) -> ApplicationResult<Tree<Option<Value>>> {
        self.read_with(request, true)
    }

    fn read_with(&self, request: &Request, ignore: bool) -> ApplicationResult<Tree<Option<Value>>> {
        let (filenames, index) = linearize(request, 0);
        debug!(files = filenames.len(), ignore, "read request");

        if self.declare && !filenames.is_empty() {
            let status = self
                .runner
                .ensure_fresh(&filenames)
                .map_err(|e| ApplicationError::failed("invoke redo-ifchange", e))?;
            if status != 0 {
                builder_exit(status);
            }
        }

        let mut loaded = Vec::with_capacity(filenames.len());
        for filename in &filenames {
            let value = if ignore {
                None
            } else {
                self.load_one(Path::new(filename))?
            };
            loaded.push(value);
        }

        Ok(unlinearize(request, &index, &loaded)?)
    }

    fn load_one(&self, path: &Path) -> ApplicationResult<Option<Value>> {
        let Some(extension) = extension_of(path) else {
            // Extensionless dependencies carry no data; they are declared
            // for freshness only.
            return Ok(None);
        };
        let codec =
            self.formats
                .get(&extension)
                .ok_or_else(|| ApplicationError::UnsupportedFormat {
                    extension: extension.clone(),
                    known: self.formats.extensions().join(", "),
                })?;
        codec
            .load(path)
            .map(Some)
            .map_err(|e| ApplicationError::failed(format!("load {}", path.display()), e))
    }
}

/// Hard fail-fast: propagate the builder's exit status as the process exit
/// status. Deliberately not a recoverable error value.
fn builder_exit(status: i32) -> ! {
    error!(status, "redo-ifchange failed, aborting");
    process::exit(status)
}

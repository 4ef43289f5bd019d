//! Write orchestration service
//!
//! Serializes a value into a file, dispatching on extension. The `output`
//! path implements the redo convention: data goes into the temporary slot
//! while the format is chosen from the real target's name.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};
use crate::context::ScriptContext;
use crate::infrastructure::formats::{extension_of, FormatRegistry};

/// Service for writing values through format dispatch.
pub struct WriterService {
    formats: Arc<FormatRegistry>,
}

impl WriterService {
    pub fn new(formats: Arc<FormatRegistry>) -> Self {
        Self { formats }
    }

    /// Write `value` to `filename`, serialized per its extension.
    pub fn write(&self, value: &Value, filename: &Path) -> ApplicationResult<()> {
        self.write_as(value, filename, filename)
    }

    /// Write `value` to the context's temp slot, serialized per the target's
    /// extension. Redo renames the temp file onto the target afterwards.
    pub fn output(&self, value: &Value, ctx: &ScriptContext) -> ApplicationResult<()> {
        self.write_as(value, &ctx.temp, &ctx.target)
    }

    fn write_as(&self, value: &Value, dest: &Path, format_from: &Path) -> ApplicationResult<()> {
        let extension = extension_of(format_from).unwrap_or_default();
        let codec =
            self.formats
                .get(&extension)
                .ok_or_else(|| ApplicationError::UnsupportedFormat {
                    extension: extension.clone(),
                    known: self.formats.extensions().join(", "),
                })?;
        debug!(dest = %dest.display(), %extension, "write value");

        let file = File::create(dest)
            .map_err(|e| ApplicationError::failed(format!("create {}", dest.display()), e))?;
        let mut writer = BufWriter::new(file);
        codec
            .save(value, &mut writer)
            .map_err(|e| ApplicationError::failed(format!("write {}", dest.display()), e))?;
        writer
            .flush()
            .map_err(|e| ApplicationError::failed(format!("flush {}", dest.display()), e))
    }
}

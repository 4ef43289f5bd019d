//! redoscript: data-aware helper for redo do-scripts
//!
//! A do-script declares its input files to redo (`redo-ifchange`) and reads
//! them with format-appropriate serializers, then writes its result into the
//! temporary output slot redo provides. This crate handles both sides:
//! requests may be arbitrarily nested (single filename, lists, mappings) and
//! results come back in the same shape with each filename replaced by its
//! loaded content.
//!
//! Example do-script body:
//! ```no_run
//! use redoscript::{ifchange, output, Request, ScriptContext, Tree};
//!
//! let ctx = ScriptContext::from_env().expect("not invoked by redo");
//! let inputs = Request::from(vec![
//!     Request::from("config.yaml"),
//!     Request::from("data.csv"),
//! ]);
//! let loaded = ifchange(&ctx, &inputs).unwrap();
//! let Tree::Sequence(_items) = loaded else { unreachable!() };
//! // ... process the loaded values ...
//! # let result = serde_json::json!({});
//! output(&ctx, &result).unwrap();
//! ```

use std::sync::Arc;

use serde_json::Value;

pub mod application;
pub mod cli;
pub mod context;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::{ApplicationError, ApplicationResult, ReaderService, WriterService};
pub use context::ScriptContext;
pub use domain::{
    linearize, pack, unlinearize, unpack, unpack_join, DomainError, Index, Request, Snippets, Tree,
};
pub use infrastructure::{BuildRunner, FormatCodec, FormatRegistry, RedoRunner};

fn default_reader(declare: bool) -> ReaderService {
    ReaderService::new(
        Arc::new(RedoRunner),
        Arc::new(FormatRegistry::with_defaults()),
        declare,
    )
}

/// Load the files in `request` without declaring dependencies.
pub fn read_data(request: &Request) -> ApplicationResult<Tree<Option<Value>>> {
    default_reader(false).read(request)
}

/// Declare the files in `request` to redo (one batched `redo-ifchange`
/// call) and load their contents. Declaration is skipped when the context
/// disables it (`NO_REDO` or non-redo invocation).
pub fn ifchange(ctx: &ScriptContext, request: &Request) -> ApplicationResult<Tree<Option<Value>>> {
    default_reader(ctx.use_redo).read(request)
}

/// Declare the files in `request` without loading them; the result keeps
/// the request's shape with every leaf absent.
pub fn ifchange_ignore(
    ctx: &ScriptContext,
    request: &Request,
) -> ApplicationResult<Tree<Option<Value>>> {
    default_reader(ctx.use_redo).read_ignored(request)
}

/// Write `value` to `filename` using the serializer matching its extension.
pub fn write_data(value: &Value, filename: &std::path::Path) -> ApplicationResult<()> {
    WriterService::new(Arc::new(FormatRegistry::with_defaults())).write(value, filename)
}

/// Write `value` to the do-script's temporary output slot, in the format of
/// the real target.
pub fn output(ctx: &ScriptContext, value: &Value) -> ApplicationResult<()> {
    WriterService::new(Arc::new(FormatRegistry::with_defaults())).output(value, ctx)
}

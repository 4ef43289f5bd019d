//! Infrastructure layer: external collaborators behind traits
//!
//! The builder invocation and the per-format codecs live here, each behind a
//! trait so services can be tested with substitutes.

pub mod formats;
pub mod traits;

pub use formats::{extension_of, FormatCodec, FormatRegistry};
pub use traits::{BuildRunner, RecordingRunner, RedoRunner};

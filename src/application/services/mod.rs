//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (BuildRunner, FormatCodec)
//! but are themselves concrete structs, not traits.

mod reader;
mod writer;

pub use reader::ReaderService;
pub use writer::WriterService;

//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic and depends on the I/O boundary
//! traits from the infrastructure layer.

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use services::{ReaderService, WriterService};

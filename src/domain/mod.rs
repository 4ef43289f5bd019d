//! Domain layer: request trees and name-snippet algorithms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no builder).

pub mod error;
pub mod request;
pub mod snippets;

pub use error::{DomainError, DomainResult};
pub use request::{linearize, unlinearize, Index, Request, Tree};
pub use snippets::{pack, unpack, unpack_join, Snippets};

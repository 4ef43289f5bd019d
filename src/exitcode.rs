//! Standard exit codes (BSD sysexits.h compatible)
//!
//! Builder failures are not mapped here: a nonzero `redo-ifchange` status is
//! propagated verbatim as the process exit status.

/// Successful termination
pub const OK: i32 = 0;

/// Command line usage error
pub const USAGE: i32 = 64;

/// Data format error
pub const DATAERR: i32 = 65;

/// Cannot open input
pub const NOINPUT: i32 = 66;

/// Internal software error
pub const SOFTWARE: i32 = 70;

/// Input/output error
pub const IOERR: i32 = 74;

//! Filesystem persistence for the garage.
//!
//! The whole fleet is written as one JSON snapshot under a fixed file name;
//! the current selection lives in a separate session sidecar so that the
//! snapshot round-trip stays free of UI state.

mod garage_file;
mod session;

pub use garage_file::{Garage, StorageError};
pub use session::Session;

//! The log is a flat, order-preserving sequence of text lines backed by `logs.txt`.
//! The basic idea is:
//!  - An entry is one `"<timestamp> - <title> - <H:MM:SS>"` line, identified by exact text.
//!  - Every mutation immediately mirrors the sequence to the file, rewriting it in full
//!    for removals. Expected volumes are a personal log, so rewrites stay cheap.

pub mod entry;
pub mod log_store;

pub use entry::LogEntry;
pub use log_store::LogStore;

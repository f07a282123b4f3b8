//! Stopwatch time tracker for the terminal. Measures work in one-second ticks, records named
//! log entries into a plain-text file, and exports them as a markdown report grouped by project
//! and version.
//!

pub mod cli;
pub mod export;
pub mod session;
pub mod store;
pub mod timer;
pub mod utils;

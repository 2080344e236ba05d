//! Shared tracing setup for the workspace binaries.
//!
//! `RUST_LOG` selects what is emitted (default `info`), `RUST_LOG_FORMAT=json`
//! switches to one JSON object per event.

mod subscriber;

pub use subscriber::{LogFormat, init_tracing};

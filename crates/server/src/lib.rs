//! Soapbox HTTP server library.
//!
//! Exposed as a library so integration tests can build the router with mock
//! collaborators injected; the `soapbox` binary wires real ones in `main.rs`.

pub mod api;
pub mod metrics;
pub mod state;

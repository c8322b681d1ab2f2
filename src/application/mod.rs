//! Application layer containing the provider the host talks to.
//!
//! `MbWayProvider` is the entry point: capability checks, the pay-by-link
//! execution and the rendering hooks. The log display and route table are
//! the remaining pieces the host wires in when it loads the plugin.

pub mod log_display;
pub mod provider;
pub mod routes;

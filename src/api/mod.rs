//! HTTP surface: the analyze endpoint plus health probes.

pub mod routes;

pub use routes::{AppState, analyze_routes};

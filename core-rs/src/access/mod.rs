//! Access control
//!
//! - [`AccessController`]: per-page guard (Loading → Authorized/Unauthorized)
//! - [`RouteTable`]: role requirements and redirect targets per page
//! - [`Navigator`]: the redirect side effect

pub mod controller;
pub mod navigator;
pub mod routes;

pub use controller::{AccessCheck, AccessController, AccessDecision, AccessPhase};
pub use navigator::{Navigator, RecordingNavigator, TracingNavigator};
pub use routes::{RouteRule, RouteTable, DEFAULT_REDIRECT};

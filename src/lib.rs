//! devproxy — a local development server for frontend work.
//!
//! Serves the frontend build output from a directory and forwards a
//! configured subset of paths (e.g. everything under `/api`) to a separate
//! backend process, stripping the frontend-only routing prefix so the
//! backend sees clean URLs.
//!
//! The interesting logic lives in [`routing`]: an ordered, immutable set of
//! forwarding rules evaluated once per request. Everything else is the
//! hosting server around that decision.

// Core subsystems
pub mod config;
pub mod http;
pub mod routing;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::DevServerConfig;
pub use http::DevServer;
pub use lifecycle::Shutdown;
pub use routing::{ForwardDirective, RuleEngine};

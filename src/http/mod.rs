//! HTTP serving subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, per-request dispatch)
//!     → request.rs (attach request ID)
//!     → [routing engine decides: forward or local]
//!     hit  → outbound client (rewritten URI, optional Host rewrite)
//!     miss → static_files.rs (frontend assets, SPA fallback)
//!     → response.rs (gateway errors the server originates itself)
//! ```

pub mod request;
pub mod response;
pub mod server;
pub mod static_files;

pub use request::{RequestIdLayer, X_REQUEST_ID};
pub use server::DevServer;

//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Compile rules → Bind listener → Serve
//!
//! Shutdown:
//!     signals.rs: Ctrl-C / SIGTERM → Shutdown::trigger
//!     shutdown.rs: broadcast → server drains in-flight requests → exit
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, ShutdownListener};

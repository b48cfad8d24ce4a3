//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → DevServerConfig (validated, immutable)
//!     → rule set compiled once, shared by the server for the process lifetime
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; rules never change mid-session
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    DevServerConfig, ListenerConfig, ObservabilityConfig, RuleConfig, StaticFilesConfig,
    TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};

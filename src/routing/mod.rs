//! Routing subsystem: the request-forwarding decision engine.
//!
//! # Data Flow
//! ```text
//! Inbound request path
//!     → engine.rs (ordered rule scan)
//!     → matcher.rs (literal prefix test)
//!     → rewrite.rs (strip the configured literal)
//!     → Return: ForwardDirective or None (serve locally)
//!
//! Rule Compilation (at startup):
//!     RuleConfig[]
//!     → Validate targets and rewrite literals
//!     → Freeze as immutable RuleEngine
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always produces the same directive
//! - First match wins (configuration order)

pub mod engine;
pub mod matcher;
pub mod rewrite;

pub use engine::{ForwardDirective, ForwardRule, RuleEngine, RuleError};
pub use matcher::PathPrefixMatcher;
pub use rewrite::PrefixStrip;

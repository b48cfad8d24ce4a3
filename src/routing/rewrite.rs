//! Path rewriting applied to matched requests before forwarding.
//!
//! # Responsibilities
//! - Remove a known literal from the start of a matched path
//!
//! # Design Decisions
//! - The rewrite is an explicit prefix strip, not a compiled pattern: the
//!   only transformation the engine needs is "remove a literal from the
//!   front", and a literal strip cannot backtrack or fail
//! - Total over every path the owning rule matches: config validation
//!   guarantees the stripped literal is itself a prefix of the rule's
//!   match prefix
//! - A fully consumed path yields `""`, never `/`; how an empty request
//!   target is rendered is the transport's decision

/// Removes a literal prefix from the start of a path, once.
#[derive(Debug, Clone)]
pub struct PrefixStrip {
    literal: String,
}

impl PrefixStrip {
    /// Create a rewrite that strips `literal` from the front of a path.
    pub fn new(literal: impl Into<String>) -> Self {
        Self {
            literal: literal.into(),
        }
    }

    /// The literal this rewrite removes.
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// Apply the rewrite. Paths that do not carry the literal are returned
    /// unchanged, so the function is total over all inputs.
    pub fn apply(&self, path: &str) -> String {
        path.strip_prefix(&self.literal).unwrap_or(path).to_string()
    }
}

//! Forwarding decision engine.
//!
//! # Responsibilities
//! - Compile rule descriptors into an ordered, immutable rule set
//! - Find the first rule matching an inbound path
//! - Produce the forwarding directive (target origin + rewritten path)
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime (shared without locks)
//! - Evaluation in configuration order; first match wins
//! - Explicit `None` on no match; the caller owns the local fallback
//! - Pure function of (rules, path): no I/O, no clock, no randomness

use thiserror::Error;
use url::Url;

use crate::config::schema::RuleConfig;
use crate::routing::matcher::PathPrefixMatcher;
use crate::routing::rewrite::PrefixStrip;

/// A rule descriptor that cannot be compiled into a usable forwarding rule.
///
/// Surfaced at startup; the process refuses to start rather than silently
/// dropping the rule.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("rule {rule:?}: path_prefix {prefix:?} must start with '/'")]
    PrefixNotRooted { rule: String, prefix: String },

    #[error("rule {rule:?}: target {target:?} is not a valid URL: {source}")]
    InvalidTarget {
        rule: String,
        target: String,
        #[source]
        source: url::ParseError,
    },

    #[error("rule {rule:?}: target scheme {scheme:?} is not http or https")]
    UnsupportedScheme { rule: String, scheme: String },

    #[error("rule {rule:?}: target {target:?} has no host")]
    MissingHost { rule: String, target: String },

    #[error("rule {rule:?}: target {target:?} must be a bare origin (no path, query or fragment)")]
    TargetNotOrigin { rule: String, target: String },

    #[error("rule {rule:?}: strip_prefix {strip:?} is not a prefix of path_prefix {prefix:?}")]
    StripNotPrefix {
        rule: String,
        strip: String,
        prefix: String,
    },
}

/// A single compiled forwarding rule.
#[derive(Debug, Clone)]
pub struct ForwardRule {
    name: String,
    matcher: PathPrefixMatcher,
    target: Url,
    change_origin: bool,
    rewrite: Option<PrefixStrip>,
}

impl ForwardRule {
    /// Compile a rule descriptor.
    ///
    /// The strip literal must itself be a prefix of the match prefix; that
    /// is what makes the rewrite total over every path the rule admits.
    pub fn compile(cfg: &RuleConfig) -> Result<Self, RuleError> {
        if !cfg.path_prefix.starts_with('/') {
            return Err(RuleError::PrefixNotRooted {
                rule: cfg.name.clone(),
                prefix: cfg.path_prefix.clone(),
            });
        }

        let target = Url::parse(&cfg.target).map_err(|source| RuleError::InvalidTarget {
            rule: cfg.name.clone(),
            target: cfg.target.clone(),
            source,
        })?;

        if !matches!(target.scheme(), "http" | "https") {
            return Err(RuleError::UnsupportedScheme {
                rule: cfg.name.clone(),
                scheme: target.scheme().to_string(),
            });
        }
        if target.host_str().is_none() {
            return Err(RuleError::MissingHost {
                rule: cfg.name.clone(),
                target: cfg.target.clone(),
            });
        }
        if target.path() != "/" || target.query().is_some() || target.fragment().is_some() {
            return Err(RuleError::TargetNotOrigin {
                rule: cfg.name.clone(),
                target: cfg.target.clone(),
            });
        }

        if let Some(strip) = &cfg.strip_prefix {
            if !cfg.path_prefix.starts_with(strip.as_str()) {
                return Err(RuleError::StripNotPrefix {
                    rule: cfg.name.clone(),
                    strip: strip.clone(),
                    prefix: cfg.path_prefix.clone(),
                });
            }
        }

        Ok(Self {
            name: cfg.name.clone(),
            matcher: PathPrefixMatcher::new(&cfg.path_prefix),
            target,
            change_origin: cfg.change_origin,
            rewrite: cfg.strip_prefix.as_deref().map(PrefixStrip::new),
        })
    }

    /// Rule name, for logs and metrics.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Where and with what path a matched request should be forwarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardDirective<'r> {
    /// Destination origin (scheme + host + port).
    pub target: &'r Url,

    /// Path the backend should see. May be empty when the rewrite consumed
    /// the whole path, or a bare remainder without a leading slash; how to
    /// render either is the transport's decision.
    pub path: String,

    /// Overwrite the outbound `Host` header with the target authority.
    pub rewrite_host: bool,

    /// Name of the rule that matched.
    pub rule: &'r str,
}

impl ForwardDirective<'_> {
    /// `host[:port]` of the target, as used in the outbound URI and, when
    /// `rewrite_host` is set, in the outbound `Host` header.
    pub fn target_authority(&self) -> String {
        let host = self.target.host_str().unwrap_or_default();
        match self.target.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }
}

/// Ordered, immutable set of forwarding rules.
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    rules: Vec<ForwardRule>,
}

impl RuleEngine {
    /// Compile every rule descriptor, in order.
    ///
    /// Returns every compile error, not just the first.
    pub fn compile(rules: &[RuleConfig]) -> Result<Self, Vec<RuleError>> {
        let mut compiled = Vec::with_capacity(rules.len());
        let mut errors = Vec::new();

        for cfg in rules {
            match ForwardRule::compile(cfg) {
                Ok(rule) => compiled.push(rule),
                Err(e) => errors.push(e),
            }
        }

        if errors.is_empty() {
            Ok(Self { rules: compiled })
        } else {
            Err(errors)
        }
    }

    /// Find the forwarding directive for an inbound path.
    ///
    /// `path` is the path component only; the caller keeps the query string
    /// and passes it through untouched. Rules are evaluated in configured
    /// order and the first match wins. `None` means the request is not
    /// forwarded and the caller serves it locally.
    pub fn find(&self, path: &str) -> Option<ForwardDirective<'_>> {
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(path))
            .map(|rule| ForwardDirective {
                target: &rule.target,
                path: match &rule.rewrite {
                    Some(rewrite) => rewrite.apply(path),
                    None => path.to_string(),
                },
                rewrite_host: rule.change_origin,
                rule: &rule.name,
            })
    }

    /// Number of compiled rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when no rules are configured.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str, prefix: &str, target: &str, strip: Option<&str>) -> RuleConfig {
        RuleConfig {
            name: name.to_string(),
            path_prefix: prefix.to_string(),
            target: target.to_string(),
            change_origin: true,
            strip_prefix: strip.map(str::to_string),
        }
    }

    fn api_engine() -> RuleEngine {
        RuleEngine::compile(&[rule("api", "/api", "http://127.0.0.1:8000", Some("/api"))])
            .unwrap()
    }

    #[test]
    fn test_match_rewrites_path_and_keeps_target() {
        let engine = api_engine();
        let directive = engine.find("/api/users/42").unwrap();

        assert_eq!(directive.target.as_str(), "http://127.0.0.1:8000/");
        assert_eq!(directive.path, "/users/42");
        assert!(directive.rewrite_host);
        assert_eq!(directive.rule, "api");
        assert_eq!(directive.target_authority(), "127.0.0.1:8000");
    }

    #[test]
    fn test_no_match_is_none() {
        let engine = api_engine();
        assert!(engine.find("/static/logo.png").is_none());
        assert!(engine.find("/").is_none());
    }

    #[test]
    fn test_fully_consumed_path_stays_empty() {
        let engine = api_engine();
        let directive = engine.find("/api").unwrap();
        assert_eq!(directive.path, "");
    }

    #[test]
    fn test_literal_prefix_quirk() {
        // `/apiv2/ping` matches the `/api` prefix and rewrites to a bare
        // remainder.
        let engine = api_engine();
        let directive = engine.find("/apiv2/ping").unwrap();
        assert_eq!(directive.path, "v2/ping");
    }

    #[test]
    fn test_first_match_wins_over_more_specific_rule() {
        let engine = RuleEngine::compile(&[
            rule("api", "/api", "http://127.0.0.1:8000", Some("/api")),
            rule("api-v2", "/api/v2", "http://127.0.0.1:9000", Some("/api/v2")),
        ])
        .unwrap();

        let directive = engine.find("/api/v2/items").unwrap();
        assert_eq!(directive.rule, "api");
        assert_eq!(directive.path, "/v2/items");
        assert_eq!(directive.target_authority(), "127.0.0.1:8000");
    }

    #[test]
    fn test_no_rewrite_forwards_path_unchanged() {
        let engine =
            RuleEngine::compile(&[rule("api", "/api", "http://127.0.0.1:8000", None)]).unwrap();
        let directive = engine.find("/api/users").unwrap();
        assert_eq!(directive.path, "/api/users");
    }

    #[test]
    fn test_deterministic() {
        let engine = api_engine();
        assert_eq!(engine.find("/api/users/42"), engine.find("/api/users/42"));
        assert_eq!(engine.find("/nope"), engine.find("/nope"));
    }

    #[test]
    fn test_compile_is_repeatable() {
        let descriptors = [
            rule("api", "/api", "http://127.0.0.1:8000", Some("/api")),
            rule("ws", "/ws", "http://127.0.0.1:9000", None),
        ];
        let a = RuleEngine::compile(&descriptors).unwrap();
        let b = RuleEngine::compile(&descriptors).unwrap();

        for path in ["/api/users", "/ws/echo", "/other", "/api"] {
            assert_eq!(a.find(path), b.find(path));
        }
    }

    #[test]
    fn test_rejects_target_with_path() {
        let err = RuleEngine::compile(&[rule(
            "api",
            "/api",
            "http://127.0.0.1:8000/base",
            None,
        )])
        .unwrap_err();
        assert!(matches!(err.as_slice(), [RuleError::TargetNotOrigin { .. }]));
    }

    #[test]
    fn test_rejects_strip_that_is_not_a_prefix() {
        let err = RuleEngine::compile(&[rule(
            "api",
            "/api",
            "http://127.0.0.1:8000",
            Some("/v1"),
        )])
        .unwrap_err();
        assert!(matches!(err.as_slice(), [RuleError::StripNotPrefix { .. }]));
    }

    #[test]
    fn test_collects_all_errors() {
        let errs = RuleEngine::compile(&[
            rule("a", "api", "http://127.0.0.1:8000", None),
            rule("b", "/api", "ftp://127.0.0.1:8000", None),
        ])
        .unwrap_err();
        assert_eq!(errs.len(), 2);
    }
}

//! Compiled proxy rules.
//!
//! # Responsibilities
//! - Select the rule for a request path (first declared prefix wins)
//! - Build the upstream URI from target origin, target path and request path
//! - Apply the optional literal prefix rewrite
//!
//! # Design Decisions
//! - Rules are compiled once per config load; a reload builds a new table
//! - No path rewrite unless configured: `/api/x` reaches `<target>/api/x`

use axum::http::uri::{Authority, PathAndQuery, Scheme};
use axum::http::Uri;
use url::Url;

use crate::config::schema::{ProxyRuleConfig, RewriteConfig};
use crate::proxy::ProxyError;
use crate::routing::matcher::{PathMatcher, PathPrefixMatcher};

/// The forwarder speaks plain HTTP only; TLS upstreams are rejected up front.
pub const HTTP_ONLY: &str = "only http:// targets are supported, the dev proxy has no TLS client";

/// One compiled reverse proxy rule.
#[derive(Debug, Clone)]
pub struct ProxyRule {
    matcher: PathPrefixMatcher,
    authority: Authority,
    base_path: String,
    change_origin: bool,
    rewrite: Option<RewriteConfig>,
}

impl ProxyRule {
    pub fn compile(config: &ProxyRuleConfig) -> Result<Self, ProxyError> {
        let invalid = |reason: String| ProxyError::InvalidTarget {
            target: config.target.clone(),
            reason,
        };

        let url = Url::parse(&config.target).map_err(|e| invalid(e.to_string()))?;
        if url.scheme() != "http" {
            return Err(invalid(format!("{} (got {}://)", HTTP_ONLY, url.scheme())));
        }
        let host = url
            .host_str()
            .ok_or_else(|| invalid("missing host".to_string()))?;
        let authority = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        let authority = authority
            .parse::<Authority>()
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            matcher: PathPrefixMatcher::new(config.prefix.clone()),
            authority,
            base_path: url.path().trim_end_matches('/').to_string(),
            change_origin: config.change_origin,
            rewrite: config.rewrite.clone(),
        })
    }

    pub fn prefix(&self) -> &str {
        self.matcher.prefix()
    }

    pub fn matches(&self, path: &str) -> bool {
        self.matcher.matches(path)
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    pub fn change_origin(&self) -> bool {
        self.change_origin
    }

    /// Upstream URI for an incoming path-and-query.
    pub fn upstream_uri(&self, path_and_query: &str) -> Result<Uri, ProxyError> {
        let rewritten = match &self.rewrite {
            Some(rewrite) => match path_and_query.strip_prefix(rewrite.from.as_str()) {
                Some(rest) => format!("{}{}", rewrite.to, rest),
                None => path_and_query.to_string(),
            },
            None => path_and_query.to_string(),
        };
        let joined = match rewritten.as_str() {
            "" => format!("{}/", self.base_path),
            p if p.starts_with('/') => format!("{}{}", self.base_path, p),
            p => format!("{}/{}", self.base_path, p),
        };
        let path_and_query = joined
            .parse::<PathAndQuery>()
            .map_err(|e| ProxyError::InvalidUri(e.to_string()))?;

        Uri::builder()
            .scheme(Scheme::HTTP)
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
            .map_err(|e| ProxyError::InvalidUri(e.to_string()))
    }
}

/// Ordered set of proxy rules.
#[derive(Debug, Clone, Default)]
pub struct ProxyTable {
    rules: Vec<ProxyRule>,
}

impl ProxyTable {
    pub fn from_config(rules: &[ProxyRuleConfig]) -> Result<Self, ProxyError> {
        let rules = rules
            .iter()
            .map(ProxyRule::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// First rule whose prefix matches `path`.
    pub fn match_path(&self, path: &str) -> Option<&ProxyRule> {
        self.rules.iter().find(|rule| rule.matches(path))
    }

    pub fn rules(&self) -> &[ProxyRule] {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_rule() -> ProxyRule {
        ProxyRule::compile(&ProxyRuleConfig::default()).unwrap()
    }

    #[test]
    fn test_api_path_forwarded_unchanged() {
        let rule = default_rule();
        let uri = rule.upstream_uri("/api/auth/login").unwrap();
        assert_eq!(uri.to_string(), "http://localhost:8080/api/auth/login");
    }

    #[test]
    fn test_query_preserved() {
        let rule = default_rule();
        let uri = rule.upstream_uri("/api/history?page=2").unwrap();
        assert_eq!(uri.to_string(), "http://localhost:8080/api/history?page=2");
    }

    #[test]
    fn test_target_path_prefix() {
        let rule = ProxyRule::compile(&ProxyRuleConfig {
            target: "http://10.0.0.5/backend/".into(),
            ..ProxyRuleConfig::default()
        })
        .unwrap();
        assert_eq!(rule.authority().as_str(), "10.0.0.5");
        assert_eq!(
            rule.upstream_uri("/api/chat").unwrap().to_string(),
            "http://10.0.0.5/backend/api/chat"
        );
    }

    #[test]
    fn test_rewrite_strips_prefix() {
        let rule = ProxyRule::compile(&ProxyRuleConfig {
            rewrite: Some(RewriteConfig {
                from: "/api".into(),
                to: String::new(),
            }),
            ..ProxyRuleConfig::default()
        })
        .unwrap();
        assert_eq!(
            rule.upstream_uri("/api/auth/login").unwrap().to_string(),
            "http://localhost:8080/auth/login"
        );
        assert_eq!(rule.upstream_uri("/api").unwrap().to_string(), "http://localhost:8080/");
    }

    #[test]
    fn test_first_declared_rule_wins() {
        let table = ProxyTable::from_config(&[
            ProxyRuleConfig::default(),
            ProxyRuleConfig {
                prefix: "/api/auth".into(),
                target: "http://localhost:9000".into(),
                ..ProxyRuleConfig::default()
            },
        ])
        .unwrap();
        let rule = table.match_path("/api/auth/login").unwrap();
        assert_eq!(rule.prefix(), "/api");
        assert!(table.match_path("/chat").is_none());
    }

    #[test]
    fn test_invalid_target() {
        let err = ProxyRule::compile(&ProxyRuleConfig {
            target: "not a url".into(),
            ..ProxyRuleConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, ProxyError::InvalidTarget { .. }));
    }

    #[test]
    fn test_tls_target_rejected() {
        let err = ProxyRule::compile(&ProxyRuleConfig {
            target: "https://api.example.com".into(),
            ..ProxyRuleConfig::default()
        })
        .unwrap_err();
        match err {
            ProxyError::InvalidTarget { reason, .. } => assert!(reason.starts_with(HTTP_ONLY)),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

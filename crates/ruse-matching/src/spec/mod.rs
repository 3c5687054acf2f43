//! Request specifications: immutable AND-composition of field rules.
//!
//! A specification is assembled once through [`RequestSpecBuilder`],
//! compiled by `build()`, and from then on only read. Evaluation takes
//! shared references throughout, so one specification can serve any
//! number of concurrent matching calls.

mod builder;
pub(crate) mod rules;

pub use builder::{PatternInput, RequestSpecBuilder};

use tracing::trace;

use crate::matcher::Matcher;
use crate::request::RequestMessage;
use rules::{CookieRule, HeaderRule, MethodRule, ParamRule};

/// An immutable request specification.
///
/// Alternatives within one category OR; categories AND. An empty
/// specification matches every request.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub(crate) method: MethodRule,
    pub(crate) urls: Vec<Matcher>,
    pub(crate) paths: Vec<Matcher>,
    pub(crate) headers: Vec<HeaderRule>,
    pub(crate) cookies: Vec<CookieRule>,
    pub(crate) params: Vec<ParamRule>,
    pub(crate) body: Option<Matcher>,
}

impl RequestSpec {
    /// Start building a specification.
    pub fn builder() -> RequestSpecBuilder {
        RequestSpecBuilder::new()
    }

    /// Decide whether a request satisfies every configured category.
    ///
    /// Categories are checked cheapest first and evaluation stops at
    /// the first rejection. A rejection is local to this specification;
    /// the caller is free to try the next one.
    pub fn is_match(&self, request: &RequestMessage) -> bool {
        if !self.method.is_match(request.method()) {
            trace!(method = request.method(), "request rejected: method");
            return false;
        }

        if !self.urls.is_empty() && !self.urls.iter().any(|m| m.is_match(request.url())) {
            trace!(url = request.url(), "request rejected: url");
            return false;
        }

        if !self.paths.is_empty() && !self.paths.iter().any(|m| m.is_match(request.path())) {
            trace!(path = request.path(), "request rejected: path");
            return false;
        }

        for rule in &self.headers {
            if !rule.is_match(request) {
                trace!(header = %rule.name, "request rejected: header");
                return false;
            }
        }

        for rule in &self.cookies {
            if !rule.is_match(request) {
                trace!(cookie = %rule.name, "request rejected: cookie");
                return false;
            }
        }

        for rule in &self.params {
            if !rule.is_match(request.query_params()) {
                match rule {
                    ParamRule::Values { name, .. } => {
                        trace!(param = %name, "request rejected: query param");
                    }
                    ParamRule::Predicate(pred) => {
                        trace!(predicate = ?pred, "request rejected: query params predicate");
                    }
                }
                return false;
            }
        }

        if let Some(matcher) = &self.body {
            match request.body_text() {
                Some(body) => {
                    if !matcher.is_match(body) {
                        trace!("request rejected: body");
                        return false;
                    }
                }
                // Body matcher configured but no decodable body
                None => {
                    trace!("request rejected: body missing");
                    return false;
                }
            }
        }

        true
    }
}

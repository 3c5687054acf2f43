//! Per-category rules composed by a request specification.
//!
//! Alternatives inside one rule OR; the specification ANDs the rules.
//! A field the request does not carry never matches a rule that
//! constrains it.

use crate::matcher::{Matcher, ParamPredicate};
use crate::request::{ParamMap, RequestMessage};

/// Accepted HTTP verbs.
#[derive(Debug, Clone)]
pub enum MethodRule {
    /// No constraint; every verb matches.
    Any,
    /// One of the listed verbs. Stored uppercased, compared
    /// case-insensitively, never empty.
    OneOf(Vec<String>),
}

impl MethodRule {
    pub(crate) fn is_match(&self, method: &str) -> bool {
        match self {
            Self::Any => true,
            Self::OneOf(verbs) => verbs.iter().any(|verb| verb.eq_ignore_ascii_case(method)),
        }
    }
}

/// Alternatives for one header. The name is stored lowercased; lookup
/// through `HeaderMap` is case-insensitive anyway.
#[derive(Debug, Clone)]
pub struct HeaderRule {
    pub(crate) name: String,
    pub(crate) matchers: Vec<Matcher>,
}

impl HeaderRule {
    /// Matches when any value carried under the name satisfies any of
    /// the matchers. A missing header never matches.
    pub(crate) fn is_match(&self, request: &RequestMessage) -> bool {
        request
            .headers()
            .get_all(self.name.as_str())
            .iter()
            .filter_map(|value| value.to_str().ok())
            .any(|value| self.matchers.iter().any(|matcher| matcher.is_match(value)))
    }
}

/// Alternatives for one cookie. Cookie names are case-sensitive.
#[derive(Debug, Clone)]
pub struct CookieRule {
    pub(crate) name: String,
    pub(crate) matchers: Vec<Matcher>,
}

impl CookieRule {
    pub(crate) fn is_match(&self, request: &RequestMessage) -> bool {
        match request.cookie(&self.name) {
            Some(value) => self.matchers.iter().any(|matcher| matcher.is_match(value)),
            None => false,
        }
    }
}

/// One query-parameter constraint.
#[derive(Debug, Clone)]
pub enum ParamRule {
    /// Accepted value sets for one parameter, OR'd across sets.
    ///
    /// A set matches when every accepted value appears among the actual
    /// values for the name; extra actual values are allowed. The empty
    /// set checks key presence alone. `sets` is never empty.
    Values { name: String, sets: Vec<Vec<String>> },
    /// Predicate over the full decoded parameter map.
    Predicate(ParamPredicate),
}

impl ParamRule {
    pub(crate) fn is_match(&self, params: &ParamMap) -> bool {
        match self {
            Self::Values { name, sets } => match params.get(name) {
                Some(actual) => sets
                    .iter()
                    .any(|set| set.iter().all(|accepted| actual.contains(accepted))),
                None => false,
            },
            Self::Predicate(pred) => pred.eval(params),
        }
    }
}

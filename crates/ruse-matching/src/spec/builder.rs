//! Fluent builder for request specifications.
//!
//! Accumulation is infallible; every recorded pattern compiles inside
//! [`build`](RequestSpecBuilder::build), so configuration mistakes
//! surface before a specification ever sees traffic.

use tracing::debug;

use crate::error::BuildError;
use crate::matcher::{Matcher, ParamPredicate};
use crate::request::ParamMap;
use crate::spec::rules::{CookieRule, HeaderRule, MethodRule, ParamRule};
use crate::spec::RequestSpec;

/// A pattern accepted by the builder: a plain string compiled at build
/// time, or a ready-made [`Matcher`] used as-is.
#[derive(Debug, Clone)]
pub enum PatternInput {
    /// Plain string. For string-valued fields, `*` or `?` anywhere in
    /// the pattern selects a wildcard matcher; anything else compares
    /// literally.
    Auto(String),
    /// Pre-built matcher.
    Ready(Matcher),
}

impl From<&str> for PatternInput {
    fn from(pattern: &str) -> Self {
        Self::Auto(pattern.to_string())
    }
}

impl From<String> for PatternInput {
    fn from(pattern: String) -> Self {
        Self::Auto(pattern)
    }
}

impl From<Matcher> for PatternInput {
    fn from(matcher: Matcher) -> Self {
        Self::Ready(matcher)
    }
}

impl PatternInput {
    /// Compile for string-valued fields: `*`/`?` pick a wildcard,
    /// anything else an exact comparison.
    fn compile_auto(self) -> Result<Matcher, BuildError> {
        match self {
            Self::Auto(pattern) => {
                if pattern.contains(['*', '?']) {
                    Matcher::wildcard(pattern)
                } else {
                    Ok(Matcher::exact(pattern))
                }
            }
            Self::Ready(matcher) => Ok(matcher),
        }
    }

    /// Compile for body content: plain strings always compare
    /// literally, since bodies routinely contain `*` and `?`.
    fn compile_literal(self) -> Result<Matcher, BuildError> {
        match self {
            Self::Auto(pattern) => Ok(Matcher::exact(pattern)),
            Self::Ready(matcher) => Ok(matcher),
        }
    }
}

#[derive(Debug)]
enum ParamEntry {
    Values { name: String, set: Vec<String> },
    Predicate(ParamPredicate),
}

/// Builder for [`RequestSpec`].
///
/// Every call appends one constraint. Within a category the
/// alternatives OR; the built specification ANDs the categories.
#[derive(Debug, Default)]
pub struct RequestSpecBuilder {
    methods: Vec<String>,
    urls: Vec<PatternInput>,
    paths: Vec<PatternInput>,
    headers: Vec<(String, PatternInput)>,
    cookies: Vec<(String, PatternInput)>,
    params: Vec<ParamEntry>,
    body: Option<PatternInput>,
}

impl RequestSpecBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept one more relative URL alternative (path-and-query form).
    pub fn url(mut self, pattern: impl Into<PatternInput>) -> Self {
        self.urls.push(pattern.into());
        self
    }

    /// Accept one more path alternative.
    pub fn path(mut self, pattern: impl Into<PatternInput>) -> Self {
        self.paths.push(pattern.into());
        self
    }

    /// Accept one more HTTP verb.
    pub fn method(mut self, verb: impl Into<String>) -> Self {
        self.methods.push(verb.into());
        self
    }

    /// Accept several HTTP verbs.
    pub fn methods<I, S>(mut self, verbs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods.extend(verbs.into_iter().map(Into::into));
        self
    }

    /// Drop any verb constraint recorded so far.
    pub fn any_method(mut self) -> Self {
        self.methods.clear();
        self
    }

    pub fn get(self) -> Self {
        self.method("GET")
    }

    pub fn post(self) -> Self {
        self.method("POST")
    }

    pub fn put(self) -> Self {
        self.method("PUT")
    }

    pub fn delete(self) -> Self {
        self.method("DELETE")
    }

    pub fn head(self) -> Self {
        self.method("HEAD")
    }

    pub fn patch(self) -> Self {
        self.method("PATCH")
    }

    pub fn options(self) -> Self {
        self.method("OPTIONS")
    }

    pub fn trace(self) -> Self {
        self.method("TRACE")
    }

    /// Require a header. Repeated calls for one name accumulate OR
    /// alternatives; distinct names are independent constraints.
    pub fn header(mut self, name: impl Into<String>, pattern: impl Into<PatternInput>) -> Self {
        self.headers.push((name.into(), pattern.into()));
        self
    }

    /// Require a cookie. Same accumulation rules as [`header`](Self::header).
    pub fn cookie(mut self, name: impl Into<String>, pattern: impl Into<PatternInput>) -> Self {
        self.cookies.push((name.into(), pattern.into()));
        self
    }

    /// Require the body to match. Plain strings compare literally.
    /// A later call replaces an earlier one.
    pub fn body(mut self, pattern: impl Into<PatternInput>) -> Self {
        self.body = Some(pattern.into());
        self
    }

    /// Require a query parameter to be present, with any value.
    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.params.push(ParamEntry::Values {
            name: name.into(),
            set: Vec::new(),
        });
        self
    }

    /// Require a query parameter to carry every listed value; extra
    /// values on the request are allowed. Repeated calls for one name
    /// accumulate OR alternatives.
    pub fn param_values<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params.push(ParamEntry::Values {
            name: name.into(),
            set: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Require the full decoded parameter map to satisfy a predicate.
    /// The closure must be pure; it may run any number of times from
    /// any thread.
    pub fn params_matching(
        mut self,
        func: impl Fn(&ParamMap) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.params.push(ParamEntry::Predicate(ParamPredicate::new(func)));
        self
    }

    /// Compile every recorded pattern into an immutable [`RequestSpec`].
    ///
    /// The first invalid pattern aborts the build.
    pub fn build(self) -> Result<RequestSpec, BuildError> {
        let method = if self.methods.is_empty() {
            MethodRule::Any
        } else {
            MethodRule::OneOf(
                self.methods
                    .iter()
                    .map(|verb| verb.to_ascii_uppercase())
                    .collect(),
            )
        };

        let urls = self
            .urls
            .into_iter()
            .map(PatternInput::compile_auto)
            .collect::<Result<Vec<_>, _>>()?;
        let paths = self
            .paths
            .into_iter()
            .map(PatternInput::compile_auto)
            .collect::<Result<Vec<_>, _>>()?;

        // Group alternatives by name, preserving first-seen order so
        // evaluation stays deterministic.
        let mut headers: Vec<HeaderRule> = Vec::new();
        for (name, pattern) in self.headers {
            let name = name.to_lowercase();
            let matcher = pattern.compile_auto()?;
            match headers.iter().position(|rule| rule.name == name) {
                Some(idx) => headers[idx].matchers.push(matcher),
                None => headers.push(HeaderRule {
                    name,
                    matchers: vec![matcher],
                }),
            }
        }

        let mut cookies: Vec<CookieRule> = Vec::new();
        for (name, pattern) in self.cookies {
            let matcher = pattern.compile_auto()?;
            match cookies.iter().position(|rule| rule.name == name) {
                Some(idx) => cookies[idx].matchers.push(matcher),
                None => cookies.push(CookieRule {
                    name,
                    matchers: vec![matcher],
                }),
            }
        }

        let mut params: Vec<ParamRule> = Vec::new();
        for entry in self.params {
            match entry {
                ParamEntry::Values { name, set } => {
                    let existing = params.iter().position(|rule| {
                        matches!(rule, ParamRule::Values { name: n, .. } if n == &name)
                    });
                    match existing {
                        Some(idx) => {
                            if let ParamRule::Values { sets, .. } = &mut params[idx] {
                                sets.push(set);
                            }
                        }
                        None => params.push(ParamRule::Values {
                            name,
                            sets: vec![set],
                        }),
                    }
                }
                ParamEntry::Predicate(pred) => params.push(ParamRule::Predicate(pred)),
            }
        }

        let body = self.body.map(PatternInput::compile_literal).transpose()?;

        debug!(
            urls = urls.len(),
            paths = paths.len(),
            headers = headers.len(),
            cookies = cookies.len(),
            params = params.len(),
            has_body = body.is_some(),
            "compiled request specification"
        );

        Ok(RequestSpec {
            method,
            urls,
            paths,
            headers,
            cookies,
            params,
            body,
        })
    }
}

//! Polymorphic value matchers.
//!
//! A [`Matcher`] is one comparison strategy evaluated against a single
//! candidate string:
//!
//! - `Exact` - literal comparison, case-sensitive unless configured
//! - `Wildcard` - glob comparison (`*`, `?`), case-insensitive unless configured
//! - `Regex` - unanchored regular-expression search
//! - `Xpath` - XPath query over the candidate parsed as XML
//! - `JsonPath` - JSONPath query over the candidate parsed as JSON
//! - `Predicate` - caller-supplied closure
//!
//! All pattern compilation happens in the constructors, which return
//! [`BuildError`] for unparseable patterns. Evaluation is total: a
//! malformed candidate never raises, it just does not match.

mod predicate;
mod structural;

pub use predicate::{ParamPredicate, ValuePredicate};

use std::sync::Arc;

use globset::{GlobBuilder, GlobMatcher};
use regex::Regex;
use serde_json_path::JsonPath;

use crate::error::BuildError;

/// A literal pattern with pre-computed lowercase for case-insensitive
/// comparison, so the pattern is folded once instead of per request.
#[derive(Debug, Clone, PartialEq)]
pub struct FoldedPattern {
    /// Original pattern (for case-sensitive comparison)
    pub value: String,
    /// Pre-computed lowercase (for case-insensitive comparison)
    pub lower: String,
}

impl FoldedPattern {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let lower = value.to_lowercase();
        Self { value, lower }
    }

    /// Compare against a candidate, folding the candidate when the
    /// comparison ignores case.
    #[inline]
    pub fn equals(&self, candidate: &str, ignore_case: bool) -> bool {
        if ignore_case {
            candidate.to_lowercase() == self.lower
        } else {
            candidate == self.value
        }
    }
}

/// A single comparison strategy over one candidate value.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Literal comparison against the whole candidate.
    Exact {
        pattern: FoldedPattern,
        ignore_case: bool,
    },
    /// Glob comparison against the whole candidate. `*` matches any
    /// sequence including the empty one, `?` exactly one character.
    Wildcard { pattern: String, glob: GlobMatcher },
    /// Unanchored regular-expression search: the pattern matches when
    /// it is found anywhere in the candidate. Anchors apply only where
    /// written.
    Regex(Arc<Regex>),
    /// XPath query evaluated against the candidate parsed as XML.
    Xpath { query: String },
    /// JSONPath query evaluated against the candidate parsed as JSON.
    JsonPath { query: Arc<JsonPath> },
    /// Caller-supplied predicate over the raw candidate.
    Predicate(ValuePredicate),
}

impl Matcher {
    /// Literal case-sensitive comparison.
    pub fn exact(pattern: impl Into<String>) -> Self {
        Self::Exact {
            pattern: FoldedPattern::new(pattern),
            ignore_case: false,
        }
    }

    /// Literal comparison ignoring case.
    pub fn exact_ignore_case(pattern: impl Into<String>) -> Self {
        Self::Exact {
            pattern: FoldedPattern::new(pattern),
            ignore_case: true,
        }
    }

    /// Glob comparison ignoring case.
    pub fn wildcard(pattern: impl Into<String>) -> Result<Self, BuildError> {
        Self::glob(pattern.into(), true)
    }

    /// Glob comparison respecting case.
    pub fn wildcard_case_sensitive(pattern: impl Into<String>) -> Result<Self, BuildError> {
        Self::glob(pattern.into(), false)
    }

    fn glob(pattern: String, ignore_case: bool) -> Result<Self, BuildError> {
        let glob = GlobBuilder::new(&pattern)
            .case_insensitive(ignore_case)
            // `*` crosses path separators; candidates are opaque strings
            .literal_separator(false)
            .build()
            .map_err(|source| BuildError::Wildcard {
                pattern: pattern.clone(),
                source,
            })?
            .compile_matcher();
        Ok(Self::Wildcard { pattern, glob })
    }

    /// Regular-expression search. Case sensitivity lives in the pattern
    /// itself (`(?i)` to ignore case).
    pub fn regex(pattern: impl AsRef<str>) -> Result<Self, BuildError> {
        let pattern = pattern.as_ref();
        let regex = Regex::new(pattern).map_err(|source| BuildError::Regex {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self::Regex(Arc::new(regex)))
    }

    /// XPath query over XML candidates.
    ///
    /// The query is validated here; evaluation re-parses it per call,
    /// keeping the matcher freely shareable across threads.
    pub fn xpath(query: impl Into<String>) -> Result<Self, BuildError> {
        let query = query.into();
        match sxd_xpath::Factory::new().build(&query) {
            Ok(Some(_)) => Ok(Self::Xpath { query }),
            Ok(None) => Err(BuildError::Xpath {
                query,
                reason: "empty query".to_string(),
            }),
            Err(e) => Err(BuildError::Xpath {
                reason: e.to_string(),
                query,
            }),
        }
    }

    /// JSONPath (RFC 9535) query over JSON candidates.
    pub fn json_path(query: impl AsRef<str>) -> Result<Self, BuildError> {
        let query = query.as_ref();
        let compiled = JsonPath::parse(query).map_err(|source| BuildError::JsonPath {
            query: query.to_string(),
            source,
        })?;
        Ok(Self::JsonPath {
            query: Arc::new(compiled),
        })
    }

    /// Arbitrary predicate over the candidate. The closure must be
    /// pure; it may run any number of times from any thread.
    pub fn predicate(func: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self::Predicate(ValuePredicate::new(func))
    }

    /// Evaluate this matcher against a candidate value.
    ///
    /// Total: never panics or errors. A candidate the structural
    /// variants cannot parse does not match.
    pub fn is_match(&self, candidate: &str) -> bool {
        match self {
            Self::Exact {
                pattern,
                ignore_case,
            } => pattern.equals(candidate, *ignore_case),
            Self::Wildcard { glob, .. } => glob.is_match(candidate),
            Self::Regex(regex) => regex.is_match(candidate),
            Self::Xpath { query } => structural::xml_query_matches(candidate, query),
            Self::JsonPath { query } => structural::json_query_matches(candidate, query),
            Self::Predicate(pred) => pred.eval(candidate),
        }
    }
}

impl From<ValuePredicate> for Matcher {
    fn from(pred: ValuePredicate) -> Self {
        Self::Predicate(pred)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_exact_case_sensitive_by_default() {
        let matcher = Matcher::exact("Hello world!");

        assert!(matcher.is_match("Hello world!"));
        assert!(!matcher.is_match("hello world!"));
        assert!(!matcher.is_match("Hello world! "));
        assert!(!matcher.is_match("xxx"));
    }

    #[test]
    fn test_exact_ignore_case() {
        let matcher = Matcher::exact_ignore_case("abc");

        assert!(matcher.is_match("abc"));
        assert!(matcher.is_match("ABC"));
        assert!(matcher.is_match("aBc"));
        assert!(!matcher.is_match("abcd"));
    }

    #[test]
    fn test_wildcard_ignores_case_by_default() {
        let matcher = Matcher::wildcard("tata*").unwrap();

        assert!(matcher.is_match("tata"));
        assert!(matcher.is_match("tataaa"));
        assert!(matcher.is_match("TaTa"));
        assert!(matcher.is_match("TATABANANA"));
        assert!(!matcher.is_match("xtata"));
    }

    #[test]
    fn test_wildcard_case_sensitive() {
        let matcher = Matcher::wildcard_case_sensitive("tata*").unwrap();

        assert!(matcher.is_match("tatabanana"));
        assert!(!matcher.is_match("TaTa"));
    }

    #[test]
    fn test_wildcard_question_mark() {
        let matcher = Matcher::wildcard("h?llo").unwrap();

        assert!(matcher.is_match("hello"));
        assert!(matcher.is_match("hallo"));
        assert!(!matcher.is_match("hllo"));
        assert!(!matcher.is_match("heello"));
    }

    #[test]
    fn test_wildcard_star_crosses_slashes() {
        let matcher = Matcher::wildcard("/api/*").unwrap();

        assert!(matcher.is_match("/api/v1/users"));
        assert!(matcher.is_match("/api/"));
        assert!(!matcher.is_match("/other"));
    }

    #[test]
    fn test_regex_is_a_search_not_a_full_match() {
        let matcher = Matcher::regex("^/foo").unwrap();

        assert!(matcher.is_match("/foo"));
        assert!(matcher.is_match("/foo/bar"));
        assert!(!matcher.is_match("/bar/foo"));

        let unanchored = Matcher::regex("foo").unwrap();
        assert!(unanchored.is_match("/bar/foo/baz"));
    }

    #[test]
    fn test_regex_inline_case_flag() {
        let matcher = Matcher::regex("(?i)^h.*o$").unwrap();

        assert!(matcher.is_match("HellO"));
        assert!(matcher.is_match("hello"));
    }

    #[test]
    fn test_xpath_matcher() {
        let matcher = Matcher::xpath("/todo-list[count(todo-item) = 3]").unwrap();

        let three = "<todo-list><todo-item/><todo-item/><todo-item/></todo-list>";
        let two = "<todo-list><todo-item/><todo-item/></todo-list>";

        assert!(matcher.is_match(three));
        assert!(!matcher.is_match(two));
        assert!(!matcher.is_match("not xml"));
    }

    #[test]
    fn test_json_path_matcher() {
        let matcher = Matcher::json_path("$.things[?(@.name == 'RequiredThing')]").unwrap();

        assert!(matcher.is_match(r#"{ "things": [ { "name": "RequiredThing" } ] }"#));
        assert!(!matcher.is_match(r#"{ "things": [ { "name": "Other" } ] }"#));
        assert!(!matcher.is_match("not json"));
    }

    #[test]
    fn test_predicate_matcher() {
        let matcher = Matcher::predicate(|v| v.starts_with("/admin"));

        assert!(matcher.is_match("/admin/users"));
        assert!(!matcher.is_match("/public"));
    }

    #[test]
    fn test_invalid_patterns_fail_at_construction() {
        assert!(Matcher::regex("[unclosed").is_err());
        assert!(Matcher::wildcard("[!").is_err());
        assert!(Matcher::xpath("count(").is_err());
        assert!(Matcher::json_path("$[").is_err());
    }

    #[test]
    fn test_folded_pattern_precomputes_lowercase() {
        let folded = FoldedPattern::new("Hello World");

        assert_eq!(folded.value, "Hello World");
        assert_eq!(folded.lower, "hello world");
    }

    #[test]
    fn test_matchers_are_cheaply_cloneable() {
        let matcher = Matcher::regex("^/foo").unwrap();
        let cloned = matcher.clone();

        assert!(matcher.is_match("/foo/bar"));
        assert!(cloned.is_match("/foo/bar"));
    }

    proptest! {
        #[test]
        fn prop_exact_matches_its_own_pattern(s in ".*") {
            prop_assert!(Matcher::exact(s.clone()).is_match(&s));
        }

        #[test]
        fn prop_exact_ignore_case_matches_uppercased_ascii(s in "[a-z0-9 ]*") {
            let matcher = Matcher::exact_ignore_case(s.clone());
            prop_assert!(matcher.is_match(&s.to_uppercase()));
        }

        #[test]
        fn prop_wildcard_star_matches_any_ascii(s in "[ -~]*") {
            let matcher = Matcher::wildcard("*").unwrap();
            prop_assert!(matcher.is_match(&s));
        }

        #[test]
        fn prop_wildcard_question_consumes_exactly_one_char(s in "[a-z]{2,8}") {
            let matcher = Matcher::wildcard("?").unwrap();
            prop_assert!(!matcher.is_match(&s));
            prop_assert!(matcher.is_match(&s[..1]));
        }
    }
}

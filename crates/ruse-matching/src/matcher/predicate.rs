//! Caller-supplied predicate matchers.
//!
//! Predicates are the escape hatch of the matching algebra: an
//! arbitrary closure evaluated against a candidate value or against the
//! whole decoded query-parameter map. The engine may call a predicate
//! any number of times from any thread, so closures must be pure: same
//! input, same answer, no side effects.

use std::fmt;
use std::sync::Arc;

use crate::request::ParamMap;

/// A predicate over a single candidate string.
#[derive(Clone)]
pub struct ValuePredicate {
    label: Option<String>,
    func: Arc<dyn Fn(&str) -> bool + Send + Sync>,
}

impl ValuePredicate {
    /// Wrap a closure as a predicate.
    pub fn new(func: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self {
            label: None,
            func: Arc::new(func),
        }
    }

    /// Wrap a closure with a label shown in diagnostics instead of an
    /// opaque closure.
    pub fn named(
        label: impl Into<String>,
        func: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: Some(label.into()),
            func: Arc::new(func),
        }
    }

    #[inline]
    pub(crate) fn eval(&self, candidate: &str) -> bool {
        (self.func)(candidate)
    }
}

impl fmt::Debug for ValuePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValuePredicate")
            .field("label", &self.label.as_deref().unwrap_or("<closure>"))
            .finish()
    }
}

/// A predicate over the full decoded query-parameter map.
#[derive(Clone)]
pub struct ParamPredicate {
    label: Option<String>,
    func: Arc<dyn Fn(&ParamMap) -> bool + Send + Sync>,
}

impl ParamPredicate {
    /// Wrap a closure as a predicate.
    pub fn new(func: impl Fn(&ParamMap) -> bool + Send + Sync + 'static) -> Self {
        Self {
            label: None,
            func: Arc::new(func),
        }
    }

    /// Wrap a closure with a label shown in diagnostics.
    pub fn named(
        label: impl Into<String>,
        func: impl Fn(&ParamMap) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: Some(label.into()),
            func: Arc::new(func),
        }
    }

    #[inline]
    pub(crate) fn eval(&self, params: &ParamMap) -> bool {
        (self.func)(params)
    }
}

impl fmt::Debug for ParamPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamPredicate")
            .field("label", &self.label.as_deref().unwrap_or("<closure>"))
            .finish()
    }
}

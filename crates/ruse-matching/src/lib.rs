//! Polymorphic HTTP request matching for service virtualization.
//!
//! This crate decides whether a parsed inbound request satisfies a
//! declaratively built specification: literal strings, wildcards,
//! regular expressions, XPath and JSONPath queries over the body, and
//! arbitrary predicates, composed per field with OR inside a category
//! and AND across categories.
//!
//! Specifications are built once, compiled eagerly, and then evaluated
//! concurrently without locks. All pattern errors surface at build
//! time; evaluation never fails, it only answers yes or no.
//!
//! ```
//! use ruse_matching::{Matcher, RequestMessage, RequestSpec};
//!
//! # fn main() -> Result<(), ruse_matching::BuildError> {
//! let spec = RequestSpec::builder()
//!     .put()
//!     .path("/users/*")
//!     .header("Content-Type", "application/json")
//!     .body(Matcher::json_path("$.user.id")?)
//!     .build()?;
//!
//! let request = RequestMessage::new("http://localhost/users/42".parse().unwrap(), "PUT")
//!     .with_header(
//!         http::header::CONTENT_TYPE,
//!         http::HeaderValue::from_static("application/json"),
//!     )
//!     .with_body(r#"{"user": {"id": 42}}"#);
//!
//! assert!(spec.is_match(&request));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod matcher;
pub mod request;
pub mod spec;

pub use error::BuildError;
pub use matcher::{FoldedPattern, Matcher, ParamPredicate, ValuePredicate};
pub use request::{ParamMap, RequestMessage};
pub use spec::{PatternInput, RequestSpec, RequestSpecBuilder};

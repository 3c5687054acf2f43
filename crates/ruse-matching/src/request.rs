//! Immutable request values handed to the matching engine.

use std::collections::HashMap;

use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::Uri;

/// Decoded query parameters: name to values, in arrival order per name.
pub type ParamMap = HashMap<String, Vec<String>>;

/// A parsed inbound HTTP request, frozen for matching.
///
/// The transport layer builds one of these per request; every
/// registered specification then reads it concurrently. All derived
/// views (relative url, path, decoded query parameters, body text) are
/// computed once at construction.
#[derive(Debug, Clone)]
pub struct RequestMessage {
    uri: Uri,
    url: String,
    path: String,
    method: String,
    headers: HeaderMap,
    cookies: HashMap<String, String>,
    query_params: ParamMap,
    body: Option<Bytes>,
    body_text: Option<String>,
}

impl RequestMessage {
    /// Create a request from an absolute URI and a method.
    pub fn new(uri: Uri, method: impl Into<String>) -> Self {
        let url = uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| uri.path().to_string());
        let path = uri.path().to_string();
        let query_params = parse_query(uri.query());

        Self {
            uri,
            url,
            path,
            method: method.into(),
            headers: HeaderMap::new(),
            cookies: HashMap::new(),
            query_params,
            body: None,
            body_text: None,
        }
    }

    /// Attach a raw body. The UTF-8 view is derived when possible;
    /// a body that does not decode leaves `body_text` unset.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        self.body_text = std::str::from_utf8(&body).ok().map(str::to_string);
        self.body = Some(body);
        self
    }

    /// Replace all headers.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Append one header value. Repeated names accumulate.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Replace all cookies.
    pub fn with_cookies<I, K, V>(mut self, cookies: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.cookies = cookies
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        self
    }

    /// Add one cookie.
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Path-and-query portion of the URI (`/foo?bar=1`).
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Path portion of the URI (`/foo`).
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// All UTF-8 values of a header, in insertion order. Name lookup is
    /// case-insensitive; values that are not UTF-8 are skipped.
    pub fn header_values(&self, name: &str) -> impl Iterator<Item = &str> + '_ {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|value| value.to_str().ok())
    }

    /// Cookie names are looked up case-sensitively.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn cookies(&self) -> &HashMap<String, String> {
        &self.cookies
    }

    pub fn query_params(&self) -> &ParamMap {
        &self.query_params
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Body decoded as UTF-8, when present and decodable.
    pub fn body_text(&self) -> Option<&str> {
        self.body_text.as_deref()
    }
}

/// Decode a raw query string into a multimap.
///
/// `+` folds to space before percent-decoding. Repeated keys
/// accumulate in order; a key without `=` carries one empty value.
fn parse_query(query: Option<&str>) -> ParamMap {
    let mut params = ParamMap::new();
    let Some(query) = query else {
        return params;
    };

    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = match pair.split_once('=') {
            Some((key, value)) => (decode_component(key), decode_component(value)),
            None => (decode_component(pair), String::new()),
        };
        params.entry(key).or_default().push(value);
    }
    params
}

fn decode_component(raw: &str) -> String {
    let unplussed = raw.replace('+', " ");
    match urlencoding::decode(&unplussed) {
        Ok(decoded) => decoded.into_owned(),
        // Not valid percent-encoding; keep the raw text
        Err(_) => unplussed,
    }
}

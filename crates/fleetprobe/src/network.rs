//! Network route matching and intercepted responses.
//!
//! Only observation is supported: a route is registered with the driver, the
//! real request goes through, and the response is captured for assertions.

use crate::result::{FleetError, FleetResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP methods for request matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET request
    Get,
    /// POST request
    Post,
    /// PUT request
    Put,
    /// DELETE request
    Delete,
    /// PATCH request
    Patch,
    /// Any method
    #[serde(rename = "*")]
    Any,
}

impl HttpMethod {
    /// Parse from string; unknown methods match anything
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "DELETE" => Self::Delete,
            "PATCH" => Self::Patch,
            _ => Self::Any,
        }
    }

    /// Convert to string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Any => "*",
        }
    }

    /// Check if this method matches another
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        *self == Self::Any || *other == Self::Any || *self == *other
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A URL regex compiled once, compared and serialized by its source
#[derive(Debug, Clone)]
pub struct UrlRegex(regex::Regex);

impl UrlRegex {
    /// Compile `pattern`; an invalid pattern is a configuration error
    pub fn new(pattern: &str) -> FleetResult<Self> {
        regex::Regex::new(pattern)
            .map(Self)
            .map_err(|e| FleetError::config(format!("invalid URL regex {pattern:?}: {e}")))
    }

    /// The source pattern
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Check a URL against the compiled pattern
    #[must_use]
    pub fn is_match(&self, url: &str) -> bool {
        self.0.is_match(url)
    }
}

impl PartialEq for UrlRegex {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for UrlRegex {}

impl Serialize for UrlRegex {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for UrlRegex {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pattern = String::deserialize(deserializer)?;
        Self::new(&pattern).map_err(serde::de::Error::custom)
    }
}

/// Pattern for matching request URLs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UrlPattern {
    /// Exact URL match
    Exact(String),
    /// Prefix match
    Prefix(String),
    /// Contains substring
    Contains(String),
    /// Regex match
    Regex(UrlRegex),
    /// Glob pattern (e.g., "**/api/login")
    Glob(String),
    /// Match any URL
    Any,
}

impl UrlPattern {
    /// Regex pattern, compiled and checked here
    pub fn regex(pattern: &str) -> FleetResult<Self> {
        Ok(Self::Regex(UrlRegex::new(pattern)?))
    }

    /// Check if a URL matches this pattern
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        match self {
            Self::Exact(pattern) => url == pattern,
            Self::Prefix(pattern) => url.starts_with(pattern),
            Self::Contains(pattern) => url.contains(pattern),
            Self::Regex(re) => re.is_match(url),
            Self::Glob(pattern) => Self::glob_matches(pattern, url),
            Self::Any => true,
        }
    }

    /// `*` matches any run of characters (slashes included); query strings are
    /// ignored and the whole path must match.
    fn glob_matches(pattern: &str, url: &str) -> bool {
        let url = url.split('?').next().unwrap_or(url).as_bytes();
        let pattern = pattern.as_bytes();

        let (mut p, mut u) = (0, 0);
        // Last `*` seen and the URL position it currently absorbs up to
        let mut backtrack: Option<(usize, usize)> = None;
        while u < url.len() {
            if p < pattern.len() && pattern[p] == b'*' {
                backtrack = Some((p, u));
                p += 1;
            } else if p < pattern.len() && pattern[p] == url[u] {
                p += 1;
                u += 1;
            } else if let Some((star, absorbed)) = backtrack {
                p = star + 1;
                u = absorbed + 1;
                backtrack = Some((star, u));
            } else {
                return false;
            }
        }
        pattern[p..].iter().all(|&b| b == b'*')
    }
}

impl fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(p) | Self::Prefix(p) | Self::Contains(p) | Self::Glob(p) => f.write_str(p),
            Self::Regex(re) => f.write_str(re.as_str()),
            Self::Any => f.write_str("*"),
        }
    }
}

/// A method + URL pattern pair to observe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// HTTP method to match
    pub method: HttpMethod,
    /// URL pattern to match
    pub pattern: UrlPattern,
}

impl Route {
    /// Create a new route
    #[must_use]
    pub const fn new(method: HttpMethod, pattern: UrlPattern) -> Self {
        Self { method, pattern }
    }

    /// POST route with a glob pattern
    #[must_use]
    pub fn post(glob: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, UrlPattern::Glob(glob.into()))
    }

    /// GET route with a glob pattern
    #[must_use]
    pub fn get(glob: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, UrlPattern::Glob(glob.into()))
    }

    /// Check if this route matches a request
    #[must_use]
    pub fn matches(&self, url: &str, method: &HttpMethod) -> bool {
        self.method.matches(method) && self.pattern.matches(url)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.pattern)
    }
}

/// A response captured for an intercepted route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterceptedResponse {
    /// Request URL
    pub url: String,
    /// Request method
    pub method: HttpMethod,
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: Vec<u8>,
}

impl InterceptedResponse {
    /// Create a response with an empty body
    #[must_use]
    pub fn new(url: impl Into<String>, method: HttpMethod, status: u16) -> Self {
        Self {
            url: url.into(),
            method,
            status,
            body: Vec::new(),
        }
    }

    /// Set a JSON body
    #[must_use]
    pub fn with_json(mut self, body: &serde_json::Value) -> Self {
        self.body = body.to_string().into_bytes();
        self
    }

    /// Get body as string
    #[must_use]
    pub fn body_string(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Parse body as JSON
    pub fn body_json(&self) -> FleetResult<serde_json::Value> {
        if self.body.is_empty() {
            return Err(FleetError::assertion(format!(
                "response from {} has an empty body",
                self.url
            )));
        }
        Ok(serde_json::from_slice(&self.body)?)
    }
}

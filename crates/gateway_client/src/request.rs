//! Request construction.

use serde::{Deserialize, Serialize};

/// HTTP methods the gateway protocol uses.
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    /// Retrieval; `params` become query parameters.
    Get,
    /// Creation; `params` become the JSON body.
    Post,
}

/// One outgoing request. Built per call via [`RequestBuilder`], consumed by
/// the executor, never retained.
#[derive(Debug)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Absolute request URL.
    pub url: String,
    /// Extra headers beyond what the executor adds itself.
    pub headers: Vec<(String, String)>,
    /// Query map for GET, JSON body for POST.
    pub params: serde_json::Map<String, serde_json::Value>,
}

/// Builder for [`Request`].
#[derive(Debug)]
pub struct RequestBuilder {
    method: Method,
    url: String,
    headers: Vec<(String, String)>,
    params: serde_json::Map<String, serde_json::Value>,
}

impl RequestBuilder {
    /// Creates a builder with an empty GET request.
    pub fn new() -> Self {
        Self {
            method: Method::Get,
            url: String::with_capacity(128),
            headers: Vec::new(),
            params: serde_json::Map::new(),
        }
    }

    /// Sets the request method.
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the request URL.
    pub fn url(mut self, url: &str) -> Self {
        self.url = url.into();
        self
    }

    /// Appends one header.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Replaces the parameter map wholesale.
    pub fn params(mut self, params: serde_json::Map<String, serde_json::Value>) -> Self {
        self.params = params;
        self
    }

    /// Builds the request.
    pub fn build(self) -> Request {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            params: self.params,
        }
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

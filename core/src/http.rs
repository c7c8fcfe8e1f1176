//! HTTP request and response types passed through the hook pipeline.
//!
//! # Design
//! `HttpRequest` is the caller-facing description of a call: the URL may be
//! relative to the client's base URL and query parameters are kept separate
//! so request hooks can inspect or rewrite them. Only after the request hooks
//! have run does the client resolve it into a `WireRequest`, which is what a
//! `Transport` actually sends.
//!
//! All fields use owned types (`String`, `Vec`) so values can be moved into
//! hooks and across threads without lifetime concerns.

use serde::Serialize;
use url::Url;

use crate::error::ClientError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Canonical upper-case verb string.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-call options that never touch shared client state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Whether this call shows the loading indicator. `None` inherits the
    /// client default.
    pub show_loading: Option<bool>,
}

/// A request described as plain data.
///
/// `url` is either absolute or relative to the client's base URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub params: Vec<(String, String)>,
    pub body: Option<String>,
    pub options: RequestOptions,
}

impl HttpRequest {
    /// A `GET` request for `url`; the verb helpers on the client override the method.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Set a header, replacing any existing value under the same
    /// case-insensitive name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Raw body. No content type is implied.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `payload` as the JSON body and mark the content type.
    pub fn json<T: Serialize + ?Sized>(mut self, payload: &T) -> Result<Self, ClientError> {
        let body = serde_json::to_string(payload)
            .map_err(|e| ClientError::Serialization(e.to_string()))?;
        self.set_header("content-type", "application/json");
        self.body = Some(body);
        Ok(self)
    }

    pub fn show_loading(mut self, show: bool) -> Self {
        self.options.show_loading = Some(show);
        self
    }

    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(slot) => slot.1 = value,
            None => self.headers.push((name, value)),
        }
    }

    /// Case-insensitive header lookup.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// A fully resolved request, ready for a `Transport`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_request_defaults_to_get_without_body() {
        let req = HttpRequest::new("/home/hotSuggests");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "/home/hotSuggests");
        assert!(req.headers.is_empty());
        assert!(req.params.is_empty());
        assert!(req.body.is_none());
        assert_eq!(req.options.show_loading, None);
    }

    #[test]
    fn set_header_replaces_case_insensitively() {
        let req = HttpRequest::new("/")
            .header("Authorization", "Bearer a")
            .header("authorization", "Bearer b");
        assert_eq!(req.headers.len(), 1);
        assert_eq!(req.header_value("AUTHORIZATION"), Some("Bearer b"));
    }

    #[test]
    fn json_body_sets_content_type() {
        let req = HttpRequest::new("/login")
            .json(&serde_json::json!({ "username": "coder" }))
            .unwrap();
        assert_eq!(req.header_value("Content-Type"), Some("application/json"));
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["username"], "coder");
    }

    #[test]
    fn params_keep_insertion_order() {
        let req = HttpRequest::new("/home/houselist").param("page", 2).param("size", 10);
        assert_eq!(
            req.params,
            vec![
                ("page".to_string(), "2".to_string()),
                ("size".to_string(), "10".to_string())
            ]
        );
    }

    #[test]
    fn verb_strings_are_upper_case() {
        assert_eq!(HttpMethod::Get.as_str(), "GET");
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
        assert_eq!(HttpMethod::Delete.as_str(), "DELETE");
    }

    #[test]
    fn response_success_range() {
        let mut resp = HttpResponse {
            status: 204,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: String::new(),
        };
        assert!(resp.is_success());
        assert_eq!(resp.header_value("content-type"), Some("application/json"));
        resp.status = 302;
        assert!(!resp.is_success());
    }
}

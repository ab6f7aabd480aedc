// HTTP request and response types

use crate::Extensions;
use crate::form::{FORM_MULTIPART, FORM_URLENCODED, MultipartParser, encode_form, parse_form_map};
use serde::Serialize;
use std::collections::HashMap;

/// HTTP request wrapper
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
    pub query_params: HashMap<String, String>,
    /// Values attached by middleware for downstream handlers.
    pub extensions: Extensions,
}

impl HttpRequest {
    /// Create a request. A query string on `path` is split off into
    /// [`query_params`](Self::query_params).
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        let path = path.into();
        let (path, query_params) = match path.split_once('?') {
            Some((path, query)) => (
                path.to_string(),
                serde_urlencoded::from_str::<Vec<(String, String)>>(query)
                    .map(|pairs| pairs.into_iter().collect())
                    .unwrap_or_default(),
            ),
            None => (path, HashMap::new()),
        };

        Self {
            method: method.into(),
            path,
            headers: HashMap::new(),
            body: Vec::new(),
            query_params,
            extensions: Extensions::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Set an URL-encoded form body and the matching `Content-Type`.
    pub fn with_form<K: AsRef<str>, V: AsRef<str>>(
        mut self,
        fields: &[(K, V)],
    ) -> Result<Self, crate::Error> {
        self.body = encode_form(fields)?;
        self.headers
            .insert("Content-Type".to_string(), FORM_URLENCODED.to_string());
        Ok(self)
    }

    /// Get a header value by name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Get a query parameter by name
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(String::as_str)
    }

    /// Media type of the body, without parameters.
    pub fn media_type(&self) -> Option<&str> {
        self.header("Content-Type")
            .and_then(|value| value.split(';').next())
            .map(str::trim)
    }

    /// Whether the body is declared as an URL-encoded or multipart form.
    pub fn is_form(&self) -> bool {
        self.media_type().is_some_and(|media_type| {
            media_type.eq_ignore_ascii_case(FORM_URLENCODED)
                || media_type.eq_ignore_ascii_case(FORM_MULTIPART)
        })
    }

    /// Decode the text fields of a form body.
    ///
    /// Returns `Ok(None)` when the body is not a form.
    pub fn form_fields(&self) -> Result<Option<HashMap<String, String>>, crate::Error> {
        let Some(media_type) = self.media_type() else {
            return Ok(None);
        };

        if media_type.eq_ignore_ascii_case(FORM_URLENCODED) {
            parse_form_map(&self.body).map(Some)
        } else if media_type.eq_ignore_ascii_case(FORM_MULTIPART) {
            let content_type = self.header("Content-Type").unwrap_or_default();
            let parser = MultipartParser::from_content_type(content_type)?;
            Ok(Some(MultipartParser::to_map(parser.parse(&self.body)?)))
        } else {
            Ok(None)
        }
    }

    /// Get a text field from an URL-encoded or multipart form body.
    ///
    /// Returns `None` when the body is not a form, cannot be decoded, or
    /// lacks the field.
    pub fn form_value(&self, name: &str) -> Option<String> {
        self.form_fields()
            .ok()
            .flatten()
            .and_then(|mut fields| fields.remove(name))
    }
}

/// HTTP response wrapper
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    pub fn ok() -> Self {
        Self::new(200)
    }

    pub fn forbidden() -> Self {
        Self::new(403)
    }

    /// Plain-text response with status 200.
    pub fn text(body: impl Into<String>) -> Self {
        Self::ok()
            .with_header(
                "Content-Type".to_string(),
                "text/plain; charset=utf-8".to_string(),
            )
            .with_body(body.into().into_bytes())
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn with_json<T: Serialize>(mut self, value: &T) -> Result<Self, crate::Error> {
        self.body =
            serde_json::to_vec(value).map_err(|e| crate::Error::Serialization(e.to_string()))?;
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        Ok(self)
    }

    pub fn with_header(mut self, key: String, value: String) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// Body as UTF-8, lossily decoded.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

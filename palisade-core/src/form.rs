//! Form body decoding: URL-encoded and `multipart/form-data`

use crate::Error;
use std::collections::HashMap;

/// Media type of URL-encoded form bodies.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Media type of multipart form bodies.
pub const FORM_MULTIPART: &str = "multipart/form-data";

/// Parse URL-encoded form data into a HashMap.
///
/// When a field repeats, the first occurrence wins.
pub fn parse_form_map(body: &[u8]) -> Result<HashMap<String, String>, Error> {
    let form_data: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
        .map_err(|e| Error::BadRequest(format!("Failed to parse form data: {}", e)))?;

    let mut map = HashMap::with_capacity(form_data.len());
    for (key, value) in form_data {
        map.entry(key).or_insert(value);
    }
    Ok(map)
}

/// Encode pairs as an URL-encoded form body.
pub fn encode_form<K: AsRef<str>, V: AsRef<str>>(pairs: &[(K, V)]) -> Result<Vec<u8>, Error> {
    let pairs: Vec<(&str, &str)> = pairs
        .iter()
        .map(|(key, value)| (key.as_ref(), value.as_ref()))
        .collect();

    serde_urlencoded::to_string(pairs)
        .map(String::into_bytes)
        .map_err(|e| Error::Serialization(format!("Failed to encode form data: {}", e)))
}

/// A single part of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    /// Text content; `None` for file uploads.
    pub value: Option<String>,
    pub filename: Option<String>,
}

/// Multipart form data parser
pub struct MultipartParser {
    boundary: String,
}

impl MultipartParser {
    /// Create a parser from a `Content-Type` header value.
    ///
    /// Example: `multipart/form-data; boundary=----WebKitFormBoundary7MA4YWxkTrZu0gW`
    pub fn from_content_type(content_type: &str) -> Result<Self, Error> {
        let boundary = content_type
            .split(';')
            .find_map(|part| {
                let (key, value) = part.trim().split_once('=')?;
                key.trim()
                    .eq_ignore_ascii_case("boundary")
                    .then(|| value.trim().trim_matches('"').to_string())
            })
            .filter(|boundary| !boundary.is_empty())
            .ok_or_else(|| Error::BadRequest("Missing boundary in Content-Type".to_string()))?;

        Ok(Self { boundary })
    }

    /// Parse multipart form data
    pub fn parse(&self, body: &[u8]) -> Result<Vec<FormField>, Error> {
        let marker = format!("--{}", self.boundary);
        let body = String::from_utf8_lossy(body);

        let mut fields = Vec::new();
        for part in body.split(marker.as_str()).skip(1) {
            // The closing delimiter is the marker followed by `--`.
            if part.starts_with("--") {
                break;
            }
            if part.trim().is_empty() {
                continue;
            }
            fields.push(Self::parse_part(part)?);
        }

        Ok(fields)
    }

    fn parse_part(part: &str) -> Result<FormField, Error> {
        let part = part
            .strip_prefix("\r\n")
            .or_else(|| part.strip_prefix('\n'))
            .unwrap_or(part);

        let (head, content) = part
            .split_once("\r\n\r\n")
            .or_else(|| part.split_once("\n\n"))
            .ok_or_else(|| Error::BadRequest("Malformed multipart part".to_string()))?;

        // The line break before the next delimiter belongs to the delimiter.
        let content = content
            .strip_suffix("\r\n")
            .or_else(|| content.strip_suffix('\n'))
            .unwrap_or(content);

        let mut name = None;
        let mut filename = None;
        for line in head.lines() {
            let Some((header, value)) = line.split_once(':') else {
                continue;
            };
            if !header.trim().eq_ignore_ascii_case("Content-Disposition") {
                continue;
            }
            for attr in value.split(';') {
                match attr.trim().split_once('=') {
                    Some((key, value)) if key.trim().eq_ignore_ascii_case("name") => {
                        name = Some(value.trim().trim_matches('"').to_string());
                    }
                    Some((key, value)) if key.trim().eq_ignore_ascii_case("filename") => {
                        filename = Some(value.trim().trim_matches('"').to_string());
                    }
                    _ => {}
                }
            }
        }

        let name = name.ok_or_else(|| Error::BadRequest("Missing field name".to_string()))?;
        let value = filename.is_none().then(|| content.to_string());

        Ok(FormField {
            name,
            value,
            filename,
        })
    }

    /// Collect the text fields. When a field repeats, the first occurrence wins.
    pub fn to_map(fields: Vec<FormField>) -> HashMap<String, String> {
        let mut map = HashMap::with_capacity(fields.len());
        for field in fields {
            if let Some(value) = field.value {
                map.entry(field.name).or_insert(value);
            }
        }
        map
    }
}

//! Core request and response types.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Method`] | The HTTP methods the facade exposes |
//! | [`Headers`] | Insertion-ordered, case-insensitive header map |
//! | [`QueryParams`] | Insertion-ordered query parameters |
//! | [`RequestBody`] | A body that is either passed through or JSON-encoded |
//! | [`RequestDescriptor`] | Everything the executor needs for one call |
//! | [`ResponseEnvelope`] | Decoded data plus the status code |

use crate::error::{Result, SimFetchError};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl Method {
    /// Upper-case method name as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => http::Method::GET,
            Method::Post => http::Method::POST,
            Method::Patch => http::Method::PATCH,
            Method::Delete => http::Method::DELETE,
        }
    }
}

/// Insertion-ordered header map.
///
/// Header names compare ASCII case-insensitively, so `content-type` and
/// `Content-Type` address the same entry. The spelling of the first insert
/// is kept; later inserts only replace the value.
///
/// # Examples
///
/// ```
/// use simfetch::Headers;
///
/// let mut headers = Headers::new();
/// headers.insert("Accept", "application/json");
/// headers.insert("accept", "text/plain");
///
/// assert_eq!(headers.len(), 1);
/// assert_eq!(headers.get("ACCEPT"), Some("text/plain"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Create an empty header map.
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    /// Insert or replace a header, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(idx) => Some(std::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Remove a header. Absent names are a no-op.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.position(name).map(|idx| self.entries.remove(idx).1)
    }

    /// Look up a header value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|idx| self.entries[idx].1.as_str())
    }

    /// Whether a header is present.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of headers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.insert(k, v);
        }
        headers
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Headers {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl Serialize for Headers {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Headers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct HeadersVisitor;

        impl<'de> Visitor<'de> for HeadersVisitor {
            type Value = Headers;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of header names to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Headers, A::Error> {
                let mut headers = Headers::new();
                while let Some((k, v)) = access.next_entry::<String, String>()? {
                    headers.insert(k, v);
                }
                Ok(headers)
            }
        }

        deserializer.deserialize_map(HeadersVisitor)
    }
}

/// Insertion-ordered query parameters.
///
/// A plain key to value mapping: inserting an existing key replaces its value
/// in place, so the last write wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, String)>,
}

impl QueryParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    /// Look up a parameter.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for QueryParams {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// A request body.
///
/// Text bodies are sent unchanged; JSON bodies are encoded by the executor
/// right before the network call.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Sent as-is
    Text(String),
    /// Encoded to JSON text before sending
    Json(serde_json::Value),
}

impl RequestBody {
    /// Build a body from any serializable value.
    ///
    /// Values that serialize to a JSON string become [`RequestBody::Text`],
    /// JSON `null` yields `None` (no body at all), and everything else is
    /// kept as [`RequestBody::Json`].
    ///
    /// # Errors
    ///
    /// Returns [`SimFetchError::Encode`] if the value's `Serialize`
    /// implementation fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use simfetch::RequestBody;
    /// use serde_json::json;
    ///
    /// assert_eq!(
    ///     RequestBody::from_serialize("raw").unwrap(),
    ///     Some(RequestBody::Text("raw".to_string()))
    /// );
    /// assert_eq!(RequestBody::from_serialize(&()).unwrap(), None);
    /// assert_eq!(
    ///     RequestBody::from_serialize(&json!({"id": "1"})).unwrap(),
    ///     Some(RequestBody::Json(json!({"id": "1"})))
    /// );
    /// ```
    pub fn from_serialize<B: Serialize + ?Sized>(body: &B) -> Result<Option<Self>> {
        let value = serde_json::to_value(body).map_err(|e| SimFetchError::Encode(e.to_string()))?;
        Ok(match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(text) => Some(RequestBody::Text(text)),
            other => Some(RequestBody::Json(other)),
        })
    }

    /// Serialize the body to the text sent on the wire.
    pub fn encode(self) -> Result<String> {
        match self {
            RequestBody::Text(text) => Ok(text),
            RequestBody::Json(value) => {
                serde_json::to_string(&value).map_err(|e| SimFetchError::Encode(e.to_string()))
            }
        }
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        RequestBody::Text(text)
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        RequestBody::Text(text.to_string())
    }
}

impl From<serde_json::Value> for RequestBody {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(text) => RequestBody::Text(text),
            other => RequestBody::Json(other),
        }
    }
}

/// A single request as handed to the executor.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// HTTP method
    pub method: Method,
    /// Fully expanded URL; also the in-flight key
    pub url: String,
    /// Optional body
    pub body: Option<RequestBody>,
    /// Headers, before the JSON content type default is applied
    pub headers: Headers,
    /// Whether the call joins duplicate detection and cancellation
    pub participate: bool,
}

impl RequestDescriptor {
    /// Create a descriptor with no body, no headers and participation on.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
            headers: Headers::new(),
            participate: true,
        }
    }

    /// Set the body.
    pub fn with_body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the headers.
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    /// Opt in or out of duplicate detection and cancellation.
    pub fn with_participation(mut self, participate: bool) -> Self {
        self.participate = participate;
        self
    }
}

/// Successful response: decoded data plus the status code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope<T> {
    /// Decoded response body
    pub data: T,
    /// HTTP status code
    pub status: u16,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_headers_case_insensitive_replace() {
        let mut headers = Headers::from([("Content-Type", "text/plain")]);
        let previous = headers.insert("content-type", "application/json");
        assert_eq!(previous.as_deref(), Some("text/plain"));
        assert_eq!(headers.len(), 1);
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec![("Content-Type", "application/json")]
        );
    }

    #[test]
    fn test_headers_remove_absent() {
        let mut headers = Headers::from([("Accept", "application/json")]);
        assert_eq!(headers.remove("Authorization"), None);
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_headers_serde_keeps_order() {
        let headers = Headers::from([("B", "2"), ("A", "1")]);
        let text = serde_json::to_string(&headers).unwrap();
        assert_eq!(text, r#"{"B":"2","A":"1"}"#);
        let back: Headers = serde_json::from_str(&text).unwrap();
        assert_eq!(back, headers);
    }

    #[test]
    fn test_query_params_last_write_wins() {
        let mut params = QueryParams::new();
        params.insert("id", "1").insert("page", "2").insert("id", "3");
        assert_eq!(params.iter().collect::<Vec<_>>(), vec![("id", "3"), ("page", "2")]);
    }

    #[test]
    fn test_body_string_passes_through() {
        let body = RequestBody::from_serialize("already encoded").unwrap().unwrap();
        assert_eq!(body.encode().unwrap(), "already encoded");
    }

    #[test]
    fn test_body_json_is_encoded() {
        let body = RequestBody::from(json!({"id": "2", "stock": 3}));
        assert_eq!(body.encode().unwrap(), r#"{"id":"2","stock":3}"#);
    }

    #[test]
    fn test_method_conversion() {
        assert_eq!(http::Method::from(Method::Patch), http::Method::PATCH);
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }
}

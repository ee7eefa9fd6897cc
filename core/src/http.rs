//! HTTP exchange types.
//!
//! # Design
//! Requests and responses are plain data. `EntityClient` builds an
//! `HttpRequest`, hands it to a `Transport`, and parses the returned
//! `HttpResponse`; the two halves stay pure so they can be exercised
//! without a network.
//!
//! Header names are compared case-insensitively, as HTTP requires.

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `path` is the absolute URL: the client's base endpoint joined with the
/// relative path (`""` for the collection, the decimal index for an item).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First value of the header `name`, if present.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub reason: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Classification of a response by status code and body presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    SuccessWithBody,
    SuccessNoBody,
    Failure { status: u16, reason: String },
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Declared media type: the `Content-Type` value without parameters.
    pub fn media_type(&self) -> Option<&str> {
        self.header("content-type")
            .map(|value| value.split(';').next().unwrap_or_default().trim())
    }

    /// True when the declared media type contains `/xml`.
    ///
    /// Suffix types such as `application/atom+xml` do not match.
    pub fn is_xml(&self) -> bool {
        self.media_type().is_some_and(|media| media.contains("/xml"))
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn outcome(&self) -> Outcome {
        if !self.is_success() {
            Outcome::Failure {
                status: self.status,
                reason: self.reason.clone(),
            }
        } else if self.body.is_empty() {
            Outcome::SuccessNoBody
        } else {
            Outcome::SuccessWithBody
        }
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

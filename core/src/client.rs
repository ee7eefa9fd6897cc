//! Request builder, response parser and transport driver for the values API.
//!
//! # Design
//! `EntityClient` holds a normalized `base_url` and a `Transport`, and no
//! other state. Each operation is split into a pure `build_*` method that
//! produces an `HttpRequest` and a pure `parse_*` method that consumes an
//! `HttpResponse`; the operation itself (`list_all`, `get_by_index`, ...)
//! sends the built request through the transport and parses the reply.
//!
//! Every request carries `Accept: application/xml` and
//! `Accept-Charset: utf-8`; requests with a body also declare
//! `Content-Type: application/xml; charset=utf-8`.
//!
//! A 2xx response whose media type is not XML parses as an empty result
//! (no entities, or the empty string) rather than an error. Services that
//! ignore `Accept` and answer JSON therefore look empty. That behavior is
//! kept for compatibility and logged at `warn`.

use tracing::{debug, warn};

use crate::codec;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Outcome};
use crate::transport::{Transport, UreqTransport};
use crate::types::{Entity, Index};

pub const ACCEPT: &str = "application/xml";
pub const ACCEPT_CHARSET: &str = "utf-8";
pub const CONTENT_TYPE: &str = "application/xml; charset=utf-8";

/// Client for a collection of anonymous text entities addressed by index.
///
/// Every operation performs exactly one round trip and returns a single
/// final result. Nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct EntityClient<T = UreqTransport> {
    base_url: String,
    transport: T,
}

impl EntityClient<UreqTransport> {
    /// Client over a fresh `ureq` agent configured from `config`.
    pub fn connect(config: &ClientConfig) -> Self {
        Self::with_transport(&config.base_url, UreqTransport::from_config(config))
    }
}

impl<T> EntityClient<T> {
    /// `base_url` is normalized to end in exactly one `/`, so the
    /// collection lives at the base itself and items at `{base}{index}`.
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            base_url: format!("{}/", base_url.trim_end_matches('/')),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn build_list_all(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "", None)
    }

    pub fn build_get_by_index(&self, index: Index) -> HttpRequest {
        self.request(HttpMethod::Get, &index.to_string(), None)
    }

    /// The empty string is sent as-is; rejecting it is the caller's call.
    pub fn build_create(&self, value: &str) -> Result<HttpRequest, ClientError> {
        let body = encode_body(value)?;
        Ok(self.request(HttpMethod::Post, "", Some(body)))
    }

    pub fn build_replace(&self, index: Index, value: &str) -> Result<HttpRequest, ClientError> {
        let body = encode_body(value)?;
        Ok(self.request(HttpMethod::Put, &index.to_string(), Some(body)))
    }

    pub fn build_delete(&self, index: Index) -> HttpRequest {
        self.request(HttpMethod::Delete, &index.to_string(), None)
    }

    pub fn parse_list_all(&self, response: HttpResponse) -> Result<Vec<Entity>, ClientError> {
        check_status(&response)?;
        if !response.is_xml() {
            warn_not_xml(&response);
            return Ok(Vec::new());
        }
        codec::decode_string_list(&response.body)
    }

    pub fn parse_get_by_index(&self, response: HttpResponse) -> Result<Entity, ClientError> {
        check_status(&response)?;
        if !response.is_xml() {
            warn_not_xml(&response);
            return Ok(Entity::new());
        }
        codec::decode_string(&response.body)
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<(), ClientError> {
        check_status(&response)
    }

    pub fn parse_replace(&self, response: HttpResponse) -> Result<(), ClientError> {
        check_status(&response)
    }

    /// Any body on a successful delete is ignored, never decoded.
    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ClientError> {
        check_status(&response)
    }

    fn request(&self, method: HttpMethod, relative: &str, body: Option<String>) -> HttpRequest {
        let mut headers = vec![
            ("Accept".to_string(), ACCEPT.to_string()),
            ("Accept-Charset".to_string(), ACCEPT_CHARSET.to_string()),
        ];
        if body.is_some() {
            headers.push(("Content-Type".to_string(), CONTENT_TYPE.to_string()));
        }
        HttpRequest {
            method,
            path: format!("{}{relative}", self.base_url),
            headers,
            body,
        }
    }
}

impl<T: Transport> EntityClient<T> {
    /// Fetch the whole collection in server order.
    pub fn list_all(&self) -> Result<Vec<Entity>, ClientError> {
        let response = self.exchange(&self.build_list_all())?;
        self.parse_list_all(response)
    }

    pub fn get_by_index(&self, index: Index) -> Result<Entity, ClientError> {
        let response = self.exchange(&self.build_get_by_index(index))?;
        self.parse_get_by_index(response)
    }

    /// Append `value` to the collection.
    pub fn create(&self, value: &str) -> Result<(), ClientError> {
        let response = self.exchange(&self.build_create(value)?)?;
        self.parse_create(response)
    }

    /// Overwrite the entity currently at `index`.
    pub fn replace(&self, index: Index, value: &str) -> Result<(), ClientError> {
        let response = self.exchange(&self.build_replace(index, value)?)?;
        self.parse_replace(response)
    }

    /// Remove the entity at `index`. Later entities shift down by one.
    pub fn delete(&self, index: Index) -> Result<(), ClientError> {
        let response = self.exchange(&self.build_delete(index))?;
        self.parse_delete(response)
    }

    fn exchange(&self, request: &HttpRequest) -> Result<HttpResponse, ClientError> {
        debug!(method = request.method.as_str(), url = %request.path, "sending request");
        let response = self.transport.send(request)?;
        debug!(
            method = request.method.as_str(),
            url = %request.path,
            status = response.status,
            "received response"
        );
        Ok(response)
    }
}

/// Encode `value` and re-read the bytes as UTF-8 request text.
fn encode_body(value: &str) -> Result<String, ClientError> {
    String::from_utf8(codec::encode_string(value)).map_err(ClientError::malformed)
}

/// Map a non-2xx response to `ClientError::Service`.
fn check_status(response: &HttpResponse) -> Result<(), ClientError> {
    match response.outcome() {
        Outcome::Failure { status, reason } => Err(ClientError::Service { status, reason }),
        Outcome::SuccessWithBody | Outcome::SuccessNoBody => Ok(()),
    }
}

fn warn_not_xml(response: &HttpResponse) {
    warn!(
        status = response.status,
        media_type = response.media_type().unwrap_or("<none>"),
        "success response is not XML; treating it as empty"
    );
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;

    const BASE: &str = "http://localhost:56925/api/values/";

    /// Records every request and replays canned responses in order.
    #[derive(Default)]
    struct RecordingTransport {
        requests: RefCell<Vec<HttpRequest>>,
        responses: RefCell<VecDeque<Result<HttpResponse, ClientError>>>,
    }

    impl RecordingTransport {
        fn replying(responses: Vec<Result<HttpResponse, ClientError>>) -> Self {
            Self {
                requests: RefCell::default(),
                responses: RefCell::new(responses.into()),
            }
        }

        fn requests(&self) -> Vec<HttpRequest> {
            self.requests.borrow().clone()
        }
    }

    impl Transport for RecordingTransport {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ClientError> {
            self.requests.borrow_mut().push(request.clone());
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(ClientError::Transport("no canned response".to_string())))
        }
    }

    fn response(status: u16, reason: &str, content_type: Option<&str>, body: &[u8]) -> HttpResponse {
        HttpResponse {
            status,
            reason: reason.to_string(),
            headers: content_type
                .map(|ct| vec![("Content-Type".to_string(), ct.to_string())])
                .unwrap_or_default(),
            body: body.to_vec(),
        }
    }

    fn xml(body: &[u8]) -> HttpResponse {
        response(200, "OK", Some("application/xml; charset=utf-8"), body)
    }

    fn client() -> EntityClient<()> {
        EntityClient::with_transport(BASE, ())
    }

    #[test]
    fn base_url_is_normalized_to_one_trailing_slash() {
        for base in [
            "http://localhost:56925/api/values",
            "http://localhost:56925/api/values/",
            "http://localhost:56925/api/values//",
        ] {
            let client = EntityClient::with_transport(base, ());
            assert_eq!(client.base_url(), BASE);
            assert_eq!(client.build_list_all().path, BASE);
        }
    }

    #[test]
    fn build_list_all_produces_correct_request() {
        let req = client().build_list_all();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, BASE);
        assert!(req.body.is_none());
        assert_eq!(
            req.headers,
            vec![
                ("Accept".to_string(), "application/xml".to_string()),
                ("Accept-Charset".to_string(), "utf-8".to_string()),
            ]
        );
    }

    #[test]
    fn item_paths_are_plain_decimal_indices() {
        let c = client();
        for index in [0, 7, 10, 42, Index::MAX] {
            let expected = format!("{BASE}{index}");
            assert_eq!(c.build_get_by_index(index).path, expected);
            assert_eq!(c.build_replace(index, "v").unwrap().path, expected);
            assert_eq!(c.build_delete(index).path, expected);
        }
    }

    #[test]
    fn every_request_negotiates_xml() {
        let c = client();
        let requests = vec![
            c.build_list_all(),
            c.build_get_by_index(1),
            c.build_create("a").unwrap(),
            c.build_replace(1, "b").unwrap(),
            c.build_delete(1),
        ];
        for req in &requests {
            assert_eq!(req.header("accept"), Some("application/xml"), "{:?}", req.method);
            assert_eq!(req.header("accept-charset"), Some("utf-8"), "{:?}", req.method);
        }
        for req in &requests[2..4] {
            assert_eq!(req.header("content-type"), Some("application/xml; charset=utf-8"));
        }
        for req in [&requests[0], &requests[1], &requests[4]] {
            assert!(req.header("content-type").is_none());
            assert!(req.body.is_none());
        }
    }

    #[test]
    fn build_create_produces_xml_body() {
        let req = client().build_create("Buy milk & eggs").unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, BASE);
        assert_eq!(
            req.body.as_deref(),
            Some(r#"<string xmlns="http://schemas.microsoft.com/2003/10/Serialization/">Buy milk &amp; eggs</string>"#)
        );
    }

    #[test]
    fn build_replace_uses_put() {
        let req = client().build_replace(3, "new").unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        let body = req.body.unwrap();
        assert_eq!(codec::decode_string(body.as_bytes()).unwrap(), "new");
    }

    #[test]
    fn parse_list_all_decodes_in_order() {
        let list = client().parse_list_all(xml(&codec::encode_string_list(&["a", "b"]))).unwrap();
        assert_eq!(list, vec!["a", "b"]);
    }

    #[test]
    fn parse_list_all_non_xml_is_empty() {
        let resp = response(200, "OK", Some("application/json"), br#"["a","b"]"#);
        assert!(client().parse_list_all(resp).unwrap().is_empty());
    }

    #[test]
    fn parse_list_all_malformed_xml() {
        let err = client().parse_list_all(xml(b"<ArrayOfstring><string>a")).unwrap_err();
        assert!(matches!(err, ClientError::MalformedPayload(_)));
    }

    #[test]
    fn parse_get_by_index_non_xml_is_empty_string() {
        let resp = response(200, "OK", Some("text/plain"), b"hello");
        assert_eq!(client().parse_get_by_index(resp).unwrap(), "");
    }

    #[test]
    fn parse_get_by_index_missing_content_type_is_empty_string() {
        let resp = response(200, "OK", None, b"<string>x</string>");
        assert_eq!(client().parse_get_by_index(resp).unwrap(), "");
    }

    #[test]
    fn parse_get_by_index_not_found() {
        let err = client()
            .parse_get_by_index(response(404, "Not Found", None, b""))
            .unwrap_err();
        assert_eq!(
            err,
            ClientError::Service {
                status: 404,
                reason: "Not Found".to_string()
            }
        );
    }

    #[test]
    fn parse_create_wrong_status() {
        let resp = response(500, "Internal Server Error", Some("text/plain"), b"boom");
        let err = client().parse_create(resp).unwrap_err();
        assert!(matches!(err, ClientError::Service { status: 500, .. }));
    }

    #[test]
    fn parse_delete_ignores_body() {
        let resp = response(200, "OK", Some("application/xml"), b"not even xml");
        assert!(client().parse_delete(resp).is_ok());
        assert!(client().parse_replace(response(204, "No Content", None, b"")).is_ok());
    }

    #[test]
    fn list_all_over_transport() {
        let transport = RecordingTransport::replying(vec![Ok(xml(&codec::encode_string_list(&["a", "b"])))]);
        let client = EntityClient::with_transport(BASE, &transport);
        assert_eq!(client.list_all().unwrap(), vec!["a", "b"]);

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], EntityClient::with_transport(BASE, ()).build_list_all());
    }

    #[test]
    fn get_by_index_404_is_service_error() {
        let transport = RecordingTransport::replying(vec![Ok(response(404, "Not Found", None, b""))]);
        let client = EntityClient::with_transport(BASE, &transport);
        let err = client.get_by_index(5).unwrap_err();
        assert_eq!(
            err,
            ClientError::Service {
                status: 404,
                reason: "Not Found".to_string()
            }
        );
        assert_eq!(transport.requests()[0].path, format!("{BASE}5"));
    }

    #[test]
    fn get_by_index_text_plain_is_empty_entity() {
        let transport = RecordingTransport::replying(vec![Ok(response(200, "OK", Some("text/plain"), b"zero"))]);
        let client = EntityClient::with_transport(BASE, &transport);
        assert_eq!(client.get_by_index(0).unwrap(), "");
    }

    #[test]
    fn create_empty_value_is_still_sent() {
        let transport = RecordingTransport::replying(vec![Ok(response(204, "No Content", None, b""))]);
        let client = EntityClient::with_transport(BASE, &transport);
        client.create("").unwrap();

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, HttpMethod::Post);
        let body = sent[0].body.as_deref().unwrap();
        assert_eq!(codec::decode_string(body.as_bytes()).unwrap(), "");
    }

    #[test]
    fn replace_sends_put_to_index() {
        let transport = RecordingTransport::replying(vec![Ok(response(200, "OK", None, b""))]);
        let client = EntityClient::with_transport(BASE, &transport);
        client.replace(2, "two").unwrap();

        let sent = &transport.requests()[0];
        assert_eq!(sent.method, HttpMethod::Put);
        assert_eq!(sent.path, format!("{BASE}2"));
        assert_eq!(sent.header("Content-Type"), Some(CONTENT_TYPE));
    }

    #[test]
    fn delete_204_succeeds_without_decoding() {
        let transport = RecordingTransport::replying(vec![Ok(response(204, "No Content", None, b""))]);
        let client = EntityClient::with_transport(BASE, &transport);
        client.delete(9).unwrap();

        let sent = &transport.requests()[0];
        assert_eq!(sent.method, HttpMethod::Delete);
        assert_eq!(sent.path, format!("{BASE}9"));
        assert!(sent.body.is_none());
    }

    #[test]
    fn transport_errors_propagate_unchanged() {
        let failure = ClientError::Transport("connection refused".to_string());
        let transport = RecordingTransport::replying(vec![Err(failure.clone())]);
        let client = EntityClient::with_transport(BASE, &transport);
        assert_eq!(client.list_all().unwrap_err(), failure);
        assert_eq!(transport.requests().len(), 1, "no retry");
    }
}

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{error, info};

pub const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";
pub const SERIALIZATION_NS: &str = "http://schemas.microsoft.com/2003/10/Serialization/";
pub const ARRAYS_NS: &str = "http://schemas.microsoft.com/2003/10/Serialization/Arrays";
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// `<string xmlns="...">value</string>`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "string")]
pub struct StringValue {
    #[serde(rename = "@xmlns", default)]
    pub xmlns: String,
    #[serde(rename = "$text", default)]
    pub value: String,
}

impl StringValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            xmlns: SERIALIZATION_NS.to_string(),
            value: value.into(),
        }
    }
}

/// `<ArrayOfstring ...><string>a</string>...</ArrayOfstring>`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "ArrayOfstring")]
pub struct ArrayOfString {
    #[serde(rename = "@xmlns", default)]
    pub xmlns: String,
    #[serde(rename = "@xmlns:i", default)]
    pub xmlns_i: String,
    #[serde(rename = "string", default)]
    pub items: Vec<String>,
}

impl ArrayOfString {
    pub fn new(items: Vec<String>) -> Self {
        Self {
            xmlns: ARRAYS_NS.to_string(),
            xmlns_i: XSI_NS.to_string(),
            items,
        }
    }
}

/// Ordered collection; indices are positions and shift on delete.
pub type Db = Arc<RwLock<Vec<String>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route("/api/values", get(list_values).post(create_value))
        .route("/api/values/", get(list_values).post(create_value))
        .route(
            "/api/values/{index}",
            get(get_value).put(replace_value).delete(delete_value),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_values(State(db): State<Db>, headers: HeaderMap) -> Response {
    let values = db.read().await.clone();
    if wants_xml(&headers) {
        xml_response(&ArrayOfString::new(values))
    } else {
        Json(values).into_response()
    }
}

async fn create_value(State(db): State<Db>, body: String) -> Result<StatusCode, StatusCode> {
    let value = parse_value(&body)?;
    let mut values = db.write().await;
    values.push(value);
    info!(index = values.len() - 1, "value created");
    Ok(StatusCode::NO_CONTENT)
}

async fn get_value(
    State(db): State<Db>,
    Path(index): Path<usize>,
    headers: HeaderMap,
) -> Result<Response, StatusCode> {
    let values = db.read().await;
    let value = values.get(index).cloned().ok_or(StatusCode::NOT_FOUND)?;
    if wants_xml(&headers) {
        Ok(xml_response(&StringValue::new(value)))
    } else {
        Ok(Json(value).into_response())
    }
}

async fn replace_value(
    State(db): State<Db>,
    Path(index): Path<usize>,
    body: String,
) -> Result<StatusCode, StatusCode> {
    let value = parse_value(&body)?;
    let mut values = db.write().await;
    let slot = values.get_mut(index).ok_or(StatusCode::NOT_FOUND)?;
    *slot = value;
    info!(index, "value replaced");
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_value(
    State(db): State<Db>,
    Path(index): Path<usize>,
) -> Result<StatusCode, StatusCode> {
    let mut values = db.write().await;
    if index >= values.len() {
        return Err(StatusCode::NOT_FOUND);
    }
    values.remove(index);
    info!(index, "value deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn wants_xml(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|accept| accept.to_str().ok())
        .is_some_and(|accept| accept.contains("xml"))
}

fn parse_value(body: &str) -> Result<String, StatusCode> {
    quick_xml::de::from_str::<StringValue>(body)
        .map(|parsed| parsed.value)
        .map_err(|_| StatusCode::BAD_REQUEST)
}

fn xml_response<T: Serialize>(payload: &T) -> Response {
    match quick_xml::se::to_string(payload) {
        Ok(body) => ([(header::CONTENT_TYPE, XML_CONTENT_TYPE)], body).into_response(),
        Err(err) => {
            error!(%err, "failed to serialize XML response");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

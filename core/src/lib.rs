//! Blocking CRUD client for an XML values service.
//!
//! # Overview
//! A values service holds an ordered collection of anonymous text
//! entities. `EntityClient` lists the collection, reads, creates, replaces
//! and deletes entities by index against one base endpoint, speaking the
//! data-contract XML format on the wire.
//!
//! # Design
//! - `EntityClient` holds only the base endpoint and a `Transport`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so both halves test without I/O.
//! - `codec` is the XML wire format; encode and decode are exact duals.
//! - Success is any 2xx. Failures surface as `ClientError` and are never
//!   retried.
//! - The client is constructed once and passed to whoever needs it; there
//!   is no process-wide instance.

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::EntityClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::ClientError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Outcome};
pub use transport::{Transport, UreqTransport};
pub use types::{Entity, Index};

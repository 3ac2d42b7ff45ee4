//! Inbound webhook authentication and decoding.
//!
//! A delivery is a raw body plus two headers: [`SIGNATURE_HEADER`]
//! (`ts=<unix>,v1=<hex>`) and [`REQUEST_ID_HEADER`]. [`WebhookParser`]
//! checks the signature with [`verify`] and then decodes the body into a
//! [`WebhookEvent`].
//!
//! # Example
//!
//! ```
//! use mercadopago::webhook::WebhookParser;
//!
//! let parser = WebhookParser::new(None);
//! let event = parser
//!     .parse(br#"{"id":"1","type":"payment","data":{"id":"9"}}"#, None, None)
//!     .unwrap();
//! assert_eq!(event.resource_id, "9");
//! ```

mod error;
mod event;
mod parser;
mod signature;

#[cfg(test)]
mod signature_tests;

pub use error::{ParseError, SignatureError, WebhookError};
pub use event::{Topic, WebhookEvent, decode_event};
pub use parser::WebhookParser;
pub use signature::{SignatureHeader, SignatureManifest, sign, verify};

/// Header carrying `ts=<unix>,v1=<hex digest>`.
pub const SIGNATURE_HEADER: &str = "x-signature";

/// Header carrying the delivery's request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

//! The boundary between the core and the HTTP transport.
//!
//! The core never names an HTTP library; it only requires the
//! [`ResourceClient`] contract: one authenticated request returning the
//! parsed document's `response` payload as an ordered sequence of records.

pub mod http;

pub use http::ApiFootballClient;

use serde_json::Value;

use crate::error::{Error, Result};

/// One authenticated request against the remote API.
///
/// `fetch` fails with a transport error on network/HTTP failure and a
/// payload error when the document lacks the expected `response` field.
/// `total_pages` is the pagination collaborator: one preliminary call
/// reporting the true page count, after which page fetches run concurrently.
pub trait ResourceClient: Send + Sync {
    fn fetch(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Vec<Value>>;

    fn total_pages(&self, endpoint: &str, query: &[(&str, String)]) -> Result<u32>;
}

/// Extract the `response` array from a decoded API document.
pub fn response_records(document: Value) -> Result<Vec<Value>> {
    match document {
        Value::Object(mut obj) => match obj.remove("response") {
            Some(Value::Array(records)) => Ok(records),
            Some(_) => Err(Error::Payload(
                "'response' field is not an array".to_string(),
            )),
            None => Err(Error::Payload(
                "document has no 'response' field".to_string(),
            )),
        },
        _ => Err(Error::Payload("document is not a JSON object".to_string())),
    }
}

/// Extract `paging.total` from a decoded API document.
pub fn paging_total(document: &Value) -> Result<u32> {
    document
        .get("paging")
        .and_then(|p| p.get("total"))
        .and_then(Value::as_u64)
        .map(|total| total as u32)
        .ok_or_else(|| Error::Payload("document has no 'paging.total' field".to_string()))
}

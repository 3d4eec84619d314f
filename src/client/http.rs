use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::client::{paging_total, response_records, ResourceClient};
use crate::error::{Error, Result};

/// Base path for the api-football v3 API.
const BASE_URL: &str = "https://api-football-v1.p.rapidapi.com/v3";

/// RapidAPI host header the gateway requires.
const RAPIDAPI_HOST: &str = "api-football-v1.p.rapidapi.com";

/// Reused blocking client (connection pooling, UA, timeout). Shared read-only
/// across all pool workers; it only carries headers, no worker mutates it.
static HTTP: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent("touchline/0.1")
        .timeout(Duration::from_secs(30))
        .build()
        .expect("Client build")
});

/// [`ResourceClient`] backed by the api-football RapidAPI gateway.
pub struct ApiFootballClient {
    api_key: String,
}

impl ApiFootballClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        ApiFootballClient {
            api_key: api_key.into(),
        }
    }

    fn get_document(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}/{}", BASE_URL, endpoint);
        debug!(%url, ?query, "GET");

        let response = HTTP
            .get(&url)
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", RAPIDAPI_HOST)
            .query(query)
            .send()
            .map_err(Error::transport)?
            .error_for_status()
            .map_err(Error::transport)?;

        response.json().map_err(Error::transport)
    }
}

impl ResourceClient for ApiFootballClient {
    fn fetch(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Vec<Value>> {
        response_records(self.get_document(endpoint, query)?)
    }

    fn total_pages(&self, endpoint: &str, query: &[(&str, String)]) -> Result<u32> {
        paging_total(&self.get_document(endpoint, query)?)
    }
}

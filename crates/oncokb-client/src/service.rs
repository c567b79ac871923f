//! OncoKB annotator service.
//!
//! Endpoints (choose one via config):
//!   byProteinChange: https://www.oncokb.org/api/v1/annotate/mutations/byProteinChange
//!   byGenomicChange: https://www.oncokb.org/api/v1/annotate/mutations/byGenomicChange
//!
//! Builds the request array for a batch, POSTs it with bearer auth, decodes
//! the response and maps it back onto the batch's events.

use std::time::Duration;

use reqwest::{header, Client, ClientBuilder};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, instrument};

use oncokb_common::{AnnotatorError, EventBatch, OncoKbConfig, Result};
use oncokb_mapping::{
    build_requests, map_responses, request_body, OncoKbErrorResponse, OncoKbResponse, QueryMode,
};

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const HTTP_OK: u16 = 200;

/// Client for the OncoKB annotate-mutations API.
///
/// `SecretString` keeps the token out of `Debug` output.
#[derive(Debug)]
pub struct OncoKbAnnotatorService {
    client: Client,
    token: SecretString,
    api_url: String,
    mode: QueryMode,
}

impl OncoKbAnnotatorService {
    /// Both a token and an endpoint URL are required.
    pub fn new(token: impl Into<String>, api_url: impl Into<String>) -> Result<Self> {
        Self::build(
            SecretString::from(token.into()),
            api_url.into(),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Build from config, reading the token from the configured env var.
    pub fn from_config(config: &OncoKbConfig) -> Result<Self> {
        config.validate()?;
        let token = config.resolve_token()?;
        Self::build(token, config.api_url.clone(), Duration::from_secs(config.timeout_secs))
    }

    fn build(token: SecretString, api_url: String, timeout: Duration) -> Result<Self> {
        if token.expose_secret().is_empty() || api_url.is_empty() {
            return Err(AnnotatorError::Config(format!(
                "Both an OncoKB token and an OncoKB URL need to be valid (url: {api_url:?})"
            )));
        }

        let client = ClientBuilder::new()
            .timeout(timeout)
            .build()
            .map_err(|e| AnnotatorError::Config(format!("Failed to build HTTP client: {e}")))?;

        let mode = QueryMode::from_url(&api_url);
        debug!(url = %api_url, ?mode, "OncoKB annotator service configured");
        Ok(Self { client, token, api_url, mode })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn query_mode(&self) -> QueryMode {
        self.mode
    }

    /// Annotate every event of `batch` in place. Returns the number of
    /// events mapped.
    ///
    /// Any failure aborts the whole batch; events are only written once the
    /// full response has been decoded and every id resolved.
    #[instrument(skip(self, batch), fields(sample = %batch.sample_id, events = batch.events.len()))]
    pub async fn annotate_mutations(&self, batch: &mut EventBatch) -> Result<usize> {
        if batch.is_empty() {
            debug!("Empty batch, skipping OncoKB call");
            return Ok(0);
        }

        let requests = build_requests(batch, self.mode.omits_protein_coordinates())?;
        let body = request_body(&requests)?;

        let resp = self
            .client
            .post(&self.api_url)
            .header(header::CONTENT_TYPE, "application/json")
            .bearer_auth(self.token.expose_secret())
            .body(body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let text = resp.text().await?;
        debug!(status, bytes = text.len(), "OncoKB responded");

        let responses = decode_response(status, &text)?;
        let mapped = map_responses(&mut batch.events, &responses)?;

        info!(mapped, "OncoKB annotation complete");
        Ok(mapped)
    }
}

/// Decode an OncoKB response body.
///
/// A non-200 status surfaces the error body's `message`, or just the status
/// code when the body is not an OncoKB error object.
pub fn decode_response(status: u16, body: &str) -> Result<Vec<OncoKbResponse>> {
    if status != HTTP_OK {
        return match serde_json::from_str::<OncoKbErrorResponse>(body) {
            Ok(err) => Err(AnnotatorError::Api { status, message: err.message }),
            Err(_) => Err(AnnotatorError::ApiStatus(status)),
        };
    }

    serde_json::from_str(body).map_err(AnnotatorError::Decode)
}

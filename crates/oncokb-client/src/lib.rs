//! oncokb-client: HTTP transport for the OncoKB annotate-mutations API.
//! One POST per event batch; no retries.

pub mod service;

pub use service::{decode_response, OncoKbAnnotatorService};

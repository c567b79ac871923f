//! oncokb-mapping: Translation between annotator events and the OncoKB
//! annotate-mutations API.
//! - Request building: consequence lookup, alteration and gene identity
//! - Response mapping: flags, citations, therapeutic/diagnostic/prognostic levels
//!
//! Nothing here performs I/O; the transport lives in `oncokb-client`.

pub mod consequence;
pub mod request;
pub mod response;
pub mod citations;
pub mod levels;
pub mod mapper;

pub use consequence::resolve_consequence;
pub use request::{build_requests, request_body, OncoKbMutationRequest, QueryMode};
pub use response::{OncoKbErrorResponse, OncoKbResponse};
pub use mapper::map_responses;

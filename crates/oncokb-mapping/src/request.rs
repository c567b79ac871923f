//! Request builder for the OncoKB annotate-mutations endpoints.
//!
//! One request is produced per event, in batch order. The `id` of each
//! request is the event's zero-based position and is echoed back by OncoKB
//! in `query.id`, which is how the mapper finds the originating event.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use oncokb_common::{AnnotatorError, EventBatch, Result};

use crate::consequence::resolve_consequence;

const PROTEIN_CHANGE_PREFIX: &str = "p.";

/// One entry of the JSON array POSTed to OncoKB.
/// Field names and nesting are fixed by the OncoKB API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OncoKbMutationRequest {
    pub alteration: String,
    pub consequence: String,
    pub gene: GeneQuery,
    pub id: String,
    pub protein_start: i64,
    pub protein_end: i64,
    pub reference_genome: String,
    pub tumor_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneQuery {
    pub entrez_gene_id: i64,
    pub hugo_symbol: String,
}

/// How OncoKB is queried, derived from the endpoint URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    ByProteinChange,
    ByGenomicPosition,
}

impl QueryMode {
    pub fn from_url(url: &str) -> Self {
        if url.contains("byProteinChange") {
            QueryMode::ByProteinChange
        } else {
            QueryMode::ByGenomicPosition
        }
    }

    /// Protein-change queries must not carry protein start/end: OncoKB
    /// matches differently when they are present.
    pub fn omits_protein_coordinates(self) -> bool {
        matches!(self, QueryMode::ByProteinChange)
    }
}

/// Build one request per event in `batch`.
///
/// Fails the whole batch on the first event with an unknown variant
/// classification or an empty protein change; no partial list is returned.
pub fn build_requests(
    batch: &EventBatch,
    omit_protein_coordinates: bool,
) -> Result<Vec<OncoKbMutationRequest>> {
    let mut requests = Vec::with_capacity(batch.events.len());

    for (index, event) in batch.events.iter().enumerate() {
        let consequence = resolve_consequence(&event.variant_classification)?;

        let (protein_start, protein_end) = if omit_protein_coordinates {
            (0, 0)
        } else {
            (event.start_position, event.end_position)
        };

        if event.hgvsp_short.is_empty() {
            return Err(AnnotatorError::MissingProteinChange { index });
        }

        let request = OncoKbMutationRequest {
            alteration: strip_protein_prefix(&event.hgvsp_short).to_string(),
            consequence,
            gene: gene_query(&event.hugo_symbol, &event.entrez_gene_id),
            id: index.to_string(),
            protein_start,
            protein_end,
            reference_genome: event.ncbi_build.clone(),
            tumor_type: batch.oncotree_code.clone(),
        };
        debug!(
            id = %request.id,
            gene = %request.gene.hugo_symbol,
            alteration = %request.alteration,
            consequence = %request.consequence,
            "Built OncoKB request"
        );
        requests.push(request);
    }

    Ok(requests)
}

/// Serialize requests into the JSON array body OncoKB expects.
pub fn request_body(requests: &[OncoKbMutationRequest]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(requests)?)
}

fn strip_protein_prefix(hgvsp_short: &str) -> &str {
    hgvsp_short.strip_prefix(PROTEIN_CHANGE_PREFIX).unwrap_or(hgvsp_short)
}

/// The entrez id is only sent when there is no Hugo symbol to identify the
/// gene by. A malformed id degrades to 0.
fn gene_query(hugo_symbol: &str, entrez_gene_id: &str) -> GeneQuery {
    let entrez_gene_id = if hugo_symbol.is_empty() {
        entrez_gene_id.trim().parse::<i64>().unwrap_or_else(|_| {
            warn!(entrez_gene_id, "Malformed Entrez gene id, sending 0");
            0
        })
    } else {
        0
    };
    GeneQuery { entrez_gene_id, hugo_symbol: hugo_symbol.to_string() }
}

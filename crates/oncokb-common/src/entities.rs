//! Core event types exchanged between the request builder, the transport
//! layer and the response mapper.
//!
//! Every string field uses the empty string for "no value"; there is no
//! null marker anywhere in an annotated event.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// One somatic variant observation to be annotated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub hugo_symbol: String,
    pub entrez_gene_id: String,          // e.g. "4869"; only consulted when hugo_symbol is empty
    pub hgvsp_short: String,             // e.g. p.W288Cfs*12
    pub variant_classification: String, // e.g. Frame_Shift_Ins
    pub start_position: i64,
    pub end_position: i64,
    pub ncbi_build: String,              // e.g. GRCh37
    #[serde(default)]
    pub oncokb: OncoKbAnnotation,
}

impl Event {
    /// Has the mapper already written an annotation onto this event?
    pub fn is_annotated(&self) -> bool {
        self.oncokb.annotated == "true"
    }
}

// ---------------------------------------------------------------------------
// OncoKB annotation output
// ---------------------------------------------------------------------------

/// Flattened OncoKB annotation written onto an [`Event`] by the mapper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OncoKbAnnotation {
    pub annotated: String,
    pub known_gene: String,
    pub known_variant: String,
    pub mutation_effect: String,
    pub mutation_effect_citations: String,
    pub oncogenic: String,

    // Therapeutic levels: '+'-joined drugs per treatment, ',' between treatments
    pub level_1: String,
    pub level_2: String,
    pub level_3a: String,
    pub level_3b: String,
    pub level_4: String,
    pub level_r1: String,
    pub level_r2: String,
    pub highest_level: String,
    pub highest_sensitive_level: String,
    pub highest_resistance_level: String,
    pub tx_citations: String,

    // Diagnostic levels: ','-joined tumor types
    pub level_dx1: String,
    pub level_dx2: String,
    pub level_dx3: String,
    pub highest_dx_level: String,
    pub dx_citations: String,

    // Prognostic levels: ','-joined tumor types
    pub level_px1: String,
    pub level_px2: String,
    pub level_px3: String,
    pub highest_px_level: String,
    pub px_citations: String,
}

// ---------------------------------------------------------------------------
// Event batch
// ---------------------------------------------------------------------------

/// Ordered events from one tumor sample, annotated together.
///
/// The position of an event in `events` is its correlation id for the
/// OncoKB round trip; it carries no sample or gene identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventBatch {
    pub sample_id: String,
    pub normal_sample_id: String,
    pub pipeline_version: String,
    /// OncoTree code sent as the tumor type of every request, e.g. AMLNPM1
    pub oncotree_code: String,
    pub events: Vec<Event>,
}

impl EventBatch {
    pub fn new(sample_id: impl Into<String>, oncotree_code: impl Into<String>) -> Self {
        let sample_id = sample_id.into();
        Self {
            normal_sample_id: sample_id.clone(),
            sample_id,
            oncotree_code: oncotree_code.into(),
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of events carrying an OncoKB annotation.
    pub fn annotated_count(&self) -> usize {
        self.events.iter().filter(|e| e.is_annotated()).count()
    }
}

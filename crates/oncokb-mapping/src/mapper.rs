//! Maps OncoKB responses back onto the events that produced them.

use tracing::{debug, info, warn};

use oncokb_common::{AnnotatorError, Event, Result};

use crate::citations::aggregate_citations;
use crate::levels::{
    highest_therapeutic_level, set_implication_levels, set_therapeutic_levels, DiagnosticLevel,
    PrognosticLevel,
};
use crate::response::OncoKbResponse;

/// Annotate `events` in place from `responses`, returning the number of
/// responses applied.
///
/// Every `query.id` must be the batch position of an event. All ids are
/// checked before any event is written, so a bad id leaves the batch
/// untouched.
pub fn map_responses(events: &mut [Event], responses: &[OncoKbResponse]) -> Result<usize> {
    let targets = responses
        .iter()
        .map(|r| event_index(&r.query.id, events.len()))
        .collect::<Result<Vec<usize>>>()?;

    for (index, response) in targets.into_iter().zip(responses) {
        let event = &mut events[index];
        if event.is_annotated() {
            warn!(index, "Event already carries an OncoKB annotation, merging");
        }
        annotate_event(event, response);
        debug!(
            index,
            gene = %response.query.hugo_symbol,
            alteration = %response.query.alteration,
            oncogenic = %event.oncokb.oncogenic,
            highest_level = %event.oncokb.highest_level,
            "Mapped OncoKB response"
        );
    }

    info!(events = events.len(), responses = responses.len(), "OncoKB responses mapped");
    Ok(responses.len())
}

/// Resolve a correlation id to a batch position.
fn event_index(id: &str, batch_len: usize) -> Result<usize> {
    match id.parse::<usize>() {
        Ok(index) if index < batch_len => Ok(index),
        _ => Err(AnnotatorError::UnmatchedResponse(id.to_string())),
    }
}

/// Write one response onto its event.
pub fn annotate_event(event: &mut Event, response: &OncoKbResponse) {
    let annotation = &mut event.oncokb;

    annotation.annotated = true.to_string();
    annotation.known_gene = response.gene_exist.to_string();
    annotation.known_variant = response.variant_exist.to_string();
    annotation.mutation_effect = response.mutation_effect.known_effect.clone();
    annotation.mutation_effect_citations =
        aggregate_citations([&response.mutation_effect.citations]);
    annotation.oncogenic = response.oncogenic.clone();

    set_therapeutic_levels(annotation, &response.treatments);
    annotation.tx_citations = aggregate_citations(&response.treatments);
    annotation.highest_level = highest_therapeutic_level(&response.treatments);
    annotation.highest_sensitive_level = response.highest_sensitive_level.clone();
    annotation.highest_resistance_level = response.highest_resistance_level.clone();

    set_implication_levels::<DiagnosticLevel, _>(annotation, &response.diagnostic_implications);
    annotation.dx_citations = aggregate_citations(&response.diagnostic_implications);
    annotation.highest_dx_level = response.highest_diagnostic_implication_level.clone();

    set_implication_levels::<PrognosticLevel, _>(annotation, &response.prognostic_implications);
    annotation.px_citations = aggregate_citations(&response.prognostic_implications);
    annotation.highest_px_level = response.highest_prognostic_implication_level.clone();
}

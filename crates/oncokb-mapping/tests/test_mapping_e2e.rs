//! Builder → OncoKB JSON → mapper round trip on a realistic response.
//!
//! Run with: cargo test --package oncokb-mapping --test test_mapping_e2e

use oncokb_common::{Event, EventBatch};
use oncokb_mapping::{build_requests, map_responses, OncoKbResponse, QueryMode};
use pretty_assertions::assert_eq;

const ONCOKB_URL: &str = "https://www.oncokb.org/api/v1/annotate/mutations/byProteinChange";

fn event(hugo: &str, entrez: &str, hgvsp: &str, class: &str, start: i64, end: i64) -> Event {
    Event {
        hugo_symbol: hugo.to_string(),
        entrez_gene_id: entrez.to_string(),
        hgvsp_short: hgvsp.to_string(),
        variant_classification: class.to_string(),
        start_position: start,
        end_position: end,
        ncbi_build: "GRCh37".to_string(),
        ..Default::default()
    }
}

fn melanoma_batch() -> EventBatch {
    let mut batch = EventBatch::new("P-0000001-T01-IM6", "MEL");
    batch.pipeline_version = "v1.0".to_string();
    batch.events = vec![
        event("BRAF", "673", "p.V600E", "Missense_Mutation", 140453136, 140453136),
        event("NPM1", "4869", "p.W288Cfs*12", "Frame_Shift_Ins", 170837543, 170837544),
    ];
    batch
}

/// Response array as OncoKB returns it: out of request order, with nulls.
const RESPONSE_JSON: &str = r#"[
  {
    "query": {"id": "1", "hugoSymbol": "NPM1", "alteration": "W288Cfs*12", "tumorType": "MEL"},
    "geneExist": true, "variantExist": true, "alleleExist": true, "hotspot": false, "vus": false,
    "mutationEffect": {"knownEffect": "Likely Loss-of-function", "description": "",
                       "citations": {"pmids": ["16076867", "15659725"], "abstracts": []}},
    "oncogenic": "Likely Oncogenic",
    "highestSensitiveLevel": null, "highestResistanceLevel": null,
    "highestDiagnosticImplicationLevel": "LEVEL_Dx1",
    "highestPrognosticImplicationLevel": "LEVEL_Px1",
    "treatments": [],
    "diagnosticImplications": [
      {"levelOfEvidence": "LEVEL_Dx1", "pmids": ["16076867"], "abstracts": [],
       "tumorType": {"code": "AML", "name": "Acute Myeloid Leukemia", "mainType": {"name": "Leukemia"}}},
      {"levelOfEvidence": "LEVEL_Dx1", "pmids": ["16076867", "20538800"], "abstracts": [],
       "tumorType": {"code": "", "name": "", "mainType": {"name": "Leukemia"}}}
    ],
    "prognosticImplications": [
      {"levelOfEvidence": "LEVEL_Px1", "pmids": ["21067377"], "abstracts": null,
       "tumorType": {"code": "AML", "mainType": {"name": "Leukemia"}}}
    ]
  },
  {
    "query": {"id": "0", "hugoSymbol": "BRAF", "alteration": "V600E", "tumorType": "MEL"},
    "geneExist": true, "variantExist": true,
    "mutationEffect": {"knownEffect": "Gain-of-function",
                       "citations": {"pmids": ["12068308"], "abstracts": [
                         {"abstract": "Flaherty et al. ASCO 2010", "link": "http://meetinglibrary.asco.org/1"}]}},
    "oncogenic": "Oncogenic",
    "highestSensitiveLevel": "LEVEL_1", "highestResistanceLevel": "",
    "highestDiagnosticImplicationLevel": null, "highestPrognosticImplicationLevel": null,
    "treatments": [
      {"level": "LEVEL_3A", "drugs": [{"drugName": "Binimetinib", "ncitCode": "C84865"}],
       "pmids": ["28284557"], "abstracts": []},
      {"level": "LEVEL_1", "drugs": [{"drugName": "Dabrafenib", "ncitCode": "C82386"},
                                     {"drugName": "Trametinib", "ncitCode": "C77908"}],
       "pmids": ["25399551", "28284557"], "abstracts": []},
      {"level": "LEVEL_1", "drugs": [{"drugName": "Vemurafenib", "ncitCode": "C64768"}],
       "pmids": ["21639808"], "abstracts": [
         {"abstract": "Flaherty et al. ASCO 2010", "link": "http://meetinglibrary.asco.org/1"}]},
      {"level": "LEVEL_Fda2", "drugs": [{"drugName": "Ignored", "ncitCode": ""}], "pmids": [], "abstracts": []}
    ],
    "diagnosticImplications": [], "prognosticImplications": []
  }
]"#;

#[test]
fn test_round_trip_annotates_every_event() {
    let mut batch = melanoma_batch();
    let mode = QueryMode::from_url(ONCOKB_URL);

    let requests = build_requests(&batch, mode.omits_protein_coordinates()).unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].alteration, "V600E");
    assert_eq!(requests[1].alteration, "W288Cfs*12");
    assert!(requests.iter().all(|r| r.protein_start == 0 && r.protein_end == 0));
    assert!(requests.iter().all(|r| r.tumor_type == "MEL"));

    let responses: Vec<OncoKbResponse> = serde_json::from_str(RESPONSE_JSON).unwrap();
    let mapped = map_responses(&mut batch.events, &responses).unwrap();
    assert_eq!(mapped, 2);
    assert_eq!(batch.annotated_count(), 2);

    let braf = &batch.events[0].oncokb;
    assert_eq!(braf.known_gene, "true");
    assert_eq!(braf.mutation_effect, "Gain-of-function");
    assert_eq!(
        braf.mutation_effect_citations,
        "12068308;Flaherty et al. ASCO 2010(http://meetinglibrary.asco.org/1)"
    );
    assert_eq!(braf.oncogenic, "Oncogenic");
    assert_eq!(braf.level_1, "Dabrafenib+Trametinib,Vemurafenib");
    assert_eq!(braf.level_3a, "Binimetinib");
    assert_eq!(braf.level_2, "");
    assert_eq!(braf.highest_level, "LEVEL_1");
    assert_eq!(braf.highest_sensitive_level, "LEVEL_1");
    assert_eq!(braf.highest_resistance_level, "");
    assert_eq!(
        braf.tx_citations,
        "28284557;25399551;21639808;Flaherty et al. ASCO 2010(http://meetinglibrary.asco.org/1)"
    );
    assert_eq!(braf.dx_citations, "");
    assert_eq!(braf.highest_dx_level, "");

    let npm1 = &batch.events[1].oncokb;
    assert_eq!(npm1.mutation_effect_citations, "16076867;15659725");
    assert_eq!(npm1.highest_level, "");
    assert_eq!(npm1.highest_sensitive_level, "");
    assert_eq!(npm1.level_dx1, "AML,Leukemia");
    assert_eq!(npm1.dx_citations, "16076867;20538800");
    assert_eq!(npm1.highest_dx_level, "LEVEL_Dx1");
    assert_eq!(npm1.level_px1, "AML");
    assert_eq!(npm1.px_citations, "21067377");
    assert_eq!(npm1.highest_px_level, "LEVEL_Px1");
}

#[test]
fn test_genomic_mode_sends_coordinates() {
    let batch = melanoma_batch();
    let mode = QueryMode::from_url("https://www.oncokb.org/api/v1/annotate/mutations/byGenomicChange");
    let requests = build_requests(&batch, mode.omits_protein_coordinates()).unwrap();
    assert_eq!(requests[1].protein_start, 170837543);
    assert_eq!(requests[1].protein_end, 170837544);
}

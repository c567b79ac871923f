//! Variant classification → OncoKB consequence terms.
//!
//! Keys are lower-cased MAF / ANNOVAR variant classifications; values are the
//! Sequence Ontology terms OncoKB accepts in the `consequence` field.

use std::collections::HashMap;
use std::sync::OnceLock;

use oncokb_common::{AnnotatorError, Result};

/// Delimiter used when a classification maps to several consequence terms.
pub const CONSEQUENCE_DELIMITER: &str = "+";

const VARIANT_CLASS_TO_CONSEQUENCE: &[(&str, &[&str])] = &[
    ("3'flank", &["any"]),
    ("3'utr", &["any"]),
    ("5'flank", &["any"]),
    ("5'utr", &["any"]),
    ("intron", &["any"]),
    ("intronic", &["any"]),
    ("igr", &["any"]),
    ("targeted_region", &["inframe_deletion", "inframe_insertion"]),
    ("complex_indel", &["inframe_deletion", "inframe_insertion"]),
    ("essential_splice_site", &["feature_truncation"]),
    ("exon skipping", &["inframe_deletion"]),
    ("frameshift deletion", &["frameshift_variant"]),
    ("frameshift_deletion", &["frameshift_variant"]),
    ("frameshift insertion", &["frameshift_variant"]),
    ("frameshift_insertion", &["frameshift_variant"]),
    ("nonframeshift_deletion", &["any"]),
    ("nonframeshift_insertion", &["any"]),
    ("frameshift_coding", &["frameshift_variant"]),
    ("frame_shift_del", &["frameshift_variant"]),
    ("frame_shift_ins", &["frameshift_variant"]),
    ("fusion", &["fusion"]),
    ("indel", &["frameshift_variant", "inframe_deletion", "inframe_insertion"]),
    ("in_frame_del", &["inframe_deletion"]),
    ("in_frame_ins", &["inframe_insertion"]),
    ("missense", &["missense_variant"]),
    ("missense_mutation", &["missense_variant"]),
    ("nonsynonymous_snv", &["missense_variant"]),
    ("nonsense_mutation", &["stop_gained"]),
    ("stopgain_snv", &["stop_gained"]),
    ("nonstop_mutation", &["stop_lost"]),
    ("stoploss_snv", &["stop_lost"]),
    ("silent", &["silent"]),
    ("splice_site", &["splice_region_variant"]),
    ("splice_site_del", &["splice_region_variant"]),
    ("splice_site_snp", &["splice_region_variant"]),
    ("splicing", &["splice_region_variant"]),
    ("splice_region", &["splice_region_variant"]),
    ("rna", &["splice_region_variant"]),
    ("translation_start_site", &["start_lost"]),
    ("viii deletion", &["any"]),
];

fn consequence_table() -> &'static HashMap<&'static str, &'static [&'static str]> {
    static TABLE: OnceLock<HashMap<&'static str, &'static [&'static str]>> = OnceLock::new();
    TABLE.get_or_init(|| VARIANT_CLASS_TO_CONSEQUENCE.iter().copied().collect())
}

/// Consequence terms for a variant classification, matched case-insensitively.
pub fn consequences_for(variant_classification: &str) -> Option<&'static [&'static str]> {
    consequence_table()
        .get(variant_classification.to_lowercase().as_str())
        .copied()
}

/// The `consequence` request value for a variant classification.
///
/// An unknown classification is an error for the whole batch, never a skip.
pub fn resolve_consequence(variant_classification: &str) -> Result<String> {
    consequences_for(variant_classification)
        .map(|terms| terms.join(CONSEQUENCE_DELIMITER))
        .ok_or_else(|| AnnotatorError::UnknownVariantClassification(variant_classification.to_string()))
}

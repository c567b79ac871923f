//! MAF (Mutation Annotation Format) input and annotated output.
//!
//! Reads the columns needed to build events, groups rows into one batch per
//! tumor sample, and writes the input rows back out with the OncoKB
//! annotation columns appended.

use std::collections::HashMap;
use std::fs::File;
use std::future::Future;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::OnceLock;

use csv::{QuoteStyle, ReaderBuilder, StringRecord, WriterBuilder};
use regex::Regex;
use tracing::{debug, warn};

use oncokb_common::{AnnotatorError, Event, EventBatch, OncoKbAnnotation, Result};

const FIELD_DELIMITER: u8 = b'\t';
const COMMENT_PREFIX: u8 = b'#';

/// Columns every input MAF must carry.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "Hugo_Symbol",
    "Entrez_Gene_Id",
    "NCBI_Build",
    "Start_Position",
    "End_Position",
    "Variant_Classification",
    "Tumor_Sample_Barcode",
    "HGVSp_Short",
];

/// Columns appended to annotated output, in order.
pub const ANNOTATION_COLUMNS: [&str; 27] = [
    "ANNOTATED",
    "GENE_IN_ONCOKB",
    "VARIANT_IN_ONCOKB",
    "MUTATION_EFFECT",
    "MUTATION_EFFECT_CITATIONS",
    "ONCOGENIC",
    "LEVEL_1",
    "LEVEL_2",
    "LEVEL_3A",
    "LEVEL_3B",
    "LEVEL_4",
    "LEVEL_R1",
    "LEVEL_R2",
    "HIGHEST_LEVEL",
    "HIGHEST_SENSITIVE_LEVEL",
    "HIGHEST_RESISTANCE_LEVEL",
    "TX_CITATIONS",
    "LEVEL_Dx1",
    "LEVEL_Dx2",
    "LEVEL_Dx3",
    "HIGHEST_DX_LEVEL",
    "DX_CITATIONS",
    "LEVEL_Px1",
    "LEVEL_Px2",
    "LEVEL_Px3",
    "HIGHEST_PX_LEVEL",
    "PX_CITATIONS",
];

/// Values for [`ANNOTATION_COLUMNS`], in the same order.
pub fn annotation_values(a: &OncoKbAnnotation) -> [&str; 27] {
    [
        &a.annotated,
        &a.known_gene,
        &a.known_variant,
        &a.mutation_effect,
        &a.mutation_effect_citations,
        &a.oncogenic,
        &a.level_1,
        &a.level_2,
        &a.level_3a,
        &a.level_3b,
        &a.level_4,
        &a.level_r1,
        &a.level_r2,
        &a.highest_level,
        &a.highest_sensitive_level,
        &a.highest_resistance_level,
        &a.tx_citations,
        &a.level_dx1,
        &a.level_dx2,
        &a.level_dx3,
        &a.highest_dx_level,
        &a.dx_citations,
        &a.level_px1,
        &a.level_px2,
        &a.level_px3,
        &a.highest_px_level,
        &a.px_citations,
    ]
}

// ── Reading ───────────────────────────────────────────────────────────────────

/// One data row of a MAF.
#[derive(Debug, Clone)]
pub struct MafRecord {
    /// 1-based line number in the source file
    pub line: u64,
    pub fields: StringRecord,
    pub sample_id: String,
    pub event: Event,
}

#[derive(Debug, Clone, Default)]
pub struct MafTable {
    pub header: StringRecord,
    pub records: Vec<MafRecord>,
}

/// A batch built from MAF rows, with the row index of each event.
#[derive(Debug, Clone)]
pub struct SampleBatch {
    pub batch: EventBatch,
    pub rows: Vec<usize>,
}

/// Tab-separated, `#` comment lines skipped, no quoting (MAF values may
/// contain bare quotes).
fn tsv_reader<R: Read>(reader: R, has_headers: bool) -> csv::Reader<R> {
    ReaderBuilder::new()
        .delimiter(FIELD_DELIMITER)
        .comment(Some(COMMENT_PREFIX))
        .has_headers(has_headers)
        .flexible(true)
        .quoting(false)
        .from_reader(reader)
}

fn tsv_error(e: csv::Error) -> AnnotatorError {
    match e.position() {
        Some(pos) => AnnotatorError::Maf(format!("line {}: {e}", pos.line())),
        None => AnnotatorError::Maf(e.to_string()),
    }
}

pub fn read_maf(path: &Path) -> Result<MafTable> {
    parse_maf(File::open(path)?)
}

pub fn parse_maf<R: Read>(reader: R) -> Result<MafTable> {
    let mut reader = tsv_reader(reader, true);
    let header = reader.headers().map_err(tsv_error)?.clone();
    if header.is_empty() {
        return Err(AnnotatorError::Maf("MAF has no header row".to_string()));
    }

    let mut positions = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, name) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| AnnotatorError::Maf(format!("MAF is missing required column {name}")))?;
    }
    let [hugo, entrez, build, start, end, class, sample, hgvsp] = positions;

    let mut records = Vec::new();
    for result in reader.records() {
        let fields = result.map_err(tsv_error)?;
        let line = fields.position().map_or(0, |p| p.line());
        if fields.len() < header.len() {
            return Err(AnnotatorError::Maf(format!(
                "line {line}: expected {} fields, found {}",
                header.len(),
                fields.len()
            )));
        }

        let event = Event {
            hugo_symbol: fields[hugo].to_string(),
            entrez_gene_id: fields[entrez].to_string(),
            hgvsp_short: fields[hgvsp].to_string(),
            variant_classification: fields[class].to_string(),
            start_position: parse_position(&fields[start], "Start_Position", line)?,
            end_position: parse_position(&fields[end], "End_Position", line)?,
            ncbi_build: fields[build].to_string(),
            ..Default::default()
        };
        if !event.hgvsp_short.is_empty() && !is_valid_hgvs_protein(&event.hgvsp_short) {
            debug!(line, hgvsp = %event.hgvsp_short, "Non-standard HGVSp_Short");
        }

        records.push(MafRecord {
            line,
            sample_id: fields[sample].to_string(),
            fields,
            event,
        });
    }

    debug!(records = records.len(), "Parsed MAF");
    Ok(MafTable { header, records })
}

fn parse_position(value: &str, column: &str, line: u64) -> Result<i64> {
    value.trim().parse::<i64>().map_err(|_| {
        AnnotatorError::Maf(format!("line {line}: {column} {value:?} is not an integer"))
    })
}

pub fn read_clinical_samples(path: &Path) -> Result<HashMap<String, String>> {
    parse_clinical_samples(File::open(path)?)
}

/// Sample id → OncoTree code from a clinical sample file (sample id in the
/// first column, OncoTree code in the third).
pub fn parse_clinical_samples<R: Read>(reader: R) -> Result<HashMap<String, String>> {
    let mut reader = tsv_reader(reader, false);
    let mut oncotree = HashMap::new();
    for result in reader.records() {
        let record = result.map_err(tsv_error)?;
        if let (Some(sample), Some(code)) = (record.get(0), record.get(2)) {
            oncotree.insert(sample.to_string(), code.to_string());
        }
    }
    Ok(oncotree)
}

impl MafTable {
    /// One batch per tumor sample, in order of first appearance.
    pub fn group_by_sample(
        &self,
        oncotree: &HashMap<String, String>,
        pipeline_version: &str,
    ) -> Vec<SampleBatch> {
        let mut batches: Vec<SampleBatch> = Vec::new();
        let mut by_sample: HashMap<&str, usize> = HashMap::new();

        for (row, record) in self.records.iter().enumerate() {
            let slot = *by_sample.entry(record.sample_id.as_str()).or_insert_with(|| {
                let code = oncotree.get(&record.sample_id).cloned().unwrap_or_else(|| {
                    warn!(sample = %record.sample_id, "Cannot find OncoTree code for sample");
                    String::new()
                });
                let mut batch = EventBatch::new(record.sample_id.clone(), code);
                batch.pipeline_version = pipeline_version.to_string();
                batches.push(SampleBatch { batch, rows: Vec::new() });
                batches.len() - 1
            });

            batches[slot].batch.events.push(record.event.clone());
            batches[slot].rows.push(row);
        }

        batches
    }

    /// Copy a batch's events back onto the rows they came from.
    pub fn apply(&mut self, sample_batch: SampleBatch) {
        for (row, event) in sample_batch.rows.into_iter().zip(sample_batch.batch.events) {
            self.records[row].event = event;
        }
    }
}

// ── Annotation ────────────────────────────────────────────────────────────────

/// Annotates one batch in place, returning the number of events mapped.
pub trait BatchAnnotator {
    fn annotate(&self, batch: &mut EventBatch) -> impl Future<Output = Result<usize>>;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AnnotationSummary {
    pub annotated: usize,
    pub failed_samples: usize,
}

/// Annotate each sample batch and write the results back into `table`.
///
/// A failing sample is logged and skipped: its rows keep empty annotation
/// columns and the remaining samples are still annotated.
pub async fn annotate_table<A: BatchAnnotator>(
    table: &mut MafTable,
    batches: Vec<SampleBatch>,
    annotator: &A,
) -> AnnotationSummary {
    let mut summary = AnnotationSummary::default();

    for mut sample_batch in batches {
        let events = sample_batch.batch.len();
        match annotator.annotate(&mut sample_batch.batch).await {
            Ok(mapped) => {
                debug!(sample = %sample_batch.batch.sample_id, events, mapped, "Sample annotated");
                summary.annotated += mapped;
                table.apply(sample_batch);
            }
            Err(e) => {
                warn!(
                    sample = %sample_batch.batch.sample_id,
                    events,
                    error = %e,
                    "Annotation failed, writing rows unannotated"
                );
                summary.failed_samples += 1;
            }
        }
    }

    summary
}

// ── Writing ───────────────────────────────────────────────────────────────────

/// Write the table with the annotation columns appended.
pub fn write_annotated_maf<W: Write>(writer: W, table: &MafTable) -> Result<()> {
    let mut out = WriterBuilder::new()
        .delimiter(FIELD_DELIMITER)
        .quote_style(QuoteStyle::Never)
        .from_writer(writer);

    out.write_record(table.header.iter().chain(ANNOTATION_COLUMNS))
        .map_err(tsv_error)?;
    for record in &table.records {
        out.write_record(
            record
                .fields
                .iter()
                .take(table.header.len())
                .chain(annotation_values(&record.event.oncokb)),
        )
        .map_err(tsv_error)?;
    }
    out.flush()?;
    Ok(())
}

// ── HGVSp validation ──────────────────────────────────────────────────────────

fn hgvs_protein_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // p.G12D, p.Gly12Asp, p.R213*, p.W288Cfs*12, p.E746_A750del, p.A767_V769dup
        Regex::new(
            r"^p\.[A-Z*](?:[a-z]{2})?\d+(?:_[A-Z*](?:[a-z]{2})?\d+)?(?:[A-Z*](?:[a-z]{2})?)?(?:fs\*?\d*|del|ins[A-Z]*|dup|=)?$",
        )
        .expect("HGVSp regex is valid")
    })
}

/// Is `hgvsp` a protein change of a form OncoKB resolves directly?
pub fn is_valid_hgvs_protein(hgvsp: &str) -> bool {
    hgvs_protein_regex().is_match(hgvsp)
}

//! oncokb-annotate: annotate somatic mutations with OncoKB.
//!
//!   oncokb-annotate annotate-maf --maf data_mutations.txt --clinical data_clinical_sample.txt -o annotated.maf
//!   oncokb-annotate annotate --hugo-symbol NPM1 --hgvsp p.W288Cfs*12 --variant-classification Frame_Shift_Ins --oncotree-code AMLNPM1
//!   oncokb-annotate requests --maf data_mutations.txt
//!
//! Logs go to stderr; set RUST_LOG to override the default filter.

mod maf;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use oncokb_client::OncoKbAnnotatorService;
use oncokb_common::{AnnotatorConfig, Event, EventBatch};
use oncokb_mapping::{build_requests, QueryMode};

use maf::BatchAnnotator;

#[derive(Parser)]
#[command(name = "oncokb-annotate", version, about = "Annotate somatic mutations with OncoKB")]
struct Cli {
    /// Config file, TOML, YAML or JSON (default: $ONCOKB_ANNOTATOR_CONFIG or oncokb-annotator.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate every row of a MAF, one OncoKB call per tumor sample
    AnnotateMaf {
        #[arg(long)]
        maf: PathBuf,
        /// Clinical sample file (sample id in column 1, OncoTree code in column 3)
        #[arg(long)]
        clinical: PathBuf,
        /// Output MAF (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Annotate a single mutation and print the annotation as JSON
    Annotate {
        #[arg(long)]
        hugo_symbol: String,
        #[arg(long, default_value = "")]
        entrez_gene_id: String,
        /// Protein change, e.g. p.V600E
        #[arg(long)]
        hgvsp: String,
        #[arg(long)]
        variant_classification: String,
        #[arg(long, default_value_t = 0)]
        start: i64,
        #[arg(long, default_value_t = 0)]
        end: i64,
        #[arg(long, default_value = "GRCh37")]
        build: String,
        #[arg(long, default_value = "")]
        oncotree_code: String,
        #[arg(long, default_value = "")]
        sample_id: String,
    },

    /// Print the OncoKB request JSON for each sample of a MAF without calling the API
    Requests {
        #[arg(long)]
        maf: PathBuf,
        #[arg(long)]
        clinical: Option<PathBuf>,
    },
}

impl BatchAnnotator for OncoKbAnnotatorService {
    async fn annotate(&self, batch: &mut EventBatch) -> oncokb_common::Result<usize> {
        self.annotate_mutations(batch).await
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("oncokb=debug,info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AnnotatorConfig::load_from(&path.to_string_lossy())?,
        None => AnnotatorConfig::load()?,
    };

    match cli.command {
        Commands::AnnotateMaf { maf, clinical, output } => {
            let service = OncoKbAnnotatorService::from_config(&config.oncokb)?;

            let mut table = maf::read_maf(&maf)
                .with_context(|| format!("reading MAF {}", maf.display()))?;
            let oncotree = maf::read_clinical_samples(&clinical)
                .with_context(|| format!("reading clinical file {}", clinical.display()))?;
            let batches = table.group_by_sample(&oncotree, &config.input.default_pipeline_version);
            info!(rows = table.records.len(), samples = batches.len(), "Annotating MAF");

            let summary = maf::annotate_table(&mut table, batches, &service).await;

            let mut writer: Box<dyn Write> = match &output {
                Some(path) => Box::new(BufWriter::new(
                    File::create(path).with_context(|| format!("creating {}", path.display()))?,
                )),
                None => Box::new(BufWriter::new(io::stdout().lock())),
            };
            maf::write_annotated_maf(&mut writer, &table)?;

            info!(
                annotated = summary.annotated,
                failed_samples = summary.failed_samples,
                "MAF annotation finished"
            );
        }

        Commands::Annotate {
            hugo_symbol,
            entrez_gene_id,
            hgvsp,
            variant_classification,
            start,
            end,
            build,
            oncotree_code,
            sample_id,
        } => {
            let service = OncoKbAnnotatorService::from_config(&config.oncokb)?;

            let mut batch = EventBatch::new(sample_id, oncotree_code);
            batch.pipeline_version = config.input.default_pipeline_version.clone();
            batch.events.push(Event {
                hugo_symbol,
                entrez_gene_id,
                hgvsp_short: hgvsp,
                variant_classification,
                start_position: start,
                end_position: end,
                ncbi_build: build,
                ..Default::default()
            });

            service.annotate_mutations(&mut batch).await?;
            println!("{}", serde_json::to_string_pretty(&batch.events[0].oncokb)?);
        }

        Commands::Requests { maf, clinical } => {
            let table = maf::read_maf(&maf)
                .with_context(|| format!("reading MAF {}", maf.display()))?;
            let oncotree = match &clinical {
                Some(path) => maf::read_clinical_samples(path)
                    .with_context(|| format!("reading clinical file {}", path.display()))?,
                None => Default::default(),
            };
            let omit = QueryMode::from_url(&config.oncokb.api_url).omits_protein_coordinates();

            let stdout = io::stdout();
            let mut out = stdout.lock();
            for sample_batch in table.group_by_sample(&oncotree, &config.input.default_pipeline_version) {
                match build_requests(&sample_batch.batch, omit) {
                    Ok(requests) => {
                        writeln!(out, "# {}", sample_batch.batch.sample_id)?;
                        writeln!(out, "{}", serde_json::to_string_pretty(&requests)?)?;
                    }
                    Err(e) => warn!(
                        sample = %sample_batch.batch.sample_id,
                        error = %e,
                        "Cannot build requests for sample"
                    ),
                }
            }
        }
    }

    Ok(())
}

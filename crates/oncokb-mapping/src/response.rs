//! OncoKB annotate-mutations response models.
//!
//! Only the fields the mapper reads are modelled; anything else OncoKB sends
//! is ignored. OncoKB emits `null` for absent strings and lists, so every
//! field decodes `null` (or a missing key) as its empty value.

use serde::{Deserialize, Deserializer};

/// Decode `null` as `T::default()`.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Error body returned by OncoKB with a non-200 status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OncoKbErrorResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub detail: String,
    #[serde(default, deserialize_with = "null_default")]
    pub message: String,
    #[serde(default, deserialize_with = "null_default")]
    pub path: String,
    #[serde(default, deserialize_with = "null_default")]
    pub status: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
}

/// One element of the response array, matched to its request by `query.id`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OncoKbResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub query: Query,
    #[serde(default, deserialize_with = "null_default")]
    pub gene_exist: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub variant_exist: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub mutation_effect: MutationEffect,
    #[serde(default, deserialize_with = "null_default")]
    pub oncogenic: String,
    #[serde(default, deserialize_with = "null_default")]
    pub treatments: Vec<Treatment>,
    #[serde(default, deserialize_with = "null_default")]
    pub highest_sensitive_level: String,
    #[serde(default, deserialize_with = "null_default")]
    pub highest_resistance_level: String,
    #[serde(default, deserialize_with = "null_default")]
    pub diagnostic_implications: Vec<DiagnosticImplication>,
    #[serde(default, deserialize_with = "null_default")]
    pub highest_diagnostic_implication_level: String,
    #[serde(default, deserialize_with = "null_default")]
    pub prognostic_implications: Vec<PrognosticImplication>,
    #[serde(default, deserialize_with = "null_default")]
    pub highest_prognostic_implication_level: String,
}

/// Echo of the request; only the correlation id matters to the mapper.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub hugo_symbol: String,
    #[serde(default, deserialize_with = "null_default")]
    pub alteration: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationEffect {
    #[serde(default, deserialize_with = "null_default")]
    pub known_effect: String,
    #[serde(default, deserialize_with = "null_default")]
    pub citations: Citations,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Citations {
    #[serde(default, deserialize_with = "null_default")]
    pub pmids: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub abstracts: Vec<Abstract>,
}

/// Conference abstract cited in place of (or alongside) a PubMed id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Abstract {
    #[serde(rename = "abstract", default, deserialize_with = "null_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_default")]
    pub link: String,
}

impl Abstract {
    /// `text(link)`, the form written into citation fields and used as the
    /// dedup key.
    pub fn citation_key(&self) -> String {
        format!("{}({})", self.text, self.link)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Treatment {
    #[serde(default, deserialize_with = "null_default")]
    pub level: String,
    #[serde(default, deserialize_with = "null_default")]
    pub drugs: Vec<Drug>,
    #[serde(default, deserialize_with = "null_default")]
    pub pmids: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub abstracts: Vec<Abstract>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drug {
    #[serde(default, deserialize_with = "null_default")]
    pub drug_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticImplication {
    #[serde(default, deserialize_with = "null_default")]
    pub level_of_evidence: String,
    #[serde(default, deserialize_with = "null_default")]
    pub tumor_type: TumorType,
    #[serde(default, deserialize_with = "null_default")]
    pub pmids: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub abstracts: Vec<Abstract>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrognosticImplication {
    #[serde(default, deserialize_with = "null_default")]
    pub level_of_evidence: String,
    #[serde(default, deserialize_with = "null_default")]
    pub tumor_type: TumorType,
    #[serde(default, deserialize_with = "null_default")]
    pub pmids: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub abstracts: Vec<Abstract>,
}

/// OncoTree tumor type attached to an implication.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TumorType {
    #[serde(default, deserialize_with = "null_default")]
    pub code: String,
    #[serde(default, deserialize_with = "null_default")]
    pub main_type: MainType,
}

impl TumorType {
    /// OncoTree code, or the main type name for main-type-level entries
    /// which carry no code.
    pub fn display_name(&self) -> &str {
        if self.code.is_empty() {
            &self.main_type.name
        } else {
            &self.code
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainType {
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
}

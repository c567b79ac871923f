//! Citation aggregation for the four OncoKB evidence categories.
//!
//! Mutation effect, treatment, diagnostic and prognostic records all carry
//! PubMed ids and conference abstracts. They share one aggregation routine
//! through the [`CitationSource`] capability.

use std::collections::HashSet;

use crate::response::{Abstract, Citations, DiagnosticImplication, PrognosticImplication, Treatment};

const CITATION_SEPARATOR: &str = ";";

/// A record carrying PubMed ids and abstracts.
pub trait CitationSource {
    fn pmids(&self) -> &[String];
    fn abstracts(&self) -> &[Abstract];
}

impl CitationSource for Citations {
    fn pmids(&self) -> &[String] { &self.pmids }
    fn abstracts(&self) -> &[Abstract] { &self.abstracts }
}

impl CitationSource for Treatment {
    fn pmids(&self) -> &[String] { &self.pmids }
    fn abstracts(&self) -> &[Abstract] { &self.abstracts }
}

impl CitationSource for DiagnosticImplication {
    fn pmids(&self) -> &[String] { &self.pmids }
    fn abstracts(&self) -> &[Abstract] { &self.abstracts }
}

impl CitationSource for PrognosticImplication {
    fn pmids(&self) -> &[String] { &self.pmids }
    fn abstracts(&self) -> &[Abstract] { &self.abstracts }
}

/// Aggregate the citations of `sources` into one field value.
///
/// Each source contributes `<pmids>;<abstracts>` (either side omitted when
/// empty), and the pieces are joined with `;` in source order. PMIDs and
/// abstracts already emitted by an earlier source are skipped. Dedup state
/// lives only for this call, so each event and category starts from nothing.
pub fn aggregate_citations<'a, T, I>(sources: I) -> String
where
    T: CitationSource + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut seen_pmids: HashSet<&str> = HashSet::new();
    let mut seen_abstracts: HashSet<String> = HashSet::new();
    let mut pieces: Vec<String> = Vec::new();

    for source in sources {
        let pmids: Vec<&str> = source
            .pmids()
            .iter()
            .map(String::as_str)
            .filter(|pmid| seen_pmids.insert(*pmid))
            .collect();
        let abstracts: Vec<String> = source
            .abstracts()
            .iter()
            .map(Abstract::citation_key)
            .filter(|key| seen_abstracts.insert(key.clone()))
            .collect();

        if !pmids.is_empty() {
            pieces.push(pmids.join(CITATION_SEPARATOR));
        }
        if !abstracts.is_empty() {
            pieces.push(abstracts.join(CITATION_SEPARATOR));
        }
    }

    pieces.join(CITATION_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn citations(pmids: &[&str], abstracts: &[(&str, &str)]) -> Citations {
        Citations {
            pmids: pmids.iter().map(|p| p.to_string()).collect(),
            abstracts: abstracts
                .iter()
                .map(|(text, link)| Abstract { text: text.to_string(), link: link.to_string() })
                .collect(),
        }
    }

    #[test]
    fn test_empty_sources() {
        assert_eq!(aggregate_citations::<Citations, _>(&[]), "");
        assert_eq!(aggregate_citations([&citations(&[], &[])]), "");
    }

    #[test]
    fn test_duplicate_pmid_kept_once_in_first_order() {
        let c = citations(&["111", "222", "111", "333", "222"], &[]);
        assert_eq!(aggregate_citations([&c]), "111;222;333");
    }

    #[test]
    fn test_pmids_then_abstracts() {
        let c = citations(&["111"], &[("AACR 2020 abstract 42", "https://aacr.example/42")]);
        assert_eq!(aggregate_citations([&c]), "111;AACR 2020 abstract 42(https://aacr.example/42)");
    }

    #[test]
    fn test_abstracts_only() {
        let c = citations(&[], &[("ASCO 2018", "https://asco.example/1"), ("ASCO 2018", "https://asco.example/1")]);
        assert_eq!(aggregate_citations([&c]), "ASCO 2018(https://asco.example/1)");
    }

    #[test]
    fn test_dedup_spans_records_of_one_call() {
        let treatments = vec![
            Treatment { pmids: vec!["1".into(), "2".into()], ..Default::default() },
            Treatment {
                pmids: vec!["2".into(), "3".into()],
                abstracts: vec![Abstract { text: "ESMO".into(), link: "l".into() }],
                ..Default::default()
            },
        ];
        assert_eq!(aggregate_citations(&treatments), "1;2;3;ESMO(l)");
    }

    #[test]
    fn test_abstracts_stay_with_their_record() {
        let treatments = vec![
            Treatment {
                pmids: vec!["111".into()],
                abstracts: vec![Abstract { text: "ASCO".into(), link: "a".into() }],
                ..Default::default()
            },
            Treatment { pmids: vec!["222".into()], ..Default::default() },
        ];
        assert_eq!(aggregate_citations(&treatments), "111;ASCO(a);222");
    }

    #[test]
    fn test_fully_duplicate_record_adds_nothing() {
        let treatments = vec![
            Treatment {
                pmids: vec!["111".into()],
                abstracts: vec![Abstract { text: "ASCO".into(), link: "a".into() }],
                ..Default::default()
            },
            Treatment {
                pmids: vec!["111".into()],
                abstracts: vec![Abstract { text: "ASCO".into(), link: "a".into() }],
                ..Default::default()
            },
        ];
        assert_eq!(aggregate_citations(&treatments), "111;ASCO(a)");
    }

    #[test]
    fn test_dedup_does_not_leak_between_calls() {
        let c = citations(&["111"], &[]);
        assert_eq!(aggregate_citations([&c]), "111");
        assert_eq!(aggregate_citations([&c]), "111");
    }

    #[test]
    fn test_same_text_different_link_is_distinct() {
        let c = citations(&[], &[("ASH", "a"), ("ASH", "b")]);
        assert_eq!(aggregate_citations([&c]), "ASH(a);ASH(b)");
    }
}

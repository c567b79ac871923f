//! OncoKB evidence levels and the annotation fields they fill.
//!
//! Each family (therapeutic, diagnostic, prognostic) is an enum whose `ALL`
//! table fixes both the recognized tag set and the precedence order. Tags
//! outside the table are ignored.

use oncokb_common::OncoKbAnnotation;

use crate::response::{DiagnosticImplication, Drug, PrognosticImplication, Treatment, TumorType};

const DRUG_SEPARATOR: &str = "+";
const LIST_SEPARATOR: &str = ",";

/// A family of OncoKB level tags mapped onto annotation fields.
pub trait EvidenceLevel: Copy + 'static {
    /// Every recognized level, in precedence order.
    const ALL: &'static [Self];

    /// Tag as it appears in OncoKB responses, e.g. "LEVEL_3A".
    fn tag(self) -> &'static str;

    /// Annotation field holding this level's value.
    fn field(self, annotation: &mut OncoKbAnnotation) -> &mut String;

    fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|level| level.tag() == tag)
    }
}

// ── Therapeutic ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TherapeuticLevel {
    LevelR1,
    Level1,
    Level2,
    Level3A,
    Level3B,
    Level4,
    LevelR2,
}

impl EvidenceLevel for TherapeuticLevel {
    // Highest-level precedence: R1 outranks level 1 here.
    const ALL: &'static [Self] = &[
        TherapeuticLevel::LevelR1,
        TherapeuticLevel::Level1,
        TherapeuticLevel::Level2,
        TherapeuticLevel::Level3A,
        TherapeuticLevel::Level3B,
        TherapeuticLevel::Level4,
        TherapeuticLevel::LevelR2,
    ];

    fn tag(self) -> &'static str {
        match self {
            TherapeuticLevel::LevelR1 => "LEVEL_R1",
            TherapeuticLevel::Level1  => "LEVEL_1",
            TherapeuticLevel::Level2  => "LEVEL_2",
            TherapeuticLevel::Level3A => "LEVEL_3A",
            TherapeuticLevel::Level3B => "LEVEL_3B",
            TherapeuticLevel::Level4  => "LEVEL_4",
            TherapeuticLevel::LevelR2 => "LEVEL_R2",
        }
    }

    fn field(self, annotation: &mut OncoKbAnnotation) -> &mut String {
        match self {
            TherapeuticLevel::LevelR1 => &mut annotation.level_r1,
            TherapeuticLevel::Level1  => &mut annotation.level_1,
            TherapeuticLevel::Level2  => &mut annotation.level_2,
            TherapeuticLevel::Level3A => &mut annotation.level_3a,
            TherapeuticLevel::Level3B => &mut annotation.level_3b,
            TherapeuticLevel::Level4  => &mut annotation.level_4,
            TherapeuticLevel::LevelR2 => &mut annotation.level_r2,
        }
    }
}

// ── Diagnostic ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Dx1,
    Dx2,
    Dx3,
}

impl EvidenceLevel for DiagnosticLevel {
    const ALL: &'static [Self] = &[DiagnosticLevel::Dx1, DiagnosticLevel::Dx2, DiagnosticLevel::Dx3];

    fn tag(self) -> &'static str {
        match self {
            DiagnosticLevel::Dx1 => "LEVEL_Dx1",
            DiagnosticLevel::Dx2 => "LEVEL_Dx2",
            DiagnosticLevel::Dx3 => "LEVEL_Dx3",
        }
    }

    fn field(self, annotation: &mut OncoKbAnnotation) -> &mut String {
        match self {
            DiagnosticLevel::Dx1 => &mut annotation.level_dx1,
            DiagnosticLevel::Dx2 => &mut annotation.level_dx2,
            DiagnosticLevel::Dx3 => &mut annotation.level_dx3,
        }
    }
}

// ── Prognostic ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrognosticLevel {
    Px1,
    Px2,
    Px3,
}

impl EvidenceLevel for PrognosticLevel {
    const ALL: &'static [Self] = &[PrognosticLevel::Px1, PrognosticLevel::Px2, PrognosticLevel::Px3];

    fn tag(self) -> &'static str {
        match self {
            PrognosticLevel::Px1 => "LEVEL_Px1",
            PrognosticLevel::Px2 => "LEVEL_Px2",
            PrognosticLevel::Px3 => "LEVEL_Px3",
        }
    }

    fn field(self, annotation: &mut OncoKbAnnotation) -> &mut String {
        match self {
            PrognosticLevel::Px1 => &mut annotation.level_px1,
            PrognosticLevel::Px2 => &mut annotation.level_px2,
            PrognosticLevel::Px3 => &mut annotation.level_px3,
        }
    }
}

// ── Treatments ────────────────────────────────────────────────────────────────

/// Append one treatment's drugs ('+'-joined) to an existing level value,
/// separating treatments with ','.
pub fn merge_drugs(existing: &str, drugs: &[Drug]) -> String {
    let new_list = drugs
        .iter()
        .map(|d| d.drug_name.as_str())
        .collect::<Vec<_>>()
        .join(DRUG_SEPARATOR);

    match (existing.is_empty(), new_list.is_empty()) {
        (true, _) => new_list,
        (false, true) => existing.to_string(),
        (false, false) => format!("{existing}{LIST_SEPARATOR}{new_list}"),
    }
}

/// Fill the per-level drug fields from `treatments`.
pub fn set_therapeutic_levels(annotation: &mut OncoKbAnnotation, treatments: &[Treatment]) {
    for treatment in treatments {
        if let Some(level) = TherapeuticLevel::from_tag(&treatment.level) {
            let slot = level.field(annotation);
            *slot = merge_drugs(slot.as_str(), &treatment.drugs);
        }
    }
}

/// First level in precedence order present among `treatments`, or "".
pub fn highest_therapeutic_level(treatments: &[Treatment]) -> String {
    TherapeuticLevel::ALL
        .iter()
        .find(|level| treatments.iter().any(|t| t.level == level.tag()))
        .map(|level| level.tag().to_string())
        .unwrap_or_default()
}

// ── Diagnostic / prognostic implications ─────────────────────────────────────

/// An implication tagged with a level and a tumor type.
pub trait LeveledImplication {
    fn level_of_evidence(&self) -> &str;
    fn tumor_type(&self) -> &TumorType;
}

impl LeveledImplication for DiagnosticImplication {
    fn level_of_evidence(&self) -> &str { &self.level_of_evidence }
    fn tumor_type(&self) -> &TumorType { &self.tumor_type }
}

impl LeveledImplication for PrognosticImplication {
    fn level_of_evidence(&self) -> &str { &self.level_of_evidence }
    fn tumor_type(&self) -> &TumorType { &self.tumor_type }
}

/// Overwrite each level field of family `L` with the ','-joined tumor types
/// of the implications carrying that level, in input order.
pub fn set_implication_levels<L, I>(annotation: &mut OncoKbAnnotation, implications: &[I])
where
    L: EvidenceLevel,
    I: LeveledImplication,
{
    for &level in L::ALL {
        let tumor_types: Vec<&str> = implications
            .iter()
            .filter(|i| i.level_of_evidence() == level.tag())
            .map(|i| i.tumor_type().display_name())
            .collect();
        *level.field(annotation) = tumor_types.join(LIST_SEPARATOR);
    }
}

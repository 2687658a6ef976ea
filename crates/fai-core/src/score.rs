use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The seven fixed sections of the evaluation checklist, in form order.
/// Question names carry the section as a prefix (`II_3` is question 3 of
/// section II).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Section {
    I,
    II,
    III,
    IV,
    V,
    VI,
    VII,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::I,
        Section::II,
        Section::III,
        Section::IV,
        Section::V,
        Section::VI,
        Section::VII,
    ];

    /// Weight of this section in the final score. Part of the form
    /// definition; the weights sum to [`max_total`].
    pub fn weight(self) -> f64 {
        match self {
            Section::I => 1.0,
            Section::II => 2.5,
            Section::III => 1.0,
            Section::IV => 2.0,
            Section::V => 2.0,
            Section::VI => 1.0,
            Section::VII => 0.5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Section::I => "I",
            Section::II => "II",
            Section::III => "III",
            Section::IV => "IV",
            Section::V => "V",
            Section::VI => "VI",
            Section::VII => "VII",
        }
    }

    /// Section owning a question name such as `II_3`. Names without a
    /// recognised `<section>_` prefix belong to no section and are ignored
    /// by the scorer.
    pub fn from_question_name(name: &str) -> Option<Section> {
        let (prefix, _) = name.split_once('_')?;
        match prefix {
            "I" => Some(Section::I),
            "II" => Some(Section::II),
            "III" => Some(Section::III),
            "IV" => Some(Section::IV),
            "V" => Some(Section::V),
            "VI" => Some(Section::VI),
            "VII" => Some(Section::VII),
            _ => None,
        }
    }
}

/// Maximum achievable total, the sum of all section weights.
pub fn max_total() -> f64 {
    Section::ALL.iter().map(|section| section.weight()).sum()
}

/// Letter grade derived from the total percentage. Boundaries are closed
/// at the lower edge: 90 is already an A, 60 is still a C.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grau {
    A,
    B,
    C,
    D,
}

impl Grau {
    pub fn from_percentage(percentage: f64) -> Grau {
        if percentage >= 90.0 {
            Grau::A
        } else if percentage >= 75.0 {
            Grau::B
        } else if percentage >= 60.0 {
            Grau::C
        } else {
            Grau::D
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grau::A => "A",
            Grau::B => "B",
            Grau::C => "C",
            Grau::D => "D",
        }
    }
}

/// One radio-group question as rendered on the form. `selected` carries the
/// value of the checked choice, if any. Callers may pass either one entry
/// per question or one entry per radio input; unanswered duplicates of the
/// same name are merged away.
#[derive(Clone, Debug, PartialEq)]
pub struct FormQuestion {
    pub name: String,
    pub selected: Option<String>,
}

impl FormQuestion {
    pub fn answered(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selected: Some(value.into()),
        }
    }

    pub fn unanswered(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selected: None,
        }
    }
}

/// Per-section breakdown of a [`ScoreResult`]. `avg` is absent for
/// sections with no questions on the form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionDetail {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg: Option<f64>,
    pub section_score: f64,
    pub items: usize,
}

/// Computed score of one form snapshot. Serialized keys follow the form's
/// own JSON contract (`maxTotal`, `sectionScore`, `allAnswered`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub total: f64,
    pub max_total: f64,
    pub percentage: f64,
    pub grau: Grau,
    pub details: BTreeMap<Section, SectionDetail>,
    pub all_answered: bool,
}

/// Score a full form snapshot.
///
/// The section average divides by the number of distinct questions, not the
/// number answered, so unanswered questions weigh in as zeros. A choice
/// value that does not parse as a number counts as unanswered, which keeps
/// the gap visible through `ok` instead of silently scoring it as zero.
pub fn score_form(questions: &[FormQuestion]) -> ScoreResult {
    let mut grouped: BTreeMap<Section, BTreeMap<&str, Option<f64>>> = BTreeMap::new();
    for question in questions {
        let Some(section) = Section::from_question_name(&question.name) else {
            continue;
        };
        let value = question
            .selected
            .as_deref()
            .and_then(|raw| raw.trim().parse::<f64>().ok());
        let slot = grouped
            .entry(section)
            .or_default()
            .entry(question.name.as_str())
            .or_insert(None);
        // A radio group may arrive as one entry per input; keep the checked one.
        if slot.is_none() {
            *slot = value;
        }
    }

    let mut details = BTreeMap::new();
    let mut total = 0.0;
    let mut all_answered = true;
    for section in Section::ALL {
        let Some(answers) = grouped.get(&section) else {
            // A section absent from the form scores zero but does not veto
            // allAnswered; only half-filled sections do.
            details.insert(
                section,
                SectionDetail {
                    ok: false,
                    avg: None,
                    section_score: 0.0,
                    items: 0,
                },
            );
            continue;
        };
        let items = answers.len();
        let mut sum = 0.0;
        let mut answered = 0usize;
        for value in answers.values() {
            if let Some(value) = value {
                sum += value;
                answered += 1;
            }
        }
        let avg = sum / items as f64;
        let section_score = avg * section.weight();
        if answered < items {
            all_answered = false;
        }
        details.insert(
            section,
            SectionDetail {
                ok: answered == items,
                avg: Some(avg),
                section_score,
                items,
            },
        );
        total += section_score;
    }

    let max_total = max_total();
    let percentage = total / max_total * 100.0;
    ScoreResult {
        total,
        max_total,
        percentage,
        grau: Grau::from_percentage(percentage),
        details,
        all_answered,
    }
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::score::{score_form, FormQuestion, ScoreResult};

/// Identification block of the form. Field names double as the serialized
/// keys and match the form's own input ids.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub turma: String,
    pub om: String,
    pub aluno: String,
    pub instrutor: String,
    pub ano: String,
    pub local: String,
    pub data: String,
}

/// The record sent to the automation webhook: who was evaluated, the raw
/// choice value per answered question, and the computed summary. Immutable
/// once built; the relay forwards it as an opaque body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub meta: Meta,
    pub responses: BTreeMap<String, String>,
    pub summary: ScoreResult,
}

/// Collect a submission from the current form state. `responses` keeps the
/// raw string value of every answered question; the summary is recomputed
/// from the full roster so unanswered questions still weigh in.
pub fn build_submission(meta: Meta, questions: &[FormQuestion]) -> Submission {
    let mut responses = BTreeMap::new();
    for question in questions {
        if let Some(value) = &question.selected {
            responses.insert(question.name.clone(), value.clone());
        }
    }
    Submission {
        meta,
        responses,
        summary: score_form(questions),
    }
}

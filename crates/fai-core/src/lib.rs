//! Domain logic for the FAI ("Ficha de Avaliação Individual") checklist:
//! the fixed section/weight table, the scorer, and the submission record
//! the relay forwards to the automation webhook.

pub mod score;
pub mod submission;

pub use score::{max_total, score_form, FormQuestion, Grau, ScoreResult, Section, SectionDetail};
pub use submission::{build_submission, Meta, Submission};

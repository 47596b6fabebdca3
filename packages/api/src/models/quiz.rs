use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A multiple-choice question inside a quiz.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`. Validated on quiz creation.
    pub correct_answer: u32,
}

/// A quiz owned by exactly one user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub description: String,
    pub questions: Vec<QuizQuestion>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One submitted attempt at a quiz. Immutable once persisted;
/// `total_questions` and `percentage` are stored on the record rather than
/// recomputed from the quiz on read-back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub quiz_id: String,
    pub score: u32,
    pub total_questions: u32,
    pub percentage: u32,
    /// Selected option indices, aligned with the quiz's questions.
    pub answers: Vec<u32>,
    pub completed_at: DateTime<Utc>,
}

/// Input for creating a quiz. Question ids are assigned by the service.
#[derive(Clone, Debug, PartialEq)]
pub struct NewQuiz {
    pub title: String,
    pub description: String,
    pub questions: Vec<NewQuestion>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: u32,
}

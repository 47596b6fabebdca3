//! # Quiz repository — authoring, scoring, and attempt history
//!
//! Same scoping contract as notes: every read and write is filtered by the
//! owner's id, reads degrade, writes surface failures.
//!
//! ## Scoring
//!
//! A submitted attempt is compared pairwise against the quiz: position `i`
//! scores when `answers[i] == questions[i].correct_answer`. Answer vectors
//! longer or shorter than the question list are tolerated; unmatched
//! positions simply contribute nothing. `total_questions` and `percentage`
//! (`round(100 × score / total)`) are computed once at submission and stored
//! on the [`QuizResult`] itself, so read-back never recomputes them from a
//! quiz that may have changed or vanished.
//!
//! ## Result ownership
//!
//! Results carry no owner column; they belong to whoever owns the referenced
//! quiz, so [`list_results`](QuizService::list_results) resolves ownership
//! transitively and results of a deleted quiz drop out of the history.
//!
//! ## Demo seeding
//!
//! [`ensure_sample_quiz`](QuizService::ensure_sample_quiz) gives first-time
//! users the fixed "Basic Mathematics" quiz, exactly once.

use std::collections::HashSet;

use chrono::Utc;
use serde_json::Value;
use store::{Filter, Order, RecordStore};
use uuid::Uuid;

use crate::error::ServiceError;
use crate::models::{NewQuiz, Quiz, QuizQuestion, QuizResult};
use crate::session::SessionContext;

const QUIZZES: &str = "quizzes";
const QUIZ_RESULTS: &str = "quiz_results";

pub struct QuizService<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> QuizService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All quizzes owned by the context's user, most recently updated first.
    pub async fn list(&self, ctx: &SessionContext) -> Vec<Quiz> {
        let Some(user) = ctx.user() else {
            return Vec::new();
        };
        let rows = match self
            .store
            .select(
                QUIZZES,
                &[Filter::eq("userId", user.id.clone())],
                Some(&Order::desc("updatedAt")),
            )
            .await
        {
            Ok(rows) => rows,
            Err(err) => {
                tracing::warn!("listing quizzes failed: {err}");
                return Vec::new();
            }
        };
        rows.into_iter()
            .filter_map(|row| serde_json::from_value(row).ok())
            .collect()
    }

    /// A single quiz, or `None` when the id does not exist for this user.
    pub async fn get(&self, ctx: &SessionContext, id: &str) -> Option<Quiz> {
        let user = ctx.user()?;
        let row = self
            .store
            .select_one(QUIZZES, &scope(id, &user.id))
            .await
            .ok()??;
        serde_json::from_value(row).ok()
    }

    /// Create a quiz, assigning question ids and validating that every
    /// `correct_answer` indexes into its options.
    pub async fn create(&self, ctx: &SessionContext, data: NewQuiz) -> Result<Quiz, ServiceError> {
        let user = ctx.require_user()?;

        let quiz_id = Uuid::new_v4().to_string();
        let mut questions = Vec::with_capacity(data.questions.len());
        for (index, q) in data.questions.into_iter().enumerate() {
            if q.correct_answer as usize >= q.options.len() {
                return Err(ServiceError::Validation(format!(
                    "Question {} has no option at index {}",
                    index + 1,
                    q.correct_answer
                )));
            }
            questions.push(QuizQuestion {
                id: format!("{quiz_id}_{index}"),
                question: q.question,
                options: q.options,
                correct_answer: q.correct_answer,
            });
        }

        let now = Utc::now();
        let quiz = Quiz {
            id: quiz_id,
            title: data.title,
            description: data.description,
            questions,
            user_id: user.id.clone(),
            created_at: now,
            updated_at: now,
        };
        let row = serde_json::to_value(&quiz).map_err(|e| ServiceError::Remote(e.to_string()))?;
        let stored = self.store.insert(QUIZZES, row).await?;
        decode_quiz(stored)
    }

    /// Delete a quiz owned by this user. Ids that are absent or owned by
    /// someone else fail with `NotFound`.
    pub async fn delete(&self, ctx: &SessionContext, id: &str) -> Result<(), ServiceError> {
        let user = ctx.require_user()?;
        let removed = self.store.delete(QUIZZES, &scope(id, &user.id)).await?;
        if removed == 0 {
            return Err(ServiceError::NotFound("Quiz not found".into()));
        }
        Ok(())
    }

    /// Score a submitted attempt and persist the result.
    pub async fn submit_result(
        &self,
        ctx: &SessionContext,
        quiz_id: &str,
        answers: &[u32],
    ) -> Result<QuizResult, ServiceError> {
        let user = ctx.require_user()?;
        let row = self
            .store
            .select_one(QUIZZES, &scope(quiz_id, &user.id))
            .await?;
        let Some(row) = row else {
            return Err(ServiceError::NotFound("Quiz not found".into()));
        };
        let quiz = decode_quiz(row)?;

        let score = answers
            .iter()
            .zip(quiz.questions.iter())
            .filter(|(answer, question)| **answer == question.correct_answer)
            .count() as u32;
        let total = quiz.questions.len() as u32;
        let percentage = if total == 0 {
            0
        } else {
            (f64::from(score) / f64::from(total) * 100.0).round() as u32
        };

        let result = QuizResult {
            quiz_id: quiz.id,
            score,
            total_questions: total,
            percentage,
            answers: answers.to_vec(),
            completed_at: Utc::now(),
        };
        let row = serde_json::to_value(&result).map_err(|e| ServiceError::Remote(e.to_string()))?;
        let stored = self.store.insert(QUIZ_RESULTS, row).await?;
        serde_json::from_value(stored)
            .map_err(|e| ServiceError::Remote(format!("corrupt result record: {e}")))
    }

    /// Attempt history for this user's quizzes, most recent first,
    /// optionally narrowed to one quiz.
    pub async fn list_results(
        &self,
        ctx: &SessionContext,
        quiz_id: Option<&str>,
    ) -> Vec<QuizResult> {
        let Some(user) = ctx.user() else {
            return Vec::new();
        };
        let owned: HashSet<String> = match self
            .store
            .select(QUIZZES, &[Filter::eq("userId", user.id.clone())], None)
            .await
        {
            Ok(rows) => rows
                .iter()
                .filter_map(|row| row.get("id").and_then(Value::as_str))
                .map(str::to_string)
                .collect(),
            Err(err) => {
                tracing::warn!("listing quizzes for result ownership failed: {err}");
                return Vec::new();
            }
        };

        let mut filters = Vec::new();
        if let Some(quiz_id) = quiz_id {
            filters.push(Filter::eq("quizId", quiz_id));
        }
        let rows = match self
            .store
            .select(QUIZ_RESULTS, &filters, Some(&Order::desc("completedAt")))
            .await
        {
            Ok(rows) => rows,
            Err(err) => {
                tracing::warn!("listing quiz results failed: {err}");
                return Vec::new();
            }
        };
        rows.into_iter()
            .filter_map(|row| serde_json::from_value::<QuizResult>(row).ok())
            .filter(|result| owned.contains(&result.quiz_id))
            .collect()
    }

    /// Seed the fixed demo quiz for first-time users. Returns the created
    /// quiz, or `None` when the user already has one or more quizzes.
    pub async fn ensure_sample_quiz(
        &self,
        ctx: &SessionContext,
    ) -> Result<Option<Quiz>, ServiceError> {
        let Some(user) = ctx.user() else {
            return Ok(None);
        };
        // The existence probe must not degrade to "no quizzes": treating a
        // flaky read as empty would seed duplicates.
        let existing = self
            .store
            .select(QUIZZES, &[Filter::eq("userId", user.id.clone())], None)
            .await?;
        if !existing.is_empty() {
            return Ok(None);
        }
        let quiz = self.create(ctx, sample_quiz()).await?;
        Ok(Some(quiz))
    }
}

fn scope(id: &str, user_id: &str) -> [Filter; 2] {
    [Filter::eq("id", id), Filter::eq("userId", user_id)]
}

fn decode_quiz(row: Value) -> Result<Quiz, ServiceError> {
    serde_json::from_value(row).map_err(|e| ServiceError::Remote(format!("corrupt quiz record: {e}")))
}

fn sample_quiz() -> NewQuiz {
    use crate::models::NewQuestion;

    let question = |question: &str, options: [&str; 4]| NewQuestion {
        question: question.to_string(),
        options: options.iter().map(|s| s.to_string()).collect(),
        correct_answer: 1,
    };

    NewQuiz {
        title: "Basic Mathematics".to_string(),
        description: "Test your basic math skills".to_string(),
        questions: vec![
            question("What is 2 + 2?", ["3", "4", "5", "6"]),
            question("What is 10 × 5?", ["45", "50", "55", "60"]),
            question("What is 15 ÷ 3?", ["4", "5", "6", "7"]),
        ],
    }
}

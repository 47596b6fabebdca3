//! Trivia questions from the Open Trivia Database (`GET {base}/api.php`).
//! One request per fetch, no retries. The API signals failure two ways: the
//! HTTP status, and a numeric `response_code` in an otherwise-successful
//! body. Both surface as a `Remote` error.

use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::error::ServiceError;

const DEFAULT_BASE_URL: &str = "https://opentdb.com";

/// Difficulty filter accepted by the trivia endpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

/// Question-type filter accepted by the trivia endpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum QuestionKind {
    Multiple,
    Boolean,
}

impl QuestionKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Multiple => "multiple",
            Self::Boolean => "boolean",
        }
    }
}

/// Parameters for one trivia fetch. Unset fields are omitted from the query.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriviaRequest {
    pub amount: u8,
    pub category: Option<u32>,
    pub difficulty: Option<Difficulty>,
    pub kind: Option<QuestionKind>,
}

impl TriviaRequest {
    pub fn new(amount: u8) -> Self {
        Self {
            amount,
            ..Self::default()
        }
    }
}

/// One fetched question, as served: the correct answer is separate from the
/// incorrect ones, so display order is the client's problem.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TriviaQuestion {
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub difficulty: String,
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

impl TriviaQuestion {
    /// Every answer choice in random order, for display only. The order is
    /// unseeded and never persisted; scoring goes through `correct_answer`.
    pub fn shuffled_answers(&self) -> Vec<String> {
        let mut answers = self.incorrect_answers.clone();
        answers.push(self.correct_answer.clone());
        answers.shuffle(&mut rand::thread_rng());
        answers
    }
}

#[derive(Debug, Deserialize)]
struct TriviaResponse {
    response_code: u8,
    #[serde(default)]
    results: Vec<TriviaQuestion>,
}

/// Stateless client for the public trivia endpoint.
pub struct TriviaClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for TriviaClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TriviaClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the client at a different endpoint.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Fetch a batch of questions.
    pub async fn fetch(&self, request: &TriviaRequest) -> Result<Vec<TriviaQuestion>, ServiceError> {
        let response = self
            .client
            .get(format!("{}/api.php", self.base_url))
            .query(&query_params(request))
            .send()
            .await
            .map_err(|_| fetch_failed())?;
        if !response.status().is_success() {
            return Err(fetch_failed());
        }
        let body: TriviaResponse = response.json().await.map_err(|_| fetch_failed())?;
        questions_from(body)
    }
}

fn query_params(request: &TriviaRequest) -> Vec<(&'static str, String)> {
    let mut params = vec![("amount", request.amount.to_string())];
    if let Some(category) = request.category {
        params.push(("category", category.to_string()));
    }
    if let Some(difficulty) = request.difficulty {
        params.push(("difficulty", difficulty.as_str().to_string()));
    }
    if let Some(kind) = request.kind {
        params.push(("type", kind.as_str().to_string()));
    }
    params
}

/// A non-zero response code in the body is a failure even on HTTP 200.
fn questions_from(response: TriviaResponse) -> Result<Vec<TriviaQuestion>, ServiceError> {
    if response.response_code != 0 {
        return Err(ServiceError::Remote(format!(
            "Trivia API returned response code {}",
            response.response_code
        )));
    }
    Ok(response.results)
}

fn fetch_failed() -> ServiceError {
    ServiceError::Remote("Failed to fetch trivia questions. Please try again.".into())
}

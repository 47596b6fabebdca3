//! Word definitions from the free Dictionary API
//! (`GET {base}/entries/en/{word}`). One request per lookup, no retries,
//! no local storage. A 404 is the distinct "word not found" outcome; every
//! other failure collapses into a generic fetch error.

use serde::Deserialize;

use crate::error::ServiceError;

const DEFAULT_BASE_URL: &str = "https://api.dictionaryapi.dev/api/v2";

/// One dictionary entry for a looked-up word.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct DictionaryEntry {
    pub word: String,
    #[serde(default)]
    pub phonetics: Vec<Phonetic>,
    #[serde(default)]
    pub meanings: Vec<Meaning>,
}

/// A phonetic transcription, optionally with pronunciation audio.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Phonetic {
    pub text: Option<String>,
    pub audio: Option<String>,
}

/// Definitions grouped by part of speech.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Meaning {
    pub part_of_speech: String,
    #[serde(default)]
    pub definitions: Vec<Definition>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Definition {
    pub definition: String,
    pub example: Option<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

/// Stateless client for the public definitions endpoint.
pub struct DictionaryClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for DictionaryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DictionaryClient {
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

    /// Look up a word.
    pub async fn define(&self, word: &str) -> Result<Vec<DictionaryEntry>, ServiceError> {
        let word = word.trim();
        if word.is_empty() {
            return Err(ServiceError::Validation("Please enter a word".into()));
        }

        let url = format!("{}/entries/en/{word}", self.base_url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|_| fetch_failed())?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ServiceError::NotFound(
                "Word not found. Please check the spelling and try again.".into(),
            ));
        }
        if !response.status().is_success() {
            return Err(fetch_failed());
        }
        response.json().await.map_err(|_| fetch_failed())
    }
}

fn fetch_failed() -> ServiceError {
    ServiceError::Remote("Failed to fetch definition. Please try again.".into())
}

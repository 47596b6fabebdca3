//! Stateless clients for the two public read-only HTTP APIs.

pub mod dictionary;
pub mod trivia;

pub use dictionary::{Definition, DictionaryClient, DictionaryEntry, Meaning, Phonetic};
pub use trivia::{Difficulty, QuestionKind, TriviaClient, TriviaQuestion, TriviaRequest};

//! # SmartStudy api crate — services over a swappable record store
//!
//! Everything a frontend calls lives here, with the storage seam kept
//! behind [`store::RecordStore`] so the same call sites run against
//! [`store::MemoryStore`], [`store::LocalStore`], or [`RemoteStore`].
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | email + password identity, credential hashing, the persisted session pointer |
//! | [`notes`] | user-scoped note CRUD |
//! | [`quiz`] | quiz authoring, attempt scoring, result history, demo seeding |
//! | [`remote`] | hosted row-store client implementing the store contract |
//! | [`lookup`] | dictionary and trivia HTTP clients |
//! | [`models`] | domain records shared across services |
//! | [`session`] | explicit per-call session context |
//! | [`error`] | display-ready error taxonomy |
//!
//! A typical composition wires one store into the three services:
//!
//! ```no_run
//! use api::{AuthService, NotesService, QuizService};
//! use store::MemoryStore;
//!
//! # async fn demo() -> Result<(), api::ServiceError> {
//! let backing = MemoryStore::new();
//! let auth = AuthService::new(backing.clone());
//! let notes = NotesService::new(backing.clone());
//! let quizzes = QuizService::new(backing);
//!
//! let user = auth.signup("Ada", "ada@example.com", "secret", "secret").await?;
//! let ctx = auth.session().await;
//! quizzes.ensure_sample_quiz(&ctx).await?;
//! let _ = notes.list(&ctx).await;
//! # let _ = user;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod error;
pub mod lookup;
pub mod models;
pub mod notes;
pub mod quiz;
pub mod remote;
pub mod session;

pub use auth::AuthService;
pub use error::ServiceError;
pub use lookup::{DictionaryClient, TriviaClient, TriviaRequest};
pub use models::{
    NewNote, NewQuestion, NewQuiz, Note, NoteUpdate, ProfileUpdate, Quiz, QuizQuestion,
    QuizResult, User,
};
pub use notes::NotesService;
pub use quiz::QuizService;
pub use remote::RemoteStore;
pub use session::SessionContext;

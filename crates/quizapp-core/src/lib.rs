//! quizapp-core: Quiz session controller, data model, and scoring.
//!
//! This crate defines the question model, the source and view traits, and
//! the state machine that runs a timed multiple-choice session on top of
//! them.

pub mod controller;
pub mod entities;
pub mod error;
pub mod fallback;
pub mod model;
pub mod shuffle;
pub mod timer;
pub mod traits;
pub mod view;

pub use controller::{Action, QuizController, Resolution};
pub use error::{FetchError, QuizError};
pub use model::{Question, QuizSettings, SessionSummary};

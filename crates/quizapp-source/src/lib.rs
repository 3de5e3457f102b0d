//! quizapp-source: Question source implementations.
//!
//! Implements the `QuestionSource` trait for the Open Trivia DB API and for
//! fixed in-memory question lists, and loads the quizapp configuration.

pub mod config;
pub mod fixed;
pub mod mock;
pub mod opentdb;

pub use config::{create_offline_source, create_source, load_config, QuizappConfig, SourceConfig};
pub use fixed::StaticSource;
pub use opentdb::OpenTdbSource;

//! # live-quiz
//!
//! A live classroom quiz server. An owner creates a quiz over the realtime
//! channel and shares its six character code; students join with the code
//! and answer question by question while the server keeps their progress.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use live_quiz::{Config, QuizError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     live_quiz::server::run(Config::default()).await
//! }
//! ```

pub mod config;
pub mod data;
pub mod models;
pub mod protocol;
pub mod server;

use std::io;

use thiserror::Error;

pub use config::Config;
pub use data::{LoadError, load_quiz_from_json};
pub use models::{ProgressRecord, Question, Quiz, QuizDraft};

/// Error type for running the quiz server.
#[derive(Debug, Error)]
pub enum QuizError {
    /// Error loading a quiz from file.
    #[error("failed to load quiz: {0}")]
    Load(#[from] LoadError),
    /// IO error while serving.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

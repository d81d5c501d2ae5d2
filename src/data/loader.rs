use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::models::{Question, QuizDefinition, QuizDraft};

/// Error while loading a quiz definition from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{path} is not a usable quiz: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// A quiz file is either a full draft or a bare list of questions.
#[derive(Deserialize)]
#[serde(untagged)]
enum QuizFile {
    Draft(QuizDraft),
    Questions(Vec<Question>),
}

impl From<QuizFile> for QuizDraft {
    fn from(file: QuizFile) -> Self {
        match file {
            QuizFile::Draft(draft) => draft,
            QuizFile::Questions(questions) => QuizDraft {
                title: None,
                questions,
            },
        }
    }
}

/// Parses a quiz definition from a JSON string.
pub fn parse_quiz(json: &str) -> Result<QuizDraft, serde_json::Error> {
    let file: QuizFile = serde_json::from_str(json)?;
    Ok(file.into())
}

/// Loads and validates a quiz definition from a JSON file.
pub fn load_quiz_from_json<P: AsRef<Path>>(path: P) -> Result<QuizDefinition, LoadError> {
    let path = path.as_ref();

    let json_content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let draft = parse_quiz(&json_content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    draft.into_definition().map_err(|reason| LoadError::Invalid {
        path: path.to_path_buf(),
        reason,
    })
}

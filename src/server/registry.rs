//! Session registry: quiz code to quiz definition.

use std::collections::HashMap;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use crate::models::{CODE_LENGTH, Question, Quiz};

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// All quizzes created since startup. Quizzes are never removed.
pub struct SessionRegistry {
    quizzes: HashMap<String, Quiz>,
    rng: StdRng,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Registry with a deterministic code sequence.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            quizzes: HashMap::new(),
            rng,
        }
    }

    /// Stores a new quiz under a fresh code and returns the code.
    pub fn create_quiz(&mut self, title: String, questions: Vec<Question>, owner: Uuid) -> String {
        let code = self.unused_code();
        let quiz = Quiz {
            code: code.clone(),
            title,
            questions,
            created_at: Utc::now(),
            owner,
        };
        self.quizzes.insert(code.clone(), quiz);
        code
    }

    pub fn get_quiz(&self, code: &str) -> Option<&Quiz> {
        self.quizzes.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.quizzes.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.quizzes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quizzes.is_empty()
    }

    // Draws until the code is not taken.
    fn unused_code(&mut self) -> String {
        loop {
            let code = self.random_code();
            if !self.quizzes.contains_key(&code) {
                return code;
            }
            tracing::debug!("Quiz code {} already taken, drawing again", code);
        }
    }

    fn random_code(&mut self) -> String {
        (0..CODE_LENGTH)
            .map(|_| CODE_ALPHABET[self.rng.random_range(0..CODE_ALPHABET.len())] as char)
            .collect()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

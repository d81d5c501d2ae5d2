mod progress;
mod question;
mod quiz;

pub use progress::{AnswerEntry, ProgressRecord};
pub use question::{Question, QuestionView};
pub use quiz::{
    CODE_LENGTH, DEFAULT_TITLE, Quiz, QuizDefinition, QuizDraft, is_valid_code, normalize_code,
    share_url,
};

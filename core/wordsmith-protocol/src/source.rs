use alloc::string::{String, ToString};
use alloc::vec;
use core::fmt;
use tracing::warn;

use crate::model::{Morpheme, Question};
use crate::morphology::{Difficulty, Role};

/// Hint returned whenever no root can be described.
pub const GENERIC_HINT: &str = "Focus on the core part of the word: the root carries its main meaning.";

/// Why a question or hint could not be produced by a [`QuestionSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The backing service could not be reached or refused the request.
    Unavailable(String),
    /// The backing service answered with something that is not a valid question or hint.
    Malformed(String),
    /// The catalog could not produce a question for the tier.
    Catalog(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Unavailable(msg) => write!(f, "question source unavailable: {}", msg),
            SourceError::Malformed(msg) => write!(f, "malformed response: {}", msg),
            SourceError::Catalog(msg) => write!(f, "catalog error: {}", msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SourceError {}

/// Where rounds come from: the static catalog or an external generative service.
pub trait QuestionSource {
    /// Produce the next question. `previous_answer` is a request to avoid an
    /// immediate repeat; sources may ignore it.
    fn request_question(
        &mut self,
        difficulty: Difficulty,
        previous_answer: Option<&str>,
    ) -> Result<Question, SourceError>;

    fn request_hint(&mut self, parts: &[String]) -> Result<String, SourceError>;
}

/// Hard-coded question used when a source fails, so a round can always start.
pub fn fallback_question() -> Question {
    let m = |text: &str, meaning: &str, role: Role| Morpheme::new(text, meaning, role);
    Question {
        answer: "unhappy".to_string(),
        definition: "Not happy; sad.".to_string(),
        parts: vec!["un-".to_string(), "happy".to_string()],
        bank: vec![
            m("-ness", "state or quality of", Role::Suffix),
            m("happy", "feeling joy", Role::Root),
            m("re-", "again", Role::Prefix),
            m("kind", "gentle and caring", Role::Root),
            m("un-", "not", Role::Prefix),
            m("-ful", "full of", Role::Suffix),
            m("dis-", "apart, not", Role::Prefix),
            m("-less", "without", Role::Suffix),
        ],
    }
}

/// Asks `source` for a question and substitutes the fixed fallback on failure.
pub fn question_or_fallback<S: QuestionSource + ?Sized>(
    source: &mut S,
    difficulty: Difficulty,
    previous_answer: Option<&str>,
) -> Question {
    match source.request_question(difficulty, previous_answer) {
        Ok(question) => question,
        Err(err) => {
            warn!(%err, %difficulty, "question source failed, using fallback question");
            fallback_question()
        }
    }
}

/// Asks `source` for a hint and substitutes the generic hint on failure.
pub fn hint_or_fallback<S: QuestionSource + ?Sized>(source: &mut S, parts: &[String]) -> String {
    match source.request_hint(parts) {
        Ok(hint) => hint,
        Err(err) => {
            warn!(%err, "hint source failed, using generic hint");
            GENERIC_HINT.to_string()
        }
    }
}

//! Question source backed by an external text-generation service.
//!
//! The service itself is out of scope: it is reached through [`Completion`],
//! which takes a prompt and returns raw text. Everything that comes back is
//! schema-checked by [`crate::response`] before it becomes a [`Question`].
//! This source does not try to avoid repeating the previous answer.

use wordsmith_protocol::{Difficulty, Question, QuestionSource, SourceError, BANK_SIZE};

use crate::response::{parse_hint_response, parse_question_response};

/// Prompt in, raw completion text out.
pub trait Completion {
    fn complete(&mut self, prompt: &str) -> Result<String, SourceError>;
}

impl<F> Completion for F
where
    F: FnMut(&str) -> Result<String, SourceError>,
{
    fn complete(&mut self, prompt: &str) -> Result<String, SourceError> {
        self(prompt)
    }
}

pub struct GenerativeSource<C> {
    backend: C,
}

impl<C: Completion> GenerativeSource<C> {
    pub fn new(backend: C) -> Self {
        Self { backend }
    }
}

impl<C: Completion> QuestionSource for GenerativeSource<C> {
    fn request_question(
        &mut self,
        difficulty: Difficulty,
        _previous_answer: Option<&str>,
    ) -> Result<Question, SourceError> {
        let raw = self.backend.complete(&question_prompt(difficulty))?;
        parse_question_response(&raw).map_err(|e| SourceError::Malformed(e.to_string()))
    }

    fn request_hint(&mut self, parts: &[String]) -> Result<String, SourceError> {
        let raw = self.backend.complete(&hint_prompt(parts))?;
        parse_hint_response(&raw).map_err(|e| SourceError::Malformed(e.to_string()))
    }
}

pub fn question_prompt(difficulty: Difficulty) -> String {
    let level = match difficulty {
        Difficulty::Easy => "a common two-part English word suitable for young readers",
        Difficulty::Medium => "an everyday English word built from a prefix, a root and a suffix",
        Difficulty::Hard => "an advanced English word built from three or more morphemes",
    };
    format!(
        "Pick {level}. Respond with JSON only, shaped as \
         {{\"answer\": string, \"definition\": string, \"parts\": [string], \
         \"bank\": [{{\"text\": string, \"meaning\": string, \"role\": \"prefix\" | \"root\" | \"suffix\"}}]}}. \
         \"parts\" lists the word's morphemes in order, prefixes written like \"re-\" and suffixes like \"-ion\". \
         \"bank\" has exactly {BANK_SIZE} entries: every part plus plausible distractor morphemes, with no duplicates."
    )
}

pub fn hint_prompt(parts: &[String]) -> String {
    format!(
        "A player is building a word from the morphemes {}. In one or two short sentences, \
         explain what the root means without revealing the whole word. Respond with the hint text only.",
        parts.iter().map(|p| format!("'{}'", p)).collect::<Vec<_>>().join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordsmith_protocol::{fallback_question, question_or_fallback};

    const PAYLOAD: &str = r#"```json
{"answer": "transport", "definition": "To carry across.", "parts": ["trans-", "port"],
 "bank": [{"text": "port", "meaning": "carry", "role": "root"},
          {"text": "trans-", "meaning": "across", "role": "prefix"},
          {"text": "-er", "meaning": "one who", "role": "suffix"}]}
```"#;

    #[test]
    fn test_prompt_reaches_backend_and_response_is_validated() {
        let mut prompts = Vec::new();
        let backend = |prompt: &str| {
            prompts.push(prompt.to_string());
            Ok::<_, SourceError>(PAYLOAD.to_string())
        };
        let mut source = GenerativeSource::new(backend);
        let q = source.request_question(Difficulty::Medium, Some("transport")).unwrap();
        assert_eq!(q.answer, "transport");
        assert_eq!(q.parts, ["trans-", "port"]);
        drop(source);
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("prefix, a root and a suffix"));
    }

    #[test]
    fn test_malformed_response_maps_to_source_error() {
        let mut source = GenerativeSource::new(|_: &str| Ok::<_, SourceError>(String::new()));
        assert!(matches!(
            source.request_question(Difficulty::Easy, None),
            Err(SourceError::Malformed(_))
        ));
        assert_eq!(question_or_fallback(&mut source, Difficulty::Easy, None), fallback_question());
    }

    #[test]
    fn test_hint_round() {
        let mut source = GenerativeSource::new(|prompt: &str| {
            assert!(prompt.contains("'act'"));
            Ok::<_, SourceError>("The root 'act' means to do.".to_string())
        });
        let hint = source.request_hint(&["act".to_string()]).unwrap();
        assert_eq!(hint, "The root 'act' means to do.");
    }

    #[test]
    fn test_backend_error_passes_through() {
        let mut source =
            GenerativeSource::new(|_: &str| Err::<String, _>(SourceError::Unavailable("timeout".to_string())));
        assert_eq!(
            source.request_hint(&[]),
            Err(SourceError::Unavailable("timeout".to_string()))
        );
    }
}

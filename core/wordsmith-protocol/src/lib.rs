#![no_std] // Shared with the wasm bridge

extern crate alloc;

// Enable std if the feature is active (for tests/tools)
#[cfg(feature = "std")]
extern crate std;

pub mod ids;
pub mod morphology;

// Re-export core types for convenience
pub use ids::TileId;
pub use morphology::*;

pub mod model;
pub use model::*;

pub mod source;
pub use source::{
    fallback_question, hint_or_fallback, question_or_fallback, QuestionSource, SourceError, GENERIC_HINT,
};

use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// Bank size every generated question aims for.
pub const BANK_SIZE: usize = 8;

/// True when a surface string is written as an affix (`"re-"`, `"-ion"`).
pub fn looks_like_affix(text: &str) -> bool {
    text.starts_with('-') || text.ends_with('-')
}

/// Drops surface strings written as affixes before a hint is requested.
pub fn root_candidates<S: AsRef<str>>(parts: &[S]) -> Vec<String> {
    parts
        .iter()
        .map(|p| p.as_ref())
        .filter(|p| !looks_like_affix(p))
        .map(str::to_string)
        .collect()
}

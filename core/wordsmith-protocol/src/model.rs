use rkyv::{Archive, Deserialize, Serialize};
use crate::morphology::{Difficulty, Role};
use alloc::string::String;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// Smallest meaningful unit of a word. Identity is the surface string (`"re-"`, `"act"`, `"-ion"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Morpheme {
    pub text: String,
    pub meaning: String,
    pub role: Role,
}

impl Morpheme {
    pub fn new(text: impl Into<String>, meaning: impl Into<String>, role: Role) -> Self {
        Self { text: text.into(), meaning: meaning.into(), role }
    }
}

/// A target word of one tier.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct WordEntry {
    pub answer: String,
    pub definition: String,
    /// Ordered morpheme surface strings, each expected to exist in the morpheme catalog.
    #[cfg_attr(feature = "serde", serde(alias = "parts"))]
    pub decomposition: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct WordCatalog {
    #[cfg_attr(feature = "serde", serde(default))]
    pub easy: Vec<WordEntry>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub medium: Vec<WordEntry>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub hard: Vec<WordEntry>,
}

impl WordCatalog {
    pub fn tier(&self, difficulty: Difficulty) -> &[WordEntry] {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }
}

/// On-disk shape of a catalog, both as JSON and as a compiled rkyv archive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct CatalogFile {
    pub version: u32,
    pub morphemes: Vec<Morpheme>,
    pub words: WordCatalog,
}

/// One playable round. Produced fresh per round and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Question {
    pub answer: String,
    pub definition: String,
    /// The correct morphemes, in order.
    pub parts: Vec<String>,
    /// Shuffled tiles: every part plus distractors.
    pub bank: Vec<Morpheme>,
}

impl Question {
    /// Bank entries that are not part of the answer.
    pub fn distractors(&self) -> impl Iterator<Item = &Morpheme> {
        self.bank.iter().filter(move |m| !self.parts.iter().any(|p| *p == m.text))
    }
}

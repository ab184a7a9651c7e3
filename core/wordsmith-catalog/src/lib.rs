//! Reference data for the game: every known morpheme and, per difficulty
//! tier, the target words with their ordered decompositions.
//!
//! A [`Catalog`] is built once (from JSON or a compiled rkyv archive) and is
//! read-only afterwards; the generator and hint composer share its
//! [`CatalogIndex`].

pub mod index;
pub mod validate;

pub use index::CatalogIndex;

use rkyv::AlignedVec;
use thiserror::Error;
use wordsmith_protocol::{CatalogFile, Difficulty, Morpheme, WordCatalog, WordEntry};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("malformed catalog JSON: {0}")]
    Json(String),
    #[error("malformed catalog archive: {0}")]
    Archive(String),
    #[error("morpheme '{0}' is defined more than once")]
    DuplicateMorpheme(String),
    #[error("{difficulty} tier lists '{answer}' more than once")]
    DuplicateAnswer { difficulty: Difficulty, answer: String },
    #[error("{difficulty} word '{answer}' has an empty decomposition")]
    EmptyDecomposition { difficulty: Difficulty, answer: String },
    #[error("{difficulty} word '{answer}' references unknown morpheme '{morpheme}'")]
    UnknownMorpheme {
        difficulty: Difficulty,
        answer: String,
        morpheme: String,
    },
    #[error("{0} tier has no words")]
    EmptyTier(Difficulty),
}

/// The loaded morpheme and word catalogs.
#[derive(Debug, Clone)]
pub struct Catalog {
    version: u32,
    index: CatalogIndex,
    words: WordCatalog,
}

impl Catalog {
    /// Builds a catalog without integrity checks. Bad references stay in the
    /// word lists and are filtered at generation time.
    pub fn build(file: CatalogFile) -> Self {
        Self {
            version: file.version,
            index: CatalogIndex::new(file.morphemes),
            words: file.words,
        }
    }

    /// Builds a catalog, failing on the first integrity problem.
    pub fn validated(file: CatalogFile) -> Result<Self, CatalogError> {
        if let Some(issue) = validate::issues(&file).into_iter().next() {
            return Err(issue);
        }
        Ok(Self::build(file))
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Self::validated(parse_json(json)?)
    }

    /// Loads a compiled archive (see [`to_archive`]). The bytes are checked before use.
    pub fn from_archive(bytes: &[u8]) -> Result<Self, CatalogError> {
        // Archives must be read from an aligned buffer.
        let mut aligned = AlignedVec::with_capacity(bytes.len());
        aligned.extend_from_slice(bytes);
        let file = rkyv::from_bytes::<CatalogFile>(&aligned)
            .map_err(|e| CatalogError::Archive(e.to_string()))?;
        Self::validated(file)
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn index(&self) -> &CatalogIndex {
        &self.index
    }

    pub fn lookup(&self, text: &str) -> Option<&Morpheme> {
        self.index.lookup(text)
    }

    pub fn morphemes(&self) -> &[Morpheme] {
        self.index.morphemes()
    }

    pub fn tier(&self, difficulty: Difficulty) -> &[WordEntry] {
        self.words.tier(difficulty)
    }

    pub fn words(&self) -> &WordCatalog {
        &self.words
    }

    pub fn to_file(&self) -> CatalogFile {
        CatalogFile {
            version: self.version,
            morphemes: self.index.morphemes().to_vec(),
            words: self.words.clone(),
        }
    }
}

pub fn parse_json(json: &str) -> Result<CatalogFile, CatalogError> {
    serde_json::from_str(json).map_err(|e| CatalogError::Json(e.to_string()))
}

/// Compiles a catalog file to rkyv bytes.
pub fn to_archive(file: &CatalogFile) -> Result<AlignedVec, CatalogError> {
    rkyv::to_bytes::<_, 4096>(file).map_err(|e| CatalogError::Archive(e.to_string()))
}

/// The catalog shipped with the game, embedded at compile time.
pub fn default_catalog() -> Result<Catalog, CatalogError> {
    Catalog::from_json(include_str!("../../../data/catalog.json"))
}

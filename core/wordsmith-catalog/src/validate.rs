use std::collections::HashSet;

use wordsmith_protocol::{CatalogFile, Difficulty};

use crate::CatalogError;

/// Every integrity problem in a catalog file, in a stable order: morphemes first, then tiers.
pub fn issues(file: &CatalogFile) -> Vec<CatalogError> {
    let mut found = Vec::new();

    let mut known = HashSet::new();
    for morpheme in &file.morphemes {
        if !known.insert(morpheme.text.as_str()) {
            found.push(CatalogError::DuplicateMorpheme(morpheme.text.clone()));
        }
    }

    for difficulty in Difficulty::ALL {
        let tier = file.words.tier(difficulty);
        if tier.is_empty() {
            found.push(CatalogError::EmptyTier(difficulty));
            continue;
        }

        let mut answers = HashSet::new();
        for entry in tier {
            if !answers.insert(entry.answer.as_str()) {
                found.push(CatalogError::DuplicateAnswer {
                    difficulty,
                    answer: entry.answer.clone(),
                });
            }
            if entry.decomposition.is_empty() {
                found.push(CatalogError::EmptyDecomposition {
                    difficulty,
                    answer: entry.answer.clone(),
                });
            }
            for part in &entry.decomposition {
                if !known.contains(part.as_str()) {
                    found.push(CatalogError::UnknownMorpheme {
                        difficulty,
                        answer: entry.answer.clone(),
                        morpheme: part.clone(),
                    });
                }
            }
        }
    }

    found
}

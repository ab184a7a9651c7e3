use std::collections::HashMap;

use wordsmith_protocol::{Morpheme, RoleSet};

/// Surface string -> morpheme lookup, built once and never mutated.
///
/// Iteration order is catalog order, so anything derived from it (the
/// distractor pool in particular) is reproducible for a given seed.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    morphemes: Vec<Morpheme>,
    by_text: HashMap<String, usize>,
}

impl CatalogIndex {
    /// Builds the index. When a surface string appears twice the first
    /// definition wins; load-time validation reports the duplicate.
    pub fn new(morphemes: impl IntoIterator<Item = Morpheme>) -> Self {
        let mut index = Self::default();
        for morpheme in morphemes {
            if index.by_text.contains_key(&morpheme.text) {
                continue;
            }
            index.by_text.insert(morpheme.text.clone(), index.morphemes.len());
            index.morphemes.push(morpheme);
        }
        index
    }

    pub fn lookup(&self, text: &str) -> Option<&Morpheme> {
        self.by_text.get(text).map(|&i| &self.morphemes[i])
    }

    pub fn contains(&self, text: &str) -> bool {
        self.by_text.contains_key(text)
    }

    /// Resolves surface strings in order, silently dropping the ones the catalog does not know.
    pub fn resolve<S: AsRef<str>>(&self, parts: &[S]) -> Vec<&Morpheme> {
        parts.iter().filter_map(|p| self.lookup(p.as_ref())).collect()
    }

    /// The surface strings from `parts` that do not resolve.
    pub fn unresolved<'p, S: AsRef<str>>(&self, parts: &'p [S]) -> Vec<&'p str> {
        parts
            .iter()
            .map(|p| p.as_ref())
            .filter(|p| !self.contains(p))
            .collect()
    }

    pub fn morphemes(&self) -> &[Morpheme] {
        &self.morphemes
    }

    pub fn by_roles(&self, roles: RoleSet) -> impl Iterator<Item = &Morpheme> + '_ {
        self.morphemes.iter().filter(move |m| roles.has(m.role))
    }

    pub fn len(&self) -> usize {
        self.morphemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.morphemes.is_empty()
    }
}

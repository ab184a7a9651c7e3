use rand::Rng;
use wordsmith_catalog::Catalog;
use wordsmith_protocol::{Difficulty, Question, QuestionSource, SourceError};

use crate::{compose_hint, GeneratorConfig, QuestionGenerator};

/// The default source: questions and hints straight from the static catalog.
pub struct CatalogSource<'c, R> {
    generator: QuestionGenerator<'c>,
    rng: R,
}

impl<'c, R: Rng> CatalogSource<'c, R> {
    pub fn new(catalog: &'c Catalog, rng: R) -> Self {
        Self::with_config(catalog, GeneratorConfig::default(), rng)
    }

    pub fn with_config(catalog: &'c Catalog, config: GeneratorConfig, rng: R) -> Self {
        Self {
            generator: QuestionGenerator::with_config(catalog, config),
            rng,
        }
    }
}

impl<R: Rng> QuestionSource for CatalogSource<'_, R> {
    fn request_question(
        &mut self,
        difficulty: Difficulty,
        previous_answer: Option<&str>,
    ) -> Result<Question, SourceError> {
        self.generator
            .generate(&mut self.rng, difficulty, previous_answer)
            .map_err(|e| SourceError::Catalog(e.to_string()))
    }

    fn request_hint(&mut self, parts: &[String]) -> Result<String, SourceError> {
        Ok(compose_hint(self.generator.catalog().index(), parts))
    }
}

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wordsmith_board::components::Zone;
use wordsmith_board::systems::check::Verdict;
use wordsmith_board::Board;
use wordsmith_catalog::{default_catalog, Catalog};
use wordsmith_generator::{compose_hint, CatalogSource};
use wordsmith_protocol::{question_or_fallback, root_candidates, Difficulty, Question};

#[wasm_bindgen]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Result of checking an assembled word, as sent back to JavaScript
#[derive(Serialize)]
pub struct CheckReport {
    pub verdict: &'static str,
    pub word: String,
}

/// The game core running in the browser. Randomness is seeded from JS.
#[wasm_bindgen]
pub struct WordsmithEngine {
    catalog: Catalog,
    rng: StdRng,
    previous_answer: Option<String>,
}

#[wasm_bindgen]
impl WordsmithEngine {
    /// Loads a compiled catalog archive (fetched by JS).
    #[wasm_bindgen(constructor)]
    pub fn new(data: Vec<u8>, seed: u64) -> Result<WordsmithEngine, JsValue> {
        let catalog = Catalog::from_archive(&data).map_err(|e| to_js(&e))?;
        Ok(Self::with_catalog(catalog, seed))
    }

    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str, seed: u64) -> Result<WordsmithEngine, JsValue> {
        let catalog = Catalog::from_json(json).map_err(|e| to_js(&e))?;
        Ok(Self::with_catalog(catalog, seed))
    }

    /// Uses the catalog compiled into the module.
    pub fn embedded(seed: u64) -> Result<WordsmithEngine, JsValue> {
        let catalog = default_catalog().map_err(|e| to_js(&e))?;
        Ok(Self::with_catalog(catalog, seed))
    }

    /// Next question for `difficulty` ("Easy", "Medium" or "Hard"), never the
    /// same answer twice in a row when the tier allows it.
    pub fn generate(&mut self, difficulty: &str) -> Result<JsValue, JsValue> {
        let difficulty = difficulty.parse::<Difficulty>().map_err(|e| to_js(&e))?;
        let question = self.next_question(difficulty);
        serde_wasm_bindgen::to_value(&question).map_err(JsValue::from)
    }

    /// Hint for a question's parts (`string[]`). Affixes are dropped first.
    pub fn hint(&self, parts: JsValue) -> Result<String, JsValue> {
        let parts: Vec<String> = serde_wasm_bindgen::from_value(parts)?;
        Ok(compose_hint(self.catalog.index(), &root_candidates(&parts)))
    }

    /// Checks `assembled` (`string[]`, the answer row left to right) against a
    /// question previously returned by `generate`.
    pub fn check(&self, question: JsValue, assembled: JsValue) -> Result<JsValue, JsValue> {
        let question: Question = serde_wasm_bindgen::from_value(question)?;
        let assembled: Vec<String> = serde_wasm_bindgen::from_value(assembled)?;
        let board = assemble(&question, &assembled)?;

        let verdict = match board.check(&question) {
            Verdict::Correct => "correct",
            Verdict::Incorrect { .. } => "incorrect",
            Verdict::Incomplete => "incomplete",
        };
        let report = CheckReport {
            verdict,
            word: board.assembled_word(),
        };
        serde_wasm_bindgen::to_value(&report).map_err(JsValue::from)
    }

    #[wasm_bindgen(js_name = catalogVersion)]
    pub fn catalog_version(&self) -> u32 {
        self.catalog.version()
    }
}

impl WordsmithEngine {
    fn with_catalog(catalog: Catalog, seed: u64) -> Self {
        Self {
            catalog,
            rng: StdRng::seed_from_u64(seed),
            previous_answer: None,
        }
    }

    fn next_question(&mut self, difficulty: Difficulty) -> Question {
        let mut source = CatalogSource::new(&self.catalog, &mut self.rng);
        let question = question_or_fallback(&mut source, difficulty, self.previous_answer.as_deref());
        self.previous_answer = Some(question.answer.clone());
        question
    }
}

/// Replays the player's row onto a fresh board: each surface takes the first
/// bank tile with that text.
fn assemble(question: &Question, assembled: &[String]) -> Result<Board, JsValue> {
    let mut board = Board::load(question);
    for text in assembled {
        let id = board
            .tiles(Zone::Bank)
            .into_iter()
            .find(|(_, m)| &m.text == text)
            .map(|(id, _)| id)
            .ok_or_else(|| JsValue::from_str(&format!("'{}' is not in the bank", text)))?;
        board.move_to(id, Zone::Answer).map_err(|e| to_js(&e))?;
    }
    Ok(board)
}

fn to_js(err: &dyn std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordsmith_protocol::{fallback_question, CatalogFile, WordCatalog};

    #[test]
    fn test_rounds_do_not_repeat_back_to_back() {
        let mut engine = WordsmithEngine::with_catalog(default_catalog().unwrap(), 11);
        let mut previous = engine.next_question(Difficulty::Medium).answer;
        for _ in 0..20 {
            let next = engine.next_question(Difficulty::Medium).answer;
            assert_ne!(next, previous);
            previous = next;
        }
    }

    #[test]
    fn test_empty_tier_serves_fallback_question() {
        let catalog = Catalog::build(CatalogFile {
            version: 1,
            morphemes: vec![],
            words: WordCatalog::default(),
        });
        let mut engine = WordsmithEngine::with_catalog(catalog, 0);
        assert_eq!(engine.next_question(Difficulty::Easy), fallback_question());
        assert_eq!(engine.previous_answer.as_deref(), Some("unhappy"));
    }

    #[test]
    fn test_assemble_replays_row() {
        let question = fallback_question();
        let row = vec!["un-".to_string(), "happy".to_string()];
        let board = assemble(&question, &row).unwrap();
        assert_eq!(board.check(&question), Verdict::Correct);
        assert_eq!(board.assembled_word(), "unhappy");
        assert_eq!(board.order(Zone::Bank).len(), question.bank.len() - 2);
    }
}

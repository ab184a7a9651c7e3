//! Round controllers driving the loading -> presenting -> feedback -> next cycle.
//!
//! Both controllers ask their [`QuestionSource`] for rounds and hints and
//! substitute the fixed fallbacks when it fails, so a session never stalls.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use wordsmith_protocol::{
    hint_or_fallback, question_or_fallback, root_candidates, Difficulty, Question, QuestionSource,
};

use crate::systems::check::Verdict;
use crate::{Board, BoardError};

/// Key the challenge high score is stored under.
pub const HIGH_SCORE_KEY: &str = "wordsmith.high_score";

static FINISHED: Phase = Phase::Finished;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Presenting,
    Feedback(Verdict),
    Finished,
}

/// Single-integer persistence for the challenge high score.
pub trait HighScoreStore {
    fn load(&self, key: &str) -> Option<u32>;
    fn save(&mut self, key: &str, value: u32);
}

#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    values: HashMap<String, u32>,
}

impl HighScoreStore for MemoryScoreStore {
    fn load(&self, key: &str) -> Option<u32> {
        self.values.get(key).copied()
    }

    fn save(&mut self, key: &str, value: u32) {
        self.values.insert(key.to_string(), value);
    }
}

/// Untimed play: one question after another, unlimited hints and retries.
pub struct PracticeSession<S> {
    source: S,
    difficulty: Difficulty,
    question: Option<Question>,
    board: Board,
    phase: Phase,
    rounds: u32,
    solved: u32,
}

impl<S: QuestionSource> PracticeSession<S> {
    pub fn new(source: S, difficulty: Difficulty) -> Self {
        Self {
            source,
            difficulty,
            question: None,
            board: Board::new(),
            phase: Phase::Loading,
            rounds: 0,
            solved: 0,
        }
    }

    /// Takes effect from the next round.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Starts a new round, asking the source not to repeat the last answer.
    pub fn next_round(&mut self) -> &Question {
        self.phase = Phase::Loading;
        let previous = self.question.take().map(|q| q.answer);
        let question = question_or_fallback(&mut self.source, self.difficulty, previous.as_deref());
        debug!(answer = %question.answer, difficulty = %self.difficulty, "round started");

        self.board = Board::load(&question);
        self.rounds += 1;
        self.phase = Phase::Presenting;
        self.question.insert(question)
    }

    /// Checks the answer row. An empty row leaves the round open.
    pub fn submit(&mut self) -> Result<Verdict, BoardError> {
        if self.phase != Phase::Presenting {
            return Err(BoardError::NoRound);
        }
        let question = self.question.as_ref().ok_or(BoardError::NoRound)?;
        let verdict = self.board.check(question);
        if verdict == Verdict::Incomplete {
            return Ok(verdict);
        }
        if verdict.is_correct() {
            self.solved += 1;
        }
        debug!(?verdict, "round checked");
        self.phase = Phase::Feedback(verdict.clone());
        Ok(verdict)
    }

    /// Back to the same round after a wrong answer.
    pub fn retry(&mut self) -> Result<(), BoardError> {
        match self.phase {
            Phase::Feedback(Verdict::Incorrect { .. }) => {
                self.board.clear_answer()?;
                self.phase = Phase::Presenting;
                Ok(())
            }
            _ => Err(BoardError::NoRound),
        }
    }

    /// Hint about the current word's root(s). Affix-looking parts are not sent.
    pub fn hint(&mut self) -> Result<String, BoardError> {
        let question = self.question.as_ref().ok_or(BoardError::NoRound)?;
        let candidates = root_candidates(&question.parts);
        Ok(hint_or_fallback(&mut self.source, &candidates))
    }

    pub fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The drag-and-drop layer moves and reorders tiles through this.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn solved(&self) -> u32 {
        self.solved
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChallengeConfig {
    pub duration_secs: u64,
    pub points_easy: u32,
    pub points_medium: u32,
    pub points_hard: u32,
    /// Taken off a round's points for every hint used in it.
    pub hint_penalty: u32,
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            duration_secs: 60,
            points_easy: 10,
            points_medium: 20,
            points_hard: 30,
            hint_penalty: 5,
        }
    }
}

impl ChallengeConfig {
    pub fn points(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Easy => self.points_easy,
            Difficulty::Medium => self.points_medium,
            Difficulty::Hard => self.points_hard,
        }
    }
}

/// Timed play with scoring, hint penalties and a persisted high score.
pub struct ChallengeSession<S, H> {
    round: PracticeSession<S>,
    store: H,
    config: ChallengeConfig,
    remaining: Duration,
    score: u32,
    high_score: u32,
    hints_this_round: u32,
    hints_used: u32,
    new_high_score: bool,
    finished: bool,
}

impl<S: QuestionSource, H: HighScoreStore> ChallengeSession<S, H> {
    pub fn new(source: S, difficulty: Difficulty, store: H, config: ChallengeConfig) -> Self {
        let high_score = store.load(HIGH_SCORE_KEY).unwrap_or(0);
        Self {
            round: PracticeSession::new(source, difficulty),
            store,
            config,
            remaining: Duration::from_secs(config.duration_secs),
            score: 0,
            high_score,
            hints_this_round: 0,
            hints_used: 0,
            new_high_score: false,
            finished: false,
        }
    }

    /// Resets the clock and score and presents the first round.
    pub fn start(&mut self) -> &Question {
        self.remaining = Duration::from_secs(self.config.duration_secs);
        self.score = 0;
        self.hints_used = 0;
        self.new_high_score = false;
        self.finished = false;
        self.next_round()
    }

    pub fn next_round(&mut self) -> &Question {
        self.hints_this_round = 0;
        self.round.next_round()
    }

    /// Advances the countdown; the session finishes when it reaches zero.
    pub fn tick(&mut self, elapsed: Duration) -> &Phase {
        if !self.finished {
            self.remaining = self.remaining.saturating_sub(elapsed);
            if self.remaining.is_zero() {
                self.finish();
            }
        }
        self.phase()
    }

    pub fn submit(&mut self) -> Result<Verdict, BoardError> {
        if self.finished {
            return Err(BoardError::NoRound);
        }
        let verdict = self.round.submit()?;
        if verdict.is_correct() {
            let penalty = self.config.hint_penalty.saturating_mul(self.hints_this_round);
            self.score += self.config.points(self.round.difficulty()).saturating_sub(penalty);
        }
        Ok(verdict)
    }

    pub fn retry(&mut self) -> Result<(), BoardError> {
        if self.finished {
            return Err(BoardError::NoRound);
        }
        self.round.retry()
    }

    pub fn hint(&mut self) -> Result<String, BoardError> {
        if self.finished {
            return Err(BoardError::NoRound);
        }
        let hint = self.round.hint()?;
        self.hints_this_round += 1;
        self.hints_used += 1;
        Ok(hint)
    }

    /// Ends the session now and records a new high score if one was set.
    pub fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        if self.score > self.high_score {
            info!(score = self.score, previous = self.high_score, "new high score");
            self.high_score = self.score;
            self.new_high_score = true;
            self.store.save(HIGH_SCORE_KEY, self.score);
        }
    }

    pub fn phase(&self) -> &Phase {
        if self.finished {
            &FINISHED
        } else {
            self.round.phase()
        }
    }

    pub fn board_mut(&mut self) -> &mut Board {
        self.round.board_mut()
    }

    pub fn board(&self) -> &Board {
        self.round.board()
    }

    pub fn question(&self) -> Option<&Question> {
        self.round.question()
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn is_new_high_score(&self) -> bool {
        self.new_high_score
    }

    pub fn hints_used(&self) -> u32 {
        self.hints_used
    }

    pub fn store(&self) -> &H {
        &self.store
    }
}

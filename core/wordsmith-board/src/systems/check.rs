use hecs::World;
use wordsmith_protocol::Question;
use crate::components::{Placement, Tile, Zone};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Nothing has been placed yet
    Incomplete,
    Correct,
    Incorrect { assembled: Vec<String> },
}

impl Verdict {
    pub fn is_correct(&self) -> bool {
        matches!(self, Verdict::Correct)
    }
}

/// Answer-zone surfaces in slot order.
pub fn answer_parts(world: &World) -> Vec<String> {
    let mut placed: Vec<(u32, String)> = world
        .query::<(&Tile, &Placement)>()
        .iter()
        .filter(|(_, (_, placement))| placement.zone == Zone::Answer)
        .map(|(_, (tile, placement))| (placement.slot, tile.morpheme.text.clone()))
        .collect();
    placed.sort_unstable();
    placed.into_iter().map(|(_, text)| text).collect()
}

/// The assembled surfaces must equal the question's parts, in order.
///
/// Comparing surfaces rather than the concatenated word keeps spelling
/// changes at morpheme joins ("believe" + "-able") from failing a correct build.
pub fn check_answer(world: &World, question: &Question) -> Verdict {
    let assembled = answer_parts(world);
    if assembled.is_empty() {
        return Verdict::Incomplete;
    }
    if assembled == question.parts {
        Verdict::Correct
    } else {
        Verdict::Incorrect { assembled }
    }
}

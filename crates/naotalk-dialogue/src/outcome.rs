//! Result of one completed listening turn

/// What a listening session handed back to the caller
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// A finalized utterance was captured
    Transcript(String),
    /// Nothing usable was heard
    EmptyTurn,
    /// The user spoke an exit keyword
    ExitRequested,
}

impl TurnOutcome {
    pub fn is_empty_turn(&self) -> bool {
        matches!(self, TurnOutcome::EmptyTurn)
    }

    /// The captured utterance, if this turn produced one
    pub fn transcript(&self) -> Option<&str> {
        match self {
            TurnOutcome::Transcript(text) => Some(text),
            _ => None,
        }
    }
}

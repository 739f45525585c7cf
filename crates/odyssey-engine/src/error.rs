use thiserror::Error;

/// Raised when a partial record cannot become a full [`Creature`](crate::Creature).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreatureError {
    #[error("creature is missing required field `{0}`")]
    MissingField(&'static str),
}

/// Raised by the editing operations on an [`InitiativeState`](crate::InitiativeState).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    #[error("combatant name must not be empty")]
    EmptyName,
    #[error("no combatant at position {index} (tracker has {len})")]
    NoSuchCombatant { index: usize, len: usize },
}

/// Raised when text does not name a known enum variant (size, type, alignment axis).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

/// A single entry in the initiative tracker.
///
/// Identity is positional: two combatants with the same name are distinct
/// entries, addressed by their index in [`InitiativeState::combatants`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    pub initiative: i32,
    pub damage: u32,
}

impl Combatant {
    /// Create a combatant, rejecting names that are empty after trimming.
    pub fn new(name: &str, initiative: i32, damage: u32) -> Result<Self, TrackerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TrackerError::EmptyName);
        }
        Ok(Self {
            name: name.to_string(),
            initiative,
            damage,
        })
    }
}

/// The state of an encounter: who is in it and which round it is.
///
/// Combatants keep the order the user entered them in. Turn order
/// (descending initiative) is only applied when the state is written out,
/// see [`InitiativeState::turn_order`].
///
/// Editing operations never mutate in place; each returns a new state so an
/// editing session can be abandoned by dropping its copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeState {
    pub combatants: Vec<Combatant>,
    pub round: u32,
}

impl Default for InitiativeState {
    fn default() -> Self {
        Self {
            combatants: Vec::new(),
            round: 1,
        }
    }
}

impl InitiativeState {
    /// An empty tracker at the given round (rounds start at 1).
    pub fn new(round: u32) -> Self {
        Self {
            combatants: Vec::new(),
            round: round.max(1),
        }
    }

    /// Append a combatant.
    #[must_use]
    pub fn with_combatant(&self, combatant: Combatant) -> Self {
        let mut next = self.clone();
        next.combatants.push(combatant);
        next
    }

    /// Replace the combatant at `index`.
    pub fn with_replaced(&self, index: usize, combatant: Combatant) -> Result<Self, TrackerError> {
        self.check_index(index)?;
        let mut next = self.clone();
        next.combatants[index] = combatant;
        Ok(next)
    }

    /// Remove the combatant at `index`.
    pub fn without(&self, index: usize) -> Result<Self, TrackerError> {
        self.check_index(index)?;
        let mut next = self.clone();
        next.combatants.remove(index);
        Ok(next)
    }

    /// Advance to the next round.
    #[must_use]
    pub fn next_round(&self) -> Self {
        Self {
            combatants: self.combatants.clone(),
            round: self.round.saturating_add(1),
        }
    }

    /// Combatants ordered by descending initiative; ties keep entry order.
    pub fn turn_order(&self) -> Vec<&Combatant> {
        let mut ordered: Vec<&Combatant> = self.combatants.iter().collect();
        // sort_by_key is stable
        ordered.sort_by_key(|c| Reverse(c.initiative));
        ordered
    }

    fn check_index(&self, index: usize) -> Result<(), TrackerError> {
        if index < self.combatants.len() {
            Ok(())
        } else {
            Err(TrackerError::NoSuchCombatant {
                index,
                len: self.combatants.len(),
            })
        }
    }
}

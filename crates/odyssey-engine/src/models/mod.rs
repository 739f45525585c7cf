pub mod alignment;
pub mod combatant;
pub mod creature;

pub use alignment::{Alignment, Ethical, Moral};
pub use combatant::{Combatant, InitiativeState};
pub use creature::{
    Ability, AbilityScores, Action, Creature, CreatureDefaults, CreatureDetails, CreatureDraft,
    CreatureType, HitPoints, Size, Speed,
};

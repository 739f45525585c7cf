//! UniFFI bindings for the note plugin host.
//!
//! Initiative trackers cross the boundary as records. Creatures cross as
//! JSON in the host UI's shape (camelCase keys, `type`, string hit points),
//! which keeps the host's older saved records readable without mirroring
//! every optional field as a record.

use odyssey_engine::{
    self as engine, Combatant, Creature, CreatureDefaults, CreatureDraft, InitiativeState,
};

uniffi::setup_scaffolding!();

// ============ Errors ============

/// Errors that can cross the FFI boundary
/// Note: Field is named `reason` not `message` to avoid conflict with Throwable.message in Kotlin
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum FfiError {
    #[error("Invalid JSON: {reason}")]
    InvalidJson { reason: String },
    #[error("Incomplete creature: {reason}")]
    IncompleteCreature { reason: String },
    #[error("Invalid combatant: {reason}")]
    InvalidCombatant { reason: String },
}

impl From<serde_json::Error> for FfiError {
    fn from(err: serde_json::Error) -> Self {
        FfiError::InvalidJson {
            reason: err.to_string(),
        }
    }
}

impl From<engine::TrackerError> for FfiError {
    fn from(err: engine::TrackerError) -> Self {
        FfiError::InvalidCombatant {
            reason: err.to_string(),
        }
    }
}

// ============ DTOs ============

/// One row of the initiative tracker.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct CombatantDto {
    pub name: String,
    pub initiative: i32,
    pub damage: u32,
}

impl CombatantDto {
    fn from_engine(c: Combatant) -> Self {
        Self {
            name: c.name,
            initiative: c.initiative,
            damage: c.damage,
        }
    }

    fn to_engine(&self) -> Result<Combatant, FfiError> {
        Ok(Combatant::new(&self.name, self.initiative, self.damage)?)
    }
}

/// The tracker: combatants in entry order plus the current round.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct InitiativeStateDto {
    pub combatants: Vec<CombatantDto>,
    pub round: u32,
}

impl InitiativeStateDto {
    fn from_engine(state: InitiativeState) -> Self {
        Self {
            combatants: state
                .combatants
                .into_iter()
                .map(CombatantDto::from_engine)
                .collect(),
            round: state.round,
        }
    }

    fn to_engine(&self) -> Result<InitiativeState, FfiError> {
        let combatants = self
            .combatants
            .iter()
            .map(CombatantDto::to_engine)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(InitiativeState {
            combatants,
            round: self.round.max(1),
        })
    }
}

// ============ Initiative tracker ============

#[uniffi::export]
pub fn parse_initiative_table(text: String) -> InitiativeStateDto {
    InitiativeStateDto::from_engine(engine::parse_initiative_table(&text))
}

#[uniffi::export]
pub fn stringify_initiative_table(state: InitiativeStateDto) -> Result<String, FfiError> {
    Ok(engine::stringify_initiative_table(&state.to_engine()?))
}

/// Tracker to edit for a block: parsed from its text, or empty.
#[uniffi::export]
pub fn seed_tracker(block: Option<String>) -> InitiativeStateDto {
    InitiativeStateDto::from_engine(engine::seed_tracker(block.as_deref()))
}

#[uniffi::export]
pub fn add_combatant(
    state: InitiativeStateDto,
    combatant: CombatantDto,
) -> Result<InitiativeStateDto, FfiError> {
    let next = state.to_engine()?.with_combatant(combatant.to_engine()?);
    Ok(InitiativeStateDto::from_engine(next))
}

#[uniffi::export]
pub fn update_combatant(
    state: InitiativeStateDto,
    index: u32,
    combatant: CombatantDto,
) -> Result<InitiativeStateDto, FfiError> {
    let next = state
        .to_engine()?
        .with_replaced(index as usize, combatant.to_engine()?)?;
    Ok(InitiativeStateDto::from_engine(next))
}

#[uniffi::export]
pub fn remove_combatant(
    state: InitiativeStateDto,
    index: u32,
) -> Result<InitiativeStateDto, FfiError> {
    let next = state.to_engine()?.without(index as usize)?;
    Ok(InitiativeStateDto::from_engine(next))
}

#[uniffi::export]
pub fn next_round(state: InitiativeStateDto) -> Result<InitiativeStateDto, FfiError> {
    Ok(InitiativeStateDto::from_engine(state.to_engine()?.next_round()))
}

// ============ Creatures ============

/// Parse a stat block into creature JSON. Fields the text does not contain
/// are left out of the JSON.
#[uniffi::export]
pub fn parse_creature_stat_block(text: String) -> Result<String, FfiError> {
    Ok(serde_json::to_string(&engine::parse_creature_stat_block(
        &text,
    ))?)
}

/// Render creature JSON as a canonical stat block.
#[uniffi::export]
pub fn stringify_creature_to_markdown(creature_json: String) -> Result<String, FfiError> {
    let draft: CreatureDraft = serde_json::from_str(&creature_json)?;
    let creature = Creature::try_from(draft).map_err(|e| FfiError::IncompleteCreature {
        reason: e.to_string(),
    })?;
    Ok(engine::stringify_creature(&creature))
}

/// Creature JSON to edit for a block. `defaults_json` is a serialized
/// `CreatureDefaults`; `None` uses the built-in seed.
#[uniffi::export]
pub fn seed_creature(
    block: Option<String>,
    defaults_json: Option<String>,
) -> Result<String, FfiError> {
    let defaults = match defaults_json {
        Some(json) => serde_json::from_str(&json)?,
        None => CreatureDefaults::default(),
    };
    let creature = engine::seed_creature(block.as_deref(), &defaults);
    Ok(serde_json::to_string(&creature)?)
}

#[uniffi::export]
pub fn ability_modifier(score: i32) -> String {
    engine::ability_modifier(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dto(name: &str, initiative: i32, damage: u32) -> CombatantDto {
        CombatantDto {
            name: name.to_string(),
            initiative,
            damage,
        }
    }

    #[test]
    fn test_parse_initiative_table() {
        let state = parse_initiative_table(
            "Round: 3\n| Name | Initiative | Damage |\n|---|---|---|\n\
             | Orc | 15 | 4 |\n| Imp | 9 | 0 |"
                .to_string(),
        );
        assert_eq!(state.round, 3);
        assert_eq!(state.combatants, vec![dto("Orc", 15, 4), dto("Imp", 9, 0)]);
    }

    #[test]
    fn test_editing_session() {
        let state = seed_tracker(None);
        let state = add_combatant(state, dto("A", 5, 0)).unwrap();
        let state = add_combatant(state, dto("B", 12, 0)).unwrap();
        let state = update_combatant(state, 0, dto("A", 5, 2)).unwrap();
        let state = next_round(state).unwrap();

        assert_eq!(
            stringify_initiative_table(state).unwrap(),
            "Round: 2\n| Name | Initiative | Damage |\n|---|---|---|\n\
             | B | 12 | 0 |\n| A | 5 | 2 |\n"
        );
    }

    #[test]
    fn test_blank_combatant_name_is_rejected() {
        let result = add_combatant(seed_tracker(None), dto("  ", 5, 0));
        assert!(matches!(result, Err(FfiError::InvalidCombatant { .. })));
    }

    #[test]
    fn test_remove_out_of_range() {
        let state = add_combatant(seed_tracker(None), dto("A", 5, 0)).unwrap();
        let err = remove_combatant(state, 4).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid combatant: no combatant at position 4 (tracker has 1)"
        );
    }

    #[test]
    fn test_creature_json_round_trip() {
        let text = "\
### Goblin
Small Humanoid, Neutral Evil
---
| Property | Value |
| :------- | :---- |
| **Armor Class** | 15 |
| **Hit Points** | 7 |
| **Speed** | 30 ft. |
| **Challenge** | 1/4 |
---
| STR | DEX | CON | INT | WIS | CHA |
| :-: | :-: | :-: | :-: | :-: | :-: |
| 8 (-1) | 14 (+2) | 10 (+0) | 10 (+0) | 8 (-1) | 8 (-1) |
---
";
        let json = parse_creature_stat_block(text.to_string()).unwrap();
        assert!(json.contains(r#""armorClass":15"#));

        let markdown = stringify_creature_to_markdown(json).unwrap();
        assert_eq!(markdown, text);
    }

    #[test]
    fn test_incomplete_creature_is_rejected() {
        let json = parse_creature_stat_block("### Just a Name".to_string()).unwrap();
        let err = stringify_creature_to_markdown(json).unwrap_err();
        assert!(matches!(err, FfiError::IncompleteCreature { .. }));
    }

    #[test]
    fn test_bad_json_is_reported() {
        let err = stringify_creature_to_markdown("{not json".to_string()).unwrap_err();
        assert!(matches!(err, FfiError::InvalidJson { .. }));
    }

    #[test]
    fn test_seed_creature_defaults() {
        let json = seed_creature(None, None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "New Creature");
        assert_eq!(value["type"], "Monstrosity");
        assert_eq!(value["hitPoints"], "10");

        let custom = seed_creature(None, Some(r#"{"name": "Thing", "size": "Huge"}"#.to_string()))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&custom).unwrap();
        assert_eq!(value["name"], "Thing");
        assert_eq!(value["size"], "Huge");
    }

    #[test]
    fn test_ability_modifier() {
        assert_eq!(ability_modifier(10), "+0");
        assert_eq!(ability_modifier(8), "-1");
        assert_eq!(ability_modifier(19), "+4");
    }
}

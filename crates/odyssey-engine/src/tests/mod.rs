//! Shared fixtures for unit tests.

use crate::models::{
    AbilityScores, Action, Alignment, Creature, CreatureDetails, CreatureType, HitPoints, Size,
    Speed,
};

/// The goblin from the basic rules, with only the required fields and an alignment.
pub fn sample_goblin() -> Creature {
    Creature {
        name: "Goblin".to_string(),
        creature_type: CreatureType::Humanoid,
        size: Size::Small,
        armor_class: 15,
        hit_points: HitPoints::new("7"),
        speed: Speed::walking(30),
        ability_scores: AbilityScores::new(8, 14, 10, 10, 8, 8),
        challenge_rating: "1/4".to_string(),
        details: CreatureDetails {
            alignment: Some(Alignment::from_text("Neutral Evil")),
            ..CreatureDetails::default()
        },
    }
}

/// A creature with every optional field set, including free text that needs
/// escaping and values that need cell escaping.
pub fn full_creature() -> Creature {
    Creature {
        name: "Marsh Hag".to_string(),
        creature_type: CreatureType::Fey,
        size: Size::Medium,
        armor_class: 17,
        hit_points: HitPoints::new("82 (11d8 + 33)"),
        speed: Speed {
            base: 30,
            burrow: Some(10),
            climb: Some(20),
            fly: Some(60),
            swim: Some(40),
            hover: true,
        },
        ability_scores: AbilityScores::new(18, 12, 16, 13, 14, 7),
        challenge_rating: "5 (1,800 XP)".to_string(),
        details: CreatureDetails {
            species: Some("hag".to_string()),
            pre_name: Some("Old".to_string()),
            surname: Some("Mossbottom".to_string()),
            alignment: Some(Alignment::from_text("Neutral Evil")),
            saving_throws: Some("Con +6, Wis +5".to_string()),
            skills: Some("Arcana +4, Stealth +4".to_string()),
            damage_vulnerabilities: Some("radiant".to_string()),
            damage_resistances: Some("cold | fire".to_string()),
            damage_immunities: Some("poison".to_string()),
            condition_immunities: Some("charmed, poisoned".to_string()),
            senses: Some("darkvision 60 ft., passive Perception 15".to_string()),
            languages: Some("Common, Sylvan".to_string()),
            proficiency_bonus: Some(3),
            personality_trait: Some("Hums while she cooks.".to_string()),
            notes: Some(
                "Met at the ford.\n---\n### Actions\n**NOTES**\nStill owes us a favour."
                    .to_string(),
            ),
            description: Some("A stooped figure.\n\nSmells of peat.".to_string()),
            actions: vec![
                Action::new("Multiattack", "The hag makes two claw attacks."),
                Action::new(
                    "Claws",
                    "*Melee Weapon Attack:* +7 to hit, reach 5 ft.\n\n\
                     *Hit:* 13 (2d8 + 4) slashing damage.",
                ),
            ],
            bonus_actions: vec![Action::new("Mire Step", "The hag moves through mud.")],
            reactions: vec![Action::new("Spiteful Hex", "")],
            legendary_actions: vec![
                Action::new("", "The hag can take 2 legendary actions."),
                Action::new("Cackle", "Each creature within 10 ft. must succeed on a save."),
            ],
            options: vec![Action::new("Variant: Coven.", "Shares spells with two other hags.")],
        },
    }
}

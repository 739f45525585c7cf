//! Creature stat blocks.
//!
//! The canonical layout, as written by [`stringify_creature`]:
//!
//! ```text
//! ### Goblin
//! Small Humanoid (goblinoid), Neutral Evil
//! ---
//! | Property | Value |
//! | :------- | :---- |
//! | **Armor Class** | 15 |
//! | **Hit Points** | 7 (2d6) |
//! | **Speed** | 30 ft. |
//! | **Challenge** | 1/4 (50 XP) |
//! ---
//! | STR | DEX | CON | INT | WIS | CHA |
//! | :-: | :-: | :-: | :-: | :-: | :-: |
//! | 8 (-1) | 14 (+2) | 10 (+0) | 10 (+0) | 8 (-1) | 8 (-1) |
//! ---
//!
//! ### Actions
//! ***Scimitar.*** *Melee Weapon Attack:* +4 to hit.
//! ```
//!
//! The parser also reads the bold list form (`- **Armor Class** 15`) and the
//! legacy upper-case section labels (`**ACTIONS**`).

use crate::{
    models::{Ability, Creature, CreatureDefaults, CreatureDetails, CreatureDraft, creature},
    parsing::{
        actions::render_action_list,
        classify::{Section, escape_free_text},
        fields::Field,
        parse_stat_block,
        table::{escape_cell, format_row},
    },
};

/// Recover whatever the text holds. Missing required fields stay `None`;
/// see [`CreatureDraft::complete`] and `Creature::try_from`.
pub fn parse_creature_stat_block(text: &str) -> CreatureDraft {
    parse_stat_block(text)
}

/// `+2`, `+0`, `-1`: the signed modifier for an ability score.
pub fn ability_modifier(score: i32) -> String {
    format!("{:+}", creature::modifier(score))
}

/// Write a creature in the canonical layout.
pub fn stringify_creature(c: &Creature) -> String {
    let d = &c.details;
    let mut out = format!("### {}\n", c.name.trim());

    out.push_str(&format!("{} {}", c.size, c.creature_type));
    if let Some(species) = &d.species {
        out.push_str(&format!(" ({species})"));
    }
    if let Some(alignment) = &d.alignment {
        out.push_str(&format!(", {alignment}"));
    }
    out.push_str("\n---\n");

    out.push_str("| Property | Value |\n| :------- | :---- |\n");
    for (field, value) in property_rows(c) {
        let label = format!("**{}**", field.label());
        out.push_str(&format_row(&[label, escape_cell(&value)]));
        out.push('\n');
    }
    out.push_str("---\n");

    let headers: Vec<&str> = Ability::ALL.iter().map(|a| a.abbreviation()).collect();
    out.push_str(&format_row(&headers));
    out.push('\n');
    out.push_str(&format_row(&[":-:"; 6]));
    out.push('\n');
    let scores: Vec<String> = Ability::ALL
        .iter()
        .map(|&a| {
            let score = c.ability_scores.get(a);
            format!("{score} ({})", ability_modifier(score))
        })
        .collect();
    out.push_str(&format_row(&scores));
    out.push_str("\n---\n");

    for section in Section::ALL {
        if let Some(text) = section_text(d, section) {
            out.push_str(&format!("\n### {}\n{}\n", section.title(), escape_free_text(&text)));
        }
    }
    out
}

/// Property table rows in canonical order. Armor Class, Hit Points, Speed and
/// Challenge are always present; the rest only when set.
fn property_rows(c: &Creature) -> Vec<(Field, String)> {
    let d = &c.details;
    let optional = |field: Field, value: &Option<String>| {
        value.as_ref().map(|v| (field, v.clone()))
    };

    [
        optional(Field::PreName, &d.pre_name),
        optional(Field::Surname, &d.surname),
        Some((Field::ArmorClass, c.armor_class.to_string())),
        Some((Field::HitPoints, c.hit_points.to_string())),
        Some((Field::Speed, c.speed.to_string())),
        optional(Field::SavingThrows, &d.saving_throws),
        optional(Field::Skills, &d.skills),
        optional(Field::DamageVulnerabilities, &d.damage_vulnerabilities),
        optional(Field::DamageResistances, &d.damage_resistances),
        optional(Field::DamageImmunities, &d.damage_immunities),
        optional(Field::ConditionImmunities, &d.condition_immunities),
        optional(Field::Senses, &d.senses),
        optional(Field::Languages, &d.languages),
        Some((Field::Challenge, c.challenge_rating.clone())),
        d.proficiency_bonus
            .map(|pb| (Field::ProficiencyBonus, format!("{pb:+}"))),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn section_text(d: &CreatureDetails, section: Section) -> Option<String> {
    let actions = match section {
        Section::PersonalityTrait => return d.personality_trait.clone(),
        Section::Description => return d.description.clone(),
        Section::Notes => return d.notes.clone(),
        Section::Actions => &d.actions,
        Section::BonusActions => &d.bonus_actions,
        Section::Reactions => &d.reactions,
        Section::LegendaryActions => &d.legendary_actions,
        Section::Options => &d.options,
    };
    let text = render_action_list(actions);
    (!text.is_empty()).then_some(text)
}

/// Starting creature for an editing session: the block's creature with gaps
/// filled from `defaults`, or the default seed when the block has nothing
/// readable.
pub fn seed_creature(block: Option<&str>, defaults: &CreatureDefaults) -> Creature {
    let draft = block.map(parse_creature_stat_block).unwrap_or_default();
    if draft == CreatureDraft::default() {
        return defaults.seed();
    }
    let missing = draft.missing_fields();
    if !missing.is_empty() {
        log::debug!("seeding creature fields {missing:?} from defaults");
    }
    draft.complete(defaults)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AbilityScores, Action, Alignment, CreatureType, HitPoints, Size, Speed,
    };
    use crate::tests::{full_creature, sample_goblin};
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(10, "+0")]
    #[case(11, "+0")]
    #[case(8, "-1")]
    #[case(9, "-1")]
    #[case(19, "+4")]
    #[case(1, "-5")]
    #[case(i32::MIN, "-1073741829")]
    #[case(i32::MAX, "+1073741818")]
    fn modifier_strings(#[case] score: i32, #[case] expected: &str) {
        assert_eq!(ability_modifier(score), expected);
    }

    #[test]
    fn goblin_renders_canonically() {
        assert_snapshot!(stringify_creature(&sample_goblin()), @r"
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
        ");
    }

    #[test]
    fn sections_render_after_the_tables() {
        let mut creature = sample_goblin();
        creature.details.actions = vec![Action::new("Scimitar", "+4 to hit.")];
        creature.details.notes = Some("Carries a sack.\n---\nStolen.".to_string());

        let out = stringify_creature(&creature);
        assert!(out.ends_with(
            "---\n\n### Actions\n***Scimitar.*** +4 to hit.\n\n\
             ### Notes\nCarries a sack.\n\\---\nStolen.\n"
        ));
    }

    #[test]
    fn goblin_scenario_parses() {
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
        let draft = parse_creature_stat_block(text);
        assert_eq!(draft.name.as_deref(), Some("Goblin"));
        assert_eq!(draft.size, Some(Size::Small));
        assert_eq!(draft.creature_type, Some(CreatureType::Humanoid));
        assert_eq!(draft.details.alignment, Some(Alignment::from_text("Neutral Evil")));
        assert_eq!(draft.armor_class, Some(15));
        assert_eq!(draft.hit_points, Some(HitPoints::new("7")));
        assert_eq!(draft.speed, Some(Speed::walking(30)));
        assert_eq!(
            draft.ability_scores,
            Some(AbilityScores::new(8, 14, 10, 10, 8, 8))
        );
        assert_eq!(Creature::try_from(draft), Ok(sample_goblin()));
    }

    #[test]
    fn round_trip_goblin() {
        let goblin = sample_goblin();
        let parsed = Creature::try_from(parse_creature_stat_block(&stringify_creature(&goblin)));
        assert_eq!(parsed, Ok(goblin));
    }

    #[test]
    fn round_trip_every_field() {
        let creature = full_creature();
        let parsed =
            Creature::try_from(parse_creature_stat_block(&stringify_creature(&creature)));
        assert_eq!(parsed, Ok(creature));
    }

    #[test]
    fn section_titles_round_trip_as_names() {
        for section in Section::ALL {
            let mut creature = full_creature();
            creature.name = section.title().to_string();
            let parsed =
                Creature::try_from(parse_creature_stat_block(&stringify_creature(&creature)));
            assert_eq!(parsed, Ok(creature));
        }
    }

    #[rstest]
    #[case("C#")]
    #[case("Sharp #")]
    #[case("Notes ##")]
    fn trailing_hashes_stay_in_the_name(#[case] name: &str) {
        let mut goblin = sample_goblin();
        goblin.name = name.to_string();
        let parsed = parse_creature_stat_block(&stringify_creature(&goblin));
        assert_eq!(parsed.name.as_deref(), Some(name));
    }

    #[test]
    fn extreme_ability_scores_round_trip() {
        let mut goblin = sample_goblin();
        goblin.ability_scores = AbilityScores::new(i32::MIN, i32::MAX, 0, -1, 10, 11);

        let text = stringify_creature(&goblin);
        assert!(text.contains("| -2147483648 (-1073741829) | 2147483647 (+1073741818) |"));
        assert_eq!(Creature::try_from(parse_creature_stat_block(&text)), Ok(goblin));
    }

    #[test]
    fn empty_required_text_round_trips() {
        let mut goblin = sample_goblin();
        goblin.hit_points = HitPoints::new("");
        goblin.challenge_rating = String::new();

        let parsed = Creature::try_from(parse_creature_stat_block(&stringify_creature(&goblin)));
        assert_eq!(parsed, Ok(goblin));
    }

    #[test]
    fn stringify_is_idempotent() {
        let once = stringify_creature(&full_creature());
        let draft = parse_creature_stat_block(&once);
        let twice = stringify_creature(&Creature::try_from(draft).unwrap());
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_input_is_safe() {
        assert_eq!(parse_creature_stat_block(""), CreatureDraft::default());
        assert_eq!(parse_creature_stat_block("\n\n---\n"), CreatureDraft::default());
    }

    #[test]
    fn proficiency_bonus_renders_signed() {
        let mut creature = sample_goblin();
        creature.details.proficiency_bonus = Some(2);
        assert!(stringify_creature(&creature).contains("| **Proficiency Bonus** | +2 |\n"));
    }

    #[test]
    fn seed_without_text_uses_defaults() {
        let defaults = CreatureDefaults::default();
        assert_eq!(seed_creature(None, &defaults), defaults.seed());
        assert_eq!(seed_creature(Some("nothing here"), &defaults), defaults.seed());
    }

    #[test]
    fn seed_with_partial_text_keeps_what_was_written() {
        let defaults = CreatureDefaults::default();
        let seeded = seed_creature(Some("### Owlbear\n- **Armor Class** 13"), &defaults);
        assert_eq!(seeded.name, "Owlbear");
        assert_eq!(seeded.armor_class, 13);
        assert_eq!(seeded.size, defaults.size);
        assert_eq!(seeded.hit_points, defaults.hit_points);
    }
}

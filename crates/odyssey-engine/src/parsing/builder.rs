use std::mem;

use crate::models::{Ability, AbilityScores, Alignment, CreatureDraft, HitPoints};

use super::{
    actions::parse_action_list,
    classify::{LineClass, LineKind, Section, unescape_line},
    fields::{Field, leading_int, parse_bold_item, parse_size_line, parse_speed},
    table::{is_alignment_row, strip_bold},
};

/// What the builder is currently accumulating.
#[derive(Debug)]
enum Register {
    None,
    Table { rows: Vec<Vec<String>> },
    FreeText { section: Section, lines: Vec<String> },
}

/// Line state machine that assembles a [`CreatureDraft`] from classified lines.
///
/// Recoverable gaps (unknown labels, unreadable numbers, rejected tables) are
/// logged at debug level and leave the affected field absent.
pub struct StatBlockBuilder {
    register: Register,
    /// Set on the line after a section heading or label; a separator right
    /// there belongs to the heading and is dropped.
    just_opened: bool,
    /// Set once a heading, label, separator or row has been seen.
    structure_seen: bool,
    draft: CreatureDraft,
    ethical: Option<String>,
    moral: Option<String>,
}

impl StatBlockBuilder {
    pub fn new() -> Self {
        Self {
            register: Register::None,
            just_opened: false,
            structure_seen: false,
            draft: CreatureDraft::default(),
            ethical: None,
            moral: None,
        }
    }

    pub fn push(&mut self, c: &LineClass) {
        let just_opened = mem::replace(&mut self.just_opened, false);
        if just_opened && c.kind == LineKind::Separator {
            log::trace!("line {}: separator under section heading dropped", c.number);
            return;
        }

        // A table ends at the first line that is not a row.
        if self.in_table() && !matches!(c.kind, LineKind::TableRow { .. }) {
            self.flush_table();
            if c.kind == LineKind::Separator {
                return;
            }
        }

        // The block's first heading is its name, whatever the title says.
        if let LineKind::Heading { title, .. } = &c.kind
            && self.awaiting_name()
        {
            self.structure_seen = true;
            self.draft.name = Some(title.clone());
            return;
        }
        if !matches!(c.kind, LineKind::Blank | LineKind::Text) {
            self.structure_seen = true;
        }

        if let Some(section) = c.opens_section() {
            self.flush_free_text();
            log::trace!("line {}: entering {:?}", c.number, section);
            self.register = Register::FreeText {
                section,
                lines: vec![],
            };
            self.just_opened = true;
            return;
        }

        if let Register::FreeText { section, lines } = &mut self.register {
            if c.kind == LineKind::Separator {
                log::trace!("line {}: leaving {:?}", c.number, section);
                self.flush_free_text();
            } else {
                lines.push(unescape_line(c.raw));
            }
            return;
        }

        match &c.kind {
            LineKind::TableRow { cells } => self.push_row(cells),
            LineKind::Heading { title, .. } => self.take_name(c.number, title),
            LineKind::Text => self.match_field_line(c),
            LineKind::Blank | LineKind::Separator | LineKind::SectionLabel { .. } => {}
        }
    }

    pub fn finish(mut self) -> CreatureDraft {
        // EOF flush
        self.flush_table();
        self.flush_free_text();

        if self.draft.details.alignment.is_none() {
            self.draft.details.alignment = match (self.ethical.take(), self.moral.take()) {
                (Some(ethical), Some(moral)) => Some(Alignment::from_parts(&ethical, &moral)),
                (Some(one), None) | (None, Some(one)) => Some(Alignment::from_text(&one)),
                (None, None) => None,
            };
        }
        self.draft
    }

    fn awaiting_name(&self) -> bool {
        !self.structure_seen
            && self.ethical.is_none()
            && self.moral.is_none()
            && self.draft == CreatureDraft::default()
    }

    fn in_table(&self) -> bool {
        matches!(self.register, Register::Table { .. })
    }

    fn take_name(&mut self, number: usize, title: &str) {
        if self.draft.name.is_none() {
            self.draft.name = Some(title.to_string());
        } else {
            log::debug!("line {number}: heading {title:?} ignored, name already set");
        }
    }

    fn match_field_line(&mut self, c: &LineClass) {
        if let Some(line) = parse_size_line(c.raw) {
            self.draft.size = Some(line.size);
            self.draft.creature_type = Some(line.creature_type);
            if line.species.is_some() {
                self.draft.details.species = line.species;
            }
            if line.alignment.is_some() {
                self.draft.details.alignment = line.alignment;
            }
        } else if let Some((field, value)) = parse_bold_item(c.raw) {
            self.apply_field(field, &value);
        } else {
            log::trace!("line {}: unmatched {:?}", c.number, c.raw.trim());
        }
    }

    /// Store one labelled value, shared by the bold-list and property-table forms.
    ///
    /// Empty values leave optional fields absent. Hit Points and Challenge are
    /// required text, so an empty value is kept as written.
    fn apply_field(&mut self, field: Field, value: &str) {
        let value = value.trim();
        if value.is_empty() && !matches!(field, Field::HitPoints | Field::Challenge) {
            return;
        }
        let draft = &mut self.draft;
        let details = &mut draft.details;
        let text = Some(value.to_string());

        match field {
            Field::ArmorClass => match leading_int(value) {
                Some(ac) => draft.armor_class = Some(ac),
                None => log::debug!("armor class {value:?} has no leading number"),
            },
            Field::ProficiencyBonus => match value.parse::<i32>() {
                Ok(pb) => details.proficiency_bonus = Some(pb),
                Err(_) => log::debug!("proficiency bonus {value:?} is not a number"),
            },
            Field::HitPoints => draft.hit_points = Some(HitPoints::new(value)),
            Field::Speed => draft.speed = Some(parse_speed(value)),
            Field::Challenge => draft.challenge_rating = text,
            Field::Alignment => details.alignment = Some(Alignment::from_text(value)),
            Field::Ethical => self.ethical = text,
            Field::Moral => self.moral = text,
            Field::PreName => details.pre_name = text,
            Field::Surname => details.surname = text,
            Field::Species => details.species = text,
            Field::SavingThrows => details.saving_throws = text,
            Field::Skills => details.skills = text,
            Field::DamageVulnerabilities => details.damage_vulnerabilities = text,
            Field::DamageResistances => details.damage_resistances = text,
            Field::DamageImmunities => details.damage_immunities = text,
            Field::ConditionImmunities => details.condition_immunities = text,
            Field::Senses => details.senses = text,
            Field::Languages => details.languages = text,
        }
    }

    fn push_row(&mut self, cells: &[String]) {
        match &mut self.register {
            Register::Table { rows } => rows.push(cells.to_vec()),
            _ => {
                self.register = Register::Table {
                    rows: vec![cells.to_vec()],
                }
            }
        }
    }

    fn flush_table(&mut self) {
        let prev = mem::replace(&mut self.register, Register::None);
        let Register::Table { rows } = prev else {
            self.register = prev; // put back free text
            return;
        };
        let Some(header) = rows.first() else {
            return;
        };

        let has = |label: &str| header.iter().any(|cell| cell.eq_ignore_ascii_case(label));
        if has("STR") && has("DEX") {
            self.read_ability_table(&rows);
        } else if has("Property") && has("Value") {
            self.read_property_table(&rows);
        } else {
            log::debug!("table with header {header:?} not recognized");
        }
    }

    fn read_ability_table(&mut self, rows: &[Vec<String>]) {
        let header = &rows[0];
        let Some(data) = rows[1..].iter().find(|row| !is_alignment_row(row)) else {
            log::debug!("ability table has no data row");
            return;
        };

        let mut scores = [0; 6];
        for (i, ability) in Ability::ALL.into_iter().enumerate() {
            let column = header
                .iter()
                .position(|cell| cell.eq_ignore_ascii_case(ability.abbreviation()))
                .unwrap_or(i);
            match data.get(column).and_then(|cell| leading_int(cell)) {
                Some(score) => scores[i] = score,
                None => {
                    log::debug!(
                        "ability table rejected: no {} score in {data:?}",
                        ability.abbreviation()
                    );
                    return;
                }
            }
        }
        self.draft.ability_scores = Some(AbilityScores::from(scores));
    }

    fn read_property_table(&mut self, rows: &[Vec<String>]) {
        for row in rows[1..].iter().filter(|row| !is_alignment_row(row)) {
            let [label, value, ..] = row.as_slice() else {
                log::debug!("property row {row:?} has no value cell");
                continue;
            };
            match Field::from_label(strip_bold(label)) {
                Some(field) => self.apply_field(field, value),
                None => log::debug!("unknown property {label:?}"),
            }
        }
    }

    fn flush_free_text(&mut self) {
        let prev = mem::replace(&mut self.register, Register::None);
        let Register::FreeText { section, lines } = prev else {
            self.register = prev; // put back table
            return;
        };

        let text = trim_blank_lines(&lines);
        if text.is_empty() {
            return;
        }

        let details = &mut self.draft.details;
        let actions = match section {
            Section::PersonalityTrait => return append_text(&mut details.personality_trait, text),
            Section::Description => return append_text(&mut details.description, text),
            Section::Notes => return append_text(&mut details.notes, text),
            Section::Actions => &mut details.actions,
            Section::BonusActions => &mut details.bonus_actions,
            Section::Reactions => &mut details.reactions,
            Section::LegendaryActions => &mut details.legendary_actions,
            Section::Options => &mut details.options,
        };
        actions.extend(parse_action_list(&text));
    }
}

impl Default for StatBlockBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Join lines, dropping blank lines at either end.
fn trim_blank_lines(lines: &[String]) -> String {
    let is_content = |line: &&String| !line.trim().is_empty();
    let start = lines.iter().position(|l| is_content(&l));
    let end = lines.iter().rposition(|l| is_content(&l));
    match (start, end) {
        (Some(start), Some(end)) => lines[start..=end].join("\n"),
        _ => String::new(),
    }
}

/// A section that appears twice keeps both texts.
fn append_text(slot: &mut Option<String>, text: String) {
    match slot {
        Some(existing) => {
            existing.push_str("\n\n");
            existing.push_str(&text);
        }
        None => *slot = Some(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Action, CreatureType, Size, Speed};
    use crate::parsing::parse_stat_block;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_input_gives_empty_draft() {
        assert_eq!(parse_stat_block(""), CreatureDraft::default());
    }

    #[test]
    fn name_only() {
        let draft = parse_stat_block("### Just a Name");
        assert_eq!(draft.name.as_deref(), Some("Just a Name"));
        assert_eq!(draft.missing_fields().len(), 6);
    }

    #[test]
    fn first_heading_names_the_creature_even_with_a_section_title() {
        let draft = parse_stat_block("### Notes\nTiny Fey, Chaotic Good\n### Notes\nLikes tea.");
        assert_eq!(draft.name.as_deref(), Some("Notes"));
        assert_eq!(draft.size, Some(Size::Tiny));
        assert_eq!(draft.details.notes.as_deref(), Some("Likes tea."));
    }

    #[test]
    fn section_heading_after_structure_opens_the_section() {
        let text = "| Property | Value |\n|---|---|\n### Actions\n***Bite.*** 1d4.";
        let draft = parse_stat_block(text);
        assert_eq!(draft.name, None);
        assert_eq!(draft.details.actions, vec![Action::new("Bite", "1d4.")]);
    }

    #[test]
    fn empty_required_text_is_kept() {
        let text = "\
| Property | Value |
| :--- | :--- |
| **Hit Points** |  |
| **Challenge** |  |
| **Senses** |  |
";
        let draft = parse_stat_block(text);
        assert_eq!(draft.hit_points, Some(HitPoints::new("")));
        assert_eq!(draft.challenge_rating.as_deref(), Some(""));
        assert_eq!(draft.details.senses, None);
    }

    #[test]
    fn later_unknown_headings_do_not_rename() {
        let draft = parse_stat_block("### Goblin\n## Lair\n");
        assert_eq!(draft.name.as_deref(), Some("Goblin"));
    }

    #[test]
    fn bold_list_form() {
        let text = "\
### Wolf
Medium beast, unaligned
- **Armor Class** 13 (natural armor)
- **Hit Points** 11 (2d8 + 2)
- **Speed** 40 ft.
- **Senses** passive Perception 13
- **Challenge** 1/4 (50 XP)
";
        let draft = parse_stat_block(text);
        assert_eq!(draft.size, Some(Size::Medium));
        assert_eq!(draft.creature_type, Some(CreatureType::Beast));
        assert_eq!(draft.armor_class, Some(13));
        assert_eq!(draft.hit_points, Some(HitPoints::new("11 (2d8 + 2)")));
        assert_eq!(draft.speed, Some(Speed::walking(40)));
        assert_eq!(draft.details.senses.as_deref(), Some("passive Perception 13"));
        assert_eq!(draft.challenge_rating.as_deref(), Some("1/4 (50 XP)"));
        assert_eq!(
            draft.details.alignment,
            Some(Alignment::Described("unaligned".to_string()))
        );
    }

    #[test]
    fn blank_line_ends_a_table() {
        let text = "\
| STR | DEX | CON | INT | WIS | CHA |
| :-: | :-: | :-: | :-: | :-: | :-: |
| 10 (+0) | 12 (+1) | 10 (+0) | 3 (-4) | 12 (+1) | 6 (-2) |

| 99 | 99 | 99 | 99 | 99 | 99 |
";
        let draft = parse_stat_block(text);
        assert_eq!(
            draft.ability_scores,
            Some(AbilityScores::new(10, 12, 10, 3, 12, 6))
        );
    }

    #[test]
    fn ability_columns_follow_the_header() {
        let text = "| CHA | WIS | INT | CON | DEX | STR |\n|---|---|---|---|---|---|\n\
                    | 1 | 2 | 3 | 4 | 5 | 6 |";
        let draft = parse_stat_block(text);
        assert_eq!(draft.ability_scores, Some(AbilityScores::new(6, 5, 4, 3, 2, 1)));
    }

    #[test]
    fn unreadable_ability_table_is_rejected() {
        let text = "| STR | DEX | CON | INT | WIS | CHA |\n|---|---|---|---|---|---|\n\
                    | 10 | 12 | ? | 3 | 12 | 6 |";
        assert_eq!(parse_stat_block(text).ability_scores, None);
    }

    #[test]
    fn property_table_ignores_unknown_and_malformed_rows() {
        let text = "\
| Property | Value |
| :--- | :--- |
| **Armor Class** | heavy |
| **Lair** | Cave |
| **Senses** |
| **Proficiency Bonus** | +2 |
";
        let draft = parse_stat_block(text);
        assert_eq!(draft.armor_class, None);
        assert_eq!(draft.details.senses, None);
        assert_eq!(draft.details.proficiency_bonus, Some(2));
    }

    #[test]
    fn legacy_labels_swallow_their_separator() {
        let text = "\
### Knight
**ACTIONS**
---
***Multiattack.*** Two attacks.

**REACTIONS**
---
***Parry.*** +2 AC.
";
        let draft = parse_stat_block(text);
        assert_eq!(
            draft.details.actions,
            vec![Action::new("Multiattack", "Two attacks.")]
        );
        assert_eq!(draft.details.reactions, vec![Action::new("Parry", "+2 AC.")]);
    }

    #[test]
    fn separator_ends_free_text_and_escaped_one_does_not() {
        let text = "\
### Imp
### Notes
Before
\\---
After
---
- **Languages** Common
";
        let draft = parse_stat_block(text);
        assert_eq!(draft.details.notes.as_deref(), Some("Before\n---\nAfter"));
        assert_eq!(draft.details.languages.as_deref(), Some("Common"));
    }

    #[test]
    fn unknown_heading_inside_free_text_is_kept() {
        let draft = parse_stat_block("### Imp\n### Description\nSmall devil.\n#### Lore\nOld.");
        assert_eq!(
            draft.details.description.as_deref(),
            Some("Small devil.\n#### Lore\nOld.")
        );
    }

    #[test]
    fn legacy_ethical_and_moral_labels_combine() {
        let draft = parse_stat_block("### Paladin\n- **Ethical** Lawful\n- **Moral** Good");
        assert_eq!(draft.details.alignment.map(|a| a.to_string()).as_deref(), Some("Lawful Good"));
    }

    #[test]
    fn alignment_line_wins_over_legacy_pair() {
        let draft =
            parse_stat_block("### Paladin\nMedium Humanoid, Chaotic Good\n- **Ethical** Lawful");
        assert_eq!(draft.details.alignment.map(|a| a.to_string()).as_deref(), Some("Chaotic Good"));
    }
}

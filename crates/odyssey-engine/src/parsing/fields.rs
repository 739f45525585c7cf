//! Field-level matchers: the size line, bold-labelled items, and the small
//! value grammars (speed, leading integers) shared by the list and table forms.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::{Alignment, CreatureType, Size, Speed};

static SIZE_LINE: OnceLock<Regex> = OnceLock::new();
static BOLD_ITEM: OnceLock<Regex> = OnceLock::new();
static LEADING_INT: OnceLock<Regex> = OnceLock::new();
static DIGITS: OnceLock<Regex> = OnceLock::new();

/// A labelled stat block field, as written in a bold list item or a
/// `Property | Value` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    PreName,
    Surname,
    Species,
    Alignment,
    Ethical,
    Moral,
    ArmorClass,
    HitPoints,
    Speed,
    SavingThrows,
    Skills,
    DamageVulnerabilities,
    DamageResistances,
    DamageImmunities,
    ConditionImmunities,
    Senses,
    Languages,
    Challenge,
    ProficiencyBonus,
}

impl Field {
    pub fn from_label(label: &str) -> Option<Field> {
        let label = label.trim().trim_end_matches(':').trim().to_ascii_lowercase();
        let field = match label.as_str() {
            "pre-name" | "prename" | "pre name" => Field::PreName,
            "surname" => Field::Surname,
            "species" => Field::Species,
            "alignment" => Field::Alignment,
            "ethical" => Field::Ethical,
            "moral" => Field::Moral,
            "armor class" | "armour class" => Field::ArmorClass,
            "hit points" => Field::HitPoints,
            "speed" => Field::Speed,
            "saving throws" => Field::SavingThrows,
            "skills" => Field::Skills,
            "damage vulnerabilities" => Field::DamageVulnerabilities,
            "damage resistances" => Field::DamageResistances,
            "damage immunities" => Field::DamageImmunities,
            "condition immunities" => Field::ConditionImmunities,
            "senses" => Field::Senses,
            "languages" => Field::Languages,
            "challenge" | "challenge rating" => Field::Challenge,
            "proficiency bonus" => Field::ProficiencyBonus,
            _ => return None,
        };
        Some(field)
    }

    /// Label written by the renderer.
    pub fn label(self) -> &'static str {
        match self {
            Field::PreName => "Pre-name",
            Field::Surname => "Surname",
            Field::Species => "Species",
            Field::Alignment => "Alignment",
            Field::Ethical => "Ethical",
            Field::Moral => "Moral",
            Field::ArmorClass => "Armor Class",
            Field::HitPoints => "Hit Points",
            Field::Speed => "Speed",
            Field::SavingThrows => "Saving Throws",
            Field::Skills => "Skills",
            Field::DamageVulnerabilities => "Damage Vulnerabilities",
            Field::DamageResistances => "Damage Resistances",
            Field::DamageImmunities => "Damage Immunities",
            Field::ConditionImmunities => "Condition Immunities",
            Field::Senses => "Senses",
            Field::Languages => "Languages",
            Field::Challenge => "Challenge",
            Field::ProficiencyBonus => "Proficiency Bonus",
        }
    }
}

/// The `Small Humanoid (goblinoid), Neutral Evil` line under the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeLine {
    pub size: Size,
    pub creature_type: CreatureType,
    pub species: Option<String>,
    pub alignment: Option<Alignment>,
}

pub fn parse_size_line(line: &str) -> Option<SizeLine> {
    let re = SIZE_LINE.get_or_init(|| {
        Regex::new(
            concat!(
                r"(?i)^(tiny|small|medium|large|huge|gargantuan)\s+([a-z]+)",
                r"(?:\s*\(([^)]*)\))?(?:\s*,\s*(.*))?$",
            ),
        )
        .expect("Invalid size line regex")
    });
    let caps = re.captures(line.trim())?;

    // Both parses are infallible for text the regex accepted, except an
    // unknown type word.
    let size = caps[1].parse::<Size>().ok()?;
    let creature_type = match caps[2].parse::<CreatureType>() {
        Ok(t) => t,
        Err(err) => {
            log::debug!("size line {line:?} ignored: {err}");
            return None;
        }
    };

    Some(SizeLine {
        size,
        creature_type,
        species: caps
            .get(3)
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty()),
        alignment: caps
            .get(4)
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
            .map(Alignment::from_text),
    })
}

/// Match `- **Label** value` (list marker optional, colon optional). Returns
/// the field and its trimmed value when the label is known.
pub fn parse_bold_item(line: &str) -> Option<(Field, String)> {
    let re = BOLD_ITEM.get_or_init(|| {
        Regex::new(r"^(?:[-*+]\s+)?\*\*([^*]+?)\*\*:?\s*(.*)$").expect("Invalid bold item regex")
    });
    let caps = re.captures(line.trim())?;
    let field = Field::from_label(&caps[1])?;
    Some((field, caps[2].trim().to_string()))
}

/// The integer a value starts with: `15 (natural armor)` -> 15, `-2` -> -2.
pub fn leading_int(value: &str) -> Option<i32> {
    let re = LEADING_INT
        .get_or_init(|| Regex::new(r"^\s*([+-]?\d+)").expect("Invalid leading integer regex"));
    re.captures(value)?[1].parse().ok()
}

/// Parse a speed line such as `30 ft., climb 30 ft., fly 60 ft. (hover)`.
///
/// Segments are comma separated. A segment with `ft` and no movement keyword
/// is the walking speed; `burrow`, `climb`, `fly` and `swim` set their
/// field; `hover` anywhere sets the hover flag. Unreadable segments are
/// skipped.
pub fn parse_speed(value: &str) -> Speed {
    let digits = DIGITS.get_or_init(|| Regex::new(r"\d+").expect("Invalid digits regex"));
    let mut speed = Speed::default();

    for segment in value.split(',') {
        let segment = segment.trim().to_ascii_lowercase();
        if segment.is_empty() {
            continue;
        }
        if segment.contains("hover") {
            speed.hover = true;
        }
        let Some(feet) = digits
            .find(&segment)
            .and_then(|m| m.as_str().parse::<u32>().ok())
        else {
            continue;
        };

        if segment.contains("burrow") {
            speed.burrow = Some(feet);
        } else if segment.contains("climb") {
            speed.climb = Some(feet);
        } else if segment.contains("fly") {
            speed.fly = Some(feet);
        } else if segment.contains("swim") {
            speed.swim = Some(feet);
        } else if segment.contains("ft") {
            speed.base = feet;
        } else {
            log::debug!("speed segment {segment:?} has no unit, skipped");
        }
    }
    speed
}

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

use crate::{error::CreatureError, error::UnknownVariant, models::alignment::Alignment};

// ============ Enumerations ============

/// Creature size category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Size {
    Tiny,
    Small,
    Medium,
    Large,
    Huge,
    Gargantuan,
}

impl Size {
    pub const ALL: [Size; 6] = [
        Size::Tiny,
        Size::Small,
        Size::Medium,
        Size::Large,
        Size::Huge,
        Size::Gargantuan,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Size::Tiny => "Tiny",
            Size::Small => "Small",
            Size::Medium => "Medium",
            Size::Large => "Large",
            Size::Huge => "Huge",
            Size::Gargantuan => "Gargantuan",
        }
    }
}

impl FromStr for Size {
    type Err = UnknownVariant;

    /// Case-insensitive: stat blocks in the wild write "medium" as often as "Medium".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Size::ALL
            .into_iter()
            .find(|size| size.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant::new("size", s))
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Creature type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreatureType {
    Aberration,
    Beast,
    Celestial,
    Construct,
    Dragon,
    Elemental,
    Fey,
    Fiend,
    Giant,
    Humanoid,
    Monstrosity,
    Ooze,
    Plant,
    Undead,
    Swarm,
}

impl CreatureType {
    pub const ALL: [CreatureType; 15] = [
        CreatureType::Aberration,
        CreatureType::Beast,
        CreatureType::Celestial,
        CreatureType::Construct,
        CreatureType::Dragon,
        CreatureType::Elemental,
        CreatureType::Fey,
        CreatureType::Fiend,
        CreatureType::Giant,
        CreatureType::Humanoid,
        CreatureType::Monstrosity,
        CreatureType::Ooze,
        CreatureType::Plant,
        CreatureType::Undead,
        CreatureType::Swarm,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CreatureType::Aberration => "Aberration",
            CreatureType::Beast => "Beast",
            CreatureType::Celestial => "Celestial",
            CreatureType::Construct => "Construct",
            CreatureType::Dragon => "Dragon",
            CreatureType::Elemental => "Elemental",
            CreatureType::Fey => "Fey",
            CreatureType::Fiend => "Fiend",
            CreatureType::Giant => "Giant",
            CreatureType::Humanoid => "Humanoid",
            CreatureType::Monstrosity => "Monstrosity",
            CreatureType::Ooze => "Ooze",
            CreatureType::Plant => "Plant",
            CreatureType::Undead => "Undead",
            CreatureType::Swarm => "Swarm",
        }
    }
}

impl FromStr for CreatureType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        CreatureType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant::new("creature type", s))
    }
}

impl fmt::Display for CreatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============ Ability Scores ============

/// The six abilities, in stat block column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub const ALL: [Ability; 6] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Wisdom,
        Ability::Charisma,
    ];

    /// Column header used in the ability score table.
    pub fn abbreviation(self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }
}

/// Ability scores container. The codec does not clamp values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl AbilityScores {
    pub fn new(str: i32, dex: i32, con: i32, int: i32, wis: i32, cha: i32) -> Self {
        Self {
            strength: str,
            dexterity: dex,
            constitution: con,
            intelligence: int,
            wisdom: wis,
            charisma: cha,
        }
    }

    /// Every ability set to `score`.
    pub fn uniform(score: i32) -> Self {
        Self::new(score, score, score, score, score, score)
    }

    pub fn get(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        modifier(self.get(ability))
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::uniform(10)
    }
}

impl From<[i32; 6]> for AbilityScores {
    fn from(s: [i32; 6]) -> Self {
        Self::new(s[0], s[1], s[2], s[3], s[4], s[5])
    }
}

/// Ability modifier for a score: `floor((score - 10) / 2)`.
pub fn modifier(score: i32) -> i32 {
    // div_euclid floors for a positive divisor: 9 -> -1, 8 -> -1, 7 -> -2.
    // Widened so i32::MIN does not overflow; halving brings it back in range.
    (i64::from(score) - 10).div_euclid(2) as i32
}

// ============ Speed ============

/// Movement speeds in feet. Only `base` is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speed {
    #[serde(default)]
    pub base: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burrow: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub climb: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fly: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swim: Option<u32>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hover: bool,
}

impl Speed {
    pub fn walking(base: u32) -> Self {
        Self {
            base,
            ..Self::default()
        }
    }
}

impl fmt::Display for Speed {
    /// `30 ft., climb 20 ft., fly 60 ft. (hover)`. Hover attaches to the fly
    /// segment, or to the walking segment for creatures without a fly speed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ft.", self.base)?;
        if self.hover && self.fly.is_none() {
            f.write_str(" (hover)")?;
        }
        if let Some(burrow) = self.burrow {
            write!(f, ", burrow {burrow} ft.")?;
        }
        if let Some(climb) = self.climb {
            write!(f, ", climb {climb} ft.")?;
        }
        if let Some(fly) = self.fly {
            write!(f, ", fly {fly} ft.")?;
            if self.hover {
                f.write_str(" (hover)")?;
            }
        }
        if let Some(swim) = self.swim {
            write!(f, ", swim {swim} ft.")?;
        }
        Ok(())
    }
}

// ============ Hit Points ============

/// Hit points as displayed, e.g. `"82 (11d8 + 33)"`.
///
/// Stored as text so dice expressions survive; numeric JSON input from older
/// records is accepted and converted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "HitPointsRepr", into = "String")]
pub struct HitPoints(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum HitPointsRepr {
    Number(i64),
    Text(String),
}

impl From<HitPointsRepr> for HitPoints {
    fn from(repr: HitPointsRepr) -> Self {
        match repr {
            HitPointsRepr::Number(n) => HitPoints(n.to_string()),
            HitPointsRepr::Text(text) => HitPoints(text),
        }
    }
}

impl From<HitPoints> for String {
    fn from(hp: HitPoints) -> Self {
        hp.0
    }
}

impl HitPoints {
    pub fn new(text: impl Into<String>) -> Self {
        HitPoints(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The leading number, if the text starts with one (`"82 (11d8 + 33)"` -> 82).
    pub fn average(&self) -> Option<i32> {
        self.0.split_whitespace().next()?.parse().ok()
    }
}

impl From<i32> for HitPoints {
    fn from(n: i32) -> Self {
        HitPoints(n.to_string())
    }
}

impl fmt::Display for HitPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============ Actions ============

/// A named ability or attack entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    pub description: String,
}

impl Action {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

// ============ Creature ============

/// Everything about a creature that may be absent.
///
/// Shared by [`Creature`] and [`CreatureDraft`] so that both agree on which
/// fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatureDetails {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "empty_as_none")]
    pub species: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "empty_as_none")]
    pub pre_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "empty_as_none")]
    pub surname: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_alignment_as_none"
    )]
    pub alignment: Option<Alignment>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "empty_as_none")]
    pub saving_throws: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "empty_as_none")]
    pub skills: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "empty_as_none")]
    pub damage_vulnerabilities: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "empty_as_none")]
    pub damage_resistances: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "empty_as_none")]
    pub damage_immunities: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "empty_as_none")]
    pub condition_immunities: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "empty_as_none")]
    pub senses: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "empty_as_none")]
    pub languages: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proficiency_bonus: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "empty_as_none")]
    pub personality_trait: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "empty_as_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "empty_as_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Action>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bonus_actions: Vec<Action>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reactions: Vec<Action>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub legendary_actions: Vec<Action>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<Action>,
}

/// Form inputs send `""` for a cleared field; treat that as absent.
fn empty_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

fn blank_alignment_as_none<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Alignment>, D::Error> {
    let value = Option::<Alignment>::deserialize(deserializer)?;
    Ok(value.filter(|a| !matches!(a, Alignment::Described(text) if text.is_empty())))
}

/// A complete creature stat block.
///
/// The required fields are not optional here; a parse result that lacks any
/// of them is a [`CreatureDraft`] until it is completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creature {
    pub name: String,
    #[serde(rename = "type")]
    pub creature_type: CreatureType,
    pub size: Size,
    pub armor_class: i32,
    pub hit_points: HitPoints,
    #[serde(default)]
    pub speed: Speed,
    pub ability_scores: AbilityScores,
    pub challenge_rating: String,
    #[serde(flatten)]
    pub details: CreatureDetails,
}

/// A creature as recovered from text: any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatureDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub creature_type: Option<CreatureType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor_class: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hit_points: Option<HitPoints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<Speed>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ability_scores: Option<AbilityScores>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge_rating: Option<String>,
    #[serde(flatten)]
    pub details: CreatureDetails,
}

impl CreatureDraft {
    /// Fill every missing required field from `defaults`.
    pub fn complete(self, defaults: &CreatureDefaults) -> Creature {
        Creature {
            name: self.name.unwrap_or_else(|| defaults.name.clone()),
            creature_type: self.creature_type.unwrap_or(defaults.creature_type),
            size: self.size.unwrap_or(defaults.size),
            armor_class: self.armor_class.unwrap_or(defaults.armor_class),
            hit_points: self
                .hit_points
                .unwrap_or_else(|| defaults.hit_points.clone()),
            speed: self.speed.unwrap_or(defaults.speed),
            ability_scores: self
                .ability_scores
                .unwrap_or_else(|| AbilityScores::uniform(defaults.ability_score)),
            challenge_rating: self
                .challenge_rating
                .unwrap_or_else(|| defaults.challenge_rating.clone()),
            details: self.details,
        }
    }

    /// Names of the required fields this draft is missing, in declaration order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", self.name.is_none()),
            ("type", self.creature_type.is_none()),
            ("size", self.size.is_none()),
            ("armorClass", self.armor_class.is_none()),
            ("hitPoints", self.hit_points.is_none()),
            ("abilityScores", self.ability_scores.is_none()),
            ("challengeRating", self.challenge_rating.is_none()),
        ]
        .into_iter()
        .filter_map(|(field, missing)| missing.then_some(field))
        .collect()
    }
}

impl TryFrom<CreatureDraft> for Creature {
    type Error = CreatureError;

    /// Refuses drafts with a missing required field. A missing speed becomes
    /// `0 ft.`, matching how the stat block treats an absent base speed.
    fn try_from(draft: CreatureDraft) -> Result<Self, Self::Error> {
        let missing = |field| CreatureError::MissingField(field);
        Ok(Creature {
            name: draft.name.ok_or_else(|| missing("name"))?,
            creature_type: draft.creature_type.ok_or_else(|| missing("type"))?,
            size: draft.size.ok_or_else(|| missing("size"))?,
            armor_class: draft.armor_class.ok_or_else(|| missing("armorClass"))?,
            hit_points: draft.hit_points.ok_or_else(|| missing("hitPoints"))?,
            speed: draft.speed.unwrap_or_default(),
            ability_scores: draft
                .ability_scores
                .ok_or_else(|| missing("abilityScores"))?,
            challenge_rating: draft
                .challenge_rating
                .ok_or_else(|| missing("challengeRating"))?,
            details: draft.details,
        })
    }
}

impl From<Creature> for CreatureDraft {
    fn from(creature: Creature) -> Self {
        Self {
            name: Some(creature.name),
            creature_type: Some(creature.creature_type),
            size: Some(creature.size),
            armor_class: Some(creature.armor_class),
            hit_points: Some(creature.hit_points),
            speed: Some(creature.speed),
            ability_scores: Some(creature.ability_scores),
            challenge_rating: Some(creature.challenge_rating),
            details: creature.details,
        }
    }
}

// ============ Defaults ============

/// Values used to seed a new creature or complete a partial one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatureDefaults {
    pub name: String,
    #[serde(rename = "type")]
    pub creature_type: CreatureType,
    pub size: Size,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    pub armor_class: i32,
    pub hit_points: HitPoints,
    pub ability_score: i32,
    pub challenge_rating: String,
    pub speed: Speed,
}

impl Default for CreatureDefaults {
    fn default() -> Self {
        Self {
            name: "New Creature".to_string(),
            creature_type: CreatureType::Monstrosity,
            size: Size::Medium,
            alignment: Some(Alignment::from_text("Neutral")),
            armor_class: 10,
            hit_points: HitPoints::new("10"),
            ability_score: 10,
            challenge_rating: "1".to_string(),
            speed: Speed::walking(30),
        }
    }
}

impl CreatureDefaults {
    /// A fresh creature for a block that has no stat block yet.
    pub fn seed(&self) -> Creature {
        let mut creature = CreatureDraft::default().complete(self);
        creature.details.alignment = self.alignment.clone();
        creature
    }
}

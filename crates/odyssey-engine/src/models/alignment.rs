//! Creature alignment.
//!
//! Older data stores alignment as a `{ moral, ethical }` pair of select
//! values, newer data as a single free-text line. Both are normalized into
//! [`Alignment`] at the boundary: text goes through [`Alignment::from_text`],
//! the pair through [`Alignment::from_parts`], and serde accepts either
//! shape while always writing the text form.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::UnknownVariant;

/// The lawful/chaotic axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ethical {
    Lawful,
    Neutral,
    Chaotic,
}

/// The good/evil axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Moral {
    Good,
    Neutral,
    Evil,
}

impl Ethical {
    pub fn as_str(self) -> &'static str {
        match self {
            Ethical::Lawful => "Lawful",
            Ethical::Neutral => "Neutral",
            Ethical::Chaotic => "Chaotic",
        }
    }
}

impl Moral {
    pub fn as_str(self) -> &'static str {
        match self {
            Moral::Good => "Good",
            Moral::Neutral => "Neutral",
            Moral::Evil => "Evil",
        }
    }
}

impl FromStr for Ethical {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lawful" => Ok(Ethical::Lawful),
            "neutral" => Ok(Ethical::Neutral),
            "chaotic" => Ok(Ethical::Chaotic),
            _ => Err(UnknownVariant::new("ethical alignment", s)),
        }
    }
}

impl FromStr for Moral {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "good" => Ok(Moral::Good),
            "neutral" => Ok(Moral::Neutral),
            "evil" => Ok(Moral::Evil),
            _ => Err(UnknownVariant::new("moral alignment", s)),
        }
    }
}

/// A creature's alignment.
///
/// `Aligned` is used whenever the text is exactly one of the nine classic
/// alignments in title case; anything else ("unaligned", "any alignment",
/// "True Neutral") is kept verbatim as `Described` so it renders back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Alignment {
    Aligned { ethical: Ethical, moral: Moral },
    Described(String),
}

impl Alignment {
    /// Normalize a single alignment line.
    pub fn from_text(text: &str) -> Self {
        let text = text.trim();
        if text == "Neutral" {
            return Alignment::Aligned {
                ethical: Ethical::Neutral,
                moral: Moral::Neutral,
            };
        }

        // "Neutral Neutral" is not one of the nine; true neutral is spelled "Neutral".
        let words: Vec<&str> = text.split(' ').collect();
        if let [ethical, moral] = words[..]
            && let Some(ethical) = exact::<Ethical>(ethical, Ethical::as_str)
            && let Some(moral) = exact::<Moral>(moral, Moral::as_str)
            && !(ethical == Ethical::Neutral && moral == Moral::Neutral)
        {
            return Alignment::Aligned { ethical, moral };
        }

        Alignment::Described(text.to_string())
    }

    /// Upgrade a legacy `{ ethical, moral }` pair.
    ///
    /// Either axis failing to parse keeps both words as described text.
    pub fn from_parts(ethical: &str, moral: &str) -> Self {
        match (ethical.parse::<Ethical>(), moral.parse::<Moral>()) {
            (Ok(ethical), Ok(moral)) => Alignment::Aligned { ethical, moral },
            _ => Alignment::Described(format!("{} {}", ethical.trim(), moral.trim())),
        }
    }
}

/// Parse `word` only if it is already in canonical spelling, so that
/// rendering reproduces the source text.
fn exact<T: FromStr + Copy>(word: &str, canonical: fn(T) -> &'static str) -> Option<T> {
    let value = word.parse::<T>().ok()?;
    (canonical(value) == word).then_some(value)
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alignment::Aligned {
                ethical: Ethical::Neutral,
                moral: Moral::Neutral,
            } => f.write_str("Neutral"),
            Alignment::Aligned { ethical, moral } => {
                write!(f, "{} {}", ethical.as_str(), moral.as_str())
            }
            Alignment::Described(text) => f.write_str(text),
        }
    }
}

impl Serialize for Alignment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AlignmentRepr {
    Text(String),
    Pair { ethical: String, moral: String },
}

impl<'de> Deserialize<'de> for Alignment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match AlignmentRepr::deserialize(deserializer)? {
            AlignmentRepr::Text(text) => Alignment::from_text(&text),
            AlignmentRepr::Pair { ethical, moral } => Alignment::from_parts(&ethical, &moral),
        })
    }
}

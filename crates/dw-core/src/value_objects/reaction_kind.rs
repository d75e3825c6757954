//! Reaction catalog
//!
//! The closed set of reaction kinds a member can leave on a community post,
//! each with a canonical glyph and display label. The lookup is pure: no
//! state, no I/O.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Semantic reaction kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Love,
    Celebrate,
    Applause,
    Clap,
    Wow,
    Surprised,
    Sad,
    Helpful,
    Insightful,
}

/// Raw value of the `reaction_type` column
///
/// The backing table only admits three values; the glyph column carries the
/// finer-grained kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoredReactionType {
    Like,
    Love,
    Celebrate,
}

/// Error when parsing a reaction kind name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown reaction kind: {0}")]
pub struct ParseReactionKindError(pub String);

impl ReactionKind {
    /// All kinds, in the order the quick-pick popup shows them
    pub const ALL: [ReactionKind; 10] = [
        Self::Like,
        Self::Love,
        Self::Celebrate,
        Self::Applause,
        Self::Clap,
        Self::Wow,
        Self::Surprised,
        Self::Sad,
        Self::Helpful,
        Self::Insightful,
    ];

    /// Position in [`ReactionKind::ALL`]
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Canonical glyph for this kind
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Like => "\u{1F44D}",
            Self::Love => "\u{2764}\u{FE0F}",
            Self::Celebrate => "\u{1F389}",
            Self::Applause => "\u{1F44F}",
            Self::Clap => "\u{1F64C}",
            Self::Wow => "\u{1F929}",
            Self::Surprised => "\u{1F62E}",
            Self::Sad => "\u{1F622}",
            Self::Helpful => "\u{1F91D}",
            Self::Insightful => "\u{1F4A1}",
        }
    }

    /// Display label
    pub const fn label(self) -> &'static str {
        match self {
            Self::Like => "Like",
            Self::Love => "Love",
            Self::Celebrate => "Celebrate",
            Self::Applause => "Applause",
            Self::Clap => "Clap",
            Self::Wow => "Wow",
            Self::Surprised => "Surprised",
            Self::Sad => "Sad",
            Self::Helpful => "Helpful",
            Self::Insightful => "Insightful",
        }
    }

    /// Lowercase wire name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Love => "love",
            Self::Celebrate => "celebrate",
            Self::Applause => "applause",
            Self::Clap => "clap",
            Self::Wow => "wow",
            Self::Surprised => "surprised",
            Self::Sad => "sad",
            Self::Helpful => "helpful",
            Self::Insightful => "insightful",
        }
    }

    /// Column value this kind is persisted under
    pub const fn stored_type(self) -> StoredReactionType {
        match self {
            Self::Like | Self::Helpful | Self::Insightful => StoredReactionType::Like,
            Self::Love | Self::Wow | Self::Surprised | Self::Sad => StoredReactionType::Love,
            Self::Celebrate | Self::Applause | Self::Clap => StoredReactionType::Celebrate,
        }
    }

    /// Resolve a glyph to its kind
    ///
    /// Accepts the canonical glyphs plus a few aliases. Skin-tone modifiers
    /// and presentation selectors are ignored, so `👍🏽` resolves to `Like`.
    pub fn from_glyph(glyph: &str) -> Option<Self> {
        let normalized = normalize_glyph(glyph);
        match normalized.as_str() {
            "\u{1F44D}" => Some(Self::Like),
            "\u{2764}" | "\u{2665}" => Some(Self::Love),
            "\u{1F389}" | "\u{1F973}" | "\u{1F38A}" => Some(Self::Celebrate),
            "\u{1F44F}" => Some(Self::Applause),
            "\u{1F64C}" => Some(Self::Clap),
            "\u{1F929}" => Some(Self::Wow),
            "\u{1F62E}" | "\u{1F632}" | "\u{1F62F}" => Some(Self::Surprised),
            "\u{1F622}" | "\u{1F62D}" => Some(Self::Sad),
            "\u{1F91D}" => Some(Self::Helpful),
            "\u{1F4A1}" => Some(Self::Insightful),
            _ => None,
        }
    }
}

/// Canonical glyph for a kind
pub fn glyph_for(kind: ReactionKind) -> &'static str {
    kind.glyph()
}

/// Kind for a glyph, `None` for unsupported emoji
pub fn kind_for(glyph: &str) -> Option<ReactionKind> {
    ReactionKind::from_glyph(glyph)
}

/// Label for a kind
pub fn label_for(kind: ReactionKind) -> &'static str {
    kind.label()
}

fn normalize_glyph(glyph: &str) -> String {
    glyph
        .trim()
        .chars()
        .filter(|c| !matches!(c, '\u{FE0E}' | '\u{FE0F}' | '\u{1F3FB}'..='\u{1F3FF}'))
        .collect()
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionKind {
    type Err = ParseReactionKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseReactionKindError(s.to_string()))
    }
}

impl StoredReactionType {
    /// Column value
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Love => "love",
            Self::Celebrate => "celebrate",
        }
    }

    /// Kind a row falls back to when its glyph is not recognised
    pub const fn default_kind(self) -> ReactionKind {
        match self {
            Self::Like => ReactionKind::Like,
            Self::Love => ReactionKind::Love,
            Self::Celebrate => ReactionKind::Celebrate,
        }
    }
}

impl fmt::Display for StoredReactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoredReactionType {
    type Err = ParseReactionKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "like" => Ok(Self::Like),
            "love" => Ok(Self::Love),
            "celebrate" => Ok(Self::Celebrate),
            _ => Err(ParseReactionKindError(s.to_string())),
        }
    }
}

//! Normalized card attributes shared by the loader, merger and analyzers.

use serde::{Serialize, Serializer};
use std::fmt;

/// Card rarity, stored as its single-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Mythic,
}

impl Rarity {
    /// Maps the rarity text used in rating sheets. Unrecognized text has no rarity.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "common" => Some(Rarity::Common),
            "uncommon" => Some(Rarity::Uncommon),
            "rare" => Some(Rarity::Rare),
            "mythic" => Some(Rarity::Mythic),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Rarity::Common => "C",
            Rarity::Uncommon => "U",
            Rarity::Rare => "R",
            Rarity::Mythic => "M",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for Rarity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// Card color as stored after normalization.
///
/// Any stored value longer than one character collapses to [`Color::Multicolor`],
/// and an empty cell becomes [`Color::Colorless`]. Single-character values that
/// are not a known code are kept verbatim in [`Color::Other`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
    Colorless,
    Multicolor,
    Other(String),
}

impl Color {
    /// The five base colors in pairing order.
    pub const BASE: [Color; 5] = [
        Color::White,
        Color::Red,
        Color::Black,
        Color::Blue,
        Color::Green,
    ];

    pub fn from_cell(raw: &str) -> Self {
        if raw.is_empty() {
            return Color::Colorless;
        }
        if raw.chars().count() > 1 {
            return Color::Multicolor;
        }
        match raw {
            "W" => Color::White,
            "U" => Color::Blue,
            "B" => Color::Black,
            "R" => Color::Red,
            "G" => Color::Green,
            "C" => Color::Colorless,
            "M" => Color::Multicolor,
            other => Color::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Color::White => "W",
            Color::Blue => "U",
            Color::Black => "B",
            Color::Red => "R",
            Color::Green => "G",
            Color::Colorless => "C",
            Color::Multicolor => "M",
            Color::Other(code) => code,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// One rater's normalized row for a single card.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingRow {
    pub name: String,
    pub rarity: Option<Rarity>,
    pub color: Option<Color>,
    /// Letter grade exactly as the rater wrote it.
    pub rating: Option<String>,
}

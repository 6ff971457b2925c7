//! Records written to the analysis results file.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::card::{Color, Rarity};

/// An ordered list of per-rater values, serialized as a JSON object keyed by rater.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RaterMap<T>(pub Vec<(String, T)>);

impl<T> RaterMap<T> {
    pub fn get(&self, rater: &str) -> Option<&T> {
        self.0.iter().find(|(r, _)| r == rater).map(|(_, v)| v)
    }
}

impl<T: Serialize> Serialize for RaterMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (rater, value) in &self.0 {
            map.serialize_entry(rater, value)?;
        }
        map.end()
    }
}

/// Average group score of all cards in either color of a pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorPairAverage {
    pub colors: String,
    pub average_rating: f64,
}

/// A card selected from a rarity and color bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Color")]
    pub color: Color,
    #[serde(rename = "Group")]
    pub group: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Group")]
    pub group: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarianceRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Variance")]
    pub variance: f64,
    #[serde(rename = "Group")]
    pub group: f64,
}

/// One rater's deviation on a card, with every rater's letter grade for review.
///
/// Serialized with a `<rater>_Hot_Take` key followed by one key per rater.
#[derive(Debug, Clone, PartialEq)]
pub struct HotTakeRecord {
    pub rater: String,
    pub name: String,
    pub deviation: f64,
    pub group: f64,
    pub ratings: Vec<(String, Option<String>)>,
}

impl Serialize for HotTakeRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3 + self.ratings.len()))?;
        map.serialize_entry("Name", &self.name)?;
        map.serialize_entry(&format!("{}_Hot_Take", self.rater), &self.deviation)?;
        map.serialize_entry("Group", &self.group)?;
        for (rater, letter) in &self.ratings {
            map.serialize_entry(rater, letter)?;
        }
        map.end()
    }
}

/// A row of the full card table.
#[derive(Debug, Clone, PartialEq)]
pub struct CardRecord {
    pub name: String,
    pub rarity: Option<Rarity>,
    pub color: Option<Color>,
    pub group: f64,
    pub variance: Option<f64>,
    pub ratings: Vec<(String, Option<String>)>,
}

impl Serialize for CardRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(5 + self.ratings.len()))?;
        map.serialize_entry("Name", &self.name)?;
        map.serialize_entry("Rarity", &self.rarity)?;
        map.serialize_entry("Color", &self.color)?;
        map.serialize_entry("Group", &self.group)?;
        map.serialize_entry("Variance", &self.variance)?;
        for (rater, letter) in &self.ratings {
            map.serialize_entry(rater, letter)?;
        }
        map.end()
    }
}

/// Everything one analysis run produces, in output key order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResults {
    pub raters: Vec<String>,
    pub unrated_cards: RaterMap<Vec<String>>,
    pub color_pair_averages: Vec<ColorPairAverage>,
    pub top_3_commons_by_color: Vec<BucketRecord>,
    pub top_3_uncommons_by_color: Vec<BucketRecord>,
    pub top_3_rares_by_color: Vec<BucketRecord>,
    pub top_3_mythics_by_color: Vec<BucketRecord>,
    pub bottom_3_commons_by_color: Vec<BucketRecord>,
    pub bottom_3_uncommons_by_color: Vec<BucketRecord>,
    pub bottom_3_overall: Vec<OverallRecord>,
    pub top_15_variance: Vec<VarianceRecord>,
    pub hot_takes: RaterMap<Vec<HotTakeRecord>>,
    pub all_cards: Vec<CardRecord>,
}

//! Full outer join of every rater's table on card name.

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::analyzers::grade;
use crate::card::{Color, Rarity};
use crate::loader::RaterTable;

/// Card names removed from the merged table. Matched exactly after trimming.
pub const BASIC_LANDS: [&str; 5] = ["Plains", "Island", "Swamp", "Mountain", "Forest"];

/// One row per distinct card name across all raters.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedCard {
    pub name: String,
    pub rarity: Option<Rarity>,
    pub color: Option<Color>,
    /// Letter grades indexed by rater position; `None` when that rater did not rate the card.
    pub ratings: Vec<Option<String>>,
}

impl MergedCard {
    /// Numeric grades indexed by rater position. Off-scale letters are `None`.
    pub fn grades(&self) -> Vec<Option<f64>> {
        self.ratings
            .iter()
            .map(|r| r.as_deref().and_then(grade::numeric))
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MergedTable {
    pub raters: Vec<String>,
    /// Sorted by card name.
    pub cards: Vec<MergedCard>,
}

/// Merges rater tables in the given order.
///
/// The row set and row order depend only on card names; rarity and color
/// come from the last rater that supplied them.
pub fn merge(tables: &[RaterTable]) -> MergedTable {
    let raters: Vec<String> = tables.iter().map(|t| t.rater.clone()).collect();
    let mut by_name: BTreeMap<String, MergedCard> = BTreeMap::new();

    for (idx, table) in tables.iter().enumerate() {
        info!(rater = %table.rater, cards = table.rows.len(), "Merging ratings");

        for row in &table.rows {
            let card = by_name
                .entry(row.name.clone())
                .or_insert_with(|| MergedCard {
                    name: row.name.clone(),
                    rarity: None,
                    color: None,
                    ratings: vec![None; raters.len()],
                });

            if let Some(rarity) = row.rarity {
                if card.rarity.is_some_and(|r| r != rarity) {
                    warn!(
                        card = %row.name,
                        rater = %table.rater,
                        "Conflicting rarity, keeping latest"
                    );
                }
                card.rarity = Some(rarity);
            }
            if let Some(color) = &row.color {
                if card.color.as_ref().is_some_and(|c| c != color) {
                    warn!(
                        card = %row.name,
                        rater = %table.rater,
                        "Conflicting color, keeping latest"
                    );
                }
                card.color = Some(color.clone());
            }
            card.ratings[idx] = row.rating.clone();
        }
    }

    MergedTable {
        raters,
        cards: by_name.into_values().collect(),
    }
}

impl MergedTable {
    /// Drops basic lands; returns how many rows were removed.
    pub fn exclude_basic_lands(&mut self) -> usize {
        let before = self.cards.len();
        self.cards
            .retain(|card| !BASIC_LANDS.contains(&card.name.as_str()));
        let removed = before - self.cards.len();
        info!(removed, "Excluded basic lands");
        removed
    }
}

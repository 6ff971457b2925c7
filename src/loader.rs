//! Per-rater ratings sheet loading.
//!
//! Loading never fails: a missing or unreadable sheet yields an empty table
//! and a missing column yields null values, both logged.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, error, info, warn};

use crate::analyzers::grade;
use crate::card::{Color, Rarity, RatingRow};

pub const NAME_COLUMN: &str = "Name";
pub const RARITY_COLUMN: &str = "Rarity";
pub const COLOR_COLUMN: &str = "Color";
pub const RATING_COLUMN: &str = "Rating";

/// Normalized ratings for one rater.
#[derive(Debug, Clone, Default)]
pub struct RaterTable {
    pub rater: String,
    pub rows: Vec<RatingRow>,
}

impl RaterTable {
    pub fn empty(rater: &str) -> Self {
        Self {
            rater: rater.to_string(),
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Header positions of the expected columns; `None` when a column is absent.
struct Columns {
    name: Option<usize>,
    rarity: Option<usize>,
    color: Option<usize>,
    rating: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord, rater: &str) -> Self {
        let find = |column: &str| {
            let idx = headers.iter().position(|h| h == column);
            if idx.is_none() {
                warn!(rater, column, "Column not found in ratings sheet");
            }
            idx
        };

        Self {
            name: find(NAME_COLUMN),
            rarity: find(RARITY_COLUMN),
            color: find(COLOR_COLUMN),
            rating: find(RATING_COLUMN),
        }
    }
}

/// Loads and normalizes the ratings sheet at `path` for `rater`.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load_ratings(path: &Path, rater: &str) -> RaterTable {
    let mut rdr = match ReaderBuilder::new().flexible(true).from_path(path) {
        Ok(rdr) => rdr,
        Err(e) => {
            error!(rater, error = %e, "Could not open ratings sheet");
            return RaterTable::empty(rater);
        }
    };

    let headers = match rdr.headers() {
        Ok(headers) => headers.clone(),
        Err(e) => {
            error!(rater, error = %e, "Could not read ratings sheet header");
            return RaterTable::empty(rater);
        }
    };

    let columns = Columns::locate(&headers, rater);
    let mut rows: Vec<RatingRow> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut off_scale = BTreeSet::new();
    let mut skipped = 0usize;

    for (line, result) in rdr.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!(rater, line = line + 2, error = %e, "Skipping unreadable row");
                skipped += 1;
                continue;
            }
        };

        let Some(row) = normalize_row(&record, &columns) else {
            skipped += 1;
            continue;
        };

        if let Some(letter) = &row.rating {
            if grade::numeric(letter).is_none() {
                off_scale.insert(letter.clone());
            }
        }

        match positions.get(&row.name) {
            Some(&idx) => {
                warn!(rater, card = %row.name, "Card listed more than once, keeping last row");
                rows[idx] = row;
            }
            None => {
                positions.insert(row.name.clone(), rows.len());
                rows.push(row);
            }
        }
    }

    if skipped > 0 {
        warn!(rater, skipped, "Rows without a usable card name were skipped");
    }
    if !off_scale.is_empty() {
        warn!(
            rater,
            grades = ?off_scale,
            "Grades not on the letter scale will have no numeric value"
        );
    }

    info!(rater, cards = rows.len(), "Ratings loaded");
    RaterTable {
        rater: rater.to_string(),
        rows,
    }
}

fn cell<'r>(record: &'r StringRecord, idx: Option<usize>) -> Option<&'r str> {
    idx.and_then(|i| record.get(i))
}

/// Applies name trimming, rarity coding, color collapsing and grade capture.
fn normalize_row(record: &StringRecord, columns: &Columns) -> Option<RatingRow> {
    let name = cell(record, columns.name)?.trim();
    if name.is_empty() {
        debug!("Row has no card name");
        return None;
    }

    let rarity = cell(record, columns.rarity).and_then(Rarity::from_label);
    // An absent column stays null; an empty cell in a present column means colorless.
    let color = columns
        .color
        .map(|_| Color::from_cell(cell(record, columns.color).unwrap_or("")));
    let rating = cell(record, columns.rating)
        .filter(|r| !r.is_empty())
        .map(str::to_string);

    Some(RatingRow {
        name: name.to_string(),
        rarity,
        color,
        rating,
    })
}

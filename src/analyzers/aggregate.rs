use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::analyzers::types::{
    AnalysisResults, BucketRecord, CardRecord, ColorPairAverage, HotTakeRecord, OverallRecord,
    RaterMap, VarianceRecord,
};
use crate::analyzers::utility::{mean, round2, sample_variance};
use crate::card::{Color, Rarity};
use crate::merge::{MergedCard, MergedTable};

pub const TOP_N_BY_COLOR: usize = 3;
pub const BOTTOM_N_OVERALL: usize = 3;
pub const TOP_N_VARIANCE: usize = 15;
pub const TOP_N_HOT_TAKES: usize = 3;

/// A merged card annotated with its numeric grades, group score and variance.
#[derive(Debug, Clone)]
pub struct ScoredCard<'a> {
    pub card: &'a MergedCard,
    pub grades: Vec<Option<f64>>,
    pub group: f64,
    pub variance: Option<f64>,
}

impl<'a> ScoredCard<'a> {
    pub fn new(card: &'a MergedCard) -> Self {
        let grades = card.grades();
        let present: Vec<f64> = grades.iter().flatten().copied().collect();
        Self {
            card,
            group: group_score(&grades),
            variance: sample_variance(&present),
            grades,
        }
    }

    fn bucket_record(&self, color: &Color) -> BucketRecord {
        BucketRecord {
            name: self.card.name.clone(),
            color: color.clone(),
            group: self.group,
        }
    }

    fn letter_grades(&self, raters: &[String]) -> Vec<(String, Option<String>)> {
        raters
            .iter()
            .cloned()
            .zip(self.card.ratings.iter().cloned())
            .collect()
    }
}

/// Mean grade over every rater; a missing grade counts as zero but still
/// counts toward the denominator.
pub fn group_score(grades: &[Option<f64>]) -> f64 {
    if grades.is_empty() {
        return 0.0;
    }
    grades.iter().map(|g| g.unwrap_or(0.0)).sum::<f64>() / grades.len() as f64
}

/// Builds the full result bundle from a merged, land-excluded table.
///
/// Every ranking runs over all rows, so a card some rater skipped is ranked
/// by its deflated group score.
#[tracing::instrument(
    skip(table),
    fields(raters = table.raters.len(), cards = table.cards.len())
)]
pub fn aggregate(table: &MergedTable) -> AnalysisResults {
    let scored: Vec<ScoredCard> = table.cards.iter().map(ScoredCard::new).collect();

    let partial = scored
        .iter()
        .filter(|s| s.grades.iter().any(Option::is_none))
        .count();
    if partial > 0 {
        warn!(
            partial,
            "Cards missing a grade from at least one rater count that grade as zero"
        );
    }

    info!("Calculating average rating by color pair");
    let color_pair_averages = color_pair_averages(&scored);

    info!("Calculating top and bottom cards by rarity and color");
    let top_by = |rarity| top_by_color(&scored, rarity, TOP_N_BY_COLOR);
    let bottom_by = |rarity| bottom_by_color(&scored, rarity, TOP_N_BY_COLOR);

    info!("Calculating variance and hot takes");
    AnalysisResults {
        raters: table.raters.clone(),
        unrated_cards: unrated_cards(table),
        color_pair_averages,
        top_3_commons_by_color: top_by(Rarity::Common),
        top_3_uncommons_by_color: top_by(Rarity::Uncommon),
        top_3_rares_by_color: top_by(Rarity::Rare),
        top_3_mythics_by_color: top_by(Rarity::Mythic),
        bottom_3_commons_by_color: bottom_by(Rarity::Common),
        bottom_3_uncommons_by_color: bottom_by(Rarity::Uncommon),
        bottom_3_overall: bottom_overall(&scored, BOTTOM_N_OVERALL),
        top_15_variance: top_variance(&scored, TOP_N_VARIANCE),
        hot_takes: hot_takes(&scored, &table.raters, TOP_N_HOT_TAKES),
        all_cards: all_cards(&scored, &table.raters),
    }
}

/// Names each rater left ungraded. A card missing from several raters is
/// listed under each of them.
pub fn unrated_cards(table: &MergedTable) -> RaterMap<Vec<String>> {
    let mut all_rated = true;
    let lists = table
        .raters
        .iter()
        .enumerate()
        .map(|(idx, rater)| {
            let names: Vec<String> = table
                .cards
                .iter()
                .filter(|c| c.ratings[idx].is_none())
                .map(|c| c.name.clone())
                .collect();
            if names.is_empty() {
                info!(rater = %rater, "All cards were rated");
            } else {
                all_rated = false;
                warn!(rater = %rater, cards = ?names, "Cards not rated");
            }
            (rater.clone(), names)
        })
        .collect();

    if all_rated {
        info!("All raters rated all cards");
    }
    RaterMap(lists)
}

/// Every unordered pair of base colors, best average first.
pub fn color_pair_averages(cards: &[ScoredCard]) -> Vec<ColorPairAverage> {
    let mut pairs = Vec::new();
    for (i, first) in Color::BASE.iter().enumerate() {
        for second in &Color::BASE[i + 1..] {
            let groups: Vec<f64> = cards
                .iter()
                .filter(|s| {
                    s.card
                        .color
                        .as_ref()
                        .is_some_and(|c| c == first || c == second)
                })
                .map(|s| s.group)
                .collect();

            let average_rating = if groups.is_empty() {
                0.0
            } else {
                round2(mean(&groups))
            };

            pairs.push(ColorPairAverage {
                colors: format!("{}/{}", first, second),
                average_rating,
            });
        }
    }

    pairs.sort_by(|a, b| b.average_rating.total_cmp(&a.average_rating));
    pairs
}

/// Cards of `rarity` grouped by color code, in code order.
fn buckets<'s, 'a>(
    cards: &'s [ScoredCard<'a>],
    rarity: Rarity,
) -> BTreeMap<String, (Color, Vec<&'s ScoredCard<'a>>)> {
    let mut buckets: BTreeMap<String, (Color, Vec<&ScoredCard>)> = BTreeMap::new();
    for scored in cards.iter().filter(|s| s.card.rarity == Some(rarity)) {
        if let Some(color) = &scored.card.color {
            buckets
                .entry(color.code().to_string())
                .or_insert_with(|| (color.clone(), Vec::new()))
                .1
                .push(scored);
        }
    }
    buckets
}

/// The `n` best cards of each color within `rarity`; ties keep table order.
pub fn top_by_color(cards: &[ScoredCard], rarity: Rarity, n: usize) -> Vec<BucketRecord> {
    let mut records = Vec::new();
    for (_, (color, mut bucket)) in buckets(cards, rarity) {
        bucket.sort_by(|a, b| b.group.total_cmp(&a.group));
        records.extend(bucket.iter().take(n).map(|s| s.bucket_record(&color)));
    }
    records
}

/// The `n` worst cards of each color within `rarity`; ties keep table order.
pub fn bottom_by_color(cards: &[ScoredCard], rarity: Rarity, n: usize) -> Vec<BucketRecord> {
    let mut records = Vec::new();
    for (_, (color, mut bucket)) in buckets(cards, rarity) {
        bucket.sort_by(|a, b| a.group.total_cmp(&b.group));
        records.extend(bucket.iter().take(n).map(|s| s.bucket_record(&color)));
    }
    records
}

pub fn bottom_overall(cards: &[ScoredCard], n: usize) -> Vec<OverallRecord> {
    let mut sorted: Vec<&ScoredCard> = cards.iter().collect();
    sorted.sort_by(|a, b| a.group.total_cmp(&b.group));
    sorted
        .into_iter()
        .take(n)
        .map(|s| OverallRecord {
            name: s.card.name.clone(),
            group: s.group,
        })
        .collect()
}

/// Cards with the most rater disagreement. Cards without a defined variance are skipped.
pub fn top_variance(cards: &[ScoredCard], n: usize) -> Vec<VarianceRecord> {
    let mut with_variance: Vec<(&ScoredCard, f64)> = cards
        .iter()
        .filter_map(|s| s.variance.map(|v| (s, v)))
        .collect();
    with_variance.sort_by(|a, b| b.1.total_cmp(&a.1));
    with_variance
        .into_iter()
        .take(n)
        .map(|(s, variance)| VarianceRecord {
            name: s.card.name.clone(),
            variance,
            group: s.group,
        })
        .collect()
}

/// How far rater `idx` sits from the mean of everyone else.
///
/// `None` when that rater has no grade or nobody else graded the card.
pub fn deviation(grades: &[Option<f64>], idx: usize) -> Option<f64> {
    let own = grades.get(idx).copied().flatten()?;
    let others: Vec<f64> = grades
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != idx)
        .filter_map(|(_, g)| *g)
        .collect();
    if others.is_empty() {
        return None;
    }
    Some((own - mean(&others)).abs())
}

/// Each rater's `n` largest disagreements with the other raters.
pub fn hot_takes(
    cards: &[ScoredCard],
    raters: &[String],
    n: usize,
) -> RaterMap<Vec<HotTakeRecord>> {
    let lists = raters
        .iter()
        .enumerate()
        .map(|(idx, rater)| {
            let mut ranked: Vec<(&ScoredCard, f64)> = cards
                .iter()
                .filter_map(|s| deviation(&s.grades, idx).map(|d| (s, d)))
                .collect();
            ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

            let records = ranked
                .into_iter()
                .take(n)
                .map(|(s, deviation)| HotTakeRecord {
                    rater: rater.clone(),
                    name: s.card.name.clone(),
                    deviation,
                    group: s.group,
                    ratings: s.letter_grades(raters),
                })
                .collect();
            (rater.clone(), records)
        })
        .collect();
    RaterMap(lists)
}

fn all_cards(cards: &[ScoredCard], raters: &[String]) -> Vec<CardRecord> {
    cards
        .iter()
        .map(|s| CardRecord {
            name: s.card.name.clone(),
            rarity: s.card.rarity,
            color: s.card.color.clone(),
            group: s.group,
            variance: s.variance,
            ratings: s.letter_grades(raters),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(name: &str, rarity: Rarity, color: Color, ratings: &[Option<&str>]) -> MergedCard {
        MergedCard {
            name: name.to_string(),
            rarity: Some(rarity),
            color: Some(color),
            ratings: ratings.iter().map(|r| r.map(str::to_string)).collect(),
        }
    }

    fn table(raters: &[&str], cards: Vec<MergedCard>) -> MergedTable {
        MergedTable {
            raters: raters.iter().map(|r| r.to_string()).collect(),
            cards,
        }
    }

    fn names<T>(records: &[T], name: impl Fn(&T) -> &str) -> Vec<String> {
        records.iter().map(|r| name(r).to_string()).collect()
    }

    #[test]
    fn test_group_score_counts_missing_as_zero() {
        assert_eq!(group_score(&[Some(8.0), Some(10.0)]), 9.0);
        assert_eq!(group_score(&[Some(8.0), None]), 4.0);
        assert_eq!(group_score(&[]), 0.0);
    }

    #[test]
    fn test_two_rater_end_to_end_scores() {
        let t = table(
            &["Kevin", "Nate"],
            vec![
                card("Alpha", Rarity::Common, Color::White, &[Some("A"), Some("A-")]),
                card("Beta", Rarity::Common, Color::White, &[Some("B"), Some("B+")]),
                card("Gamma", Rarity::Common, Color::White, &[Some("A"), Some("B+")]),
            ],
        );

        let results = aggregate(&t);
        let groups: Vec<f64> = results.all_cards.iter().map(|c| c.group).collect();
        assert_eq!(groups, vec![10.5, 8.5, 10.0]);

        // Pairs with white average all three cards; the rest have no cards.
        let white_pair = results
            .color_pair_averages
            .iter()
            .find(|p| p.colors == "W/R")
            .unwrap();
        assert_eq!(white_pair.average_rating, round2((10.5 + 8.5 + 10.0) / 3.0));
        let empty_pair = results
            .color_pair_averages
            .iter()
            .find(|p| p.colors == "R/B")
            .unwrap();
        assert_eq!(empty_pair.average_rating, 0.0);
        assert_eq!(results.color_pair_averages.len(), 10);
        assert!(results.color_pair_averages[0].colors.starts_with("W/"));
    }

    #[test]
    fn test_color_pairs_in_combination_order_on_ties() {
        let pairs = color_pair_averages(&[]);
        let labels: Vec<&str> = pairs.iter().map(|p| p.colors.as_str()).collect();
        assert_eq!(
            labels,
            vec!["W/R", "W/B", "W/U", "W/G", "R/B", "R/U", "R/G", "B/U", "B/G", "U/G"]
        );
    }

    #[test]
    fn test_top_and_bottom_by_color() {
        let t = table(
            &["Kevin"],
            vec![
                card("R1", Rarity::Common, Color::Red, &[Some("A")]),
                card("R2", Rarity::Common, Color::Red, &[Some("C")]),
                card("R3", Rarity::Common, Color::Red, &[Some("B")]),
                card("R4", Rarity::Common, Color::Red, &[Some("D")]),
                card("R5", Rarity::Common, Color::Red, &[Some("B")]),
                card("B1", Rarity::Common, Color::Black, &[Some("G")]),
                card("U1", Rarity::Uncommon, Color::Red, &[Some("A+")]),
            ],
        );
        let scored: Vec<ScoredCard> = t.cards.iter().map(ScoredCard::new).collect();

        let top = top_by_color(&scored, Rarity::Common, 3);
        assert_eq!(names(&top, |r| r.name.as_str()), vec!["B1", "R1", "R3", "R5"]);

        let bottom = bottom_by_color(&scored, Rarity::Common, 3);
        assert_eq!(names(&bottom, |r| r.name.as_str()), vec!["B1", "R4", "R2", "R3"]);

        // Every selected red card scores at least as well as every unselected one.
        let min_selected = top
            .iter()
            .filter(|r| r.color == Color::Red)
            .map(|r| r.group)
            .fold(f64::INFINITY, f64::min);
        let red_commons = scored.iter().filter(|s| {
            s.card.color == Some(Color::Red) && s.card.rarity == Some(Rarity::Common)
        });
        for s in red_commons {
            if !top.iter().any(|r| r.name == s.card.name) {
                assert!(s.group <= min_selected);
            }
        }

        let uncommon = top_by_color(&scored, Rarity::Uncommon, 3);
        assert_eq!(names(&uncommon, |r| r.name.as_str()), vec!["U1"]);
        assert!(top_by_color(&scored, Rarity::Mythic, 3).is_empty());
    }

    #[test]
    fn test_top_and_bottom_disjoint_in_large_bucket() {
        let grades = ["A+", "A", "B", "C", "D", "G"];
        let cards = grades
            .iter()
            .enumerate()
            .map(|(i, g)| {
                card(&format!("G{i}"), Rarity::Common, Color::Green, &[Some(*g)])
            })
            .collect();
        let t = table(&["Kevin"], cards);
        let scored: Vec<ScoredCard> = t.cards.iter().map(ScoredCard::new).collect();

        let top = names(&top_by_color(&scored, Rarity::Common, 3), |r| r.name.as_str());
        let bottom = names(&bottom_by_color(&scored, Rarity::Common, 3), |r| r.name.as_str());
        assert_eq!(top, vec!["G0", "G1", "G2"]);
        assert_eq!(bottom, vec!["G5", "G4", "G3"]);
        assert!(top.iter().all(|name| !bottom.contains(name)));
    }

    #[test]
    fn test_partly_rated_cards_are_ranked_with_deflated_group() {
        let t = table(
            &["Kevin", "Nate"],
            vec![
                card("Full", Rarity::Common, Color::Red, &[Some("C"), Some("C")]),
                card("Half", Rarity::Common, Color::Red, &[Some("A+"), None]),
            ],
        );
        let results = aggregate(&t);

        let bottom = names(&results.bottom_3_overall, |r| r.name.as_str());
        assert_eq!(bottom, vec!["Full", "Half"]);
        assert_eq!(results.bottom_3_overall[1].group, 6.0);

        let white_red = results
            .color_pair_averages
            .iter()
            .find(|p| p.colors == "W/R")
            .unwrap();
        assert_eq!(white_red.average_rating, 5.5);

        let top = names(&results.top_3_commons_by_color, |r| r.name.as_str());
        assert_eq!(top, vec!["Half", "Full"]);

        // Half has a single grade: no variance, and no deviation for either rater.
        assert_eq!(names(&results.top_15_variance, |r| r.name.as_str()), vec!["Full"]);
        assert!(results.hot_takes.get("Nate").unwrap().iter().all(|h| h.name != "Half"));
    }

    #[test]
    fn test_bottom_overall_keeps_order_on_ties() {
        let t = table(
            &["Kevin"],
            vec![
                card("A", Rarity::Common, Color::Red, &[Some("C")]),
                card("B", Rarity::Rare, Color::Blue, &[Some("D")]),
                card("C", Rarity::Common, Color::Green, &[Some("C")]),
                card("D", Rarity::Mythic, Color::White, &[Some("C")]),
            ],
        );
        let scored: Vec<ScoredCard> = t.cards.iter().map(ScoredCard::new).collect();
        let bottom = bottom_overall(&scored, 3);
        assert_eq!(names(&bottom, |r| r.name.as_str()), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_identical_grades_have_zero_variance() {
        let t = table(
            &["Kevin", "Nate", "Jon"],
            vec![
                card("Same", Rarity::Common, Color::Red, &[Some("B"), Some("B"), Some("B")]),
                card("Split", Rarity::Common, Color::Red, &[Some("A+"), Some("G"), Some("B")]),
            ],
        );
        let results = aggregate(&t);
        assert_eq!(results.top_15_variance[0].name, "Split");
        assert_eq!(results.top_15_variance[1].name, "Same");
        assert_eq!(results.top_15_variance[1].variance, 0.0);
    }

    #[test]
    fn test_deviation_undefined_without_own_grade() {
        assert_eq!(deviation(&[None, Some(5.0), Some(7.0)], 0), None);
        assert_eq!(deviation(&[Some(12.0), Some(5.0), Some(7.0)], 0), Some(6.0));
        assert_eq!(deviation(&[Some(12.0)], 0), None);
    }

    #[test]
    fn test_hot_takes_skip_cards_the_rater_did_not_grade() {
        let t = table(
            &["Kevin", "Nate"],
            vec![
                card("Graded", Rarity::Common, Color::Red, &[Some("A+"), Some("G")]),
                card("Skipped", Rarity::Common, Color::Red, &[None, Some("A")]),
                card("Close", Rarity::Common, Color::Red, &[Some("B"), Some("B-")]),
            ],
        );

        let results = aggregate(&t);
        let kevin = results.hot_takes.get("Kevin").unwrap();
        assert_eq!(names(kevin, |r| r.name.as_str()), vec!["Graded", "Close"]);
        assert_eq!(kevin[0].deviation, 12.0);
        assert_eq!(kevin[0].ratings[1], ("Nate".to_string(), Some("G".to_string())));

        // Incomplete rows still land in the full table.
        assert_eq!(results.all_cards.len(), 3);
        assert_eq!(results.all_cards[1].group, 5.5);
        assert_eq!(results.unrated_cards.get("Kevin"), Some(&vec!["Skipped".to_string()]));
        assert_eq!(results.unrated_cards.get("Nate"), Some(&vec![]));
    }

    #[test]
    fn test_single_rater_has_no_hot_takes_or_variance() {
        let t = table(
            &["Kevin"],
            vec![card("Solo", Rarity::Common, Color::Red, &[Some("A")])],
        );
        let results = aggregate(&t);
        assert!(results.hot_takes.get("Kevin").unwrap().is_empty());
        assert!(results.top_15_variance.is_empty());
        assert_eq!(results.all_cards[0].variance, None);
    }
}

//! Rating aggregation.
//!
//! Converts merged letter grades to the numeric scale, computes group
//! scores and variance, and ranks cards by color, rarity and rater
//! disagreement.

pub mod aggregate;
pub mod analyzer;
pub mod grade;
pub mod types;
pub mod utility;

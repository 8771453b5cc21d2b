//! AVAILABILITY RANK
//!
//! How easy a herb is to obtain, independent of therapeutic merit:
//! availability and popularity raise the rank, cost lowers it (inverted as
//! `1 - cost`).

pub const AVAILABILITY_WEIGHT: f64 = 0.5;
pub const POPULARITY_WEIGHT: f64 = 0.3;
pub const AFFORDABILITY_WEIGHT: f64 = 0.2;

/// Cost at or below this earns an affordability remark
pub const AFFORDABLE_COST_THRESHOLD: f64 = 0.4;

/// `0.5 * availability + 0.3 * popularity + 0.2 * (1 - cost)`
pub fn availability_rank(availability: f64, popularity: f64, cost: f64) -> f64 {
    AVAILABILITY_WEIGHT * availability
        + POPULARITY_WEIGHT * popularity
        + AFFORDABILITY_WEIGHT * (1.0 - cost)
}

pub fn is_affordable(cost: f64) -> bool {
    cost <= AFFORDABLE_COST_THRESHOLD
}

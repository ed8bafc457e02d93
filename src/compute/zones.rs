//! Route-to-zone lookup tables and per-leg travel times.
//!
//! A work cycle visits five zones in order: collect, travel, score, return,
//! and back to the collection zone.

use crate::schema::{RobotParameters, Route, Zone};

/// Zones visited during one work cycle.
pub type ZoneSequence = [Zone; CYCLE_LENGTH];

/// Number of zones in one work cycle.
pub const CYCLE_LENGTH: usize = 5;

/// Travel time used for any zone pair without a dedicated parameter.
pub const FALLBACK_TRAVEL_TIME: f32 = 2.0;

/// Map a route to the zone sequence it cycles through.
pub fn route_to_zones(route: Route) -> ZoneSequence {
    use Zone::*;

    match route {
        Route::CenterViaBump => [Center, Bump, Score, Bump, Center],
        Route::CenterViaSide => [Center, Side, Score, Side, Center],
        Route::WingViaSide => [Side, Side, Score, Side, Side],
    }
}

/// Base travel time for the leg arriving at `sequence[leg_index]`.
///
/// Lookups are directional: only center->bump, center->side, side->score and
/// bump->score have dedicated parameters. Every other pair, leg 0, and any
/// out-of-range index use [`FALLBACK_TRAVEL_TIME`].
pub fn travel_time_for_leg(params: &RobotParameters, sequence: &[Zone], leg_index: usize) -> f32 {
    if leg_index == 0 || leg_index >= sequence.len() {
        return FALLBACK_TRAVEL_TIME;
    }

    match (sequence[leg_index - 1], sequence[leg_index]) {
        (Zone::Center, Zone::Bump) => params.travel_center_to_bump,
        (Zone::Center, Zone::Side) => params.travel_center_to_side,
        (Zone::Side, Zone::Score) => params.travel_side_to_score,
        (Zone::Bump, Zone::Score) => params.travel_bump_to_score,
        _ => FALLBACK_TRAVEL_TIME,
    }
}

/// Index of the scoring zone within a sequence.
pub fn score_index(sequence: &[Zone]) -> Option<usize> {
    sequence.iter().position(|&z| z == Zone::Score)
}

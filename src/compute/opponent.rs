//! Opponent defender model.
//!
//! The opposing defender rotates through a fixed schedule independent of
//! anything the alliance does.

use crate::schema::Zone;

/// Seconds the opponent spends in each zone before moving on.
pub const OPPONENT_PHASE_SECONDS: f32 = 10.0;

/// Zones the opponent rotates through, one per phase.
pub const OPPONENT_SCHEDULE: [Zone; 3] = [Zone::Score, Zone::Bump, Zone::Center];

/// Zone contested by the opponent at elapsed match time `t`.
#[inline]
pub fn opponent_zone(t: f32) -> Zone {
    let phase = (t / OPPONENT_PHASE_SECONDS).floor() as i64;
    OPPONENT_SCHEDULE[phase.rem_euclid(OPPONENT_SCHEDULE.len() as i64) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_schedule() {
        assert_eq!(opponent_zone(0.0), Zone::Score);
        assert_eq!(opponent_zone(9.75), Zone::Score);
        assert_eq!(opponent_zone(10.0), Zone::Bump);
        assert_eq!(opponent_zone(19.75), Zone::Bump);
        assert_eq!(opponent_zone(20.0), Zone::Center);
        assert_eq!(opponent_zone(30.0), Zone::Score);
        assert_eq!(opponent_zone(129.75), Zone::Score);
        assert_eq!(opponent_zone(130.0), Zone::Bump);
        assert_eq!(opponent_zone(134.75), Zone::Bump);
    }

    proptest! {
        #[test]
        fn prop_period_thirty(step in 0u32..1_000_000) {
            let t = step as f32 * 0.25;
            prop_assert_eq!(opponent_zone(t), opponent_zone(t + 30.0));
        }

        #[test]
        fn prop_never_side(step in 0u32..1_000_000) {
            let zone = opponent_zone(step as f32 * 0.25);
            prop_assert!(OPPONENT_SCHEDULE.contains(&zone));
            prop_assert_ne!(zone, Zone::Side);
        }
    }
}

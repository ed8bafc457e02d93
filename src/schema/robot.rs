//! Robot parameter and genome types for alliance evolution.

use serde::{Deserialize, Serialize};

use super::ParameterBounds;

/// Number of robots in one alliance (and agent records per genome).
pub const ALLIANCE_SIZE: usize = 3;

/// Shared field zone used for congestion and defense modeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Zone {
    Center,
    Bump,
    Side,
    Score,
}

impl Zone {
    /// Every zone, in index order.
    pub const ALL: [Zone; 4] = [Zone::Center, Zone::Bump, Zone::Side, Zone::Score];

    /// Dense index for per-zone tables.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Zone::Center => 0,
            Zone::Bump => 1,
            Zone::Side => 2,
            Zone::Score => 3,
        }
    }
}

/// Strategic role of a robot within the alliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Hopper,
    Feeder,
    Shooter,
    Hybrid,
    Defender,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Hopper,
        Role::Feeder,
        Role::Shooter,
        Role::Hybrid,
        Role::Defender,
    ];
}

/// Route a robot takes through the field on each work cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Route {
    /// Collect at center, cross the bump, score.
    CenterViaBump,
    /// Collect at center, take the side lane, score.
    #[default]
    CenterViaSide,
    /// Collect along the wing, take the side lane, score.
    WingViaSide,
}

impl Route {
    pub const ALL: [Route; 3] = [Route::CenterViaBump, Route::CenterViaSide, Route::WingViaSide];
}

/// Heritable parameters of one robot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotParameters {
    pub role: Role,
    pub route: Route,
    /// Collection rate at center (units/s).
    pub collection_rate_center: f32,
    /// Collection rate along the wing (units/s).
    pub collection_rate_wing: f32,
    /// Shooting rate (units/s).
    pub shooting_rate: f32,
    /// Base travel time center -> bump (s).
    pub travel_center_to_bump: f32,
    /// Base travel time center -> side (s).
    pub travel_center_to_side: f32,
    /// Base travel time side -> score (s).
    pub travel_side_to_score: f32,
    /// Base travel time bump -> score (s).
    pub travel_bump_to_score: f32,
    /// Scoring accuracy with no defender present.
    pub accuracy_open: f32,
    /// Scoring accuracy while defended.
    pub accuracy_defended: f32,
    /// Maximum units held.
    pub max_capacity: f32,
    /// Fraction of capacity collected per cycle.
    pub cycle_size_preference: f32,
    /// Willingness to play defense instead of cycling.
    pub defend_aggressiveness: f32,
}

impl RobotParameters {
    /// Read a bounded numeric field.
    pub fn get(&self, field: NumericField) -> f32 {
        match field {
            NumericField::CollectionRateCenter => self.collection_rate_center,
            NumericField::CollectionRateWing => self.collection_rate_wing,
            NumericField::ShootingRate => self.shooting_rate,
            NumericField::TravelCenterToBump => self.travel_center_to_bump,
            NumericField::TravelCenterToSide => self.travel_center_to_side,
            NumericField::TravelSideToScore => self.travel_side_to_score,
            NumericField::TravelBumpToScore => self.travel_bump_to_score,
            NumericField::AccuracyOpen => self.accuracy_open,
            NumericField::AccuracyDefended => self.accuracy_defended,
            NumericField::MaxCapacity => self.max_capacity,
            NumericField::CycleSizePreference => self.cycle_size_preference,
            NumericField::DefendAggressiveness => self.defend_aggressiveness,
        }
    }

    /// Overwrite a bounded numeric field.
    pub fn set(&mut self, field: NumericField, value: f32) {
        let slot = match field {
            NumericField::CollectionRateCenter => &mut self.collection_rate_center,
            NumericField::CollectionRateWing => &mut self.collection_rate_wing,
            NumericField::ShootingRate => &mut self.shooting_rate,
            NumericField::TravelCenterToBump => &mut self.travel_center_to_bump,
            NumericField::TravelCenterToSide => &mut self.travel_center_to_side,
            NumericField::TravelSideToScore => &mut self.travel_side_to_score,
            NumericField::TravelBumpToScore => &mut self.travel_bump_to_score,
            NumericField::AccuracyOpen => &mut self.accuracy_open,
            NumericField::AccuracyDefended => &mut self.accuracy_defended,
            NumericField::MaxCapacity => &mut self.max_capacity,
            NumericField::CycleSizePreference => &mut self.cycle_size_preference,
            NumericField::DefendAggressiveness => &mut self.defend_aggressiveness,
        };
        *slot = value;
    }

    /// Units collected before heading out to score.
    #[inline]
    pub fn cycle_load(&self) -> f32 {
        (self.max_capacity * self.cycle_size_preference).max(1.0)
    }

    /// Whether this robot sits out of the cycle to play defense.
    #[inline]
    pub fn plays_defense(&self) -> bool {
        self.role == Role::Defender && self.defend_aggressiveness > 0.5
    }

    /// Check every numeric field against its clamp range.
    pub fn validate(&self, slot: usize, bounds: &ParameterBounds) -> Result<(), GenomeError> {
        for field in NumericField::ALL {
            let value = self.get(field);
            let (lo, hi) = bounds.get(field).limits;
            if !value.is_finite() || value < lo || value > hi {
                return Err(GenomeError::OutOfDomain {
                    slot,
                    field,
                    value,
                    lo,
                    hi,
                });
            }
        }
        Ok(())
    }
}

/// Bounded numeric fields of [`RobotParameters`], in declaration order.
///
/// The order is part of the random draw sequence used for initialization and
/// mutation; reordering changes results for a fixed seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericField {
    CollectionRateCenter,
    CollectionRateWing,
    ShootingRate,
    TravelCenterToBump,
    TravelCenterToSide,
    TravelSideToScore,
    TravelBumpToScore,
    AccuracyOpen,
    AccuracyDefended,
    MaxCapacity,
    CycleSizePreference,
    DefendAggressiveness,
}

impl NumericField {
    pub const ALL: [NumericField; 12] = [
        NumericField::CollectionRateCenter,
        NumericField::CollectionRateWing,
        NumericField::ShootingRate,
        NumericField::TravelCenterToBump,
        NumericField::TravelCenterToSide,
        NumericField::TravelSideToScore,
        NumericField::TravelBumpToScore,
        NumericField::AccuracyOpen,
        NumericField::AccuracyDefended,
        NumericField::MaxCapacity,
        NumericField::CycleSizePreference,
        NumericField::DefendAggressiveness,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NumericField::CollectionRateCenter => "collection_rate_center",
            NumericField::CollectionRateWing => "collection_rate_wing",
            NumericField::ShootingRate => "shooting_rate",
            NumericField::TravelCenterToBump => "travel_center_to_bump",
            NumericField::TravelCenterToSide => "travel_center_to_side",
            NumericField::TravelSideToScore => "travel_side_to_score",
            NumericField::TravelBumpToScore => "travel_bump_to_score",
            NumericField::AccuracyOpen => "accuracy_open",
            NumericField::AccuracyDefended => "accuracy_defended",
            NumericField::MaxCapacity => "max_capacity",
            NumericField::CycleSizePreference => "cycle_size_preference",
            NumericField::DefendAggressiveness => "defend_aggressiveness",
        }
    }

    /// Fields that divide or drive durations and must stay strictly positive.
    pub fn is_strictly_positive(self) -> bool {
        matches!(
            self,
            NumericField::CollectionRateCenter
                | NumericField::CollectionRateWing
                | NumericField::ShootingRate
                | NumericField::TravelCenterToBump
                | NumericField::TravelCenterToSide
                | NumericField::TravelSideToScore
                | NumericField::TravelBumpToScore
        )
    }

    /// Fields that are probabilities or fractions and must stay within [0, 1].
    pub fn is_fraction(self) -> bool {
        matches!(
            self,
            NumericField::AccuracyOpen
                | NumericField::AccuracyDefended
                | NumericField::CycleSizePreference
                | NumericField::DefendAggressiveness
        )
    }
}

impl std::fmt::Display for NumericField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One candidate alliance: exactly [`ALLIANCE_SIZE`] robot records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    pub robots: [RobotParameters; ALLIANCE_SIZE],
}

impl Genome {
    pub fn new(robots: [RobotParameters; ALLIANCE_SIZE]) -> Self {
        Self { robots }
    }

    /// Validate every robot record against the clamp ranges.
    pub fn validate(&self, bounds: &ParameterBounds) -> Result<(), GenomeError> {
        self.robots
            .iter()
            .enumerate()
            .try_for_each(|(slot, robot)| robot.validate(slot, bounds))
    }

    pub fn iter(&self) -> impl Iterator<Item = &RobotParameters> {
        self.robots.iter()
    }
}

impl TryFrom<Vec<RobotParameters>> for Genome {
    type Error = GenomeError;

    fn try_from(robots: Vec<RobotParameters>) -> Result<Self, Self::Error> {
        let actual = robots.len();
        let robots: [RobotParameters; ALLIANCE_SIZE] =
            robots.try_into().map_err(|_| GenomeError::WrongAllianceSize {
                expected: ALLIANCE_SIZE,
                actual,
            })?;
        Ok(Self { robots })
    }
}

/// Genome construction and validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenomeError {
    #[error("Genome must contain exactly {expected} robots, got {actual}")]
    WrongAllianceSize { expected: usize, actual: usize },
    #[error("Robot {slot}: {field} = {value} is outside [{lo}, {hi}]")]
    OutOfDomain {
        slot: usize,
        field: NumericField,
        value: f32,
        lo: f32,
        hi: f32,
    },
}

#[cfg(test)]
pub(crate) fn sample_robot() -> RobotParameters {
    RobotParameters {
        role: Role::Shooter,
        route: Route::CenterViaSide,
        collection_rate_center: 2.0,
        collection_rate_wing: 1.5,
        shooting_rate: 3.0,
        travel_center_to_bump: 3.0,
        travel_center_to_side: 2.5,
        travel_side_to_score: 2.0,
        travel_bump_to_score: 1.5,
        accuracy_open: 0.9,
        accuracy_defended: 0.5,
        max_capacity: 10.0,
        cycle_size_preference: 1.0,
        defend_aggressiveness: 0.2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_index_matches_all() {
        for (i, zone) in Zone::ALL.iter().enumerate() {
            assert_eq!(zone.index(), i);
        }
    }

    #[test]
    fn test_cycle_load_floor() {
        let mut robot = sample_robot();
        robot.max_capacity = 5.0;
        robot.cycle_size_preference = 0.1;
        assert_eq!(robot.cycle_load(), 1.0);

        robot.max_capacity = 40.0;
        robot.cycle_size_preference = 0.5;
        assert_eq!(robot.cycle_load(), 20.0);
    }

    #[test]
    fn test_field_get_set() {
        let mut robot = sample_robot();
        for (i, field) in NumericField::ALL.into_iter().enumerate() {
            robot.set(field, i as f32 + 0.5);
        }
        for (i, field) in NumericField::ALL.into_iter().enumerate() {
            assert_eq!(robot.get(field), i as f32 + 0.5);
        }
    }

    #[test]
    fn test_genome_wrong_length() {
        let err = Genome::try_from(vec![sample_robot(), sample_robot()]).unwrap_err();
        assert_eq!(
            err,
            GenomeError::WrongAllianceSize {
                expected: 3,
                actual: 2
            }
        );

        let genome = Genome::try_from(vec![sample_robot(), sample_robot(), sample_robot()]);
        assert!(genome.is_ok());
    }

    #[test]
    fn test_validate_out_of_domain() {
        let bounds = ParameterBounds::default();
        let mut genome = Genome::new([sample_robot(), sample_robot(), sample_robot()]);
        assert!(genome.validate(&bounds).is_ok());

        genome.robots[1].accuracy_open = 1.5;
        match genome.validate(&bounds) {
            Err(GenomeError::OutOfDomain { slot, field, .. }) => {
                assert_eq!(slot, 1);
                assert_eq!(field, NumericField::AccuracyOpen);
            }
            other => panic!("expected out-of-domain error, got {other:?}"),
        }
    }

    #[test]
    fn test_deserialize_rejects_short_alliance() {
        let robot = serde_json::to_value(sample_robot()).unwrap();
        let json = serde_json::json!({ "robots": [robot.clone(), robot] });
        assert!(serde_json::from_value::<Genome>(json).is_err());
    }
}

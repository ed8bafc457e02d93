//! Configuration types for match simulation parameters.

use serde::{Deserialize, Serialize};

/// Upper limit on time steps per match.
pub const MAX_STEP_COUNT: usize = 10_000_000;

/// Timing of one simulated match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchConfig {
    /// Match length in seconds.
    #[serde(default = "default_match_duration")]
    pub match_duration: f32,
    /// Time step size in seconds.
    #[serde(default = "default_step_duration")]
    pub step_duration: f32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            match_duration: default_match_duration(),
            step_duration: default_step_duration(),
        }
    }
}

fn default_match_duration() -> f32 {
    135.0
}
fn default_step_duration() -> f32 {
    0.25
}

impl MatchConfig {
    /// Number of fixed time steps in one match.
    ///
    /// Truncates like integer division, except that a quotient within float
    /// noise of an integer snaps to that integer.
    pub fn step_count(&self) -> usize {
        let ratio = self.match_duration / self.step_duration;
        let nearest = ratio.round();
        if (ratio - nearest).abs() < 1e-4 {
            nearest as usize
        } else {
            ratio.floor() as usize
        }
    }

    /// Elapsed match time at the start of `step`.
    #[inline]
    pub fn time_at(&self, step: usize) -> f32 {
        step as f32 * self.step_duration
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.step_duration > 0.0) || !self.step_duration.is_finite() {
            return Err(ConfigError::InvalidTimeStep(self.step_duration));
        }
        if !(self.match_duration > 0.0) || !self.match_duration.is_finite() {
            return Err(ConfigError::InvalidMatchDuration(self.match_duration));
        }
        let ratio = self.match_duration / self.step_duration;
        if !ratio.is_finite() || ratio > MAX_STEP_COUNT as f32 {
            return Err(ConfigError::TooManySteps {
                steps: ratio,
                max: MAX_STEP_COUNT,
            });
        }
        if self.step_count() == 0 {
            return Err(ConfigError::MatchShorterThanStep {
                match_duration: self.match_duration,
                step_duration: self.step_duration,
            });
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Time step must be positive, got {0}")]
    InvalidTimeStep(f32),
    #[error("Match duration must be positive, got {0}")]
    InvalidMatchDuration(f32),
    #[error("Match duration {match_duration}s is shorter than one {step_duration}s step")]
    MatchShorterThanStep {
        match_duration: f32,
        step_duration: f32,
    },
    #[error("Match would need {steps} steps, more than the limit of {max}")]
    TooManySteps { steps: f32, max: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_step_count() {
        let config = MatchConfig::default();
        assert_eq!(config.step_count(), 540);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_step_count_snaps_float_noise() {
        let config = MatchConfig {
            match_duration: 135.0,
            step_duration: 0.1,
        };
        assert_eq!(config.step_count(), 1350);
    }

    #[test]
    fn test_step_count_truncates() {
        let config = MatchConfig {
            match_duration: 10.0,
            step_duration: 3.0,
        };
        assert_eq!(config.step_count(), 3);
    }

    #[test]
    fn test_invalid_configs() {
        let zero_step = MatchConfig {
            step_duration: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            zero_step.validate(),
            Err(ConfigError::InvalidTimeStep(_))
        ));

        let too_short = MatchConfig {
            match_duration: 0.1,
            step_duration: 0.25,
        };
        assert!(matches!(
            too_short.validate(),
            Err(ConfigError::MatchShorterThanStep { .. })
        ));
    }

    #[test]
    fn test_step_count_capped() {
        let huge = MatchConfig {
            match_duration: 3e38,
            step_duration: 1e-3,
        };
        assert!(matches!(
            huge.validate(),
            Err(ConfigError::TooManySteps { .. })
        ));

        let at_limit = MatchConfig {
            match_duration: 1_000.0,
            step_duration: 1e-3,
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let parsed = serde_json::from_str::<MatchConfig>(r#"{ "match_duraton": 20.0 }"#);
        assert!(parsed.is_err());

        let parsed: MatchConfig =
            serde_json::from_str(r#"{ "match_duration": 20.0, "step_duration": 0.5 }"#).unwrap();
        assert_eq!(parsed.step_count(), 40);
    }
}

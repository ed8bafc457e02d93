//! Genome manipulation utilities for evolutionary search.
//!
//! Provides random generation, crossover, mutation, and tournament sampling.
//! Every random draw goes through one seeded [`StdRng`] in a fixed order, so a
//! run is reproducible from its seed.

use rand::prelude::*;
use rand::seq::index;
use rand_distr::Uniform;

use crate::schema::{FieldBounds, Genome, NumericField, ParameterBounds, RobotParameters, Role, Route};

/// Mutation deltas are drawn from +/- this fraction of a field's clamp range.
pub const MUTATION_SPAN: f32 = 0.25;

/// Random number generator wrapper for genome operations.
pub struct GenomeRng {
    rng: StdRng,
}

impl GenomeRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generate a random alliance within the initialization ranges.
    pub fn random_genome(&mut self, bounds: &ParameterBounds) -> Genome {
        Genome::new(std::array::from_fn(|_| self.random_robot(bounds)))
    }

    /// Generate one random robot: role, route, then numeric fields in order.
    pub fn random_robot(&mut self, bounds: &ParameterBounds) -> RobotParameters {
        let role = self.random_role();
        let route = self.random_route();

        let mut robot = RobotParameters {
            role,
            route,
            collection_rate_center: 0.0,
            collection_rate_wing: 0.0,
            shooting_rate: 0.0,
            travel_center_to_bump: 0.0,
            travel_center_to_side: 0.0,
            travel_side_to_score: 0.0,
            travel_bump_to_score: 0.0,
            accuracy_open: 0.0,
            accuracy_defended: 0.0,
            max_capacity: 0.0,
            cycle_size_preference: 0.0,
            defend_aggressiveness: 0.0,
        };
        for field in NumericField::ALL {
            let value = self.uniform(bounds.get(field).init);
            robot.set(field, value);
        }
        robot
    }

    fn random_role(&mut self) -> Role {
        Role::ALL[self.rng.gen_range(0..Role::ALL.len())]
    }

    fn random_route(&mut self) -> Route {
        Route::ALL[self.rng.gen_range(0..Route::ALL.len())]
    }

    /// Uniform random in bounds.
    fn uniform(&mut self, bounds: (f32, f32)) -> f32 {
        self.rng.gen_range(bounds.0..=bounds.1)
    }

    /// Uniform perturbation of up to [`MUTATION_SPAN`] of the clamp range, then clamp.
    pub fn uniform_mutate(&mut self, value: f32, bounds: &FieldBounds) -> f32 {
        let span = bounds.span() * MUTATION_SPAN;
        let delta = self.rng.sample(Uniform::new_inclusive(-span, span));
        bounds.clamp(value + delta)
    }

    /// Uniform per-slot crossover: each robot comes whole from one parent.
    pub fn crossover(&mut self, parent1: &Genome, parent2: &Genome) -> Genome {
        Genome::new(std::array::from_fn(|slot| {
            if self.rng.r#gen::<f32>() < 0.5 {
                parent1.robots[slot].clone()
            } else {
                parent2.robots[slot].clone()
            }
        }))
    }

    /// Mutate a genome.
    pub fn mutate(&mut self, genome: &mut Genome, rate: f32, bounds: &ParameterBounds) {
        for robot in &mut genome.robots {
            self.mutate_robot(robot, rate, bounds);
        }
    }

    /// Mutate robot parameters.
    ///
    /// Role and route are resampled outright; numeric fields are perturbed
    /// and clamped.
    fn mutate_robot(&mut self, robot: &mut RobotParameters, rate: f32, bounds: &ParameterBounds) {
        if self.rng.r#gen::<f32>() < rate {
            robot.role = self.random_role();
        }
        if self.rng.r#gen::<f32>() < rate {
            robot.route = self.random_route();
        }

        for field in NumericField::ALL {
            if self.rng.r#gen::<f32>() < rate {
                let mutated = self.uniform_mutate(robot.get(field), bounds.get(field));
                robot.set(field, mutated);
            }
        }
    }

    /// Draw `amount` distinct indices below `len`, in draw order.
    pub fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        index::sample(&mut self.rng, len, amount.min(len)).into_vec()
    }
}

/// Index of the fittest entry among `contenders`; the first maximum wins ties.
pub fn tournament_winner(fitness: &[f32], contenders: &[usize]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for &idx in contenders {
        match best {
            Some(b) if fitness[idx] <= fitness[b] => {}
            _ => best = Some(idx),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ALLIANCE_SIZE;
    use proptest::prelude::*;

    fn within_limits(genome: &Genome, bounds: &ParameterBounds) -> bool {
        genome.validate(bounds).is_ok()
    }

    #[test]
    fn test_random_genome() {
        let mut rng = GenomeRng::new(42);
        let bounds = ParameterBounds::default();

        let genome = rng.random_genome(&bounds);
        for robot in genome.iter() {
            for field in NumericField::ALL {
                let (lo, hi) = bounds.get(field).init;
                let value = robot.get(field);
                assert!(value >= lo && value <= hi, "{field} = {value}");
            }
        }
    }

    #[test]
    fn test_same_seed_same_genome() {
        let bounds = ParameterBounds::default();
        let a = GenomeRng::new(9).random_genome(&bounds);
        let b = GenomeRng::new(9).random_genome(&bounds);
        assert_eq!(a, b);
    }

    #[test]
    fn test_crossover_takes_whole_robots() {
        let mut rng = GenomeRng::new(42);
        let bounds = ParameterBounds::default();

        let g1 = rng.random_genome(&bounds);
        let g2 = rng.random_genome(&bounds);

        for _ in 0..20 {
            let child = rng.crossover(&g1, &g2);
            assert_eq!(child.robots.len(), ALLIANCE_SIZE);
            for slot in 0..ALLIANCE_SIZE {
                let robot = &child.robots[slot];
                assert!(robot == &g1.robots[slot] || robot == &g2.robots[slot]);
            }
        }
    }

    #[test]
    fn test_zero_rate_mutation_is_identity() {
        let mut rng = GenomeRng::new(3);
        let bounds = ParameterBounds::default();
        let original = rng.random_genome(&bounds);

        let mut genome = original.clone();
        rng.mutate(&mut genome, 0.0, &bounds);
        assert_eq!(genome, original);
    }

    #[test]
    fn test_mutation_clamps_at_limits() {
        let mut rng = GenomeRng::new(5);
        let bounds = ParameterBounds::default();
        let mut genome = rng.random_genome(&bounds);
        for robot in genome.robots.iter_mut() {
            robot.accuracy_open = bounds.accuracy_open.limits.1;
            robot.max_capacity = bounds.max_capacity.limits.0;
        }

        for _ in 0..50 {
            rng.mutate(&mut genome, 1.0, &bounds);
            assert!(within_limits(&genome, &bounds));
        }
    }

    #[test]
    fn test_tournament_first_max_wins() {
        let fitness = [1.0, 5.0, 3.0, 5.0, 0.0];
        assert_eq!(tournament_winner(&fitness, &[0, 2, 4]), Some(2));
        assert_eq!(tournament_winner(&fitness, &[3, 1, 2]), Some(3));
        assert_eq!(tournament_winner(&fitness, &[1, 3]), Some(1));
        assert_eq!(tournament_winner(&fitness, &[]), None);
    }

    #[test]
    fn test_sample_indices_distinct() {
        let mut rng = GenomeRng::new(11);
        for _ in 0..100 {
            let mut idxs = rng.sample_indices(10, 4);
            assert_eq!(idxs.len(), 4);
            idxs.sort_unstable();
            idxs.dedup();
            assert_eq!(idxs.len(), 4);
            assert!(idxs.iter().all(|&i| i < 10));
        }
        assert_eq!(rng.sample_indices(3, 8).len(), 3);
    }

    proptest! {
        #[test]
        fn prop_mutation_stays_in_limits(seed in any::<u64>(), rate in 0.0f32..=1.0) {
            let mut rng = GenomeRng::new(seed);
            let bounds = ParameterBounds::default();
            let mut genome = rng.random_genome(&bounds);

            for _ in 0..10 {
                rng.mutate(&mut genome, rate, &bounds);
                prop_assert!(within_limits(&genome, &bounds));
            }
        }

        #[test]
        fn prop_crossover_keeps_alliance_size(seed in any::<u64>()) {
            let mut rng = GenomeRng::new(seed);
            let bounds = ParameterBounds::default();
            let g1 = rng.random_genome(&bounds);
            let g2 = rng.random_genome(&bounds);

            let child = rng.crossover(&g1, &g2);
            prop_assert_eq!(child.robots.len(), ALLIANCE_SIZE);
            prop_assert!(within_limits(&child, &bounds));
        }
    }
}

//! Population management: group breeding, truncation and best extraction.
//!
//! Fitness is a difference measure, so every ranking here sorts ascending:
//! the best individual is the one with the lowest fitness.

use log::debug;
use serde::Serialize;

use crate::schema::{Circle, GenomeConstraints, MutationConfig};

use super::fitness::FitnessEvaluator;
use super::genome::{GenomeRng, MutationOutcome};

/// A genome together with its cached fitness.
///
/// Only the evaluator creates individuals, and replacing the circles
/// always rescores, so the cached fitness matches the circles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Individual {
    circles: Vec<Circle>,
    fitness: u64,
}

impl Individual {
    pub(crate) fn from_scored(circles: Vec<Circle>, fitness: u64) -> Self {
        Self { circles, fitness }
    }

    /// Circles in painter's order.
    #[inline]
    pub fn circles(&self) -> &[Circle] {
        &self.circles
    }

    /// Cached fitness (lower is better).
    #[inline]
    pub fn fitness(&self) -> u64 {
        self.fitness
    }

    /// Number of circles.
    #[inline]
    pub fn len(&self) -> usize {
        self.circles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.circles.is_empty()
    }

    /// Replace the circles and rescore.
    pub fn set_circles(&mut self, circles: Vec<Circle>, evaluator: &FitnessEvaluator) {
        self.fitness = evaluator.score(&circles);
        self.circles = circles;
    }

    /// Mutate in place and rescore.
    pub fn mutate(
        &mut self,
        rng: &mut GenomeRng,
        evaluator: &FitnessEvaluator,
        constraints: &GenomeConstraints,
        mutation: &MutationConfig,
    ) -> MutationOutcome {
        let outcome =
            rng.mutate_circles(&mut self.circles, evaluator.target(), constraints, mutation);
        self.fitness = evaluator.score(&self.circles);
        outcome
    }
}

/// Build a child from two parents, mutate it, and return it scored.
pub fn breed(
    rng: &mut GenomeRng,
    evaluator: &FitnessEvaluator,
    parent_a: &Individual,
    parent_b: &Individual,
    constraints: &GenomeConstraints,
    mutation: &MutationConfig,
) -> Individual {
    let circles = rng.crossover(parent_a.circles(), parent_b.circles());
    let mut child = evaluator.evaluate(circles);
    child.mutate(rng, evaluator, constraints, mutation);
    child
}

/// Whether a child is at least as good as one of its parents.
#[inline]
pub fn admits(child: &Individual, parent_a: &Individual, parent_b: &Individual) -> bool {
    child.fitness <= parent_a.fitness || child.fitness <= parent_b.fitness
}

/// Outcome of one growth phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrowthStats {
    /// Crossover children admitted into the population.
    pub children_admitted: usize,
    /// Crossover children discarded for being worse than both parents.
    pub children_rejected: usize,
    /// Singleton groups whose member was copied and mutated.
    pub singles_mutated: usize,
}

/// Collection of individuals with a nominal size.
#[derive(Debug, Clone)]
pub struct Population {
    members: Vec<Individual>,
    nominal_size: usize,
    group_size: usize,
}

impl Population {
    /// Create a population from already scored individuals.
    pub fn new(members: Vec<Individual>, nominal_size: usize, group_size: usize) -> Self {
        Self {
            members,
            nominal_size,
            group_size: group_size.max(1),
        }
    }

    /// Current members, in no particular order.
    pub fn members(&self) -> &[Individual] {
        &self.members
    }

    /// Current size.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Average fitness of the members.
    pub fn avg_fitness(&self) -> f64 {
        if self.members.is_empty() {
            return 0.0;
        }
        self.members.iter().map(|m| m.fitness as f64).sum::<f64>() / self.members.len() as f64
    }

    /// Growth phase.
    ///
    /// Shuffles the population and splits it into groups of `group_size`.
    /// In each group of two or more, the fittest member is crossed with the
    /// second fittest and then with the third (or the second again for a
    /// pair). Children are mutated and kept only when they are at least as
    /// good as one of their parents. A lone member is copied, mutated, and
    /// the copy appended.
    pub fn grow(
        &mut self,
        rng: &mut GenomeRng,
        evaluator: &FitnessEvaluator,
        constraints: &GenomeConstraints,
        mutation: &MutationConfig,
    ) -> GrowthStats {
        rng.shuffle(&mut self.members);

        let mut stats = GrowthStats::default();
        let mut offspring = Vec::new();

        for group in self.members.chunks(self.group_size) {
            if group.len() == 1 {
                let mut copy = group[0].clone();
                copy.mutate(rng, evaluator, constraints, mutation);
                offspring.push(copy);
                stats.singles_mutated += 1;
                continue;
            }

            let mut ranked: Vec<&Individual> = group.iter().collect();
            ranked.sort_by_key(|m| m.fitness);

            let best = ranked[0];
            let partners = [ranked[1], if ranked.len() > 2 { ranked[2] } else { ranked[1] }];
            for partner in partners {
                let child = breed(rng, evaluator, best, partner, constraints, mutation);
                if admits(&child, best, partner) {
                    offspring.push(child);
                    stats.children_admitted += 1;
                } else {
                    stats.children_rejected += 1;
                }
            }
        }

        self.members.extend(offspring);
        debug!(
            "growth: population {} (+{} children, -{} rejected, {} singles)",
            self.members.len(),
            stats.children_admitted,
            stats.children_rejected,
            stats.singles_mutated
        );
        stats
    }

    /// Shrink phase: keep the `nominal_size` lowest-fitness members.
    ///
    /// Returns the number of members dropped.
    pub fn shrink(&mut self) -> usize {
        if self.members.len() <= self.nominal_size {
            return 0;
        }
        self.members.sort_by_key(|m| m.fitness);
        let dropped = self.members.len() - self.nominal_size;
        self.members.truncate(self.nominal_size);
        debug!("shrink: dropped {} members", dropped);
        dropped
    }

    /// The member with the lowest fitness.
    pub fn best(&self) -> Option<&Individual> {
        self.members.iter().min_by_key(|m| m.fitness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    const WHITE: [u8; 3] = [255, 255, 255];

    fn constraints() -> GenomeConstraints {
        GenomeConstraints {
            circle_count_bounds: (4, 12),
            radius_bounds: (1, 4),
        }
    }

    fn evaluator() -> FitnessEvaluator {
        let mut target = RgbImage::from_pixel(16, 16, Rgb([30, 60, 90]));
        for x in 0..16 {
            target.put_pixel(x, 8, Rgb([200, 10, 10]));
        }
        FitnessEvaluator::new(target, WHITE)
    }

    fn individual(fitness: u64) -> Individual {
        let circle = Circle {
            center: (fitness as u32 % 16, 0),
            radius: 1,
            color: [0, 0, 0],
        };
        Individual::from_scored(vec![circle, circle], fitness)
    }

    fn random_population(
        rng: &mut GenomeRng,
        evaluator: &FitnessEvaluator,
        size: usize,
        group_size: usize,
    ) -> Population {
        let members = (0..size)
            .map(|_| evaluator.evaluate(rng.random_circles(evaluator.target(), &constraints())))
            .collect();
        Population::new(members, size, group_size)
    }

    #[test]
    fn test_shrink_keeps_lowest_fitness() {
        let members = [50, 10, 40, 20, 30, 60].map(individual).to_vec();
        let mut population = Population::new(members, 4, 4);

        assert_eq!(population.shrink(), 2);
        let mut kept: Vec<u64> = population.members().iter().map(|m| m.fitness()).collect();
        kept.sort();
        assert_eq!(kept, vec![10, 20, 30, 40]);
    }

    #[test]
    fn test_shrink_keeps_small_population() {
        let members = [5, 3].map(individual).to_vec();
        let mut population = Population::new(members, 4, 4);
        assert_eq!(population.shrink(), 0);
        assert_eq!(population.len(), 2);
    }

    #[test]
    fn test_best_is_minimum() {
        let members = [7, 3, 9].map(individual).to_vec();
        let population = Population::new(members, 3, 2);
        assert_eq!(population.best().map(|b| b.fitness()), Some(3));
        assert!(Population::new(Vec::new(), 3, 2).best().is_none());
    }

    #[test]
    fn test_admission_rule() {
        let (a, b) = (individual(10), individual(20));
        assert!(admits(&individual(5), &a, &b));
        assert!(admits(&individual(20), &a, &b));
        assert!(!admits(&individual(21), &a, &b));
    }

    #[test]
    fn test_set_circles_rescores() {
        let evaluator = evaluator();
        let mut rng = GenomeRng::new(4);
        let mut member = evaluator.evaluate(rng.random_circles(evaluator.target(), &constraints()));

        let replacement = rng.random_circles(evaluator.target(), &constraints());
        let expected = evaluator.score(&replacement);
        member.set_circles(replacement, &evaluator);
        assert_eq!(member.fitness(), expected);
    }

    #[test]
    fn test_mutate_rescores() {
        let evaluator = evaluator();
        let mut rng = GenomeRng::new(8);
        let mut member = evaluator.evaluate(rng.random_circles(evaluator.target(), &constraints()));
        let mutation = MutationConfig {
            delete_fraction: 0.5,
            add_ratio_bounds: (1.0, 2.0),
        };
        for _ in 0..10 {
            member.mutate(&mut rng, &evaluator, &constraints(), &mutation);
            assert_eq!(member.fitness(), evaluator.score(member.circles()));
            assert!(member.len() >= 2);
        }
    }

    #[test]
    fn test_singleton_groups_append_mutated_copies() {
        let evaluator = evaluator();
        let mut rng = GenomeRng::new(12);
        let mut population = random_population(&mut rng, &evaluator, 3, 1);
        let before: Vec<Individual> = population.members().to_vec();

        let stats = population.grow(
            &mut rng,
            &evaluator,
            &constraints(),
            &MutationConfig::default(),
        );
        assert_eq!(stats.singles_mutated, 3);
        assert_eq!(stats.children_admitted + stats.children_rejected, 0);
        assert_eq!(population.len(), 6);
        // Originals survive untouched
        for original in &before {
            assert!(population.members().contains(original));
        }
    }

    #[test]
    fn test_pairs_attempt_two_children() {
        let evaluator = evaluator();
        let mut rng = GenomeRng::new(21);
        let mut population = random_population(&mut rng, &evaluator, 2, 4);

        let stats = population.grow(
            &mut rng,
            &evaluator,
            &constraints(),
            &MutationConfig::default(),
        );
        assert_eq!(stats.children_admitted + stats.children_rejected, 2);
        assert_eq!(population.len(), 2 + stats.children_admitted);
    }

    #[test]
    fn test_grow_then_shrink_restores_size() {
        let evaluator = evaluator();
        let mut rng = GenomeRng::new(33);
        // 10 members in groups of 4: two full groups and one pair
        let mut population = random_population(&mut rng, &evaluator, 10, 4);

        for _ in 0..5 {
            let best_before = population.best().map(|b| b.fitness()).unwrap();
            let stats = population.grow(
                &mut rng,
                &evaluator,
                &constraints(),
                &MutationConfig::default(),
            );
            assert_eq!(stats.children_admitted + stats.children_rejected, 6);
            assert!(population.members().iter().all(|m| m.len() >= 2));

            let pre_shrink: Vec<u64> = population.members().iter().map(|m| m.fitness()).collect();
            population.shrink();
            assert_eq!(population.len(), 10.min(pre_shrink.len()));

            let worst_kept = population.members().iter().map(|m| m.fitness()).max().unwrap();
            let mut sorted = pre_shrink.clone();
            sorted.sort();
            let dropped = &sorted[population.len()..];
            assert!(dropped.iter().all(|&f| f >= worst_kept));

            let best_after = population.best().map(|b| b.fitness()).unwrap();
            assert!(best_after <= best_before);
        }
    }
}

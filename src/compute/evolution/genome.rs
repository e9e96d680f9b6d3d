//! Genome manipulation utilities for evolutionary search.
//!
//! Provides random circle generation, chunked crossover, and
//! delete-then-add mutation. All randomness flows through one seedable
//! generator so runs can be replayed.

use log::trace;
use rand::prelude::*;

use image::RgbImage;
use crate::schema::{Circle, GenomeConstraints, MutationConfig};

/// Counts of circles removed and appended by one mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MutationOutcome {
    pub deleted: usize,
    pub added: usize,
}

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

    /// Create with random seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Generate a random circle whose color is sampled from the target at its center.
    pub fn random_circle(
        &mut self,
        target: &RgbImage,
        constraints: &GenomeConstraints,
    ) -> Circle {
        let x = self.rng.gen_range(0..target.width());
        let y = self.rng.gen_range(0..target.height());
        let (min_radius, max_radius) = constraints.radius_bounds;
        let radius = self.rng.gen_range(min_radius..=max_radius);

        Circle {
            center: (x, y),
            radius,
            color: target.get_pixel(x, y).0,
        }
    }

    /// Generate a fresh genome with a circle count inside the constraint bounds.
    pub fn random_circles(
        &mut self,
        target: &RgbImage,
        constraints: &GenomeConstraints,
    ) -> Vec<Circle> {
        let (min_count, max_count) = constraints.circle_count_bounds;
        let count = self.rng.gen_range(min_count..=max_count);
        (0..count)
            .map(|_| self.random_circle(target, constraints))
            .collect()
    }

    /// Perform crossover between two circle sequences.
    ///
    /// The shorter parent (length `m`) is split into `d` position-aligned
    /// chunks, `d` uniform in `[2, round(m/2)]` and clamped to at least 2.
    /// Chunks alternate between the shorter and the longer parent; the
    /// final chunk runs to the end of its parent, chosen by the parity of
    /// `d`. The child is therefore exactly as long as one of its parents.
    pub fn crossover(&mut self, a: &[Circle], b: &[Circle]) -> Vec<Circle> {
        // Ties put the second argument first
        let (first, second) = if a.len() < b.len() { (a, b) } else { (b, a) };
        let m = first.len();

        let max_divisions = round_div(m, 2).max(2);
        let divisions = self.rng.gen_range(2..=max_divisions);
        // Keep every non-final chunk inside the shorter parent
        let chunk = round_div(m, divisions).min(m / (divisions - 1));

        let mut child = Vec::with_capacity(second.len());
        for i in 0..divisions - 1 {
            let source = if i % 2 == 0 { first } else { second };
            child.extend_from_slice(clamped(source, i * chunk, (i + 1) * chunk));
        }

        let tail = if divisions % 2 == 0 { first } else { second };
        child.extend_from_slice(clamped(tail, (divisions - 1) * chunk, tail.len()));

        trace!(
            "crossover {}x{} -> {} circles ({} divisions of {})",
            first.len(),
            second.len(),
            child.len(),
            divisions,
            chunk
        );
        child
    }

    /// Mutate a circle sequence in place: delete a random subset, then
    /// append fresh random circles. At least 2 circles always remain.
    pub fn mutate_circles(
        &mut self,
        circles: &mut Vec<Circle>,
        target: &RgbImage,
        constraints: &GenomeConstraints,
        mutation: &MutationConfig,
    ) -> MutationOutcome {
        let n = circles.len();
        let max_delete = max_deletions(n, mutation.delete_fraction);
        let deleted = self.rng.gen_range(0..=max_delete);

        if deleted > 0 {
            let mut doomed = vec![false; n];
            for i in rand::seq::index::sample(&mut self.rng, n, deleted).into_iter() {
                doomed[i] = true;
            }
            let mut index = 0;
            circles.retain(|_| {
                let keep = !doomed[index];
                index += 1;
                keep
            });
        }

        let (add_min, add_max) = mutation.add_ratio_bounds;
        let low = (add_min * deleted as f64).round() as usize;
        let high = ((add_max * deleted as f64).round() as usize).max(low);
        let added = self.rng.gen_range(low..=high);
        circles.extend((0..added).map(|_| self.random_circle(target, constraints)));

        trace!("mutation: {} -> {} circles (-{} +{})", n, circles.len(), deleted, added);
        MutationOutcome { deleted, added }
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

/// Most circles one mutation may delete from `n`, leaving at least 2.
fn max_deletions(n: usize, delete_fraction: f64) -> usize {
    ((delete_fraction * n as f64).floor() as usize).min(n.saturating_sub(2))
}

/// `n / d` rounded to the nearest integer.
fn round_div(n: usize, d: usize) -> usize {
    (n as f64 / d as f64).round() as usize
}

/// `items[start..end]` with both ends clamped to the slice.
fn clamped(items: &[Circle], start: usize, end: usize) -> &[Circle] {
    let end = end.min(items.len());
    let start = start.min(end);
    &items[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use proptest::prelude::*;

    fn gradient_target(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 100]))
    }

    fn tagged(count: usize, tag: u8) -> Vec<Circle> {
        (0..count)
            .map(|i| Circle {
                center: (i as u32, 0),
                radius: 1,
                color: [tag, 0, 0],
            })
            .collect()
    }

    #[test]
    fn test_random_circle_samples_target() {
        let mut rng = GenomeRng::new(42);
        let target = gradient_target(32, 16);
        let constraints = GenomeConstraints {
            circle_count_bounds: (2, 10),
            radius_bounds: (1, 4),
        };

        for _ in 0..100 {
            let c = rng.random_circle(&target, &constraints);
            assert!(c.center.0 < 32);
            assert!(c.center.1 < 16);
            assert!((1..=4).contains(&c.radius));
            assert_eq!(c.color, [c.center.0 as u8, c.center.1 as u8, 100]);
        }
    }

    #[test]
    fn test_random_circles_count() {
        let mut rng = GenomeRng::new(7);
        let target = gradient_target(16, 16);
        let constraints = GenomeConstraints {
            circle_count_bounds: (5, 9),
            radius_bounds: (1, 2),
        };
        for _ in 0..20 {
            let n = rng.random_circles(&target, &constraints).len();
            assert!((5..=9).contains(&n));
        }
    }

    #[test]
    fn test_crossover_minimal_parents() {
        let mut rng = GenomeRng::new(1);
        let a = tagged(2, 1);
        let b = tagged(2, 2);
        // m = 2 clamps to two divisions: one chunk plus a tail, both from the same parent
        let child = rng.crossover(&a, &b);
        assert_eq!(child.len(), 2);
        assert!(child == a || child == b);
    }

    #[test]
    fn test_crossover_does_not_touch_parents() {
        let mut rng = GenomeRng::new(3);
        let a = tagged(10, 1);
        let b = tagged(30, 2);
        let (a_before, b_before) = (a.clone(), b.clone());
        let _ = rng.crossover(&a, &b);
        assert_eq!(a, a_before);
        assert_eq!(b, b_before);
    }

    #[test]
    fn test_crossover_keeps_positions() {
        let mut rng = GenomeRng::new(11);
        let a = tagged(20, 1);
        let b = tagged(40, 2);
        let child = rng.crossover(&a, &b);
        // Chunks are position-aligned, so position i always holds a circle
        // that sat at position i in one of the parents
        for (i, c) in child.iter().enumerate() {
            assert_eq!(c.center.0 as usize, i);
        }
    }

    #[test]
    fn test_mutation_respects_minimum() {
        let mut rng = GenomeRng::new(5);
        let target = gradient_target(8, 8);
        let constraints = GenomeConstraints {
            circle_count_bounds: (2, 2),
            radius_bounds: (1, 1),
        };
        let mutation = MutationConfig {
            delete_fraction: 1.0,
            add_ratio_bounds: (0.0, 0.0),
        };

        let mut circles = tagged(10, 1);
        for _ in 0..50 {
            rng.mutate_circles(&mut circles, &target, &constraints, &mutation);
            assert!(circles.len() >= 2);
        }
    }

    #[test]
    fn test_max_deletions_floors_exact_fractions() {
        assert_eq!(max_deletions(10, 0.7), 7);
        assert_eq!(max_deletions(10, 0.3), 3);
        assert_eq!(max_deletions(200, 0.1), 20);
        assert_eq!(max_deletions(19, 0.5), 9);
        // Never below two survivors
        assert_eq!(max_deletions(10, 1.0), 8);
        assert_eq!(max_deletions(2, 1.0), 0);
    }

    #[test]
    fn test_mutation_can_reach_max_deletions() {
        let target = gradient_target(8, 8);
        let constraints = GenomeConstraints::default();
        let mutation = MutationConfig {
            delete_fraction: 0.7,
            add_ratio_bounds: (0.0, 0.0),
        };

        let most = (0..500u64)
            .map(|seed| {
                let mut circles = tagged(10, 1);
                GenomeRng::new(seed)
                    .mutate_circles(&mut circles, &target, &constraints, &mutation)
                    .deleted
            })
            .max();
        assert_eq!(most, Some(7));
    }

    #[test]
    fn test_mutation_keeps_survivor_order() {
        let mut rng = GenomeRng::new(9);
        let target = gradient_target(8, 8);
        let constraints = GenomeConstraints::default();
        let mutation = MutationConfig {
            delete_fraction: 0.5,
            add_ratio_bounds: (0.0, 0.0),
        };

        let mut circles = tagged(40, 1);
        let outcome = rng.mutate_circles(&mut circles, &target, &constraints, &mutation);
        assert_eq!(outcome.added, 0);
        assert_eq!(circles.len(), 40 - outcome.deleted);
        assert!(circles.windows(2).all(|w| w[0].center.0 < w[1].center.0));
    }

    #[test]
    fn test_seeded_rng_replays() {
        let target = gradient_target(16, 16);
        let constraints = GenomeConstraints {
            circle_count_bounds: (3, 8),
            radius_bounds: (1, 3),
        };
        let mut a = GenomeRng::new(99);
        let mut b = GenomeRng::new(99);
        assert_eq!(
            a.random_circles(&target, &constraints),
            b.random_circles(&target, &constraints)
        );
    }

    proptest! {
        #[test]
        fn prop_crossover_length_between_parents(
            len_a in 2usize..120,
            len_b in 2usize..120,
            seed in any::<u64>(),
        ) {
            let mut rng = GenomeRng::new(seed);
            let a = tagged(len_a, 1);
            let b = tagged(len_b, 2);
            let child = rng.crossover(&a, &b);
            prop_assert!(child.len() == len_a || child.len() == len_b);
            for (i, c) in child.iter().enumerate() {
                prop_assert_eq!(c.center.0 as usize, i);
            }
        }

        #[test]
        fn prop_mutation_count_delta(
            len in 2usize..150,
            fraction in 0.0f64..=1.0,
            add_min in 0.0f64..2.0,
            add_extra in 0.0f64..2.0,
            seed in any::<u64>(),
        ) {
            let mut rng = GenomeRng::new(seed);
            let target = gradient_target(8, 8);
            let constraints = GenomeConstraints {
                circle_count_bounds: (2, 10),
                radius_bounds: (1, 3),
            };
            let mutation = MutationConfig {
                delete_fraction: fraction,
                add_ratio_bounds: (add_min, add_min + add_extra),
            };

            let mut circles = tagged(len, 1);
            let outcome = rng.mutate_circles(&mut circles, &target, &constraints, &mutation);
            prop_assert!(circles.len() >= 2);
            prop_assert_eq!(circles.len() + outcome.deleted, len + outcome.added);
            prop_assert!(outcome.deleted <= (fraction * len as f64).floor() as usize);
        }
    }
}

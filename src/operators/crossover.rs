//! Crossover operators

use rand::Rng;

use crate::genome::control_sequence::ControlSequence;
use crate::operators::traits::CrossoverOperator;

/// One-point crossover that also shortens genomes.
///
/// With `size = min(len(p1), len(p2))` and a cut `c` drawn from
/// `[1, size - 1]`, the children are `p1[..c] ++ p2[c..size]` and
/// `p2[..c] ++ p1[c..size]`. Both children are therefore exactly `size`
/// steps long, whatever the parent lengths. Parents with `size <= 1` are
/// returned as clones.
#[derive(Clone, Debug, Default)]
pub struct OnePointShrinkCrossover;

impl OnePointShrinkCrossover {
    pub fn new() -> Self {
        Self
    }
}

impl CrossoverOperator<ControlSequence> for OnePointShrinkCrossover {
    fn crossover<R: Rng>(
        &self,
        parent1: &ControlSequence,
        parent2: &ControlSequence,
        rng: &mut R,
    ) -> (ControlSequence, ControlSequence) {
        let size = parent1.len().min(parent2.len());
        if size <= 1 {
            return (parent1.clone(), parent2.clone());
        }

        let cut = rng.gen_range(1..size);
        let (a, b) = (parent1.controls(), parent2.controls());

        let mut child1 = Vec::with_capacity(size);
        child1.extend_from_slice(&a[..cut]);
        child1.extend_from_slice(&b[cut..size]);

        let mut child2 = Vec::with_capacity(size);
        child2.extend_from_slice(&b[..cut]);
        child2.extend_from_slice(&a[cut..size]);

        (
            ControlSequence::from_vec(child1),
            ControlSequence::from_vec(child2),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn filled(v: f64, len: usize) -> ControlSequence {
        ControlSequence::from_pairs(&vec![(v, v); len]).unwrap()
    }

    #[test]
    fn test_children_take_shorter_length() {
        let mut rng = StdRng::seed_from_u64(42);
        let p1 = filled(0.0, 10);
        let p2 = filled(1.0, 6);
        for _ in 0..50 {
            let (c1, c2) = OnePointShrinkCrossover::new().crossover(&p1, &p2, &mut rng);
            assert_eq!(c1.len(), 6);
            assert_eq!(c2.len(), 6);
        }
    }

    #[test]
    fn test_children_are_prefix_suffix_swaps() {
        let mut rng = StdRng::seed_from_u64(7);
        let p1 = filled(0.0, 8);
        let p2 = filled(1.0, 8);
        let (c1, c2) = OnePointShrinkCrossover::new().crossover(&p1, &p2, &mut rng);

        // Exactly one switch point, at the same position in both children
        let cut = c1.iter().position(|c| c.left == 1.0).unwrap();
        assert!((1..8).contains(&cut));
        assert!(c1.iter().take(cut).all(|c| c.left == 0.0));
        assert!(c1.iter().skip(cut).all(|c| c.left == 1.0));
        assert!(c2.iter().take(cut).all(|c| c.left == 1.0));
        assert!(c2.iter().skip(cut).all(|c| c.left == 0.0));
    }

    #[test]
    fn test_cut_covers_full_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let p1 = filled(0.0, 4);
        let p2 = filled(1.0, 4);
        let mut seen = [false; 4];
        for _ in 0..200 {
            let (c1, _) = OnePointShrinkCrossover::new().crossover(&p1, &p2, &mut rng);
            let cut = c1.iter().position(|c| c.left == 1.0).unwrap();
            seen[cut] = true;
        }
        assert_eq!(seen, [false, true, true, true]);
    }

    #[test]
    fn test_short_parents_are_cloned() {
        let mut rng = StdRng::seed_from_u64(0);
        let p1 = filled(0.2, 1);
        let p2 = filled(0.8, 5);
        let (c1, c2) = OnePointShrinkCrossover::new().crossover(&p1, &p2, &mut rng);
        assert_eq!(c1, p1);
        assert_eq!(c2, p2);
    }
}

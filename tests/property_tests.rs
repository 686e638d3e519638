//! Property-based tests for trailer-evo
//!
//! Uses proptest to verify invariants of the simulator, the cost function and
//! the variation operators.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use trailer_evo::prelude::*;

fn control_pairs(max_len: usize) -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((0.0..=1.0f64, 0.0..=1.0f64), 0..max_len)
}

fn genome(pairs: &[(f64, f64)]) -> ControlSequence {
    ControlSequence::from_pairs(pairs).unwrap()
}

fn arena_fitness() -> TrajectoryFitness {
    OptimizerConfig::default().fitness().unwrap()
}

proptest! {
    // ==================== Kinematics ====================

    #[test]
    fn simulate_preserves_length(pairs in control_pairs(200)) {
        let g = genome(&pairs);
        let trajectory = simulate(&g, Pose::new(5.0, 5.0, 0.0, 0.0));
        prop_assert_eq!(trajectory.len(), g.len());
    }

    #[test]
    fn simulate_is_deterministic(
        pairs in control_pairs(100),
        x in -50.0..50.0f64,
        theta in -3.0..3.0f64,
    ) {
        let g = genome(&pairs);
        let start = Pose::new(x, 10.0, theta, 0.1);
        prop_assert_eq!(simulate(&g, start), simulate(&g, start));
    }

    #[test]
    fn step_speed_bounded_by_forward_speed(pairs in control_pairs(50)) {
        let g = genome(&pairs);
        let start = Pose::new(0.0, 0.0, 0.0, 0.0);
        let trajectory = simulate(&g, start);
        let mut previous = start.position();
        for (pose, control) in trajectory.iter().zip(g.iter()) {
            let step = previous.distance(&pose.position());
            prop_assert!((step - control.forward_speed()).abs() < 1e-9);
            previous = pose.position();
        }
    }

    // ==================== Cost function ====================

    #[test]
    fn infeasible_iff_violation(pairs in control_pairs(120)) {
        let fitness = arena_fitness();
        let g = genome(&pairs);
        let assessment = fitness.assess(&g);
        let cost = fitness.evaluate(&g);

        prop_assert_eq!(is_feasible(cost), assessment.violation().is_none());
        prop_assert_eq!(cost.to_bits(), assessment.fitness().to_bits());
    }

    #[test]
    fn infeasible_iff_some_pose_violates(pairs in control_pairs(120)) {
        let fitness = arena_fitness();
        let g = genome(&pairs);
        let trajectory = simulate(&g, fitness.start());
        let workspace = fitness.workspace();

        let violates = trajectory.is_empty() || trajectory.iter().any(|p| {
            !p.is_finite()
                || p.phi.abs() > std::f64::consts::FRAC_PI_2
                || workspace.is_blocked(p.x, p.y)
        });
        prop_assert_eq!(!is_feasible(fitness.evaluate(&g)), violates);
    }

    #[test]
    fn feasible_cost_is_at_least_weighted_goal_distance(pairs in control_pairs(60)) {
        let fitness = arena_fitness();
        let g = genome(&pairs);
        if let Assessment::Feasible { fitness: cost, path_length, goal_distance } = fitness.assess(&g) {
            prop_assert!(path_length >= 0.0);
            prop_assert!((cost - (GOAL_WEIGHT * goal_distance + path_length)).abs() < 1e-6);
        }
    }

    // ==================== Operators ====================

    #[test]
    fn crossover_children_bounded_by_shorter_parent(
        a in control_pairs(60),
        b in control_pairs(60),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let (p1, p2) = (genome(&a), genome(&b));
        let (c1, c2) = OnePointShrinkCrossover::new().crossover(&p1, &p2, &mut rng);
        let size = p1.len().min(p2.len());

        if size <= 1 {
            prop_assert_eq!(&c1, &p1);
            prop_assert_eq!(&c2, &p2);
        } else {
            prop_assert_eq!(c1.len(), size);
            prop_assert_eq!(c2.len(), size);
        }
    }

    #[test]
    fn crossover_conserves_genes(
        a in control_pairs(40),
        b in control_pairs(40),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let (p1, p2) = (genome(&a), genome(&b));
        let (c1, c2) = OnePointShrinkCrossover::new().crossover(&p1, &p2, &mut rng);
        let size = p1.len().min(p2.len());
        if size > 1 {
            // At every position the children hold the parents' genes, in some order
            for i in 0..size {
                let parents = [p1[i], p2[i]];
                prop_assert!(parents.contains(&c1[i]));
                prop_assert!(parents.contains(&c2[i]));
                prop_assert!(c1[i] != c2[i] || p1[i] == p2[i]);
            }
        }
    }

    #[test]
    fn mutation_length_unchanged_or_one_shorter(
        pairs in prop::collection::vec((0.0..=1.0f64, 0.0..=1.0f64), 1..80),
        shrink in 0.0..=1.0f64,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mutation = GaussianShrinkMutation::new(0.1, 0.2, shrink).unwrap();
        let mut g = genome(&pairs);
        let before = g.len();

        match mutation.mutate(&mut g, &mut rng) {
            MutationOutcome::Shrunk => prop_assert_eq!(g.len() + 1, before),
            MutationOutcome::Perturbed { genes } => {
                prop_assert_eq!(g.len(), before);
                prop_assert!(genes <= before);
            }
        }
        prop_assert!(g.len() >= 1);
        prop_assert!(g.iter().all(|c| c.is_within(&Bounds::unit())));
    }

    #[test]
    fn tournament_returns_valid_index(
        costs in prop::collection::vec(0.0..1e6f64, 1..50),
        size in 1usize..6,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let population: Vec<Individual<ControlSequence>> = costs
            .iter()
            .map(|&c| Individual::with_fitness(genome(&[(0.5, 0.5)]), c))
            .collect();
        let selection = TournamentSelection::new(size).unwrap();
        for idx in selection.select_many(&population, 20, &mut rng) {
            prop_assert!(idx < population.len());
        }
    }
}

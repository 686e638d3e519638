//! Selection operators

use rand::Rng;

use crate::error::OperatorError;
use crate::genome::traits::EvolutionaryGenome;
use crate::operators::traits::SelectionOperator;
use crate::population::individual::Individual;

/// Tournament selection operator
///
/// Draws `tournament_size` contestants uniformly *with replacement* and keeps
/// the cheapest. Ties go to the contestant drawn first.
#[derive(Clone, Debug)]
pub struct TournamentSelection {
    /// Tournament size (number of individuals competing)
    tournament_size: usize,
}

impl TournamentSelection {
    /// Create a new tournament selection with the given size
    pub fn new(tournament_size: usize) -> Result<Self, OperatorError> {
        if tournament_size == 0 {
            return Err(OperatorError::InvalidConfiguration(
                "tournament size must be at least 1".to_string(),
            ));
        }
        Ok(Self { tournament_size })
    }

    pub fn tournament_size(&self) -> usize {
        self.tournament_size
    }
}

impl Default for TournamentSelection {
    fn default() -> Self {
        Self { tournament_size: 3 }
    }
}

impl<G: EvolutionaryGenome> SelectionOperator<G> for TournamentSelection {
    fn select<R: Rng>(&self, population: &[Individual<G>], rng: &mut R) -> usize {
        assert!(!population.is_empty(), "Population cannot be empty");

        let mut winner = rng.gen_range(0..population.len());
        for _ in 1..self.tournament_size {
            let contestant = rng.gen_range(0..population.len());
            if population[contestant].is_better_than(&population[winner]) {
                winner = contestant;
            }
        }
        winner
    }
}

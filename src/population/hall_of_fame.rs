//! Hall of fame
//!
//! Archive of the cheapest distinct individuals seen over a whole run,
//! independent of which of them are still in the population.

use crate::error::EvolutionError;
use crate::genome::traits::EvolutionaryGenome;
use crate::population::individual::Individual;
use crate::population::population::Population;

/// Best-ever individuals, kept sorted by ascending cost
#[derive(Clone, Debug)]
pub struct HallOfFame<G>
where
    G: EvolutionaryGenome,
{
    capacity: usize,
    members: Vec<Individual<G>>,
}

impl<G> HallOfFame<G>
where
    G: EvolutionaryGenome + PartialEq,
{
    /// Create an empty hall of fame holding at most `capacity` individuals
    pub fn new(capacity: usize) -> Result<Self, EvolutionError> {
        if capacity == 0 {
            return Err(EvolutionError::Configuration(
                "hall of fame capacity must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            capacity,
            members: Vec::with_capacity(capacity),
        })
    }

    /// Merge the evaluated members of `population` into the archive.
    ///
    /// An individual enters when there is room or when it is strictly cheaper
    /// than the current worst member; genomes already archived are skipped.
    /// Returns how many individuals entered.
    pub fn update(&mut self, population: &Population<G>) -> usize {
        let mut inserted = 0;
        for candidate in population.iter().filter(|i| i.is_evaluated()) {
            let full = self.members.len() >= self.capacity;
            if full {
                match self.members.last() {
                    Some(worst) if candidate.is_better_than(worst) => {}
                    _ => continue,
                }
            }
            if self.members.iter().any(|m| m.genome == candidate.genome) {
                continue;
            }
            if full {
                self.members.pop();
            }
            let at = self
                .members
                .partition_point(|m| !candidate.is_better_than(m));
            self.members.insert(at, candidate.clone());
            inserted += 1;
        }
        inserted
    }

    /// The cheapest archived individual
    pub fn best(&self) -> Option<&Individual<G>> {
        self.members.first()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Individual<G>> {
        self.members.iter()
    }

    pub fn into_members(self) -> Vec<Individual<G>> {
        self.members
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::traits::INFEASIBLE;
    use crate::genome::control_sequence::ControlSequence;

    fn ind(v: f64, cost: f64) -> Individual<ControlSequence> {
        Individual::with_fitness(ControlSequence::from_pairs(&[(v, v)]).unwrap(), cost)
    }

    fn costs(hof: &HallOfFame<ControlSequence>) -> Vec<f64> {
        hof.iter().map(|i| i.cost()).collect()
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        assert!(HallOfFame::<ControlSequence>::new(0).is_err());
    }

    #[test]
    fn test_keeps_cheapest_sorted() {
        let mut hof = HallOfFame::new(3).unwrap();
        let pop = Population::from_individuals(vec![
            ind(0.1, 40.0),
            ind(0.2, 10.0),
            ind(0.3, 30.0),
            ind(0.4, 20.0),
            ind(0.5, INFEASIBLE),
        ]);
        hof.update(&pop);
        assert_eq!(costs(&hof), vec![10.0, 20.0, 30.0]);
        assert_eq!(hof.best().unwrap().cost(), 10.0);
    }

    #[test]
    fn test_skips_duplicates_and_unevaluated() {
        let mut hof = HallOfFame::new(4).unwrap();
        let fresh = Individual::new(ControlSequence::from_pairs(&[(0.9, 0.9)]).unwrap());
        let pop = Population::from_individuals(vec![ind(0.1, 5.0), ind(0.1, 5.0), fresh]);
        assert_eq!(hof.update(&pop), 1);
        assert_eq!(hof.len(), 1);
    }

    #[test]
    fn test_never_worsens() {
        let mut hof = HallOfFame::new(2).unwrap();
        hof.update(&Population::from_individuals(vec![ind(0.1, 5.0), ind(0.2, 7.0)]));
        hof.update(&Population::from_individuals(vec![ind(0.3, 50.0), ind(0.4, INFEASIBLE)]));
        assert_eq!(costs(&hof), vec![5.0, 7.0]);
        hof.update(&Population::from_individuals(vec![ind(0.5, 6.0)]));
        assert_eq!(costs(&hof), vec![5.0, 6.0]);
    }

    #[test]
    fn test_infeasible_fill_until_feasible_arrive() {
        let mut hof = HallOfFame::new(2).unwrap();
        hof.update(&Population::from_individuals(vec![ind(0.1, INFEASIBLE)]));
        assert_eq!(hof.len(), 1);
        hof.update(&Population::from_individuals(vec![ind(0.2, 3.0), ind(0.3, 4.0)]));
        assert_eq!(costs(&hof), vec![3.0, 4.0]);
    }
}

use crate::genetic::PopulationFitness;

mod fast_non_dominated_sorting;

pub use fast_non_dominated_sorting::{FastNonDominatedSorting, dominates, fast_non_dominated_sorting};

/// Partitions a population into ordered Pareto fronts.
///
/// Front 0 holds the non-dominated rows, every later front is dominated by some row of an earlier
/// one. Fronts are disjoint. Implementations may stop once at least `n_survive` rows have been
/// ranked, but must always return the whole front that crosses that count.
pub trait NonDominatedSorter {
    fn sort(&self, population_fitness: &PopulationFitness, n_survive: usize) -> Vec<Vec<usize>>;
}

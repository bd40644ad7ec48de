use ndarray::{ArrayView1, Axis};

use crate::genetic::PopulationFitness;
use crate::non_dominated_sorting::NonDominatedSorter;

/// Inlines the check for "does f1 dominate f2?" to reduce call overhead.
/// Objectives are minimized.
#[inline]
pub fn dominates(f1: &ArrayView1<f64>, f2: &ArrayView1<f64>) -> bool {
    let mut better = false;
    // We assume f1.len() == f2.len()
    for (&a, &b) in f1.iter().zip(f2.iter()) {
        if a > b {
            return false;
        } else if a < b {
            better = true;
        }
    }
    better
}

/// Fast Non-Dominated Sorting.
/// Returns a vector of fronts, each front is a list of row indices in ascending order.
/// If during the construction of fronts the cumulative count of individuals reaches or exceeds
/// `min_survivors`, the entire last front is included (even if it causes the total to exceed
/// `min_survivors`) and no further fronts are added.
pub fn fast_non_dominated_sorting(
    population_fitness: &PopulationFitness,
    min_survivors: usize,
) -> Vec<Vec<usize>> {
    let population_size = population_fitness.nrows();
    if population_size == 0 {
        return Vec::new();
    }

    let mut domination_count = vec![0usize; population_size];
    let mut dominated_sets: Vec<Vec<usize>> = vec![Vec::new(); population_size];

    // Precompute row views to avoid repeated indexing
    let fitness_rows: Vec<ArrayView1<f64>> = population_fitness.axis_iter(Axis(0)).collect();

    for p in 0..population_size {
        for q in (p + 1)..population_size {
            if dominates(&fitness_rows[p], &fitness_rows[q]) {
                dominated_sets[p].push(q);
                domination_count[q] += 1;
            } else if dominates(&fitness_rows[q], &fitness_rows[p]) {
                dominated_sets[q].push(p);
                domination_count[p] += 1;
            }
        }
    }

    let first_front: Vec<usize> = (0..population_size)
        .filter(|&i| domination_count[i] == 0)
        .collect();
    let mut count = first_front.len();
    let mut fronts = vec![first_front];
    if count >= min_survivors {
        return fronts;
    }

    // Construct subsequent fronts
    loop {
        let mut next_front = Vec::new();
        for &p in &fronts[fronts.len() - 1] {
            for &q in &dominated_sets[p] {
                domination_count[q] -= 1;
                if domination_count[q] == 0 {
                    next_front.push(q);
                }
            }
        }
        if next_front.is_empty() {
            break;
        }
        next_front.sort_unstable();
        count += next_front.len();
        fronts.push(next_front);
        // The whole front that reaches min_survivors is kept, then construction stops.
        if count >= min_survivors {
            break;
        }
    }

    fronts
}

/// Deb's fast non-dominated sort, `O(M N^2)`.
#[derive(Clone, Debug, Default)]
pub struct FastNonDominatedSorting;

impl NonDominatedSorter for FastNonDominatedSorting {
    fn sort(&self, population_fitness: &PopulationFitness, n_survive: usize) -> Vec<Vec<usize>> {
        fast_non_dominated_sorting(population_fitness, n_survive)
    }
}

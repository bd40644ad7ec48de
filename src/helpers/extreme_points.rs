use ndarray::{Array1, Axis};

use crate::genetic::PopulationFitness;

// ---------------------------------------------------------------------------
// Auxiliary Functions for Ideal and Extreme Points
// ---------------------------------------------------------------------------

/// Computes the ideal point from a fitness matrix.
/// Each element of the returned array is the minimum value along the corresponding column.
pub fn get_ideal(population_fitness: &PopulationFitness) -> Array1<f64> {
    population_fitness.fold_axis(Axis(0), f64::INFINITY, |a, &b| a.min(b))
}

/// For every objective returns the row index of the individual with the largest value.
///
/// Ties go to the last row holding the maximum, which is what a stable ascending sort
/// followed by taking the last element would give.
pub fn find_extreme_points(population_fitness: &PopulationFitness) -> Vec<usize> {
    population_fitness
        .axis_iter(Axis(1))
        .map(|column| {
            let mut best = 0;
            for (i, &value) in column.iter().enumerate() {
                if value >= column[best] {
                    best = i;
                }
            }
            best
        })
        .collect()
}

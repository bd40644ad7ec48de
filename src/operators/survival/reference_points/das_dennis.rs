use ndarray::Array2;

use crate::operators::survival::reference_points::StructuredReferencePoints;

/// Das-Dennis structured points on the unit simplex.
///
/// The simplex is split into `n_objectives * n_divisions_per_objective` divisions, so the number
/// of points grows with the objective count even for a fixed density.
#[derive(Clone, Debug)]
pub struct DasDennisReferencePoints {
    n_objectives: usize,
    n_divisions_per_objective: usize,
}

impl DasDennisReferencePoints {
    pub fn new(n_objectives: usize, n_divisions_per_objective: usize) -> Self {
        Self {
            n_objectives,
            n_divisions_per_objective,
        }
    }

    /// Total number of divisions along every axis of the simplex.
    pub fn total_divisions(&self) -> usize {
        self.n_objectives * self.n_divisions_per_objective
    }

    /// Number of points `generate` returns: `C(H + M - 1, M - 1)` with `H` total divisions and
    /// `M` objectives. Zero objectives give no points.
    pub fn n_points(&self) -> usize {
        if self.n_objectives == 0 {
            return 0;
        }
        binomial_coefficient(
            self.total_divisions() + self.n_objectives - 1,
            self.n_objectives - 1,
        )
    }
}

impl StructuredReferencePoints for DasDennisReferencePoints {
    /// Generates every point whose coordinates are multiples of `1 / H` and add up to one.
    ///
    /// Rows come out in lexicographic order of the integer allocations. The last coordinate
    /// takes whatever is left so each row sums to one.
    fn generate(&self) -> Array2<f64> {
        if self.n_objectives == 0 {
            return Array2::zeros((0, 0));
        }
        let total = self.total_divisions();
        let mut points: Vec<Vec<usize>> = Vec::with_capacity(self.n_points());
        let mut current: Vec<usize> = Vec::with_capacity(self.n_objectives);
        generate_combinations(self.n_objectives, total, 0, &mut current, &mut points);

        let mut arr = Array2::<f64>::zeros((points.len(), self.n_objectives));
        for (i, combination) in points.iter().enumerate() {
            for (j, &h) in combination.iter().enumerate() {
                arr[[i, j]] = h as f64 / total as f64;
            }
        }
        arr
    }
}

/// Computes the binomial coefficient "n choose k".
pub fn binomial_coefficient(n: usize, k: usize) -> usize {
    let mut result = 1;
    for i in 0..k {
        result = result * (n - i) / (i + 1);
    }
    result
}

/// Recursively generates all combinations of nonnegative integers of length `n_objectives`
/// that sum to `left`.
fn generate_combinations(
    n_objectives: usize,
    left: usize,
    depth: usize,
    current: &mut Vec<usize>,
    points: &mut Vec<Vec<usize>>,
) {
    if depth == n_objectives - 1 {
        current.push(left);
        points.push(current.clone());
        current.pop();
        return;
    }
    for x in 0..=left {
        current.push(x);
        generate_combinations(n_objectives, left - x, depth + 1, current, points);
        current.pop();
    }
}

use log::trace;
use ndarray::{Array1, Array2, Axis};

use crate::genetic::PopulationFitness;
use crate::helpers::extreme_points::find_extreme_points;
use crate::helpers::linalg::{LinalgError, solve};

/// Smallest intercept span that is divided by directly.
pub const DEFAULT_EPSILON: f64 = 1e-20;

/// How `normalize_objectives` decides whether `intercept - ideal` is safe to divide by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DenominatorGuard {
    /// Divide when `|intercept - ideal| > epsilon`.
    #[default]
    Magnitude,
    /// Divide when `intercept - ideal > epsilon`. Negative spans of any size fall back to
    /// epsilon. This is the historical `abs(span > epsilon)` form of the check, where the
    /// absolute value wraps the comparison instead of the span.
    Literal,
}

impl DenominatorGuard {
    pub fn accepts(&self, denominator: f64, epsilon: f64) -> bool {
        match self {
            DenominatorGuard::Magnitude => denominator.abs() > epsilon,
            DenominatorGuard::Literal => denominator > epsilon,
        }
    }
}

pub trait HyperPlaneNormalization {
    /// One row per objective: the objective vector spanning the hyperplane on that axis.
    fn compute_extreme_points(&self, population_fitness: &PopulationFitness) -> Array2<f64>;

    /// Intercepts of the hyperplane through the extreme points with every objective axis.
    fn compute_hyperplane_intercepts(
        &self,
        population_fitness: &PopulationFitness,
    ) -> Result<Array1<f64>, LinalgError> {
        let extreme_points = self.compute_extreme_points(population_fitness);
        construct_hyperplane(&extreme_points)
    }
}

/// Takes, for each objective, the individual with the worst (largest) value as extreme point.
#[derive(Clone, Debug, Default)]
pub struct MaxObjectiveNormalization;

impl HyperPlaneNormalization for MaxObjectiveNormalization {
    fn compute_extreme_points(&self, population_fitness: &PopulationFitness) -> Array2<f64> {
        let indices = find_extreme_points(population_fitness);
        population_fitness.select(Axis(0), &indices)
    }
}

/// True if two rows of `points` hold exactly the same values.
pub fn has_duplicate_rows(points: &Array2<f64>) -> bool {
    let rows: Vec<_> = points.outer_iter().collect();
    rows.iter()
        .enumerate()
        .any(|(i, a)| rows[i + 1..].iter().any(|b| a == b))
}

/// Computes the intercepts vector `a` by solving the linear system:
/// Z_max * b = 1, where 1 is a vector of ones.
/// then the intercepts in the objective axis are given by a = 1/b
///
/// When two extreme points coincide there is no hyperplane to speak of and the extreme value of
/// every objective is used directly instead.
///
/// A zero component of `b` means the hyperplane is parallel to that axis: its intercept is
/// `f64::INFINITY` and the objective normalizes to zero.
pub fn construct_hyperplane(extreme_points: &Array2<f64>) -> Result<Array1<f64>, LinalgError> {
    if has_duplicate_rows(extreme_points) {
        trace!("duplicate extreme points, using their diagonal as intercepts");
        return Ok(extreme_points.diag().to_owned());
    }
    let ones = Array1::<f64>::ones(extreme_points.nrows());
    let b = solve(extreme_points, &ones)?;
    Ok(b.mapv(|val| if val == 0.0 { f64::INFINITY } else { 1.0 / val }))
}

/// Scales every objective by the span between its intercept and the ideal point.
///
/// The raw fitness is divided, not its translation by the ideal point. Spans rejected by `guard`
/// are replaced by `epsilon`, which keeps the order of the values while blowing up their scale.
pub fn normalize_objectives(
    population_fitness: &PopulationFitness,
    intercepts: &Array1<f64>,
    ideal_point: &Array1<f64>,
    guard: DenominatorGuard,
    epsilon: f64,
) -> Array2<f64> {
    let mut denominators = intercepts - ideal_point;
    denominators.mapv_inplace(|d| if guard.accepts(d, epsilon) { d } else { epsilon });

    let mut normalized = population_fitness.to_owned();
    for mut row in normalized.outer_iter_mut() {
        row /= &denominators;
    }
    normalized
}

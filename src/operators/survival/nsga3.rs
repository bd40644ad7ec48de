use log::{debug, trace};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use ndarray_stats::QuantileExt;
use ordered_float::OrderedFloat;

use crate::genetic::{Fitness, Population, PopulationFitness};
use crate::helpers::extreme_points::get_ideal;
use crate::non_dominated_sorting::{FastNonDominatedSorting, NonDominatedSorter};
use crate::operators::survival::helpers::{
    DEFAULT_EPSILON, DenominatorGuard, HyperPlaneNormalization, MaxObjectiveNormalization,
    normalize_objectives,
};
use crate::operators::survival::reference_points::{
    DasDennisReferencePoints, StructuredReferencePoints,
};
use crate::operators::survival::{SurvivalError, SurvivalOperator};
use crate::operators::GeneticOperator;
use crate::random::{MOORandomGenerator, RandomGenerator};

pub const DEFAULT_DIVISIONS_PER_OBJECTIVE: usize = 4;

/// Where the niching directions come from.
#[derive(Clone, Debug, PartialEq)]
pub enum ReferenceDirections {
    /// Das-Dennis points rebuilt on every call for the objective count of the front.
    Structured { n_divisions_per_objective: usize },
    /// Fixed directions, one per row.
    Custom(Array2<f64>),
}

/// A niching direction together with the bookkeeping of one niching call.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferencePoint {
    pub coordinates: Array1<f64>,
    /// Niche count. Incremented both by association and by every pick from this point.
    pub associations_count: usize,
    /// Front-local indices of the individuals still attached to this point.
    pub associations: Vec<usize>,
}

impl ReferencePoint {
    pub fn new(coordinates: Array1<f64>) -> Self {
        Self {
            coordinates,
            associations_count: 0,
            associations: Vec::new(),
        }
    }
}

/// Scratch record of one individual of the boundary front.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Association {
    pub reference_point: usize,
    pub distance: f64,
}

/// Distance from `point` to the line through the origin along `direction`.
pub fn perpendicular_distance(direction: ArrayView1<f64>, point: ArrayView1<f64>) -> f64 {
    let k = direction.dot(&point) / direction.dot(&direction);
    let offset = direction.mapv(|d| d * k) - &point;
    offset.dot(&offset).sqrt()
}

/// Attaches every row of `normalized` to the reference point at the smallest perpendicular
/// distance (first one on ties) and returns the per-row side table.
pub fn associate(
    normalized: &Array2<f64>,
    reference_points: &mut [ReferencePoint],
) -> Result<Vec<Association>, SurvivalError> {
    let mut associations = Vec::with_capacity(normalized.nrows());
    for (i, point) in normalized.outer_iter().enumerate() {
        let distances: Array1<f64> = reference_points
            .iter()
            .map(|rp| perpendicular_distance(rp.coordinates.view(), point))
            .collect();
        let best = distances.argmin().map_err(|e| {
            SurvivalError::InvalidFitness(format!("cannot associate individual {}: {}", i, e))
        })?;
        let rp = &mut reference_points[best];
        rp.associations_count += 1;
        rp.associations.push(i);
        associations.push(Association {
            reference_point: best,
            distance: distances[best],
        });
    }
    Ok(associations)
}

/// Picks `n_remaining` individuals, one at a time, from the least crowded reference points.
///
/// A point without attached individuals left is dropped for good. A point whose niche count is
/// still zero gives up its closest individual, any other point a random one. Each pick bumps the
/// niche count of its point.
pub fn niching(
    n_remaining: usize,
    reference_points: &mut [ReferencePoint],
    associations: &[Association],
    rng: &mut dyn RandomGenerator,
) -> Result<Vec<usize>, SurvivalError> {
    let mut available: Vec<usize> = (0..reference_points.len()).collect();
    let mut chosen = Vec::with_capacity(n_remaining);

    while chosen.len() < n_remaining {
        let exhausted = SurvivalError::EmptyReferencePointPool {
            selected: chosen.len(),
            requested: n_remaining,
        };
        let Some(min_count) = available
            .iter()
            .map(|&j| reference_points[j].associations_count)
            .min()
        else {
            return Err(exhausted);
        };
        let jmin: Vec<usize> = available
            .iter()
            .copied()
            .filter(|&j| reference_points[j].associations_count == min_count)
            .collect();
        let j_bar = *rng.choose_usize(&jmin).ok_or(exhausted)?;

        let rp = &mut reference_points[j_bar];
        let picked = if rp.associations_count == 0 {
            rp.associations
                .iter()
                .min_by_key(|&&s| OrderedFloat(associations[s].distance))
        } else {
            rng.choose_usize(&rp.associations)
        };
        let Some(&s_chosen) = picked else {
            trace!("reference point {} has no individuals left, dropping it", j_bar);
            available.retain(|&j| j != j_bar);
            continue;
        };

        rp.associations.retain(|&s| s != s_chosen);
        rp.associations_count += 1;
        chosen.push(s_chosen);
    }

    debug!(
        "niching picked {} of {} individuals, {} reference points still open",
        chosen.len(),
        associations.len(),
        available.len()
    );
    Ok(chosen)
}

fn validate_positive(value: usize, name: &str) -> Result<(), SurvivalError> {
    if value == 0 {
        return Err(SurvivalError::InvalidParameter(format!(
            "{} must be greater than 0",
            name
        )));
    }
    Ok(())
}

fn validate_epsilon(epsilon: f64) -> Result<(), SurvivalError> {
    if !(epsilon.is_finite() && epsilon > 0.0) {
        return Err(SurvivalError::InvalidParameter(format!(
            "epsilon must be a positive finite number, got {}",
            epsilon
        )));
    }
    Ok(())
}

fn validate_directions(points: &Array2<f64>) -> Result<(), SurvivalError> {
    if points.nrows() == 0 || points.ncols() < 2 {
        return Err(SurvivalError::InvalidParameter(format!(
            "reference points need at least one row and two columns, got {}x{}",
            points.nrows(),
            points.ncols()
        )));
    }
    for (i, row) in points.outer_iter().enumerate() {
        if row.iter().any(|v| !v.is_finite()) || row.dot(&row) == 0.0 {
            return Err(SurvivalError::InvalidParameter(format!(
                "reference point {} must be a finite, non zero direction",
                i
            )));
        }
    }
    Ok(())
}

fn validate_fitness(population_fitness: &PopulationFitness) -> Result<(), SurvivalError> {
    if population_fitness.ncols() < 2 {
        return Err(SurvivalError::InvalidFitness(format!(
            "at least two objectives are required, got {}",
            population_fitness.ncols()
        )));
    }
    if let Some((idx, _)) = population_fitness
        .indexed_iter()
        .find(|(_, v)| !v.is_finite())
    {
        return Err(SurvivalError::InvalidFitness(format!(
            "objective {} of individual {} is not finite",
            idx.1, idx.0
        )));
    }
    Ok(())
}

/// Stacks the objective vectors of `individuals` into one row each.
pub fn fitness_matrix<I: Fitness>(individuals: &[I]) -> Result<PopulationFitness, SurvivalError> {
    let n_objectives = individuals.first().map_or(0, |ind| ind.fitness().len());
    let mut data = Vec::with_capacity(individuals.len() * n_objectives);
    for (i, ind) in individuals.iter().enumerate() {
        let fitness = ind.fitness();
        if fitness.len() != n_objectives {
            return Err(SurvivalError::InvalidFitness(format!(
                "individual {} has {} objectives, expected {}",
                i,
                fitness.len(),
                n_objectives
            )));
        }
        data.extend(fitness.iter().copied());
    }
    Array2::from_shape_vec((individuals.len(), n_objectives), data)
        .map_err(|e| SurvivalError::InvalidFitness(e.to_string()))
}

struct Survivors {
    indices: Vec<usize>,
    /// Front index of every survivor, unknown when the population is returned untouched.
    ranks: Option<Vec<usize>>,
}

/// Survival operator of NSGA-III, presented in the paper An Evolutionary Many-Objective
/// Optimization Algorithm Using Reference-point Based Non-dominated Sorting Approach.
///
/// Whole fronts are kept while they fit; the front that overflows is cut down by niching around
/// reference directions. The result always holds exactly the requested number of individuals.
#[derive(Clone, Debug)]
pub struct Nsga3Survival<S = FastNonDominatedSorting> {
    reference_directions: ReferenceDirections,
    guard: DenominatorGuard,
    epsilon: f64,
    sorter: S,
}

impl Default for Nsga3Survival {
    fn default() -> Self {
        Self {
            reference_directions: ReferenceDirections::Structured {
                n_divisions_per_objective: DEFAULT_DIVISIONS_PER_OBJECTIVE,
            },
            guard: DenominatorGuard::default(),
            epsilon: DEFAULT_EPSILON,
            sorter: FastNonDominatedSorting,
        }
    }
}

impl Nsga3Survival {
    pub fn new(
        n_divisions_per_objective: usize,
        guard: DenominatorGuard,
        epsilon: f64,
    ) -> Result<Self, SurvivalError> {
        validate_positive(n_divisions_per_objective, "Number of divisions per objective")?;
        validate_epsilon(epsilon)?;
        Ok(Self {
            reference_directions: ReferenceDirections::Structured {
                n_divisions_per_objective,
            },
            guard,
            epsilon,
            sorter: FastNonDominatedSorting,
        })
    }

    /// Niches against fixed directions instead of generated ones. The column count has to match
    /// the objective count of every population passed in later.
    pub fn with_reference_points(
        points: Array2<f64>,
        guard: DenominatorGuard,
        epsilon: f64,
    ) -> Result<Self, SurvivalError> {
        validate_directions(&points)?;
        validate_epsilon(epsilon)?;
        Ok(Self {
            reference_directions: ReferenceDirections::Custom(points),
            guard,
            epsilon,
            sorter: FastNonDominatedSorting,
        })
    }
}

impl<S: NonDominatedSorter> Nsga3Survival<S> {
    /// Swaps the sorting collaborator.
    pub fn with_sorter<T: NonDominatedSorter>(self, sorter: T) -> Nsga3Survival<T> {
        Nsga3Survival {
            reference_directions: self.reference_directions,
            guard: self.guard,
            epsilon: self.epsilon,
            sorter,
        }
    }

    pub fn reference_directions(&self) -> &ReferenceDirections {
        &self.reference_directions
    }

    pub fn guard(&self) -> DenominatorGuard {
        self.guard
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Fresh reference points, with zeroed bookkeeping, for `n_objectives` objectives.
    pub fn reference_points(&self, n_objectives: usize) -> Result<Vec<ReferencePoint>, SurvivalError> {
        let points = match &self.reference_directions {
            ReferenceDirections::Structured {
                n_divisions_per_objective,
            } => DasDennisReferencePoints::new(n_objectives, *n_divisions_per_objective).generate(),
            ReferenceDirections::Custom(points) => {
                if points.ncols() != n_objectives {
                    return Err(SurvivalError::InvalidParameter(format!(
                        "reference points have {} objectives but the population has {}",
                        points.ncols(),
                        n_objectives
                    )));
                }
                points.clone()
            }
        };
        Ok(points
            .outer_iter()
            .map(|row| ReferencePoint::new(row.to_owned()))
            .collect())
    }

    /// Chooses `n_remaining` rows of the boundary front. Returned indices are rows of
    /// `front_fitness`.
    pub fn niching_select(
        &self,
        front_fitness: &PopulationFitness,
        n_remaining: usize,
        rng: &mut dyn RandomGenerator,
    ) -> Result<Vec<usize>, SurvivalError> {
        let front_len = front_fitness.nrows();
        if n_remaining > front_len {
            return Err(SurvivalError::SizeMismatch {
                requested: n_remaining,
                available: front_len,
            });
        }
        if front_len == n_remaining {
            return Ok((0..front_len).collect());
        }
        if n_remaining == 0 {
            return Ok(Vec::new());
        }
        validate_fitness(front_fitness)?;

        let ideal_point = get_ideal(front_fitness);
        let intercepts = MaxObjectiveNormalization.compute_hyperplane_intercepts(front_fitness)?;
        debug!(
            "boundary front ideal point {}, intercepts {}",
            ideal_point, intercepts
        );
        let normalized = normalize_objectives(
            front_fitness,
            &intercepts,
            &ideal_point,
            self.guard,
            self.epsilon,
        );

        let mut reference_points = self.reference_points(front_fitness.ncols())?;
        let associations = associate(&normalized, &mut reference_points)?;
        niching(n_remaining, &mut reference_points, &associations, rng)
    }

    /// Row indices of the `n_survive` survivors of `population_fitness`.
    pub fn select_indices(
        &self,
        population_fitness: &PopulationFitness,
        n_survive: usize,
        rng: &mut dyn RandomGenerator,
    ) -> Result<Vec<usize>, SurvivalError> {
        self.survivors(population_fitness, n_survive, rng)
            .map(|survivors| survivors.indices)
    }

    /// Selects `n_survive` of `individuals` and hands back references to them.
    pub fn select<'a, I: Fitness>(
        &self,
        individuals: &'a [I],
        n_survive: usize,
        rng: &mut dyn RandomGenerator,
    ) -> Result<Vec<&'a I>, SurvivalError> {
        if n_survive > individuals.len() {
            return Err(SurvivalError::SizeMismatch {
                requested: n_survive,
                available: individuals.len(),
            });
        }
        if n_survive == individuals.len() {
            return Ok(individuals.iter().collect());
        }
        let population_fitness = fitness_matrix(individuals)?;
        let indices = self.select_indices(&population_fitness, n_survive, rng)?;
        Ok(indices.into_iter().map(|i| &individuals[i]).collect())
    }

    fn survivors(
        &self,
        population_fitness: &PopulationFitness,
        n_survive: usize,
        rng: &mut dyn RandomGenerator,
    ) -> Result<Survivors, SurvivalError> {
        let population_size = population_fitness.nrows();
        if n_survive > population_size {
            return Err(SurvivalError::SizeMismatch {
                requested: n_survive,
                available: population_size,
            });
        }
        if n_survive == population_size {
            return Ok(Survivors {
                indices: (0..population_size).collect(),
                ranks: None,
            });
        }
        validate_fitness(population_fitness)?;

        let fronts = self.sorter.sort(population_fitness, n_survive);
        let mut indices = Vec::with_capacity(n_survive);
        let mut ranks = Vec::with_capacity(n_survive);
        for (rank, front) in fronts.into_iter().enumerate() {
            if indices.len() == n_survive {
                break;
            }
            if indices.len() + front.len() <= n_survive {
                debug!("front {} accepted whole ({} individuals)", rank, front.len());
                ranks.extend(std::iter::repeat_n(rank, front.len()));
                indices.extend(front);
                continue;
            }
            // This front does not fit: niche it and stop.
            let remaining = n_survive - indices.len();
            debug!(
                "front {} is the boundary front, niching {} of {} individuals",
                rank,
                remaining,
                front.len()
            );
            let front_fitness = population_fitness.select(Axis(0), &front);
            let chosen = self.niching_select(&front_fitness, remaining, rng)?;
            ranks.extend(std::iter::repeat_n(rank, chosen.len()));
            indices.extend(chosen.into_iter().map(|i| front[i]));
            break;
        }

        if indices.len() != n_survive {
            return Err(SurvivalError::InconsistentFronts {
                selected: indices.len(),
                requested: n_survive,
            });
        }
        Ok(Survivors {
            indices,
            ranks: Some(ranks),
        })
    }
}

impl<S: NonDominatedSorter + std::fmt::Debug> GeneticOperator for Nsga3Survival<S> {
    fn name(&self) -> String {
        "Nsga3Survival".to_string()
    }
}

impl<S: NonDominatedSorter + std::fmt::Debug> SurvivalOperator for Nsga3Survival<S> {
    fn operate(
        &self,
        population: Population,
        n_survive: usize,
        rng: &mut dyn RandomGenerator,
    ) -> Result<Population, SurvivalError> {
        let Survivors { indices, ranks } = self.survivors(&population.fitness, n_survive, rng)?;
        let mut survivors = population.selected(&indices);
        if let Some(ranks) = ranks {
            survivors.rank = Some(Array1::from(ranks));
        }
        Ok(survivors)
    }
}

/// One-shot NSGA-III selection with the default settings.
///
/// Passing the same `seed` with the same input order reproduces the same survivors. `None`
/// seeds from the thread-local generator.
pub fn select_nsga3<I: Fitness>(
    individuals: &[I],
    k: usize,
    seed: Option<u64>,
) -> Result<Vec<&I>, SurvivalError> {
    let mut rng = MOORandomGenerator::new_from_seed(seed);
    Nsga3Survival::default().select(individuals, k, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::linalg::LinalgError;
    use crate::random::TestDummyRng;
    use ndarray::array;
    use rand::RngCore;
    use rstest::rstest;

    struct FakeRandomGenerator {
        dummy: TestDummyRng,
    }

    impl FakeRandomGenerator {
        fn new() -> Self {
            Self {
                dummy: TestDummyRng,
            }
        }
    }

    impl RandomGenerator for FakeRandomGenerator {
        fn rng(&mut self) -> &mut dyn RngCore {
            &mut self.dummy
        }
        fn choose_usize<'a>(&mut self, vector: &'a [usize]) -> Option<&'a usize> {
            // Always choose the first element for deterministic behavior.
            vector.first()
        }
    }

    fn reference_point(coordinates: Array1<f64>, count: usize, members: Vec<usize>) -> ReferencePoint {
        ReferencePoint {
            coordinates,
            associations_count: count,
            associations: members,
        }
    }

    #[test]
    fn test_perpendicular_distance() {
        let direction = array![1.0, 0.0];
        let point = array![3.0, 4.0];
        assert!((perpendicular_distance(direction.view(), point.view()) - 4.0).abs() < 1e-12);

        // Points on the line are at distance zero, whatever the direction's length.
        let direction = array![2.0, 2.0];
        let point = array![0.5, 0.5];
        assert!(perpendicular_distance(direction.view(), point.view()).abs() < 1e-12);
    }

    #[test]
    fn test_associate() {
        let normalized = array![[1.0, 10.0], [10.0, 1.0]];
        let mut reference_points = vec![
            ReferencePoint::new(array![1.0, 0.0]),
            ReferencePoint::new(array![0.0, 1.0]),
        ];
        let associations = associate(&normalized, &mut reference_points).unwrap();

        assert_eq!(associations[0].reference_point, 1);
        assert_eq!(associations[1].reference_point, 0);
        for association in &associations {
            assert!((association.distance - 1.0).abs() < 1e-12);
        }
        assert_eq!(reference_points[0].associations, vec![1]);
        assert_eq!(reference_points[1].associations, vec![0]);
        assert_eq!(reference_points[0].associations_count, 1);
        assert_eq!(reference_points[1].associations_count, 1);
    }

    #[test]
    fn test_associate_measures_distance_to_reference_line() {
        // The reference point is the line, the individual the projected point: (3, 4) is 4 away
        // from the line along (1, 0). Swapping the roles would give 0.8.
        let normalized = array![[3.0, 4.0]];
        let mut reference_points = vec![ReferencePoint::new(array![1.0, 0.0])];
        let associations = associate(&normalized, &mut reference_points).unwrap();
        assert!((associations[0].distance - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_associate_ties_go_to_first_point() {
        // (1, 1) is equally far from both axes.
        let normalized = array![[1.0, 1.0]];
        let mut reference_points = vec![
            ReferencePoint::new(array![1.0, 0.0]),
            ReferencePoint::new(array![0.0, 1.0]),
        ];
        let associations = associate(&normalized, &mut reference_points).unwrap();
        assert_eq!(associations[0].reference_point, 0);
    }

    #[test]
    fn test_associate_rejects_nan() {
        let normalized = array![[f64::NAN, 1.0]];
        let mut reference_points = vec![
            ReferencePoint::new(array![1.0, 0.0]),
            ReferencePoint::new(array![0.0, 1.0]),
        ];
        let result = associate(&normalized, &mut reference_points);
        assert!(matches!(result, Err(SurvivalError::InvalidFitness(_))));
    }

    #[test]
    fn test_niching() {
        let associations = vec![
            Association {
                reference_point: 0,
                distance: 0.3,
            },
            Association {
                reference_point: 1,
                distance: 0.1,
            },
            Association {
                reference_point: 0,
                distance: 0.2,
            },
        ];
        let mut reference_points = vec![
            reference_point(array![1.0, 0.0], 2, vec![0, 2]),
            reference_point(array![0.0, 1.0], 1, vec![1]),
            reference_point(array![0.5, 0.5], 0, vec![]),
        ];
        let mut rng = FakeRandomGenerator::new();

        let chosen = niching(2, &mut reference_points, &associations, &mut rng).unwrap();
        // The empty point is dropped, then point 1 (count 1) and point 0 (count 2) give one each.
        assert_eq!(chosen, vec![1, 0]);
        assert_eq!(reference_points[0].associations_count, 3);
        assert_eq!(reference_points[0].associations, vec![2]);
        assert_eq!(reference_points[1].associations_count, 2);
        assert!(reference_points[1].associations.is_empty());
    }

    #[test]
    fn test_niching_empty_niche_prefers_closest() {
        let associations = vec![
            Association {
                reference_point: 0,
                distance: 0.5,
            },
            Association {
                reference_point: 0,
                distance: 0.2,
            },
        ];
        let mut reference_points = vec![reference_point(array![1.0, 0.0], 0, vec![0, 1])];
        let mut rng = FakeRandomGenerator::new();
        let chosen = niching(1, &mut reference_points, &associations, &mut rng).unwrap();
        assert_eq!(chosen, vec![1]);
    }

    #[test]
    fn test_niching_never_picks_twice() {
        let associations: Vec<Association> = (0..6)
            .map(|i| Association {
                reference_point: i % 2,
                distance: 0.1 * i as f64,
            })
            .collect();
        let mut reference_points = vec![
            reference_point(array![1.0, 0.0], 3, vec![0, 2, 4]),
            reference_point(array![0.0, 1.0], 3, vec![1, 3, 5]),
        ];
        let mut rng = FakeRandomGenerator::new();
        let mut chosen = niching(6, &mut reference_points, &associations, &mut rng).unwrap();
        chosen.sort_unstable();
        assert_eq!(chosen, vec![0, 1, 2, 3, 4, 5]);
        assert!(reference_points.iter().all(|rp| rp.associations.is_empty()));
    }

    #[test]
    fn test_niching_exhausted_pool() {
        let associations = vec![Association {
            reference_point: 0,
            distance: 0.0,
        }];
        let mut reference_points = vec![reference_point(array![1.0, 0.0], 1, vec![0])];
        let mut rng = FakeRandomGenerator::new();
        let result = niching(2, &mut reference_points, &associations, &mut rng);
        assert_eq!(
            result,
            Err(SurvivalError::EmptyReferencePointPool {
                selected: 1,
                requested: 2
            })
        );
    }

    #[test]
    fn test_niching_select_whole_front() {
        let front = array![[1.0, 3.0], [2.0, 2.0], [3.0, 1.0]];
        let survival = Nsga3Survival::default();
        let mut rng = FakeRandomGenerator::new();
        assert_eq!(
            survival.niching_select(&front, 3, &mut rng).unwrap(),
            vec![0, 1, 2]
        );
        assert!(survival.niching_select(&front, 0, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn test_niching_select_spreads_over_directions() {
        // Two individuals near each axis and one in the middle: picking 3 must take one per
        // region because each pick raises the niche count of its point.
        let front = array![
            [0.0, 10.0],
            [0.2, 9.0],
            [5.0, 5.0],
            [9.0, 0.2],
            [10.0, 0.0]
        ];
        let survival = Nsga3Survival::default();
        let mut rng = MOORandomGenerator::new_from_seed(Some(11));
        let mut chosen = survival.niching_select(&front, 3, &mut rng).unwrap();
        chosen.sort_unstable();
        assert_eq!(chosen.len(), 3);
        assert!(chosen.contains(&2));
        assert!(chosen.iter().any(|&i| i < 2));
        assert!(chosen.iter().any(|&i| i > 2));
    }

    #[test]
    fn test_niching_select_degenerate_hyperplane() {
        let front = array![[4.0, 0.0, 1.0], [0.0, 4.0, 1.0], [3.0, 3.0, 1.5]];
        let survival = Nsga3Survival::default();
        let mut rng = FakeRandomGenerator::new();
        assert_eq!(
            survival.niching_select(&front, 2, &mut rng),
            Err(SurvivalError::DegenerateHyperplane(LinalgError::SingularMatrix))
        );
    }

    #[test]
    fn test_reference_points_structured() {
        let survival = Nsga3Survival::default();
        let points = survival.reference_points(3).unwrap();
        assert_eq!(points.len(), 91);
        assert!(points.iter().all(|rp| rp.associations_count == 0 && rp.associations.is_empty()));
    }

    #[test]
    fn test_reference_points_custom_dimension_mismatch() {
        let survival = Nsga3Survival::with_reference_points(
            array![[1.0, 0.0], [0.0, 1.0]],
            DenominatorGuard::Magnitude,
            DEFAULT_EPSILON,
        )
        .unwrap();
        assert!(survival.reference_points(2).is_ok());
        assert!(matches!(
            survival.reference_points(3),
            Err(SurvivalError::InvalidParameter(_))
        ));
    }

    #[rstest(
        n_divisions, epsilon,
        case(0, DEFAULT_EPSILON),
        case(4, 0.0),
        case(4, -1.0),
        case(4, f64::NAN)
    )]
    fn test_new_rejects_invalid_parameters(n_divisions: usize, epsilon: f64) {
        let result = Nsga3Survival::new(n_divisions, DenominatorGuard::Magnitude, epsilon);
        assert!(matches!(result, Err(SurvivalError::InvalidParameter(_))));
    }

    #[test]
    fn test_with_reference_points_rejects_zero_direction() {
        let result = Nsga3Survival::with_reference_points(
            array![[1.0, 0.0], [0.0, 0.0]],
            DenominatorGuard::Magnitude,
            DEFAULT_EPSILON,
        );
        assert!(matches!(result, Err(SurvivalError::InvalidParameter(_))));
    }

    #[test]
    fn test_select_indices_takes_whole_fronts_first() {
        let fitness = array![
            [2.0, 5.0], // front 1
            [1.0, 4.0], // front 0
            [3.0, 3.0], // front 1
            [2.0, 2.0], // front 0
            [5.0, 2.0], // front 1
            [4.0, 1.0], // front 0
            [6.0, 1.5]  // front 1
        ];
        let survival = Nsga3Survival::default();
        let mut rng = MOORandomGenerator::new_from_seed(Some(5));
        let selected = survival.select_indices(&fitness, 5, &mut rng).unwrap();
        assert_eq!(selected.len(), 5);
        assert_eq!(&selected[..3], &[1, 3, 5]);
        for idx in &selected[3..] {
            assert!([0, 2, 4, 6].contains(idx));
        }
    }

    #[test]
    fn test_select_indices_exact_front_boundary() {
        let fitness = array![[1.0, 4.0], [2.0, 2.0], [4.0, 1.0], [3.0, 3.0], [5.0, 5.0]];
        let survival = Nsga3Survival::default();
        let mut rng = FakeRandomGenerator::new();
        // Front 0 has exactly three members, no niching needed.
        let selected = survival.select_indices(&fitness, 3, &mut rng).unwrap();
        assert_eq!(selected, vec![0, 1, 2]);
    }

    #[test]
    fn test_select_indices_size_mismatch() {
        let fitness = array![[1.0, 2.0], [2.0, 1.0]];
        let survival = Nsga3Survival::default();
        let mut rng = FakeRandomGenerator::new();
        assert_eq!(
            survival.select_indices(&fitness, 3, &mut rng),
            Err(SurvivalError::SizeMismatch {
                requested: 3,
                available: 2
            })
        );
    }

    #[test]
    fn test_select_indices_rejects_single_objective() {
        let fitness = array![[1.0], [2.0], [3.0]];
        let survival = Nsga3Survival::default();
        let mut rng = FakeRandomGenerator::new();
        assert!(matches!(
            survival.select_indices(&fitness, 2, &mut rng),
            Err(SurvivalError::InvalidFitness(_))
        ));
    }

    #[test]
    fn test_select_indices_zero_survivors() {
        let fitness = array![[1.0, 2.0], [2.0, 1.0], [3.0, 3.0]];
        let survival = Nsga3Survival::default();
        let mut rng = FakeRandomGenerator::new();
        assert!(survival.select_indices(&fitness, 0, &mut rng).unwrap().is_empty());
    }

    #[derive(Debug)]
    struct ShortSorter;

    impl NonDominatedSorter for ShortSorter {
        fn sort(&self, _population_fitness: &PopulationFitness, _n_survive: usize) -> Vec<Vec<usize>> {
            vec![vec![0]]
        }
    }

    #[test]
    fn test_select_indices_inconsistent_sorter() {
        let fitness = array![[1.0, 2.0], [2.0, 1.0], [3.0, 3.0]];
        let survival = Nsga3Survival::default().with_sorter(ShortSorter);
        let mut rng = FakeRandomGenerator::new();
        assert_eq!(
            survival.select_indices(&fitness, 2, &mut rng),
            Err(SurvivalError::InconsistentFronts {
                selected: 1,
                requested: 2
            })
        );
    }

    #[test]
    fn test_operate_sets_rank() {
        let fitness = array![[1.0, 4.0], [2.0, 2.0], [4.0, 1.0], [3.0, 3.0], [5.0, 5.0]];
        let population = Population::new(fitness.clone(), fitness, None);
        let survival = Nsga3Survival::default();
        let mut rng = FakeRandomGenerator::new();
        let survivors = survival.operate(population, 4, &mut rng).unwrap();
        assert_eq!(survivors.len(), 4);
        assert_eq!(survivors.rank, Some(array![0, 0, 0, 1]));
        assert_eq!(survivors.fitness.row(3), array![3.0, 3.0].view());
        assert_eq!(survival.name(), "Nsga3Survival");
    }

    #[test]
    fn test_select_handles_ragged_fitness() {
        let individuals = vec![array![1.0, 2.0], array![2.0, 1.0, 0.5], array![3.0, 3.0]];
        let survival = Nsga3Survival::default();
        let mut rng = FakeRandomGenerator::new();
        assert!(matches!(
            survival.select(&individuals, 2, &mut rng),
            Err(SurvivalError::InvalidFitness(_))
        ));
    }
}

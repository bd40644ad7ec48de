use std::error::Error;
use std::fmt;

use crate::{
    genetic::Population, helpers::linalg::LinalgError, operators::GeneticOperator,
    random::RandomGenerator,
};

mod helpers;
pub mod nsga3;
pub mod reference_points;

pub use helpers::{
    DEFAULT_EPSILON, DenominatorGuard, HyperPlaneNormalization, MaxObjectiveNormalization,
    construct_hyperplane, has_duplicate_rows, normalize_objectives,
};

#[derive(Debug, Clone, PartialEq)]
pub enum SurvivalError {
    /// The extreme points do not span a hyperplane.
    DegenerateHyperplane(LinalgError),
    /// Every reference point was exhausted before enough individuals were picked.
    EmptyReferencePointPool { selected: usize, requested: usize },
    /// More survivors were requested than individuals exist.
    SizeMismatch { requested: usize, available: usize },
    /// The sorter returned fronts that do not add up to the requested survivors.
    InconsistentFronts { selected: usize, requested: usize },
    InvalidParameter(String),
    InvalidFitness(String),
}

impl fmt::Display for SurvivalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurvivalError::DegenerateHyperplane(e) => {
                write!(f, "Cannot build the hyperplane through the extreme points: {}", e)
            }
            SurvivalError::EmptyReferencePointPool {
                selected,
                requested,
            } => write!(
                f,
                "All reference points were exhausted after selecting {} of {} individuals",
                selected, requested
            ),
            SurvivalError::SizeMismatch {
                requested,
                available,
            } => write!(
                f,
                "Cannot select {} survivors from a population of {}",
                requested, available
            ),
            SurvivalError::InconsistentFronts {
                selected,
                requested,
            } => write!(
                f,
                "Fronts provided {} survivors but {} were requested",
                selected, requested
            ),
            SurvivalError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            SurvivalError::InvalidFitness(msg) => write!(f, "Invalid fitness: {}", msg),
        }
    }
}

impl From<LinalgError> for SurvivalError {
    fn from(e: LinalgError) -> Self {
        SurvivalError::DegenerateHyperplane(e)
    }
}

impl Error for SurvivalError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SurvivalError::DegenerateHyperplane(e) => Some(e),
            _ => None,
        }
    }
}

/// Selects the individuals that will survive to the next generation.
pub trait SurvivalOperator: GeneticOperator {
    /// Returns exactly `n_survive` individuals of `population` or an error, never fewer.
    fn operate(
        &self,
        population: Population,
        n_survive: usize,
        rng: &mut dyn RandomGenerator,
    ) -> Result<Population, SurvivalError>;
}

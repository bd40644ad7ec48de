use ndarray::Array2;

mod das_dennis;

pub use das_dennis::{DasDennisReferencePoints, binomial_coefficient};

/// A common trait for structured reference points. Each row of the result is one direction.
pub trait StructuredReferencePoints {
    fn generate(&self) -> Array2<f64>;
}

//! Reference-point based environmental selection for NSGA-III.
//!
//! Given individuals that already carry objective vectors (minimized), [`Nsga3Survival`] keeps
//! exactly `k` of them: whole Pareto fronts first, then a niching pass over the front that does
//! not fit, which favours reference directions with few members.
//!
//! ```
//! use ndarray::array;
//! use nsgaiii::select_nsga3;
//!
//! let individuals = vec![
//!     array![1.0, 4.0],
//!     array![2.0, 2.0],
//!     array![4.0, 1.0],
//!     array![3.0, 3.0],
//! ];
//! let survivors = select_nsga3(&individuals, 3, Some(42)).unwrap();
//! assert_eq!(survivors.len(), 3);
//! ```

pub mod genetic;
pub mod helpers;
pub mod non_dominated_sorting;
pub mod operators;
pub mod random;

pub use genetic::{Fitness, Individual, Population};
pub use operators::survival::nsga3::{Nsga3Survival, select_nsga3};
pub use operators::survival::SurvivalError;

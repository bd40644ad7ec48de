use std::fmt::Debug;

pub mod survival;

pub use survival::SurvivalOperator;

pub trait GeneticOperator: Debug {
    fn name(&self) -> String;
}

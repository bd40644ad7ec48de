use ndarray::{Array1, Array2, ArrayView1, Axis};

/// Represents an individual in the population.
/// Each `IndividualGenes` is an `Array1<f64>`.
pub type IndividualGenes = Array1<f64>;

/// Anything that carries an objective vector can go through the selection.
///
/// Objectives are minimized. The vector must have the same length for every individual of a
/// selection call.
pub trait Fitness {
    fn fitness(&self) -> ArrayView1<'_, f64>;
}

/// Represents an individual with genes, fitness and the rank of the front it was found in.
#[derive(Clone, Debug, PartialEq)]
pub struct Individual {
    pub genes: IndividualGenes,
    pub fitness: Array1<f64>,
    pub rank: Option<usize>,
}

impl Individual {
    pub fn new(genes: IndividualGenes, fitness: Array1<f64>, rank: Option<usize>) -> Self {
        Self {
            genes,
            fitness,
            rank,
        }
    }
}

impl Fitness for Individual {
    fn fitness(&self) -> ArrayView1<'_, f64> {
        self.fitness.view()
    }
}

impl Fitness for Array1<f64> {
    fn fitness(&self) -> ArrayView1<'_, f64> {
        self.view()
    }
}

/// Type aliases to work with populations.
pub type PopulationGenes = Array2<f64>;
pub type PopulationFitness = Array2<f64>;

/// The `Population` struct contains genes, fitness and optionally the rank of every row.
#[derive(Clone, Debug)]
pub struct Population {
    pub genes: PopulationGenes,
    pub fitness: PopulationFitness,
    pub rank: Option<Array1<usize>>,
}

impl Population {
    pub fn new(
        genes: PopulationGenes,
        fitness: PopulationFitness,
        rank: Option<Array1<usize>>,
    ) -> Self {
        Self {
            genes,
            fitness,
            rank,
        }
    }

    /// Retrieves an `Individual` from the population by index.
    pub fn get(&self, idx: usize) -> Individual {
        let rank = self.rank.as_ref().map(|r| r[idx]);
        Individual::new(
            self.genes.row(idx).to_owned(),
            self.fitness.row(idx).to_owned(),
            rank,
        )
    }

    /// Returns a new `Population` containing only the individuals at the specified indices,
    /// in the order given.
    pub fn selected(&self, indices: &[usize]) -> Population {
        let genes = self.genes.select(Axis(0), indices);
        let fitness = self.fitness.select(Axis(0), indices);
        let rank = self.rank.as_ref().map(|r| r.select(Axis(0), indices));
        Population::new(genes, fitness, rank)
    }

    /// Returns the number of individuals in the population.
    pub fn len(&self) -> usize {
        self.fitness.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn n_objectives(&self) -> usize {
        self.fitness.ncols()
    }
}

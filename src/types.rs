use ndarray::{Array1, Array2};

/// Predictor matrix, one row per gene/TSS and one column per predictor
pub type FeatureMatrix = Array2<f32>;

/// Transformed expression targets aligned with the rows of a [`FeatureMatrix`]
pub type Labels = Array1<f32>;

/// Train/test row selection derived from chromosome names.
///
/// Both masks have one entry per annotation row and never select the same row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub train: Vec<bool>,
    pub test: Vec<bool>,
}

impl Partition {
    /// Number of rows covered by the masks
    pub fn len(&self) -> usize {
        self.train.len()
    }

    pub fn is_empty(&self) -> bool {
        self.train.is_empty()
    }

    pub fn n_train(&self) -> usize {
        self.train.iter().filter(|&&m| m).count()
    }

    pub fn n_test(&self) -> usize {
        self.test.iter().filter(|&&m| m).count()
    }
}

/// Feature rows paired with their labels, ready for training or evaluation
#[derive(Debug, Clone)]
pub struct LabeledDataset {
    pub features: FeatureMatrix,
    pub labels: Labels,
}

impl LabeledDataset {
    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }
}

/// Train and test RMSE after one boosting round
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalRecord {
    pub round: usize,
    pub train_rmse: f64,
    pub test_rmse: f64,
}

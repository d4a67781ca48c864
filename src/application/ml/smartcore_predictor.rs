use crate::domain::ml::FeatureRow;
use crate::domain::ml::feature_registry::features_to_f64_vector;
use crate::domain::ports::{ReturnLearner, ReturnModel};
use anyhow::{Context, Result, anyhow};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::linear_regression::{LinearRegression, LinearRegressionParameters};
use tracing::debug;

fn to_matrix(rows: &[FeatureRow]) -> Result<DenseMatrix<f64>> {
    let data: Vec<Vec<f64>> = rows.iter().map(features_to_f64_vector).collect();
    DenseMatrix::from_2d_vec(&data).map_err(|e| anyhow!("Matrix creation failed: {}", e))
}

fn check_shapes(rows: &[FeatureRow], targets: &[f64]) -> Result<()> {
    if rows.is_empty() {
        anyhow::bail!("Cannot fit on an empty training set");
    }
    if rows.len() != targets.len() {
        anyhow::bail!(
            "Feature rows ({}) and targets ({}) are not aligned",
            rows.len(),
            targets.len()
        );
    }
    Ok(())
}

/// Random forest configuration. Identical settings on identical data
/// produce identical forests.
#[derive(Debug, Clone, PartialEq)]
pub struct ForestLearner {
    pub n_trees: usize,
    pub seed: u64,
    pub max_depth: Option<u16>,
    pub min_samples_split: usize,
}

impl Default for ForestLearner {
    fn default() -> Self {
        Self {
            n_trees: 300,
            seed: 42,
            max_depth: None,
            min_samples_split: 2,
        }
    }
}

impl ForestLearner {
    fn parameters(&self) -> RandomForestRegressorParameters {
        let params = RandomForestRegressorParameters::default()
            .with_n_trees(self.n_trees)
            .with_min_samples_split(self.min_samples_split)
            .with_seed(self.seed);
        match self.max_depth {
            Some(depth) => params.with_max_depth(depth),
            None => params,
        }
    }
}

pub struct ForestModel {
    model: RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>,
}

impl ReturnLearner for ForestLearner {
    fn fit(&self, rows: &[FeatureRow], targets: &[f64]) -> Result<Box<dyn ReturnModel>> {
        check_shapes(rows, targets)?;
        debug!(
            "Training Random Forest Regressor (Trees: {}, Depth: {:?}, MinSplit: {}, Seed: {}) on {} samples",
            self.n_trees,
            self.max_depth,
            self.min_samples_split,
            self.seed,
            rows.len()
        );

        let x = to_matrix(rows)?;
        let y = targets.to_vec();
        let model = RandomForestRegressor::fit(&x, &y, self.parameters())
            .map_err(|e| anyhow!("Training error: {}", e))?;

        Ok(Box::new(ForestModel { model }))
    }

    fn name(&self) -> &str {
        "SmartCore Random Forest"
    }
}

impl ReturnModel for ForestModel {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>> {
        let x = to_matrix(rows)?;
        self.model
            .predict(&x)
            .map_err(|e| anyhow!("Prediction failed: {}", e))
    }
}

/// Ordinary least squares on the raw feature columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearLearner;

pub struct LinearModel {
    model: LinearRegression<f64, f64, DenseMatrix<f64>, Vec<f64>>,
}

impl ReturnLearner for LinearLearner {
    fn fit(&self, rows: &[FeatureRow], targets: &[f64]) -> Result<Box<dyn ReturnModel>> {
        check_shapes(rows, targets)?;
        let x = to_matrix(rows)?;
        let y = targets.to_vec();
        let model = LinearRegression::fit(&x, &y, LinearRegressionParameters::default())
            .map_err(|e| anyhow!("Training error: {}", e))
            .context("Linear regression fit")?;

        Ok(Box::new(LinearModel { model }))
    }

    fn name(&self) -> &str {
        "SmartCore Linear Regression"
    }
}

impl ReturnModel for LinearModel {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>> {
        let x = to_matrix(rows)?;
        self.model
            .predict(&x)
            .map_err(|e| anyhow!("Prediction failed: {}", e))
    }
}

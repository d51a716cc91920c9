//! A fitted model together with the design it was fit on.

use crate::core::RegressionOptions;
use crate::data::DesignMatrix;
use crate::diagnostics::InfluenceMeasures;
use crate::solvers::{FittedOls, FittedRegressor, OlsRegressor, RegressionError, Regressor};

#[derive(Debug, Clone)]
pub struct ModelFit {
    /// Heading used in the report, e.g. `Modelo 1`.
    pub label: String,
    pub design: DesignMatrix,
    pub fitted: FittedOls,
}

impl ModelFit {
    pub fn fit(
        label: impl Into<String>,
        design: DesignMatrix,
        options: &RegressionOptions,
    ) -> Result<Self, RegressionError> {
        let fitted = OlsRegressor::new(options.clone()).fit(design.x(), design.y())?;
        Ok(Self {
            label: label.into(),
            design,
            fitted,
        })
    }

    /// `(name, p-value)` of every predictor, intercept excluded.
    pub fn predictor_p_values(&self) -> Vec<(String, f64)> {
        let p_values = self.fitted.result().p_values.as_ref();
        self.design
            .names()
            .iter()
            .enumerate()
            .map(|(j, name)| (name.clone(), p_values.map_or(f64::NAN, |p| p[j])))
            .collect()
    }

    pub fn influence(&self) -> InfluenceMeasures {
        InfluenceMeasures::compute(self.design.x(), &self.fitted)
            .with_row_ids(self.design.row_ids())
    }
}

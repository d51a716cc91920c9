//! Settings of one analysis run.

use crate::core::CovarianceType;
use crate::data::{BaseLevel, CsvOptions};
use crate::diagnostics::{BpCriterion, BreuschPaganVariant};
use crate::report::MIN_PLOT_SIZE;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Everything one run of the pipeline needs.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Delimited input file (default: `dataset_5.csv`).
    pub input: PathBuf,
    /// Field delimiter of the input (default: `,`).
    pub delimiter: u8,
    /// Directory receiving the report and plots (default: `output`).
    pub output_dir: PathBuf,
    /// Report file name inside `output_dir` (default: `relatorio_output.txt`).
    pub report_name: String,
    /// Response column (default: `tempo_resposta`).
    pub target: String,
    /// Significance level for stepwise removal and Breusch-Pagan (default: 0.05).
    pub significance: f64,
    /// VIF above which a predictor is flagged (default: 10).
    pub vif_threshold: f64,
    /// Covariance estimator of every model fit (default: HC3).
    pub covariance: CovarianceType,
    /// Confidence level of the coefficient intervals (default: 0.95).
    pub confidence_level: f64,
    pub bp_variant: BreuschPaganVariant,
    pub bp_criterion: BpCriterion,
    pub base_level: BaseLevel,
    /// Influence plot size in pixels (default: 1800 × 1200).
    pub plot_size: (u32, u32),
    /// Observations listed under each influence plot (default: 5).
    pub influence_top: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("dataset_5.csv"),
            delimiter: b',',
            output_dir: PathBuf::from("output"),
            report_name: "relatorio_output.txt".to_string(),
            target: "tempo_resposta".to_string(),
            significance: 0.05,
            vif_threshold: 10.0,
            covariance: CovarianceType::HC3,
            confidence_level: 0.95,
            bp_variant: BreuschPaganVariant::Koenker,
            bp_criterion: BpCriterion::F,
            base_level: BaseLevel::Alphabetical,
            plot_size: (1800, 1200),
            influence_top: 5,
        }
    }
}

/// Errors that can occur when validating an analysis configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("significance level must be in (0, 1), got {0}")]
    InvalidSignificance(f64),
    #[error("confidence level must be in (0, 1), got {0}")]
    InvalidConfidenceLevel(f64),
    #[error("VIF threshold must be positive, got {0}")]
    InvalidVifThreshold(f64),
    #[error(
        "plot size must be at least {}x{}, got {0}x{1}",
        MIN_PLOT_SIZE.0,
        MIN_PLOT_SIZE.1
    )]
    InvalidPlotSize(u32, u32),
    #[error("target column name is empty")]
    EmptyTarget,
    #[error("report file name is empty")]
    EmptyReportName,
}

impl AnalysisConfig {
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.significance > 0.0 && self.significance < 1.0) {
            return Err(ConfigError::InvalidSignificance(self.significance));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(ConfigError::InvalidConfidenceLevel(self.confidence_level));
        }
        if !(self.vif_threshold > 0.0) {
            return Err(ConfigError::InvalidVifThreshold(self.vif_threshold));
        }
        if self.plot_size.0 < MIN_PLOT_SIZE.0 || self.plot_size.1 < MIN_PLOT_SIZE.1 {
            return Err(ConfigError::InvalidPlotSize(self.plot_size.0, self.plot_size.1));
        }
        if self.target.trim().is_empty() {
            return Err(ConfigError::EmptyTarget);
        }
        if self.report_name.trim().is_empty() {
            return Err(ConfigError::EmptyReportName);
        }
        Ok(())
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.report_name)
    }

    pub fn image_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }

    pub fn csv_options(&self) -> CsvOptions {
        CsvOptions::default().with_delimiter(self.delimiter)
    }
}

/// Builder for `AnalysisConfig`.
#[derive(Debug, Clone, Default)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(mut self, path: impl AsRef<Path>) -> Self {
        self.config.input = path.as_ref().to_path_buf();
        self
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.config.delimiter = delimiter;
        self
    }

    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.output_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn report_name(mut self, name: impl Into<String>) -> Self {
        self.config.report_name = name.into();
        self
    }

    pub fn target(mut self, column: impl Into<String>) -> Self {
        self.config.target = column.into();
        self
    }

    pub fn significance(mut self, alpha: f64) -> Self {
        self.config.significance = alpha;
        self
    }

    pub fn vif_threshold(mut self, threshold: f64) -> Self {
        self.config.vif_threshold = threshold;
        self
    }

    pub fn covariance(mut self, covariance: CovarianceType) -> Self {
        self.config.covariance = covariance;
        self
    }

    pub fn confidence_level(mut self, level: f64) -> Self {
        self.config.confidence_level = level;
        self
    }

    pub fn bp_variant(mut self, variant: BreuschPaganVariant) -> Self {
        self.config.bp_variant = variant;
        self
    }

    pub fn bp_criterion(mut self, criterion: BpCriterion) -> Self {
        self.config.bp_criterion = criterion;
        self
    }

    pub fn base_level(mut self, rule: BaseLevel) -> Self {
        self.config.base_level = rule;
        self
    }

    pub fn plot_size(mut self, width: u32, height: u32) -> Self {
        self.config.plot_size = (width, height);
        self
    }

    pub fn influence_top(mut self, count: usize) -> Self {
        self.config.influence_top = count;
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<AnalysisConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

//! Statistical inference (covariance estimators, standard errors, p-values).

mod coefficient;
mod gram;
mod robust;

pub use coefficient::{CoefficientInference, Reference};
pub use gram::{
    compute_xtx_inverse, dependent_columns, invert_spd, invert_upper_triangular, r_factor,
    xtx_inverse_from_r, DEFAULT_RANK_TOLERANCE,
};
pub use robust::parameter_covariance;

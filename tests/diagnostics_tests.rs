//! Diagnostics integration tests.

mod common;

use approx::assert_relative_eq;
use faer::{Col, Mat};
use regress_report::core::CovarianceType;
use regress_report::diagnostics::{
    compute_leverage, cooks_distance, high_leverage_points, influential_cooks,
    studentized_residuals, variance_inflation_factor, BpCriterion, BreuschPagan,
    BreuschPaganVariant, InfluenceMeasures, Verdict, VifTable,
};
use regress_report::solvers::{FittedRegressor, OlsRegressor, Regressor};

// ============================================================================
// Leverage and Influence
// ============================================================================

#[test]
fn test_leverage_sums_to_parameter_count() {
    let (x, _, _) = common::generate_linear_data(40, 3, 0.0, 1.0, 1);
    let leverage = compute_leverage(&x, true);

    let total: f64 = (0..leverage.nrows()).map(|i| leverage[i]).sum();
    assert_relative_eq!(total, 4.0, epsilon = 1e-8);
    for i in 0..leverage.nrows() {
        assert!(leverage[i] > 0.0 && leverage[i] < 1.0);
    }
}

#[test]
fn test_outlier_dominates_cooks_distance() {
    let (x, mut y, _) = common::generate_linear_data(50, 2, 1.0, 0.2, 2);
    y[17] += 25.0;

    let fitted = OlsRegressor::builder().build().fit(&x, &y).expect("fit");
    let result = fitted.result();
    let leverage = compute_leverage(&x, true);

    let d = cooks_distance(&result.residuals, &leverage, result.mse, result.n_parameters);
    let worst = (0..d.nrows())
        .max_by(|&a, &b| d[a].total_cmp(&d[b]))
        .expect("non-empty");

    assert_eq!(worst, 17);
    assert!(influential_cooks(&d, None).contains(&17));

    let r = studentized_residuals(&result.residuals, &leverage, result.mse);
    assert!(r[17] > 3.0);
}

#[test]
fn test_influence_measures_match_free_functions() {
    let (x, y, _) = common::generate_linear_data(30, 2, 0.0, 1.0, 4);
    let fitted = OlsRegressor::builder().build().fit(&x, &y).expect("fit");
    let result = fitted.result();

    let measures = InfluenceMeasures::compute(&x, &fitted);
    let leverage = compute_leverage(&x, true);
    let d = cooks_distance(&result.residuals, &leverage, result.mse, result.n_parameters);

    assert_eq!(measures.n_observations(), 30);
    assert_relative_eq!(measures.threshold, 4.0 / 30.0, epsilon = 1e-12);
    for i in 0..30 {
        assert_relative_eq!(measures.leverage[i], leverage[i], epsilon = 1e-10);
        assert_relative_eq!(measures.cooks_distance[i], d[i], epsilon = 1e-10);
    }

    let top = measures.top(3);
    assert_eq!(top.len(), 3);
    assert!(top[0].cooks_distance >= top[1].cooks_distance);
    assert!(top[1].cooks_distance >= top[2].cooks_distance);

    let high = high_leverage_points(&leverage, result.n_parameters, None);
    assert!(high.iter().all(|&i| i < 30));
}

// ============================================================================
// VIF
// ============================================================================

#[test]
fn test_vif_near_one_for_independent_predictors() {
    let (x, _, _) = common::generate_linear_data(500, 3, 0.0, 1.0, 8);
    let vif = variance_inflation_factor(&x);

    for j in 0..3 {
        assert!(vif[j] >= 1.0 && vif[j] < 1.1, "vif[{j}] = {}", vif[j]);
    }
}

#[test]
fn test_vif_flags_near_duplicate_predictor() {
    let x = Mat::from_fn(60, 3, |i, j| {
        let t = i as f64;
        match j {
            0 => t,
            1 => t + 0.05 * (t * 1.3).sin(),
            _ => (t * 0.7).cos(),
        }
    });
    let names = vec!["a".to_string(), "b".to_string(), "c".to_string()];

    let table = VifTable::compute(&x, &names, 10.0);
    let flagged: Vec<&str> = table.flagged().map(|r| r.name.as_str()).collect();

    assert_eq!(flagged, vec!["a", "b"]);
    assert!(table.get("c").expect("c present") < 2.0);
}

#[test]
fn test_vif_infinite_for_exact_collinearity() {
    let (x, _) = common::generate_collinear_data(25);
    let vif = variance_inflation_factor(&x);

    assert!(vif[0].is_infinite());
    assert!(vif[1].is_infinite());
    assert!(vif[2].is_finite());
}

#[test]
fn test_vif_retry_keeps_independent_columns_after_duplicate() {
    let column = |i: usize, j: usize| {
        let t = i as f64;
        match j {
            0 => t,
            1 => 2.0 * t,
            2 => (t * 0.7).sin(),
            _ => (t * 0.7).sin() + 0.05 * (t * 0.7).cos(),
        }
    };
    let with_duplicate = Mat::from_fn(40, 4, column);
    let without_duplicate = Mat::from_fn(40, 3, |i, j| column(i, if j == 0 { 0 } else { j + 1 }));

    let vif = variance_inflation_factor(&with_duplicate);
    let reference = variance_inflation_factor(&without_duplicate);

    assert!(vif[0].is_infinite() && vif[1].is_infinite());
    assert!(reference[2] > 100.0, "near-duplicate sine pair, got {}", reference[2]);
    assert_relative_eq!(vif[2], reference[1], max_relative = 1e-6);
    assert_relative_eq!(vif[3], reference[2], max_relative = 1e-6);
}

// ============================================================================
// Breusch-Pagan
// ============================================================================

fn bp_for(x: &Mat<f64>, y: &Col<f64>) -> BreuschPagan {
    let fitted = OlsRegressor::builder().build().fit(x, y).expect("fit");
    BreuschPagan::test(
        &fitted.result().residuals,
        x,
        BreuschPaganVariant::Koenker,
        BpCriterion::F,
        0.05,
    )
    .expect("test")
}

#[test]
fn test_breusch_pagan_detects_growing_variance() {
    let (x, y) = common::generate_heteroscedastic_data(300, 31);
    let bp = bp_for(&x, &y);

    assert_eq!(bp.df, 1);
    assert!(bp.f_pvalue < 0.01);
    assert!(bp.lm_pvalue < 0.01);
    assert_eq!(bp.verdict, Verdict::Heteroscedastic);
    assert!(bp.rejects_homoscedasticity());
}

#[test]
fn test_breusch_pagan_rarely_rejects_homoscedastic_data() {
    let rejections = (0..20)
        .filter(|&seed| {
            let (x, y, _) = common::generate_linear_data(150, 2, 1.0, 1.0, 1000 + seed);
            bp_for(&x, &y).rejects_homoscedasticity()
        })
        .count();

    assert!(rejections <= 5, "{rejections} of 20 homoscedastic samples rejected");
}

#[test]
fn test_breusch_pagan_lm_is_n_times_r_squared() {
    let (x, y) = common::generate_heteroscedastic_data(80, 3);
    let fitted = OlsRegressor::builder().build().fit(&x, &y).expect("fit");
    let e = &fitted.result().residuals;

    let bp = BreuschPagan::test(e, &x, BreuschPaganVariant::Koenker, BpCriterion::Lm, 0.05)
        .expect("test");

    let e2 = Col::from_fn(e.nrows(), |i| e[i] * e[i]);
    let aux = OlsRegressor::builder()
        .covariance(CovarianceType::Classical)
        .build()
        .fit(&x, &e2)
        .expect("aux fit");
    assert_relative_eq!(
        bp.lm_statistic,
        80.0 * aux.r_squared(),
        max_relative = 1e-9
    );
    assert_relative_eq!(bp.f_statistic, aux.result().f_statistic, max_relative = 1e-9);
}

//! End-to-end runs of the analysis on simulated hardware datasets.

mod common;

use common::{hardware_csv, write_file, HardwareProfile};
use regress_report::analysis::{
    least_significant, run, AnalysisConfig, AnalysisError, AnalysisOutcome, ConfigError,
    LogModelOutcome,
};
use regress_report::data::DataError;
use regress_report::diagnostics::Verdict;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn config_for(input: &Path, output: &Path) -> AnalysisConfig {
    AnalysisConfig::builder()
        .input(input)
        .output_dir(output)
        .plot_size(480, 320)
        .build()
        .expect("valid config")
}

fn run_profile(profile: &HardwareProfile) -> (TempDir, Result<AnalysisOutcome, AnalysisError>) {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_file(dir.path(), "dataset_5.csv", &hardware_csv(profile));
    let config = config_for(&input, &dir.path().join("output"));
    let outcome = run(&config);
    (dir, outcome)
}

#[test]
fn test_full_run_writes_report_and_plots() {
    let (dir, outcome) = run_profile(&HardwareProfile::default());
    let outcome = outcome.expect("analysis should succeed");

    assert_eq!(outcome.cleaning.rows_before, 200);
    assert_eq!(outcome.cleaning.rows_after, 192);

    // Influence rows refer to the input file, gaps included
    let rows = outcome.full_model.design.row_ids();
    assert_eq!(rows.len(), 192);
    assert!(!rows.contains(&24));
    assert_eq!(rows.last(), Some(&198));
    let top = outcome.full_model.influence().top(1);
    assert_eq!(top[0].row, rows[top[0].index]);

    let text = fs::read_to_string(&outcome.report_path).expect("report written");
    assert_eq!(
        outcome.report_path,
        dir.path().join("output").join("relatorio_output.txt")
    );
    assert!(text.starts_with("--- Infos do Dataset ---\n"));
    assert!(text.ends_with("--- Fim da análise ---\n\n"));

    for heading in [
        "--- Remoção de linhas com NaN ---",
        "--- Variáveis numéricas ---",
        "--- Variáveis categóricas ---",
        "--- PARTE 1 ---",
        "--- Estatística descritiva (N=192) ---",
        "--- PARTE 2 ---",
        "--- Modelo ---",
        "--- Diagnóstico VIF (Modelo 1) ---",
        "--- Heterocedasticidade (Breusch-Pagan) ---",
        "--- Modelo com log(tempo_resposta) ---",
    ] {
        assert!(text.contains(heading), "missing section {heading}");
    }

    // Sections appear in pipeline order
    let pos = |needle: &str| text.find(needle).expect(needle);
    assert!(pos("PARTE 1") < pos("PARTE 2"));
    assert!(pos("Diagnóstico VIF") < pos("Heterocedasticidade"));
    assert!(pos("Heterocedasticidade") < pos("Modelo com log"));

    assert!(text.contains("OLS Regression Results"));
    assert!(text.contains("Covariance Type:"));
    assert!(text.contains("HC3"));
    assert!(text.contains("P>|z|"));

    let names = outcome.full_model.design.names();
    assert_eq!(names.len(), 9);
    assert_eq!(outcome.vif.len(), 9);
    for name in names {
        assert!(text.contains(&format!("| {name} ")), "VIF row for {name}");
    }
    assert!(names.contains(&"sistema_operacional_MacOS".to_string()));
    assert!(!names.contains(&"sistema_operacional_Linux".to_string()));
    assert!(names.contains(&"tipo_hd_NVMe".to_string()));

    assert!(text.contains("LM estatística"));
    assert!(text.contains("F p-valor"));
    assert!(text.contains("Resultado: H0"));

    for image in outcome.report.images() {
        let bytes = fs::read(image).expect("plot written");
        assert_eq!(&bytes[..4], b"\x89PNG");
    }
    assert!(dir.path().join("output").join("influence.png").exists());
    assert!(dir.path().join("output").join("influence_log.png").exists());
}

#[test]
fn test_reduced_model_drops_least_significant_predictor() {
    let (_dir, outcome) = run_profile(&HardwareProfile::default());
    let outcome = outcome.expect("analysis should succeed");

    let expected = least_significant(&outcome.full_model.predictor_p_values(), 0.05);
    match (&outcome.reduced, expected) {
        (Some(reduced), Some(expected)) => {
            assert_eq!(reduced.elimination, expected);
            assert!(expected.p_value > 0.05);
            let names = reduced.model.design.names();
            assert_eq!(names.len(), 8);
            assert!(!names.contains(&expected.removed));

            let heading = format!(
                "Modelo 2: removendo '{}' (p={:.3})",
                expected.removed, expected.p_value
            );
            assert!(outcome.report.section(&heading).is_some());
        }
        (None, None) => {
            let body = &outcome.report.section("Modelo 2").expect("note").body;
            assert!(body.contains("Nenhuma variável insignificante"));
        }
        (got, want) => panic!("reduction mismatch: {got:?} vs {want:?}"),
    }
}

#[test]
fn test_growing_noise_is_reported_heteroscedastic() {
    let profile = HardwareProfile {
        heteroscedastic: true,
        seed: 7,
        ..HardwareProfile::default()
    };
    let (_dir, outcome) = run_profile(&profile);
    let outcome = outcome.expect("analysis should succeed");

    assert_eq!(outcome.breusch_pagan.verdict, Verdict::Heteroscedastic);
    let body = &outcome
        .report
        .section("Heterocedasticidade (Breusch-Pagan)")
        .expect("bp section")
        .body;
    assert!(body.contains("Resultado: H0 rejeitada (heterocedasticidade)"));
}

#[test]
fn test_non_positive_target_fails_only_the_log_model() {
    let profile = HardwareProfile {
        target_offset: -1000.0,
        ..HardwareProfile::default()
    };
    let (_dir, outcome) = run_profile(&profile);
    let outcome = outcome.expect("linear stages still succeed");

    match &outcome.log_model {
        LogModelOutcome::Failed { reason } => {
            assert!(reason.contains("tempo_resposta"), "reason: {reason}")
        }
        other => panic!("expected failure, got {other:?}"),
    }

    let text = fs::read_to_string(&outcome.report_path).expect("report");
    assert!(text.contains("Erro ao ajustar modelo log: "));
    assert!(text.contains("--- Fim da análise ---"));
    assert!(!outcome
        .report
        .images()
        .iter()
        .any(|p| p.ends_with("influence_log.png")));
}

#[test]
fn test_missing_target_column_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_file(dir.path(), "data.csv", "a,b\n1,2\n3,4\n5,7\n");
    let config = config_for(&input, &dir.path().join("output"));

    let err = run(&config).expect_err("no target column");
    assert!(matches!(err, AnalysisError::Data(DataError::MissingColumn(_))));
}

#[test]
fn test_all_rows_incomplete_is_fatal() {
    let profile = HardwareProfile {
        n_rows: 20,
        missing_every: Some(1),
        ..HardwareProfile::default()
    };
    let (_dir, outcome) = run_profile(&profile);

    assert!(matches!(
        outcome,
        Err(AnalysisError::Data(DataError::EmptyAfterCleaning))
    ));
}

#[test]
fn test_tiny_plot_size_rejected_before_fitting() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_file(
        dir.path(),
        "dataset_5.csv",
        &hardware_csv(&HardwareProfile::default()),
    );
    let output = dir.path().join("output");
    let mut config = config_for(&input, &output);
    config.plot_size = (100, 80);

    let err = run(&config).expect_err("canvas too small");
    assert!(matches!(
        err,
        AnalysisError::Config(ConfigError::InvalidPlotSize(100, 80))
    ));
    assert!(!output.exists());
}

#[test]
fn test_missing_input_file_is_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_for(&dir.path().join("absent.csv"), &dir.path().join("output"));

    let err = run(&config).expect_err("file does not exist");
    assert!(matches!(err, AnalysisError::Data(DataError::Io(_))));
}

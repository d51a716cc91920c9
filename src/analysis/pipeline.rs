//! One pass over the dataset, from loading to the persisted report.

use crate::analysis::{
    fit_log_model, reduce_once, AnalysisConfig, AnalysisError, LogModelOutcome, ModelFit,
    ReducedModel,
};
use crate::core::RegressionOptions;
use crate::data::{load_csv, CleaningSummary, Dataset, DesignMatrix};
use crate::diagnostics::{BreuschPagan, VifTable};
use crate::report::{self, render_influence_plot, Report};
use crate::solvers::FittedRegressor;
use crate::stats::{describe, ColumnSummary};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Everything a run produced, after the report has been written.
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub report: Report,
    pub report_path: PathBuf,
    pub cleaning: CleaningSummary,
    pub full_model: ModelFit,
    pub vif: VifTable,
    pub breusch_pagan: BreuschPagan,
    pub reduced: Option<ReducedModel>,
    pub log_model: LogModelOutcome,
}

/// Load the configured input and run the whole analysis.
pub fn run(config: &AnalysisConfig) -> Result<AnalysisOutcome, AnalysisError> {
    config.validate()?;

    info!(input = %config.input.display(), "loading dataset");
    let raw = load_csv(&config.input, &config.csv_options())?;
    info!(rows = raw.n_rows(), columns = raw.n_columns(), "dataset loaded");

    run_on_dataset(&raw, config)
}

/// Run the analysis on an already loaded dataset.
pub fn run_on_dataset(
    raw: &Dataset,
    config: &AnalysisConfig,
) -> Result<AnalysisOutcome, AnalysisError> {
    config.validate()?;
    fs::create_dir_all(&config.output_dir)?;

    let options = RegressionOptions::builder()
        .with_intercept(true)
        .covariance(config.covariance)
        .confidence_level(config.confidence_level)
        .build()?;

    let mut report = Report::new();

    let (cleaned, cleaning) = clean_stage(raw, &mut report)?;
    describe_stage(&cleaned, &mut report)?;

    report.push("PARTE 2", "");
    let full_model = model_stage(&cleaned, config, &options, &mut report)?;
    let vif = vif_stage(&full_model, config, &mut report);
    let breusch_pagan = breusch_pagan_stage(&full_model, config, &mut report)?;
    let reduced = reduction_stage(&full_model, config, &options, &mut report)?;

    report.push("PARTE 3", "");
    let log_model = log_stage(&cleaned, config, &options, &mut report)?;

    report.push("Fim da análise", "");

    let report_path = config.report_path();
    report.persist(&report_path)?;
    info!(path = %report_path.display(), "report written");

    Ok(AnalysisOutcome {
        report,
        report_path,
        cleaning,
        full_model,
        vif,
        breusch_pagan,
        reduced,
        log_model,
    })
}

fn clean_stage(
    raw: &Dataset,
    report: &mut Report,
) -> Result<(Dataset, CleaningSummary), AnalysisError> {
    report.push("Infos do Dataset", report::dataset_info(raw));

    let (cleaned, summary) = raw.drop_missing();
    info!(
        before = summary.rows_before,
        after = summary.rows_after,
        "dropped rows with missing values"
    );
    report.push(
        "Remoção de linhas com NaN",
        report::cleaning_summary(&summary, &cleaned),
    );
    summary.ensure_rows()?;

    report.push(
        "Variáveis numéricas",
        format!("{:?}", cleaned.numeric_column_names()),
    );
    report.push(
        "Variáveis categóricas",
        format!("{:?}", cleaned.categorical_column_names()),
    );

    Ok((cleaned, summary))
}

fn describe_stage(cleaned: &Dataset, report: &mut Report) -> Result<(), AnalysisError> {
    report.push("PARTE 1", "");

    let numeric = cleaned.numeric_column_names();
    let categorical = cleaned.categorical_column_names();

    let mut numeric_summaries = Vec::new();
    let mut categorical_summaries = Vec::new();
    for summary in describe(cleaned, &numeric)?
        .into_iter()
        .chain(describe(cleaned, &categorical)?)
    {
        match summary {
            ColumnSummary::Numeric(s) => numeric_summaries.push(s),
            ColumnSummary::Categorical(s) => categorical_summaries.push(s),
        }
    }
    debug!(
        numeric = numeric_summaries.len(),
        categorical = categorical_summaries.len(),
        "descriptive statistics computed"
    );

    report.push(
        format!("Estatística descritiva (N={})", cleaned.n_rows()),
        report::descriptive_table(&numeric_summaries),
    );
    if !categorical_summaries.is_empty() {
        report.push(
            "Variáveis categóricas: frequências",
            report::categorical_table(&categorical_summaries),
        );
    }
    Ok(())
}

fn model_stage(
    cleaned: &Dataset,
    config: &AnalysisConfig,
    options: &RegressionOptions,
    report: &mut Report,
) -> Result<ModelFit, AnalysisError> {
    let design = DesignMatrix::build(cleaned, &config.target, None, config.base_level)?;
    debug!(
        rows = design.n_rows(),
        predictors = design.n_predictors(),
        "design matrix built"
    );
    report.push("Categorias base", report::base_levels(design.encodings()));

    let model = ModelFit::fit("Modelo 1", design, options)?;
    let result = model.fitted.result();
    info!(
        r_squared = result.r_squared,
        f_pvalue = result.f_pvalue,
        covariance = %result.covariance_type,
        "model 1 fitted"
    );

    let influence = influence_stage(&model, "influence.png", config, report)?;
    report.push(
        "Modelo",
        format!("{}\n{}", report::model_summary(&model), influence),
    );
    Ok(model)
}

fn vif_stage(model: &ModelFit, config: &AnalysisConfig, report: &mut Report) -> VifTable {
    let table = VifTable::compute(model.design.x(), model.design.names(), config.vif_threshold);
    for row in table.flagged() {
        warn!(predictor = %row.name, vif = row.vif, "high variance inflation factor");
    }
    report.push("Diagnóstico VIF (Modelo 1)", report::vif_table(&table));
    table
}

fn breusch_pagan_stage(
    model: &ModelFit,
    config: &AnalysisConfig,
    report: &mut Report,
) -> Result<BreuschPagan, AnalysisError> {
    let bp = BreuschPagan::test(
        &model.fitted.result().residuals,
        model.design.x(),
        config.bp_variant,
        config.bp_criterion,
        config.significance,
    )?;
    info!(
        lm = bp.lm_statistic,
        f_pvalue = bp.f_pvalue,
        verdict = %bp.verdict,
        "Breusch-Pagan test"
    );
    report.push(
        "Heterocedasticidade (Breusch-Pagan)",
        report::breusch_pagan_section(&bp),
    );
    Ok(bp)
}

fn reduction_stage(
    full: &ModelFit,
    config: &AnalysisConfig,
    options: &RegressionOptions,
    report: &mut Report,
) -> Result<Option<ReducedModel>, AnalysisError> {
    let reduced = reduce_once(full, config.significance, "Modelo 2", options)?;

    match &reduced {
        Some(step) => {
            let influence = influence_stage(&step.model, "influence_reduced.png", config, report)?;
            report.push(
                format!(
                    "Modelo 2: removendo '{}' (p={:.3})",
                    step.elimination.removed, step.elimination.p_value
                ),
                format!("{}\n{}", report::model_summary(&step.model), influence),
            );
        }
        None => report.push(
            "Modelo 2",
            "Nenhuma variável insignificante para remover; Modelo 2 não gerado.",
        ),
    }
    Ok(reduced)
}

fn log_stage(
    cleaned: &Dataset,
    config: &AnalysisConfig,
    options: &RegressionOptions,
    report: &mut Report,
) -> Result<LogModelOutcome, AnalysisError> {
    let heading = format!("Modelo com log({})", config.target);
    let outcome = fit_log_model(cleaned, &config.target, config.base_level, options);

    match &outcome {
        LogModelOutcome::Fitted {
            model,
            excluded_rows,
        } => {
            let influence = influence_stage(model, "influence_log.png", config, report)?;
            report.push(
                heading,
                format!(
                    "Linhas excluídas ({} <= 0): {}\n\n{}\nEfeitos percentuais aproximados, 100·(exp(coef) − 1):\n{}\n{}",
                    config.target,
                    excluded_rows,
                    report::model_summary(model),
                    report::percent_effects(model),
                    influence
                ),
            );
        }
        LogModelOutcome::Failed { reason } => {
            report.push(heading, format!("Erro ao ajustar modelo log: {}", reason));
        }
    }
    Ok(outcome)
}

/// Render the influence plot of `model` and return its report paragraph.
fn influence_stage(
    model: &ModelFit,
    file_name: &str,
    config: &AnalysisConfig,
    report: &mut Report,
) -> Result<String, AnalysisError> {
    let measures = model.influence();
    let path = config.image_path(file_name);

    let title = format!("Influence Plot ({})", model.label);
    render_influence_plot(&path, &measures, &title, config.plot_size)?;
    debug!(path = %path.display(), influential = measures.influential().len(), "influence plot written");

    let text = report::influence_section(&path, &measures, config.influence_top);
    report.add_image(path);
    Ok(text)
}

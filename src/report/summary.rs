//! Renderers turning stage results into report text.

use crate::analysis::{percent_effect, ModelFit};
use crate::data::{CategoricalEncoding, CleaningSummary, Dataset};
use crate::diagnostics::{BpCriterion, BreuschPagan, InfluenceMeasures, VifTable};
use crate::report::table::{Align, MarkdownTable};
use crate::solvers::FittedRegressor;
use crate::stats::{CategoricalSummary, NumericSummary};
use std::fmt::Write;
use std::path::Path;

const RULE_WIDTH: usize = 78;

/// Compact number format: fixed for ordinary magnitudes, scientific otherwise.
pub fn format_value(x: f64) -> String {
    if x.is_nan() {
        "nan".to_string()
    } else if x.is_infinite() {
        if x > 0.0 { "inf" } else { "-inf" }.to_string()
    } else if x != 0.0 && (x.abs() >= 1e6 || x.abs() < 1e-3) {
        format!("{:.3e}", x)
    } else {
        format!("{:.4}", x)
    }
}

fn fixed(x: f64, decimals: usize) -> String {
    if x.is_finite() {
        format!("{:.*}", decimals, x)
    } else {
        format_value(x)
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

/// Column overview of the raw dataset: types, non-null and missing counts.
pub fn dataset_info(raw: &Dataset) -> String {
    let n = raw.n_rows();
    let mut out = format!(
        "{} linhas, {} colunas\n\n",
        raw.n_rows(),
        raw.n_columns()
    );

    let mut table =
        MarkdownTable::new(["#", "Coluna", "Não nulos", "Faltantes", "% do total", "Tipo"])
            .align(1, Align::Left)
            .align(5, Align::Left);
    for (i, column) in raw.columns().iter().enumerate() {
        let missing = column.missing_count();
        table.push_row([
            i.to_string(),
            column.name.clone(),
            (n - missing).to_string(),
            missing.to_string(),
            format!("{:.2}%", percent(missing, n)),
            column.dtype().to_string(),
        ]);
    }
    out.push_str(&table.render());
    out
}

/// Rows dropped by listwise deletion and the resulting shape.
pub fn cleaning_summary(summary: &CleaningSummary, cleaned: &Dataset) -> String {
    let (rows, cols) = cleaned.shape();
    format!(
        "Linhas antes: {}\nLinhas depois: {}\nNova shape: ({}, {})\n{} linhas a menos ({:.2}% do total)\n",
        summary.rows_before,
        summary.rows_after,
        rows,
        cols,
        summary.rows_removed(),
        summary.removed_percent()
    )
}

/// `count/mean/std/var/min/quartiles/max` by column, in describe layout.
pub fn descriptive_table(summaries: &[NumericSummary]) -> String {
    let headers = std::iter::once(String::new()).chain(summaries.iter().map(|s| s.name.clone()));
    let mut table = MarkdownTable::new(headers);

    let rows: [(&str, fn(&NumericSummary) -> f64); 9] = [
        ("count", |s| s.count as f64),
        ("mean", |s| s.mean),
        ("std", |s| s.std_dev),
        ("var", |s| s.variance),
        ("min", |s| s.min),
        ("25%", |s| s.q25),
        ("50%", |s| s.median),
        ("75%", |s| s.q75),
        ("max", |s| s.max),
    ];
    for (label, get) in rows {
        let cells = std::iter::once(label.to_string())
            .chain(summaries.iter().map(|s| fixed(get(s), 4)));
        table.push_row(cells);
    }

    table.render()
}

/// Level counts of every categorical column.
pub fn categorical_table(summaries: &[CategoricalSummary]) -> String {
    let mut overview = MarkdownTable::new(["Variável", "Contagem", "Níveis", "Moda", "Freq. moda"])
        .align(3, Align::Left);
    let mut levels = MarkdownTable::new(["Variável", "Nível", "Contagem", "%"])
        .align(1, Align::Left);

    for s in summaries {
        overview.push_row([
            s.name.clone(),
            s.count.to_string(),
            s.distinct.to_string(),
            s.mode.clone().unwrap_or_default(),
            s.mode_frequency.to_string(),
        ]);
        for (level, count) in &s.frequencies {
            levels.push_row([
                s.name.clone(),
                level.clone(),
                count.to_string(),
                format!("{:.2}", percent(*count, s.count)),
            ]);
        }
    }

    format!("{}\n{}", overview.render(), levels.render())
}

/// Reference level of each encoded column.
pub fn base_levels(encodings: &[CategoricalEncoding]) -> String {
    if encodings.is_empty() {
        return "Nenhuma variável categórica codificada.\n".to_string();
    }
    encodings
        .iter()
        .map(|e| format!("{}: {} ({} níveis)\n", e.column, e.base, e.n_levels()))
        .collect()
}

/// Regression summary in the familiar two-column header plus coefficient table layout.
pub fn model_summary(model: &ModelFit) -> String {
    let r = model.fitted.result();
    let mut out = String::new();

    let title = "OLS Regression Results";
    let pad = RULE_WIDTH.saturating_sub(title.len()) / 2;
    let _ = writeln!(out, "{}{}", " ".repeat(pad), title);
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));

    let header = [
        ("Dep. Variable:", model.design.target().to_string(), "R-squared:", fixed(r.r_squared, 3)),
        ("Model:", "OLS".to_string(), "Adj. R-squared:", fixed(r.adj_r_squared, 3)),
        ("Method:", "Least Squares".to_string(), "F-statistic:", format_value(r.f_statistic)),
        (
            "No. Observations:",
            r.n_observations.to_string(),
            "Prob (F-statistic):",
            format_value(r.f_pvalue),
        ),
        (
            "Df Residuals:",
            r.residual_df().to_string(),
            "Log-Likelihood:",
            format_value(r.log_likelihood),
        ),
        ("Df Model:", r.model_df().to_string(), "AIC:", format_value(r.aic)),
        ("Covariance Type:", r.covariance_type.to_string(), "BIC:", format_value(r.bic)),
    ];
    for (l1, v1, l2, v2) in header {
        let _ = writeln!(out, "{:<18}{:>20}   {:<20}{:>17}", l1, v1, l2, v2);
    }
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));

    let alpha = 1.0 - r.confidence_level;
    let lower_label = format!("[{:.3}", alpha / 2.0);
    let upper_label = format!("{:.3}]", 1.0 - alpha / 2.0);

    let name_width = model
        .design
        .names()
        .iter()
        .map(|n| n.chars().count())
        .max()
        .unwrap_or(0)
        .max(10);

    let _ = writeln!(
        out,
        "{:<w$}{:>12}{:>11}{:>10}{:>10}{:>12}{:>12}",
        "",
        "coef",
        "std err",
        if r.use_t { "t" } else { "z" },
        if r.use_t { "P>|t|" } else { "P>|z|" },
        lower_label,
        upper_label,
        w = name_width
    );
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH.max(name_width + 67)));

    let mut row = |name: &str, coef: f64, se: f64, t: f64, p: f64, ci: (f64, f64)| {
        let _ = writeln!(
            out,
            "{:<w$}{:>12}{:>11}{:>10}{:>10}{:>12}{:>12}",
            name,
            fixed(coef, 4),
            fixed(se, 3),
            fixed(t, 3),
            fixed(p, 3),
            fixed(ci.0, 3),
            fixed(ci.1, 3),
            w = name_width
        );
    };

    if let Some(intercept) = r.intercept {
        row(
            "const",
            intercept,
            r.intercept_std_error.unwrap_or(f64::NAN),
            r.intercept_t_statistic.unwrap_or(f64::NAN),
            r.intercept_p_value.unwrap_or(f64::NAN),
            r.intercept_conf_interval.unwrap_or((f64::NAN, f64::NAN)),
        );
    }

    let pick = |col: &Option<faer::Col<f64>>, j: usize| col.as_ref().map_or(f64::NAN, |c| c[j]);
    for (j, name) in model.design.names().iter().enumerate() {
        row(
            name,
            r.coefficients[j],
            pick(&r.std_errors, j),
            pick(&r.t_statistics, j),
            pick(&r.p_values, j),
            (pick(&r.conf_interval_lower, j), pick(&r.conf_interval_upper, j)),
        );
    }
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH.max(name_width + 67)));

    if r.covariance_type.is_robust() {
        let _ = writeln!(
            out,
            "Notes:\n[1] Standard Errors are heteroscedasticity robust ({})",
            r.covariance_type
        );
    }

    out
}

/// VIF per predictor, flagged against the table's threshold.
pub fn vif_table(table: &VifTable) -> String {
    let mut md = MarkdownTable::new(["Variavel", "VIF", "Acima do limite"]);
    for row in &table.rows {
        md.push_row([
            row.name.clone(),
            fixed(row.vif, 4),
            if row.flagged { "sim" } else { "não" }.to_string(),
        ]);
    }

    let flagged: Vec<&str> = table.flagged().map(|r| r.name.as_str()).collect();
    let mut out = md.render();
    let _ = writeln!(out, "\nLimite de VIF: {}", table.threshold);
    if flagged.is_empty() {
        out.push_str("Nenhuma variável acima do limite.\n");
    } else {
        let _ = writeln!(out, "Multicolinearidade elevada: {}", flagged.join(", "));
    }
    out
}

/// Statistics, decision rule and verdict of a Breusch-Pagan test.
pub fn breusch_pagan_section(bp: &BreuschPagan) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "LM estatística: {:.4}", bp.lm_statistic);
    let _ = writeln!(out, "LM p-valor: {:.4}", bp.lm_pvalue);
    let _ = writeln!(out, "F estatística: {:.4}", bp.f_statistic);
    let _ = writeln!(out, "F p-valor: {:.4}", bp.f_pvalue);
    let _ = writeln!(out, "Graus de liberdade: {}", bp.df);

    let criterion = match bp.criterion {
        BpCriterion::F => "F p-valor",
        BpCriterion::Lm => "LM p-valor",
    };
    let _ = writeln!(out, "Critério: {} < {}", criterion, bp.significance);

    let decision = if bp.rejects_homoscedasticity() {
        "H0 rejeitada"
    } else {
        "H0 aceita"
    };
    let _ = writeln!(out, "Resultado: {} ({})", decision, bp.verdict);
    out
}

/// Coefficients of a log-target model as approximate percent effects.
pub fn percent_effects(model: &ModelFit) -> String {
    let coefficients = model.fitted.coefficients();
    let mut table = MarkdownTable::new(["Variável", "coef", "Efeito aprox. (%)"]);
    for (j, name) in model.design.names().iter().enumerate() {
        table.push_row([
            name.clone(),
            fixed(coefficients[j], 4),
            fixed(percent_effect(coefficients[j]), 2),
        ]);
    }
    table.render()
}

/// Plot location, Cook's threshold and the most influential observations.
pub fn influence_section(image: &Path, measures: &InfluenceMeasures, top: usize) -> String {
    let influential = measures.influential();
    let mut out = String::new();
    let _ = writeln!(out, "Gráfico de influência: {}", image.display());
    let _ = writeln!(out, "Limite de Cook (4/n): {:.4}", measures.threshold);
    let _ = writeln!(
        out,
        "Observações acima do limite: {} de {}",
        influential.len(),
        measures.n_observations()
    );
    let _ = writeln!(
        out,
        "Alta alavancagem (h > 2p/n): {}",
        measures.high_leverage().len()
    );
    let _ = writeln!(
        out,
        "Resíduos studentizados |r| > 2: {}",
        measures.outliers(2.0).len()
    );

    let rows = measures.top(top);
    if !rows.is_empty() {
        let mut table = MarkdownTable::new([
            "Obs",
            "Alavancagem",
            "Resíduo studentizado",
            "Resíduo ext. studentizado",
            "Cook's D",
        ])
        .align(0, Align::Right);
        for obs in rows {
            table.push_row([
                obs.row.to_string(),
                fixed(obs.leverage, 4),
                fixed(obs.studentized, 3),
                fixed(obs.externally_studentized, 3),
                fixed(obs.cooks_distance, 4),
            ]);
        }
        out.push('\n');
        out.push_str(&table.render());
    }
    out
}

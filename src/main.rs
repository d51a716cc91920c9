use anyhow::{Context, Result};
use clap::Parser;
use regress_report::analysis::{self, AnalysisConfig};
use regress_report::core::CovarianceType;
use regress_report::data::BaseLevel;
use regress_report::diagnostics::{BpCriterion, BreuschPaganVariant};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// OLS regression report for hardware response-time data.
#[derive(Debug, Parser)]
#[command(name = "regress-report", version, about)]
struct Cli {
    /// CSV file to analyse.
    #[arg(short, long, default_value = "dataset_5.csv")]
    input: PathBuf,

    /// Field delimiter of the input file.
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Directory receiving the report and the influence plots.
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    #[arg(long, default_value = "relatorio_output.txt")]
    report_name: String,

    /// Dependent variable.
    #[arg(short, long, default_value = "tempo_resposta")]
    target: String,

    /// Significance level for elimination and the Breusch-Pagan decision.
    #[arg(long, default_value_t = 0.05)]
    alpha: f64,

    #[arg(long, default_value_t = 10.0)]
    vif_threshold: f64,

    #[arg(long, value_enum, default_value_t = CovarianceType::HC3)]
    covariance: CovarianceType,

    #[arg(long, default_value_t = 0.95)]
    confidence_level: f64,

    #[arg(long, value_enum, default_value_t = BreuschPaganVariant::Koenker)]
    bp_variant: BreuschPaganVariant,

    /// Statistic whose p-value decides the Breusch-Pagan verdict.
    #[arg(long, value_enum, default_value_t = BpCriterion::F)]
    bp_criterion: BpCriterion,

    /// Which level of each categorical column becomes the reference.
    #[arg(long, value_enum, default_value_t = BaseLevel::Alphabetical)]
    base_level: BaseLevel,

    #[arg(long, default_value_t = 1800)]
    plot_width: u32,

    #[arg(long, default_value_t = 1200)]
    plot_height: u32,

    /// Observations listed under each influence plot.
    #[arg(long, default_value_t = 5)]
    influence_top: usize,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn to_config(&self) -> Result<AnalysisConfig> {
        let delimiter = u8::try_from(self.delimiter)
            .with_context(|| format!("delimiter '{}' is not a single byte", self.delimiter))?;

        AnalysisConfig::builder()
            .input(&self.input)
            .delimiter(delimiter)
            .output_dir(&self.output_dir)
            .report_name(self.report_name.clone())
            .target(self.target.clone())
            .significance(self.alpha)
            .vif_threshold(self.vif_threshold)
            .covariance(self.covariance)
            .confidence_level(self.confidence_level)
            .bp_variant(self.bp_variant)
            .bp_criterion(self.bp_criterion)
            .base_level(self.base_level)
            .plot_size(self.plot_width, self.plot_height)
            .influence_top(self.influence_top)
            .build()
            .context("invalid arguments")
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.to_config()?;
    info!(input = %config.input.display(), output = %config.output_dir.display(), "starting analysis");

    let outcome = analysis::run(&config)
        .with_context(|| format!("analysis of '{}' failed", config.input.display()))?;

    println!(
        "Análise concluída. Relatório salvo em '{}'.",
        outcome.report_path.display()
    );
    println!(
        "Gráficos e influence plots no diretório '{}/'.",
        config.output_dir.display()
    );
    Ok(())
}

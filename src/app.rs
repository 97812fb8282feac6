//! Main application orchestration and execution

use crate::{
    charts::rtt_mean_plot,
    config::display_config_summary,
    error::Result,
    ingest::{Corpus, CorpusBuilder, KeyExtractor},
    logging::{Logger, StageTimer},
    models::Config,
    output::{OutputCoordinator, OutputFormatterFactory, RunSummary},
    stats::{rtt_means, rtt_summaries},
    types::ChartOutput,
};

/// What one run produced
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub files: usize,
    pub series: usize,
    pub charts: Vec<ChartOutput>,
}

/// Main application struct that coordinates all pipeline stages
pub struct App {
    config: Config,
    logger: Logger,
}

impl App {
    /// Create a new application instance from a validated configuration
    pub fn new(config: Config) -> Self {
        let logger = Logger::with_config("APP", &config);
        Self { config, logger }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Discover and group every result file under the configured roots
    pub fn load_corpus(&self) -> Result<Corpus> {
        let extractor = KeyExtractor::new(self.config.resolvers.clone());
        CorpusBuilder::new(&self.config.subdir, extractor, &self.logger).build(&self.config.dirs)
    }

    /// Run the batch: ingest, aggregate, report, render
    pub fn run(&self) -> Result<RunReport> {
        let config = &self.config;
        let mut timer = StageTimer::new(&self.logger);

        if config.debug {
            self.logger.debug("Configuration loaded")
                .field("summary", display_config_summary(config))
                .log();
        }

        timer.start("ingest");
        let corpus = self.load_corpus()?;
        timer.end("ingest");

        let files: usize = corpus.values().map(Vec::len).sum();
        let coordinator = OutputCoordinator::new(OutputFormatterFactory::create_formatter(config.enable_color));

        if corpus.is_empty() {
            println!(
                "{}",
                coordinator.display_warning(&format!(
                    "No result files found under a '{}' directory",
                    config.subdir
                ))?
            );
        }

        timer.start("aggregate");
        let means = rtt_means(&corpus);
        let summaries = rtt_summaries(&corpus);
        timer.end("aggregate");

        self.logger.info("Aggregated RTT series")
            .field("files", files)
            .field("series", means.len())
            .log();

        let charts = if config.render_charts {
            timer.start("render");
            let charts = rtt_mean_plot(&means, config, &self.logger)?;
            timer.end("render");
            charts
        } else {
            self.logger.info("Chart rendering disabled").log();
            Vec::new()
        };

        let title = format!("RTT summary ({})", config.subdir);
        let shown_charts = config.render_charts.then_some(charts.as_slice());
        println!("{}", coordinator.display_report(&title, &summaries, shown_charts)?);

        if let Some(ref path) = config.summary_json {
            RunSummary::new(&summaries, &config.subdir, &config.dirs, files)
                .with_run_id(self.logger.run_id())
                .with_charts(&charts)
                .write_json(path)?;
            println!(
                "{}",
                coordinator.display_success(&format!("Wrote summary to {}", path.display()))?
            );
        }

        Ok(RunReport {
            files,
            series: means.len(),
            charts,
        })
    }
}

use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::analysis::{write_stop_list, StopListAnalyzer};
use crate::config::{ConfigError, StopListConfig};
use crate::matrix::{MatrixError, OccurrenceMatrix};
use crate::source::{PageSampler, PageSource, SampleError};
use crate::tokenize::{Tokenizer, WordPatternTokenizer};
use crate::types::stop_list::{AnalysisError, StopList};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sample(#[from] SampleError),
    #[error(transparent)]
    Matrix(#[from] MatrixError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error("Failed to write stop list: {0}")]
    Output(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub pages: usize,
    pub attempts: usize,
    pub duplicates_skipped: usize,
    pub vocabulary_size: usize,
    pub stop_list: StopList,
}

/// fetch -> tokenize -> one-hot -> analyze -> stage -> write
pub struct StopListBuilder<S, T = WordPatternTokenizer> {
    config: StopListConfig,
    source: S,
    tokenizer: T,
}

impl<S: PageSource> StopListBuilder<S, WordPatternTokenizer> {
    pub fn new(config: StopListConfig, source: S) -> Result<Self, PipelineError> {
        Self::with_tokenizer(config, source, WordPatternTokenizer::default())
    }
}

impl<S, T> StopListBuilder<S, T>
where
    S: PageSource,
    T: Tokenizer,
{
    pub fn with_tokenizer(
        config: StopListConfig,
        source: S,
        tokenizer: T,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            config,
            source,
            tokenizer,
        })
    }

    pub fn config(&self) -> &StopListConfig {
        &self.config
    }

    pub fn run(self) -> Result<RunReport, PipelineError> {
        let Self {
            config,
            source,
            tokenizer,
        } = self;

        let analyzer = analyzer_for(&config)?;

        // 1. Fetch
        let mut sampler = PageSampler::new(source, config.max_attempts_per_page, config.seed);
        let sample = sampler.sample(config.num_pages)?;

        // 2. Tokenize + one-hot encode
        let matrix = OccurrenceMatrix::from_pages(&sample.pages, &tokenizer);
        info!(
            documents = matrix.rows(),
            terms = matrix.columns(),
            "built occurrence matrix"
        );

        // 3. Analyze; an empty matrix stops here, before anything is written
        let stop_list = analyzer.analyze(&matrix)?;

        // 4. Stage + write
        if let Some(path) = &config.one_hot_path {
            matrix.write_csv(path)?;
        }
        write_stop_list(&config.stop_list_path, &stop_list)?;

        Ok(RunReport {
            pages: sample.pages.len(),
            attempts: sample.attempts,
            duplicates_skipped: sample.duplicates_skipped,
            vocabulary_size: matrix.columns(),
            stop_list,
        })
    }
}

/// Analyze a previously staged one-hot file; no network access.
pub fn analyze_staged(
    one_hot_path: &Path,
    config: &StopListConfig,
) -> Result<StopList, PipelineError> {
    let analyzer = analyzer_for(config)?;
    let matrix = OccurrenceMatrix::read_csv(one_hot_path)?;
    info!(
        path = %one_hot_path.display(),
        documents = matrix.rows(),
        terms = matrix.columns(),
        "loaded staged occurrence matrix"
    );

    let stop_list = analyzer.analyze(&matrix)?;
    write_stop_list(&config.stop_list_path, &stop_list)?;
    Ok(stop_list)
}

fn analyzer_for(config: &StopListConfig) -> Result<StopListAnalyzer, AnalysisError> {
    StopListAnalyzer::new(config.formula, config.threshold, config.limit)
}

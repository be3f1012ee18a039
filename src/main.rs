//! job-synonyms: corpus building, embedding training, synonym generation and index loading

use anyhow::Context;
use clap::Parser;
use job_synonyms::cli::{self, Cli, Commands, ConfigAction};
use job_synonyms::config::Config;
use job_synonyms::input::PostingReader;
use job_synonyms::output::formatter::formatter_for;
use job_synonyms::output::report::{ReportBuilder, RunReport};
use job_synonyms::processing::corpus::{Corpus, CorpusBuilder, CorpusFormat};
use job_synonyms::processing::synonyms::SynonymGenerator;
use job_synonyms::processing::trainer::{EmbeddingTrainer, TrainingParams, Word2VecCommand};
use job_synonyms::processing::vectors::WordVectors;
use job_synonyms::processing::{normalize_title, DocumentConverter, MecabTagger, NounExtractor};
use job_synonyms::search::IndexClient;
use job_synonyms::JobSynonymsError;
use log::{error, info};
use std::path::Path;
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);

    match run_command(cli.command, &config, &config_path).await {
        Ok(Some(report)) => {
            let formatter = formatter_for(cli.report, config.output.color_output);
            match formatter.format_report(&report) {
                Ok(text) => println!("{}", text),
                Err(e) => {
                    error!("Failed to format report: {}", e);
                    process::exit(1);
                }
            }
        }
        Ok(None) => {}
        Err(e) => {
            error!("Command failed: {:#}", e);
            process::exit(1);
        }
    }
}

fn noun_extractor(config: &Config) -> NounExtractor<MecabTagger> {
    NounExtractor::new(MecabTagger::from_config(&config.tagger), &config.tagger)
}

fn read_postings(path: &Path) -> anyhow::Result<PostingReader> {
    cli::validate_file_extension(path, &["csv"])
        .map_err(|e| JobSynonymsError::InvalidInput(format!("Postings file: {}", e)))?;
    Ok(PostingReader::new(path))
}

async fn run_command(command: Commands, config: &Config, config_path: &Path) -> anyhow::Result<Option<RunReport>> {
    let report = match command {
        Commands::Corpus { input, output, format } => {
            let input = input.unwrap_or_else(|| config.data.postings_path.clone());
            let output = output.unwrap_or_else(|| config.data.corpus_path.clone());

            let postings = read_postings(&input)?
                .read_postings()
                .with_context(|| format!("reading postings from {}", input.display()))?;

            let builder = CorpusBuilder::new(DocumentConverter::new(noun_extractor(config))).with_progress(true);
            let corpus = builder.build(&postings);
            corpus
                .write(&output, format)
                .with_context(|| format!("writing corpus to {}", output.display()))?;

            ReportBuilder::new("corpus")
                .input(&input)
                .output(&output)
                .metric("postings", corpus.stats.postings_read)
                .metric("sentences", corpus.stats.sentences)
                .metric("empty sentences", corpus.stats.empty_sentences)
                .metric("tokens", corpus.stats.tokens)
                .warn_if(
                    corpus.stats.postings_skipped > 0,
                    format!("{} postings skipped after tagger failures", corpus.stats.postings_skipped),
                )
                .finish()
        }

        Commands::Train {
            input,
            corpus: prebuilt,
            output,
            size,
            min_count,
            window,
            algorithm,
            keep_corpus,
        } => {
            let output = output.unwrap_or_else(|| config.data.vectors_path.clone());

            let mut params = TrainingParams::from(&config.training);
            params.vector_size = size.unwrap_or(params.vector_size);
            params.min_count = min_count.unwrap_or(params.min_count);
            params.window = window.unwrap_or(params.window);
            params.algorithm = algorithm.unwrap_or(params.algorithm);

            let (source, corpus) = match prebuilt {
                Some(path) => {
                    let corpus = Corpus::read(&path, CorpusFormat::from_path(&path))
                        .with_context(|| format!("reading corpus from {}", path.display()))?;
                    (path, corpus)
                }
                None => {
                    let input = input.unwrap_or_else(|| config.data.postings_path.clone());
                    let postings = read_postings(&input)?
                        .read_postings()
                        .with_context(|| format!("reading postings from {}", input.display()))?;
                    let builder =
                        CorpusBuilder::new(DocumentConverter::new(noun_extractor(config))).with_progress(true);
                    (input, builder.build(&postings))
                }
            };
            if corpus.stats.tokens == 0 {
                return Err(JobSynonymsError::Training("Corpus is empty; nothing to train on".to_string()).into());
            }

            // The trainer reads a lines file; unless kept, it is a temporary file removed on drop
            let scratch = if keep_corpus {
                None
            } else {
                Some(
                    tempfile::Builder::new()
                        .prefix("job-synonyms-corpus-")
                        .suffix(".txt")
                        .tempfile()
                        .context("creating temporary corpus file")?,
                )
            };
            let corpus_path = match &scratch {
                Some(file) => file.path().to_path_buf(),
                None => config.data.corpus_path.clone(),
            };
            corpus
                .write(&corpus_path, CorpusFormat::Lines)
                .with_context(|| format!("writing corpus to {}", corpus_path.display()))?;

            let trainer = Word2VecCommand::new(config.training.command.clone());
            let vectors = trainer
                .train(&corpus_path, &output, &params)
                .context("training word embeddings")?;

            let mut report = ReportBuilder::new("train").input(&source).output(&output);
            if keep_corpus {
                report = report.output(&corpus_path);
            }
            report
                .metric("postings", corpus.stats.postings_read)
                .metric("sentences", corpus.stats.sentences)
                .metric("tokens", corpus.stats.tokens)
                .metric("vocabulary", vectors.len())
                .metric("dimensions", vectors.dim())
                .metric("algorithm", format!("{:?}", params.algorithm))
                .metric("window", params.window)
                .metric("min count", params.min_count)
                .warn_if(
                    corpus.stats.postings_skipped > 0,
                    format!("{} postings skipped after tagger failures", corpus.stats.postings_skipped),
                )
                .finish()
        }

        Commands::Synonyms { model, output, top_n } => {
            let model = model.unwrap_or_else(|| config.data.vectors_path.clone());
            let output = output.unwrap_or_else(|| config.data.synonym_path.clone());
            let top_n = top_n.unwrap_or(config.synonyms.top_n);

            let vectors = WordVectors::load(&model).context("loading word vectors")?;
            let segmenter = noun_extractor(config);
            let stats = SynonymGenerator::new(&vectors, &segmenter, top_n)
                .with_progress(true)
                .write(&output)
                .with_context(|| format!("writing synonyms to {}", output.display()))?;

            ReportBuilder::new("synonyms")
                .input(&model)
                .output(&output)
                .metric("rules", stats.rules)
                .metric("neighbours", stats.neighbours)
                .metric("top n", top_n)
                .warn_if(stats.failed_words > 0, format!("{} words had no rule", stats.failed_words))
                .finish()
        }

        Commands::Similar { word, model, top_n } => {
            let model = model.unwrap_or_else(|| config.data.vectors_path.clone());
            let top_n = top_n.unwrap_or(config.synonyms.top_n);

            let vectors = WordVectors::load(&model).context("loading word vectors")?;
            let similar = vectors.most_similar(&word, top_n)?;

            let mut report = ReportBuilder::new(&format!("similar: {}", word)).input(&model);
            for neighbour in &similar {
                report = report.metric(&neighbour.word, format!("{:.4}", neighbour.score));
            }
            report.warn_if(similar.is_empty(), "no neighbours found").finish()
        }

        Commands::Index { index, input, url } => {
            let input = input.unwrap_or_else(|| config.data.postings_path.clone());
            let mut index_config = config.index.clone();
            if let Some(url) = url {
                index_config.url = url;
            }

            let rows = read_postings(&input)?
                .read_raw_rows()
                .with_context(|| format!("reading postings from {}", input.display()))?;

            info!("Loading {} postings into '{}' at {}", rows.len(), index, index_config.url);
            let client = IndexClient::from_config(&index_config)?;
            let stats = client.bulk_index(&index, &rows).await.context("bulk indexing")?;

            ReportBuilder::new("index")
                .input(&input)
                .metric("index", &index)
                .metric("documents", stats.sent)
                .metric("rejected", stats.failed)
                .metric("batches", stats.batches)
                .warn_if(stats.failed > 0, format!("{} documents rejected by the index", stats.failed))
                .finish()
        }

        Commands::Normalize { title } => ReportBuilder::new("normalize")
            .metric("raw", format!("{:?}", title))
            .metric("normalized", format!("{:?}", normalize_title(&title)))
            .finish(),

        Commands::Config { action } => {
            match action {
                Some(ConfigAction::Show) | None => {
                    let content = toml::to_string_pretty(config).context("serializing configuration")?;
                    println!("{}", content);
                }
                Some(ConfigAction::Reset) => {
                    Config::default().save_to(config_path)?;
                    println!("Configuration reset: {}", config_path.display());
                }
                Some(ConfigAction::Path) => {
                    println!("{}", config_path.display());
                }
            }
            return Ok(None);
        }
    };

    Ok(Some(report))
}


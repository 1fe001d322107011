use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use gunsan_chat_backend::core::config::IngestConfig;
use gunsan_chat_backend::genai::GeminiClient;
use gunsan_chat_backend::ingestion::IngestionPipeline;
use gunsan_chat_backend::logging;
use gunsan_chat_backend::store::SupabaseStore;

/// Loads municipal CSV exports into the chatbot vector store.
#[derive(Debug, Parser)]
#[command(name = "ingest", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Ingest a public-facility CSV export
    Facilities {
        /// Path to the CSV file
        file: PathBuf,
    },
    /// Ingest a city-news CSV export
    News {
        /// Path to the CSV file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init(None);

    let cli = Cli::parse();
    let config = IngestConfig::from_env().context("Ingestion configuration is incomplete")?;

    let genai =
        GeminiClient::new(config.google_api_key).with_embedding_model(config.embedding_model);
    let store = SupabaseStore::service_only(config.supabase_url, config.supabase_service_key);
    let pipeline = IngestionPipeline::new(genai, store);

    let report = match &cli.command {
        Commands::Facilities { file } => {
            let input = open(file)?;
            pipeline.ingest_facilities(input).await
        }
        Commands::News { file } => {
            let input = open(file)?;
            pipeline.ingest_news(input).await
        }
    };

    tracing::info!(
        records = report.records,
        skipped = report.skipped_records,
        chunks_written = report.chunks_written,
        embed_failures = report.embed_failures,
        write_failures = report.write_failures,
        "ingestion pass complete"
    );

    if report.embed_failures + report.write_failures > 0 {
        bail!(
            "{} chunks failed ({} embedding, {} write)",
            report.embed_failures + report.write_failures,
            report.embed_failures,
            report.write_failures
        );
    }

    Ok(())
}

fn open(file: &Path) -> anyhow::Result<File> {
    File::open(file).with_context(|| format!("Failed to open {}", file.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn a_dataset_subcommand_is_required() {
        // A required subcommand derive also sets arg_required_else_help, so
        // bare argv reports the help-display error, not MissingSubcommand.
        let err = Cli::try_parse_from(["ingest"]).unwrap_err();
        assert_eq!(
            err.kind(),
            ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        );
    }

    #[test]
    fn the_file_argument_is_required() {
        let err = Cli::try_parse_from(["ingest", "facilities"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn unknown_subcommands_are_rejected() {
        let err = Cli::try_parse_from(["ingest", "parks", "file.csv"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn both_datasets_parse_with_a_path() {
        let cli = Cli::try_parse_from(["ingest", "news", "exports/news.csv"]).unwrap();
        match cli.command {
            Commands::News { file } => assert_eq!(file, PathBuf::from("exports/news.csv")),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}

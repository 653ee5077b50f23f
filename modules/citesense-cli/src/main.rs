use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use citesense_common::Config;
use citesense_refs::{ReferenceExtractor, TweetSource};
use citesense_resolver::MetadataPipeline;
use tweet_client::TweetClient;

const DEFAULT_MAX_SUMMARY_LENGTH: usize = 500;

#[derive(Parser)]
#[command(name = "citesense", about = "Resolve links to citation metadata")]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve URLs to normalized citation records
    Resolve {
        #[arg(required = true)]
        urls: Vec<String>,

        /// Summaries are cut to this many characters
        #[arg(long, default_value_t = DEFAULT_MAX_SUMMARY_LENGTH)]
        max_summary_length: usize,
    },
    /// Extract the external links referenced by Twitter/X posts
    Refs {
        #[arg(required = true)]
        post_urls: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("citesense=info,citesense_resolver=info,citesense_refs=info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if cli.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let config = Config::from_env().context("Invalid configuration")?;
    config.log_redacted();
    let http = config.http_client()?;

    let output = match cli.command {
        Command::Resolve {
            urls,
            max_summary_length,
        } => {
            let pipeline = MetadataPipeline::from_config(&config, http)?;
            let records = pipeline.extract_metadata(&urls, max_summary_length).await?;
            serde_json::to_value(records)?
        }
        Command::Refs { post_urls } => {
            let client = TweetClient::new(http).with_base_url(&config.tweet_api_base_url);
            let extractor = ReferenceExtractor::from_config(Arc::new(TweetSource::new(client)), &config)?;
            let results = extractor.extract_references_batch(&post_urls).await;
            let values = post_urls
                .iter()
                .zip(results)
                .map(|(url, result)| match result {
                    Ok(post) => serde_json::to_value(post),
                    Err(e) => Ok(json!({ "post_url": url, "error": e.to_string() })),
                })
                .collect::<Result<Vec<_>, _>>()?;
            serde_json::Value::Array(values)
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

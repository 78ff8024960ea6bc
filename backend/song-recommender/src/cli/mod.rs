// Command-line front end: argument definitions and query execution.
//
// `main` only wires configuration and logging; everything that decides what
// gets printed and which exit status is returned lives here.

use crate::config::Config;
use crate::error::{RecommendError, Result};
use crate::ingest::CsvRatingSource;
use crate::models::Identifier;
use crate::services::{parse_neighborhood_size, Recommender};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "song-recommender")]
#[command(about = "Recommend songs from the ratings of similar users")]
#[command(version)]
pub struct Cli {
    /// Ratings file (user id, song id, rating)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Only read the first N records (0 reads everything)
    #[arg(long, global = true)]
    pub limit: Option<usize>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Predict ratings for the songs a user has not rated
    Recommend {
        #[arg(short, long)]
        user: String,

        /// Number of similar users to consider
        #[arg(short, long, allow_hyphen_values = true)]
        k: Option<String>,
    },

    /// List the users most similar to a user
    Neighbors {
        #[arg(short, long)]
        user: String,

        #[arg(short, long, allow_hyphen_values = true)]
        k: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// How a successfully executed query ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    UserNotFound,
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::UserNotFound => ExitCode::FAILURE,
        }
    }
}

/// Rating source for this invocation; `--data` and `--limit` win over config
pub fn rating_source(cli: &Cli, config: &Config) -> CsvRatingSource {
    CsvRatingSource::new(cli.data.as_ref().unwrap_or(&config.dataset_path))
        .with_limit(cli.limit.unwrap_or(config.record_limit))
        .with_headers(config.has_headers)
}

/// Load ratings, build the snapshot and answer the query.
///
/// An unknown user is an expected outcome: the message goes to `err` and
/// `Outcome::UserNotFound` is returned. Invalid input and ingestion failures
/// are returned as errors.
pub fn run<O: Write, E: Write>(cli: &Cli, config: &Config, out: &mut O, err: &mut E) -> Result<Outcome> {
    let (user, raw_k) = match &cli.command {
        Commands::Recommend { user, k } | Commands::Neighbors { user, k } => (user, k),
    };
    let k = match raw_k {
        Some(raw) => parse_neighborhood_size(raw)?,
        None => config.neighborhood_size,
    };
    let user = Identifier::parse(user);

    let records = rating_source(cli, config).load()?;
    let recommender = Recommender::build(&records)?;

    let result = match &cli.command {
        Commands::Recommend { .. } => write_recommendations(&recommender, &user, k, cli.format, out),
        Commands::Neighbors { .. } => write_neighbors(&recommender, &user, k, cli.format, out),
    };

    match result {
        Ok(()) => Ok(Outcome::Success),
        Err(RecommendError::NotFound(message)) => {
            writeln!(err, "{} not found.", capitalize(&message))?;
            Ok(Outcome::UserNotFound)
        }
        Err(e) => Err(e),
    }
}

fn write_recommendations<O: Write>(
    recommender: &Recommender<Identifier, Identifier>,
    user: &Identifier,
    k: usize,
    format: OutputFormat,
    out: &mut O,
) -> Result<()> {
    let report = recommender.report(user, k)?;

    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?,
        OutputFormat::Text => {
            writeln!(out, "Top {} similar users to {}:", k, user)?;
            for neighbor in &report.neighbors {
                writeln!(
                    out,
                    "User {}: Similarity = {:.4}",
                    neighbor.user, neighbor.similarity
                )?;
            }

            writeln!(out, "\nPredicted ratings for {}:", user)?;
            for prediction in &report.predictions {
                writeln!(
                    out,
                    "Song {}: Predicted Rating = {:.4} (estimated rating {:.2})",
                    prediction.item,
                    prediction.score,
                    prediction.estimated_rating(report.user_mean)
                )?;
            }
        }
    }

    Ok(())
}

fn write_neighbors<O: Write>(
    recommender: &Recommender<Identifier, Identifier>,
    user: &Identifier,
    k: usize,
    format: OutputFormat,
    out: &mut O,
) -> Result<()> {
    let neighbors = recommender.neighbors(user, k)?;

    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&neighbors)?)?,
        OutputFormat::Text => {
            writeln!(out, "Top {} similar users to {}:", k, user)?;
            for neighbor in &neighbors {
                writeln!(
                    out,
                    "User {}: Similarity = {:.4}",
                    neighbor.user, neighbor.similarity
                )?;
            }
        }
    }

    Ok(())
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

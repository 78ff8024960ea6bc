// Integration tests for the command-line front end: output, exit status and
// how flags combine with configuration

use clap::Parser;
use song_recommender::cli::{self, Cli, Outcome};
use song_recommender::{Config, LogFormat, RecommendError};
use std::io::Write;
use std::path::PathBuf;

const DATASET: &str = "user_id,song_id,rating\n\
                       1,S1,5\n\
                       1,S2,3\n\
                       2,S1,4\n\
                       2,S2,2\n\
                       2,S3,5\n\
                       3,S4,5\n";

fn write_dataset(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write dataset");
    file
}

fn config_for(dataset_path: impl Into<PathBuf>) -> Config {
    Config {
        dataset_path: dataset_path.into(),
        record_limit: 0,
        has_headers: true,
        neighborhood_size: 3,
        log_level: "info".to_string(),
        log_format: LogFormat::Text,
    }
}

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("song-recommender").chain(args.iter().copied()))
        .expect("valid arguments")
}

fn execute(cli: &Cli, config: &Config) -> (song_recommender::Result<Outcome>, String, String) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let outcome = cli::run(cli, config, &mut out, &mut err);
    (
        outcome,
        String::from_utf8(out).expect("utf-8 stdout"),
        String::from_utf8(err).expect("utf-8 stderr"),
    )
}

#[test]
fn test_recommend_prints_neighbours_and_predictions() {
    let file = write_dataset(DATASET);
    let config = config_for(file.path());

    let (outcome, out, err) = execute(&parse(&["recommend", "--user", "1", "-k", "1"]), &config);

    assert_eq!(outcome.unwrap(), Outcome::Success);
    assert!(out.contains("Top 1 similar users to 1:"));
    assert!(out.contains("User 2: Similarity = "));
    assert!(out.contains("Song S3: Predicted Rating = "));
    assert!(err.is_empty());
}

#[test]
fn test_unknown_user_reports_not_found() {
    let file = write_dataset(DATASET);
    let config = config_for(file.path());

    let (outcome, out, err) = execute(&parse(&["recommend", "--user", "99"]), &config);

    assert_eq!(outcome.unwrap(), Outcome::UserNotFound);
    assert_eq!(err.trim(), "User 99 not found.");
    assert!(out.is_empty());

    let (outcome, _, err) = execute(&parse(&["neighbors", "--user", "99"]), &config);
    assert_eq!(outcome.unwrap(), Outcome::UserNotFound);
    assert_eq!(err.trim(), "User 99 not found.");
}

#[test]
fn test_non_numeric_k_is_invalid_parameter() {
    let file = write_dataset(DATASET);
    let config = config_for(file.path());

    let (outcome, out, _) = execute(&parse(&["recommend", "--user", "1", "-k", "three"]), &config);

    assert!(matches!(outcome, Err(RecommendError::InvalidParameter(_))));
    assert!(out.is_empty());
}

#[test]
fn test_negative_k_clamps_to_empty_neighbourhood() {
    let file = write_dataset(DATASET);
    let config = config_for(file.path());

    let (outcome, out, _) = execute(&parse(&["recommend", "--user", "1", "-k", "-3"]), &config);

    assert_eq!(outcome.unwrap(), Outcome::Success);
    assert!(out.contains("Top 0 similar users to 1:"));
    assert!(!out.contains("Similarity ="));
    assert!(!out.contains("Predicted Rating ="));
}

#[test]
fn test_data_flag_overrides_config() {
    let file = write_dataset(DATASET);
    let config = config_for("/definitely/not/here.csv");

    let (outcome, _, _) = execute(&parse(&["neighbors", "--user", "1"]), &config);
    assert!(matches!(outcome, Err(RecommendError::Io(_))));

    let data = file.path().to_str().expect("utf-8 temp path");
    let (outcome, out, _) = execute(&parse(&["--data", data, "neighbors", "--user", "1"]), &config);
    assert_eq!(outcome.unwrap(), Outcome::Success);
    assert!(out.contains("User 2: Similarity = "));
}

#[test]
fn test_limit_flag_overrides_config() {
    let file = write_dataset(DATASET);
    let config = config_for(file.path());

    let (outcome, _, _) = execute(&parse(&["neighbors", "--user", "2"]), &config);
    assert_eq!(outcome.unwrap(), Outcome::Success);

    // only the two ratings of user 1 are read
    let (outcome, _, err) = execute(&parse(&["--limit", "2", "neighbors", "--user", "2"]), &config);
    assert_eq!(outcome.unwrap(), Outcome::UserNotFound);
    assert_eq!(err.trim(), "User 2 not found.");
}

#[test]
fn test_rating_source_prefers_flags() {
    let config = config_for("from-config.csv");

    let source = cli::rating_source(&parse(&["neighbors", "--user", "1"]), &config);
    assert_eq!(source.path(), PathBuf::from("from-config.csv").as_path());

    let source = cli::rating_source(
        &parse(&["--data", "from-flag.csv", "neighbors", "--user", "1"]),
        &config,
    );
    assert_eq!(source.path(), PathBuf::from("from-flag.csv").as_path());
}

#[test]
fn test_json_output() {
    let file = write_dataset(DATASET);
    let config = config_for(file.path());

    let (outcome, out, _) = execute(
        &parse(&["--format", "json", "neighbors", "--user", "1", "-k", "5"]),
        &config,
    );
    assert_eq!(outcome.unwrap(), Outcome::Success);

    let neighbors: serde_json::Value = serde_json::from_str(&out).unwrap();
    let neighbors = neighbors.as_array().unwrap();
    assert_eq!(neighbors.len(), 2);
    assert_eq!(neighbors[0]["user"], 2);
    assert_eq!(neighbors[1]["user"], 3);
    assert_eq!(neighbors[1]["similarity"], 0.0);

    let (outcome, out, _) = execute(
        &parse(&["--format", "json", "recommend", "--user", "1", "-k", "1"]),
        &config,
    );
    assert_eq!(outcome.unwrap(), Outcome::Success);

    let report: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(report["user"], 1);
    assert_eq!(report["predictions"][0]["item"], "S3");
}

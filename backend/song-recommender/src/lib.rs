//! User-based collaborative filtering for song recommendations.
//!
//! Ratings are loaded into a sparse user x song matrix, mean-centered per
//! user, and compared with cosine similarity. Unrated songs are scored from
//! the ratings of the most similar users.

pub mod cli;
pub mod config;
pub mod error;
pub mod ingest;
pub mod models;
pub mod services;

pub use config::{Config, LogFormat};
pub use error::{RecommendError, Result};
pub use ingest::{CsvRatingSource, RatingRecord};
pub use models::{Identifier, Interaction, Neighbor, Recommendation, ScoredItem, SnapshotStats};
pub use services::{parse_neighborhood_size, Recommender};

// User-based collaborative filtering engine, one module per pipeline stage:
//
//   interactions → index_mapper → utility_matrix → centering → similarity
//                                                        ↓
//                              recommender ← predictor ← neighbors

pub mod centering;
pub mod index_mapper;
pub mod neighbors;
pub mod predictor;
pub mod recommender;
mod row_accumulator;
pub mod similarity;
pub mod utility_matrix;

pub use centering::{center, CenteredMatrix};
pub use index_mapper::IndexMapper;
pub use neighbors::{similar_users, SimilarUser};
pub use predictor::{predict, ItemScore};
pub use recommender::{parse_neighborhood_size, Recommender};
pub use similarity::SimilarityMatrix;
pub use utility_matrix::{build_utility_matrix, RatingMatrix};
